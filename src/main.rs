use anyhow::Result;
use clap::Parser;
use survey_rs::{cli, launch, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // .env不存在时忽略
    dotenvy::dotenv().ok();

    let args = cli::Args::parse();
    let mut config = args.load_config()?;

    // 先初始化日志，覆盖参数时的告警才能输出
    logging::init(args.verbose(&config));
    args.apply_to(&mut config);

    launch(&config).await
}
