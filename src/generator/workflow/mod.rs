use anyhow::{Result, anyhow};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::generator::outlet::{DiskOutlet, Outlet};
use crate::generator::stage_agent::StageInvoker;
use crate::generator::state::SharedState;
use crate::generator::survey::PipelineStages;
use crate::generator::survey::orchestrator::SurveyOrchestrator;
use crate::llm::client::LLMClient;

/// 启动文献调研工作流
pub async fn launch(config: &Config) -> Result<()> {
    let topic = config.require_topic()?;
    config.check_credentials()?;

    let client = LLMClient::new(config.llm.clone())?;

    // 启动时检查模型连接
    if config.check_connection {
        client.check_connection().await?;
    }

    launch_with_invoker(config, &topic, Arc::new(client)).await?;
    Ok(())
}

/// 使用给定的调用层执行流水线并保存结果
pub async fn launch_with_invoker(
    config: &Config,
    topic: &str,
    invoker: Arc<dyn StageInvoker>,
) -> Result<SharedState> {
    let stages = PipelineStages::from_config(config)?;
    let orchestrator =
        SurveyOrchestrator::new(stages, invoker).with_raw_tables(config.include_raw_tables);

    tracing::info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        language = config.target_language.display_name(),
        "launching survey"
    );

    let state = match config.run_timeout_seconds {
        Some(seconds) => tokio::time::timeout(
            Duration::from_secs(seconds),
            orchestrator.run_pipeline(topic),
        )
        .await
        .map_err(|_| anyhow!("survey pipeline did not finish within {} seconds", seconds))??,
        None => orchestrator.run_pipeline(topic).await?,
    };

    DiskOutlet::new(config).save(&state).await?;
    Ok(state)
}

// Include tests
#[cfg(test)]
mod tests;
