//! 日志初始化：输出到stderr，`RUST_LOG` 优先，否则按 `--verbose` 选择 info 或 debug

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// 默认过滤级别，屏蔽HTTP栈的噪音
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug,hyper_util=off,reqwest=info"
    } else {
        "info,hyper_util=off"
    }
}

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // 重复初始化时保留已有的subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert!(default_directive(false).starts_with("info"));
        assert!(default_directive(true).starts_with("debug"));
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
