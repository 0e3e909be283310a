#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::config::{Config, LLMProvider};
    use crate::generator::stage_agent::{StageDescriptor, StageInvoker};
    use crate::generator::state::StageInput;
    use crate::generator::workflow::{launch, launch_with_invoker};

    /// 把阶段名作为输出返回
    struct EchoInvoker;

    #[async_trait]
    impl StageInvoker for EchoInvoker {
        async fn invoke(&self, stage: &StageDescriptor, _input: &StageInput) -> Result<String> {
            Ok(stage.name.clone())
        }
    }

    /// 永远不返回的调用层，用来验证整体超时
    struct StalledInvoker;

    #[async_trait]
    impl StageInvoker for StalledInvoker {
        async fn invoke(&self, _stage: &StageDescriptor, _input: &StageInput) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    fn create_test_config(temp_dir: &TempDir) -> Config {
        Config {
            output_path: temp_dir.path().join("output"),
            check_connection: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_launch_with_invoker_saves_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(&temp_dir);

        let state = launch_with_invoker(&config, "bridge vibration monitoring", Arc::new(EchoInvoker))
            .await
            .unwrap();

        assert_eq!(state.final_report(), "ReportWriter");
        assert_eq!(
            std::fs::read_to_string(config.report_path()).unwrap(),
            "ReportWriter"
        );
        assert!(config.state_path().exists());
    }

    #[tokio::test]
    async fn test_launch_with_raw_tables() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            include_raw_tables: true,
            ..create_test_config(&temp_dir)
        };

        let state = launch_with_invoker(&config, "t", Arc::new(EchoInvoker))
            .await
            .unwrap();

        assert!(state.final_report().starts_with("ReportWriter"));
        assert!(
            state
                .final_report()
                .contains("---DATASETS_TABLE---\nDatasetFinder")
        );
        assert!(
            state
                .final_report()
                .contains("---VERIFIED_RESOURCES---\nVerifier")
        );
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            run_timeout_seconds: Some(1),
            ..create_test_config(&temp_dir)
        };

        let err = launch_with_invoker(&config, "t", Arc::new(StalledInvoker))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("did not finish within 1 seconds"));
        assert!(!config.report_path().exists());
    }

    #[tokio::test]
    async fn test_launch_requires_topic() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(&temp_dir);

        let err = launch(&config).await.unwrap_err();
        assert!(err.to_string().contains("No research topic"));
    }

    #[tokio::test]
    async fn test_launch_strict_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(&temp_dir);
        config.topic = Some("t".to_string());
        config.require_credentials = true;
        config.llm.provider = LLMProvider::Gemini;
        config.llm.api_key = String::new();

        let err = launch(&config).await.unwrap_err();
        assert!(err.to_string().contains("No API key"));
        assert!(!config.report_path().exists());
    }
}
