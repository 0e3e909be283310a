//! LLM客户端 - 流水线各阶段与模型服务之间唯一的调用通道

use anyhow::Result;
use async_trait::async_trait;

use crate::config::LLMConfig;
use crate::generator::stage_agent::{LLMCallMode, StageDescriptor, StageInvoker};
use crate::generator::state::StageInput;

mod providers;

use providers::ProviderClient;

/// LLM客户端
///
/// 每次调用只发一次请求，不做重试与模型降级；失败直接返回给编排器。
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// 检查模型连接是否正常
    pub async fn check_connection(&self) -> Result<()> {
        tracing::info!(
            provider = %self.config.provider,
            model = %self.config.model,
            "checking model connection"
        );
        match self
            .prompt(
                &self.config.model,
                "You are a helpful assistant.",
                "Hello",
                LLMCallMode::Prompt,
            )
            .await
        {
            Ok(_) => {
                tracing::info!("model connection ok");
                Ok(())
            }
            Err(e) => {
                tracing::error!("model connection failed: {}", e);
                Err(e)
            }
        }
    }

    /// 单轮对话
    pub async fn prompt(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        call_mode: LLMCallMode,
    ) -> Result<String> {
        let agent = self
            .client
            .create_agent(model, system_prompt, &self.config, call_mode)?;
        agent.prompt(user_prompt).await
    }

    /// Provider不支持联网搜索时降级为普通推理
    fn effective_call_mode(&self, stage: &StageDescriptor) -> LLMCallMode {
        if stage.call_mode == LLMCallMode::PromptWithSearch
            && !self.config.provider.supports_search()
        {
            tracing::warn!(
                stage = %stage.name,
                provider = %self.config.provider,
                "provider has no built-in search, running without it"
            );
            return LLMCallMode::Prompt;
        }
        stage.call_mode
    }
}

#[async_trait]
impl StageInvoker for LLMClient {
    async fn invoke(&self, stage: &StageDescriptor, input: &StageInput) -> Result<String> {
        let user_prompt = stage.render(input)?;
        let call_mode = self.effective_call_mode(stage);
        tracing::debug!(
            stage = %stage.name,
            prompt_chars = user_prompt.chars().count(),
            ?call_mode,
            "sending stage prompt"
        );

        self.prompt(&stage.model, &stage.system_prompt, &user_prompt, call_mode)
            .await
    }
}
