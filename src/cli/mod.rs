use crate::config::{Config, DEFAULT_CONFIG_FILE, LLMProvider};
use crate::i18n::TargetLanguage;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// survey-rs - 基于多智能体流水线的文献调研报告生成工具
#[derive(Parser, Debug)]
#[command(name = "survey-rs")]
#[command(
    about = "Collects datasets, codebases and papers on a research topic with a chain of LLM agents, verifies them, and writes a survey-style literature report."
)]
#[command(version)]
pub struct Args {
    /// 调研主题
    #[arg(short, long)]
    pub topic: Option<String>,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// LLM Provider (gemini, openai, anthropic, deepseek, openrouter, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 所有阶段使用的模型
    #[arg(short, long)]
    pub model: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 报告语言 (en, zh, ja, de, fr)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 在报告末尾附上各阶段的原始表格
    #[arg(long)]
    pub include_raw_tables: bool,

    /// 关闭DatasetFinder的联网搜索
    #[arg(long)]
    pub no_search: bool,

    /// 启动时不检查模型连接
    #[arg(long)]
    pub no_connection_check: bool,

    /// 不写出state.json
    #[arg(long)]
    pub no_save_state: bool,

    /// 整个流水线的超时秒数
    #[arg(long)]
    pub timeout: Option<u64>,

    /// 缺少API KEY时直接失败
    #[arg(long)]
    pub require_credentials: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = self.load_config()?;
        self.apply_to(&mut config);
        Ok(config)
    }

    /// 只加载配置文件，不应用CLI覆盖
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            // 显式指定的配置文件必须能读取
            Some(config_path) => Config::from_file(config_path),
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// 命令行或配置文件任一处开启即输出详细日志
    pub fn verbose(&self, config: &Config) -> bool {
        self.verbose || config.verbose
    }

    /// 用CLI参数覆盖配置文件中的设置
    pub fn apply_to(self, config: &mut Config) {
        if let Some(topic) = self.topic {
            config.topic = Some(topic);
        }
        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }

        if let Some(provider_str) = self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(_) => tracing::warn!(
                    provider = %provider_str,
                    fallback = %config.llm.provider,
                    "unknown provider, keeping configured one"
                ),
            }
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = Some(llm_api_base_url);
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        if let Some(target_language_str) = self.target_language {
            match target_language_str.parse::<TargetLanguage>() {
                Ok(target_language) => config.target_language = target_language,
                Err(_) => tracing::warn!(
                    language = %target_language_str,
                    fallback = %config.target_language,
                    "unknown target language, keeping configured one"
                ),
            }
        }

        // 开关只往一个方向覆盖，未传时保留配置文件的值
        if self.include_raw_tables {
            config.include_raw_tables = true;
        }
        if self.no_search {
            config.llm.enable_search = false;
        }
        if self.no_connection_check {
            config.check_connection = false;
        }
        if self.no_save_state {
            config.save_state = false;
        }
        if self.require_credentials {
            config.require_credentials = true;
        }
        if let Some(timeout) = self.timeout {
            config.run_timeout_seconds = Some(timeout);
        }
        if self.verbose {
            config.verbose = true;
        }
    }
}
