use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::i18n::TargetLanguage;

/// 选择模型标识的环境变量
pub const MODEL_ENV_VAR: &str = "GOOGLE_GENAI_MODEL";

/// 未设置环境变量时使用的模型
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// 读取API KEY的环境变量，按顺序尝试
pub const API_KEY_ENV_VARS: [&str; 2] = ["SURVEY_LLM_API_KEY", "GOOGLE_API_KEY"];

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "survey.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "gemini")]
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(LLMProvider::Gemini),
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl LLMProvider {
    /// 该Provider是否需要API KEY
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LLMProvider::Ollama)
    }

    /// 该Provider是否支持内置的联网搜索能力
    pub fn supports_search(&self) -> bool {
        matches!(self, LLMProvider::Gemini)
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 调研主题
    pub topic: Option<String>,

    /// 输出路径
    pub output_path: PathBuf,

    /// 报告语言
    pub target_language: TargetLanguage,

    /// 是否在报告末尾原样附加四张资源表
    pub include_raw_tables: bool,

    /// 是否将完整的流水线状态保存为state.json
    pub save_state: bool,

    /// 启动时是否检查模型连接
    pub check_connection: bool,

    /// 缺少API KEY时是否直接失败（否则仅告警）
    pub require_credentials: bool,

    /// 整个流水线的超时时间（秒），None表示不限制
    pub run_timeout_seconds: Option<u64>,

    /// 是否启用详细日志
    pub verbose: bool,

    /// LLM模型配置
    pub llm: LLMConfig,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址，None时使用Provider默认地址
    pub api_base_url: Option<String>,

    /// 所有阶段使用的模型标识
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 数据集检索阶段是否启用联网搜索
    pub enable_search: bool,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 获取调研主题，去掉首尾空白后不能为空
    pub fn require_topic(&self) -> Result<String> {
        match self.topic.as_deref().map(str::trim) {
            Some(topic) if !topic.is_empty() => Ok(topic.to_string()),
            _ => bail!("No research topic given; pass --topic or set `topic` in {DEFAULT_CONFIG_FILE}"),
        }
    }

    /// 检查凭据：严格模式下缺少API KEY直接报错，否则只告警
    pub fn check_credentials(&self) -> Result<()> {
        if !self.llm.provider.requires_api_key() || !self.llm.api_key.trim().is_empty() {
            return Ok(());
        }

        if self.require_credentials {
            bail!(
                "No API key configured for provider {}; set {} or pass --llm-api-key",
                self.llm.provider,
                API_KEY_ENV_VARS.join(" / ")
            );
        }

        tracing::warn!(
            provider = %self.llm.provider,
            "no API key configured, model calls will most likely fail"
        );
        Ok(())
    }

    /// report.md的完整路径
    pub fn report_path(&self) -> PathBuf {
        self.output_path.join("report.md")
    }

    /// state.json的完整路径
    pub fn state_path(&self) -> PathBuf {
        self.output_path.join("state.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topic: None,
            output_path: PathBuf::from("./survey.docs"),
            target_language: TargetLanguage::default(),
            include_raw_tables: false,
            save_state: true,
            check_connection: true,
            require_credentials: false,
            run_timeout_seconds: None,
            verbose: false,
            llm: LLMConfig::default(),
        }
    }
}

impl LLMConfig {
    /// 用给定的环境变量查询函数生成默认配置，空白值视为未设置
    pub fn from_env_lookup(env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        Self {
            provider: LLMProvider::default(),
            api_key: API_KEY_ENV_VARS
                .iter()
                .find_map(|&name| lookup(name))
                .unwrap_or_default(),
            api_base_url: None,
            model: lookup(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: 16384,
            temperature: 0.2,
            enable_search: true,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self::from_env_lookup(|name| std::env::var(name).ok())
    }
}

// Include tests
#[cfg(test)]
mod tests;
