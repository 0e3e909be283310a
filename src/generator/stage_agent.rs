use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::Config;
use crate::generator::error::PipelineError;
use crate::generator::state::{StageInput, StateKey};
use crate::generator::survey::types::StageKind;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// 替换时间占位符为实际时间信息
pub fn replace_time_placeholders(content: &str, now: DateTime<Utc>) -> String {
    content
        .replace(
            "__CURRENT_UTC_TIME__",
            &format!("{} (UTC)", now.format("%Y-%m-%d %H:%M:%S")),
        )
        .replace("__CURRENT_TIMESTAMP__", &now.timestamp().to_string())
}

/// LLM调用方式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LLMCallMode {
    /// 纯文本推理
    Prompt,
    /// 启用Provider内置的联网搜索能力
    PromptWithSearch,
}

/// Prompt模板配置
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// 系统提示词
    pub system_prompt: String,
    /// 指令模板，`{topic}`、`{datasets}` 等占位符在调用前替换为状态字段
    pub instruction: String,
}

/// 阶段描述：一次模型调用所需的全部静态配置
#[derive(Debug, Clone, PartialEq)]
pub struct StageDescriptor {
    pub kind: StageKind,
    pub name: String,
    pub model: String,
    pub system_prompt: String,
    pub instruction_template: String,
    pub required_inputs: Vec<StateKey>,
    pub output_key: StateKey,
    pub call_mode: LLMCallMode,
}

impl StageDescriptor {
    /// 模板中出现的占位符名，按出现顺序去重
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.instruction_template) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// 模板只能引用本阶段声明的输入
    pub fn validate(&self) -> Result<(), PipelineError> {
        for name in self.placeholders() {
            let declared = name
                .parse::<StateKey>()
                .is_ok_and(|key| self.required_inputs.contains(&key));
            if !declared {
                return Err(PipelineError::UndeclaredPlaceholder {
                    stage: self.name.clone(),
                    placeholder: name,
                });
            }
        }
        Ok(())
    }

    /// 用阶段输入替换模板中的占位符
    ///
    /// 时间占位符只在模板文字中替换，输入值原样嵌入。
    pub fn render(&self, input: &StageInput) -> Result<String, PipelineError> {
        let template = &self.instruction_template;
        let now = Utc::now();
        let mut rendered = String::with_capacity(template.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let name = &caps[1];
            let key = name
                .parse::<StateKey>()
                .map_err(|_| PipelineError::UndeclaredPlaceholder {
                    stage: self.name.clone(),
                    placeholder: name.to_string(),
                })?;
            let value = input
                .get(key)
                .ok_or_else(|| PipelineError::MissingStateField {
                    stage: self.name.clone(),
                    key,
                })?;

            rendered.push_str(&replace_time_placeholders(&template[last..whole.start()], now));
            rendered.push_str(value);
            last = whole.end();
        }
        rendered.push_str(&replace_time_placeholders(&template[last..], now));
        Ok(rendered)
    }
}

/// 阶段模板：每个阶段以一个无状态结构体实现，由配置生成 [`StageDescriptor`]
pub trait SurveyStage {
    fn kind(&self) -> StageKind;

    /// Prompt模板配置
    fn prompt_template(&self) -> PromptTemplate;

    /// LLM调用方式，默认纯文本推理
    fn call_mode(&self, _config: &Config) -> LLMCallMode {
        LLMCallMode::Prompt
    }

    /// 可选的系统提示词补充，会追加在系统提示词末尾
    fn system_prompt_suffix(&self, _config: &Config) -> Option<String> {
        None
    }

    fn descriptor(&self, config: &Config) -> StageDescriptor {
        let kind = self.kind();
        let template = self.prompt_template();
        let system_prompt = match self.system_prompt_suffix(config) {
            Some(suffix) => format!("{}\n\n{}", template.system_prompt, suffix),
            None => template.system_prompt,
        };

        StageDescriptor {
            kind,
            name: kind.to_string(),
            model: config.llm.model.clone(),
            system_prompt,
            instruction_template: template.instruction,
            required_inputs: kind.inputs(),
            output_key: kind.output(),
            call_mode: self.call_mode(config),
        }
    }
}

/// 外部调用层：给定阶段描述与输入，返回模型输出文本
///
/// 实现方不做重试；错误原样返回给编排器。
#[async_trait]
pub trait StageInvoker: Send + Sync {
    async fn invoke(&self, stage: &StageDescriptor, input: &StageInput) -> Result<String>;
}
