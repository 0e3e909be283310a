use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::generator::error::PipelineError;
use crate::generator::table;

/// 流水线状态中的字段名，同时也是指令模板中的占位符名
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKey {
    Topic,
    Datasets,
    Codebases,
    Papers,
    Verification,
    FinalReport,
}

impl StateKey {
    pub const ALL: [StateKey; 6] = [
        StateKey::Topic,
        StateKey::Datasets,
        StateKey::Codebases,
        StateKey::Papers,
        StateKey::Verification,
        StateKey::FinalReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::Topic => "topic",
            StateKey::Datasets => "datasets",
            StateKey::Codebases => "codebases",
            StateKey::Papers => "papers",
            StateKey::Verification => "verification",
            StateKey::FinalReport => "final_report",
        }
    }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown state key: {}", s))
    }
}

/// 表格中的一行，按表头顺序保存 (列名, 单元格) 对
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// 按列名取值，忽略大小写与首尾空白
    pub fn get(&self, column: &str) -> Option<&str> {
        let column = column.trim();
        self.fields
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(column))
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// 校验阶段用 "(UNCERTAIN)" 标记存疑的映射
    pub fn is_uncertain(&self) -> bool {
        self.fields
            .iter()
            .any(|(_, value)| value.to_ascii_uppercase().contains("(UNCERTAIN)"))
    }
}

/// 检索类阶段的输出：原始文本原样保存，另附从中解析出的记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTable {
    pub raw: String,
    pub records: Vec<Record>,
}

impl ResourceTable {
    pub fn from_output(raw: String) -> Self {
        let records = table::parse_first_table(&raw);
        Self { raw, records }
    }
}

/// 资源分类，对应校验结果中固定的三个键
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Datasets,
    Codebases,
    Papers,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 3] = [
        ResourceCategory::Datasets,
        ResourceCategory::Codebases,
        ResourceCategory::Papers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Datasets => "datasets",
            ResourceCategory::Codebases => "codebases",
            ResourceCategory::Papers => "papers",
        }
    }

    /// 从模型写在Category列中的文字识别分类
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        // "paper with code" 是论文，先于code判断
        if label.contains("dataset") || label.contains("data set") {
            Some(ResourceCategory::Datasets)
        } else if label.contains("paper")
            || label.contains("article")
            || label.contains("publication")
        {
            Some(ResourceCategory::Papers)
        } else if label.contains("code") || label.contains("repo") {
            Some(ResourceCategory::Codebases)
        } else {
            None
        }
    }
}

impl Display for ResourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 校验阶段的输出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub raw: String,
    pub categories: BTreeMap<ResourceCategory, Vec<Record>>,
    pub notes: Vec<String>,
}

impl Default for Verification {
    fn default() -> Self {
        Self {
            raw: String::new(),
            categories: ResourceCategory::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
            notes: Vec::new(),
        }
    }
}

impl Verification {
    /// 可作为分类依据的列名
    const CATEGORY_COLUMNS: [&'static str; 4] = ["category", "type", "resource type", "resource"];

    pub fn from_output(raw: String) -> Self {
        let mut verification = Self::default();

        for record in table::parse_first_table(&raw) {
            let category = Self::CATEGORY_COLUMNS
                .iter()
                .find_map(|column| record.get(column).and_then(ResourceCategory::from_label));

            match category {
                Some(category) => verification
                    .categories
                    .entry(category)
                    .or_default()
                    .push(record),
                None => tracing::debug!(?record, "verified row has no recognisable category"),
            }
        }

        verification.notes = table::parse_notes(&raw);
        verification.raw = raw;
        verification
    }

    pub fn records(&self, category: ResourceCategory) -> &[Record] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// 一次阶段调用的输入：只包含该阶段声明的字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageInput {
    values: BTreeMap<StateKey, String>,
}

impl StageInput {
    pub fn insert(&mut self, key: StateKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: StateKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn keys(&self) -> Vec<StateKey> {
        self.values.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 贯穿整个流水线的共享状态
///
/// 创建时只有topic，之后五个阶段按固定顺序各写入一个字段，每个字段只允许写一次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    topic: String,
    datasets: Option<ResourceTable>,
    codebases: Option<ResourceTable>,
    papers: Option<ResourceTable>,
    verification: Option<Verification>,
    final_report: Option<String>,
}

impl SharedState {
    pub fn new(topic: &str) -> Result<Self, PipelineError> {
        if topic.trim().is_empty() {
            return Err(PipelineError::EmptyTopic);
        }

        Ok(Self {
            topic: topic.to_string(),
            datasets: None,
            codebases: None,
            papers: None,
            verification: None,
            final_report: None,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn datasets(&self) -> Option<&ResourceTable> {
        self.datasets.as_ref()
    }

    pub fn codebases(&self) -> Option<&ResourceTable> {
        self.codebases.as_ref()
    }

    pub fn papers(&self) -> Option<&ResourceTable> {
        self.papers.as_ref()
    }

    pub fn verification(&self) -> Option<&Verification> {
        self.verification.as_ref()
    }

    /// 最终报告，最后一个阶段完成前为空字符串
    pub fn final_report(&self) -> &str {
        self.final_report.as_deref().unwrap_or_default()
    }

    pub fn is_written(&self, key: StateKey) -> bool {
        self.text_of(key).is_some()
    }

    /// 字段的原始文本，也就是下游阶段在指令中看到的内容
    pub fn text_of(&self, key: StateKey) -> Option<&str> {
        match key {
            StateKey::Topic => Some(self.topic.as_str()),
            StateKey::Datasets => self.datasets.as_ref().map(|t| t.raw.as_str()),
            StateKey::Codebases => self.codebases.as_ref().map(|t| t.raw.as_str()),
            StateKey::Papers => self.papers.as_ref().map(|t| t.raw.as_str()),
            StateKey::Verification => self.verification.as_ref().map(|v| v.raw.as_str()),
            StateKey::FinalReport => self.final_report.as_deref(),
        }
    }

    /// 按声明收集阶段输入，缺少任一字段即失败
    pub fn collect_inputs(
        &self,
        stage: &str,
        keys: &[StateKey],
    ) -> Result<StageInput, PipelineError> {
        let mut input = StageInput::default();
        for &key in keys {
            let value = self
                .text_of(key)
                .ok_or_else(|| PipelineError::MissingStateField {
                    stage: stage.to_string(),
                    key,
                })?;
            input.insert(key, value);
        }
        Ok(input)
    }

    /// 写入一个阶段的输出
    pub fn write(&mut self, key: StateKey, raw: String) -> Result<(), PipelineError> {
        match key {
            StateKey::Topic => Err(PipelineError::FieldAlreadyWritten(key)),
            StateKey::Datasets => {
                set_once(&mut self.datasets, key, || ResourceTable::from_output(raw))
            }
            StateKey::Codebases => {
                set_once(&mut self.codebases, key, || ResourceTable::from_output(raw))
            }
            StateKey::Papers => set_once(&mut self.papers, key, || ResourceTable::from_output(raw)),
            StateKey::Verification => {
                set_once(&mut self.verification, key, || Verification::from_output(raw))
            }
            StateKey::FinalReport => set_once(&mut self.final_report, key, || raw),
        }
    }
}

fn set_once<T>(
    slot: &mut Option<T>,
    key: StateKey,
    value: impl FnOnce() -> T,
) -> Result<(), PipelineError> {
    if slot.is_some() {
        return Err(PipelineError::FieldAlreadyWritten(key));
    }
    *slot = Some(value());
    Ok(())
}
