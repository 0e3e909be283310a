use crate::config::Config;
use crate::generator::stage_agent::{PromptTemplate, SurveyStage};
use crate::generator::state::{SharedState, StateKey};
use crate::generator::survey::types::StageKind;

/// 附加原始表格时使用的分隔标记，顺序固定
pub const RAW_SECTION_MARKERS: [(&str, StateKey); 4] = [
    ("---DATASETS_TABLE---", StateKey::Datasets),
    ("---CODEBASES_TABLE---", StateKey::Codebases),
    ("---PAPERS_TABLE---", StateKey::Papers),
    ("---VERIFIED_RESOURCES---", StateKey::Verification),
];

/// 报告撰写员 - 只依据校验后的资源撰写综述报告
#[derive(Default)]
pub struct ReportWriter;

impl SurveyStage for ReportWriter {
    fn kind(&self) -> StageKind {
        StageKind::ReportWriter
    }

    fn system_prompt_suffix(&self, config: &Config) -> Option<String> {
        Some(config.target_language.prompt_instruction().to_string())
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            system_prompt: "You are a senior researcher writing a survey-style technical report."
                .to_string(),

            instruction: r#"Using ONLY the verified resources below:
{verification}

Write a COMPLETE, well-structured academic report with sections:

1. Executive Summary
2. Introduction to the Research Domain
3. Overview of Datasets and Sensing Hardware
4. AI/ML Codebases and Implementation Trends
5. Literature Review and Baseline Comparisons
6. Reliability, Reproducibility, and Data Gaps
7. Open Challenges and Future Research Directions

MANDATORY:
- Start with the line "Report date: __CURRENT_UTC_TIME__"
- Explicitly state this report was compiled by a pipeline of LLM-based agents
- Clarify that the agents are NOT reinforcement-learning agents
- Use formal academic tone
- Avoid marketing language"#
                .to_string(),
        }
    }
}

/// 按需在报告后原样附加四张资源表，模型输出本身不做改动
///
/// 附加在本地完成而不是交给模型复述，保证表格不被改写。
pub fn finalize_report(mut report: String, state: &SharedState, include_raw_tables: bool) -> String {
    if !include_raw_tables {
        return report;
    }

    for (marker, key) in RAW_SECTION_MARKERS {
        report.push_str("\n\n");
        report.push_str(marker);
        report.push('\n');
        report.push_str(state.text_of(key).unwrap_or_default());
    }
    report.push('\n');
    report
}
