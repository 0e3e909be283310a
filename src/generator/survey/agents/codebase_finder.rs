use crate::generator::stage_agent::{PromptTemplate, SurveyStage};
use crate::generator::survey::types::StageKind;

/// 代码库检索员 - 基于已找到的数据集寻找相关的开源实现
#[derive(Default)]
pub struct CodebaseFinder;

impl SurveyStage for CodebaseFinder {
    fn kind(&self) -> StageKind {
        StageKind::CodebaseFinder
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            system_prompt: "You are an expert ML engineer who reviews open-source research code."
                .to_string(),

            instruction: r#"Research topic: {topic}

Using ONLY the datasets listed below:
{datasets}

Task:
List AT MOST 6 serious AI/ML codebases related to the research topic.

Return a MARKDOWN TABLE with columns:
| Repository | Link | Dataset used | Model / method | Notes |

Rules:
- Prefer official or well-maintained GitHub repositories
- If dataset is unclear, write "NOT CLEAR"
- Ignore toy, demo-only, or empty repositories
- Do NOT repeat dataset descriptions"#
                .to_string(),
        }
    }
}
