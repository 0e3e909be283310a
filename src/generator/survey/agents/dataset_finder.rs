use crate::config::Config;
use crate::generator::stage_agent::{LLMCallMode, PromptTemplate, SurveyStage};
use crate::generator::survey::types::StageKind;

/// 数据集检索员 - 找出该主题下公开可用的数据集，是唯一可以使用联网搜索的阶段
#[derive(Default)]
pub struct DatasetFinder;

impl SurveyStage for DatasetFinder {
    fn kind(&self) -> StageKind {
        StageKind::DatasetFinder
    }

    fn call_mode(&self, config: &Config) -> LLMCallMode {
        if config.llm.enable_search {
            LLMCallMode::PromptWithSearch
        } else {
            LLMCallMode::Prompt
        }
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            system_prompt: "You are an expert research assistant who catalogues public research datasets."
                .to_string(),

            instruction: r#"Research topic: {topic}

Task:
Identify AT MOST 6 well-known, publicly available datasets used for research on the topic above with AI/ML.

For EACH dataset, provide a ROW in a MARKDOWN TABLE with columns:
| Dataset name | Official link | Hardware used | Data type | Short description |

Rules (VERY IMPORTANT):
- Use ONLY real, established datasets
- Prefer Zenodo, IEEE, Kaggle, official university/lab pages
- If a detail is unknown, write "NOT SPECIFIED"
- Do NOT invent datasets
- Do NOT write explanations outside the table"#
                .to_string(),
        }
    }
}
