use crate::generator::stage_agent::{PromptTemplate, SurveyStage};
use crate::generator::survey::types::StageKind;

/// 文献检索员 - 结合数据集与代码库列出有影响力的论文
#[derive(Default)]
pub struct PaperFinder;

impl SurveyStage for PaperFinder {
    fn kind(&self) -> StageKind {
        StageKind::PaperFinder
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            system_prompt: "You are an academic literature reviewer.".to_string(),

            instruction: r#"Research topic: {topic}

Using ONLY the information below:

Datasets:
{datasets}

Codebases:
{codebases}

Task:
List AT MOST 8 influential research papers on the research topic using AI.

Return a MARKDOWN TABLE with columns:
| Paper title | Authors | Year | Venue | Dataset used | Baseline methods | Metrics |

Rules:
- Use IEEE / Springer / Elsevier / arXiv papers only
- If baselines are not explicitly stated, write "NOT SPECIFIED"
- No fabricated citations"#
                .to_string(),
        }
    }
}
