use crate::generator::stage_agent::{PromptTemplate, SurveyStage};
use crate::generator::survey::types::StageKind;

/// 校验员 - 剔除无关或薄弱条目，把三类资源合并成一张带分类列的表
#[derive(Default)]
pub struct Verifier;

impl SurveyStage for Verifier {
    fn kind(&self) -> StageKind {
        StageKind::Verifier
    }

    fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            system_prompt: r#"You are a critical verification agent.
Be conservative. If unsure, REMOVE the item."#
                .to_string(),

            instruction: r#"Input resources:

DATASETS:
{datasets}

CODEBASES:
{codebases}

PAPERS:
{papers}

Task:
- Remove clearly irrelevant or weak entries
- Flag uncertain mappings with "(UNCERTAIN)"
- Keep only resources genuinely related to the research area these resources share

Return:
1. ONE CLEAN VERIFIED MARKDOWN TABLE merging all kept resources, with columns:
| Category | Name | Link | Related resources | Notes |
   where Category is exactly one of: Dataset, Codebase, Paper
2. A SHORT bullet list titled "Verification Notes""#
                .to_string(),
        }
    }
}
