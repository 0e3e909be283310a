// 文献调研流水线，五个阶段严格串行：
// A DatasetFinder  = topic
// B CodebaseFinder = topic + A
// C PaperFinder    = topic + A + B
// D Verifier       = A + B + C
// E ReportWriter   = D

use crate::config::Config;
use crate::generator::error::PipelineError;
use crate::generator::stage_agent::{StageDescriptor, SurveyStage};

use agents::codebase_finder::CodebaseFinder;
use agents::dataset_finder::DatasetFinder;
use agents::paper_finder::PaperFinder;
use agents::report_writer::ReportWriter;
use agents::verifier::Verifier;
use types::StageKind;

pub mod agents;
pub mod orchestrator;
pub mod types;

/// 按执行顺序排列的五个阶段描述，启动时构造一次后交给编排器
#[derive(Debug, Clone)]
pub struct PipelineStages {
    stages: [StageDescriptor; 5],
}

impl PipelineStages {
    /// 校验阶段顺序、输入输出声明以及模板占位符
    pub fn new(stages: [StageDescriptor; 5]) -> Result<Self, PipelineError> {
        for (slot, (stage, expected)) in stages.iter().zip(StageKind::ORDER).enumerate() {
            if stage.kind != expected {
                return Err(PipelineError::StageOrder {
                    slot,
                    expected,
                    actual: stage.kind,
                });
            }
            if stage.required_inputs != expected.inputs() {
                return Err(PipelineError::StageInputs {
                    stage: stage.name.clone(),
                    expected: expected.inputs(),
                    actual: stage.required_inputs.clone(),
                });
            }
            if stage.output_key != expected.output() {
                return Err(PipelineError::StageOutput {
                    stage: stage.name.clone(),
                    expected: expected.output(),
                    actual: stage.output_key,
                });
            }
            stage.validate()?;
        }

        Ok(Self { stages })
    }

    /// 由配置生成全部阶段描述
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        Self::new([
            DatasetFinder.descriptor(config),
            CodebaseFinder.descriptor(config),
            PaperFinder.descriptor(config),
            Verifier.descriptor(config),
            ReportWriter.descriptor(config),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageDescriptor> {
        self.stages.iter()
    }

    pub fn get(&self, kind: StageKind) -> &StageDescriptor {
        // new() 保证了第i个槽位就是ORDER[i]
        let slot = StageKind::ORDER
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &self.stages[slot]
    }

    pub fn into_inner(self) -> [StageDescriptor; 5] {
        self.stages
    }
}
