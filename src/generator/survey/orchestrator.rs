use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

use crate::generator::stage_agent::{StageDescriptor, StageInvoker};
use crate::generator::state::{SharedState, StateKey};
use crate::generator::survey::PipelineStages;
use crate::generator::survey::agents::report_writer::finalize_report;

/// 文献调研编排器
///
/// 按固定顺序执行五个阶段，每个阶段只拿到它声明的输入字段。任一阶段失败时整个
/// 流水线立即终止，外部错误原样返回，调用方拿不到部分状态。
pub struct SurveyOrchestrator {
    stages: PipelineStages,
    invoker: Arc<dyn StageInvoker>,
    include_raw_tables: bool,
}

impl SurveyOrchestrator {
    pub fn new(stages: PipelineStages, invoker: Arc<dyn StageInvoker>) -> Self {
        Self {
            stages,
            invoker,
            include_raw_tables: false,
        }
    }

    /// 是否在最终报告后原样附加四张资源表
    pub fn with_raw_tables(mut self, include_raw_tables: bool) -> Self {
        self.include_raw_tables = include_raw_tables;
        self
    }

    pub fn stages(&self) -> &PipelineStages {
        &self.stages
    }

    /// 执行完整的调研流水线
    pub async fn run_pipeline(&self, topic: &str) -> Result<SharedState> {
        let mut state = SharedState::new(topic)?;
        let started = Instant::now();
        tracing::info!(topic, "starting survey pipeline");

        for stage in self.stages.iter() {
            self.run_stage(stage, &mut state).await?;
        }

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            report_len = state.final_report().len(),
            "survey pipeline finished"
        );
        Ok(state)
    }

    /// 执行单个阶段：收集输入、调用、写回输出字段
    pub async fn run_stage(&self, stage: &StageDescriptor, state: &mut SharedState) -> Result<()> {
        let input = state.collect_inputs(&stage.name, &stage.required_inputs)?;
        let started = Instant::now();
        tracing::info!(stage = %stage.name, model = %stage.model, inputs = ?input.keys(), "running stage");

        let output = match self.invoker.invoke(stage, &input).await {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(stage = %stage.name, "stage failed: {:#}", e);
                return Err(e);
            }
        };

        let output = if stage.output_key == StateKey::FinalReport {
            finalize_report(output, state, self.include_raw_tables)
        } else {
            output
        };

        state.write(stage.output_key, output)?;
        tracing::info!(
            stage = %stage.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "stage finished"
        );
        Ok(())
    }
}
