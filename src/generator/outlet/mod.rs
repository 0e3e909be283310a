use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::Config;
use crate::generator::state::SharedState;

#[allow(async_fn_in_trait)]
pub trait Outlet {
    async fn save(&self, state: &SharedState) -> Result<()>;
}

/// state.json的内容：一次运行的完整状态以及运行标识
#[derive(Debug, Serialize)]
pub struct StateSnapshot<'a> {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub state: &'a SharedState,
}

/// 将报告（以及可选的完整状态）写到输出目录
pub struct DiskOutlet {
    report_path: PathBuf,
    state_path: Option<PathBuf>,
}

impl DiskOutlet {
    pub fn new(config: &Config) -> Self {
        Self {
            report_path: config.report_path(),
            state_path: config.save_state.then(|| config.state_path()),
        }
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, state: &SharedState) -> Result<()> {
        if let Some(parent_dir) = self.report_path.parent() {
            fs::create_dir_all(parent_dir)
                .context(format!("Failed to create output directory {:?}", parent_dir))?;
        }

        fs::write(&self.report_path, state.final_report())
            .context(format!("Failed to write report {:?}", self.report_path))?;
        tracing::info!(path = %self.report_path.display(), "report saved");

        if let Some(state_path) = &self.state_path {
            let snapshot = StateSnapshot {
                run_id: Uuid::new_v4(),
                generated_at: Utc::now(),
                state,
            };
            let json = serde_json::to_string_pretty(&snapshot)?;
            fs::write(state_path, json)
                .context(format!("Failed to write state {:?}", state_path))?;
            tracing::info!(path = %state_path.display(), run_id = %snapshot.run_id, "state saved");
        }

        Ok(())
    }
}
