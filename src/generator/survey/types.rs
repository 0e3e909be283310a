use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::generator::state::StateKey;

/// 调研流水线中的五个阶段，声明顺序即执行顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    DatasetFinder,
    CodebaseFinder,
    PaperFinder,
    Verifier,
    ReportWriter,
}

impl StageKind {
    pub const ORDER: [StageKind; 5] = [
        StageKind::DatasetFinder,
        StageKind::CodebaseFinder,
        StageKind::PaperFinder,
        StageKind::Verifier,
        StageKind::ReportWriter,
    ];

    /// 该阶段读取的状态字段
    pub fn inputs(&self) -> Vec<StateKey> {
        match self {
            StageKind::DatasetFinder => vec![StateKey::Topic],
            StageKind::CodebaseFinder => vec![StateKey::Topic, StateKey::Datasets],
            StageKind::PaperFinder => {
                vec![StateKey::Topic, StateKey::Datasets, StateKey::Codebases]
            }
            StageKind::Verifier => {
                vec![StateKey::Datasets, StateKey::Codebases, StateKey::Papers]
            }
            StageKind::ReportWriter => vec![StateKey::Verification],
        }
    }

    /// 该阶段写入的状态字段
    pub fn output(&self) -> StateKey {
        match self {
            StageKind::DatasetFinder => StateKey::Datasets,
            StageKind::CodebaseFinder => StateKey::Codebases,
            StageKind::PaperFinder => StateKey::Papers,
            StageKind::Verifier => StateKey::Verification,
            StageKind::ReportWriter => StateKey::FinalReport,
        }
    }
}

impl Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            StageKind::DatasetFinder => "DatasetFinder",
            StageKind::CodebaseFinder => "CodebaseFinder",
            StageKind::PaperFinder => "PaperFinder",
            StageKind::Verifier => "Verifier",
            StageKind::ReportWriter => "ReportWriter",
        };
        write!(f, "{}", str)
    }
}
