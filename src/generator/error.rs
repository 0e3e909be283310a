use thiserror::Error;

use crate::generator::state::StateKey;
use crate::generator::survey::types::StageKind;

/// 流水线自身的不变量被破坏时返回的错误
///
/// 外部模型调用的错误不会被包装成这里的变体，而是原样向上传播。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("research topic must not be empty")]
    EmptyTopic,

    #[error("stage {stage} needs `{key}` but it has not been written yet")]
    MissingStateField { stage: String, key: StateKey },

    #[error("stage {stage} references `{{{placeholder}}}` which is not one of its declared inputs")]
    UndeclaredPlaceholder { stage: String, placeholder: String },

    #[error("state field `{0}` has already been written")]
    FieldAlreadyWritten(StateKey),

    #[error("pipeline slot {slot} expects {expected}, got {actual}")]
    StageOrder {
        slot: usize,
        expected: StageKind,
        actual: StageKind,
    },

    #[error("stage {stage} declares {actual:?} as inputs, expected {expected:?}")]
    StageInputs {
        stage: String,
        expected: Vec<StateKey>,
        actual: Vec<StateKey>,
    },

    #[error("stage {stage} writes `{actual}`, expected `{expected}`")]
    StageOutput {
        stage: String,
        expected: StateKey,
        actual: StateKey,
    },
}
