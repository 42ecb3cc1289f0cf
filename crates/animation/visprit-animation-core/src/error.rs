//! Error types for the few fallible entry points (config parsing and the
//! element registry). Malformed numbers and unknown directions are not errors:
//! they degrade to `NaN` output or a family's default branch.

use thiserror::Error;

use crate::ids::ElementId;
use crate::trigger::TriggerKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config json must be an object, got {0}")]
    NotAnObject(String),
    #[error("scroll resistance '{key}' must be non-zero and finite, got {value}")]
    InvalidResistance { key: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),
    #[error("element {id:?} has no {kind:?} trigger attached")]
    MissingTrigger { id: ElementId, kind: TriggerKind },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
