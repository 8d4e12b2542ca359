use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only failure the session controller itself can raise. The generate
/// control is disabled while either image is missing, so this is a defensive
/// guard; when it fires the session resets to idle and the message becomes
/// the visible status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SessionError {
    #[error("Please upload both model and garment images")]
    MissingInput,
}
