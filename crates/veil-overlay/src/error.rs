use thiserror::Error;

use crate::document::ElementId;

#[derive(Debug, Error)]
pub enum OverlayError {
    /// The document has nowhere to attach overlays. This is a startup
    /// configuration problem, not something to retry.
    #[error("document has no body to attach overlays to")]
    NoAttachPoint,
    #[error("element {0:?} is not part of the document")]
    ElementGone(ElementId),
    #[error("invalid overlay settings: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("failed to read overlay settings: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = OverlayError> = std::result::Result<T, E>;
