use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditError>;

/// Errors surfaced by the editor and its line store.
#[derive(Error, Debug)]
pub enum EditError {
    /// Line store read or write failure, propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A label token could not be shell-quoted (embedded nul byte).
    #[error("cannot quote label token: {0}")]
    Quote(#[from] shlex::QuoteError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// `replace_value` was asked to rewrite LABEL; labels need key-aware
    /// merging, not whole-line replacement.
    #[error("LABEL cannot be replaced wholesale; use the label operations")]
    LabelReplaceUnsupported,

    /// Single-label update on a key no LABEL instruction defines.
    #[error("label {0:?} not present in LABELs")]
    LabelNotFound(String),

    /// The label map reported a key that the rewrite scan then failed to
    /// locate. The mutation is aborted rather than writing inconsistent
    /// content.
    #[error("label {0:?} vanished while rewriting its LABEL instruction")]
    LabelScanMismatch(String),
}
