use thiserror::Error;

/// Failure to turn a component name into a component definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("component `{name}` not found")]
    NotFound { name: String },
    #[error("component `{name}` failed to load: {reason}")]
    Failed { name: String, reason: String },
}

/// A navigation swap that was rejected before any state was written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwapError {
    #[error("page `{component}` carries no props")]
    MissingPageProps { component: String },
    #[error("dialog component supplied for page `{component}` without a dialog payload")]
    MissingDialogPayload { component: String },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// The raw page JSON could not be decoded.
#[derive(Debug, Error)]
#[error("malformed page payload: {0}")]
pub struct PageDecodeError(#[from] pub serde_json::Error);
