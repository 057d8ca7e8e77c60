use thiserror::Error;

/// Errors produced by the layout core.
///
/// Mirrors the taxonomy of recoverable failure modes the core recognizes:
/// malformed input graphs and degenerate configuration. Everything else
/// (coincident points, disconnected graphs, `n == 0`) is handled internally
/// and never surfaces as an error.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("degenerate configuration: {0}")]
    DegenerateConfig(String),

    #[error("graph kind mismatch: {0}")]
    WrongGraphKind(String),
}
