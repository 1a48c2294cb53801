use thiserror::Error;

/// Errors surfaced by the outer session layer — terminal I/O and scene setup,
/// never anything from the hot render path (that path is infallible by
/// construction: every input is clamped or guarded before it reaches it).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("scene preset produced no geometry")]
    EmptyScene,
}

pub type SessionResult<T> = Result<T, SessionError>;
