use palisade_engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("stored session is not valid game state: {0}")]
    Codec(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("no session with id '{0}'")]
    NotFound(String),
    #[error("game stalled: {0}")]
    Stalled(String),
}
