pub mod types;
pub mod error;
pub mod board;
pub mod territory;
pub mod scoring;
pub mod setup;
pub mod engine;
pub mod visibility;
pub mod protocol;


pub use types::*;
pub use board::Board;
pub use error::{EngineError, Ignored, Outcome};
pub use engine::Action;
