pub mod error;
pub mod store;
pub mod runner;

pub use error::SessionError;
pub use runner::{make_agents, play_out, run_batch, run_game, GameResult, Table};
pub use store::{SessionStore, StoredSession};
