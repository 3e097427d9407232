pub mod agent;
pub mod random;
pub mod greedy;

pub use agent::{Agent, AgentKind};
pub use random::RandomAgent;
pub use greedy::GreedyAgent;
