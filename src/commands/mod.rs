//! Command handlers module.
//!
//! - `config.rs`: Configuration display command
//! - `replay.rs`: Offline replay of violation logs

mod config;
mod replay;

pub use config::cmd_config;
pub use replay::cmd_replay;
