pub mod config;
pub mod error;
pub mod types;

pub use config::TopicaConfig;
pub use error::{Result, TopicaError};
pub use types::*;
