pub mod config;
pub mod error;
pub mod health;
pub mod output;
pub mod revenue;
pub mod store;

pub use error::{EngineError, EngineResult};
