pub mod config;
pub mod credentials;
pub mod error;
pub mod retention;
pub mod server;
pub mod sweep;
pub mod timeline;

#[cfg(test)]
mod testing;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use retention::RetentionPolicy;
pub use sweep::{RunResult, SweepOptions, Sweeper};
