pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, BoutConfig};
pub use error::{Result, SimError};
pub use types::{Corner, Level, Millis, ResourceKind, Second};
