mod loader;
mod types;

pub use loader::{effective_prefix, load_config, ConfigError};
pub use types::*;
