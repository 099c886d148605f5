pub mod loader;

pub use ferret_common::config::schema;
pub use loader::{ConfigError, ConfigLoader};
