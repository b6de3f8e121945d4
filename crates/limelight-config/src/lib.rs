pub mod config;
pub mod css;
pub mod discovery;
pub mod error;
pub mod settings;
pub mod validation;

// Re-export main types
pub use config::*;
pub use css::CssOptions;
pub use error::*;
pub use settings::GlobalSettings;

pub use discovery::{CONFIG_FILE_NAME, ConfigDiscovery, discover};
pub use validation::validate;
