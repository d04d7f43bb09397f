pub mod settings;

pub use settings::{DisplayConfig, LoggingConfig, Settings, SourceConfig};
