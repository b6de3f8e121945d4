//! Global settings that are not specific to resolution or CSS.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Log level name understood by the host's logging setup
    /// (`silent`, `error`, `warn`, `info`, `debug`).
    #[serde(default)]
    pub log_level: Option<String>,
}
