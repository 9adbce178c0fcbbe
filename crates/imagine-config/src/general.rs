//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default page size for list commands.
const fn default_page_size() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Page size used by paginated list commands when `--limit` is absent.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Follow live job updates after an upload.
    #[serde(default = "default_follow")]
    pub follow_uploads: bool,
}

const fn default_follow() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            follow_uploads: default_follow(),
        }
    }
}
