use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Configuration for transaction reference generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Prefix for generated references.
    pub prefix: String,
    /// Number of hex characters taken from the random identifier.
    pub suffix_len: usize,
    /// How many generation attempts are allowed before giving up on a
    /// collision-free reference.
    pub max_attempts: u32,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            prefix: "TXN".to_string(),
            suffix_len: 8,
            max_attempts: 5,
        }
    }
}

/// Generator for external-facing transaction references.
#[derive(Debug, Clone)]
pub struct ReferenceGenerator {
    config: ReferenceConfig,
}

impl ReferenceGenerator {
    pub fn new(config: ReferenceConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(ReferenceConfig::default())
    }

    /// Produces a reference of the form `TXN-3FA85F64`.
    ///
    /// Collision probability is negligible but not zero; callers must verify
    /// uniqueness against the store and retry within `max_attempts`.
    pub fn generate(&self) -> String {
        let id = Uuid::new_v4().simple().to_string();
        let suffix_len = self.config.suffix_len.min(id.len());
        format!("{}-{}", self.config.prefix, id[..suffix_len].to_uppercase())
    }

    /// Maximum number of generation attempts before surfacing a duplicate
    /// reference error.
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }
}
