use serde::Deserialize;

use crate::reference::ReferenceConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub reference: ReferenceConfig,
    pub collaborators: CollaboratorSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub pool_size: u32,
}

/// Base URLs for the external services this core calls.
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorSettings {
    pub account_service_url: String,
    pub recipient_service_url: String,
    pub notification_service_url: String,
    pub request_timeout_seconds: u64,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        builder.build()?.try_deserialize()
    }
}
