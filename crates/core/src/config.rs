use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::DestinationResult;

/// Default CDN location of the vendor integration script.
pub const DEFAULT_SCRIPT_URL: &str = "//d2jjzw81hqbuqv.cloudfront.net/integration/curebit-1.0.min.js";

/// Which flavour of the vendor API the destination talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorVariant {
    /// Queue-based API with campaigns, iframe geometry and an `init` command.
    #[default]
    Legacy,
    /// Three bare global functions and minimal configuration.
    Simplified,
}

/// Destination options. Owned by the host; the mapping engine only reads it.
///
/// Loaded from the host's flat options object (camelCase keys), from
/// environment variables with the prefix `TALKABLE__`, or from a config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AdapterConfig {
    #[serde(default, alias = "siteId")]
    pub site_id: String,
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default = "default_iframe_width", alias = "iframeWidth")]
    pub iframe_width: String,
    #[serde(default = "default_iframe_height", alias = "iframeHeight")]
    pub iframe_height: String,
    #[serde(default = "default_iframe_id", alias = "iframeId")]
    pub iframe_id: String,
    #[serde(default, alias = "iframeBorder")]
    pub iframe_border: u32,
    #[serde(default, alias = "insertIntoId")]
    pub insert_into_id: String,
    #[serde(default = "default_responsive")]
    pub responsive: bool,
    #[serde(default)]
    pub device: String,
    #[serde(default, alias = "customUrl", alias = "customScriptUrl")]
    pub custom_script_url: String,
    /// Page path to comma-separated campaign tags.
    #[serde(default)]
    pub campaigns: HashMap<String, String>,
    #[serde(default)]
    pub variant: VendorVariant,
    /// Name of the vendor's asynchronous command queue.
    #[serde(default = "default_queue_name", alias = "queueName")]
    pub queue_name: String,
    /// Global the vendor script defines once it has loaded.
    #[serde(default = "default_vendor_global", alias = "vendorGlobal")]
    pub vendor_global: String,
}

fn default_server() -> String {
    "https://www.curebit.com".to_string()
}
fn default_iframe_width() -> String {
    "100%".to_string()
}
fn default_iframe_height() -> String {
    "480".to_string()
}
fn default_iframe_id() -> String {
    "curebit_integration".to_string()
}
fn default_responsive() -> bool {
    true
}
fn default_queue_name() -> String {
    "_curebitq".to_string()
}
fn default_vendor_global() -> String {
    "curebit".to_string()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            site_id: String::new(),
            server: default_server(),
            iframe_width: default_iframe_width(),
            iframe_height: default_iframe_height(),
            iframe_id: default_iframe_id(),
            iframe_border: 0,
            insert_into_id: String::new(),
            responsive: default_responsive(),
            device: String::new(),
            custom_script_url: String::new(),
            campaigns: HashMap::new(),
            variant: VendorVariant::default(),
            queue_name: default_queue_name(),
            vendor_global: default_vendor_global(),
        }
    }
}

impl AdapterConfig {
    /// Build from the host's options object. Unknown keys are ignored and
    /// missing keys take their defaults.
    pub fn from_options(options: serde_json::Value) -> DestinationResult<Self> {
        Ok(serde_json::from_value(options)?)
    }

    /// Load configuration from environment variables.
    pub fn load() -> DestinationResult<Self> {
        let builder = config::Config::builder().add_source(env_source());
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Load a config file, with environment variables layered on top.
    pub fn load_from(path: impl AsRef<Path>) -> DestinationResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(env_source());
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Script the host should load for this destination, if any.
    pub fn script_url(&self) -> Option<&str> {
        match (self.variant, self.custom_script_url.is_empty()) {
            (_, false) => Some(self.custom_script_url.as_str()),
            (VendorVariant::Legacy, true) => Some(DEFAULT_SCRIPT_URL),
            (VendorVariant::Simplified, true) => None,
        }
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("TALKABLE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
