//! Configuration for TreeKV
//!
//! Every storage backend of the host indexing engine is constructed from the
//! same open-ended option map. This backend keeps everything in memory and
//! has nothing to tune, so the options are accepted and ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Construction configuration shared by all backends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Option name → value, as supplied by the host
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Look up a raw option value
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl From<BTreeMap<String, String>> for Config {
    fn from(options: BTreeMap<String, String>) -> Self {
        Self { options }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set a single option, replacing any previous value for `name`
    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.options.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
