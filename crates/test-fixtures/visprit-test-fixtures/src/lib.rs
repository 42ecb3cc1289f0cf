//! Named animation configs shared by tests and benches across the workspace.
//!
//! `fixtures/manifest.json` maps a fixture name to a config file, optionally
//! tagged with the trigger kind the config is written for.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Result<Manifest, String>> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).map_err(|err| err.to_string())
});

#[derive(Debug, Deserialize)]
struct Manifest {
    configs: HashMap<String, ConfigEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        trigger: Option<String>,
    },
}

impl ConfigEntry {
    fn as_path(&self) -> &str {
        match self {
            ConfigEntry::Path(path) => path,
            ConfigEntry::Detailed { path, .. } => path,
        }
    }

    fn trigger(&self) -> Option<&str> {
        match self {
            ConfigEntry::Path(_) => None,
            ConfigEntry::Detailed { trigger, .. } => trigger.as_deref(),
        }
    }
}

fn manifest() -> Result<&'static Manifest> {
    MANIFEST
        .as_ref()
        .map_err(|err| anyhow!("fixtures manifest failed to parse: {err}"))
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup(name: &str) -> Result<&'static ConfigEntry> {
    manifest()?
        .configs
        .get(name)
        .ok_or_else(|| anyhow!("unknown config fixture '{name}'"))
}

pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = manifest()
            .map(|m| m.configs.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Raw JSON text of a config fixture.
    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(name)?.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        super::load_json(lookup(name)?.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(name)?.as_path()))
    }

    /// Trigger kind the fixture is written for, when the manifest names one.
    pub fn trigger(name: &str) -> Result<Option<String>> {
        Ok(lookup(name)?.trigger().map(str::to_string))
    }

    /// Compact attribute text stored under the fixture's `strx` key.
    pub fn strx(name: &str) -> Result<String> {
        let value: serde_json::Value = load(name)?;
        value
            .get("strx")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("config fixture '{name}' has no 'strx' entry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_resolves() {
        let keys = configs::keys();
        assert!(!keys.is_empty());
        for key in keys {
            let value: serde_json::Value = configs::load(&key).unwrap();
            assert!(value.is_object(), "{key} is not an object");
            assert!(configs::path(&key).unwrap().exists());
        }
    }

    #[test]
    fn trigger_tags() {
        assert_eq!(configs::trigger("scroll-parallax").unwrap().as_deref(), Some("scroll"));
        assert_eq!(configs::trigger("plain-attribute").unwrap(), None);
        assert!(configs::strx("plain-attribute").unwrap().starts_with("translateType:right"));
        assert!(configs::json("missing").is_err());
    }
}
