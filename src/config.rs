use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_generation() -> String {
    "static-v1".to_string()
}

fn default_manifest() -> Vec<String> {
    vec![
        "/index.html".to_string(),
        "/styles.css".to_string(),
        "/app.js".to_string(),
        "/manifest.json".to_string(),
        "/icons/icon-192.png".to_string(),
        "/icons/icon-512.png".to_string(),
    ]
}

fn default_fallback_document() -> String {
    "/index.html".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".hepascore-cache")
}

/// Asset cache configuration, injected at startup.
///
/// The generation id is an opaque string; changing it is the sole mechanism
/// for invalidating previously stored assets and forcing re-provisioning.
/// The manifest lists root-relative resource paths and is configuration,
/// not logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_generation")]
    pub generation: String,

    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,

    /// Document served when a navigation fetch fails offline.
    #[serde(default = "default_fallback_document")]
    pub fallback_document: String,

    /// Directory holding the cache generations.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            generation: default_generation(),
            manifest: default_manifest(),
            fallback_document: default_fallback_document(),
            root: default_root(),
        }
    }
}

impl CacheConfig {
    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read cache config {:?}", path))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse cache config {:?}", path))?;
        config
            .validate()
            .map_err(|reason| anyhow::anyhow!("invalid cache config {:?}: {}", path, reason))?;
        Ok(config)
    }

    fn collect_validations(&self) -> Vec<Result<(), String>> {
        vec![
            Self::validate_generation(&self.generation),
            Self::validate_manifest(&self.manifest),
            self.validate_fallback(),
        ]
    }

    fn validate_generation(generation: &str) -> Result<(), String> {
        if generation.is_empty() {
            return Err("generation id must not be empty".to_string());
        }
        if generation.contains(['/', '\\']) {
            return Err(format!(
                "generation id '{}' must not contain path separators",
                generation
            ));
        }
        Ok(())
    }

    fn validate_manifest(manifest: &[String]) -> Result<(), String> {
        if manifest.is_empty() {
            return Err("manifest must list at least one asset".to_string());
        }
        for path in manifest {
            if !path.starts_with('/') {
                return Err(format!("manifest path '{}' must be root-relative", path));
            }
        }
        Ok(())
    }

    // The fallback can only be served from the cache, so it must be part of
    // what provisioning stores.
    fn validate_fallback(&self) -> Result<(), String> {
        if self.manifest.contains(&self.fallback_document) {
            Ok(())
        } else {
            Err(format!(
                "fallback document '{}' is not in the manifest",
                self.fallback_document
            ))
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for validation in self.collect_validations() {
            validation?;
        }
        Ok(())
    }
}
