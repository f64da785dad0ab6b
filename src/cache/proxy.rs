//! The cache-first serving policy over one store generation and an origin.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};

use super::fetch::{Origin, Request, Response};
use super::store::{CacheStats, CacheStore};
use crate::config::CacheConfig;

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeSource {
    /// Cache hit in the current generation.
    Cache,
    /// Cache miss satisfied by the origin.
    Network,
    /// Navigation that fell back to the cached root document.
    Fallback,
    /// Non-GET pass-through; the store was never consulted.
    Origin,
}

/// A response plus its provenance, for callers and logs.
#[derive(Debug, Clone)]
pub struct ServedResponse {
    pub response: Response,
    pub source: ServeSource,
}

/// Offline-first asset cache: a fixed manifest provisioned into one store
/// generation, supplemented opportunistically on read-through, with a
/// single fallback document for failed navigations.
pub struct AssetCache<O: Origin> {
    config: CacheConfig,
    store: CacheStore,
    origin: O,
}

impl<O: Origin> AssetCache<O> {
    /// Open the current generation under the configured root.
    pub fn open(config: CacheConfig, origin: O) -> Result<Self> {
        config
            .validate()
            .map_err(|reason| anyhow!("invalid cache config: {}", reason))?;
        let store = CacheStore::open(&config.root, &config.generation)?;
        Ok(Self {
            config,
            store,
            origin,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn origin(&self) -> &O {
        &self.origin
    }

    pub fn origin_mut(&mut self) -> &mut O {
        &mut self.origin
    }

    pub fn is_provisioned(&self) -> bool {
        self.store.is_provisioned()
    }

    /// Fetch and store every manifest entry, then mark the generation
    /// provisioned. Any entry that cannot be fetched aborts the whole
    /// provision; a partial manifest must not look complete.
    pub fn provision(&mut self) -> Result<()> {
        for path in self.config.manifest.clone() {
            let request = Request::get(path.as_str());
            let response = self
                .origin
                .fetch(&request)
                .with_context(|| format!("provisioning fetch failed for {}", path))?;
            if response.status != 200 {
                anyhow::bail!(
                    "provisioning {} got status {}, generation {} not marked ready",
                    path,
                    response.status,
                    self.config.generation
                );
            }
            self.store
                .put(&path, &response)
                .with_context(|| format!("provisioning store failed for {}", path))?;
            debug!("provisioned {} into generation {}", path, self.config.generation);
        }

        self.store.mark_provisioned()?;
        info!(
            "generation {} provisioned with {} entries",
            self.config.generation,
            self.config.manifest.len()
        );
        Ok(())
    }

    /// Delete every generation under the root except the current one and
    /// return how many were removed. Run before this generation starts
    /// answering serves, so nothing is served from a doomed generation.
    pub fn promote(&self) -> Result<usize> {
        let mut deleted = 0;
        for generation in CacheStore::list_generations(&self.config.root)? {
            if generation != self.config.generation {
                CacheStore::delete_generation(&self.config.root, &generation)?;
                info!("deleted stale cache generation {}", generation);
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Serve one intercepted request, cache-first.
    ///
    /// Non-GET requests pass straight through to the origin; the store is
    /// read/append-only and never mutated by non-idempotent methods. A
    /// failed read-through store is logged and swallowed so caching stays
    /// best-effort. A failed navigation fetch degrades to the cached
    /// fallback document; any other fetch failure surfaces.
    pub fn serve(&mut self, request: &Request) -> Result<ServedResponse> {
        if !request.method.is_get() {
            let response = self
                .origin
                .fetch(request)
                .with_context(|| format!("pass-through fetch failed for {}", request.path))?;
            return Ok(ServedResponse {
                response,
                source: ServeSource::Origin,
            });
        }

        if let Some(response) = self.store.get(&request.path) {
            debug!("cache hit for {}", request.path);
            return Ok(ServedResponse {
                response,
                source: ServeSource::Cache,
            });
        }

        match self.origin.fetch(request) {
            Ok(response) => {
                if response.is_cacheable() {
                    if let Err(err) = self.store.put(&request.path, &response) {
                        warn!("read-through store failed for {}: {:#}", request.path, err);
                    }
                }
                Ok(ServedResponse {
                    response,
                    source: ServeSource::Network,
                })
            }
            Err(err) => {
                if request.is_navigation() {
                    if let Some(fallback) = self.store.get(&self.config.fallback_document) {
                        info!(
                            "navigation to {} failed offline, serving {}",
                            request.path, self.config.fallback_document
                        );
                        return Ok(ServedResponse {
                            response: fallback,
                            source: ServeSource::Fallback,
                        });
                    }
                }
                Err(err).with_context(|| format!("fetch failed for {}", request.path))
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Generation names currently present under a cache root.
    pub fn generations(root: &Path) -> Result<Vec<String>> {
        CacheStore::list_generations(root)
    }
}
