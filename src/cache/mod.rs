//! Offline-first asset cache: a cache-first policy ([`AssetCache`]) over a
//! generation-scoped filesystem store ([`CacheStore`]) and an [`Origin`]
//! standing in for the network.

pub mod fetch;
pub mod proxy;
pub mod store;

pub use fetch::{Destination, FsOrigin, Method, Origin, Request, Response, ResponseKind};
pub use proxy::{AssetCache, ServeSource, ServedResponse};
pub use store::{CacheStats, CacheStore};
