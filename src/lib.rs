// Export modules for library usage
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod score;

// Re-export commonly used types
pub use crate::cache::{
    AssetCache, CacheStats, CacheStore, Destination, FsOrigin, Method, Origin, Request, Response,
    ResponseKind, ServeSource, ServedResponse,
};
pub use crate::config::CacheConfig;
pub use crate::errors::{FetchError, ScoreError};
pub use crate::score::{
    compute_score, tier_for, Gender, LabInput, RiskTier, ScoreResult, ScoreVariant, RISK_TIERS,
    SCORE_MAX, SCORE_MIN,
};
