//! Ranking constants and the validated settings derived from them.
//!
//! Only the feature width is tunable at runtime. The candidate pools and the
//! display window are product constants.

use crate::error::{AscentError, Result};

/// Default number of query-weighted vocabulary columns compared per query.
pub const DEFAULT_K_FEATURES: usize = 20;

/// Nearest documents considered before the single-best readability re-sort.
pub const SINGLE_BEST_POOL: usize = 10;

/// Nearest documents returned by the windowed display.
pub const WINDOW_POOL: usize = 50;

/// Inclusive lower bound of the visible reverse rank.
pub const WINDOW_START: usize = 22;

/// Exclusive upper bound of the visible reverse rank.
pub const WINDOW_END: usize = 27;

/// Current on-disk artifact format version.
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingConfig {
    pub k_features: usize,
    pub single_best_pool: usize,
    pub window_pool: usize,
    pub window_start: usize,
    pub window_end: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            k_features: DEFAULT_K_FEATURES,
            single_best_pool: SINGLE_BEST_POOL,
            window_pool: WINDOW_POOL,
            window_start: WINDOW_START,
            window_end: WINDOW_END,
        }
    }
}

impl RankingConfig {
    pub fn with_k_features(k_features: usize) -> Self {
        Self { k_features, ..Self::default() }
    }

    /// Reject settings that cannot produce a ranking. Called once at startup.
    pub fn validate(&self) -> Result<()> {
        if self.k_features == 0 {
            return Err(AscentError::Configuration("k_features must be at least 1".into()));
        }
        if self.single_best_pool == 0 || self.window_pool == 0 {
            return Err(AscentError::Configuration("candidate pools must be non-empty".into()));
        }
        if self.window_start >= self.window_end {
            return Err(AscentError::Configuration(format!(
                "window bounds [{}, {}) are empty",
                self.window_start, self.window_end
            )));
        }
        if self.window_end > self.window_pool {
            return Err(AscentError::Configuration(format!(
                "window end {} exceeds window pool {}",
                self.window_end, self.window_pool
            )));
        }
        Ok(())
    }
}
