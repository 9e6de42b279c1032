//! Data-driven spawner balance
//!
//! Defaults reproduce the arcade cabinet's timings. Any subset can be
//! overridden from JSON; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

/// Population timer configuration (all intervals in sim-clock ms)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub mud_interval_ms: f64,
    /// Inclusive range of patches per mud burst
    pub mud_per_burst: (u32, u32),
    /// Chance a new patch is giant (quarter canvas wide)
    pub giant_mud_chance: f64,
    /// Mud culler; `None` keeps every patch for the whole run
    pub mud_cull_interval_ms: Option<f64>,
    pub mud_cull_max: u32,

    pub key_interval_ms: f64,
    pub keys_per_burst: (u32, u32),
    pub key_cull_interval_ms: f64,
    /// Upper bound (inclusive) on keys removed per cull
    pub key_cull_max: u32,

    pub crate_interval_ms: f64,
    pub crates_per_burst: (u32, u32),
    pub crate_cull_interval_ms: f64,
    /// Chance a crate cull removes one crate
    pub crate_cull_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            mud_interval_ms: 30_000.0,
            mud_per_burst: (1, 5),
            giant_mud_chance: 0.1,
            mud_cull_interval_ms: None,
            mud_cull_max: 10,

            key_interval_ms: 20_000.0,
            keys_per_burst: (2, 6),
            key_cull_interval_ms: 60_000.0,
            key_cull_max: 10,

            crate_interval_ms: 60_000.0,
            crates_per_burst: (1, 2),
            crate_cull_interval_ms: 40_000.0,
            crate_cull_chance: 0.5,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values that would break the timers or the RNG
    pub fn sanitized(mut self) -> Self {
        let floor = |ms: f64| if ms.is_finite() { ms.max(1.0) } else { 1.0 };
        self.mud_interval_ms = floor(self.mud_interval_ms);
        self.mud_cull_interval_ms = self.mud_cull_interval_ms.map(floor);
        self.key_interval_ms = floor(self.key_interval_ms);
        self.key_cull_interval_ms = floor(self.key_cull_interval_ms);
        self.crate_interval_ms = floor(self.crate_interval_ms);
        self.crate_cull_interval_ms = floor(self.crate_cull_interval_ms);
        self.giant_mud_chance = self.giant_mud_chance.clamp(0.0, 1.0);
        self.crate_cull_chance = self.crate_cull_chance.clamp(0.0, 1.0);
        for range in [
            &mut self.mud_per_burst,
            &mut self.keys_per_burst,
            &mut self.crates_per_burst,
        ] {
            if range.0 > range.1 {
                *range = (range.1, range.0);
            }
        }
        self
    }
}
