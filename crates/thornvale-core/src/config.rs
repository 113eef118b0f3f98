//! Combat and LLM tuning configuration
//!
//! Loaded from JSON at startup, falls back to defaults if no config file
//! exists. A `ConfigHandle` supports atomic reload from an admin signal
//! (SIGHUP in the gateway binary) without interrupting readers.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Tunable combat math, mirrored from the ops-managed JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombatConfig {
    pub skill_divisor: f64,
    pub might_divisor: f64,
    pub agility_divisor: f64,
    pub mixed_attribute_divisor: f64,
    pub roll_divisor: f64,
    pub critical_failure_threshold: i32,
    pub critical_hit_base_threshold: i32,
    pub cunning_bonus_divisor: f64,
    pub heavy_attack_bonus: f64,
    pub critical_multiplier: f64,
    pub critical_ignore_armor: bool,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            skill_divisor: 4.0,
            might_divisor: 3.0,
            agility_divisor: 3.0,
            mixed_attribute_divisor: 6.0,
            roll_divisor: 2.0,
            critical_failure_threshold: 5,
            critical_hit_base_threshold: 95,
            cunning_bonus_divisor: 10.0,
            heavy_attack_bonus: 1.5,
            critical_multiplier: 2.0,
            critical_ignore_armor: true,
        }
    }
}

impl CombatConfig {
    /// Load config from a JSON file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded combat config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No combat config at {} - using defaults", path.display());
                Self::default()
            }
        }
    }
}

/// Shared handle to the live config. Readers take a cheap `Arc` snapshot;
/// reload swaps the whole config atomically.
#[derive(Clone)]
pub struct ConfigHandle {
    current: Arc<RwLock<Arc<CombatConfig>>>,
}

impl ConfigHandle {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    pub fn load(path: &Path) -> Self {
        Self::new(CombatConfig::load(path))
    }

    /// Snapshot of the current config. The snapshot stays valid across
    /// reloads; callers re-read per operation.
    pub fn get(&self) -> Arc<CombatConfig> {
        self.current
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Re-read the file and swap the config in one step.
    pub fn reload(&self, path: &Path) {
        let fresh = Arc::new(CombatConfig::load(path));
        if let Ok(mut guard) = self.current.write() {
            *guard = fresh;
            tracing::info!("Combat config reloaded");
        }
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}
