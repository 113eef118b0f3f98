//! Weapon damage rolls against the tunable combat config
//!
//! Combat resolution itself lives outside the AI core; this module only
//! provides the configured roll math that resolution and the emotion
//! engine's combat events consume.

use crate::config::CombatConfig;
use rand::Rng;

/// Base damage presets for the common weapon tiers.
pub const SHORT_SWORD_BASE: f64 = 6.0;
pub const LONGSWORD_BASE: f64 = 9.0;
pub const GREATSWORD_BASE: f64 = 14.0;

/// Outcome of a single attack roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub damage: f64,
    pub critical: bool,
    pub fumbled: bool,
}

/// Roll damage for one attack. A d100 under `critical_failure_threshold`
/// fumbles for zero; at or above `critical_hit_base_threshold` the result is
/// multiplied by `critical_multiplier`.
pub fn roll_damage<R: Rng>(
    cfg: &CombatConfig,
    weapon_base: f64,
    might: i32,
    cunning: i32,
    rng: &mut R,
) -> DamageRoll {
    let attack: i32 = rng.gen_range(1..=100);

    if attack <= cfg.critical_failure_threshold {
        return DamageRoll {
            damage: 0.0,
            critical: false,
            fumbled: true,
        };
    }

    let variance = rng.gen_range(0.0..(weapon_base / cfg.roll_divisor).max(f64::MIN_POSITIVE));
    let mut damage =
        weapon_base + f64::from(might) / cfg.might_divisor + f64::from(cunning) / cfg.cunning_bonus_divisor + variance;

    let critical = attack >= cfg.critical_hit_base_threshold;
    if critical {
        damage *= cfg.critical_multiplier;
    }

    DamageRoll {
        damage,
        critical,
        fumbled: false,
    }
}

/// Same roll with the heavy-attack bonus applied to the weapon base.
pub fn roll_heavy_damage<R: Rng>(
    cfg: &CombatConfig,
    weapon_base: f64,
    might: i32,
    cunning: i32,
    rng: &mut R,
) -> DamageRoll {
    roll_damage(cfg, weapon_base * cfg.heavy_attack_bonus, might, cunning, rng)
}
