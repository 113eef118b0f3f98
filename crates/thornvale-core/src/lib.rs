//! Thornvale Core - shared ids, character model, wire types, and configuration

pub mod config;
pub mod damage;
pub mod error;
pub mod ids;
pub mod types;

pub use config::{CombatConfig, ConfigHandle};
pub use error::{Error, Result};
pub use ids::EntityId;
pub use types::*;
