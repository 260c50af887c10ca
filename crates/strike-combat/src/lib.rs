//! Combat entity registry: maps scene nodes to damageable entities, decides
//! headshots, and applies damage.
//!
//! Entities are decoupled from their visuals. The registry only holds
//! [`NodeId`](strike_scene::NodeId) handles into the scene graph and never
//! keeps scene nodes alive.

mod entity;
mod error;
mod registry;

pub use entity::{DamageContext, DamageReport, DamageableEntity, EntityId, EntityOptions};
pub use error::DamageError;
pub use registry::{DamageSystem, HEADSHOT_RATIO_MAX, HEADSHOT_RATIO_MIN};
