use crate::EntityId;

/// Why a damage request had no effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DamageError {
    /// The id is unknown, was unregistered, or the entity is already dead.
    #[error("no entity {0}")]
    NoEntity(EntityId),
}

impl DamageError {
    /// Short machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            DamageError::NoEntity(_) => "no_entity",
        }
    }
}
