use std::fmt;

use strike_config::CombatConfig;
use strike_scene::NodeId;

/// Opaque handle to a registered damageable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dmg_{}", self.0)
    }
}

/// Registration parameters for a damageable entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityOptions {
    pub team: String,
    pub max_hp: f32,
    pub height: f32,
    pub headshot_y_ratio: f32,
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self::from(&CombatConfig::default())
    }
}

impl From<&CombatConfig> for EntityOptions {
    fn from(config: &CombatConfig) -> Self {
        Self {
            team: "neutral".to_string(),
            max_hp: config.max_hp,
            height: config.height,
            headshot_y_ratio: config.headshot_y_ratio,
        }
    }
}

impl EntityOptions {
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }
}

/// A registered combat participant.
///
/// Invariant: `0 <= hp <= max_hp`. Once `alive` is false the entity is
/// terminal and no further damage changes it.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageableEntity {
    pub id: EntityId,
    /// Root node of the entity's visual. Non-owning.
    pub owner: NodeId,
    pub team: String,
    pub hp: f32,
    pub max_hp: f32,
    pub height: f32,
    pub headshot_y_ratio: f32,
    pub alive: bool,
}

/// Who dealt a hit and how, carried through to the report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DamageContext {
    pub weapon_id: Option<String>,
    pub source_team: Option<String>,
    pub headshot: bool,
}

/// Result of a successful [`apply_damage`](crate::DamageSystem::apply_damage).
#[derive(Clone, Debug, PartialEq)]
pub struct DamageReport {
    /// The entity after the damage was applied.
    pub entity: DamageableEntity,
    /// Damage actually subtracted (never negative).
    pub damage: f32,
    /// True only on the call that took the entity to zero hp.
    pub killed: bool,
    pub context: DamageContext,
}
