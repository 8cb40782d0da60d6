use serde::{Deserialize, Serialize};

/// What ended the player's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathCause {
    /// Touched a living enemy anywhere but from above.
    Enemy,
    /// Fell below the bottom of the world.
    Fall,
    /// Hit by a thrown projectile.
    Projectile,
}

/// Discrete notifications emitted by a simulation frame.
///
/// Audio and visual effect layers subscribe to these; they are not part of
/// the simulation state and dropping them has no effect on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    #[serde(rename = "jump")]
    Jump,
    #[serde(rename = "double_jump")]
    DoubleJump,
    #[serde(rename = "fireball_fired")]
    FireballFired,
    #[serde(rename = "enemy_stomped")]
    EnemyStomped { enemy: usize },
    #[serde(rename = "enemy_shot")]
    EnemyShot { enemy: usize },
    #[serde(rename = "player_died")]
    PlayerDied { cause: DeathCause },
    #[serde(rename = "platform_landed_hard")]
    PlatformLandedHard { impact_speed: f32 },
    #[serde(rename = "level_won")]
    LevelWon,
}

impl SimEvent {
    /// Stable name used by sound tables and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jump => "jump",
            Self::DoubleJump => "double_jump",
            Self::FireballFired => "fireball_fired",
            Self::EnemyStomped { .. } => "enemy_stomped",
            Self::EnemyShot { .. } => "enemy_shot",
            Self::PlayerDied { .. } => "player_died",
            Self::PlatformLandedHard { .. } => "platform_landed_hard",
            Self::LevelWon => "level_won",
        }
    }

    pub fn is_death(&self) -> bool {
        matches!(self, Self::PlayerDied { .. })
    }
}
