use serde::{Deserialize, Serialize};

use owlrun_core::geometry::{Rect, RectError};

/// Gravity acceleration per 60 Hz frame (downward).
pub const GRAVITY: f32 = 0.5;
/// World width in units.
pub const WORLD_WIDTH: f32 = 5000.0;
/// World height in units.
pub const WORLD_HEIGHT: f32 = 800.0;
/// Height of the visible play area; projectiles below it are evicted.
pub const VISIBLE_HEIGHT: f32 = 600.0;
/// Distance above the world bottom past which a falling player dies.
pub const FALL_BUFFER: f32 = 100.0;
/// Longest frame the simulation will integrate in one step (seconds).
pub const MAX_DELTA: f32 = 0.1;
/// Seconds between player fireballs.
pub const FIREBALL_COOLDOWN: f32 = 0.5;

/// Persistent settings for one play session, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: f32,
    pub width: f32,
    pub height: f32,
    pub visible_height: f32,
    pub fall_buffer: f32,
    pub max_delta: f32,
    pub fireball_cooldown: f32,
    /// Camera scrolls left once the player is closer than this fraction of
    /// the viewport to its left edge.
    pub camera_left: f32,
    /// Camera scrolls right once the player is further than this fraction of
    /// the viewport from its left edge.
    pub camera_right: f32,
    /// Landing speed above which a `PlatformLandedHard` event is emitted.
    pub hard_landing_speed: f32,
    /// A falling player whose feet are at most this far into a platform top
    /// always lands on it.
    pub landing_tolerance: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            visible_height: VISIBLE_HEIGHT,
            fall_buffer: FALL_BUFFER,
            max_delta: MAX_DELTA,
            fireball_cooldown: FIREBALL_COOLDOWN,
            camera_left: 0.25,
            camera_right: 0.5,
            hard_landing_speed: 12.0,
            landing_tolerance: 16.0,
        }
    }
}

/// Player body and movement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Horizontal units per 60 Hz frame.
    pub speed: f32,
    /// Upward impulse of a ground jump (negative is up).
    pub jump_force: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 64.0,
            height: 64.0,
            spawn_x: 50.0,
            spawn_y: 100.0,
            speed: 5.0,
            jump_force: -15.0,
        }
    }
}

impl PlayerConfig {
    pub fn spawn_rect(&self) -> Rect {
        Rect::new(self.spawn_x, self.spawn_y, self.width, self.height)
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the enemy behaviour RNG.
    pub rng_seed: u64,
    pub world: WorldConfig,
    pub player: PlayerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

/// Why a configuration or level was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A quantity that must be a positive finite number was not.
    NotPositive { field: &'static str, value: f32 },
    /// Camera thresholds must satisfy `0 <= left <= right <= 1`.
    CameraZone { left: f32, right: f32 },
    SpawnOutsideWorld { x: f32, y: f32 },
    /// A platform, enemy, or the player has invalid geometry.
    InvalidEntity {
        kind: &'static str,
        index: usize,
        source: RectError,
    },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be a positive finite number, got {value}")
            },
            Self::CameraZone { left, right } => write!(
                f,
                "camera thresholds must satisfy 0 <= left <= right <= 1, got left={left} right={right}"
            ),
            Self::SpawnOutsideWorld { x, y } => {
                write!(f, "player spawn ({x}, {y}) lies outside the world")
            },
            Self::InvalidEntity {
                kind,
                index,
                source,
            } => write!(f, "{kind} #{index}: {source}"),
            Self::Parse(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidEntity { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl SimConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing, unparseable, or fails validation.
    pub fn load() -> Self {
        let path = std::env::var("OWLRUN_CONFIG").unwrap_or_else(|_| "config/owlrun.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    SimConfig::default()
                },
            },
            Err(_) => SimConfig::default(),
        }
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        require_positive("world.gravity", w.gravity)?;
        require_positive("world.width", w.width)?;
        require_positive("world.height", w.height)?;
        require_positive("world.visible_height", w.visible_height)?;
        require_positive("world.max_delta", w.max_delta)?;
        require_positive("world.fireball_cooldown", w.fireball_cooldown)?;
        require_positive("world.hard_landing_speed", w.hard_landing_speed)?;
        if !(w.fall_buffer.is_finite() && w.fall_buffer >= 0.0) {
            return Err(ConfigError::NotPositive {
                field: "world.fall_buffer",
                value: w.fall_buffer,
            });
        }
        if !(w.landing_tolerance.is_finite() && w.landing_tolerance >= 0.0) {
            return Err(ConfigError::NotPositive {
                field: "world.landing_tolerance",
                value: w.landing_tolerance,
            });
        }
        if !(0.0..=1.0).contains(&w.camera_left)
            || !(0.0..=1.0).contains(&w.camera_right)
            || w.camera_left > w.camera_right
        {
            return Err(ConfigError::CameraZone {
                left: w.camera_left,
                right: w.camera_right,
            });
        }

        let p = &self.player;
        require_positive("player.speed", p.speed)?;
        if !(p.jump_force.is_finite() && p.jump_force < 0.0) {
            return Err(ConfigError::NotPositive {
                field: "player.jump_force (magnitude, upward)",
                value: p.jump_force,
            });
        }
        p.spawn_rect()
            .validate()
            .map_err(|source| ConfigError::InvalidEntity {
                kind: "player",
                index: 0,
                source,
            })?;
        if p.spawn_x < 0.0 || p.spawn_x + p.width > w.width || p.spawn_y + p.height > w.height {
            return Err(ConfigError::SpawnOutsideWorld {
                x: p.spawn_x,
                y: p.spawn_y,
            });
        }
        Ok(())
    }
}
