pub mod camera;
pub mod config;
pub mod enemy;
pub mod physics;
pub mod projectile;
pub mod stage;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use owlrun_core::events::{DeathCause, SimEvent};
use owlrun_core::geometry::{is_stomp_collision, overlaps};
use owlrun_core::input::InputState;
use owlrun_core::platform::Platform;
use owlrun_core::sim_trait::FrameSimulation;
use owlrun_core::time::{SimClock, frame_factor};

use config::{ConfigError, SimConfig};
use enemy::{Enemy, EnemyContext, update_enemies};
use physics::{PlayerState, STOMP_BOUNCE_FACTOR};
use projectile::{Projectile, ProjectileEvent, shoot_fireball, update_projectiles};

/// Everything a frame can change, for comparisons and debugging dumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub player: PlayerState,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub camera_offset: f32,
    pub last_fireball: Option<f32>,
    pub input: InputState,
}

/// The level simulation: one player, static platforms, enemies, and the
/// projectiles in flight.
///
/// The host calls [`World::update`] once per rendered frame and reads the
/// accessors to draw. Input is written through [`World::input_mut`].
pub struct World {
    config: SimConfig,
    platforms: Vec<Platform>,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    player: PlayerState,
    input: InputState,
    camera_offset: f32,
    clock: SimClock,
    /// Simulation time of the last fireball, `None` until one is fired.
    last_fireball: Option<f32>,
    /// Jump key state seen last frame; jumps trigger on the press edge.
    jump_held: bool,
    rng: StdRng,
}

impl World {
    /// Build a world from a validated config and a level layout.
    pub fn new(
        config: SimConfig,
        platforms: Vec<Platform>,
        enemies: Vec<Enemy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        for (index, platform) in platforms.iter().enumerate() {
            platform
                .rect
                .validate()
                .map_err(|source| ConfigError::InvalidEntity {
                    kind: "platform",
                    index,
                    source,
                })?;
        }
        for (index, enemy) in enemies.iter().enumerate() {
            enemy
                .rect
                .validate()
                .map_err(|source| ConfigError::InvalidEntity {
                    kind: "enemy",
                    index,
                    source,
                })?;
        }

        Ok(Self {
            player: PlayerState::new(&config.player),
            rng: StdRng::seed_from_u64(config.rng_seed),
            config,
            platforms,
            enemies,
            projectiles: Vec::new(),
            input: InputState::default(),
            camera_offset: 0.0,
            clock: SimClock::new(),
            last_fireball: None,
            jump_held: false,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn camera_offset(&self) -> f32 {
        self.camera_offset
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.now()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Add a projectile from outside the simulation, e.g. a scripted hazard.
    pub fn spawn_projectile(&mut self, projectile: Projectile) -> Result<(), ConfigError> {
        projectile
            .rect
            .validate()
            .map_err(|source| ConfigError::InvalidEntity {
                kind: "projectile",
                index: self.projectiles.len(),
                source,
            })?;
        self.projectiles.push(projectile);
        Ok(())
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            player: self.player.clone(),
            enemies: self.enemies.clone(),
            projectiles: self.projectiles.clone(),
            camera_offset: self.camera_offset,
            last_fireball: self.last_fireball,
            input: self.input,
        }
    }

    /// Advance the world by `delta_time` seconds and return what happened.
    ///
    /// Non-finite or non-positive deltas do nothing; deltas above
    /// `max_delta` are clamped.
    pub fn update(&mut self, viewport_width: f32, delta_time: f32) -> Vec<SimEvent> {
        let dt = if delta_time.is_finite() {
            delta_time.clamp(0.0, self.config.world.max_delta)
        } else {
            0.0
        };
        if dt == 0.0 {
            return Vec::new();
        }
        let viewport_width = if viewport_width.is_finite() {
            viewport_width.max(0.0)
        } else {
            0.0
        };

        self.clock.advance(dt);
        let frames = frame_factor(dt);
        let now = self.clock.now();
        let mut events = Vec::new();

        // 1-3: input
        physics::apply_movement(
            &mut self.player,
            self.input.move_dir(),
            frames,
            self.config.world.width,
        );
        if self.input.jump
            && !self.jump_held
            && let Some(jump) = physics::try_jump(&mut self.player)
        {
            events.push(jump);
        }
        self.jump_held = self.input.jump;
        if self.input.fire {
            self.fire(now, &mut events);
        }

        // 4-6: player physics and camera
        let prev_bottom = self.player.rect.bottom();
        physics::integrate_gravity(&mut self.player, self.config.world.gravity, frames);
        if let Some(landing) = physics::resolve_platforms(
            &mut self.player,
            &self.platforms,
            prev_bottom,
            self.config.world.landing_tolerance,
            self.config.world.hard_landing_speed,
        ) {
            events.push(landing);
        }
        self.camera_offset = camera::follow(
            self.camera_offset,
            self.player.rect.x,
            viewport_width,
            self.config.world.width,
            self.config.world.camera_left,
            self.config.world.camera_right,
        );

        // 7-9: win and death checks
        if self.player.rect.x >= self.config.world.width - self.player.rect.width {
            self.win(&mut events);
        }
        self.check_enemy_contacts(&mut events);
        if self.player.rect.y > self.config.world.height - self.config.world.fall_buffer {
            self.die(DeathCause::Fall, &mut events);
        }

        // 10-11: everything else
        let ctx = EnemyContext {
            player: &self.player.rect,
            platforms: &self.platforms,
            gravity: self.config.world.gravity,
            world_width: self.config.world.width,
            frames,
            now,
        };
        update_enemies(&mut self.enemies, &ctx, &mut self.projectiles, &mut self.rng);

        let hits = update_projectiles(
            &mut self.projectiles,
            &self.platforms,
            &mut self.enemies,
            &self.player,
            self.config.world.gravity,
            self.config.world.width,
            self.config.world.visible_height,
            frames,
        );
        let mut player_hit = false;
        for hit in hits {
            match hit {
                ProjectileEvent::EnemyKilled(enemy) => {
                    tracing::debug!(enemy, "fireball killed enemy");
                    events.push(SimEvent::EnemyShot { enemy });
                },
                ProjectileEvent::PlayerHit => player_hit = true,
            }
        }
        if player_hit {
            self.die(DeathCause::Projectile, &mut events);
        }

        events
    }

    /// Put every dynamic entity back into its starting state. Enemies keep
    /// their current positions.
    pub fn reset(&mut self) {
        self.player.respawn(&self.config.player);
        self.camera_offset = 0.0;
        self.projectiles.clear();
        for enemy in &mut self.enemies {
            enemy.reset_transient();
        }
        self.last_fireball = None;
        // A jump key held through the reset must be released before it fires again.
        self.jump_held = self.input.jump;
    }

    fn die(&mut self, cause: DeathCause, events: &mut Vec<SimEvent>) {
        tracing::debug!(?cause, "player died, resetting world");
        self.reset();
        events.push(SimEvent::PlayerDied { cause });
    }

    fn win(&mut self, events: &mut Vec<SimEvent>) {
        tracing::info!(elapsed = self.clock.now(), "level complete");
        self.player.respawn(&self.config.player);
        self.input.clear();
        self.jump_held = false;
        self.camera_offset = 0.0;
        events.push(SimEvent::LevelWon);
    }

    fn fire(&mut self, now: f32, events: &mut Vec<SimEvent>) {
        let fired = shoot_fireball(
            &self.player,
            &mut self.projectiles,
            self.player.facing,
            self.last_fireball,
            self.config.world.fireball_cooldown,
            now,
        );
        if fired != self.last_fireball {
            events.push(SimEvent::FireballFired);
        }
        self.last_fireball = fired;
    }

    fn check_enemy_contacts(&mut self, events: &mut Vec<SimEvent>) {
        let mut killed_by_enemy = false;
        for (index, enemy) in self.enemies.iter_mut().enumerate() {
            if !enemy.alive || !overlaps(&self.player.rect, &enemy.rect) {
                continue;
            }
            if is_stomp_collision(&self.player.rect, self.player.vy, &enemy.rect) {
                enemy.alive = false;
                self.player.vy = self.player.jump_force * STOMP_BOUNCE_FACTOR;
                tracing::debug!(enemy = index, "enemy stomped");
                events.push(SimEvent::EnemyStomped { enemy: index });
            } else {
                killed_by_enemy = true;
                break;
            }
        }
        if killed_by_enemy {
            self.die(DeathCause::Enemy, events);
        }
    }
}

impl FrameSimulation for World {
    type Event = SimEvent;
    type Snapshot = WorldSnapshot;

    fn update(&mut self, viewport_width: f32, dt: f32) -> Vec<SimEvent> {
        World::update(self, viewport_width, dt)
    }

    fn reset(&mut self) {
        World::reset(self);
    }

    fn camera_offset(&self) -> f32 {
        self.camera_offset
    }

    fn elapsed(&self) -> f32 {
        self.clock.now()
    }

    fn snapshot(&self) -> WorldSnapshot {
        World::snapshot(self)
    }
}
