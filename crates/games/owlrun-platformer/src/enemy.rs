use rand::Rng;
use serde::{Deserialize, Serialize};

use owlrun_core::geometry::{Rect, overlaps};
use owlrun_core::platform::{Platform, supported_at};
use owlrun_core::time::cooldown_elapsed;

use crate::projectile::{Projectile, ProjectileKind};

/// Enemy body side length.
pub const ENEMY_SIZE: f32 = 64.0;
/// Default patrol speed per 60 Hz frame.
pub const ENEMY_SPEED: f32 = 2.0;
/// How far a platform top may sit from an enemy's feet and still carry it.
pub const SUPPORT_TOLERANCE: f32 = 1.0;
/// Chance per 60 Hz frame that a grounded jumper near the player jumps.
pub const JUMP_CHANCE: f64 = 0.02;
/// Side length of a thrown projectile.
pub const THROWN_SIZE: f32 = 15.0;
/// Horizontal speed of a thrown projectile.
pub const THROW_SPEED: f32 = 7.0;
/// Launch speed along the throw angle.
pub const THROW_LAUNCH: f32 = 10.0;
/// Throw angle in degrees (negative is up).
pub const THROW_ANGLE_DEG: f32 = -45.0;

/// Behaviour-specific data for each enemy kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Archetype {
    /// Patrols its platform. With a chase range it turns toward a nearby player.
    Walker { chase_range: Option<f32> },
    /// Walker that randomly hops while the player is close.
    Jumper { jump_force: f32, detection_range: f32 },
    /// Ignores gravity and bobs on a sine wave around `initial_y`.
    Flyer {
        amplitude: f32,
        /// Radians per 60 Hz frame.
        frequency: f32,
        initial_y: f32,
        time: f32,
    },
    /// Walker that lobs projectiles at the player.
    Thrower {
        /// Seconds between throws.
        cooldown: f32,
        range: f32,
        last_throw: Option<f32>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub alive: bool,
    pub speed: f32,
    /// -1 (left) or +1 (right).
    pub direction: f32,
    pub vy: f32,
    pub grounded: bool,
    pub archetype: Archetype,
}

/// Read-only world state an enemy reacts to during one step.
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext<'a> {
    pub player: &'a Rect,
    pub platforms: &'a [Platform],
    pub gravity: f32,
    pub world_width: f32,
    /// Number of 60 Hz tuning steps this frame covers.
    pub frames: f32,
    /// Simulation clock in seconds.
    pub now: f32,
}

/// The other enemies, split around the one being updated.
#[derive(Debug, Clone, Copy)]
pub struct Neighbours<'a> {
    pub before: &'a [Enemy],
    pub after: &'a [Enemy],
}

impl<'a> Neighbours<'a> {
    pub const NONE: Neighbours<'static> = Neighbours {
        before: &[],
        after: &[],
    };

    pub fn iter(&self) -> impl Iterator<Item = &'a Enemy> {
        self.before.iter().chain(self.after.iter())
    }
}

impl Enemy {
    fn base(x: f32, y: f32, archetype: Archetype) -> Self {
        Self {
            rect: Rect::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
            alive: true,
            speed: ENEMY_SPEED,
            direction: 1.0,
            vy: 0.0,
            grounded: false,
            archetype,
        }
    }

    pub fn walker(x: f32, y: f32) -> Self {
        Self::base(x, y, Archetype::Walker { chase_range: None })
    }

    pub fn jumper(x: f32, y: f32) -> Self {
        Self::base(
            x,
            y,
            Archetype::Jumper {
                jump_force: -12.0,
                detection_range: 300.0,
            },
        )
    }

    pub fn flyer(x: f32, y: f32) -> Self {
        Self::base(
            x,
            y,
            Archetype::Flyer {
                amplitude: 100.0,
                frequency: 0.02,
                initial_y: y,
                time: 0.0,
            },
        )
    }

    pub fn thrower(x: f32, y: f32) -> Self {
        Self::base(
            x,
            y,
            Archetype::Thrower {
                cooldown: 2.0,
                range: 400.0,
                last_throw: None,
            },
        )
    }

    pub fn with_direction(mut self, direction: f32) -> Self {
        self.direction = if direction < 0.0 { -1.0 } else { 1.0 };
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Make a walker turn toward a player closer than `range`. No effect on
    /// other archetypes.
    pub fn with_chase_range(mut self, range: f32) -> Self {
        if let Archetype::Walker { chase_range } = &mut self.archetype {
            *chase_range = Some(range);
        }
        self
    }

    /// Revive and clear per-run motion state. Position, tuning, and ranges
    /// are left as they are.
    pub fn reset_transient(&mut self) {
        self.alive = true;
        self.vy = 0.0;
        self.grounded = false;
        match &mut self.archetype {
            Archetype::Flyer { time, .. } => *time = 0.0,
            Archetype::Thrower { last_throw, .. } => *last_throw = None,
            Archetype::Walker { .. } | Archetype::Jumper { .. } => {},
        }
    }

    /// Advance one step. Dead enemies do nothing.
    pub fn update(
        &mut self,
        neighbours: Neighbours<'_>,
        ctx: &EnemyContext<'_>,
        projectiles: &mut Vec<Projectile>,
        rng: &mut impl Rng,
    ) {
        if !self.alive {
            return;
        }
        match self.archetype {
            Archetype::Flyer { .. } => self.update_flyer(neighbours, ctx),
            _ => {
                self.apply_ground_physics(ctx);
                self.patrol(ctx);
                self.avoid_neighbours(neighbours, ctx.frames);
                self.rect.x += self.speed * self.direction * ctx.frames;
            },
        }

        match &mut self.archetype {
            Archetype::Jumper {
                jump_force,
                detection_range,
            } => {
                let in_range = (self.rect.x - ctx.player.x).abs() < *detection_range;
                let chance = (1.0 - (1.0 - JUMP_CHANCE).powf(f64::from(ctx.frames))).clamp(0.0, 1.0);
                if self.grounded && in_range && rng.random_bool(chance) {
                    self.vy = *jump_force;
                    self.grounded = false;
                }
            },
            Archetype::Thrower {
                cooldown,
                range,
                last_throw,
            } => {
                let in_range = (self.rect.x - ctx.player.x).abs() < *range;
                if in_range && cooldown_elapsed(*last_throw, *cooldown, ctx.now) {
                    projectiles.push(thrown_projectile(&self.rect, ctx.player));
                    *last_throw = Some(ctx.now);
                }
            },
            Archetype::Walker { .. } | Archetype::Flyer { .. } => {},
        }
    }

    fn apply_ground_physics(&mut self, ctx: &EnemyContext<'_>) {
        self.vy += ctx.gravity * ctx.frames;
        self.rect.y += self.vy * ctx.frames;
        self.grounded = false;
        for platform in ctx.platforms {
            // Only land on a top face: the enemy's centre must be above it.
            if self.vy >= 0.0
                && overlaps(&self.rect, &platform.rect)
                && self.rect.center_y() < platform.top()
            {
                self.rect.y = platform.top() - self.rect.height;
                self.vy = 0.0;
                self.grounded = true;
            }
        }
    }

    /// Whether the step in `direction` keeps the leading foot on a platform.
    fn step_supported(&self, direction: f32, ctx: &EnemyContext<'_>) -> bool {
        let next_x = self.rect.x + self.speed * direction * ctx.frames;
        let leading_right = direction > 0.0;
        let foot_x = if leading_right {
            next_x + self.rect.width
        } else {
            next_x
        };
        supported_at(
            ctx.platforms,
            foot_x,
            self.rect.bottom(),
            SUPPORT_TOLERANCE,
            leading_right,
        )
    }

    fn patrol(&mut self, ctx: &EnemyContext<'_>) {
        if !self.grounded {
            return;
        }

        if let Archetype::Walker {
            chase_range: Some(range),
        } = self.archetype
        {
            let dx = ctx.player.center_x() - self.rect.center_x();
            let dy = ctx.player.center_y() - self.rect.center_y();
            if dx.abs() < range && dy.abs() < self.rect.height && dx != 0.0 {
                let toward = dx.signum();
                if toward != self.direction && self.step_supported(toward, ctx) {
                    self.direction = toward;
                }
            }
        }

        if !self.step_supported(self.direction, ctx) {
            self.direction = -self.direction;
        }

        let next = self
            .rect
            .with_x(self.rect.x + self.speed * self.direction * ctx.frames);
        if ctx.platforms.iter().any(|p| overlaps(&next, &p.rect)) {
            self.direction = -self.direction;
        }
    }

    fn avoid_neighbours(&mut self, neighbours: Neighbours<'_>, frames: f32) {
        let next = self
            .rect
            .with_x(self.rect.x + self.speed * self.direction * frames);
        if neighbours
            .iter()
            .any(|other| other.alive && overlaps(&next, &other.rect))
        {
            self.direction = -self.direction;
        }
    }

    fn update_flyer(&mut self, neighbours: Neighbours<'_>, ctx: &EnemyContext<'_>) {
        self.avoid_neighbours(neighbours, ctx.frames);
        self.rect.x += self.speed * self.direction * ctx.frames;
        if self.rect.x <= 0.0 {
            self.direction = 1.0;
        } else if self.rect.right() >= ctx.world_width {
            self.direction = -1.0;
        }

        if let Archetype::Flyer {
            amplitude,
            frequency,
            initial_y,
            time,
        } = &mut self.archetype
        {
            *time += *frequency * ctx.frames;
            self.rect.y = *initial_y + time.sin() * *amplitude;
        }
    }
}

fn thrown_projectile(thrower: &Rect, player: &Rect) -> Projectile {
    let vx = if player.x > thrower.x {
        THROW_SPEED
    } else {
        -THROW_SPEED
    };
    let vy = THROW_ANGLE_DEG.to_radians().sin() * THROW_LAUNCH;
    let rect = Rect::new(
        thrower.center_x() - THROWN_SIZE / 2.0,
        thrower.center_y() - THROWN_SIZE / 2.0,
        THROWN_SIZE,
        THROWN_SIZE,
    );
    Projectile::new(rect, vx, vy, ProjectileKind::Hostile)
}

/// Update every enemy in order. Each one sees its neighbours as already
/// updated earlier in the same frame.
pub fn update_enemies(
    enemies: &mut [Enemy],
    ctx: &EnemyContext<'_>,
    projectiles: &mut Vec<Projectile>,
    rng: &mut impl Rng,
) {
    for i in 0..enemies.len() {
        let (before, rest) = enemies.split_at_mut(i);
        let Some((current, after)) = rest.split_first_mut() else {
            break;
        };
        let neighbours = Neighbours {
            before: &*before,
            after: &*after,
        };
        current.update(neighbours, ctx, projectiles, &mut *rng);
    }
}
