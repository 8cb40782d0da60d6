use serde::{Deserialize, Serialize};

use owlrun_core::geometry::{Rect, overlap_extent, overlaps};
use owlrun_core::platform::Platform;
use owlrun_core::time::cooldown_elapsed;

use crate::enemy::Enemy;
use crate::physics::PlayerState;

/// Fireball side length.
pub const FIREBALL_SIZE: f32 = 20.0;
/// Fireball horizontal speed per 60 Hz frame.
pub const FIREBALL_SPEED: f32 = 8.0;
/// Fireball initial vertical velocity (upward).
pub const FIREBALL_LIFT: f32 = -5.0;
/// Fraction of vertical speed kept (and reversed) on a bounce.
pub const BOUNCE_RESTITUTION: f32 = 0.7;
/// Fraction of horizontal speed kept on a bounce.
pub const BOUNCE_FRICTION: f32 = 0.9;
/// Below this speed on both axes a bouncing fireball fizzles out.
pub const REST_SPEED: f32 = 1.0;

/// Who fired a projectile, which decides what it can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Player shot: bounces on platforms, kills enemies.
    Fireball,
    /// Enemy shot: breaks on platforms, hits the player.
    Hostile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    /// Hostile shots hit the player only while armed. Everything the
    /// simulation spawns starts armed; a host adding its own projectiles with
    /// `World::spawn_projectile` may clear this to get a harmless one.
    pub active: bool,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn new(rect: Rect, vx: f32, vy: f32, kind: ProjectileKind) -> Self {
        Self {
            rect,
            vx,
            vy,
            active: true,
            kind,
        }
    }

    pub fn is_fireball(&self) -> bool {
        self.kind == ProjectileKind::Fireball
    }
}

/// Outcome of a projectile step that the world has to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileEvent {
    /// A hostile projectile touched the player.
    PlayerHit,
    /// A fireball killed the enemy at this index.
    EnemyKilled(usize),
}

/// Spawn a fireball if the cooldown allows it.
///
/// Returns the timestamp of the most recent shot: `Some(now)` when a fireball
/// was added, `last_fired` unchanged otherwise.
pub fn shoot_fireball(
    player: &PlayerState,
    projectiles: &mut Vec<Projectile>,
    last_direction: f32,
    last_fired: Option<f32>,
    cooldown: f32,
    now: f32,
) -> Option<f32> {
    if !cooldown_elapsed(last_fired, cooldown, now) {
        return last_fired;
    }
    let rect = Rect::new(
        player.rect.center_x() - FIREBALL_SIZE / 2.0,
        player.rect.center_y() - FIREBALL_SIZE / 2.0,
        FIREBALL_SIZE,
        FIREBALL_SIZE,
    );
    projectiles.push(Projectile::new(
        rect,
        last_direction * FIREBALL_SPEED,
        FIREBALL_LIFT,
        ProjectileKind::Fireball,
    ));
    Some(now)
}

/// Whether a projectile survives its platform contact this step.
fn collide_platforms(projectile: &mut Projectile, platforms: &[Platform]) -> bool {
    let Some(platform) = platforms
        .iter()
        .find(|p| overlaps(&projectile.rect, &p.rect))
    else {
        return true;
    };
    if !projectile.is_fireball() {
        return false;
    }

    let p = &platform.rect;
    let (horizontal, vertical) = overlap_extent(&projectile.rect, p);
    if horizontal < vertical {
        // Struck a wall face.
        return false;
    }

    projectile.vy = -projectile.vy * BOUNCE_RESTITUTION;
    if projectile.rect.center_y() < p.center_y() {
        projectile.rect.y = p.y - projectile.rect.height;
    } else {
        projectile.rect.y = p.bottom();
    }
    projectile.vx *= BOUNCE_FRICTION;
    !(projectile.vx.abs() < REST_SPEED && projectile.vy.abs() < REST_SPEED)
}

/// Advance every projectile one step and resolve its collisions.
///
/// Iterates tail to head so removals never skip an element. Each projectile
/// leaves by at most one path per step: platform, enemy, player, then bounds.
#[allow(clippy::too_many_arguments)]
pub fn update_projectiles(
    projectiles: &mut Vec<Projectile>,
    platforms: &[Platform],
    enemies: &mut [Enemy],
    player: &PlayerState,
    gravity: f32,
    world_width: f32,
    visible_height: f32,
    frames: f32,
) -> Vec<ProjectileEvent> {
    let mut events = Vec::new();

    for i in (0..projectiles.len()).rev() {
        let projectile = &mut projectiles[i];
        projectile.rect.x += projectile.vx * frames;
        projectile.vy += gravity * 0.5 * frames;
        projectile.rect.y += projectile.vy * frames;

        if !collide_platforms(projectile, platforms) {
            projectiles.remove(i);
            continue;
        }

        if projectile.is_fireball() {
            let hit = enemies
                .iter()
                .position(|e| e.alive && overlaps(&projectile.rect, &e.rect));
            if let Some(index) = hit {
                enemies[index].alive = false;
                events.push(ProjectileEvent::EnemyKilled(index));
                projectiles.remove(i);
                continue;
            }
        } else if projectile.active && overlaps(&projectile.rect, &player.rect) {
            events.push(ProjectileEvent::PlayerHit);
            projectiles.remove(i);
            continue;
        }

        let r = &projectile.rect;
        if r.y > visible_height || r.x < 0.0 || r.x > world_width {
            tracing::trace!(x = r.x, y = r.y, "projectile left the world");
            projectiles.remove(i);
        }
    }

    events
}
