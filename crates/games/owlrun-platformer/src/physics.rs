use serde::{Deserialize, Serialize};

use owlrun_core::events::SimEvent;
use owlrun_core::geometry::{Rect, overlap_extent, overlaps};
use owlrun_core::platform::Platform;

use crate::config::PlayerConfig;

/// Fraction of the ground jump impulse granted by the mid-air jump.
pub const DOUBLE_JUMP_FACTOR: f32 = 0.8;
/// Fraction of the ground jump impulse applied when bouncing off a stomped enemy.
pub const STOMP_BOUNCE_FACTOR: f32 = 0.7;

/// State of the player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub rect: Rect,
    /// Horizontal units per 60 Hz frame.
    pub speed: f32,
    /// Ground jump impulse (negative is up).
    pub jump_force: f32,
    pub vy: f32,
    pub grounded: bool,
    pub can_double_jump: bool,
    /// Last horizontal direction moved: -1 or +1. Fireballs travel this way.
    pub facing: f32,
}

impl PlayerState {
    pub fn new(cfg: &PlayerConfig) -> Self {
        Self {
            rect: cfg.spawn_rect(),
            speed: cfg.speed,
            jump_force: cfg.jump_force,
            vy: 0.0,
            grounded: false,
            can_double_jump: false,
            facing: 1.0,
        }
    }

    /// Move back to the spawn point with no velocity and no jump state.
    /// Facing is kept.
    pub fn respawn(&mut self, cfg: &PlayerConfig) {
        self.rect.x = cfg.spawn_x;
        self.rect.y = cfg.spawn_y;
        self.vy = 0.0;
        self.grounded = false;
        self.can_double_jump = false;
    }
}

/// Apply horizontal input and keep the player inside `[0, world_width - width]`.
pub fn apply_movement(player: &mut PlayerState, move_dir: f32, frames: f32, world_width: f32) {
    if move_dir != 0.0 {
        player.rect.x += player.speed * move_dir * frames;
        player.facing = move_dir.signum();
    }
    let max_x = (world_width - player.rect.width).max(0.0);
    player.rect.x = player.rect.x.min(max_x).max(0.0);
}

/// Handle a fresh jump press. Returns the event for the jump that happened,
/// or `None` when airborne with the double jump already spent.
pub fn try_jump(player: &mut PlayerState) -> Option<SimEvent> {
    if player.grounded {
        player.vy = player.jump_force;
        player.grounded = false;
        player.can_double_jump = true;
        Some(SimEvent::Jump)
    } else if player.can_double_jump {
        player.vy = player.jump_force * DOUBLE_JUMP_FACTOR;
        player.can_double_jump = false;
        Some(SimEvent::DoubleJump)
    } else {
        None
    }
}

/// Constant-acceleration step. Integrating position with the average velocity
/// over the frame makes the path independent of how time is split into frames.
pub fn integrate_gravity(player: &mut PlayerState, gravity: f32, frames: f32) {
    player.rect.y += player.vy * frames + 0.5 * gravity * frames * frames;
    player.vy += gravity * frames;
}

/// Push the player out of every overlapping platform.
///
/// The struck face is picked by comparing centres. A falling player lands on
/// a top it was above before this step (`prev_bottom`), or on a top face that
/// is the shallower axis or sunk into by at most `landing_tolerance`. A rising
/// player bumps its head on a bottom face that is the shallower axis. Every
/// other contact pushes out sideways. Returns a `PlatformLandedHard` event
/// when the player lands faster than `hard_landing_speed`.
pub fn resolve_platforms(
    player: &mut PlayerState,
    platforms: &[Platform],
    prev_bottom: f32,
    landing_tolerance: f32,
    hard_landing_speed: f32,
) -> Option<SimEvent> {
    player.grounded = false;
    let mut event = None;

    for platform in platforms {
        let p = &platform.rect;
        if !overlaps(&player.rect, p) {
            continue;
        }
        let (horizontal, vertical) = overlap_extent(&player.rect, p);
        let penetration = player.rect.bottom() - p.y;
        let top_face = player.rect.center_y() < p.center_y();
        let shallow_vertical = vertical <= horizontal;
        let lands = player.vy >= 0.0
            && (prev_bottom <= p.y
                || (top_face && (shallow_vertical || penetration <= landing_tolerance)));
        let bumps = player.vy < 0.0 && !top_face && shallow_vertical;

        if lands {
            let impact = player.vy;
            player.rect.y = p.y - player.rect.height;
            player.vy = 0.0;
            player.grounded = true;
            player.can_double_jump = false;
            if impact > hard_landing_speed && event.is_none() {
                event = Some(SimEvent::PlatformLandedHard {
                    impact_speed: impact,
                });
            }
        } else if bumps {
            player.vy = 0.0;
            player.rect.y = p.bottom();
        } else if player.rect.center_x() < p.center_x() {
            player.rect.x = p.x - player.rect.width;
        } else {
            player.rect.x = p.right();
        }
    }

    event
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> PlayerState {
        let mut player = PlayerState::new(&PlayerConfig::default());
        player.rect.x = x;
        player.rect.y = y;
        player
    }

    #[test]
    fn movement_updates_facing_and_clamps() {
        let mut player = player_at(2.0, 0.0);
        apply_movement(&mut player, -1.0, 1.0, 1000.0);
        assert_eq!(player.rect.x, 0.0);
        assert_eq!(player.facing, -1.0);

        let mut player = player_at(934.0, 0.0);
        apply_movement(&mut player, 1.0, 1.0, 1000.0);
        assert_eq!(player.rect.x, 936.0);
        assert_eq!(player.facing, 1.0);
    }

    #[test]
    fn idle_keeps_facing() {
        let mut player = player_at(100.0, 0.0);
        player.facing = -1.0;
        apply_movement(&mut player, 0.0, 1.0, 1000.0);
        assert_eq!(player.rect.x, 100.0);
        assert_eq!(player.facing, -1.0);
    }

    #[test]
    fn movement_scales_with_frame_factor() {
        let mut player = player_at(100.0, 0.0);
        apply_movement(&mut player, 1.0, 2.0, 1000.0);
        assert_eq!(player.rect.x, 110.0);
    }

    #[test]
    fn world_narrower_than_player_pins_to_zero() {
        let mut player = player_at(10.0, 0.0);
        apply_movement(&mut player, 1.0, 1.0, 32.0);
        assert_eq!(player.rect.x, 0.0);
    }

    #[test]
    fn ground_jump_enables_double_jump() {
        let mut player = player_at(0.0, 0.0);
        player.grounded = true;
        assert_eq!(try_jump(&mut player), Some(SimEvent::Jump));
        assert_eq!(player.vy, -15.0);
        assert!(!player.grounded);
        assert!(player.can_double_jump);
    }

    #[test]
    fn double_jump_is_weaker_and_single_use() {
        let mut player = player_at(0.0, 0.0);
        player.grounded = false;
        player.can_double_jump = true;
        player.vy = 3.0;
        assert_eq!(try_jump(&mut player), Some(SimEvent::DoubleJump));
        assert_eq!(player.vy, -15.0 * 0.8);
        assert!(!player.can_double_jump);

        player.vy = 2.0;
        assert_eq!(try_jump(&mut player), None);
        assert_eq!(player.vy, 2.0);
    }

    #[test]
    fn gravity_step_is_exact_kinematics() {
        let mut player = player_at(0.0, 50.0);
        player.vy = 10.0;
        integrate_gravity(&mut player, 0.5, 1.0);
        assert_eq!(player.rect.y, 60.25);
        assert_eq!(player.vy, 10.5);
    }

    #[test]
    fn lands_on_platform_from_above() {
        let platforms = [Platform::new(80.0, 100.0, 100.0, 20.0)];
        let mut player = player_at(100.0, 50.0);
        player.vy = 10.0;
        let prev_bottom = player.rect.bottom();
        integrate_gravity(&mut player, 0.5, 1.0);

        let event = resolve_platforms(&mut player, &platforms, prev_bottom, 16.0, 12.0);
        assert_eq!(event, None);
        assert_eq!(player.rect.y, 36.0);
        assert_eq!(player.vy, 0.0);
        assert!(player.grounded);
        assert!(!player.can_double_jump);
    }

    #[test]
    fn fast_landing_reports_impact() {
        let platforms = [Platform::new(0.0, 200.0, 500.0, 64.0)];
        let mut player = player_at(100.0, 150.0);
        player.vy = 14.0;
        let event = resolve_platforms(&mut player, &platforms, 200.0, 16.0, 12.0);
        assert_eq!(
            event,
            Some(SimEvent::PlatformLandedHard { impact_speed: 14.0 })
        );
        assert_eq!(player.rect.y, 136.0);
    }

    #[test]
    fn rising_into_ceiling_bumps_head() {
        let platforms = [Platform::new(0.0, 0.0, 500.0, 64.0)];
        let mut player = player_at(100.0, 60.0);
        player.vy = -8.0;
        resolve_platforms(&mut player, &platforms, 132.0, 16.0, 12.0);
        assert_eq!(player.rect.y, 64.0);
        assert_eq!(player.vy, 0.0);
        assert!(!player.grounded);
    }

    #[test]
    fn side_contact_pushes_out_horizontally() {
        // Tall wall to the right; the player's feet are far below its top.
        let platforms = [Platform::new(200.0, 0.0, 64.0, 400.0)];
        let mut player = player_at(140.0, 200.0);
        player.vy = 1.0;
        resolve_platforms(&mut player, &platforms, 263.0, 16.0, 12.0);
        assert_eq!(player.rect.x, 136.0);
        assert_eq!(player.rect.y, 200.0);
        assert!(!player.grounded);

        let mut player = player_at(260.0, 200.0);
        player.vy = 1.0;
        resolve_platforms(&mut player, &platforms, 263.0, 16.0, 12.0);
        assert_eq!(player.rect.x, 264.0);
    }

    #[test]
    fn rising_past_ledge_corner_pushes_sideways() {
        // Feet 3 units below the ledge top while jumping up beside it.
        let platforms = [Platform::new(200.0, 500.0, 300.0, 64.0)];
        let mut player = player_at(141.0, 439.0);
        player.vy = -4.0;
        resolve_platforms(&mut player, &platforms, 507.0, 16.0, 12.0);
        assert_eq!(player.rect.x, 136.0);
        assert_eq!(player.rect.y, 439.0);
        assert_eq!(player.vy, -4.0);
    }

    #[test]
    fn falling_past_overhang_corner_pushes_sideways() {
        // Head 2 units above the overhang's underside while dropping.
        let platforms = [Platform::new(200.0, 0.0, 300.0, 103.0)];
        let mut player = player_at(141.0, 101.0);
        player.vy = 1.0;
        resolve_platforms(&mut player, &platforms, 164.0, 16.0, 12.0);
        assert_eq!(player.rect.x, 136.0);
        assert_eq!(player.rect.y, 101.0);
        assert!(!player.grounded);
    }

    #[test]
    fn tile_seam_does_not_read_as_wall() {
        // The player barely overlaps the first tile checked: its horizontal
        // overlap (2) is smaller than the sink depth (4).
        let platforms = [
            Platform::new(64.0, 500.0, 64.0, 64.0),
            Platform::new(0.0, 500.0, 64.0, 64.0),
        ];
        let mut player = player_at(2.0, 440.0);
        player.vy = 4.0;
        resolve_platforms(&mut player, &platforms, 500.0, 16.0, 12.0);
        assert_eq!(player.rect.x, 2.0);
        assert_eq!(player.rect.y, 436.0);
        assert!(player.grounded);
    }

    #[test]
    fn fast_fall_onto_edge_still_lands() {
        // A long frame sinks the player 60 units into the corner of a ledge,
        // deeper than its 30 unit horizontal overlap.
        let platforms = [Platform::new(0.0, 500.0, 300.0, 64.0)];
        let mut player = player_at(270.0, 496.0);
        player.vy = 20.0;
        resolve_platforms(&mut player, &platforms, 480.0, 16.0, 12.0);
        assert_eq!(player.rect.x, 270.0);
        assert_eq!(player.rect.y, 436.0);
        assert!(player.grounded);
    }

    #[test]
    fn respawn_clears_motion() {
        let cfg = PlayerConfig::default();
        let mut player = player_at(900.0, 300.0);
        player.vy = 7.0;
        player.grounded = true;
        player.can_double_jump = true;
        player.respawn(&cfg);
        assert_eq!(player.rect, cfg.spawn_rect());
        assert_eq!(player.vy, 0.0);
        assert!(!player.grounded);
        assert!(!player.can_double_jump);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn movement_stays_in_world(
                x in -100.0f32..6000.0,
                dir in prop::sample::select(vec![-1.0f32, 0.0, 1.0]),
                frames in 0.0f32..6.0,
            ) {
                let mut player = player_at(x, 0.0);
                apply_movement(&mut player, dir, frames, 5000.0);
                prop_assert!(player.rect.x >= 0.0);
                prop_assert!(player.rect.x <= 5000.0 - 64.0);
            }

            #[test]
            fn gravity_is_split_independent(vy in -20.0f32..20.0, frames in 0.1f32..6.0) {
                let mut whole = player_at(0.0, 0.0);
                whole.vy = vy;
                integrate_gravity(&mut whole, 0.5, frames);

                let mut halves = player_at(0.0, 0.0);
                halves.vy = vy;
                integrate_gravity(&mut halves, 0.5, frames / 2.0);
                integrate_gravity(&mut halves, 0.5, frames / 2.0);

                prop_assert!((whole.rect.y - halves.rect.y).abs() < 1e-3);
                prop_assert!((whole.vy - halves.vy).abs() < 1e-4);
            }

            #[test]
            fn landing_never_leaves_overlap(
                x in 0.0f32..400.0,
                sink in 0.1f32..16.0,
                vy in 0.0f32..30.0,
            ) {
                let platforms = [Platform::new(0.0, 500.0, 500.0, 64.0)];
                let mut player = player_at(x, 500.0 - 64.0 + sink);
                player.vy = vy;
                resolve_platforms(&mut player, &platforms, 500.0, 16.0, 12.0);
                prop_assert!(player.grounded);
                prop_assert!(!overlaps(&player.rect, &platforms[0].rect));
            }
        }
    }
}
