/// Scroll `offset` so the player stays inside the dead zone of the viewport.
///
/// The zone spans `[left, right]` as fractions of `viewport_width`, measured
/// from the viewport's left edge. The result is clamped to
/// `[0, max(0, world_width - viewport_width)]`.
pub fn follow(
    offset: f32,
    player_x: f32,
    viewport_width: f32,
    world_width: f32,
    left: f32,
    right: f32,
) -> f32 {
    let right_edge = viewport_width * right;
    let left_edge = viewport_width * left;
    let mut next = offset;
    if player_x > next + right_edge {
        next = player_x - right_edge;
    } else if player_x < next + left_edge {
        next = player_x - left_edge;
    }
    let max_offset = (world_width - viewport_width).max(0.0);
    next.min(max_offset).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_dead_zone_holds_still() {
        assert_eq!(follow(100.0, 400.0, 800.0, 5000.0, 0.25, 0.5), 100.0);
    }

    #[test]
    fn scrolls_right_past_threshold() {
        assert_eq!(follow(0.0, 500.0, 800.0, 5000.0, 0.25, 0.5), 100.0);
    }

    #[test]
    fn scrolls_left_past_threshold() {
        assert_eq!(follow(1000.0, 1100.0, 800.0, 5000.0, 0.25, 0.5), 900.0);
    }

    #[test]
    fn clamps_to_world_end() {
        assert_eq!(follow(4000.0, 4936.0, 800.0, 5000.0, 0.25, 0.5), 4200.0);
    }

    #[test]
    fn never_negative() {
        assert_eq!(follow(10.0, 0.0, 800.0, 5000.0, 0.25, 0.5), 0.0);
    }

    #[test]
    fn world_narrower_than_viewport_stays_at_origin() {
        assert_eq!(follow(0.0, 400.0, 800.0, 600.0, 0.25, 0.5), 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_always_in_range(
                offset in -1000.0f32..6000.0,
                player_x in 0.0f32..5000.0,
                viewport in 100.0f32..2000.0,
                world in 100.0f32..6000.0,
            ) {
                let next = follow(offset, player_x, viewport, world, 0.25, 0.5);
                prop_assert!(next >= 0.0);
                prop_assert!(next <= (world - viewport).max(0.0));
            }
        }
    }
}
