use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Decorative block texture. Physics never looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Grass,
    Dirt,
    Stone,
    Wood,
}

/// A static, solid rectangle of the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    #[serde(default)]
    pub block: Option<BlockType>,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            block: None,
        }
    }

    pub fn with_block(mut self, block: BlockType) -> Self {
        self.block = Some(block);
        self
    }

    pub fn top(&self) -> f32 {
        self.rect.y
    }
}

/// Whether some platform top sits at `feet_y` (within `tolerance`) under the
/// horizontal coordinate `foot_x`.
///
/// `leading_right` selects which edge of a platform counts as inside: a foot
/// probing to the right is supported up to and including a platform's right
/// edge, a foot probing to the left down to and including its left edge.
/// Adjacent tiles therefore hand the foot over without a gap.
pub fn supported_at(
    platforms: &[Platform],
    foot_x: f32,
    feet_y: f32,
    tolerance: f32,
    leading_right: bool,
) -> bool {
    platforms.iter().any(|p| {
        let r = &p.rect;
        let within = if leading_right {
            foot_x > r.x && foot_x <= r.right()
        } else {
            foot_x >= r.x && foot_x < r.right()
        };
        within && (feet_y - r.y).abs() <= tolerance
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_tag_is_optional() {
        let plain = Platform::new(0.0, 0.0, 64.0, 64.0);
        assert_eq!(plain.block, None);
        let grass = plain.with_block(BlockType::Stone);
        assert_eq!(grass.block, Some(BlockType::Stone));
        assert_eq!(grass.rect, plain.rect);
    }

    #[test]
    fn support_probe_respects_edges() {
        let platforms = [Platform::new(100.0, 250.0, 200.0, 20.0)];
        // Left edge: inside when probing left, outside just past it.
        assert!(supported_at(&platforms, 100.0, 250.0, 1.0, false));
        assert!(!supported_at(&platforms, 98.0, 250.0, 1.0, false));
        // Right edge: inside when probing right.
        assert!(supported_at(&platforms, 300.0, 250.0, 1.0, true));
        assert!(!supported_at(&platforms, 302.0, 250.0, 1.0, true));
    }

    #[test]
    fn support_probe_hands_over_between_adjacent_tiles() {
        let platforms = [
            Platform::new(0.0, 500.0, 64.0, 64.0),
            Platform::new(64.0, 500.0, 64.0, 64.0),
        ];
        assert!(supported_at(&platforms, 64.0, 500.0, 1.0, true));
        assert!(supported_at(&platforms, 64.0, 500.0, 1.0, false));
    }

    #[test]
    fn support_probe_checks_height() {
        let platforms = [Platform::new(0.0, 500.0, 64.0, 64.0)];
        assert!(supported_at(&platforms, 10.0, 500.5, 1.0, true));
        assert!(!supported_at(&platforms, 10.0, 480.0, 1.0, true));
    }

    #[test]
    fn block_type_serializes_lowercase() {
        let json = serde_json::to_string(&BlockType::Wood).unwrap();
        assert_eq!(json, "\"wood\"");
        let platform = Platform::new(1.0, 2.0, 3.0, 4.0).with_block(BlockType::Dirt);
        let back: Platform = serde_json::from_str(&serde_json::to_string(&platform).unwrap()).unwrap();
        assert_eq!(back, platform);
    }
}
