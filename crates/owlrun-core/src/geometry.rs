use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle. `(x, y)` is the top-left corner and y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Why a rectangle was rejected by [`Rect::try_new`].
#[derive(Debug, Clone, PartialEq)]
pub enum RectError {
    NonFinite,
    NonPositiveSize { width: f32, height: f32 },
}

impl std::fmt::Display for RectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite => write!(f, "rectangle has a non-finite coordinate"),
            Self::NonPositiveSize { width, height } => {
                write!(f, "rectangle size must be positive, got {width}x{height}")
            },
        }
    }
}

impl std::error::Error for RectError {}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle, rejecting non-finite values and non-positive sizes.
    pub fn try_new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, RectError> {
        let rect = Self::new(x, y, width, height);
        rect.validate()?;
        Ok(rect)
    }

    pub fn validate(&self) -> Result<(), RectError> {
        if !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
        {
            return Err(RectError::NonFinite);
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(RectError::NonPositiveSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Same size, shifted horizontally to `x`.
    pub fn with_x(&self, x: f32) -> Self {
        Self { x, ..*self }
    }
}

/// Strict AABB overlap test. Rectangles that only share an edge do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Penetration depth of `a` into `b` on each axis as `(horizontal, vertical)`.
///
/// Only meaningful when [`overlaps`] holds; otherwise one component is <= 0.
pub fn overlap_extent(a: &Rect, b: &Rect) -> (f32, f32) {
    let horizontal = a.right().min(b.right()) - a.x.max(b.x);
    let vertical = a.bottom().min(b.bottom()) - a.y.max(b.y);
    (horizontal, vertical)
}

/// Whether a player contact with `enemy` counts as landing on it from above.
///
/// Requires horizontal overlap, the player's feet between the enemy's top edge
/// and its vertical midpoint, and a downward velocity.
pub fn is_stomp_collision(player: &Rect, player_vy: f32, enemy: &Rect) -> bool {
    let feet = player.bottom();
    player.right() > enemy.x
        && player.x < enemy.right()
        && feet >= enemy.y
        && feet <= enemy.y + enemy.height / 2.0
        && player_vy > 0.0
}
