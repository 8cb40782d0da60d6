use owlrun_core::platform::{BlockType, Platform};

/// Default tile side length.
pub const TILE_SIZE: f32 = 64.0;

/// Why a tile placement was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    OutOfBounds {
        row: i32,
        col: i32,
        rows: u32,
        columns: u32,
    },
    InvalidTileSize(f32),
    InvalidWorldSize { width: f32, height: f32 },
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds {
                row,
                col,
                rows,
                columns,
            } => write!(
                f,
                "tile ({row}, {col}) is outside the {rows}x{columns} grid"
            ),
            Self::InvalidTileSize(size) => write!(f, "tile size must be positive, got {size}"),
            Self::InvalidWorldSize { width, height } => {
                write!(f, "world size must be positive, got {width}x{height}")
            },
        }
    }
}

impl std::error::Error for StageError {}

/// Grid of square platform tiles covering the world.
///
/// Rows count up from the bottom of the world and columns from the left, so
/// row 0 is the ground line.
#[derive(Debug, Clone)]
pub struct TileMap {
    tile_size: f32,
    rows: u32,
    columns: u32,
    /// Stored row-major (row * columns + col).
    tiles: Vec<Option<BlockType>>,
}

impl TileMap {
    pub fn new(world_width: f32, world_height: f32) -> Result<Self, StageError> {
        Self::with_tile_size(world_width, world_height, TILE_SIZE)
    }

    pub fn with_tile_size(
        world_width: f32,
        world_height: f32,
        tile_size: f32,
    ) -> Result<Self, StageError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(StageError::InvalidTileSize(tile_size));
        }
        if !(world_width.is_finite() && world_width > 0.0)
            || !(world_height.is_finite() && world_height > 0.0)
        {
            return Err(StageError::InvalidWorldSize {
                width: world_width,
                height: world_height,
            });
        }
        let columns = (world_width / tile_size).ceil() as u32;
        let rows = (world_height / tile_size).ceil() as u32;
        Ok(Self {
            tile_size,
            rows,
            columns,
            tiles: vec![None; rows as usize * columns as usize],
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn index(&self, row: i32, col: i32) -> Result<usize, StageError> {
        if row < 0 || col < 0 || row as u32 >= self.rows || col as u32 >= self.columns {
            return Err(StageError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(row as usize * self.columns as usize + col as usize)
    }

    fn platform_at(&self, row: u32, col: u32, block: BlockType) -> Platform {
        let x = col as f32 * self.tile_size;
        let y = (self.rows - 1 - row) as f32 * self.tile_size;
        Platform::new(x, y, self.tile_size, self.tile_size).with_block(block)
    }

    /// Place one tile. Placing over an existing tile replaces its block type.
    pub fn add_tile(&mut self, row: i32, col: i32, block: BlockType) -> Result<Platform, StageError> {
        let idx = self.index(row, col)?;
        self.tiles[idx] = Some(block);
        Ok(self.platform_at(row as u32, col as u32, block))
    }

    /// Place a horizontal run of `length` tiles starting at `start_col`.
    /// Tiles past the right edge of the grid are dropped.
    pub fn add_run(
        &mut self,
        row: i32,
        start_col: i32,
        length: u32,
        block: BlockType,
    ) -> Result<Vec<Platform>, StageError> {
        self.index(row, start_col)?;
        let end = (start_col as i64 + length as i64).min(self.columns as i64) as i32;
        (start_col..end)
            .map(|col| self.add_tile(row, col, block))
            .collect()
    }

    /// Fill the rectangle of tiles whose bottom-left corner is `(row, col)`.
    /// Columns clip at the right edge like [`TileMap::add_run`]; rows past the
    /// top fail before anything is placed.
    pub fn add_block(
        &mut self,
        row: i32,
        col: i32,
        width: u32,
        height: u32,
        block: BlockType,
    ) -> Result<Vec<Platform>, StageError> {
        let out_of_bounds = StageError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            columns: self.columns,
        };
        let end = i32::try_from(height)
            .ok()
            .and_then(|h| row.checked_add(h))
            .ok_or(out_of_bounds)?;
        if height > 0 {
            self.index(row, col)?;
            self.index(end - 1, col)?;
        }
        let mut placed = Vec::new();
        for r in row..end {
            placed.extend(self.add_run(r, col, width, block)?);
        }
        Ok(placed)
    }

    pub fn get(&self, row: i32, col: i32) -> Option<BlockType> {
        self.index(row, col).ok().and_then(|idx| self.tiles[idx])
    }

    /// Tile covering a world-space point, if any.
    pub fn tile_at_position(&self, x: f32, y: f32) -> Option<Platform> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.tile_size).floor() as i64;
        let row_from_top = (y / self.tile_size).floor() as i64;
        let row = self.rows as i64 - 1 - row_from_top;
        let (Ok(row), Ok(col)) = (i32::try_from(row), i32::try_from(col)) else {
            return None;
        };
        let block = self.get(row, col)?;
        Some(self.platform_at(row as u32, col as u32, block))
    }

    /// Every placed tile as a platform, bottom row first, left to right.
    pub fn platforms(&self) -> Vec<Platform> {
        let mut out = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.columns {
                if let Some(block) = self.tiles[(row * self.columns + col) as usize] {
                    out.push(self.platform_at(row, col, block));
                }
            }
        }
        out
    }
}
