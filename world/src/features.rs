//! Dense semantic tile grid derived from the manor layout.

use std::fmt;

use log::debug;
use manor_core::{Coordinate, Tile};

/// Dense grid of [`Tile`] values covering the flattened layout.
///
/// Every cell is defined. Reads and writes outside the grid are tolerated:
/// they are logged and answered with [`Tile::Nothing`] or ignored, so callers
/// may look speculatively around the manor's boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureGrid {
    size: Coordinate,
    tiles: Vec<Tile>,
}

impl FeatureGrid {
    /// Creates a grid of the provided size filled with [`Tile::Nothing`].
    ///
    /// # Panics
    ///
    /// Panics when either dimension is negative.
    #[must_use]
    pub fn new(size: Coordinate) -> Self {
        assert!(
            size.is_valid(),
            "feature grid size {size} must not be negative"
        );
        let width = usize::try_from(size.x()).unwrap_or(0);
        let height = usize::try_from(size.y()).unwrap_or(0);
        Self {
            size,
            tiles: vec![Tile::Nothing; width * height],
        }
    }

    /// Width and height of the grid.
    #[must_use]
    pub const fn size(&self) -> Coordinate {
        self.size
    }

    /// Reports whether `pos` lies inside the grid.
    #[must_use]
    pub fn contains(&self, pos: Coordinate) -> bool {
        pos.lies_within(Coordinate::ZERO, self.size)
    }

    /// Tile stored at `pos`, or [`Tile::Nothing`] outside the grid.
    #[must_use]
    pub fn get(&self, pos: Coordinate) -> Tile {
        match self.index(pos) {
            Some(index) => self.tiles[index],
            None => {
                debug!("feature read at {pos} outside grid of size {}", self.size);
                Tile::Nothing
            }
        }
    }

    /// Stores `tile` at `pos`. Writes outside the grid are dropped.
    pub fn set(&mut self, pos: Coordinate, tile: Tile) {
        match self.index(pos) {
            Some(index) => self.tiles[index] = tile,
            None => debug!(
                "dropping {tile:?} written at {pos} outside grid of size {}",
                self.size
            ),
        }
    }

    /// Iterator over every cell and its tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, Tile)> + '_ {
        let width = self.size.x().max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = i32::try_from(index).unwrap_or(i32::MAX);
            (Coordinate::new(index % width, index / width), *tile)
        })
    }

    fn index(&self, pos: Coordinate) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let width = usize::try_from(self.size.x()).ok()?;
        let row = usize::try_from(pos.y()).ok()?;
        let column = usize::try_from(pos.x()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl fmt::Display for FeatureGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.y() {
            if y > 0 {
                writeln!(f)?;
            }
            let row: String = (0..self.size.x())
                .map(|x| self.get(Coordinate::new(x, y)).glyph())
                .collect();
            f.write_str(row.trim_end())?;
        }
        Ok(())
    }
}
