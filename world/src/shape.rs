//! Rectangular glyph grids and the composition primitives built on them.

use std::fmt;

use manor_core::Coordinate;

use crate::ShapeCollection;

/// Rectangular grid of optional glyphs.
///
/// The grid's size is fixed at construction; its content is mutable. Unset
/// cells (`None`) are transparent when the shape is drawn onto another one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shape {
    width: i32,
    height: i32,
    cells: Vec<Option<char>>,
}

impl Shape {
    /// Creates a shape of the provided size with every cell unset.
    ///
    /// # Panics
    ///
    /// Panics when either dimension is negative.
    #[must_use]
    pub fn new(size: Coordinate) -> Self {
        assert!(size.is_valid(), "shape size {size} must not be negative");
        let count = usize::try_from(size.x()).unwrap_or(0) * usize::try_from(size.y()).unwrap_or(0);
        Self {
            width: size.x(),
            height: size.y(),
            cells: vec![None; count],
        }
    }

    /// Creates a shape with every cell set to `glyph`.
    #[must_use]
    pub fn filled(size: Coordinate, glyph: char) -> Self {
        let mut shape = Self::new(size);
        shape.cells.fill(Some(glyph));
        shape
    }

    /// Creates a box whose one-cell border is `border` and whose inside is `fill`.
    #[must_use]
    pub fn bordered(size: Coordinate, border: char, fill: char) -> Self {
        let mut shape = Self::filled(size, fill);
        for y in 0..size.y() {
            for x in 0..size.x() {
                if x == 0 || y == 0 || x == size.x() - 1 || y == size.y() - 1 {
                    shape.set(Coordinate::new(x, y), Some(border));
                }
            }
        }
        shape
    }

    /// Builds a shape from text rows, treating spaces as unset cells.
    ///
    /// Ragged input is normalised: shorter rows are padded with unset cells up
    /// to the length of the longest row.
    #[must_use]
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let height = rows.len();
        let mut shape = Self::new(Coordinate::new(to_i32(width), to_i32(height)));
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.as_ref().chars().enumerate() {
                if glyph != ' ' {
                    shape.set(Coordinate::new(to_i32(x), to_i32(y)), Some(glyph));
                }
            }
        }
        shape
    }

    /// Width and height of the shape.
    #[must_use]
    pub const fn size(&self) -> Coordinate {
        Coordinate::new(self.width, self.height)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Glyph stored at `pos`, or `None` when unset or outside the shape.
    #[must_use]
    pub fn get(&self, pos: Coordinate) -> Option<char> {
        self.index(pos).and_then(|index| self.cells[index])
    }

    /// Overwrites the glyph stored at `pos`.
    ///
    /// # Panics
    ///
    /// Panics when `pos` lies outside the shape.
    pub fn set(&mut self, pos: Coordinate, glyph: Option<char>) {
        let Some(index) = self.index(pos) else {
            panic!("cell {pos} lies outside a shape of size {}", self.size());
        };
        self.cells[index] = glyph;
    }

    /// Copies every defined glyph of `source` onto this shape at `offset`.
    ///
    /// With `check_conflict` set, destination cells that already hold a glyph
    /// are left untouched (first write wins); otherwise later writes overwrite.
    ///
    /// # Panics
    ///
    /// Panics when `offset` is negative or `source` does not fit at `offset`.
    pub fn draw(&mut self, source: &Shape, offset: Coordinate, check_conflict: bool) {
        assert!(offset.is_valid(), "cannot draw at negative offset {offset}");
        assert!(
            (offset + source.size()).fits_within(self.size()),
            "shape of size {} does not fit at {offset} on a canvas of size {}",
            source.size(),
            self.size()
        );

        for y in 0..source.height {
            for x in 0..source.width {
                let local = Coordinate::new(x, y);
                let Some(glyph) = source.get(local) else {
                    continue;
                };
                let target = offset + local;
                if check_conflict && self.get(target).is_some() {
                    continue;
                }
                self.set(target, Some(glyph));
            }
        }
    }

    /// Places `right` to the right of this shape, shifted left by `overlap`
    /// columns, and merges both into a new shape. `right` wins where both
    /// define a glyph.
    #[must_use]
    pub fn adjoin(&self, right: &Shape, overlap: i32) -> Shape {
        ShapeCollection::adjoin(self.clone(), right.clone(), overlap).flatten()
    }

    /// Places `bottom` below this shape, shifted up by `overlap` rows, and
    /// merges both into a new shape. `bottom` wins where both define a glyph.
    #[must_use]
    pub fn stack(&self, bottom: &Shape, overlap: i32) -> Shape {
        ShapeCollection::stack(self.clone(), bottom.clone(), overlap).flatten()
    }

    /// Copies the sub-rectangle `[start, stop)` into a new shape.
    ///
    /// # Panics
    ///
    /// Panics when the range is inverted or reaches outside the shape.
    #[must_use]
    pub fn section(&self, start: Coordinate, stop: Coordinate) -> Shape {
        assert!(
            start.is_valid() && start.fits_within(stop) && stop.fits_within(self.size()),
            "section [{start}, {stop}) is outside a shape of size {}",
            self.size()
        );
        let mut section = Shape::new(stop - start);
        for y in start.y()..stop.y() {
            for x in start.x()..stop.x() {
                let pos = Coordinate::new(x, y);
                section.set(pos - start, self.get(pos));
            }
        }
        section
    }

    /// Bounding box `[start, stop)` of the defined glyphs, or `None` when
    /// every cell is unset.
    #[must_use]
    pub fn defined_bounds(&self) -> Option<(Coordinate, Coordinate)> {
        let mut bounds: Option<(Coordinate, Coordinate)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Coordinate::new(x, y);
                if self.get(pos).is_none() {
                    continue;
                }
                let next = pos + Coordinate::new(1, 1);
                bounds = Some(match bounds {
                    None => (pos, next),
                    Some((start, stop)) => (
                        Coordinate::new(start.x().min(x), start.y().min(y)),
                        stop.component_max(next),
                    ),
                });
            }
        }
        bounds
    }

    fn index(&self, pos: Coordinate) -> Option<usize> {
        if !pos.lies_within(Coordinate::ZERO, self.size()) {
            return None;
        }
        let row = usize::try_from(pos.y()).ok()?;
        let column = usize::try_from(pos.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            let row: String = (0..self.width)
                .map(|x| self.get(Coordinate::new(x, y)).unwrap_or(' '))
                .collect();
            f.write_str(row.trim_end())?;
        }
        Ok(())
    }
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
