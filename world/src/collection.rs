//! Ordered sets of shapes positioned on a shared canvas.

use std::ops::Range;

use manor_core::Coordinate;

use crate::Shape;

/// A shape together with its placement offset inside a larger canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeCoord {
    shape: Shape,
    offset: Coordinate,
}

impl ShapeCoord {
    /// Pairs a shape with its offset.
    ///
    /// # Panics
    ///
    /// Panics when the offset is negative.
    #[must_use]
    pub fn new(shape: Shape, offset: Coordinate) -> Self {
        assert!(
            offset.is_valid(),
            "shape offset {offset} must not be negative"
        );
        Self { shape, offset }
    }

    /// The positioned shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Upper-left cell of the shape on the canvas.
    #[must_use]
    pub const fn offset(&self) -> Coordinate {
        self.offset
    }

    /// Exclusive lower-right bound of the shape on the canvas.
    #[must_use]
    pub fn stop(&self) -> Coordinate {
        self.offset + self.shape.size()
    }
}

/// Ordered list of positioned shapes that can be flattened onto one canvas.
///
/// Entries are drawn in list order, so later entries win wherever two of them
/// define a glyph. The collection's size is the bounding box of its entries,
/// never smaller than its backing canvas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeCollection {
    entries: Vec<ShapeCoord>,
    canvas: Coordinate,
}

impl ShapeCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `right` to the right of `left`, shifted left by `overlap`
    /// columns. A negative overlap leaves a gap of that many columns.
    ///
    /// # Panics
    ///
    /// Panics when the overlap would push `right` to a negative offset.
    #[must_use]
    pub fn adjoin(left: Shape, right: Shape, overlap: i32) -> Self {
        let mut collection = Self::new();
        let _ = collection.push(left, Coordinate::ZERO);
        let _ = collection.adjoin_shape(right, overlap);
        collection
    }

    /// Places `bottom` below `top`, shifted up by `overlap` rows.
    ///
    /// # Panics
    ///
    /// Panics when the overlap would push `bottom` to a negative offset.
    #[must_use]
    pub fn stack(top: Shape, bottom: Shape, overlap: i32) -> Self {
        let mut collection = Self::new();
        let _ = collection.push(top, Coordinate::ZERO);
        let mut below = Self::new();
        let _ = below.push(bottom, Coordinate::ZERO);
        let _ = collection.stack_collection(below, overlap);
        collection
    }

    /// Appends a shape at `offset`, returning its position in the list.
    pub fn push(&mut self, shape: Shape, offset: Coordinate) -> usize {
        self.entries.push(ShapeCoord::new(shape, offset));
        self.entries.len() - 1
    }

    /// Appends a shape to the right of the current bounding box, shifted left
    /// by `overlap` columns and aligned to the top row.
    pub fn adjoin_shape(&mut self, shape: Shape, overlap: i32) -> usize {
        let x = self.size().x() - overlap;
        assert!(x >= 0, "overlap {overlap} exceeds the collection width");
        let position = self.push(shape, Coordinate::new(x, 0));
        self.grow_canvas();
        position
    }

    /// Appends every entry of `other` to the right of the current bounding
    /// box, shifted left by `overlap` columns. Returns the positions of the
    /// appended entries.
    pub fn adjoin_collection(&mut self, other: ShapeCollection, overlap: i32) -> Range<usize> {
        let x = self.size().x() - overlap;
        assert!(x >= 0, "overlap {overlap} exceeds the collection width");
        let range = self.append(other, Coordinate::new(x, 0));
        self.grow_canvas();
        range
    }

    /// Appends every entry of `other` below the current bounding box, shifted
    /// up by `overlap` rows. Returns the positions of the appended entries.
    pub fn stack_collection(&mut self, other: ShapeCollection, overlap: i32) -> Range<usize> {
        let y = self.size().y() - overlap;
        assert!(y >= 0, "overlap {overlap} exceeds the collection height");
        let range = self.append(other, Coordinate::new(0, y));
        self.grow_canvas();
        range
    }

    /// Appends every entry of `other`, shifted by `offset`. Returns the
    /// positions of the appended entries.
    pub fn append(&mut self, other: ShapeCollection, offset: Coordinate) -> Range<usize> {
        let start = self.entries.len();
        self.canvas = self.canvas.component_max(offset + other.canvas);
        for entry in other.entries {
            self.entries
                .push(ShapeCoord::new(entry.shape, entry.offset + offset));
        }
        start..self.entries.len()
    }

    /// Shifts every entry by `delta`.
    ///
    /// # Panics
    ///
    /// Panics when an entry would end up at a negative offset.
    pub fn translate(&mut self, delta: Coordinate) {
        for entry in &mut self.entries {
            let moved = entry.offset + delta;
            assert!(moved.is_valid(), "translation moves an entry to {moved}");
            entry.offset = moved;
        }
        let grown = self.canvas + delta;
        self.canvas = grown.component_max(Coordinate::ZERO);
    }

    /// Entry stored at `position`, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&ShapeCoord> {
        self.entries.get(position)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the collection holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterator over the entries in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = &ShapeCoord> {
        self.entries.iter()
    }

    /// Bounding box over every entry and the backing canvas.
    #[must_use]
    pub fn size(&self) -> Coordinate {
        self.entries
            .iter()
            .fold(self.canvas, |size, entry| size.component_max(entry.stop()))
    }

    /// Draws every entry, in order, onto a canvas sized to fit all of them.
    #[must_use]
    pub fn flatten(&self) -> Shape {
        let mut canvas = Shape::new(self.size());
        for entry in &self.entries {
            canvas.draw(&entry.shape, entry.offset, false);
        }
        canvas
    }

    fn grow_canvas(&mut self) {
        self.canvas = self.size();
    }
}

impl IntoIterator for ShapeCollection {
    type Item = ShapeCoord;
    type IntoIter = std::vec::IntoIter<ShapeCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
