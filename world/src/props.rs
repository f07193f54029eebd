//! Semantic metadata attached to every room and corridor.

use manor_core::{Direction, RoomId, Section};
use serde::{Deserialize, Serialize};

/// Metadata recorded for a single room or corridor.
///
/// Created once per layout entry after the layout is frozen and mutated by
/// the door, window and furniture passes and by external naming passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomProps {
    name: String,
    section: Section,
    adjoining: Vec<RoomId>,
    windows: Vec<Direction>,
    furniture: Vec<String>,
    owners: Vec<String>,
}

impl RoomProps {
    /// Creates metadata with the provided name and section and nothing else.
    #[must_use]
    pub fn new(name: impl Into<String>, section: Section) -> Self {
        Self {
            name: name.into(),
            section,
            adjoining: Vec::new(),
            windows: Vec::new(),
            furniture: Vec::new(),
            owners: Vec::new(),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Section classification.
    #[must_use]
    pub const fn section(&self) -> Section {
        self.section
    }

    /// Replaces the section classification.
    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }

    /// Rooms and corridors reachable through a door, in connection order.
    #[must_use]
    pub fn adjoining(&self) -> &[RoomId] {
        &self.adjoining
    }

    /// Reports whether a door leads to `other`.
    #[must_use]
    pub fn adjoins(&self, other: RoomId) -> bool {
        self.adjoining.contains(&other)
    }

    /// Records a door toward `other`. Returns false when already recorded.
    pub fn add_adjoining(&mut self, other: RoomId) -> bool {
        push_unique(&mut self.adjoining, other)
    }

    /// Walls that carry at least one window.
    #[must_use]
    pub fn windows(&self) -> &[Direction] {
        &self.windows
    }

    /// Records a window on the wall facing `direction`.
    pub fn add_window(&mut self, direction: Direction) -> bool {
        push_unique(&mut self.windows, direction)
    }

    /// Descriptions of the furniture placed in the room.
    #[must_use]
    pub fn furniture(&self) -> &[String] {
        &self.furniture
    }

    /// Records a placed piece of furniture.
    pub fn add_furniture(&mut self, description: impl Into<String>) {
        self.furniture.push(description.into());
    }

    /// Occupants owning the room, for bedrooms.
    #[must_use]
    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    /// Records an owner. Returns false when already recorded.
    pub fn add_owner(&mut self, owner: impl Into<String>) -> bool {
        push_unique(&mut self.owners, owner.into())
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        return false;
    }
    items.push(item);
    true
}
