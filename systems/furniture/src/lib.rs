#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Furniture placement guarded so no piece ever cuts a room in two.

use log::debug;
use manor_core::{Coordinate, Direction, FurnitureKind, GenerationContext, RoomId, Tile};
use manor_world::{Manor, Pathfinder};
use serde::{Deserialize, Serialize};

/// Attempt budget used by the furnisher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureTuning {
    /// Rejections tolerated at each relaxation step before moving on.
    pub attempts_per_step: u32,
}

impl Default for FurnitureTuning {
    fn default() -> Self {
        Self {
            attempts_per_step: 24,
        }
    }
}

/// Placement rules in force while searching for a cell.
///
/// Each step drops one more rule than the step before. Doorways and room
/// connectivity are protected at every step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relaxation {
    /// Wall contact for wall-hugging pieces, clear windows and doorways.
    Strict,
    /// Pieces may stand in front of windows.
    IgnoreWindows,
    /// Wall-hugging pieces may also stand in the open.
    IgnoreWalls,
}

impl Relaxation {
    /// Steps in the order the furnisher walks them.
    pub const ORDER: [Relaxation; 3] = [Self::Strict, Self::IgnoreWindows, Self::IgnoreWalls];

    const fn keeps_windows_clear(self) -> bool {
        matches!(self, Self::Strict)
    }

    const fn requires_wall_contact(self) -> bool {
        !matches!(self, Self::IgnoreWalls)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    NoWallContact,
    Doorway,
    Window,
    Disconnects,
}

/// Places furniture on room floors.
#[derive(Clone, Copy, Debug, Default)]
pub struct Furnisher {
    tuning: FurnitureTuning,
}

impl Furnisher {
    /// Creates a furnisher with the provided attempt budget.
    #[must_use]
    pub const fn new(tuning: FurnitureTuning) -> Self {
        Self { tuning }
    }

    /// Attempt budget in use.
    #[must_use]
    pub const fn tuning(&self) -> FurnitureTuning {
        self.tuning
    }

    /// Places one `kind` somewhere on the floor of `room`.
    ///
    /// Random floor cells are tried under each relaxation step in turn. A
    /// missing wall contact spends an attempt only on a coin flip, every
    /// other rejection always spends one. Returns the chosen cell, or `None`
    /// once every step is exhausted.
    pub fn place(
        &self,
        manor: &mut Manor,
        room: RoomId,
        kind: FurnitureKind,
        ctx: &mut GenerationContext,
    ) -> Option<Coordinate> {
        let candidates = floor_cells(manor, room);
        if candidates.is_empty() {
            debug!("room {room} has no free floor for a {}", kind.name());
            return None;
        }

        let budget = self.tuning.attempts_per_step;
        for relaxation in Relaxation::ORDER {
            let mut attempts = budget;
            // Free rerolls are bounded too, so a step always terminates.
            let mut rolls = 0;
            while attempts > 0 && rolls < budget.saturating_mul(4) {
                rolls += 1;
                let Some(&cell) = ctx.choose(&candidates) else {
                    break;
                };
                match check(manor, room, kind, cell, relaxation) {
                    Ok(()) => {
                        manor.set_feature(cell, Tile::Furniture(kind));
                        manor.room_props_mut(room).add_furniture(kind.name());
                        return Some(cell);
                    }
                    Err(Rejection::NoWallContact) => {
                        if ctx.one_in(2) {
                            attempts -= 1;
                        }
                    }
                    Err(Rejection::Doorway | Rejection::Window | Rejection::Disconnects) => {
                        attempts -= 1;
                    }
                }
            }
        }

        debug!(
            "gave up placing a {} in room {room} ({})",
            kind.name(),
            manor.room_props(room).name()
        );
        None
    }

    /// Places every piece of `kinds` in `room`, skipping those that do not
    /// fit. Returns how many were placed.
    pub fn furnish(
        &self,
        manor: &mut Manor,
        room: RoomId,
        kinds: &[FurnitureKind],
        ctx: &mut GenerationContext,
    ) -> usize {
        kinds
            .iter()
            .filter_map(|kind| self.place(manor, room, *kind, ctx))
            .count()
    }
}

/// Reports whether blocking `cell` keeps the rest of `room` walkable.
///
/// The cell is marked solid for the duration of the check. Every traversable
/// orthogonal neighbour must then still reach the first one without leaving
/// the room's rectangle. The original tile is restored before returning.
pub fn keeps_room_connected(manor: &mut Manor, room: RoomId, cell: Coordinate) -> bool {
    let rect = manor.layout().rect(room);
    let previous = manor.feature(cell);
    manor.set_feature(cell, Tile::Wall);

    let open: Vec<Coordinate> = Direction::ALL
        .into_iter()
        .map(|direction| cell.step(direction))
        .filter(|next| rect.contains(*next) && manor.feature(*next).is_traversable())
        .collect();
    let connected = match open.split_first() {
        None => true,
        Some((first, rest)) => {
            let features = manor.features();
            let passable = |pos: Coordinate| features.get(pos).is_traversable();
            let pathfinder =
                Pathfinder::new(manor.size(), passable).restricted_to(|pos| rect.contains(pos));
            rest.iter()
                .all(|other| pathfinder.path_exists(*other, *first))
        }
    };

    manor.set_feature(cell, previous);
    connected
}

fn check(
    manor: &mut Manor,
    room: RoomId,
    kind: FurnitureKind,
    cell: Coordinate,
    relaxation: Relaxation,
) -> Result<(), Rejection> {
    let neighbours = Direction::ALL.map(|direction| manor.feature(cell.step(direction)));

    if neighbours.iter().any(|tile| tile.is_door()) {
        return Err(Rejection::Doorway);
    }
    if relaxation.keeps_windows_clear() && neighbours.iter().any(|tile| tile.is_window()) {
        return Err(Rejection::Window);
    }
    if kind.prefers_wall()
        && relaxation.requires_wall_contact()
        && !neighbours
            .iter()
            .any(|tile| *tile == Tile::Wall || tile.is_window())
    {
        return Err(Rejection::NoWallContact);
    }
    if !kind.is_traversable() && !keeps_room_connected(manor, room, cell) {
        return Err(Rejection::Disconnects);
    }
    Ok(())
}

/// Free floor cells inside the walls of `room`.
fn floor_cells(manor: &Manor, room: RoomId) -> Vec<Coordinate> {
    let rect = manor.layout().rect(room);
    let (start, stop) = (rect.origin(), rect.stop());
    (start.y()..stop.y())
        .flat_map(|y| (start.x()..stop.x()).map(move |x| Coordinate::new(x, y)))
        .filter(|cell| rect.interior_contains(*cell) && manor.feature(*cell) == Tile::Floor)
        .collect()
}
