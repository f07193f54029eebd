#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Door placement between corridors and rooms, plus the room-to-room
//! fallback that connects rooms no corridor reaches.

use log::{debug, warn};
use manor_core::{Coordinate, Direction, GenerationContext, RoomId, Tile};
use manor_world::Manor;

/// Opens one closed door from every corridor into each room along its sides.
///
/// Each corridor side is scanned cell by cell, one step out along the
/// corridor's short-axis normal. Cells are grouped by the room behind them;
/// when that room changes, or the scan ends, one random candidate of the
/// finished group becomes a closed door and the connection is recorded on
/// both sides. Returns the number of doors placed.
pub fn place_corridor_doors(manor: &mut Manor, ctx: &mut GenerationContext) -> usize {
    let mut placed = 0;
    for corridor in manor.layout().corridor_ids() {
        let rect = manor.layout().rect(corridor);
        let normals = manor.layout().corridor(corridor).orientation().normals();
        let cells = cells_of(rect.origin(), rect.stop());

        for normal in normals {
            let mut cursor: Option<RoomId> = None;
            let mut candidates: Vec<Coordinate> = Vec::new();

            for cell in &cells {
                let run_cell = cell.step(normal);
                let behind = room_behind(manor, run_cell, normal);
                if behind != cursor {
                    placed += flush(manor, corridor, cursor, &mut candidates, ctx);
                    cursor = behind;
                }
                if let Some(room) = cursor {
                    if qualifies(manor, run_cell, normal, room, corridor) {
                        candidates.push(run_cell);
                    }
                }
            }
            placed += flush(manor, corridor, cursor, &mut candidates, ctx);
        }
    }
    placed
}

/// Connects every room without a door to its neighbours.
///
/// For each such room, every wall not bearing a window is scanned for cells
/// shared with another room that have floor directly behind them. One random
/// cell per wall becomes an open door. Rooms can end up with several doors
/// this way. Returns the number of doors placed.
pub fn add_missing_doors(manor: &mut Manor, ctx: &mut GenerationContext) -> usize {
    let mut placed = 0;
    for room in manor.layout().room_ids() {
        if !manor.room_props(room).adjoining().is_empty() {
            continue;
        }

        let rect = manor.layout().rect(room);
        for direction in Direction::ALL {
            if manor.room_props(room).windows().contains(&direction) {
                continue;
            }

            let candidates: Vec<(Coordinate, RoomId)> = rect
                .side_cells(direction)
                .into_iter()
                .filter_map(|cell| shared_wall_door(manor, cell, direction, room))
                .collect();
            let Some(&(cell, other)) = ctx.choose(&candidates) else {
                continue;
            };

            manor.set_feature(cell, Tile::OpenDoor);
            let _ = manor.connect(room, other);
            placed += 1;
        }

        if manor.room_props(room).adjoining().is_empty() {
            warn!(
                "room {room} ({}) is still isolated after adding missing doors",
                manor.room_props(room).name()
            );
        }
    }
    placed
}

fn flush(
    manor: &mut Manor,
    corridor: RoomId,
    room: Option<RoomId>,
    candidates: &mut Vec<Coordinate>,
    ctx: &mut GenerationContext,
) -> usize {
    let chosen = ctx.choose(candidates.as_slice()).copied();
    candidates.clear();

    let Some(room) = room else {
        return 0;
    };
    if manor.room_props(room).adjoins(corridor) {
        return 0;
    }
    let Some(cell) = chosen else {
        debug!("no door candidate between corridor {corridor} and room {room}");
        return 0;
    };

    manor.set_feature(cell, Tile::ClosedDoor);
    let _ = manor.connect(room, corridor);
    1
}

/// Room whose floor lies directly behind a corridor-side cell.
fn room_behind(manor: &Manor, run_cell: Coordinate, normal: Direction) -> Option<RoomId> {
    let behind = run_cell.step(normal);
    if manor.feature(behind) != Tile::Floor {
        return None;
    }
    manor.layout().interior_room(behind)
}

fn qualifies(
    manor: &Manor,
    run_cell: Coordinate,
    normal: Direction,
    room: RoomId,
    corridor: RoomId,
) -> bool {
    if manor.feature(run_cell) != Tile::Wall {
        return false;
    }
    if manor.room_indices(run_cell) != [room] {
        return false;
    }
    if manor.layout().rect(room).is_corner(run_cell) {
        return false;
    }
    let approach = run_cell.step(normal.opposite());
    if manor.corridor_indices(approach) != [corridor] {
        return false;
    }
    !touches_door(manor, run_cell)
}

fn shared_wall_door(
    manor: &Manor,
    cell: Coordinate,
    direction: Direction,
    room: RoomId,
) -> Option<(Coordinate, RoomId)> {
    if manor.feature(cell) != Tile::Wall {
        return None;
    }
    let outward = cell.step(direction);
    if manor.feature(outward) != Tile::Floor {
        return None;
    }
    if manor.room_indices(cell).len() < 2 {
        return None;
    }
    let other = manor
        .layout()
        .interior_room(outward)
        .filter(|other| *other != room)
        .or_else(|| manor.corridor_index(outward))?;
    Some((cell, other))
}

fn touches_door(manor: &Manor, cell: Coordinate) -> bool {
    Direction::ALL
        .into_iter()
        .any(|direction| manor.feature(cell.step(direction)).is_door())
}

fn cells_of(start: Coordinate, stop: Coordinate) -> Vec<Coordinate> {
    (start.y()..stop.y())
        .flat_map(|y| (start.x()..stop.x()).map(move |x| Coordinate::new(x, y)))
        .collect()
}
