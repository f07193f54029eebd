#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Feature deriver turning layout geometry into semantic wall and floor tiles.

use manor_core::{Coordinate, RoomId, Tile};
use manor_world::{Manor, ManorLayout};

/// Writes the wall/floor partition of every room and corridor into the
/// manor's feature grid.
///
/// Rooms are written first: perimeter cells become walls, interior cells
/// become floor unless a wall is already there. Corridors overlay them: their
/// cells become floor, and the cells flanking them across the short axis or
/// beyond either end become walls unless they belong to another corridor.
/// Floor left on the canvas border is walled off last.
pub fn derive_features(manor: &mut Manor) {
    let rooms = manor.layout().room_ids();
    for room in rooms {
        write_room(manor, room);
    }

    let corridors = manor.layout().corridor_ids();
    for corridor in corridors {
        write_corridor(manor, corridor);
    }

    seal_border(manor);
}

fn write_room(manor: &mut Manor, room: RoomId) {
    let rect = manor.layout().rect(room);
    for cell in cells_of(rect.origin(), rect.stop()) {
        if rect.on_perimeter(cell) {
            manor.set_feature(cell, Tile::Wall);
        } else if manor.feature(cell) != Tile::Wall {
            manor.set_feature(cell, Tile::Floor);
        }
    }
}

fn write_corridor(manor: &mut Manor, corridor: RoomId) {
    let rect = manor.layout().rect(corridor);
    let orientation = manor.layout().corridor(corridor).orientation();
    let [before, after] = orientation.ends();

    for cell in cells_of(rect.origin(), rect.stop()) {
        manor.set_feature(cell, Tile::Floor);

        let mut flanks: Vec<Coordinate> = orientation
            .normals()
            .into_iter()
            .map(|normal| cell.step(normal))
            .collect();
        for end in [before, after] {
            if !rect.contains(cell.step(end)) {
                flanks.push(cell.step(end));
            }
        }

        for flank in flanks {
            if !manor.features().contains(flank) {
                continue;
            }
            if in_other_corridor(manor.layout(), flank, corridor) {
                continue;
            }
            manor.set_feature(flank, Tile::Wall);
        }
    }
}

fn in_other_corridor(layout: &ManorLayout, cell: Coordinate, own: RoomId) -> bool {
    layout
        .corridor_indices(cell)
        .into_iter()
        .any(|other| other != own)
}

fn seal_border(manor: &mut Manor) {
    let size = manor.size();
    let border: Vec<Coordinate> = cells_of(Coordinate::ZERO, size)
        .filter(|cell| {
            cell.x() == 0 || cell.y() == 0 || cell.x() == size.x() - 1 || cell.y() == size.y() - 1
        })
        .filter(|cell| manor.feature(*cell) == Tile::Floor)
        .collect();
    for cell in border {
        manor.set_feature(cell, Tile::Wall);
    }
}

/// Cells of the half-open box `[start, stop)` in row-major order.
fn cells_of(start: Coordinate, stop: Coordinate) -> impl Iterator<Item = Coordinate> {
    (start.y()..stop.y())
        .flat_map(move |y| (start.x()..stop.x()).map(move |x| Coordinate::new(x, y)))
}
