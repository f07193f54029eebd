#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Window placement along the exterior walls of every room.

use std::ops::Range;

use log::debug;
use manor_core::{Direction, GenerationContext, Tile};
use manor_world::Manor;

/// Shortest run that is split into two windows unless a full window is rolled.
const SPLIT_THRESHOLD: i32 = 5;

/// Longest run that may still roll a single full-length window.
const FULL_WINDOW_MAX: i32 = 6;

/// Splits a wall run of `length` cells into two windows around a central gap.
///
/// The gap sits at `length / 2`. It is one cell wide for odd lengths and two
/// cells wide for even lengths, so both windows always have equal size.
#[must_use]
pub fn split_window(length: i32) -> Vec<Range<i32>> {
    let mid = length / 2;
    if length % 2 == 1 {
        vec![0..mid, mid + 1..length]
    } else {
        vec![0..mid - 1, mid + 1..length]
    }
}

/// Places windows on every room side that looks onto open ground.
///
/// Short runs get one window covering the run, sometimes shrunk and shifted
/// off-centre. Longer runs are split in two. Each wall carrying a window is
/// recorded on the room. Returns the number of window cells placed.
pub fn place_windows(manor: &mut Manor, ctx: &mut GenerationContext) -> usize {
    let mut placed = 0;
    for room in manor.layout().room_ids() {
        let rect = manor.layout().rect(room);
        for direction in Direction::ALL {
            if !manor.side_faces_exterior(room, direction) {
                continue;
            }

            let run = rect.side_cells(direction);
            if run.iter().any(|cell| manor.feature(*cell) != Tile::Wall) {
                debug!("skipping {direction:?} windows of room {room}: wall run is broken");
                continue;
            }

            let length = i32::try_from(run.len()).unwrap_or(0);
            if length == 0 {
                continue;
            }
            let tile = if direction.faces_horizontal_wall() {
                Tile::WindowHorizontal
            } else {
                Tile::WindowVertical
            };

            for segment in window_segments(length, ctx) {
                for offset in segment {
                    let Ok(index) = usize::try_from(offset) else {
                        continue;
                    };
                    let Some(cell) = run.get(index) else {
                        continue;
                    };
                    manor.set_feature(*cell, tile);
                    placed += 1;
                }
            }
            let _ = manor.room_props_mut(room).add_window(direction);
        }
    }
    placed
}

fn window_segments(length: i32, ctx: &mut GenerationContext) -> Vec<Range<i32>> {
    let full = length < SPLIT_THRESHOLD || (length <= FULL_WINDOW_MAX && ctx.one_in(3));
    if !full {
        return split_window(length);
    }
    if length >= 3 && ctx.one_in(3) {
        let shrink = ctx.range(1..=length / 3);
        let start = ctx.range(0..=shrink);
        return vec![start..start + length - shrink];
    }
    vec![0..length]
}
