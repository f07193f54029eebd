#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative manor state: the shape algebra the layout is built from,
//! the positional bookkeeping of rooms and corridors, the semantic tile grid,
//! per-room metadata and the grid pathfinder.

mod collection;
mod features;
mod layout;
mod manor;
mod navigation;
mod props;
mod shape;

pub use collection::{ShapeCollection, ShapeCoord};
pub use features::FeatureGrid;
pub use layout::{Corridor, Entry, LegRecord, ManorLayout, Room};
pub use manor::Manor;
pub use navigation::Pathfinder;
pub use props::RoomProps;
pub use shape::Shape;
