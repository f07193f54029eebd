#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entry point running the whole manor generation pipeline.
//!
//! A run builds the layout, derives walls and floors, opens corridor doors,
//! glazes exterior walls, connects rooms no corridor reached and finally
//! picks the entrance hall. Every stage draws from one seeded
//! [`GenerationContext`], so a kind and a seed fully determine the manor.

use log::info;
use manor_core::{Direction, FurnitureKind, GenerationContext, LayoutKind, RoomId, Section};
use manor_system_doors::{add_missing_doors, place_corridor_doors};
use manor_system_features::derive_features;
use manor_system_furniture::{Furnisher, FurnitureTuning};
use manor_system_layout::{LayoutBuilder, LayoutTuning};
use manor_system_windows::place_windows;
use manor_world::Manor;
use serde::{Deserialize, Serialize};

/// Name given to the room the manor is entered through.
pub const ENTRANCE_HALL: &str = "Entrance Hall";

const HALL_FURNITURE: [FurnitureKind; 3] = [
    FurnitureKind::Carpet,
    FurnitureKind::Table,
    FurnitureKind::Chair,
];

const DOMESTIC_FURNITURE: [FurnitureKind; 6] = [
    FurnitureKind::Bed,
    FurnitureKind::Wardrobe,
    FurnitureKind::Table,
    FurnitureKind::Chair,
    FurnitureKind::Bookshelf,
    FurnitureKind::Carpet,
];

const UTILITY_FURNITURE: [FurnitureKind; 4] = [
    FurnitureKind::Counter,
    FurnitureKind::Sink,
    FurnitureKind::Table,
    FurnitureKind::Chair,
];

/// Tuning for a whole generation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Bounds for the layout builder's random choices.
    pub layout: LayoutTuning,
    /// Attempt budget for furniture placement.
    pub furniture: FurnitureTuning,
}

/// Runs the generation pipeline with a fixed configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManorGenerator {
    builder: LayoutBuilder,
    furnisher: Furnisher,
}

impl ManorGenerator {
    /// Creates a generator from the provided configuration.
    #[must_use]
    pub const fn new(config: GenerationConfig) -> Self {
        Self {
            builder: LayoutBuilder::new(config.layout),
            furnisher: Furnisher::new(config.furniture),
        }
    }

    /// Configuration the generator was created with.
    #[must_use]
    pub const fn config(&self) -> GenerationConfig {
        GenerationConfig {
            layout: self.builder.tuning(),
            furniture: self.furnisher.tuning(),
        }
    }

    /// Generates a doored, windowed manor of `kind` from `seed`.
    #[must_use]
    pub fn generate(&self, kind: LayoutKind, seed: u64) -> Manor {
        let mut ctx = GenerationContext::new(seed);
        self.generate_with(kind, &mut ctx)
    }

    /// Generates a manor drawing every random choice from `ctx`.
    #[must_use]
    pub fn generate_with(&self, kind: LayoutKind, ctx: &mut GenerationContext) -> Manor {
        let layout = self.builder.build(kind, ctx);
        let mut manor = Manor::new(layout);

        derive_features(&mut manor);
        let corridor_doors = place_corridor_doors(&mut manor, ctx);
        let windows = place_windows(&mut manor, ctx);
        let room_doors = add_missing_doors(&mut manor, ctx);
        let hall = choose_entrance_hall(&manor, ctx);
        manor.set_entrance_hall(hall);
        manor.room_props_mut(hall).set_name(ENTRANCE_HALL);

        let layout = manor.layout();
        info!(
            "generated {kind} manor from seed {}: {}x{} cells, {} rooms, {} corridors, {} doors, {} window cells",
            ctx.seed(),
            layout.size().x(),
            layout.size().y(),
            layout.room_ids().len(),
            layout.corridor_ids().len(),
            corridor_doors + room_doors,
            windows
        );
        manor
    }

    /// Furnishes every room according to its section. Returns the number of
    /// pieces placed.
    pub fn furnish(&self, manor: &mut Manor, ctx: &mut GenerationContext) -> usize {
        let hall = manor.entrance_hall();
        let mut placed = 0;
        for room in manor.layout().room_ids() {
            let kinds: &[FurnitureKind] = if Some(room) == hall {
                &HALL_FURNITURE
            } else {
                match manor.room_props(room).section() {
                    Section::Domestic => &DOMESTIC_FURNITURE,
                    Section::Utility => &UTILITY_FURNITURE,
                    Section::Corridor => &[],
                }
            };
            placed += self.furnisher.furnish(manor, room, kinds, ctx);
        }
        placed
    }
}

/// Generates a manor of `kind` from `seed` with the default configuration.
#[must_use]
pub fn generate(kind: LayoutKind, seed: u64) -> Manor {
    ManorGenerator::default().generate(kind, seed)
}

/// Picks the entrance hall among the base rooms of the bottom row that open
/// onto the main corridor.
///
/// Rooms whose south wall looks onto open ground are preferred. When a wing
/// covers every such wall the choice falls back to any room of the pool, and
/// only an empty pool yields the first room.
fn choose_entrance_hall(manor: &Manor, ctx: &mut GenerationContext) -> RoomId {
    let layout = manor.layout();
    let fallback = RoomId::new(0);
    let (Some(base), Some(main)) = (layout.base(), layout.main_corridor()) else {
        return fallback;
    };

    let pool: Vec<RoomId> = layout
        .room_ids()
        .into_iter()
        .filter(|room| layout.room(*room).wing().is_none())
        .filter(|room| layout.rect(*room).last().y() == base.last().y())
        .filter(|room| manor.room_props(*room).adjoins(main))
        .collect();
    let facing: Vec<RoomId> = pool
        .iter()
        .copied()
        .filter(|room| manor.side_faces_exterior(*room, Direction::South))
        .collect();

    let candidates = if facing.is_empty() { &pool } else { &facing };
    ctx.choose(candidates).copied().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrance_hall_sits_on_the_bottom_row() {
        for kind in [
            LayoutKind::Base,
            LayoutKind::L,
            LayoutKind::U,
            LayoutKind::H,
        ] {
            for seed in 0..24 {
                let manor = generate(kind, seed);
                let hall = manor.entrance_hall().expect("hall is always chosen");
                let base = manor.layout().base().expect("base layout");
                let main = manor.main_corridor().expect("main corridor");

                assert_eq!(manor.room_props(hall).name(), ENTRANCE_HALL);
                assert_eq!(
                    manor.layout().rect(hall).last().y(),
                    base.last().y(),
                    "{kind} seed {seed}"
                );
                assert!(
                    manor.layout().room(hall).wing().is_none(),
                    "{kind} seed {seed}: hall sits in a wing"
                );
                assert!(manor.room_props(hall).adjoins(main), "{kind} seed {seed}");
            }
        }
    }

    #[test]
    fn default_config_round_trips_through_the_generator() {
        let config = GenerationConfig::default();
        assert_eq!(ManorGenerator::new(config).config(), config);
    }

    #[test]
    fn furnishing_skips_corridors() {
        let generator = ManorGenerator::default();
        let mut manor = generator.generate(LayoutKind::H, 5);
        let placed = generator.furnish(&mut manor, &mut GenerationContext::new(6));
        assert!(placed > 0);
        for corridor in manor.layout().corridor_ids() {
            assert!(manor.room_props(corridor).furniture().is_empty());
        }
    }
}
