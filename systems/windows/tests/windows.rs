use manor_core::{Coordinate, Direction, GenerationContext, Placement, RoomId, Side, Tile};
use manor_system_features::derive_features;
use manor_system_layout::{attach_leg, base_layout, Compensation, Leg};
use manor_system_windows::place_windows;
use manor_world::{Manor, ManorLayout};

fn derived(layout: ManorLayout) -> Manor {
    let mut manor = Manor::new(layout);
    derive_features(&mut manor);
    manor
}

fn winged() -> ManorLayout {
    let mut layout = base_layout(4, Compensation::Split { top_left: false });
    attach_leg(&mut layout, Side::Left, Placement::Bottom, Leg::new(1, 2));
    attach_leg(&mut layout, Side::Right, Placement::Top, Leg::new(2, 1));
    layout
}

#[test]
fn windows_only_replace_walls() {
    for seed in 0..8 {
        let mut manor = derived(winged());
        let before = manor.features().clone();
        let placed = place_windows(&mut manor, &mut GenerationContext::new(seed));
        assert!(placed > 0, "seed {seed}: an exterior wall always exists");

        let mut changed = 0;
        for (cell, tile) in manor.features().iter() {
            if tile == before.get(cell) {
                continue;
            }
            changed += 1;
            assert!(
                tile.is_window(),
                "seed {seed}: {cell} changed into {tile:?}"
            );
            assert_eq!(
                before.get(cell),
                Tile::Wall,
                "seed {seed}: window at {cell} replaced {:?}",
                before.get(cell)
            );
        }
        assert_eq!(changed, placed);
    }
}

#[test]
fn long_top_walls_are_split_around_a_central_gap() {
    let mut manor = derived(base_layout(3, Compensation::TopEnds));
    let _ = place_windows(&mut manor, &mut GenerationContext::new(4));

    // The middle top room spans x 11..=22 with its run on x 12..=21.
    let room = RoomId::new(1);
    assert_eq!(manor.room_props(room).windows(), &[Direction::North]);
    for x in 12..16 {
        assert_eq!(manor.feature(Coordinate::new(x, 0)), Tile::WindowHorizontal);
    }
    for x in 16..18 {
        assert_eq!(
            manor.feature(Coordinate::new(x, 0)),
            Tile::Wall,
            "gap cell {x}"
        );
    }
    for x in 18..22 {
        assert_eq!(manor.feature(Coordinate::new(x, 0)), Tile::WindowHorizontal);
    }
}

#[test]
fn side_walls_use_vertical_windows_and_shared_walls_stay_solid() {
    for seed in 0..8 {
        let mut manor = derived(base_layout(4, Compensation::BottomEnds));
        let _ = place_windows(&mut manor, &mut GenerationContext::new(seed));

        for room in manor.layout().room_ids() {
            let rect = manor.layout().rect(room);
            for direction in Direction::ALL {
                let recorded = manor.room_props(room).windows().contains(&direction);
                let glazed = rect
                    .side_cells(direction)
                    .into_iter()
                    .filter(|cell| manor.feature(*cell).is_window())
                    .collect::<Vec<_>>();
                assert_eq!(
                    recorded,
                    !glazed.is_empty(),
                    "seed {seed}: {room} {direction:?}"
                );

                let expected = if direction.faces_horizontal_wall() {
                    Tile::WindowHorizontal
                } else {
                    Tile::WindowVertical
                };
                for cell in glazed {
                    assert_eq!(manor.feature(cell), expected);
                    assert_eq!(
                        manor.room_indices(cell),
                        vec![room],
                        "seed {seed}: window at {cell} sits in a shared wall"
                    );
                }
            }
        }
    }
}
