//! Property-based invariant tests for the shape registry and codec.
//!
//! For arbitrary sequences of add / link / remove / move operations:
//!
//! 1. Every aperture links at most two rooms, all of them live.
//! 2. A removed room's id appears in no aperture afterwards.
//! 3. `deserialize(serialize(S))` reproduces S.
//! 4. `set_size` never produces a dimension below the minimum.

use proptest::prelude::*;
use rp_core::*;

#[derive(Debug, Clone)]
enum Op {
    AddRoom,
    AddAperture,
    /// Link aperture `a` (index into live apertures) to rooms at the given
    /// indices into live rooms.
    Link { a: usize, rooms: Vec<usize> },
    Remove(usize),
    Move { target: usize, x: f64, y: f64 },
    Resize { target: usize, w: f64, h: f64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::AddRoom),
        2 => Just(Op::AddAperture),
        3 => (0usize..8, prop::collection::vec(0usize..8, 0..=2))
            .prop_map(|(a, rooms)| Op::Link { a, rooms }),
        2 => (0usize..8).prop_map(Op::Remove),
        1 => (0usize..8, -500.0f64..500.0, -500.0f64..500.0)
            .prop_map(|(target, x, y)| Op::Move { target, x, y }),
        1 => (0usize..8, -100.0f64..400.0, -100.0f64..400.0)
            .prop_map(|(target, w, h)| Op::Resize { target, w, h }),
    ]
}

struct World {
    reg: ShapeRegistry,
    geo: GeometryModel,
    removed_rooms: Vec<ShapeId>,
}

impl World {
    fn new() -> Self {
        Self {
            reg: ShapeRegistry::new(),
            geo: GeometryModel::new(),
            removed_rooms: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Op) {
        let config = EditorConfig::default();
        match op {
            Op::AddRoom | Op::AddAperture => {
                let t = if matches!(op, Op::AddRoom) {
                    ShapeType::Room
                } else {
                    ShapeType::Aperture
                };
                let id = self.reg.add_shape(t);
                self.geo.insert(id, config.spawn_bounds(t));
            }
            Op::Link { a, rooms } => {
                let apertures: Vec<ShapeId> = self.reg.apertures().map(|s| s.id).collect();
                let live: Vec<ShapeId> = self.reg.rooms().map(|s| s.id).collect();
                if apertures.is_empty() || live.is_empty() {
                    return;
                }
                let aperture = apertures[a % apertures.len()];
                let mut picked: Vec<ShapeId> = Vec::new();
                for r in rooms {
                    let id = live[r % live.len()];
                    if !picked.contains(&id) {
                        picked.push(id);
                    }
                }
                self.reg.link_aperture(aperture, &picked);
            }
            Op::Remove(i) => {
                let ids = self.reg.ids().to_vec();
                if ids.is_empty() {
                    return;
                }
                let id = ids[i % ids.len()];
                if let Some(shape) = self.reg.remove_shape(id) {
                    self.geo.remove(id);
                    if shape.kind.is_room() {
                        self.removed_rooms.push(id);
                    }
                }
            }
            Op::Move { target, x, y } => {
                if let Some(&id) = self.reg.ids().get(target % self.reg.len().max(1)) {
                    self.geo.set_position(id, *x, *y);
                }
            }
            Op::Resize { target, w, h } => {
                if let Some(&id) = self.reg.ids().get(target % self.reg.len().max(1)) {
                    self.geo.set_size(id, *w, *h);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn links_stay_capped_and_live(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut world = World::new();
        for op in &ops {
            world.apply(op);
            for aperture in world.reg.apertures() {
                let rooms = aperture.kind.connected_rooms();
                prop_assert!(rooms.len() <= 2, "{:?} links {} rooms", aperture.id, rooms.len());
                for room in rooms {
                    prop_assert!(world.reg.is_room(*room), "{:?} links dead room {:?}", aperture.id, room);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn removed_rooms_never_referenced(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut world = World::new();
        for op in &ops {
            world.apply(op);
        }
        for room in &world.removed_rooms {
            for aperture in world.reg.apertures() {
                prop_assert!(!aperture.kind.connected_rooms().contains(room));
            }
        }
    }
}

proptest! {
    #[test]
    fn serialize_deserialize_round_trip(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut world = World::new();
        for op in &ops {
            world.apply(op);
        }
        let doc = serialize(&world.reg, &world.geo);
        let (reg2, geo2) = deserialize(&doc).unwrap();

        prop_assert_eq!(reg2.ids(), world.reg.ids());
        for shape in world.reg.iter() {
            prop_assert_eq!(reg2.get(shape.id), Some(shape));
            prop_assert_eq!(geo2.get(shape.id), world.geo.get(shape.id));
        }
        prop_assert_eq!(serialize(&reg2, &geo2), doc);
    }
}

proptest! {
    #[test]
    fn resize_floor_holds(w in -1.0e6f64..1.0e6, h in -1.0e6f64..1.0e6) {
        let mut geo = GeometryModel::new();
        let id = ShapeId::intern("floor_probe");
        geo.insert(id, Bounds::new(0.0, 0.0, 100.0, 100.0));
        geo.set_size(id, w, h);
        let b = geo.get(id).unwrap();
        prop_assert!(b.width >= MIN_SHAPE_SIZE && b.height >= MIN_SHAPE_SIZE);
    }
}
