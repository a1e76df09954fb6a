//! Property-based tests for link mode and gestures driven through the
//! session.
//!
//! 1. The pending room set never exceeds two, and holds only live rooms.
//! 2. Any resize gesture leaves both dimensions at or above the minimum.
//! 3. Invalid metadata text never changes the stored blob.

use proptest::prelude::*;
use rp_core::{MIN_SHAPE_SIZE, ShapeId, ShapeType};
use rp_editor::{EditOutcome, EditorSession, InputEvent};

#[derive(Debug, Clone)]
enum Step {
    ClickRoom(usize),
    ClickAperture(usize),
    EnterLinkMode,
    DeleteRoom(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (0usize..5).prop_map(Step::ClickRoom),
        1 => (0usize..2).prop_map(Step::ClickAperture),
        1 => Just(Step::EnterLinkMode),
        1 => (0usize..5).prop_map(Step::DeleteRoom),
    ]
}

fn pick(ids: &[ShapeId], i: usize) -> Option<ShapeId> {
    (!ids.is_empty()).then(|| ids[i % ids.len()])
}

proptest! {
    #[test]
    fn pending_set_is_capped(steps in prop::collection::vec(step_strategy(), 0..80)) {
        let mut s = EditorSession::default();
        let mut rooms: Vec<ShapeId> = (0..5).map(|_| s.add_shape(ShapeType::Room)).collect();
        let apertures: Vec<ShapeId> = (0..2).map(|_| s.add_shape(ShapeType::Aperture)).collect();
        s.enter_link_mode();

        for step in &steps {
            match step {
                Step::ClickRoom(i) => {
                    if let Some(id) = pick(&rooms, *i) {
                        s.click_shape(id);
                    }
                }
                Step::ClickAperture(i) => {
                    if let Some(id) = pick(&apertures, *i) {
                        s.click_shape(id);
                    }
                }
                Step::EnterLinkMode => s.enter_link_mode(),
                Step::DeleteRoom(i) => {
                    if let Some(id) = pick(&rooms, *i) {
                        s.delete_shape(id);
                        rooms.retain(|r| *r != id);
                    }
                }
            }
            prop_assert!(s.pending_rooms().len() <= 2);
            for r in s.pending_rooms() {
                prop_assert!(s.registry.is_room(*r));
            }
            for a in s.registry.apertures() {
                prop_assert!(a.kind.connected_rooms().len() <= 2);
            }
        }
    }
}

proptest! {
    #[test]
    fn resize_gesture_respects_floor(x in -400.0f64..600.0, y in -400.0f64..600.0) {
        let mut s = EditorSession::default();
        let room = s.add_room();
        // Default room spans 50..150; its handle covers 140..150.
        s.handle_event(&InputEvent::pointer_down(145.0, 145.0));
        s.handle_event(&InputEvent::pointer_move(x, y));
        s.handle_event(&InputEvent::pointer_up(x, y));

        let b = s.geometry.get(room).unwrap();
        prop_assert!(b.width >= MIN_SHAPE_SIZE);
        prop_assert!(b.height >= MIN_SHAPE_SIZE);
        prop_assert_eq!((b.left, b.top), (50.0, 50.0));
    }
}

proptest! {
    #[test]
    fn unparsable_metadata_is_atomic(garbage in "\\{[a-z :,]{0,20}") {
        let mut s = EditorSession::default();
        let room = s.add_room();
        let before = s.registry.attributes(room).cloned();

        if s.edit_metadata(&garbage) == EditOutcome::Invalid {
            prop_assert_eq!(s.registry.attributes(room).cloned(), before);
            prop_assert!(s.metadata().error().is_some());
        }
    }
}
