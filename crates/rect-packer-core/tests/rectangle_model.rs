use rect_packer_core::error::RectPackerError;
use rect_packer_core::model::INNER_CLEARANCE;
use rect_packer_core::prelude::*;
use serde_json::json;

fn uneven_frame() -> Rectangle {
    let borders = Borders::new(10, 20).with_top(30).with_right(40);
    Rectangle::windowed(200, 100, borders).unwrap()
}

#[test]
fn window_size_subtracts_borders_and_clearance() {
    let frame = uneven_frame();
    let w = frame.as_windowed().unwrap();
    assert_eq!(w.window_size(), (110, 30));
    assert!(w.is_hollow());
    assert_eq!(
        w.window_rect(),
        Rect::new(20 + INNER_CLEARANCE, 10 + INNER_CLEARANCE, 110, 30)
    );
    assert_eq!(w.inner_rect(), Rect::new(20, 10, 140, 60));
}

#[test]
fn borders_default_to_opposite_side() {
    let b = Borders::new(7, 9);
    assert_eq!((b.bottom, b.left, b.top, b.right), (7, 9, 7, 9));
    let u = Borders::uniform(4);
    assert_eq!((u.bottom, u.left, u.top, u.right), (4, 4, 4, 4));
}

#[test]
fn rotating_frame_cycles_borders() {
    let mut frame = uneven_frame();
    frame.rotate();

    assert!(frame.is_rotated());
    assert_eq!((frame.width(), frame.height()), (100, 200));
    let w = frame.as_windowed().unwrap();
    assert_eq!(w.window_size(), (30, 110));
    let b = w.borders();
    assert_eq!((b.bottom, b.left, b.top, b.right), (40, 10, 20, 30));

    // Window stays inside the turned frame with the same clearance on every side.
    let win = w.window_rect();
    assert_eq!(win, Rect::new(25, 55, 30, 110));
    assert_eq!(win.right() + INNER_CLEARANCE + b.right, 100);
    assert_eq!(win.top() + INNER_CLEARANCE + b.top, 200);
}

#[test]
fn rotate_twice_is_identity() {
    let original = uneven_frame().with_label("frame");
    let mut r = original.clone();
    r.rotate();
    assert_ne!(r, original);
    r.rotate();
    assert_eq!(r, original);

    let plain = Rectangle::new(3, 8).unwrap();
    let mut p = plain.clone();
    p.rotate();
    assert_eq!((p.width(), p.height()), (8, 3));
    p.rotate();
    assert_eq!(p, plain);
}

#[test]
fn placed_copy_keeps_variant_and_payload() {
    let frame = Rectangle::windowed(120, 80, Borders::uniform(10))
        .unwrap()
        .with_label("north wall")
        .with_data(json!({"sku": 17}))
        .with_flip(FlipPolicy::NoFlip);

    let placed = frame.placed_at(30, 40);
    assert_eq!((placed.x(), placed.y()), (30, 40));
    assert_eq!(placed.label(), Some("north wall"));
    assert_eq!(placed.data(), Some(&json!({"sku": 17})));
    assert_eq!(placed.flip_policy(), FlipPolicy::NoFlip);
    assert!(placed.as_windowed().is_some());
    assert_eq!(placed.hollow_window(), Some(Rect::new(55, 65, 70, 30)));
    // The request itself is untouched.
    assert_eq!((frame.x(), frame.y()), (0, 0));
}

#[test]
fn invalid_geometry_is_rejected_at_construction() {
    assert!(matches!(
        Rectangle::new(0, 5),
        Err(RectPackerError::InvalidGeometry { width: 0, height: 5 })
    ));
    assert!(matches!(
        Rectangle::windowed(10, 0, Borders::uniform(1)),
        Err(RectPackerError::InvalidGeometry { .. })
    ));
    match Rectangle::windowed(100, 100, Borders::uniform(40)) {
        Err(RectPackerError::InvalidWindow {
            window_width,
            window_height,
            ..
        }) => {
            assert_eq!(window_width, -10);
            assert_eq!(window_height, -10);
        }
        other => panic!("expected InvalidWindow, got {other:?}"),
    }
    // A window exactly one unit wide is still valid.
    assert!(Rectangle::windowed(61, 61, Borders::uniform(15)).is_ok());
}

#[test]
fn covered_area_skips_hollow_window() {
    let hollow = Rectangle::windowed(300, 300, Borders::uniform(100)).unwrap();
    assert_eq!(hollow.covered_area(), 90_000 - 70 * 70);
    let solid = hollow.clone().with_hollow(false);
    assert_eq!(solid.covered_area(), 90_000);
    assert_eq!(solid.hollow_window(), None);

    let plain = Rectangle::new(10, 10).unwrap().with_hollow(true);
    assert_eq!(plain.covered_area(), 100);
    assert!(plain.as_windowed().is_none());
}

#[test]
fn rect_geometry_helpers() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(5, 5, 10, 10);
    let c = Rect::new(10, 0, 5, 5);

    assert!(a.intersects(&b));
    assert_eq!(a.intersection_area(&b), 25);
    assert!(!a.intersects(&c));
    assert_eq!(a.intersection_area(&c), 0);
    assert!(Rect::new(2, 2, 3, 3).is_contained_in(&a));
    assert!(a.is_contained_in(&a));
    assert!(!b.is_contained_in(&a));
    assert_eq!((b.right(), b.top(), b.area()), (15, 15, 100));
}

#[test]
fn edges_saturate_near_u32_max() {
    let edge = Rect::new(u32::MAX - 5, u32::MAX - 1, 10, 10);
    assert_eq!((edge.right(), edge.top()), (u32::MAX, u32::MAX));
    assert!(edge.is_contained_in(&Rect::new(u32::MAX - 10, u32::MAX - 10, 10, 10)));
    assert!(edge.intersects(&Rect::new(u32::MAX - 3, u32::MAX - 3, 2, 3)));
}

#[test]
fn flip_policy_parsing() {
    assert_eq!("NoFlip".parse::<FlipPolicy>().unwrap(), FlipPolicy::NoFlip);
    assert_eq!("allow".parse::<FlipPolicy>().unwrap(), FlipPolicy::AllowFlip);
    assert_eq!("force_flip".parse::<FlipPolicy>().unwrap(), FlipPolicy::ForceFlip);
    assert!("sideways".parse::<FlipPolicy>().is_err());
    assert_eq!(FlipPolicy::default(), FlipPolicy::AllowFlip);
}

#[test]
fn rectangle_serializes_with_kind_tag() {
    let v = serde_json::to_value(uneven_frame()).unwrap();
    assert_eq!(v["kind"], "windowed");
    assert_eq!(v["window"], json!([110, 30]));
    assert_eq!(v["borders"]["right"], 40);

    let v = serde_json::to_value(Rectangle::new(4, 5).unwrap()).unwrap();
    assert_eq!(v["kind"], "plain");
    assert_eq!(v["rect"], json!({"x": 0, "y": 0, "w": 4, "h": 5}));
}
