use richmenu_studio::geometry::{
    AreaRect, Handle, MIN_AREA_PCT, clamp_percent, constrain_rect, resize_rect, to_percent_rect,
    to_pixel_rect,
};

/// Percent → pixel → percent recovers the original rect within rounding
/// tolerance at typical container sizes.
#[test]
fn test_pixel_conversion_roundtrips() {
    let containers: [(f32, f32); 3] = [(800.0, 600.0), (1040.0, 1686.0), (375.0, 812.0)];

    for (cw, ch) in containers {
        // One pixel is at most 100/375 ≈ 0.27 percent in these containers.
        let tolerance = 100.0 / cw.min(ch) + 0.01;

        for xi in 0..10 {
            for wi in 1..6 {
                let x = xi as f32 * 7.5;
                let w = (wi as f32 * 11.25).min(100.0 - x).max(MIN_AREA_PCT);
                let rect = constrain_rect(
                    AreaRect::new(x, x / 2.0, w, w / 1.5),
                    MIN_AREA_PCT,
                    MIN_AREA_PCT,
                );

                let px = to_pixel_rect(rect, cw, ch);
                let back = to_percent_rect(px, cw, ch).unwrap();

                assert!((back.x - rect.x).abs() <= tolerance, "x: {back:?} vs {rect:?}");
                assert!((back.y - rect.y).abs() <= tolerance, "y: {back:?} vs {rect:?}");
                assert!((back.w - rect.w).abs() <= tolerance, "w: {back:?} vs {rect:?}");
                assert!((back.h - rect.h).abs() <= tolerance, "h: {back:?} vs {rect:?}");
            }
        }
    }
}

#[test]
fn test_clamping_never_rejects_input() {
    // Degenerate and out-of-range inputs all come back as boundary values.
    assert_eq!(clamp_percent(f32::NEG_INFINITY), 0.0);
    assert_eq!(clamp_percent(1e9), 100.0);

    let wild = AreaRect::new(250.0, -40.0, 500.0, 0.0);
    let constrained = constrain_rect(wild, MIN_AREA_PCT, MIN_AREA_PCT);
    assert!(constrained.x >= 0.0);
    assert!(constrained.right() <= 100.0);
    assert!(constrained.w >= MIN_AREA_PCT);
    assert!(constrained.h >= MIN_AREA_PCT);
}

/// Arbitrary sequences of handle drags never break the size/bounds
/// invariants.
#[test]
fn test_resize_sequences_hold_invariants() {
    let mut rect = AreaRect::new(20.0, 20.0, 30.0, 30.0);
    let deltas = [
        (Handle::SouthEast, 45.0, 45.0),
        (Handle::NorthWest, -80.0, 10.0),
        (Handle::East, 200.0, 0.0),
        (Handle::North, 0.0, 95.0),
        (Handle::West, 60.0, 0.0),
        (Handle::South, 0.0, -90.0),
        (Handle::SouthWest, -500.0, 500.0),
        (Handle::NorthEast, 3.25, -3.75),
    ];

    for (handle, dx, dy) in deltas {
        rect = resize_rect(rect, handle, dx, dy, MIN_AREA_PCT, MIN_AREA_PCT);

        assert!(rect.w >= MIN_AREA_PCT, "w below minimum after {handle:?}: {rect:?}");
        assert!(rect.h >= MIN_AREA_PCT, "h below minimum after {handle:?}: {rect:?}");
        assert!(rect.x >= 0.0 && rect.y >= 0.0, "negative origin after {handle:?}: {rect:?}");
        assert!(rect.right() <= 100.0, "x overflow after {handle:?}: {rect:?}");
        assert!(rect.bottom() <= 100.0, "y overflow after {handle:?}: {rect:?}");
    }
}

#[test]
fn test_corner_resize_composes_both_edges() {
    let start = AreaRect::new(10.0, 10.0, 40.0, 40.0);
    let out = resize_rect(start, Handle::NorthWest, -5.0, -8.0, MIN_AREA_PCT, MIN_AREA_PCT);

    // Both moving edges tracked the delta; the opposite corner stayed put.
    assert_eq!(out.x, 5.0);
    assert_eq!(out.y, 2.0);
    assert_eq!(out.right(), start.right());
    assert_eq!(out.bottom(), start.bottom());
}
