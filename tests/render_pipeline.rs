use egui::Color32;
use richmenu_studio::area::{Area, AreaAction};
use richmenu_studio::block::{
    BlockConfig, HAlign, MIN_FONT_SIZE, TextPlacement, TextShadow, VAlign,
};
use richmenu_studio::geometry::AreaRect;
use richmenu_studio::render::surface::{DrawOp, RecordingSurface, Rect, Surface, TextStyle};
use richmenu_studio::render::{BlockVisual, Scene, auto_fit_font_size, draw_block, draw_scene};
use richmenu_studio::state::DesignState;

fn style(size: f32) -> TextStyle {
    TextStyle {
        family: String::new(),
        size,
        bold: false,
        color: Color32::WHITE,
    }
}

/// Auto-fit terminates on text that can never fit and never grows the font.
#[test]
fn test_auto_fit_shrinks_and_terminates() {
    let surface = RecordingSurface::new();

    // A 200x100 cell with a long string: must shrink below the initial 40.
    let long = "the quick brown fox jumps over the lazy dog";
    let fitted = auto_fit_font_size(&surface, long, "", false, 40.0, 200.0, 100.0);
    assert!(fitted <= 40.0);
    assert!(fitted >= MIN_FONT_SIZE);
    // Recorder metrics: width = chars * size * 0.6. At the fitted size the
    // line fits, or we bottomed out at the floor.
    let (w, _) = surface.measure_text(long, &style(fitted));
    assert!(w <= 200.0 || fitted == MIN_FONT_SIZE);

    // Text that cannot fit at any size stops at the floor rather than
    // looping forever.
    let absurd = "x".repeat(10_000);
    let fitted = auto_fit_font_size(&surface, &absurd, "", false, 120.0, 200.0, 100.0);
    assert_eq!(fitted, MIN_FONT_SIZE);

    // Short text keeps its requested size.
    let fitted = auto_fit_font_size(&surface, "ok", "", false, 24.0, 200.0, 100.0);
    assert_eq!(fitted, 24.0);
}

#[test]
fn test_multiline_text_draws_one_op_per_line() {
    let mut surface = RecordingSurface::new();
    let config = BlockConfig {
        text: "line one\nline two\nline three".into(),
        ..Default::default()
    };
    let visual = BlockVisual {
        config: &config,
        image: None,
        sticker: None,
    };

    draw_block(&mut surface, Rect::new(0.0, 0.0, 400.0, 300.0), &visual, 1.0);

    let texts: Vec<_> = surface.texts().collect();
    assert_eq!(texts.len(), 3);

    // Lines stack downward at a consistent line height.
    let ys: Vec<f32> = surface
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { pos, .. } => Some(pos.1),
            _ => None,
        })
        .collect();
    assert!(ys[0] < ys[1] && ys[1] < ys[2]);
    assert!((ys[1] - ys[0] - (ys[2] - ys[1])).abs() < 0.01);
}

#[test]
fn test_shadow_draws_behind_text() {
    let mut surface = RecordingSurface::new();
    let config = BlockConfig {
        text: "hey".into(),
        shadow: Some(TextShadow {
            color: Color32::BLACK,
            blur: 0.0,
            dx: 3.0,
            dy: 3.0,
        }),
        ..Default::default()
    };
    let visual = BlockVisual {
        config: &config,
        image: None,
        sticker: None,
    };

    draw_block(&mut surface, Rect::new(0.0, 0.0, 200.0, 100.0), &visual, 1.0);

    let texts: Vec<_> = surface
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { pos, color, .. } => Some((*pos, *color)),
            _ => None,
        })
        .collect();
    assert_eq!(texts.len(), 2);

    // Shadow first (painter's algorithm), offset by (dx, dy).
    let (shadow_pos, shadow_color) = texts[0];
    let (text_pos, text_color) = texts[1];
    assert_eq!(shadow_color, Color32::BLACK);
    assert_eq!(text_color, Color32::WHITE);
    assert!((shadow_pos.0 - text_pos.0 - 3.0).abs() < 0.01);
    assert!((shadow_pos.1 - text_pos.1 - 3.0).abs() < 0.01);
}

#[test]
fn test_alignment_positions_text_in_cell() {
    let cell = Rect::new(100.0, 100.0, 200.0, 100.0);

    let mut left = RecordingSurface::new();
    let mut right = RecordingSurface::new();
    for (surface, align) in [(&mut left, HAlign::Left), (&mut right, HAlign::Right)] {
        let config = BlockConfig {
            text: "hi".into(),
            placement: TextPlacement::Grid {
                align,
                v_align: VAlign::Top,
            },
            ..Default::default()
        };
        let visual = BlockVisual {
            config: &config,
            image: None,
            sticker: None,
        };
        draw_block(surface, cell, &visual, 1.0);
    }

    let x_of = |s: &RecordingSurface| match s.texts().next().unwrap() {
        DrawOp::Text { pos, .. } => pos.0,
        _ => unreachable!(),
    };
    // Left-aligned starts at the padded left edge; right-aligned ends at
    // the padded right edge.
    assert!(x_of(&left) < x_of(&right));
    assert!((x_of(&left) - (cell.x + 8.0)).abs() < 0.01);
}

/// The export pass is the preview pass at a different scale: every
/// geometric quantity doubles when the scale doubles.
#[test]
fn test_scene_is_scale_invariant() {
    let mut state = DesignState::default();
    state.areas.push(Area::new(
        AreaRect::new(10.0, 10.0, 50.0, 40.0),
        AreaAction::default(),
    ));
    state.sync_blocks();
    state.blocks[0].text = "scaled".into();
    state.blocks[0].fill = Color32::from_rgb(200, 40, 40);
    state.blocks[0].padding = 10.0;

    let render_at = |width: f32, scale: f32| {
        let mut surface = RecordingSurface::new();
        let scene = Scene {
            canvas: Rect::new(0.0, 0.0, width, width / 2.0),
            background: None,
            areas: &state.areas,
            blocks: state
                .blocks
                .iter()
                .map(|config| BlockVisual {
                    config,
                    image: None,
                    sticker: None,
                })
                .collect(),
            selected: None,
            scale,
            decorations: false,
        };
        draw_scene(&mut surface, &scene);
        surface.ops
    };

    let small = render_at(500.0, 1.0);
    let large = render_at(1000.0, 2.0);
    assert_eq!(small.len(), large.len());

    for (a, b) in small.iter().zip(large.iter()) {
        match (a, b) {
            (DrawOp::FillRect { rect: ra, .. }, DrawOp::FillRect { rect: rb, .. }) => {
                assert!((ra.x * 2.0 - rb.x).abs() < 1.5);
                assert!((ra.w * 2.0 - rb.w).abs() < 1.5);
            }
            (
                DrawOp::Text { pos: pa, size: sa, .. },
                DrawOp::Text { pos: pb, size: sb, .. },
            ) => {
                assert!((sa * 2.0 - sb).abs() < 0.01, "font size must scale");
                assert!((pa.0 * 2.0 - pb.0).abs() < 1.5);
                assert!((pa.1 * 2.0 - pb.1).abs() < 1.5);
            }
            (a, b) => assert_eq!(
                std::mem::discriminant(a),
                std::mem::discriminant(b),
                "op order diverged between scales"
            ),
        }
    }
}

#[test]
fn test_draw_order_is_fill_image_text() {
    let mut surface = RecordingSurface::new();
    let config = BlockConfig {
        text: "top".into(),
        fill: Color32::from_rgb(10, 20, 30),
        image: Some(richmenu_studio::block::BlockImage {
            path: "unused.png".into(),
            fit: richmenu_studio::block::ImageFit::Cover,
        }),
        ..Default::default()
    };
    let image = (640u32, 480u32);
    let visual = BlockVisual {
        config: &config,
        image: Some(&image),
        sticker: None,
    };

    draw_block(&mut surface, Rect::new(0.0, 0.0, 300.0, 200.0), &visual, 1.0);

    let fill_at = surface
        .ops
        .iter()
        .position(|op| matches!(op, DrawOp::FillRect { .. }))
        .unwrap();
    let image_at = surface
        .ops
        .iter()
        .position(|op| matches!(op, DrawOp::Image { .. }))
        .unwrap();
    let text_at = surface
        .ops
        .iter()
        .position(|op| matches!(op, DrawOp::Text { .. }))
        .unwrap();
    assert!(fill_at < image_at && image_at < text_at);

    // The cover image is clipped to its cell.
    let clip_at = surface
        .ops
        .iter()
        .position(|op| matches!(op, DrawOp::PushClip(_)))
        .unwrap();
    assert!(clip_at < image_at);
}
