use richmenu_studio::area::{Area, AreaAction};
use richmenu_studio::geometry::AreaRect;
use richmenu_studio::wire::{WireAction, to_wire_actions};

fn uri_area(x: f32, y: f32, w: f32, h: f32, url: &str) -> Area {
    Area::new(AreaRect::new(x, y, w, h), AreaAction::Uri { url: url.into() })
}

/// The worked example from the platform contract: 10/10/30/20 percent at a
/// 1040x1686 base maps to exact rounded pixels.
#[test]
fn test_percent_area_maps_to_base_pixels() {
    let area = uri_area(10.0, 10.0, 30.0, 20.0, "https://e.co");
    let actions = to_wire_actions(&[area], 1040, 1686);

    assert_eq!(actions.len(), 1);
    match &actions[0] {
        WireAction::Uri { link_uri, area, label } => {
            assert_eq!(link_uri, "https://e.co");
            assert!(label.is_none());
            assert_eq!(area.x, 104);
            assert_eq!(area.y, 169);
            assert_eq!(area.width, 312);
            assert_eq!(area.height, 337);
        }
        other => panic!("expected a uri action, got {other:?}"),
    }
}

/// Pre-normalized 0–1 fraction rects are accepted alongside percents.
#[test]
fn test_fraction_rect_form_is_accepted() {
    let fraction = Area::new(
        AreaRect { x: 0.1, y: 0.1, w: 0.3, h: 0.2 },
        AreaAction::Uri { url: "https://e.co".into() },
    );
    let actions = to_wire_actions(&[fraction], 1040, 1686);
    match &actions[0] {
        WireAction::Uri { area, .. } => {
            assert_eq!((area.x, area.y, area.width, area.height), (104, 169, 312, 337));
        }
        other => panic!("expected a uri action, got {other:?}"),
    }
}

/// Declaration order survives the mapping — consumers address actions
/// positionally.
#[test]
fn test_action_order_is_preserved() {
    let mut areas = Vec::new();
    for i in 0..5 {
        let mut area = Area::new(
            AreaRect::new(i as f32 * 15.0, 0.0, 10.0, 10.0),
            AreaAction::Message { text: format!("tap {i}") },
        );
        area.set_label(format!("L{i}"));
        areas.push(area);
    }

    let actions = to_wire_actions(&areas, 1000, 1000);
    for (i, action) in actions.iter().enumerate() {
        match action {
            WireAction::Message { text, label, .. } => {
                assert_eq!(text, &format!("tap {i}"));
                assert_eq!(label.as_deref(), Some(format!("L{i}").as_str()));
            }
            other => panic!("expected a message action, got {other:?}"),
        }
    }
}

/// The serialized shape matches the messaging platform's wire format.
#[test]
fn test_wire_serialization_shape() {
    let uri = uri_area(0.0, 0.0, 50.0, 50.0, "https://example.com/shop");
    let mut msg = Area::new(
        AreaRect::new(50.0, 0.0, 50.0, 50.0),
        AreaAction::Message { text: "hello".into() },
    );
    msg.set_label("Say hi");

    let actions = to_wire_actions(&[uri, msg], 1040, 1040);
    let value = serde_json::to_value(&actions).unwrap();

    assert_eq!(value[0]["type"], "uri");
    assert_eq!(value[0]["linkUri"], "https://example.com/shop");
    assert!(value[0].get("label").is_none());
    assert_eq!(value[0]["area"]["x"], 0);
    assert_eq!(value[0]["area"]["width"], 520);

    assert_eq!(value[1]["type"], "message");
    assert_eq!(value[1]["text"], "hello");
    assert_eq!(value[1]["label"], "Say hi");
    assert_eq!(value[1]["area"]["x"], 520);
}
