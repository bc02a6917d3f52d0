use image::RgbaImage;
use parking_lot::Mutex;
use richmenu_studio::error::{StudioError, StudioResult};
use richmenu_studio::export::store::{DirectoryStore, FileStore};
use richmenu_studio::export::{EXPORT_WIDTHS, publish_variants};
use richmenu_studio::wire::WireAction;
use std::path::PathBuf;

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("richmenu_studio_{tag}_{}", uuid::Uuid::new_v4()))
}

fn checkered_source(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            image::Rgba([220, 90, 30, 255])
        } else {
            image::Rgba([30, 90, 220, 255])
        }
    })
}

/// A 1000x674 source against the standard widths yields variants whose
/// heights preserve the aspect ratio, and the base size comes from the
/// largest variant.
#[test]
fn test_variant_heights_preserve_aspect_ratio() {
    let root = temp_dir("variants");
    let store = DirectoryStore::new(&root, "https://cdn.example/assets");
    let source = checkered_source(1000, 674);

    let publish = publish_variants(&store, "imagemaps/demo", &source, &EXPORT_WIDTHS, Vec::new())
        .expect("publish should succeed");

    let expected: Vec<(u32, u32)> = EXPORT_WIDTHS
        .iter()
        .map(|&w| (w, (w as f64 * 674.0 / 1000.0).round() as u32))
        .collect();
    assert_eq!(expected, vec![(240, 162), (300, 202), (460, 310), (700, 472), (1040, 701)]);

    for (width, height) in expected {
        let url = publish.urls.get(&width).expect("every width gets a URL");
        assert_eq!(*url, format!("https://cdn.example/assets/imagemaps/demo/{width}"));

        // The stored JPEG really has the computed dimensions.
        let bytes = std::fs::read(root.join("imagemaps/demo").join(width.to_string())).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (width, height));

        assert_eq!(
            store.content_type_of(&format!("imagemaps/demo/{width}")).as_deref(),
            Some("image/jpeg")
        );
    }

    assert_eq!(publish.base_size.width, 1040);
    assert_eq!(publish.base_size.height, 701);
    assert_eq!(publish.base_url, "https://cdn.example/assets/imagemaps/demo");

    let _ = std::fs::remove_dir_all(root);
}

/// A store that fails on one particular path, for fail-fast checks.
struct FlakyStore {
    inner: DirectoryStore,
    fail_on: String,
    uploads: Mutex<Vec<String>>,
}

impl FileStore for FlakyStore {
    fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> StudioResult<String> {
        if path.ends_with(&self.fail_on) {
            return Err(StudioError::Upload {
                path: path.to_owned(),
                source: std::io::Error::other("simulated outage"),
            });
        }
        self.uploads.lock().push(path.to_owned());
        self.inner.put(path, bytes, content_type)
    }

    fn url_for(&self, path: &str) -> String {
        self.inner.url_for(path)
    }
}

/// The first failing upload aborts the publish; later variants are never
/// attempted, earlier ones stay behind.
#[test]
fn test_publish_is_fail_fast() {
    let root = temp_dir("failfast");
    let store = FlakyStore {
        inner: DirectoryStore::new(&root, "https://cdn.example"),
        fail_on: "/460".into(),
        uploads: Mutex::new(Vec::new()),
    };
    let source = checkered_source(1000, 674);

    let result = publish_variants(&store, "imagemaps/x", &source, &EXPORT_WIDTHS, Vec::new());
    assert!(matches!(result, Err(StudioError::Upload { .. })));

    // 240 and 300 made it up before the failure; nothing after 460 ran.
    let uploads = store.uploads.lock();
    assert_eq!(uploads.as_slice(), ["imagemaps/x/240", "imagemaps/x/300"]);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_publish_result_serializes_to_contract_shape() {
    let root = temp_dir("contract");
    let store = DirectoryStore::new(&root, "https://cdn.example");
    let source = checkered_source(800, 800);

    let actions = vec![WireAction::Message {
        label: None,
        text: "hello".into(),
        area: richmenu_studio::wire::WireArea {
            x: 0,
            y: 0,
            width: 520,
            height: 520,
        },
    }];
    let publish =
        publish_variants(&store, "imagemaps/square", &source, &[240, 1040], actions).unwrap();

    let value = serde_json::to_value(&publish).unwrap();
    assert_eq!(value["baseSize"]["width"], 1040);
    assert_eq!(value["baseSize"]["height"], 1040);
    assert!(value["baseUrl"].as_str().unwrap().ends_with("imagemaps/square"));
    assert!(value["urls"]["240"].is_string());
    assert_eq!(value["actions"][0]["type"], "message");
    assert_eq!(value["actions"][0]["area"]["width"], 520);

    let _ = std::fs::remove_dir_all(root);
}
