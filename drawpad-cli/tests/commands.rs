//! End-to-end runs of the drawpad subcommands against a temp data directory.

use std::path::Path;

use drawpad_cli::{run, Command, Config};
use drawpad_core::Rgba;
use drawpad_renderer::load_image_from_path;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(dir: &Path) -> Config {
    Config {
        data_dir: dir.join("data"),
        canvas_size: 64,
        background: Rgba::WHITE,
    }
}

async fn exec(config: &Config, command: Command) -> String {
    let mut out = Vec::new();
    run(config, command, &mut out).await.expect("command");
    String::from_utf8(out).expect("utf8")
}

#[tokio::test]
async fn test_new_list_delete_clear() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config(dir.path());

    let first = exec(&config, Command::New { name: "first".into() }).await;
    assert!(first.starts_with("1\tfirst\t"), "{first}");
    exec(&config, Command::New { name: "second".into() }).await;

    let listing = exec(&config, Command::List { json: false }).await;
    let names: Vec<_> = listing
        .lines()
        .map(|line| line.split('\t').nth(1).expect("name"))
        .collect();
    assert_eq!(names, ["second", "first"]);

    let rows: serde_json::Value =
        serde_json::from_str(&exec(&config, Command::List { json: true }).await).expect("json");
    assert_eq!(rows.as_array().map(Vec::len), Some(2));

    let deleted = exec(&config, Command::Delete { id: 1 }).await;
    assert_eq!(deleted.trim(), "Deleted 1 (first)");

    let mut out = Vec::new();
    assert!(run(&config, Command::Delete { id: 1 }, &mut out).await.is_err());

    let cleared = exec(&config, Command::Clear).await;
    assert_eq!(cleared.trim(), "Removed 1 drawings from the catalog");
    assert!(exec(&config, Command::List { json: false }).await.is_empty());
}

#[tokio::test]
async fn test_draw_script_and_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config(dir.path());

    let script = dir.path().join("strokes.json");
    std::fs::write(
        &script,
        r##"[
            { "op": "pen", "color": "#FF0000", "size": 6, "shape": "line" },
            { "op": "down", "x": 4, "y": 32 },
            { "op": "move", "x": 60, "y": 32 },
            { "op": "up" }
        ]"##,
    )
    .expect("script");

    let drawn = exec(
        &config,
        Command::Draw {
            name: "line".into(),
            script,
            from: None,
        },
    )
    .await;
    let stored = drawn.trim().split('\t').nth(2).expect("path").to_string();
    let saved = load_image_from_path(Path::new(&stored)).expect("saved");
    assert_eq!(saved.pixels.get_pixel(32, 32).0, [255, 0, 0, 255]);
    assert_eq!(saved.pixels.get_pixel(32, 10).0, [255, 255, 255, 255]);

    let png = dir.path().join("share.png");
    let exported = exec(
        &config,
        Command::Export {
            id: 1,
            out: png.clone(),
            quality: 85,
            thumbnail: None,
        },
    )
    .await;
    assert!(exported.trim().ends_with("\timage/png"), "{exported}");
    assert_eq!(load_image_from_path(&png).expect("png").pixels, saved.pixels);

    let thumb = dir.path().join("thumb.jpg");
    let exported = exec(
        &config,
        Command::Export {
            id: 1,
            out: thumb.clone(),
            quality: 90,
            thumbnail: Some(16),
        },
    )
    .await;
    assert!(exported.trim().ends_with("\timage/jpeg"), "{exported}");
    let decoded = load_image_from_path(&thumb).expect("jpeg");
    assert_eq!((decoded.width(), decoded.height()), (16, 16));
}

#[tokio::test]
async fn test_import_letterboxes_photo() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config(dir.path());

    let photo = dir.path().join("photo.png");
    image::RgbaImage::from_pixel(32, 16, image::Rgba([0, 0, 255, 255]))
        .save(&photo)
        .expect("photo");

    let imported = exec(
        &config,
        Command::Import {
            image: photo,
            name: "photo".into(),
        },
    )
    .await;
    let stored = imported.trim().split('\t').nth(2).expect("path").to_string();
    let canvas = load_image_from_path(Path::new(&stored)).expect("stored");
    assert_eq!((canvas.width(), canvas.height()), (64, 64));
    assert_eq!(canvas.pixels.get_pixel(32, 2).0, [255, 255, 255, 255]);
    assert_eq!(canvas.pixels.get_pixel(32, 32).0, [0, 0, 255, 255]);

    let mut out = Vec::new();
    let missing = Command::Import {
        image: dir.path().join("nope.png"),
        name: "nope".into(),
    };
    assert!(run(&config, missing, &mut out).await.is_err());
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_analyze_prints_objects_and_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [{
                "localizedObjectAnnotations": [{
                    "name": "Square",
                    "score": 0.5,
                    "boundingPoly": { "normalizedVertices": [
                        { "x": 0.25, "y": 0.25 }, { "x": 0.75, "y": 0.75 }
                    ] }
                }],
                "labelAnnotations": [{ "description": "Rectangle", "score": 0.75 }]
            }]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let config = config(dir.path());
    let image = dir.path().join("square.png");
    image::RgbaImage::from_pixel(40, 20, image::Rgba([0, 0, 0, 255]))
        .save(&image)
        .expect("image");

    let printed = exec(
        &config,
        Command::Analyze {
            image,
            api_key: "k".into(),
            endpoint: format!("{}/v1/images:annotate", server.uri()),
            json: false,
        },
    )
    .await;

    let lines: Vec<_> = printed.lines().collect();
    assert_eq!(lines, ["object\tSquare\t0.50\t10,5 20x10", "label\tRectangle\t0.75"]);
}
