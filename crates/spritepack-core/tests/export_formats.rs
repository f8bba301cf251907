use spritepack_core::prelude::*;
use spritepack_core::SpritePackError;

fn sample_info() -> AtlasInfo {
    AtlasInfo {
        meta: Meta {
            repo: "repo".into(),
            format: "RGBA8888".into(),
            version: "1.2.3".into(),
            timestamp: "2025-01-01 00:00:00".into(),
        },
        atlases: vec![Atlas {
            name: "atlas.png".into(),
            size: Size::new(128, 64),
            sprites: vec![
                Sprite {
                    file_name: "a.png".into(),
                    frame: Rectangle::new(0, 0, 20, 30),
                    src_rect: Size::new(32, 40),
                    trimmed_rect: Rectangle::new(3, 5, 20, 30),
                    rotated: false,
                    trimmed: true,
                },
                Sprite {
                    file_name: "b.png".into(),
                    frame: Rectangle::new(20, 0, 16, 16),
                    src_rect: Size::new(16, 16),
                    trimmed_rect: Rectangle::default(),
                    rotated: false,
                    trimmed: false,
                },
            ],
        }],
    }
}

#[test]
fn json_export_round_trips() {
    let manager = ExporterManager::with_defaults();
    let exporter = manager.get(".json").unwrap();
    let data = exporter.export(&sample_info()).unwrap();
    let back = exporter.import(&data).unwrap();
    assert_eq!(back.meta.version, "1.2.3");
    assert_eq!(back.atlases.len(), 1);
    let sprites = &back.atlases[0].sprites;
    assert_eq!(sprites[0].trimmed_rect, Rectangle::new(3, 5, 20, 30));
    assert_eq!(sprites[1].trimmed_rect, Rectangle::default());
    assert_eq!(sprites[1].src_rect, Size::new(16, 16));
}

#[test]
fn json_omits_zero_trimmed_rect() {
    let manager = ExporterManager::with_defaults();
    let data = manager.get(".json").unwrap().export(&sample_info()).unwrap();
    let text = String::from_utf8(data).unwrap();
    // present for the trimmed sprite, absent for the untrimmed one
    assert_eq!(text.matches("trimmedRect").count(), 1);
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ExporterManager::with_defaults();
    let err = manager
        .export_to(dir.path().join("atlas.yaml"), &sample_info())
        .unwrap_err();
    assert!(matches!(err, SpritePackError::UnsupportedFormat(_)));
}

#[test]
fn import_falls_back_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ExporterManager::with_defaults();
    let path = dir.path().join("atlas.descriptor");
    std::fs::write(
        &path,
        serde_json::to_vec(&sample_info()).unwrap(),
    )
    .unwrap();
    let back = manager.import(&path).unwrap();
    assert_eq!(back.atlases[0].name, "atlas.png");
}

#[test]
fn tpsheet_margins_round_trip() {
    let manager = ExporterManager::with_defaults();
    let exporter = manager.get(".tpsheet").unwrap();
    let data = exporter.export(&sample_info()).unwrap();
    let text = String::from_utf8(data.clone()).unwrap();
    assert!(text.contains("\"textures\""));
    // src 32x40 with content (3,5,20,30): right margin 9, bottom margin 5
    assert!(text.contains("\"x\": 3"));
    assert!(text.contains("\"w\": 9"));

    let back = exporter.import(&data).unwrap();
    let sprite = &back.atlases[0].sprites[0];
    assert!(sprite.trimmed);
    assert_eq!(sprite.src_rect, Size::new(32, 40));
    assert_eq!(sprite.trimmed_rect, Rectangle::new(3, 5, 20, 30));
    let plain = &back.atlases[0].sprites[1];
    assert!(!plain.trimmed);
    assert_eq!(plain.src_rect, Size::new(16, 16));
}

#[test]
fn template_exporter_applies_is_last() {
    let template =
        "{{#each atlases.[0].sprites}}{{filename}}{{#unless (is_last @index 2)}},{{/unless}}{{/each}}";
    let mut manager = ExporterManager::new();
    manager.register_template(".lst", template, None);
    let data = manager.get(".lst").unwrap().export(&sample_info()).unwrap();
    assert_eq!(String::from_utf8(data).unwrap(), "a.png,b.png");
}

#[test]
fn template_import_requires_parse_fn() {
    let mut manager = ExporterManager::new();
    manager.register_template(".lst", "x", None);
    let err = manager.get(".lst").unwrap().import(b"x").unwrap_err();
    assert!(err.to_string().contains("parse function not provided"));
}

#[test]
fn template_import_uses_parse_fn() {
    let mut manager = ExporterManager::new();
    manager.register_template(
        ".lst",
        "unused",
        Some(Box::new(|_| {
            Ok(AtlasInfo {
                meta: Meta::default(),
                atlases: Vec::new(),
            })
        })),
    );
    let back = manager.get(".lst").unwrap().import(b"anything").unwrap();
    assert!(back.atlases.is_empty());
}
