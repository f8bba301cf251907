//! Godot-style sprite sheet exporter (`.tpsheet`), template-driven.
//! Margins record the trimmed-away border per side, so
//! `src.w = region.w + margin.x + margin.w` (and likewise vertically).
//! Rotation is not representable in this format and imports as `false`.

use crate::error::{Result, SpritePackError};
use crate::export::Exporter;
use crate::model::{Atlas, AtlasInfo, Meta, Rectangle, Size, Sprite};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};

const TPSHEET_TEMPLATE: &str = r#"{
    "meta": {
        "repo": "{{meta.repo}}",
        "format": "{{meta.format}}",
        "version": "{{meta.version}}",
        "timestamp": "{{meta.timestamp}}"
    },
    "textures": [
        {
            "image": "{{image}}",
            "size": {
                "w": {{size.w}},
                "h": {{size.h}}
            },
            "sprites": [
                {{#each sprites}}
                {
                    "filename": "{{name}}",
                    "region": {
                        "x": {{region.x}},
                        "y": {{region.y}},
                        "w": {{region.w}},
                        "h": {{region.h}}
                    },
                    "margin": {
                        "x": {{margin.x}},
                        "y": {{margin.y}},
                        "w": {{margin.w}},
                        "h": {{margin.h}}
                    }
                }{{#unless @last}},{{/unless}}
                {{/each}}
            ]
        }
    ]
}"#;

#[derive(Serialize)]
struct SheetSprite {
    name: String,
    region: Rectangle,
    margin: Rectangle,
}

#[derive(Serialize)]
struct SheetContext {
    meta: Meta,
    image: String,
    size: Size,
    sprites: Vec<SheetSprite>,
}

#[derive(Deserialize)]
struct RawSheet {
    textures: Vec<RawTexture>,
}

#[derive(Deserialize)]
struct RawTexture {
    image: String,
    size: Size,
    sprites: Vec<RawSprite>,
}

#[derive(Deserialize)]
struct RawSprite {
    filename: String,
    region: Rectangle,
    #[serde(default)]
    margin: Rectangle,
}

pub struct TpsheetExporter {
    ext: String,
}

impl Default for TpsheetExporter {
    fn default() -> Self {
        Self {
            ext: ".tpsheet".into(),
        }
    }
}

fn margin_of(sprite: &Sprite) -> Rectangle {
    if !sprite.trimmed {
        return Rectangle::default();
    }
    let trimmed = sprite.trimmed_rect;
    Rectangle::new(
        trimmed.x,
        trimmed.y,
        sprite.src_rect.w - trimmed.w - trimmed.x,
        sprite.src_rect.h - trimmed.h - trimmed.y,
    )
}

impl Exporter for TpsheetExporter {
    fn export(&self, atlas_info: &AtlasInfo) -> Result<Vec<u8>> {
        let Some(atlas) = atlas_info.atlases.first() else {
            return Err(SpritePackError::Encode("no atlas to export".into()));
        };
        let sprites = atlas
            .sprites
            .iter()
            .map(|sprite| SheetSprite {
                name: sprite.file_name.clone(),
                region: sprite.frame,
                margin: margin_of(sprite),
            })
            .collect();
        let context = SheetContext {
            meta: atlas_info.meta.clone(),
            image: atlas.name.clone(),
            size: atlas.size,
            sprites,
        };
        let rendered = Handlebars::new().render_template(TPSHEET_TEMPLATE, &context)?;
        Ok(rendered.into_bytes())
    }

    fn import(&self, data: &[u8]) -> Result<AtlasInfo> {
        let raw: RawSheet = serde_json::from_slice(data)?;
        let Some(texture) = raw.textures.into_iter().next() else {
            return Err(SpritePackError::Encode("no texture found".into()));
        };
        let sprites = texture
            .sprites
            .into_iter()
            .map(|raw| {
                let trimmed = !raw.margin.is_zero();
                let trimmed_rect = if trimmed {
                    Rectangle::new(raw.margin.x, raw.margin.y, raw.region.w, raw.region.h)
                } else {
                    Rectangle::default()
                };
                Sprite {
                    file_name: raw.filename,
                    frame: raw.region,
                    src_rect: Size::new(
                        raw.region.w + raw.margin.x + raw.margin.w,
                        raw.region.h + raw.margin.y + raw.margin.h,
                    ),
                    trimmed_rect,
                    rotated: false,
                    trimmed,
                }
            })
            .collect();
        Ok(AtlasInfo {
            meta: Meta {
                format: "tpsheet".into(),
                ..Meta::default()
            },
            atlases: vec![Atlas {
                name: texture.image,
                size: texture.size,
                sprites,
            }],
        })
    }

    fn ext(&self) -> &str {
        &self.ext
    }

    fn set_ext(&mut self, ext: &str) {
        self.ext = ext.to_string();
    }
}
