//! Descriptor exporters, registered by file extension.

use crate::error::{Result, SpritePackError};
use crate::export_template::{ParseFn, TemplateExporter};
use crate::export_tpsheet::TpsheetExporter;
use crate::model::AtlasInfo;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Encodes and decodes a descriptor in one on-disk format.
pub trait Exporter {
    fn export(&self, atlas: &AtlasInfo) -> Result<Vec<u8>>;
    fn import(&self, data: &[u8]) -> Result<AtlasInfo>;
    fn ext(&self) -> &str;
    fn set_ext(&mut self, ext: &str);
}

/// Canonical JSON marshaller.
#[derive(Debug, Default)]
pub struct JsonExporter {
    ext: String,
}

impl Exporter for JsonExporter {
    fn export(&self, atlas: &AtlasInfo) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(atlas)?)
    }

    fn import(&self, data: &[u8]) -> Result<AtlasInfo> {
        Ok(serde_json::from_slice(data)?)
    }

    fn ext(&self) -> &str {
        &self.ext
    }

    fn set_ext(&mut self, ext: &str) {
        self.ext = ext.to_string();
    }
}

/// Maps lower-cased dot extensions to exporters.
#[derive(Default)]
pub struct ExporterManager {
    exporters: HashMap<String, Box<dyn Exporter>>,
}

impl ExporterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager with the default `.json` and `.tpsheet` registrations.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.register(".json", Box::new(JsonExporter::default()));
        manager.register(".tpsheet", Box::new(TpsheetExporter::default()));
        manager
    }

    pub fn register(&mut self, ext: &str, mut exporter: Box<dyn Exporter>) {
        let ext = ext.to_ascii_lowercase();
        exporter.set_ext(&ext);
        self.exporters.insert(ext, exporter);
    }

    /// Registers a template-driven exporter under `ext`. Without a parse
    /// function, importing that extension fails.
    pub fn register_template(&mut self, ext: &str, template: &str, parse: Option<ParseFn>) {
        self.register(ext, Box::new(TemplateExporter::new(template, parse)));
    }

    pub fn get(&self, ext: &str) -> Option<&dyn Exporter> {
        self.exporters.get(&ext.to_ascii_lowercase()).map(|e| &**e)
    }

    /// Encodes `atlas` and writes it to `path`; the exporter is chosen by
    /// the path's extension.
    pub fn export_to(&self, path: impl AsRef<Path>, atlas: &AtlasInfo) -> Result<()> {
        let path = path.as_ref();
        let ext = dot_ext(path);
        let Some(exporter) = self.exporters.get(&ext) else {
            return Err(SpritePackError::UnsupportedFormat(ext));
        };
        let data = exporter.export(atlas)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, data)?;
        Ok(())
    }

    /// Reads and decodes the descriptor at `path`. Unregistered extensions
    /// fall back to the JSON marshaller.
    pub fn import(&self, path: impl AsRef<Path>) -> Result<AtlasInfo> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let ext = dot_ext(path);
        match self.exporters.get(&ext) {
            Some(exporter) => exporter.import(&data),
            None => Ok(serde_json::from_slice(&data)?),
        }
    }
}

fn dot_ext(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}
