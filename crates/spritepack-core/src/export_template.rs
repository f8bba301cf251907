//! Generic template-driven exporter: a user-supplied handlebars template is
//! rendered against the descriptor tree.

use crate::error::{Result, SpritePackError};
use crate::export::Exporter;
use crate::model::AtlasInfo;
use handlebars::{handlebars_helper, Handlebars, HelperDef};

handlebars_helper!(is_last: |index: u64, length: u64| index + 1 == length);

/// Decodes template output back into a descriptor.
pub type ParseFn = Box<dyn Fn(&[u8]) -> Result<AtlasInfo> + Send + Sync>;

pub struct TemplateExporter {
    ext: String,
    template: String,
    parse: Option<ParseFn>,
    registry: Handlebars<'static>,
}

impl TemplateExporter {
    pub fn new(template: impl Into<String>, parse: Option<ParseFn>) -> Self {
        let mut registry = Handlebars::new();
        registry.register_helper("is_last", Box::new(is_last));
        Self {
            ext: ".tmpl".into(),
            template: template.into(),
            parse,
            registry,
        }
    }

    /// Extensibility seam: makes `name` callable from the template.
    pub fn register_helper(&mut self, name: &str, helper: Box<dyn HelperDef + Send + Sync>) {
        self.registry.register_helper(name, helper);
    }
}

impl Exporter for TemplateExporter {
    fn export(&self, atlas: &AtlasInfo) -> Result<Vec<u8>> {
        if self.template.is_empty() {
            return Err(SpritePackError::Template("template string is empty".into()));
        }
        let rendered = self.registry.render_template(&self.template, atlas)?;
        Ok(rendered.into_bytes())
    }

    fn import(&self, data: &[u8]) -> Result<AtlasInfo> {
        match &self.parse {
            Some(parse) => parse(data),
            None => Err(SpritePackError::Template(
                "parse function not provided".into(),
            )),
        }
    }

    fn ext(&self) -> &str {
        &self.ext
    }

    fn set_ext(&mut self, ext: &str) {
        self.ext = ext.to_string();
    }
}
