//! Operator palette: the read-only catalog of templates a pipeline is built from.
//!
//! A [`Palette`] is constructed once and injected into the editor (usually
//! behind an `Arc`). It is either the built-in remote-sensing catalog or
//! loaded from a TOML file of the same shape:
//!
//! ```toml
//! [[categories]]
//! name = "数据处理"
//!
//! [[categories.templates]]
//! key = "band_composite"
//! name = "波段合成"
//! icon = "layers"
//! outputs = ["合成影像"]
//!
//! [[categories.templates.fields]]
//! label = "波段组合"
//! type = "select"
//! options = ["RGB", "NRG"]
//! ```

pub mod builtin;
pub mod schema;

pub use schema::{FieldType, ParamField, RangeBounds};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::{DesignerError, Result};

/// Stable identifier of a template; nodes bind to their schema through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateKey(pub String);

impl TemplateKey {
    /// Template key carried by the start terminal.
    pub const START: &'static str = "start";
    /// Template key carried by the end terminal.
    pub const END: &'static str = "end";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// How the properties panel treats nodes of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateBehavior {
    /// Form generated from `fields`.
    #[default]
    Schema,
    /// Bespoke cloud data input form (path + selector + matcher).
    CloudInput,
}

/// A palette entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub key: TemplateKey,
    /// Display name, also the base of node names.
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub behavior: TemplateBehavior,
    #[serde(default)]
    pub description: String,
    /// Ordered input parameter schema.
    #[serde(default)]
    pub fields: Vec<ParamField>,
    /// Outputs this operator produces, offered as mapping sources.
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl Template {
    pub fn new(key: &str, name: &str, icon: &str) -> Self {
        Self {
            key: TemplateKey::from(key),
            name: name.to_string(),
            icon: icon.to_string(),
            behavior: TemplateBehavior::Schema,
            description: String::new(),
            fields: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_behavior(mut self, behavior: TemplateBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_field(mut self, field: ParamField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn field(&self, label: &str) -> Option<&ParamField> {
        self.fields.iter().find(|f| f.label == label)
    }
}

/// A named group of templates shown together in the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub templates: Vec<Template>,
}

impl Category {
    pub fn new(name: &str, templates: Vec<Template>) -> Self {
        Self {
            name: name.to_string(),
            templates,
        }
    }
}

#[derive(Deserialize)]
struct PaletteFile {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Read-only template catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    categories: Vec<Category>,
}

impl Palette {
    /// Build a palette, rejecting duplicate template keys or names and
    /// templates that reuse a terminal key.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for template in categories.iter().flat_map(|c| c.templates.iter()) {
            let key = template.key.as_str();
            if key.is_empty() {
                return Err(DesignerError::Palette(format!(
                    "template '{}' has an empty key",
                    template.name
                )));
            }
            if key == TemplateKey::START || key == TemplateKey::END {
                return Err(DesignerError::Palette(format!(
                    "template key '{}' is reserved",
                    key
                )));
            }
            if !keys.insert(key.to_string()) {
                return Err(DesignerError::Palette(format!(
                    "duplicate template key '{}'",
                    key
                )));
            }
            if !names.insert(template.name.clone()) {
                return Err(DesignerError::Palette(format!(
                    "duplicate template name '{}'",
                    template.name
                )));
            }
        }
        Ok(Self { categories })
    }

    /// The built-in remote-sensing operator catalog.
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Parse a palette from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: PaletteFile = toml::from_str(content)
            .map_err(|e| DesignerError::Palette(format!("Failed to parse palette: {}", e)))?;
        Self::new(file.categories)
    }

    /// Load a palette from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DesignerError::Palette(format!("Failed to read palette {:?}: {}", path, e))
        })?;
        let palette = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded palette {:?} with {} templates",
            path,
            palette.templates().count()
        );
        Ok(palette)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.categories.iter().flat_map(|c| c.templates.iter())
    }

    /// Look a template up by its display name (palette drops carry names).
    pub fn template_by_name(&self, name: &str) -> Option<&Template> {
        self.templates().find(|t| t.name == name)
    }

    /// Look a template up by key (nodes carry keys).
    pub fn template(&self, key: &TemplateKey) -> Option<&Template> {
        self.templates().find(|t| &t.key == key)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[categories]]
        name = "数据处理"

        [[categories.templates]]
        key = "band_composite"
        name = "波段合成"
        icon = "layers"
        outputs = ["合成影像"]

        [[categories.templates.fields]]
        label = "波段组合"
        type = "select"
        required = true
        options = ["RGB", "NRG"]

        [[categories.templates.fields]]
        label = "输出路径"
        type = "file"
    "#;

    #[test]
    fn test_parse_toml_palette() {
        let palette = Palette::from_toml_str(SAMPLE).unwrap();
        let template = palette.template_by_name("波段合成").unwrap();
        assert_eq!(template.key, TemplateKey::from("band_composite"));
        assert_eq!(template.fields.len(), 2);
        assert_eq!(template.fields[1].field_type, FieldType::File);
        assert_eq!(template.behavior, TemplateBehavior::Schema);
        assert_eq!(template.outputs, vec!["合成影像".to_string()]);
    }

    #[test]
    fn test_lookup_miss() {
        let palette = Palette::from_toml_str(SAMPLE).unwrap();
        assert!(palette.template_by_name("不存在").is_none());
        assert!(palette.template(&TemplateKey::from("nope")).is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let categories = vec![Category::new(
            "A",
            vec![Template::new("k", "One", ""), Template::new("k", "Two", "")],
        )];
        assert!(matches!(
            Palette::new(categories),
            Err(DesignerError::Palette(_))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let categories = vec![
            Category::new("A", vec![Template::new("a", "Same", "")]),
            Category::new("B", vec![Template::new("b", "Same", "")]),
        ];
        assert!(Palette::new(categories).is_err());
    }

    #[test]
    fn test_terminal_key_reserved() {
        let categories = vec![Category::new("A", vec![Template::new("start", "Go", "")])];
        assert!(Palette::new(categories).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let palette = Palette::load(&path).unwrap();
        assert_eq!(palette.categories().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Palette::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read palette"));
    }
}
