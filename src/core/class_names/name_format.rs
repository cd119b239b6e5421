use clap::ValueEnum;
use heck::{ToKebabCase, ToLowerCamelCase};
use serde::{Deserialize, Serialize};

/// Transform applied to a class name to produce the generated identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameFormat {
    /// `some-class` → `someClass`
    #[default]
    Camel,
    /// `someClass` → `some-class`
    Kebab,
    /// Same as `kebab`
    Param,
    /// Camel case, but only for names containing dashes
    Dashes,
    /// Keep names as they are
    #[value(name = "none")]
    #[serde(rename = "none")]
    Identity,
}

impl NameFormat {
    pub fn apply(self, class_name: &str) -> String {
        match self {
            NameFormat::Camel => camel_case(class_name),
            NameFormat::Kebab | NameFormat::Param => class_name.to_kebab_case(),
            NameFormat::Dashes if class_name.contains('-') => camel_case(class_name),
            NameFormat::Dashes | NameFormat::Identity => class_name.to_string(),
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c.is_whitespace()
}

/// Camel case names containing separators; other names are left alone.
fn camel_case(name: &str) -> String {
    if !name.contains(is_separator) {
        return name.to_string();
    }
    name.to_lower_camel_case()
}
