use super::{
    options::{ExportType, RenderOptions},
    validate::{Validity, classify},
};
use crate::core::{class_names::ClassName, reporter::Reporter};

/// Result of rendering a file's class names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The contents of the type definition file.
    Definitions(String),
    /// Nothing to write: the stylesheet has no class names.
    Empty,
}

impl Rendered {
    pub fn definitions(&self) -> Option<&str> {
        match self {
            Rendered::Definitions(text) => Some(text),
            Rendered::Empty => None,
        }
    }
}

/// Renders class names as TypeScript declarations.
///
/// Names that cannot be bound as constants are skipped for the `named` and
/// `values` export types, with a warning sent to the reporter.
pub struct TypeDefinitionRenderer<'r> {
    reporter: &'r dyn Reporter,
}

impl<'r> TypeDefinitionRenderer<'r> {
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self { reporter }
    }

    pub fn render(&self, class_names: &[ClassName], options: &RenderOptions) -> Rendered {
        if class_names.is_empty() {
            return Rendered::Empty;
        }

        let newline = options.line_ending.as_str();
        let lines: Vec<String> = match options.export_type {
            ExportType::Default => return Rendered::Definitions(default_export(class_names, newline)),
            ExportType::Named => self
                .bindable(class_names)
                .map(|class_name| format!("export const {}: string;", class_name.value))
                .collect(),
            ExportType::Values => self
                .bindable(class_names)
                .map(|class_name| {
                    format!(
                        "export const {} = \"{}\";",
                        class_name.value,
                        escape(&class_name.value_original, '"')
                    )
                })
                .collect(),
        };

        Rendered::Definitions(lines.join(newline) + newline)
    }

    /// Class names that are valid bindings, reporting the others.
    fn bindable<'c>(&self, class_names: &'c [ClassName]) -> impl Iterator<Item = &'c ClassName> {
        class_names.iter().filter(|class_name| match classify(&class_name.value) {
            Validity::Valid => true,
            Validity::Invalid(reason) => {
                self.reporter.warn(&reason.warning(&class_name.value));
                false
            }
        })
    }
}

fn default_export(class_names: &[ClassName], newline: &str) -> String {
    let keys = class_names
        .iter()
        .map(|class_name| format!("  '{}': string;", escape(&class_name.value, '\'')))
        .collect::<Vec<_>>()
        .join(newline);

    let mut out = format!("export interface Styles {{{newline}");
    out.push_str(&keys);
    out.push_str(&format!("{newline}}}{newline}{newline}"));
    out.push_str(&format!("export type ClassNames = keyof Styles;{newline}{newline}"));
    out.push_str(&format!("declare const styles: Styles;{newline}{newline}"));
    out.push_str(&format!("export default styles;{newline}"));
    out
}

/// Escape backslashes and `quote` for a single-line string literal.
fn escape(value: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == quote {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
