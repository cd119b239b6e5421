//! Class name extraction from LESS files.
//!
//! A file is compiled by a [`StylesheetCompiler`], every class selector of the
//! compiled rulesets is collected once (first appearance wins), and the
//! configured [`NameFormat`] derives the identifier used in generated code.

mod name_format;
mod selectors;

use std::{collections::HashSet, path::Path};

pub use name_format::NameFormat;

use self::selectors::class_selectors;
use super::less::{CompileError, CompiledStylesheet, ImportAliases, LessCompiler, StylesheetCompiler};

/// A class defined by a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassName {
    /// Identifier after the name format was applied.
    pub value: String,
    /// Class name as written in the compiled stylesheet, without the dot.
    pub value_original: String,
}

impl ClassName {
    pub fn new(value: impl Into<String>, value_original: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            value_original: value_original.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub name_format: NameFormat,
    /// Handed to the compiler; currently inert.
    pub aliases: ImportAliases,
}

pub struct ClassNameExtractor<C = LessCompiler> {
    compiler: C,
}

impl ClassNameExtractor {
    pub fn new() -> Self {
        Self {
            compiler: LessCompiler,
        }
    }
}

impl Default for ClassNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: StylesheetCompiler> ClassNameExtractor<C> {
    pub fn with_compiler(compiler: C) -> Self {
        Self { compiler }
    }

    /// Compile the file at `path` and return its class names.
    ///
    /// A stylesheet without class selectors yields an empty list. Compilation
    /// failures are returned as-is; no partial list is produced.
    pub fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<Vec<ClassName>, CompileError> {
        let stylesheet = self.compiler.compile(path, &options.aliases)?;
        Ok(class_names(&stylesheet, options.name_format))
    }
}

/// Deduplicated class names of a compiled stylesheet, in first-seen order.
pub fn class_names(stylesheet: &CompiledStylesheet, name_format: NameFormat) -> Vec<ClassName> {
    let mut seen = HashSet::new();
    stylesheet
        .selectors()
        .flat_map(class_selectors)
        .filter(|name| seen.insert(name.clone()))
        .map(|original| ClassName {
            value: name_format.apply(&original),
            value_original: original,
        })
        .collect()
}
