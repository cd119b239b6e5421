//! The stylesheet compiler collaborator.
//!
//! [`LessCompiler`] turns a LESS file (and everything it `@import`s) into the
//! flat list of rulesets a LESS compiler would output, which is all the class
//! name extractor needs to know.

mod error;
mod evaluate;
mod expression;
mod imports;
mod parser;
mod source;

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

pub use error::CompileError;

use self::{evaluate::evaluate, imports::Importer};

/// A compiled ruleset: the fully resolved selectors it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    pub selectors: Vec<String>,
}

/// Rulesets in the order the compiled CSS would contain them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledStylesheet {
    pub rulesets: Vec<Ruleset>,
}

impl CompiledStylesheet {
    /// Every selector of every ruleset, in output order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rulesets
            .iter()
            .flat_map(|ruleset| ruleset.selectors.iter().map(String::as_str))
    }
}

/// Import specifier remapping accepted from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportAliases {
    /// Exact specifier replacements, e.g. `"~theme": "src/theme"`.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Specifier prefix replacements, e.g. `"~": "node_modules/"`.
    #[serde(default)]
    pub alias_prefixes: BTreeMap<String, String>,
}

impl ImportAliases {
    /// The specifier an `@import` should load.
    ///
    /// Remapping is not applied: specifiers are passed through unchanged.
    // TODO: look up `aliases` first, then the longest matching `alias_prefixes` entry.
    pub fn remap<'s>(&self, specifier: &'s str) -> &'s str {
        specifier
    }
}

/// Compiles a stylesheet into its rulesets.
///
/// The extractor only depends on this trait, so the LESS implementation can
/// be swapped for a fake in tests.
pub trait StylesheetCompiler {
    fn compile(&self, path: &Path, aliases: &ImportAliases) -> Result<CompiledStylesheet, CompileError>;
}

/// Built-in LESS compiler.
///
/// Resolves imports, nesting, parent selectors, variable interpolation,
/// mixins and their guards. Property values are not evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct LessCompiler;

impl LessCompiler {
    /// Compile `source` as if it were the contents of `path`.
    ///
    /// Relative `@import`s are resolved against the directory of `path`.
    pub fn compile_source(
        &self,
        source: &str,
        path: &Path,
        aliases: &ImportAliases,
    ) -> Result<CompiledStylesheet, CompileError> {
        let nodes = Importer::new(aliases).load_source(source, path)?;
        evaluate(&nodes)
    }
}

impl StylesheetCompiler for LessCompiler {
    fn compile(&self, path: &Path, aliases: &ImportAliases) -> Result<CompiledStylesheet, CompileError> {
        let nodes = Importer::new(aliases).load(path)?;
        evaluate(&nodes)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_compile_follows_imports() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("partials")).unwrap();
        fs::write(
            dir.path().join("partials/buttons.less"),
            "@import '../variables';\n.@{prefix}-button { color: @primary; }",
        )
        .unwrap();
        fs::write(dir.path().join("variables.less"), "@prefix: app;\n@primary: red;").unwrap();
        fs::write(
            dir.path().join("main.less"),
            "@import 'partials/buttons';\n.layout { display: grid; }",
        )
        .unwrap();

        let compiled = LessCompiler
            .compile(&dir.path().join("main.less"), &ImportAliases::default())
            .unwrap();

        assert_eq!(compiled.selectors().collect::<Vec<_>>(), vec![".app-button", ".layout"]);
    }

    #[test]
    fn test_compile_missing_file() {
        let dir = tempdir().unwrap();
        let err = LessCompiler
            .compile(&dir.path().join("absent.less"), &ImportAliases::default())
            .unwrap_err();

        assert!(matches!(err, CompileError::Io { .. }));
    }

    #[test]
    fn test_aliases_pass_specifiers_through() {
        let aliases = ImportAliases {
            aliases: BTreeMap::from([("~theme".to_string(), "theme".to_string())]),
            alias_prefixes: BTreeMap::from([("~".to_string(), "node_modules/".to_string())]),
        };

        assert_eq!(aliases.remap("~theme"), "~theme");
        assert_eq!(aliases.remap("~lib/base"), "~lib/base");
    }

    #[test]
    fn test_compile_source_without_file() {
        let compiled = LessCompiler
            .compile_source(
                ".card { padding: 1rem; &__title { font-weight: bold; } }",
                Path::new("inline.less"),
                &ImportAliases::default(),
            )
            .unwrap();

        assert_eq!(
            compiled.selectors().collect::<Vec<_>>(),
            vec![".card", ".card__title"]
        );
    }

    #[test]
    fn test_compile_source_expands_guarded_mixins() {
        let compiled = LessCompiler
            .compile_source(
                ".cols(@i) when (@i > 0) { .col-@{i} { width: 1px; } .cols(@i - 1); } \
                 .grid { .cols(2); } \
                 .m(@a) when (@a = 1) { .one { color: red; } } \
                 .x { .m(1); }",
                Path::new("inline.less"),
                &ImportAliases::default(),
            )
            .unwrap();

        assert_eq!(
            compiled.selectors().collect::<Vec<_>>(),
            vec![".grid .col-2", ".grid .col-1", ".x .one"]
        );
    }
}
