//! `@import` resolution.
//!
//! Imported files are parsed and spliced into the importing tree as
//! [`Node::Imported`], so evaluation sees a single tree per entry file.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use super::{
    ImportAliases,
    error::CompileError,
    parser::{Node, parse},
    source::strip_comments,
};

pub(crate) struct Importer<'a> {
    aliases: &'a ImportAliases,
    seen: HashSet<PathBuf>,
}

impl<'a> Importer<'a> {
    pub fn new(aliases: &'a ImportAliases) -> Self {
        Self {
            aliases,
            seen: HashSet::new(),
        }
    }

    /// Read, parse and inline the imports of the file at `path`.
    pub fn load(&mut self, path: &Path) -> Result<Vec<Node>, CompileError> {
        let source = fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_source(&source, path)
    }

    /// Parse `source` as if it were the contents of `path`.
    pub fn load_source(&mut self, source: &str, path: &Path) -> Result<Vec<Node>, CompileError> {
        if let Ok(canonical) = path.canonicalize() {
            self.seen.insert(canonical);
        }
        let source = strip_comments(source, path)?;
        let nodes = parse(&source, path)?;
        self.inline(nodes, path)
    }

    fn inline(&mut self, nodes: Vec<Node>, path: &Path) -> Result<Vec<Node>, CompileError> {
        let mut inlined = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::Statement { text, line } if is_import(&text) => {
                    let Some(directive) = ImportDirective::parse(&text) else {
                        return Err(CompileError::syntax(path, line, "malformed @import"));
                    };
                    if let Some(imported) = self.import(&directive, path)? {
                        inlined.push(imported);
                    }
                }
                Node::Block {
                    prelude,
                    body,
                    line,
                } => inlined.push(Node::Block {
                    prelude,
                    body: self.inline(body, path)?,
                    line,
                }),
                other => inlined.push(other),
            }
        }
        Ok(inlined)
    }

    fn import(
        &mut self,
        directive: &ImportDirective,
        importer: &Path,
    ) -> Result<Option<Node>, CompileError> {
        if directive.stays_css() {
            return Ok(None);
        }

        let specifier = self.aliases.remap(&directive.specifier);
        let resolved = resolve_path(importer, specifier);

        if !resolved.is_file() {
            if directive.has_option("optional") {
                return Ok(None);
            }
            return Err(CompileError::MissingImport {
                importer: importer.to_path_buf(),
                specifier: directive.specifier.clone(),
                resolved,
            });
        }

        let canonical = resolved.canonicalize().map_err(|source| CompileError::Io {
            path: resolved.clone(),
            source,
        })?;
        if self.seen.contains(&canonical) && !directive.has_option("multiple") {
            return Ok(None);
        }

        let nodes = self.load(&resolved)?;
        Ok(Some(Node::Imported {
            reference: directive.has_option("reference"),
            nodes,
        }))
    }
}

fn is_import(text: &str) -> bool {
    text.strip_prefix("@import").is_some_and(|rest| {
        rest.starts_with(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '\'')
    })
}

/// Resolve an import specifier against the directory of the importing file,
/// appending `.less` when the specifier has no stylesheet extension.
fn resolve_path(importer: &Path, specifier: &str) -> PathBuf {
    let base = importer.parent().unwrap_or_else(|| Path::new(""));
    let joined = base.join(specifier);
    match joined.extension().and_then(|e| e.to_str()) {
        Some("less" | "css") => joined,
        _ => {
            let mut with_extension = joined.into_os_string();
            with_extension.push(".less");
            PathBuf::from(with_extension)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ImportDirective {
    options: Vec<String>,
    specifier: String,
}

impl ImportDirective {
    /// Parse `@import (options) "path" media` or `@import url(path) media`.
    fn parse(text: &str) -> Option<Self> {
        let mut rest = text.strip_prefix("@import")?.trim_start();

        let mut options = Vec::new();
        if let Some(after_paren) = rest.strip_prefix('(') {
            let close = after_paren.find(')')?;
            options = after_paren[..close]
                .split(',')
                .map(|o| o.trim().to_ascii_lowercase())
                .filter(|o| !o.is_empty())
                .collect();
            rest = after_paren[close + 1..].trim_start();
        }

        let specifier = if let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
            let inner = &rest[1..];
            &inner[..inner.find(quote)?]
        } else if rest.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("url(")) {
            let inner = &rest[4..];
            unquote(inner[..inner.find(')')?].trim())
        } else {
            return None;
        };

        Some(Self {
            options,
            specifier: specifier.to_string(),
        })
    }

    fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Imports left to the browser as plain CSS `@import`s.
    fn stays_css(&self) -> bool {
        if self.has_option("css") || self.has_option("inline") {
            return true;
        }
        if self.has_option("less") {
            return false;
        }
        let specifier = self.specifier.as_str();
        specifier.ends_with(".css")
            || specifier.starts_with("http://")
            || specifier.starts_with("https://")
            || specifier.starts_with("//")
    }
}

/// Strip one pair of matching quotes.
pub(super) fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[bytes.len() - 1] == bytes[0] {
        &text[1..text.len() - 1]
    } else {
        text
    }
}
