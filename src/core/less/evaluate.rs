//! Evaluation of a LESS tree into flattened rulesets.
//!
//! Only what decides the final selectors is evaluated: nesting and `&`,
//! selector interpolation, mixin and detached-ruleset expansion with guards
//! and argument matching, CSS guards, and the bubbling of conditional
//! at-rules. Property values are never computed.

use std::{collections::HashMap, ptr, sync::LazyLock};

use regex::Regex;

use super::{
    CompiledStylesheet, Ruleset,
    error::CompileError,
    expression::{Expression, Guard, Value, Variables},
    imports::unquote,
    parser::{Node, collapse_whitespace},
};

/// Maximum depth when following variables that reference other variables.
const MAX_VARIABLE_DEPTH: usize = 32;

/// Maximum number of nested mixin expansions.
const MAX_MIXIN_DEPTH: usize = 256;

/// At-rules whose bodies are evaluated in the surrounding selector context.
const BUBBLING_AT_RULES: &[&str] = &["media", "supports", "container", "layer", "document"];

static VARIABLE_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^@([\w-]+)\s*:\s*(.*)$").unwrap());
static DETACHED_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([\w-]+)\s*:$").unwrap());
static DETACHED_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([\w-]+)\s*\(\s*\)$").unwrap());
static MIXIN_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^((?:[.#][\w-]+\s*>?\s*)+?)\s*(?:\((.*)\))?\s*(?:!\s*important)?$").unwrap()
});
static MIXIN_PATH_SEGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.#][\w-]+").unwrap());
static MIXIN_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[.#][\w-]+").unwrap());
static GUARD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\swhen[\s(]").unwrap());
static NAMED_ARGUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^@([\w-]+)\s*:\s*(.*)$").unwrap());
static VARIABLE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@([\w-]+)").unwrap());

pub(crate) fn evaluate(nodes: &[Node]) -> Result<CompiledStylesheet, CompileError> {
    let root = Scope::new(None, nodes);
    let mut evaluator = Evaluator {
        slots: Vec::new(),
        expanding: Vec::new(),
    };
    evaluator.body(&root, nodes, &[], true)?;

    Ok(CompiledStylesheet {
        rulesets: evaluator.slots.into_iter().flatten().collect(),
    })
}

/// Lexical scope: variables, mixins and detached rulesets visible in a block.
///
/// LESS variables are lazily bound, so the whole block is collected up front
/// and the last definition wins regardless of position.
struct Scope<'a, 's> {
    parent: Option<&'s Scope<'a, 's>>,
    variables: HashMap<String, String>,
    mixins: HashMap<String, Vec<&'a Node>>,
    detached: HashMap<String, &'a [Node]>,
}

impl<'a, 's> Scope<'a, 's> {
    fn new(parent: Option<&'s Scope<'a, 's>>, nodes: &'a [Node]) -> Self {
        let mut scope = Self {
            parent,
            variables: HashMap::new(),
            mixins: HashMap::new(),
            detached: HashMap::new(),
        };
        scope.collect(nodes);
        scope
    }

    fn collect(&mut self, nodes: &'a [Node]) {
        for node in nodes {
            match node {
                Node::Statement { text, .. } => {
                    if let Some(captures) = VARIABLE_DECLARATION.captures(text) {
                        self.variables
                            .insert(captures[1].to_string(), captures[2].trim().to_string());
                    }
                }
                Node::Block { prelude, body, .. } => {
                    if let Some(captures) = DETACHED_DEFINITION.captures(prelude) {
                        self.detached.insert(captures[1].to_string(), body);
                    } else if let Some(signature) = MixinSignature::parse(prelude) {
                        self.mixins.entry(signature.name).or_default().push(node);
                    } else {
                        // `.a, .b { }` can be called as `.a` or `.b`.
                        for selector in split_top_level(prelude, ',') {
                            if let Some(signature) = MixinSignature::parse(selector.trim()) {
                                self.mixins.entry(signature.name).or_default().push(node);
                            }
                        }
                    }
                }
                Node::Imported { nodes, .. } => self.collect(nodes),
            }
        }
    }

    fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .get(name)
            .map(String::as_str)
            .or_else(|| self.parent.and_then(|parent| parent.variable(name)))
    }

    fn mixin(&self, name: &str) -> Option<&[&'a Node]> {
        self.mixins
            .get(name)
            .map(Vec::as_slice)
            .or_else(|| self.parent.and_then(|parent| parent.mixin(name)))
    }

    fn detached_ruleset(&self, name: &str) -> Option<&'a [Node]> {
        self.detached
            .get(name)
            .copied()
            .or_else(|| self.parent.and_then(|parent| parent.detached_ruleset(name)))
    }

    /// The value of `@name` with quotes, escapes and variable references resolved.
    fn resolve(&self, name: &str, depth: usize) -> Result<String, CompileError> {
        let raw = self.variable(name).ok_or_else(|| CompileError::UndefinedVariable {
            name: name.to_string(),
        })?;
        let value = unquote(raw.trim_start_matches('~').trim());

        if depth < MAX_VARIABLE_DEPTH {
            if let Some(referenced) = value.strip_prefix('@').filter(|r| is_identifier(r)) {
                return self.resolve(referenced, depth + 1);
            }
            if let Some(expression) = Expression::parse(value).filter(|e| !e.is_literal()) {
                return Ok(expression.evaluate(self, None, depth + 1)?.to_text());
            }
            return self.interpolate(value, depth + 1);
        }
        Ok(value.to_string())
    }

    /// Substitute every `@{name}` in `text`.
    fn interpolate(&self, text: &str, depth: usize) -> Result<String, CompileError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("@{") {
            let Some(len) = rest[start + 2..].find('}') else {
                break;
            };
            out.push_str(&rest[..start]);
            out.push_str(&self.resolve(&rest[start + 2..start + 2 + len], depth)?);
            rest = &rest[start + 2 + len + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

impl Variables for Scope<'_, '_> {
    fn value(&self, name: &str, depth: usize) -> Result<Value, CompileError> {
        let raw = self.variable(name).ok_or_else(|| CompileError::UndefinedVariable {
            name: name.to_string(),
        })?;
        if depth < MAX_VARIABLE_DEPTH {
            if let Some(expression) = Expression::parse(raw) {
                return expression.evaluate(self, None, depth + 1);
            }
        }
        Ok(Value::Keyword(self.resolve(name, depth)?))
    }
}

struct Evaluator<'a> {
    /// Rulesets in output order; `None` marks a ruleset that had no declarations.
    slots: Vec<Option<Ruleset>>,
    /// Mixins currently being expanded, outermost first.
    expanding: Vec<&'a Node>,
}

/// When a matching mixin definition is expanded, depending on `default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Always,
    /// The guard only holds when `default()` is true.
    IfDefault,
    /// The guard only holds when `default()` is false.
    UnlessDefault,
}

impl<'a> Evaluator<'a> {
    /// Evaluate `nodes` in the selector `context`.
    ///
    /// Returns whether the nodes hold declarations for `context`.
    fn body(
        &mut self,
        scope: &Scope<'a, '_>,
        nodes: &'a [Node],
        context: &[String],
        output: bool,
    ) -> Result<bool, CompileError> {
        let mut has_declarations = false;

        for node in nodes {
            match node {
                Node::Statement { text, .. } => match Statement::classify(text) {
                    Statement::Declaration => has_declarations = true,
                    Statement::MixinCall(call) => {
                        has_declarations |= self.call_mixin(scope, &call, context, output)?;
                    }
                    Statement::DetachedCall(name) => {
                        let body = scope
                            .detached_ruleset(name)
                            .ok_or_else(|| CompileError::UndefinedVariable {
                                name: name.to_string(),
                            })?;
                        let detached_scope = Scope::new(Some(scope), body);
                        has_declarations |= self.body(&detached_scope, body, context, output)?;
                    }
                    Statement::Ignored => {}
                },
                Node::Block { prelude, body, .. } => {
                    self.block(scope, prelude, body, context, output)?;
                }
                Node::Imported { reference, nodes } => {
                    has_declarations |= self.body(scope, nodes, context, output && !reference)?;
                }
            }
        }

        Ok(has_declarations)
    }

    fn block(
        &mut self,
        scope: &Scope<'a, '_>,
        prelude: &str,
        body: &'a [Node],
        context: &[String],
        output: bool,
    ) -> Result<(), CompileError> {
        if let Some(at_rule) = prelude.strip_prefix('@') {
            if DETACHED_DEFINITION.is_match(prelude) {
                return Ok(());
            }
            if BUBBLING_AT_RULES.contains(&at_rule_name(at_rule).as_str()) {
                return self.ruleset(scope, context.to_vec(), body, output);
            }
            // @keyframes, @font-face, @page and friends hold no selectors.
            return Ok(());
        }

        if MixinSignature::parse(prelude).is_some_and(|signature| signature.parametric) {
            return Ok(());
        }

        let (selector, guard) = split_guard(prelude);
        if let Some(guard) = guard {
            if !Guard::parse(guard)?.evaluate(scope, None)? {
                return Ok(());
            }
        }
        let selector = scope.interpolate(selector, 0)?;
        let selector = strip_extend(&selector);
        let selectors = join_selectors(context, &selector);
        self.ruleset(scope, selectors, body, output)
    }

    fn ruleset(
        &mut self,
        scope: &Scope<'a, '_>,
        selectors: Vec<String>,
        body: &'a [Node],
        output: bool,
    ) -> Result<(), CompileError> {
        let slot = self.slots.len();
        self.slots.push(None);

        let ruleset_scope = Scope::new(Some(scope), body);
        let has_declarations = self.body(&ruleset_scope, body, &selectors, output)?;

        if has_declarations && output && !selectors.is_empty() {
            self.slots[slot] = Some(Ruleset { selectors });
        }
        Ok(())
    }

    fn call_mixin(
        &mut self,
        scope: &Scope<'a, '_>,
        call: &MixinCall<'_>,
        context: &[String],
        output: bool,
    ) -> Result<bool, CompileError> {
        let definitions = find_mixin(scope, &call.path);
        if definitions.is_empty() {
            return Err(CompileError::UndefinedMixin {
                call: call.text.to_string(),
            });
        }

        let arguments = Arguments::evaluate(scope, call.arguments)?;
        let name = call.path.last().copied().unwrap_or_default();
        let mut matching = Vec::new();
        for definition in definitions {
            let Node::Block { prelude, body, .. } = definition else {
                continue;
            };
            if let Some(signature) = MixinSignature::for_call(prelude, name).filter(|s| s.accepts(&arguments)) {
                matching.push((definition, body.as_slice(), signature));
            }
        }
        if matching.is_empty() {
            return Err(CompileError::NoMatchingMixin {
                call: call.text.to_string(),
            });
        }

        let mut selected = Vec::new();
        for (definition, body, signature) in matching {
            // A plain ruleset used as a mixin is never expanded into itself.
            if !signature.parametric && self.expanding.iter().any(|n| ptr::eq(*n, definition)) {
                continue;
            }

            let mut mixin_scope = Scope::new(Some(scope), body);
            for (name, value) in signature.bind(&arguments) {
                mixin_scope.variables.insert(name, value);
            }

            let selection = match &signature.guard {
                None => Selection::Always,
                Some(guard) => {
                    let guard = Guard::parse(guard)?;
                    match (
                        guard.evaluate(&mixin_scope, Some(true))?,
                        guard.evaluate(&mixin_scope, Some(false))?,
                    ) {
                        (true, true) => Selection::Always,
                        (true, false) => Selection::IfDefault,
                        (false, true) => Selection::UnlessDefault,
                        (false, false) => continue,
                    }
                }
            };
            selected.push((definition, body, mixin_scope, selection));
        }

        // `default()` is true when no definition matched regardless of it.
        let is_default = !selected
            .iter()
            .any(|(.., selection)| *selection == Selection::Always);

        let mut has_declarations = false;
        for (definition, body, mixin_scope, selection) in selected {
            let expand = match selection {
                Selection::Always => true,
                Selection::IfDefault => is_default,
                Selection::UnlessDefault => !is_default,
            };
            if !expand {
                continue;
            }
            if self.expanding.len() >= MAX_MIXIN_DEPTH {
                return Err(CompileError::MixinRecursion {
                    call: call.text.to_string(),
                    limit: MAX_MIXIN_DEPTH,
                });
            }

            self.expanding.push(definition);
            let expanded = self.body(&mixin_scope, body, context, output);
            self.expanding.pop();
            has_declarations |= expanded?;
        }

        Ok(has_declarations)
    }
}

/// Find the definitions a mixin call path (`.m`, `#ns > .m`) refers to.
fn find_mixin<'a>(scope: &Scope<'a, '_>, path: &[&str]) -> Vec<&'a Node> {
    let Some((first, rest)) = path.split_first() else {
        return Vec::new();
    };
    let Some(definitions) = scope.mixin(first) else {
        return Vec::new();
    };
    if rest.is_empty() {
        return definitions.to_vec();
    }

    definitions
        .iter()
        .copied()
        .filter_map(|definition| match definition {
            Node::Block { body, .. } => Some(body.as_slice()),
            _ => None,
        })
        .flat_map(|body| {
            let namespace = Scope::new(None, body);
            find_mixin(&namespace, rest)
        })
        .collect()
}

enum Statement<'t> {
    Declaration,
    MixinCall(MixinCall<'t>),
    DetachedCall(&'t str),
    Ignored,
}

impl<'t> Statement<'t> {
    fn classify(text: &'t str) -> Self {
        if text.starts_with("@{") {
            // Interpolated property name.
            return Statement::Declaration;
        }
        if text.starts_with('@') {
            if let Some(captures) = DETACHED_CALL.captures(text) {
                let name = captures.get(1).map_or("", |m| m.as_str());
                return Statement::DetachedCall(name);
            }
            // Variable declarations and statements like @charset or @plugin.
            return Statement::Ignored;
        }
        if text.starts_with("&:extend") {
            return Statement::Ignored;
        }
        if text.starts_with('.') || text.starts_with('#') {
            if let Some(call) = MixinCall::parse(text) {
                return Statement::MixinCall(call);
            }
        }
        Statement::Declaration
    }
}

struct MixinCall<'t> {
    text: &'t str,
    path: Vec<&'t str>,
    arguments: Option<&'t str>,
}

impl<'t> MixinCall<'t> {
    fn parse(text: &'t str) -> Option<Self> {
        let captures = MIXIN_CALL.captures(text)?;
        let path = MIXIN_PATH_SEGMENT
            .find_iter(captures.get(1)?.as_str())
            .map(|m| m.as_str())
            .collect();
        Some(Self {
            text,
            path,
            arguments: captures.get(2).map(|m| m.as_str()),
        })
    }
}

/// Call arguments, evaluated in the caller's scope.
#[derive(Debug, Default, PartialEq, Eq)]
struct Arguments {
    positional: Vec<String>,
    named: HashMap<String, String>,
}

impl Arguments {
    fn evaluate(scope: &Scope<'_, '_>, text: Option<&str>) -> Result<Self, CompileError> {
        let mut arguments = Self::default();
        for argument in text.map(split_arguments).unwrap_or_default() {
            match NAMED_ARGUMENT.captures(&argument) {
                Some(captures) => {
                    let value = argument_value(scope, captures[2].trim())?;
                    arguments.named.insert(captures[1].to_string(), value);
                }
                None => arguments.positional.push(argument_value(scope, &argument)?),
            }
        }
        Ok(arguments)
    }
}

/// The value an argument binds: the evaluated expression, or the text with
/// its variable references substituted.
fn argument_value(scope: &Scope<'_, '_>, text: &str) -> Result<String, CompileError> {
    if let Some(expression) = Expression::parse(text) {
        return Ok(expression.evaluate(scope, None, 0)?.to_css());
    }
    Ok(VARIABLE_REFERENCE
        .replace_all(text, |captures: &regex::Captures<'_>| {
            scope
                .resolve(&captures[1], 0)
                .unwrap_or_else(|_| captures[0].to_string())
        })
        .into_owned())
}

#[derive(Debug, PartialEq, Eq)]
enum MixinParameter {
    /// `@name` or `@name: default`.
    Variable { name: String, default: Option<String> },
    /// A literal the argument at this position must equal.
    Pattern(String),
}

/// `.name`, `.name(@a; @b: 1)` or `.name() when (guard)`.
#[derive(Debug, PartialEq, Eq)]
struct MixinSignature {
    name: String,
    parameters: Vec<MixinParameter>,
    /// Accepts extra arguments (`...` or `@rest...`).
    variadic: bool,
    parametric: bool,
    /// Condition following `when`.
    guard: Option<String>,
}

impl MixinSignature {
    fn parse(prelude: &str) -> Option<Self> {
        let name = MIXIN_NAME.find(prelude)?;
        let mut rest = prelude[name.end()..].trim_start();

        let mut parameters = Vec::new();
        let mut variadic = false;
        let parametric = rest.starts_with('(');
        if parametric {
            let close = matching_paren(rest)?;
            for parameter in split_arguments(&rest[1..close]) {
                if parameter.ends_with("...") {
                    variadic = true;
                    continue;
                }
                parameters.push(match NAMED_ARGUMENT.captures(&parameter) {
                    Some(captures) => MixinParameter::Variable {
                        name: captures[1].to_string(),
                        default: Some(captures[2].trim().to_string()),
                    },
                    None => match parameter.strip_prefix('@').filter(|n| is_identifier(n)) {
                        Some(name) => MixinParameter::Variable {
                            name: name.to_string(),
                            default: None,
                        },
                        None => MixinParameter::Pattern(parameter),
                    },
                });
            }
            rest = rest[close + 1..].trim_start();
        }

        let guard = rest
            .strip_prefix("when")
            .filter(|guard| guard.starts_with(|c: char| c.is_whitespace() || c == '('))
            .map(|guard| guard.trim().to_string());
        if !rest.is_empty() && guard.is_none() {
            return None;
        }

        Some(Self {
            name: name.as_str().to_string(),
            parameters,
            variadic,
            parametric,
            guard,
        })
    }

    /// Signature of the definition `prelude` reached by calling `name`;
    /// `.a, .b { }` is callable as either.
    fn for_call(prelude: &str, name: &str) -> Option<Self> {
        Self::parse(prelude).or_else(|| {
            split_top_level(prelude, ',')
                .into_iter()
                .filter_map(|selector| Self::parse(selector.trim()))
                .find(|signature| signature.name == name)
        })
    }

    /// Whether the definition can take `arguments`: every parameter without
    /// a default gets a value, patterns match, and nothing is left over.
    fn accepts(&self, arguments: &Arguments) -> bool {
        let mut positional = arguments.positional.iter();
        for parameter in &self.parameters {
            match parameter {
                MixinParameter::Pattern(pattern) => {
                    if positional
                        .next()
                        .is_none_or(|argument| unquote(argument) != unquote(pattern))
                    {
                        return false;
                    }
                }
                MixinParameter::Variable { name, default } => {
                    if !arguments.named.contains_key(name) && positional.next().is_none() && default.is_none() {
                        return false;
                    }
                }
            }
        }
        self.variadic || positional.next().is_none()
    }

    /// Bind call arguments to parameter variables.
    fn bind(&self, arguments: &Arguments) -> Vec<(String, String)> {
        let mut positional = arguments.positional.iter();
        let mut bindings = Vec::new();
        for parameter in &self.parameters {
            let MixinParameter::Variable { name, default } = parameter else {
                positional.next();
                continue;
            };
            let value = arguments
                .named
                .get(name)
                .or_else(|| positional.next())
                .or(default.as_ref());
            if let Some(value) = value {
                bindings.push((name.clone(), value.clone()));
            }
        }
        bindings
    }
}

/// Split mixin arguments on top-level `;`, or on `,` when there is no `;`.
fn split_arguments(text: &str) -> Vec<String> {
    let separator = if split_top_level(text, ';').len() > 1 {
        ';'
    } else {
        ','
    };
    split_top_level(text, separator)
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Split on `separator` outside parentheses, brackets and strings.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, _) if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Index of the `)` matching the `(` that `text` starts with.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Join a (possibly comma separated) child selector to every parent selector.
///
/// `&` is replaced by the parent selector; several `&` produce every
/// combination of parents. Without `&` the child becomes a descendant.
fn join_selectors(parents: &[String], child: &str) -> Vec<String> {
    let mut joined = Vec::new();
    for selector in split_top_level(child, ',') {
        let selector = collapse_whitespace(selector);
        if selector.is_empty() {
            continue;
        }

        if parents.is_empty() {
            joined.push(collapse_whitespace(&selector.replace('&', "")));
        } else if selector.contains('&') {
            let mut pieces = selector.split('&');
            let mut combinations = vec![pieces.next().unwrap_or_default().to_string()];
            for piece in pieces {
                combinations = combinations
                    .iter()
                    .flat_map(|prefix| parents.iter().map(move |parent| format!("{prefix}{parent}{piece}")))
                    .collect();
            }
            joined.extend(combinations);
        } else {
            joined.extend(parents.iter().map(|parent| format!("{parent} {selector}")));
        }
    }
    joined
}

/// Split a CSS guard off a selector: `.a when (@x)` → (`.a`, `(@x)`).
fn split_guard(prelude: &str) -> (&str, Option<&str>) {
    match GUARD.find(prelude) {
        Some(found) => {
            let guard = prelude[found.start()..].trim_start();
            let guard = guard.strip_prefix("when").unwrap_or(guard).trim();
            (prelude[..found.start()].trim_end(), Some(guard))
        }
        None => (prelude, None),
    }
}

/// Remove `:extend(...)` pseudo-classes from a selector.
fn strip_extend(selector: &str) -> String {
    let mut out = selector.to_string();
    while let Some(start) = out.find(":extend(") {
        let open = start + ":extend".len();
        let end = matching_paren(&out[open..]).map_or(out.len(), |close| open + close + 1);
        out.replace_range(start..end, "");
    }
    out
}

/// Name of an at-rule without vendor prefix: `-webkit-keyframes x` → `keyframes`.
fn at_rule_name(at_rule: &str) -> String {
    let name: String = at_rule
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect::<String>()
        .to_ascii_lowercase();
    match name.strip_prefix('-').and_then(|n| n.split_once('-')) {
        Some((_vendor, unprefixed)) => unprefixed.to_string(),
        None => name,
    }
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::less::parser::parse;

    fn selectors(source: &str) -> Vec<Vec<String>> {
        let nodes = parse(source, Path::new("test.less")).unwrap();
        evaluate(&nodes)
            .unwrap()
            .rulesets
            .into_iter()
            .map(|r| r.selectors)
            .collect()
    }

    fn flat(source: &str) -> Vec<String> {
        selectors(source).into_iter().flatten().collect()
    }

    #[test]
    fn test_nested_rulesets_become_descendants() {
        assert_eq!(
            flat(".a { color: red; .b { color: blue; } > .c { color: green; } }"),
            vec![".a", ".a .b", ".a > .c"]
        );
    }

    #[test]
    fn test_parent_reference() {
        assert_eq!(
            flat(".button { color: red; &-primary { color: blue; } &:hover { color: green; } }"),
            vec![".button", ".button-primary", ".button:hover"]
        );
    }

    #[test]
    fn test_multiple_parent_references_combine() {
        assert_eq!(
            flat(".a, .b { & + & { margin: 0; } }"),
            vec![".a + .a", ".a + .b", ".b + .a", ".b + .b"]
        );
    }

    #[test]
    fn test_selector_lists_are_joined_to_each_parent() {
        assert_eq!(
            selectors(".a, .b { .c, .d { color: red; } }"),
            vec![vec![".a .c", ".b .c", ".a .d", ".b .d"]]
        );
    }

    #[test]
    fn test_empty_rulesets_are_not_output() {
        assert_eq!(flat(".empty {}\n.wrapper { .inner { color: red; } }"), vec![".wrapper .inner"]);
    }

    #[test]
    fn test_media_queries_bubble() {
        assert_eq!(
            flat(".a { @media (min-width: 768px) { color: red; .b { color: blue; } } }"),
            vec![".a", ".a .b"]
        );
    }

    #[test]
    fn test_keyframes_are_skipped() {
        assert_eq!(
            flat("@keyframes spin { from { opacity: 0; } to { opacity: 1; } }\n.a { color: red; }"),
            vec![".a"]
        );
    }

    #[test]
    fn test_selector_interpolation() {
        assert_eq!(
            flat("@prefix: ~\"ui\";\n.@{prefix}-button { color: red; }"),
            vec![".ui-button"]
        );
    }

    #[test]
    fn test_variables_are_lazily_bound() {
        assert_eq!(
            flat(".@{name} { color: red; }\n@name: late;"),
            vec![".late"]
        );
    }

    #[test]
    fn test_variables_follow_references() {
        assert_eq!(flat("@a: @b;\n@b: 'target';\n.@{a} { color: red; }"), vec![".target"]);
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let nodes = parse(".@{missing} { color: red; }", Path::new("test.less")).unwrap();
        let err = evaluate(&nodes).unwrap_err();
        assert_eq!(err.to_string(), "variable @missing is undefined");
    }

    #[test]
    fn test_parametric_mixins_are_not_output() {
        assert_eq!(
            flat(".bordered(@width: 1px) { border: @width solid; }\n.a { .bordered(2px); }"),
            vec![".a"]
        );
    }

    #[test]
    fn test_mixin_nested_rulesets_expand_into_caller() {
        assert_eq!(
            flat(".with-icon() { .icon { width: 1em; } }\n.button { .with-icon(); }"),
            vec![".button .icon"]
        );
    }

    #[test]
    fn test_mixin_parameters_interpolate() {
        assert_eq!(
            flat(".modifier(@name) { &-@{name} { color: red; } }\n.btn { .modifier(large); }"),
            vec![".btn-large"]
        );
    }

    #[test]
    fn test_plain_rulesets_are_mixins_too() {
        assert_eq!(
            flat(".base { color: red; }\n.derived { .base; }"),
            vec![".base", ".derived"]
        );
    }

    #[test]
    fn test_namespaced_mixin_call() {
        assert_eq!(
            flat("#ns { .m() { .inner { color: red; } } }\n.a { #ns > .m(); }"),
            vec![".a .inner"]
        );
    }

    #[test]
    fn test_plain_rulesets_are_not_expanded_into_themselves() {
        assert_eq!(flat(".a { color: red; .a; }"), vec![".a"]);
    }

    #[test]
    fn test_unbounded_recursion_is_an_error() {
        let nodes = parse(".loop() { color: red; .loop(); }\n.a { .loop(); }", Path::new("test.less")).unwrap();
        let err = evaluate(&nodes).unwrap_err();
        assert_eq!(err.to_string(), ".loop() nests more than 256 mixin calls");
    }

    #[test]
    fn test_recursive_mixin_loop() {
        assert_eq!(
            flat(
                ".cols(@i) when (@i > 0) { .col-@{i} { width: 1px; } .cols(@i - 1); }\n\
                 .grid { .cols(2); }"
            ),
            vec![".grid .col-2", ".grid .col-1"]
        );
    }

    #[test]
    fn test_loop_with_arithmetic_in_selector() {
        assert_eq!(
            flat(
                ".spacing(@n) when (@n >= 1) { .spacing(@n - 1); .mt-@{n} { margin-top: @n * 4px; } }\n\
                 .spacing(3);"
            ),
            vec![".mt-1", ".mt-2", ".mt-3"]
        );
    }

    #[test]
    fn test_guard_dispatch() {
        assert_eq!(
            flat(
                ".m(@a) when (@a = 1) { .one { color: red; } }\n\
                 .m(@a) when (@a = 2) { .two { color: red; } }\n\
                 .x { .m(1); }"
            ),
            vec![".x .one"]
        );
    }

    #[test]
    fn test_default_guard() {
        let source = ".theme(@mode) when (@mode = dark) { .dark { color: white; } }\n\
                      .theme(@mode) when (default()) { .light { color: black; } }\n";

        assert_eq!(flat(&format!("{source}.a {{ .theme(dark); }}")), vec![".a .dark"]);
        assert_eq!(flat(&format!("{source}.b {{ .theme(sepia); }}")), vec![".b .light"]);
    }

    #[test]
    fn test_pattern_matching_on_arguments() {
        assert_eq!(
            flat(
                ".size(small) { .s { width: 1px; } }\n\
                 .size(large) { .l { width: 9px; } }\n\
                 .size(@any) { .any { width: 5px; } }\n\
                 .box { .size(large); }"
            ),
            vec![".box .l", ".box .any"]
        );
    }

    #[test]
    fn test_arity_mismatch_is_an_error() {
        let nodes = parse(".m(@a; @b) { .x { color: red; } }\n.a { .m(1); }", Path::new("test.less")).unwrap();
        let err = evaluate(&nodes).unwrap_err();
        assert_eq!(err.to_string(), "no matching definition was found for .m(1)");
    }

    #[test]
    fn test_unsupported_guard_is_an_error() {
        let nodes = parse(
            ".m(@c) when (iscolor(@c)) { .x { color: @c; } }\n.a { .m(red); }",
            Path::new("test.less"),
        )
        .unwrap();
        let err = evaluate(&nodes).unwrap_err();
        assert_eq!(err.to_string(), "guard 'when (iscolor(@c))' can't be evaluated");
    }

    #[test]
    fn test_variables_holding_operations_interpolate_their_result() {
        assert_eq!(flat("@n: 2 + 1;\n.col-@{n} { width: 1px; }"), vec![".col-3"]);
    }

    #[test]
    fn test_undefined_mixin_is_an_error() {
        let nodes = parse(".a { .missing(); }", Path::new("test.less")).unwrap();
        let err = evaluate(&nodes).unwrap_err();
        assert_eq!(err.to_string(), ".missing() is undefined");
    }

    #[test]
    fn test_detached_rulesets() {
        assert_eq!(
            flat("@detached: { .inner { color: red; } };\n.a { @detached(); }"),
            vec![".a .inner"]
        );
    }

    #[test]
    fn test_extend_is_removed_from_selectors() {
        assert_eq!(
            flat(".a { color: red; }\n.b:extend(.a) { margin: 0; }\n.c { &:extend(.a); padding: 0; }"),
            vec![".a", ".b", ".c"]
        );
    }

    #[test]
    fn test_css_guards() {
        assert_eq!(
            flat("@mode: dark;\n.a when (@mode = dark) { color: red; }\n.b when (@mode = light) { color: red; }"),
            vec![".a"]
        );
    }

    #[test]
    fn test_reference_imports_only_provide_mixins() {
        let nodes = vec![
            Node::Imported {
                reference: true,
                nodes: parse(".library { color: red; }", Path::new("lib.less")).unwrap(),
            },
            Node::Block {
                prelude: ".app".to_string(),
                body: parse(".library;", Path::new("app.less")).unwrap(),
                line: 1,
            },
        ];

        let compiled = evaluate(&nodes).unwrap();
        let all: Vec<String> = compiled.rulesets.into_iter().flat_map(|r| r.selectors).collect();
        assert_eq!(all, vec![".app"]);
    }

    #[test]
    fn test_mixin_signature() {
        assert_eq!(
            MixinSignature::parse(".m(@a; @b: 2px) when (@a > 0)"),
            Some(MixinSignature {
                name: ".m".to_string(),
                parameters: vec![
                    MixinParameter::Variable {
                        name: "a".to_string(),
                        default: None,
                    },
                    MixinParameter::Variable {
                        name: "b".to_string(),
                        default: Some("2px".to_string()),
                    },
                ],
                variadic: false,
                parametric: true,
                guard: Some("(@a > 0)".to_string()),
            })
        );
        assert_eq!(MixinSignature::parse(".a .b"), None);
        assert_eq!(MixinSignature::parse(".m whenever"), None);
        assert!(MixinSignature::parse(".m(dark; @rest...)").is_some_and(|s| s.variadic
            && s.parameters == vec![MixinParameter::Pattern("dark".to_string())]));
    }

    #[test]
    fn test_bind_named_and_positional_arguments() {
        let signature = MixinSignature::parse(".m(@a; @b: 2; @c: 3)").unwrap();
        let arguments = Arguments {
            positional: vec!["1".to_string()],
            named: HashMap::from([("c".to_string(), "9".to_string())]),
        };
        assert!(signature.accepts(&arguments));

        let bindings = signature.bind(&arguments);
        assert_eq!(
            bindings,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "9".to_string()),
            ]
        );
    }

    #[test]
    fn test_at_rule_name_strips_vendor_prefix() {
        assert_eq!(at_rule_name("-webkit-keyframes spin"), "keyframes");
        assert_eq!(at_rule_name("media screen"), "media");
    }
}
