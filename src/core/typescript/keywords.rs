//! Reserved words that cannot be used as `export const` bindings.

/// ES5 keywords, future reserved words and literals.
const ES5: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import", "in",
    "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with",
];

/// Reserved in strict mode code only (ES5 and later).
const STRICT: &[&str] = &[
    "implements", "interface", "let", "package", "private", "protected", "public", "static",
    "yield",
];

/// Additions of ES2015 module code.
const ES6: &[&str] = &["await"];

/// Whether `name` is reserved in strict ES5 or ES2015 module code.
pub fn is_reserved_keyword(name: &str) -> bool {
    [ES5, STRICT, ES6].iter().any(|set| set.contains(&name))
}
