//! Comment stripping for LESS sources.

use std::path::Path;

use super::error::CompileError;

/// Remove `/* */` and `//` comments from a LESS source.
///
/// Strings and `url(...)` arguments are copied verbatim, so `//` inside them
/// is never treated as a comment. Newlines inside block comments are kept so
/// that later line numbers still point at the original source.
pub(crate) fn strip_comments(source: &str, path: &Path) -> Result<String, CompileError> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                let start_line = line;
                out.push(c);
                i += 1;
                loop {
                    let Some(&next) = chars.get(i) else {
                        return Err(CompileError::syntax(path, start_line, "unterminated string"));
                    };
                    out.push(next);
                    i += 1;
                    match next {
                        '\\' => {
                            if let Some(&escaped) = chars.get(i) {
                                if escaped == '\n' {
                                    line += 1;
                                }
                                out.push(escaped);
                                i += 1;
                            }
                        }
                        '\n' => line += 1,
                        _ if next == c => break,
                        _ => {}
                    }
                }
            }
            '\\' => {
                out.push(c);
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let start_line = line;
                i += 2;
                loop {
                    match chars.get(i) {
                        None => {
                            return Err(CompileError::syntax(
                                path,
                                start_line,
                                "unterminated block comment",
                            ));
                        }
                        Some('*') if chars.get(i + 1) == Some(&'/') => {
                            i += 2;
                            break;
                        }
                        Some('\n') => {
                            line += 1;
                            out.push('\n');
                            i += 1;
                        }
                        Some(_) => i += 1,
                    }
                }
                out.push(' ');
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            _ if starts_url(&chars, i) => {
                // Copy `url(` and everything up to the closing paren untouched.
                while i < chars.len() {
                    let next = chars[i];
                    out.push(next);
                    i += 1;
                    match next {
                        '\n' => line += 1,
                        ')' => break,
                        _ => {}
                    }
                }
            }
            '\n' => {
                line += 1;
                out.push(c);
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn starts_url(chars: &[char], i: usize) -> bool {
    let is_url = chars.len() >= i + 4
        && chars[i..i + 3]
            .iter()
            .zip("url".chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
        && chars[i + 3] == '(';
    let at_word_start = i == 0 || !is_ident_char(chars[i - 1]);
    is_url && at_word_start
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
