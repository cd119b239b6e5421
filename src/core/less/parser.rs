//! Splits a comment-free LESS source into statements and blocks.

use std::path::Path;

use super::error::CompileError;

/// A node of the LESS source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    /// Text up to a `;` (or a closing brace), trimmed.
    Statement { text: String, line: usize },
    /// `prelude { body }`.
    Block {
        prelude: String,
        body: Vec<Node>,
        line: usize,
    },
    /// The contents of an `@import`ed file, spliced in place of the directive.
    Imported { reference: bool, nodes: Vec<Node> },
}

pub(crate) fn parse(source: &str, path: &Path) -> Result<Vec<Node>, CompileError> {
    let mut parser = Parser {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        path,
    };
    parser.parse_nodes(None)
}

struct Parser<'p> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    path: &'p Path,
}

impl Parser<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn error(&self, line: usize, message: &str) -> CompileError {
        CompileError::syntax(self.path, line, message)
    }

    /// Parse nodes until the end of input or, when `opened_at` is set, until
    /// the brace closing the block opened on that line.
    fn parse_nodes(&mut self, opened_at: Option<usize>) -> Result<Vec<Node>, CompileError> {
        let mut nodes = Vec::new();
        let mut buf = String::new();
        let mut start_line = self.line;
        let mut parens = 0usize;

        while let Some(c) = self.bump() {
            if !c.is_whitespace() && buf.trim().is_empty() {
                start_line = self.line;
            }

            match c {
                '"' | '\'' => {
                    buf.push(c);
                    self.read_string(c, &mut buf, start_line)?;
                }
                '\\' => {
                    buf.push(c);
                    if let Some(escaped) = self.bump() {
                        buf.push(escaped);
                    }
                }
                '@' if self.peek() == Some('{') => {
                    buf.push(c);
                    loop {
                        match self.bump() {
                            Some('}') => {
                                buf.push('}');
                                break;
                            }
                            Some(next) => buf.push(next),
                            None => return Err(self.error(start_line, "unterminated interpolation")),
                        }
                    }
                }
                '(' => {
                    parens += 1;
                    buf.push(c);
                }
                ')' => {
                    parens = parens.saturating_sub(1);
                    buf.push(c);
                }
                '{' if parens == 0 => {
                    let prelude = collapse_whitespace(&buf);
                    buf.clear();
                    let body = self.parse_nodes(Some(start_line))?;
                    nodes.push(Node::Block {
                        prelude,
                        body,
                        line: start_line,
                    });
                }
                '}' if parens == 0 => {
                    if opened_at.is_none() {
                        return Err(self.error(self.line, "unexpected '}'"));
                    }
                    flush(&mut buf, start_line, &mut nodes);
                    return Ok(nodes);
                }
                ';' if parens == 0 => flush(&mut buf, start_line, &mut nodes),
                _ => buf.push(c),
            }
        }

        if parens > 0 {
            return Err(self.error(start_line, "missing closing ')'"));
        }
        if let Some(line) = opened_at {
            return Err(self.error(line, "missing closing '}'"));
        }
        flush(&mut buf, start_line, &mut nodes);
        Ok(nodes)
    }

    fn read_string(&mut self, quote: char, buf: &mut String, line: usize) -> Result<(), CompileError> {
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error(line, "unterminated string"));
            };
            buf.push(c);
            if c == '\\' {
                if let Some(escaped) = self.bump() {
                    buf.push(escaped);
                }
            } else if c == quote {
                return Ok(());
            }
        }
    }
}

fn flush(buf: &mut String, line: usize, nodes: &mut Vec<Node>) {
    let text = collapse_whitespace(buf);
    if !text.is_empty() {
        nodes.push(Node::Statement { text, line });
    }
    buf.clear();
}

/// Trim and collapse runs of whitespace into single spaces.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse_str(source: &str) -> Vec<Node> {
        parse(source, Path::new("test.less")).unwrap()
    }

    fn statement(text: &str, line: usize) -> Node {
        Node::Statement {
            text: text.to_string(),
            line,
        }
    }

    #[test]
    fn test_parses_nested_blocks() {
        let nodes = parse_str(".a {\n  color: red;\n  .b { margin: 0 }\n}\n");

        assert_eq!(
            nodes,
            vec![Node::Block {
                prelude: ".a".to_string(),
                body: vec![
                    statement("color: red", 2),
                    Node::Block {
                        prelude: ".b".to_string(),
                        body: vec![statement("margin: 0", 3)],
                        line: 3,
                    },
                ],
                line: 1,
            }]
        );
    }

    #[test]
    fn test_interpolation_braces_do_not_open_blocks() {
        let nodes = parse_str(".@{prefix}-button { color: red; }");

        assert!(matches!(
            &nodes[0],
            Node::Block { prelude, .. } if prelude == ".@{prefix}-button"
        ));
    }

    #[test]
    fn test_semicolons_inside_parentheses_stay_in_statement() {
        let nodes = parse_str(".a { .mixin(1px; solid); }");

        let Node::Block { body, .. } = &nodes[0] else {
            panic!("expected a block");
        };
        assert_eq!(body, &vec![statement(".mixin(1px; solid)", 1)]);
    }

    #[test]
    fn test_multiline_selector_is_collapsed() {
        let nodes = parse_str(".a,\n.b\n{ color: red; }");

        assert!(matches!(
            &nodes[0],
            Node::Block { prelude, line: 1, .. } if prelude == ".a, .b"
        ));
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse(".a {\n  color: red;\n", Path::new("open.less")).unwrap_err();
        assert_eq!(err.to_string(), "open.less:1: missing closing '}'");
    }

    #[test]
    fn test_unexpected_closing_brace() {
        let err = parse(".a { }\n}", Path::new("extra.less")).unwrap_err();
        assert_eq!(err.to_string(), "extra.less:2: unexpected '}'");
    }
}
