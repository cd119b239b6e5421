//! Class selector scanning.

use cssparser::{ParseError, Parser, ParserInput, Token};

/// Collect the class names (without the leading dot) a selector mentions.
///
/// Attribute selectors and strings are skipped. Classes wrapped in
/// `:global(...)`, or following a bare `:global`, are not local to the module
/// and are skipped as well. CSS escapes in class names are decoded.
pub(crate) fn class_selectors(selector: &str) -> Vec<String> {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let mut classes = Vec::new();
    collect_classes(&mut parser, &mut classes);
    classes
}

fn collect_classes<'i>(parser: &mut Parser<'i, '_>, classes: &mut Vec<String>) {
    let mut after_dot = false;
    let mut after_colon = false;

    while let Ok(token) = parser.next_including_whitespace() {
        let token = token.clone();
        let (dot, colon) = (after_dot, after_colon);
        after_dot = false;
        after_colon = false;

        match token {
            Token::Delim('.') => after_dot = true,
            Token::Colon => after_colon = true,
            Token::Ident(name) if dot => classes.push(name.to_string()),
            // Everything after a bare `:global` is global.
            Token::Ident(name) if colon && name.eq_ignore_ascii_case("global") => return,
            // Left unparsed, the block is skipped.
            Token::Function(name) if colon && name.eq_ignore_ascii_case("global") => {}
            Token::Function(_) => {
                let _ = parser.parse_nested_block(|nested| {
                    collect_classes(nested, classes);
                    Ok::<_, ParseError<'i, ()>>(())
                });
            }
            _ => {}
        }
    }
}
