//! Values, operations and guard conditions.
//!
//! Covers what decides which selectors a stylesheet produces: mixin arguments
//! such as `@i - 1`, variables holding operations, and `when` guards with
//! comparisons, `and`, `or`, `not`, `default()` and the type-checking
//! functions. Colors and other function calls are not evaluated.

use std::cmp::Ordering;

use cssparser::{ParseError, Parser, ParserInput, Token as CssToken};

use super::error::CompileError;

/// Operation results are rounded to eight decimal places.
const PRECISION: f64 = 1e8;

/// Functions an expression may call.
const FUNCTIONS: &[&str] = &[
    "default",
    "isnumber",
    "isstring",
    "iskeyword",
    "ispixel",
    "isem",
    "ispercentage",
    "isunit",
];

/// Where expressions look up `@variables`.
pub(crate) trait Variables {
    /// Value of `@name`; `depth` counts the variables followed so far.
    fn value(&self, name: &str, depth: usize) -> Result<Value, CompileError>;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Number { value: f64, unit: String },
    Quoted(String),
    Keyword(String),
}

impl Value {
    pub(crate) fn number(value: f64, unit: impl Into<String>) -> Self {
        Value::Number {
            value,
            unit: unit.into(),
        }
    }

    fn boolean(value: bool) -> Self {
        Value::Keyword(if value { "true" } else { "false" }.to_string())
    }

    fn is_true(&self) -> bool {
        matches!(self, Value::Keyword(keyword) if keyword == "true")
    }

    /// CSS text of the value. Strings keep their quotes.
    pub(crate) fn to_css(&self) -> String {
        match self {
            Value::Number { value, unit } => {
                let rounded = (value * PRECISION).round() / PRECISION + 0.0;
                format!("{rounded}{unit}")
            }
            Value::Quoted(text) => format!("\"{text}\""),
            Value::Keyword(text) => text.clone(),
        }
    }

    /// Text of the value when interpolated into a selector.
    pub(crate) fn to_text(&self) -> String {
        match self {
            Value::Quoted(text) => text.clone(),
            other => other.to_css(),
        }
    }

    fn has_unit(&self, expected: &str) -> bool {
        matches!(self, Value::Number { unit, .. } if unit.eq_ignore_ascii_case(expected))
    }

    /// Numbers are ordered; anything else is only ever equal.
    fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number { value: a, .. }, Value::Number { value: b, .. }) => a.partial_cmp(b),
            (
                Value::Quoted(a) | Value::Keyword(a),
                Value::Quoted(b) | Value::Keyword(b),
            ) => (a == b).then_some(Ordering::Equal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expression {
    Value(Value),
    Variable(String),
    Negate(Box<Expression>),
    Operation(char, Box<Expression>, Box<Expression>),
    Call(String, Vec<Expression>),
}

impl Expression {
    /// Parse `text` as a single expression.
    ///
    /// Returns `None` for anything else, such as space separated lists,
    /// division outside parentheses or calls to unsupported functions.
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let mut stream = TokenStream::new(tokenize(text)?);
        let expression = stream.expression()?;
        stream.is_done().then_some(expression)
    }

    pub(crate) fn is_literal(&self) -> bool {
        matches!(self, Expression::Value(_))
    }

    /// Evaluate with `default` as the result of `default()`; `None` outside
    /// mixin guards.
    pub(crate) fn evaluate(
        &self,
        variables: &dyn Variables,
        default: Option<bool>,
        depth: usize,
    ) -> Result<Value, CompileError> {
        match self {
            Expression::Value(value) => Ok(value.clone()),
            Expression::Variable(name) => variables.value(name, depth),
            Expression::Negate(inner) => match inner.evaluate(variables, default, depth)? {
                Value::Number { value, unit } => Ok(Value::Number { value: -value, unit }),
                other => Err(CompileError::InvalidOperation {
                    operation: format!("-{}", other.to_css()),
                }),
            },
            Expression::Operation(operator, left, right) => operate(
                *operator,
                left.evaluate(variables, default, depth)?,
                right.evaluate(variables, default, depth)?,
            ),
            Expression::Call(name, arguments) => {
                let arguments = arguments
                    .iter()
                    .map(|argument| argument.evaluate(variables, default, depth))
                    .collect::<Result<Vec<_>, _>>()?;
                call(name, &arguments, default)
            }
        }
    }
}

fn operate(operator: char, left: Value, right: Value) -> Result<Value, CompileError> {
    let invalid = || CompileError::InvalidOperation {
        operation: format!("{} {operator} {}", left.to_css(), right.to_css()),
    };
    let (
        Value::Number { value: a, unit: left_unit },
        Value::Number { value: b, unit: right_unit },
    ) = (&left, &right)
    else {
        return Err(invalid());
    };

    let value = match operator {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        _ if *b == 0.0 => return Err(invalid()),
        _ => a / b,
    };
    let unit = if left_unit.is_empty() { right_unit } else { left_unit };
    Ok(Value::number(value, unit.clone()))
}

fn call(name: &str, arguments: &[Value], default: Option<bool>) -> Result<Value, CompileError> {
    let first = arguments.first();
    let result = match name {
        "default" => default.ok_or_else(|| CompileError::UnsupportedGuard {
            guard: "default()".to_string(),
        })?,
        "isnumber" => matches!(first, Some(Value::Number { .. })),
        "isstring" => matches!(first, Some(Value::Quoted(_))),
        "iskeyword" => matches!(first, Some(Value::Keyword(_))),
        "ispixel" => first.is_some_and(|value| value.has_unit("px")),
        "isem" => first.is_some_and(|value| value.has_unit("em")),
        "ispercentage" => first.is_some_and(|value| value.has_unit("%")),
        "isunit" => match arguments.get(1) {
            Some(unit) => first.is_some_and(|value| value.has_unit(&unit.to_text())),
            None => false,
        },
        _ => false,
    };
    Ok(Value::boolean(result))
}

/// A `when` condition: alternatives (`,` or `or`) of conjunctions (`and`).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Guard {
    alternatives: Vec<Vec<Condition>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Condition {
    negated: bool,
    left: Expression,
    comparison: Option<(Comparison, Expression)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Equal,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Equal => ordering == Ordering::Equal,
            Comparison::Less => ordering == Ordering::Less,
            Comparison::LessOrEqual => ordering != Ordering::Greater,
            Comparison::Greater => ordering == Ordering::Greater,
            Comparison::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

impl Guard {
    /// Parse the text following `when`.
    pub(crate) fn parse(text: &str) -> Result<Self, CompileError> {
        let unsupported = || CompileError::UnsupportedGuard {
            guard: text.to_string(),
        };
        let mut stream = TokenStream::new(tokenize(text).ok_or_else(unsupported)?);

        let mut alternatives = Vec::new();
        loop {
            let mut conjunction = vec![stream.condition().ok_or_else(unsupported)?];
            while stream.eat_keyword("and") {
                conjunction.push(stream.condition().ok_or_else(unsupported)?);
            }
            alternatives.push(conjunction);

            if !(stream.eat(&Token::Comma) || stream.eat_keyword("or")) {
                break;
            }
        }

        if !stream.is_done() {
            return Err(unsupported());
        }
        Ok(Self { alternatives })
    }

    pub(crate) fn evaluate(&self, variables: &dyn Variables, default: Option<bool>) -> Result<bool, CompileError> {
        for conjunction in &self.alternatives {
            let mut holds = true;
            for condition in conjunction {
                if !condition.evaluate(variables, default)? {
                    holds = false;
                    break;
                }
            }
            if holds {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Condition {
    fn evaluate(&self, variables: &dyn Variables, default: Option<bool>) -> Result<bool, CompileError> {
        let left = self.left.evaluate(variables, default, 0)?;
        let holds = match &self.comparison {
            None => left.is_true(),
            Some((comparison, right)) => {
                let right = right.evaluate(variables, default, 0)?;
                left.compare(&right)
                    .is_some_and(|ordering| comparison.accepts(ordering))
            }
        };
        Ok(holds != self.negated)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64, String),
    Quoted(String),
    Keyword(String),
    Variable(String),
    Function(String),
    Delim(char),
    Comma,
    Open,
    Close,
}

impl Token {
    fn is_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(..) | Token::Quoted(_) | Token::Keyword(_) | Token::Variable(_) | Token::Close
        )
    }
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut tokens = Vec::new();
    collect_tokens(&mut parser, &mut tokens).then_some(tokens)
}

/// Flatten the CSS token stream, turning blocks into `Open`/`Close` pairs.
///
/// Returns `false` on tokens no expression can contain.
fn collect_tokens<'i>(parser: &mut Parser<'i, '_>, tokens: &mut Vec<Token>) -> bool {
    let mut spaced = false;
    let mut escaped = false;

    loop {
        let Ok(token) = parser.next_including_whitespace() else {
            return !escaped;
        };
        let token = token.clone();
        let after_operand = !spaced && tokens.last().is_some_and(Token::is_operand);
        spaced = false;

        let opens_block = match token {
            CssToken::WhiteSpace(_) => {
                spaced = true;
                continue;
            }
            CssToken::Delim('~') if !escaped => {
                escaped = true;
                continue;
            }
            CssToken::QuotedString(text) if escaped => {
                escaped = false;
                tokens.push(Token::Keyword(text.to_string()));
                false
            }
            _ if escaped => return false,
            CssToken::QuotedString(text) => {
                tokens.push(Token::Quoted(text.to_string()));
                false
            }
            CssToken::Number { value, has_sign, .. } => {
                push_number(tokens, value, has_sign, "", after_operand);
                false
            }
            CssToken::Dimension {
                value, has_sign, unit, ..
            } => {
                push_number(tokens, value, has_sign, &unit, after_operand);
                false
            }
            CssToken::Percentage {
                unit_value, has_sign, ..
            } => {
                push_number(tokens, unit_value * 100.0, has_sign, "%", after_operand);
                false
            }
            CssToken::Ident(name) => {
                tokens.push(Token::Keyword(name.to_string()));
                false
            }
            CssToken::Hash(name) | CssToken::IDHash(name) => {
                tokens.push(Token::Keyword(format!("#{name}")));
                false
            }
            CssToken::AtKeyword(name) => {
                tokens.push(Token::Variable(name.to_string()));
                false
            }
            CssToken::Delim(c @ ('+' | '-' | '*' | '/' | '<' | '>' | '=')) => {
                tokens.push(Token::Delim(c));
                false
            }
            CssToken::Comma => {
                tokens.push(Token::Comma);
                false
            }
            CssToken::Function(name) => {
                tokens.push(Token::Function(name.to_ascii_lowercase()));
                true
            }
            CssToken::ParenthesisBlock => {
                tokens.push(Token::Open);
                true
            }
            _ => return false,
        };

        if opens_block {
            let complete = parser
                .parse_nested_block(|nested| Ok::<_, ParseError<'i, ()>>(collect_tokens(nested, tokens)))
                .unwrap_or(false);
            if !complete {
                return false;
            }
            tokens.push(Token::Close);
        }
    }
}

/// `2-1` arrives as `2` and `-1`; a sign glued to an operand is an operator.
fn push_number(tokens: &mut Vec<Token>, value: f32, has_sign: bool, unit: &str, after_operand: bool) {
    let value = f64::from(value);
    if has_sign && after_operand {
        tokens.push(Token::Delim(if value.is_sign_negative() { '-' } else { '+' }));
        tokens.push(Token::Number(value.abs(), unit.to_string()));
    } else {
        tokens.push(Token::Number(value, unit.to_string()));
    }
}

struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    /// Parentheses currently open; `/` only divides inside them.
    parens: usize,
}

impl TokenStream {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            parens: 0,
        }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        let matched = self.peek() == Some(token);
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let matched = matches!(self.peek(), Some(Token::Keyword(k)) if k.eq_ignore_ascii_case(keyword));
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn expression(&mut self) -> Option<Expression> {
        let mut left = self.term()?;
        while let Some(Token::Delim(operator @ ('+' | '-'))) = self.peek() {
            let operator = *operator;
            self.pos += 1;
            let right = self.term()?;
            left = Expression::Operation(operator, Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn term(&mut self) -> Option<Expression> {
        let mut left = self.factor()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Delim('*')) => '*',
                Some(Token::Delim('/')) if self.parens > 0 => '/',
                _ => break,
            };
            self.pos += 1;
            let right = self.factor()?;
            left = Expression::Operation(operator, Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn factor(&mut self) -> Option<Expression> {
        match self.next()? {
            Token::Delim('-') => Some(Expression::Negate(Box::new(self.factor()?))),
            Token::Number(value, unit) => Some(Expression::Value(Value::Number { value, unit })),
            Token::Quoted(text) => Some(Expression::Value(Value::Quoted(text))),
            Token::Keyword(text) => Some(Expression::Value(Value::Keyword(text))),
            Token::Variable(name) => Some(Expression::Variable(name)),
            Token::Open => {
                let inner = self.parenthesized(Self::expression)?;
                Some(inner)
            }
            Token::Function(name) if FUNCTIONS.contains(&name.as_str()) => {
                let mut arguments = Vec::new();
                if !self.eat(&Token::Close) {
                    loop {
                        arguments.push(self.expression()?);
                        if self.eat(&Token::Close) {
                            break;
                        }
                        if !self.eat(&Token::Comma) {
                            return None;
                        }
                    }
                }
                Some(Expression::Call(name, arguments))
            }
            _ => None,
        }
    }

    /// Parse the inside of an opened parenthesis, then its `)`.
    fn parenthesized<T>(&mut self, inner: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.parens += 1;
        let parsed = inner(self);
        self.parens -= 1;
        let parsed = parsed?;
        self.eat(&Token::Close).then_some(parsed)
    }

    /// `(expr)`, `(expr op expr)` or either prefixed by `not`.
    fn condition(&mut self) -> Option<Condition> {
        // `not(` lexes as a function.
        if self.eat(&Token::Function("not".to_string())) {
            return self.parenthesized(|stream| stream.condition_body(true));
        }

        let negated = self.eat_keyword("not");
        if !self.eat(&Token::Open) {
            return None;
        }
        self.parenthesized(|stream| stream.condition_body(negated))
    }

    fn condition_body(&mut self, negated: bool) -> Option<Condition> {
        let left = self.expression()?;
        let comparison = match self.peek() {
            Some(Token::Delim('<' | '>' | '=')) => {
                let comparison = self.comparison()?;
                Some((comparison, self.expression()?))
            }
            _ => None,
        };
        Some(Condition {
            negated,
            left,
            comparison,
        })
    }

    fn comparison(&mut self) -> Option<Comparison> {
        let Some(Token::Delim(first)) = self.next() else {
            return None;
        };
        let second = match self.peek() {
            Some(Token::Delim(c @ ('<' | '>' | '='))) => {
                let c = *c;
                self.pos += 1;
                Some(c)
            }
            _ => None,
        };

        match (first, second) {
            ('=', None) => Some(Comparison::Equal),
            ('<', None) => Some(Comparison::Less),
            ('>', None) => Some(Comparison::Greater),
            ('<', Some('=')) | ('=', Some('<')) => Some(Comparison::LessOrEqual),
            ('>', Some('=')) | ('=', Some('>')) => Some(Comparison::GreaterOrEqual),
            _ => None,
        }
    }
}
