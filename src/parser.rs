use crate::Result;
use crate::ast::{Base, Expr, FilterCall, Node};
use crate::error::Error;
use crate::lexer::{Lexer, Token};
use crate::value::Value;

/// Represents a stack frame during parsing to handle nested block directives.
///
/// When an opening directive (like `{% each %}`) is encountered, a frame is
/// pushed onto the stack so the matching close can attach the collected body.
enum BlockFrame {
    /// An `each` frame, storing the bound expression.
    Each { expr: Expr, pos: usize },
    /// An `if` frame. `body` stays `None` until an `{% else %}` splits the
    /// collected nodes into the true branch.
    If {
        expr: Expr,
        pos: usize,
        body: Option<Vec<Node>>,
    },
}

/// Builds the compiled node tree from the token stream.
///
/// Uses a stack-based approach: each open directive pushes a fresh node
/// collection, each close pops it and wraps it into a block node. Unlike
/// lenient engines that auto-close dangling directives, an unmatched open or
/// close fails the compile.
struct Parser {
    /// A stack of node collections. Each level corresponds to the body of a
    /// nested block. The first element is always the root-level nodes.
    nodes_stack: Vec<Vec<Node>>,
    /// A stack of open block directives.
    block_stack: Vec<BlockFrame>,
}

impl Parser {
    fn new() -> Self {
        Self {
            nodes_stack: vec![Vec::new()],
            block_stack: Vec::new(),
        }
    }

    fn run(mut self, lexer: Lexer) -> Result<Vec<Node>> {
        for token in lexer {
            match token? {
                Token::Text(t) => self.append_text(t),
                Token::Interp { inner, pos } => {
                    let expr = parse_expr(inner, pos)?;
                    self.append_node(Node::Interp(expr));
                }
                Token::Block { inner, pos } => self.directive(inner, pos)?,
            }
        }

        if let Some(frame) = self.block_stack.last() {
            let (name, pos) = match frame {
                BlockFrame::Each { pos, .. } => ("each", *pos),
                BlockFrame::If { pos, .. } => ("if", *pos),
            };
            return Err(Error::MismatchedBlock(format!(
                "'{}' opened at byte {} is never closed",
                name, pos
            )));
        }

        Ok(self.nodes_stack.pop().unwrap_or_default())
    }

    fn directive(&mut self, inner: &str, pos: usize) -> Result<()> {
        let trimmed = inner.trim();
        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            "each" | "if" if rest.is_empty() => Err(Error::InvalidDirective(format!(
                "'{}' at byte {} requires an expression",
                name, pos
            ))),
            "each" => {
                let expr = parse_expr(rest, pos)?;
                self.nodes_stack.push(Vec::new());
                self.block_stack.push(BlockFrame::Each { expr, pos });
                Ok(())
            }
            "if" => {
                let expr = parse_expr(rest, pos)?;
                self.nodes_stack.push(Vec::new());
                self.block_stack.push(BlockFrame::If {
                    expr,
                    pos,
                    body: None,
                });
                Ok(())
            }
            "else" => match self.block_stack.last_mut() {
                Some(BlockFrame::If { body, .. }) if body.is_none() => {
                    let taken = self.nodes_stack.pop().unwrap_or_default();
                    *body = Some(taken);
                    self.nodes_stack.push(Vec::new());
                    Ok(())
                }
                _ => Err(Error::MismatchedBlock(format!(
                    "'else' at byte {} without an open 'if'",
                    pos
                ))),
            },
            "endeach" => match self.block_stack.pop() {
                Some(BlockFrame::Each { expr, .. }) => {
                    let body = self.nodes_stack.pop().unwrap_or_default();
                    self.append_node(Node::Each { expr, body });
                    Ok(())
                }
                _ => Err(Error::MismatchedBlock(format!(
                    "'endeach' at byte {} does not close an 'each'",
                    pos
                ))),
            },
            "endif" => match self.block_stack.pop() {
                Some(BlockFrame::If {
                    expr,
                    body: split_body,
                    ..
                }) => {
                    let tail = self.nodes_stack.pop().unwrap_or_default();
                    let (body, else_body) = match split_body {
                        Some(body) => (body, tail),
                        None => (tail, Vec::new()),
                    };
                    self.append_node(Node::If {
                        expr,
                        body,
                        else_body,
                    });
                    Ok(())
                }
                _ => Err(Error::MismatchedBlock(format!(
                    "'endif' at byte {} does not close an 'if'",
                    pos
                ))),
            },
            "" => Err(Error::InvalidDirective(format!(
                "empty block marker at byte {}",
                pos
            ))),
            other => Err(Error::InvalidDirective(format!(
                "'{}' at byte {}",
                other, pos
            ))),
        }
    }

    /// Append a node to the current active scope.
    fn append_node(&mut self, node: Node) {
        if let Some(nodes) = self.nodes_stack.last_mut() {
            nodes.push(node);
        }
    }

    /// Append text, merging with the previous text node when possible.
    fn append_text(&mut self, text: &str) {
        if let Some(nodes) = self.nodes_stack.last_mut() {
            if let Some(Node::Text(last_text)) = nodes.last_mut() {
                last_text.push_str(text);
            } else {
                nodes.push(Node::Text(text.to_string()));
            }
        }
    }
}

/// Main entry point: parse a template string into a node tree.
pub(crate) fn parse(source: &str) -> Result<Vec<Node>> {
    Parser::new().run(Lexer::new(source))
}

/// Parse the inner text of a marker: a base reference followed by zero or
/// more pipe-delimited filter invocations.
fn parse_expr(input: &str, pos: usize) -> Result<Expr> {
    let segments = split_pipes(input);

    let base_str = segments[0].trim();
    if base_str.is_empty() {
        return Err(Error::InvalidFilterSyntax(format!(
            "empty expression in marker at byte {}",
            pos
        )));
    }
    let base = parse_base(base_str, pos)?;

    let mut filters = Vec::with_capacity(segments.len() - 1);
    for segment in &segments[1..] {
        filters.push(parse_filter(segment, pos)?);
    }

    Ok(Expr { base, filters })
}

fn parse_base(token: &str, pos: usize) -> Result<Base> {
    if token == "." {
        return Ok(Base::SelfRef);
    }
    if let Some(lit) = parse_literal(token) {
        return Ok(Base::Literal(lit));
    }
    if token.split('.').all(is_identifier) {
        return Ok(Base::Path(token.split('.').map(str::to_string).collect()));
    }
    Err(Error::InvalidFilterSyntax(format!(
        "'{}' at byte {} is not a path, literal or '.'",
        token, pos
    )))
}

fn parse_filter(segment: &str, pos: usize) -> Result<FilterCall> {
    let tokens = split_tokens(segment);
    let Some((name, arg_tokens)) = tokens.split_first() else {
        return Err(Error::InvalidFilterSyntax(format!(
            "empty filter segment at byte {}",
            pos
        )));
    };

    if !is_filter_name(name) {
        return Err(Error::InvalidFilterSyntax(format!(
            "'{}' is not a filter name, in segment '{}' at byte {}",
            name,
            segment.trim(),
            pos
        )));
    }

    let mut args = Vec::with_capacity(arg_tokens.len());
    for token in arg_tokens {
        match parse_literal(token) {
            Some(v) => args.push(v),
            None => {
                return Err(Error::InvalidFilterArgument(format!(
                    "'{}' passed to filter '{}' at byte {}, only quoted strings and numbers are supported",
                    token, name, pos
                )));
            }
        }
    }

    Ok(FilterCall {
        name: name.to_string(),
        args,
    })
}

/// Parse a literal token: `'quoted string'`, integer or float.
fn parse_literal(token: &str) -> Option<Value> {
    if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
        return Some(Value::Str(token[1..token.len() - 1].to_string()));
    }
    if let Ok(n) = token.parse::<i64>() {
        return Some(Value::I64(n));
    }
    if let Ok(n) = token.parse::<f64>() {
        return Some(Value::F64(n));
    }
    None
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Filter names additionally allow dots, which are path separators only in
/// the base position (`removeExt`, `string.trim`).
fn is_filter_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

/// Split on top-level `|` only; pipes inside single-quoted literals are not
/// split points.
fn split_pipes(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quote = false;
    for (i, c) in s.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            '|' if !in_quote => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split a filter segment into whitespace-delimited tokens, keeping quoted
/// literals (which may contain spaces) as single tokens.
fn split_tokens(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut in_quote = false;
    for (i, c) in s.char_indices() {
        if c == '\'' {
            in_quote = !in_quote;
            if start.is_none() {
                start = Some(i);
            }
        } else if c.is_whitespace() && !in_quote {
            if let Some(st) = start.take() {
                tokens.push(&s[st..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        tokens.push(&s[st..]);
    }
    tokens
}
