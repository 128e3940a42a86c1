use crate::value::Value;

/// The value reference at the head of a marker expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Base {
    /// `.` — the current iteration item inside an `{% each %}` body.
    SelfRef,
    /// A dotted identifier path, e.g. `user.name`.
    Path(Vec<String>),
    /// A quoted string or bare numeric literal.
    Literal(Value),
}

/// One filter invocation in a pipe chain: a registered name plus literal
/// arguments resolved entirely at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub name: String,
    pub args: Vec<Value>,
}

/// A full marker expression: base value plus filters in application order.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub base: Base,
    pub filters: Vec<FilterCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Interp(Expr),
    Each {
        expr: Expr,
        body: Vec<Node>,
    },
    If {
        expr: Expr,
        body: Vec<Node>,
        else_body: Vec<Node>,
    },
}
