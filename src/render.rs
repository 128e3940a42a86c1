use crate::Result;
use crate::ast::{Base, Expr, Node};
use crate::context::Context;
use crate::error::Error;
use crate::filters::FilterRegistry;
use crate::value::Value;

/// Resolve an expression: base value first, then the filter chain strictly
/// left to right, each call consuming the previous result.
pub(crate) fn eval_expr(
    expr: &Expr,
    ctx: &Context,
    registry: &FilterRegistry,
) -> Result<Value> {
    let mut acc = match &expr.base {
        Base::Literal(v) => v.clone(),
        Base::SelfRef => ctx.current(),
        Base::Path(segments) => ctx.lookup(segments),
    };

    for call in &expr.filters {
        let filter = registry.lookup(&call.name).ok_or_else(|| {
            Error::UnknownFilter(format!("'{}' is not registered", call.name))
        })?;
        acc = filter(acc, &call.args);
    }

    Ok(acc)
}

/// Walk the compiled node tree in document order, appending to the output
/// buffer. Fails atomically: any error discards the whole render.
pub(crate) fn render(
    nodes: &[Node],
    ctx: &mut Context,
    registry: &FilterRegistry,
    out: &mut String,
) -> Result<()> {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Interp(expr) => {
                let v = eval_expr(expr, ctx, registry)?;
                v.write_text(out);
            }
            Node::Each { expr, body } => {
                // A non-list bound value iterates zero times.
                if let Value::List(items) = eval_expr(expr, ctx, registry)? {
                    for item in items {
                        ctx.push(item);
                        let result = render(body, ctx, registry, out);
                        ctx.pop();
                        result?;
                    }
                }
            }
            Node::If {
                expr,
                body,
                else_body,
            } => {
                let branch = if eval_expr(expr, ctx, registry)?.is_truthy() {
                    body
                } else {
                    else_body
                };
                render(branch, ctx, registry, out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FilterCall;
    use std::collections::HashMap;

    fn root(entries: Vec<(&str, Value)>) -> Value {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<HashMap<_, _>>(),
        )
    }

    fn path_expr(p: &str, filters: Vec<FilterCall>) -> Expr {
        Expr {
            base: Base::Path(p.split('.').map(str::to_string).collect()),
            filters,
        }
    }

    #[test]
    fn test_eval_missing_path_is_null() {
        let data = root(vec![]);
        let ctx = Context::new(&data);
        let registry = FilterRegistry::new();

        let v = eval_expr(&path_expr("nope", vec![]), &ctx, &registry).unwrap();
        assert_eq!(v, Value::Null);
    }

    #[test]
    fn test_eval_unknown_filter_fails() {
        let data = root(vec![("x", Value::I64(1))]);
        let ctx = Context::new(&data);
        let registry = FilterRegistry::new();

        let expr = path_expr(
            "x",
            vec![FilterCall {
                name: "missing".to_string(),
                args: vec![],
            }],
        );
        let err = eval_expr(&expr, &ctx, &registry).unwrap_err();
        assert!(matches!(err, Error::UnknownFilter(_)));
    }

    #[test]
    fn test_filters_apply_in_order() {
        let data = root(vec![("x", Value::from("ab"))]);
        let ctx = Context::new(&data);
        let mut registry = FilterRegistry::new();
        registry.register("append", |v, args| {
            Value::Str(format!("{}{}", v.to_text(), args[0].to_text()))
        });
        registry.register("reverse", |v, _| match v {
            Value::Str(s) => Value::Str(s.chars().rev().collect()),
            other => other,
        });

        let expr = path_expr(
            "x",
            vec![
                FilterCall {
                    name: "append".to_string(),
                    args: vec![Value::from("c")],
                },
                FilterCall {
                    name: "reverse".to_string(),
                    args: vec![],
                },
            ],
        );
        let v = eval_expr(&expr, &ctx, &registry).unwrap();
        assert_eq!(v, Value::from("cba"));
    }

    #[test]
    fn test_each_over_non_list_renders_nothing() {
        let data = root(vec![("items", Value::I64(3))]);
        let mut ctx = Context::new(&data);
        let registry = FilterRegistry::new();

        let nodes = vec![Node::Each {
            expr: path_expr("items", vec![]),
            body: vec![Node::Text("x".to_string())],
        }];
        let mut out = String::new();
        render(&nodes, &mut ctx, &registry, &mut out).unwrap();
        assert_eq!(out, "");
    }
}
