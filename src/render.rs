//! Expression and condition renderers.
//!
//! Both walk the same precedence ladder. `render_value` produces text for
//! assignment and argument positions, `render_condition` produces a test for
//! `if`. Anything they cannot classify yields `None`; the caller is expected
//! to emit an unsupported-construct placeholder instead of guessing.

use crate::ast::{CompareOp, Expr, ExprKind, PostfixOp, UnaryOp};
use crate::ir::{Call, Condition, Value};
use crate::literal::classify;
use crate::names::{single_quote, to_shell_identifier};

type Attempt<T> = fn(&Expr) -> Option<T>;

/// Postfix chains are tried as a call first, then as a property access.
const VALUE_ATTEMPTS: [Attempt<Value>; 2] = [call_value, property_value];
const CONDITION_ATTEMPTS: [Attempt<Condition>; 2] = [call_condition, property_condition];

pub fn render_value(expr: &Expr) -> Option<Value> {
    match &expr.node {
        ExprKind::Ident(name) => Some(Value::Scalar(format!("\"${{{}}}\"", to_shell_identifier(name)))),
        ExprKind::Literal(lit) => classify(lit).value,
        ExprKind::Paren(inner) => render_value(inner),
        ExprKind::Postfix { .. } => VALUE_ATTEMPTS.iter().find_map(|attempt| attempt(expr)),
        // Operators only have a value form through their condition.
        ExprKind::Assign { .. }
        | ExprKind::Or(..)
        | ExprKind::And(..)
        | ExprKind::Compare { .. }
        | ExprKind::Is { .. }
        | ExprKind::Arith { .. }
        | ExprKind::Unary { .. } => None,
    }
}

pub fn render_condition(expr: &Expr) -> Option<Condition> {
    match &expr.node {
        ExprKind::Or(left, right) => {
            Some(render_condition(left)?.combine(&render_condition(right)?, "||"))
        }
        ExprKind::And(left, right) => {
            Some(render_condition(left)?.combine(&render_condition(right)?, "&&"))
        }
        ExprKind::Compare { left, op, right } => {
            let sym = match op {
                CompareOp::Eq => "==",
                CompareOp::NotEq => "!=",
                CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => return None,
            };
            let left = render_value(left)?;
            let right = render_value(right)?;
            Some(Condition::new(format!("[[ {} {} {} ]]", left.operand(), sym, right.operand())))
        }
        ExprKind::Is { value, ty } => {
            if !matches!(&ty.node, ExprKind::Ident(name) if name == "List") {
                return None;
            }
            Some(Condition::new(format!("__gnash_is_list {}", render_value(value)?.operand())))
        }
        ExprKind::Unary { op: UnaryOp::Not, expr } => Some(render_condition(expr)?.negate()),
        ExprKind::Unary { op: UnaryOp::Neg, .. } => None,
        ExprKind::Postfix { .. } => CONDITION_ATTEMPTS.iter().find_map(|attempt| attempt(expr)),
        ExprKind::Paren(inner) => Some(render_condition(inner)?.grouped()),
        ExprKind::Ident(name) => Some(Condition::new(format!("[[ -n ${{{}:-}} ]]", to_shell_identifier(name)))),
        ExprKind::Literal(lit) => classify(lit).condition,
        ExprKind::Assign { .. } | ExprKind::Arith { .. } => None,
    }
}

/// Recognizes `name(args)` and `name.field...method(args)`.
///
/// The chain must be rooted at an identifier and end in exactly one call;
/// every argument has to render as a value.
pub fn try_call(expr: &Expr) -> Option<Call> {
    let ExprKind::Postfix { base, ops } = &expr.node else {
        return None;
    };
    let ExprKind::Ident(root) = &base.node else {
        return None;
    };
    let (PostfixOp::Call(args), fields) = ops.split_last()? else {
        return None;
    };
    let mut target = root.clone();
    for op in fields {
        match op {
            PostfixOp::Field(name) => {
                target.push('.');
                target.push_str(name);
            }
            PostfixOp::Call(_) => return None,
        }
    }
    let args = args
        .iter()
        .map(|arg| render_value(arg).map(|v| v.operand()))
        .collect::<Option<Vec<_>>>()?;
    Some(Call { target, args })
}

/// Statement (and condition) form of a call.
pub fn render_call_command(call: &Call) -> String {
    if let Some(command) = list_method_command(call) {
        return command;
    }
    if call.target.starts_with("__gnash_") {
        return with_args(call.target.clone(), &call.args);
    }
    if call.target == "println" {
        return with_args("echo".to_string(), &call.args);
    }
    with_args(format!("__gnash_invoke {}", single_quote(&call.target)), &call.args)
}

/// Value form of a call: captured output.
pub fn render_call_value(call: &Call) -> Value {
    if let Some(value) = list_method_value(call) {
        return value;
    }
    if let Some(value) = struct_get_call(call) {
        return value;
    }
    if call.target.starts_with("__gnash_") {
        return Value::Scalar(format!("$({})", with_args(call.target.clone(), &call.args)));
    }
    Value::Scalar(format!(
        "$({})",
        with_args(format!("__gnash_call {}", single_quote(&call.target)), &call.args)
    ))
}

/// `a.b` reads key `b` out of the struct held by `a`.
pub fn property_access(expr: &Expr) -> Option<Value> {
    let ExprKind::Postfix { base, ops } = &expr.node else {
        return None;
    };
    let ExprKind::Ident(root) = &base.node else {
        return None;
    };
    match ops.as_slice() {
        [PostfixOp::Field(property)] => Some(struct_get(root, &single_quote(property))),
        _ => None,
    }
}

/// Turns the quoted expansion `"${x}"` into `$x`; anything else is returned as is.
pub fn unwrap_identifier(value: &str) -> String {
    if let Some(inner) = value.strip_prefix("\"${").and_then(|v| v.strip_suffix("}\"")) {
        if !inner.contains('}') {
            return format!("${}", inner);
        }
    }
    value.to_string()
}

fn call_value(expr: &Expr) -> Option<Value> {
    try_call(expr).map(|call| render_call_value(&call))
}

fn property_value(expr: &Expr) -> Option<Value> {
    property_access(expr)
}

fn call_condition(expr: &Expr) -> Option<Condition> {
    try_call(expr).map(|call| Condition::new(render_call_command(&call)))
}

fn property_condition(expr: &Expr) -> Option<Condition> {
    property_access(expr).map(|value| Condition::new(format!("[[ -n {} ]]", value.operand())))
}

fn list_method_command(call: &Call) -> Option<String> {
    let (receiver, method) = call.receiver_method()?;
    if call.args.is_empty() {
        return None;
    }
    let function = match method {
        "add" => "__gnash_list_append",
        "contains" => "__gnash_list_contains",
        _ => return None,
    };
    Some(with_args(
        format!("{} \"${{{}}}\"", function, to_shell_identifier(receiver)),
        &call.args,
    ))
}

fn list_method_value(call: &Call) -> Option<Value> {
    let (receiver, method) = call.receiver_method()?;
    if method != "contains" || call.args.is_empty() {
        return None;
    }
    Some(Value::Scalar(format!(
        "$({})",
        with_args(
            format!("__gnash_list_contains_value \"${{{}}}\"", to_shell_identifier(receiver)),
            &call.args,
        )
    )))
}

/// `cfg.get(key)` on a lowercase receiver is a struct lookup.
fn struct_get_call(call: &Call) -> Option<Value> {
    let [key] = call.args.as_slice() else {
        return None;
    };
    let receiver = call.target.strip_suffix(".get")?;
    if !receiver.starts_with(|c: char| c.is_lowercase()) {
        return None;
    }
    Some(struct_get(receiver, key))
}

fn struct_get(receiver: &str, key: &str) -> Value {
    Value::StructField {
        receiver: to_shell_identifier(receiver),
        key: key.to_string(),
    }
}

fn with_args(mut head: String, args: &[String]) -> String {
    for arg in args {
        head.push(' ');
        head.push_str(arg);
    }
    head
}
