//! Literal encoding. Every literal has a value form and a condition form;
//! the two are different text and neither is derived from the other.

use crate::ast::{Literal, MapEntry, MapKey};
use crate::ir::{Condition, Value};
use crate::names::{single_quote, to_shell_identifier};
use crate::render::render_value;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static INTERPOLATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("interpolation pattern is valid")
});

/// Both encodings of one literal. `None` means that position cannot use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralForms {
    pub value: Option<Value>,
    pub condition: Option<Condition>,
}

pub fn classify(lit: &Literal) -> LiteralForms {
    match lit {
        Literal::Str(raw) => {
            let text = rewrite_string(raw);
            LiteralForms {
                condition: Some(Condition::new(format!("[[ -n {} ]]", text))),
                value: Some(Value::Scalar(text)),
            }
        }
        Literal::Shell(cmd) => {
            let text = shell_command(cmd);
            LiteralForms {
                condition: Some(Condition::new(format!("[[ -n \"{}\" ]]", text))),
                value: Some(Value::Scalar(text)),
            }
        }
        Literal::Number(n) => LiteralForms {
            value: Some(Value::scalar(n.as_str())),
            condition: Some(Condition::new(format!("(( {} ))", n))),
        },
        Literal::Bool(true) => LiteralForms {
            value: Some(Value::scalar("\"1\"")),
            condition: Some(Condition::new(":")),
        },
        Literal::Bool(false) => LiteralForms {
            value: Some(Value::scalar("\"0\"")),
            condition: Some(Condition::new("false")),
        },
        Literal::Null => LiteralForms {
            value: Some(Value::scalar("\"\"")),
            condition: Some(Condition::new("false")),
        },
        Literal::List(items) => LiteralForms {
            value: render_list(items),
            condition: None,
        },
        Literal::Map(entries) => LiteralForms {
            value: render_map(entries),
            condition: None,
        },
    }
}

/// Re-quote a string literal, mangling `${name}` references to lowercase names.
/// All-uppercase names are environment references and stay as written.
pub fn rewrite_string(raw: &str) -> String {
    let body = INTERPOLATION.replace_all(raw, |caps: &Captures| {
        let name = &caps[1];
        if name == name.to_uppercase() {
            format!("${{{}}}", name)
        } else {
            format!("${{{}}}", to_shell_identifier(name))
        }
    });
    format!("\"{}\"", body)
}

/// `$"cmd"` runs `cmd` and yields its output.
pub fn shell_command(inner: &str) -> String {
    format!("$({})", inner.trim())
}

fn render_list(items: &[crate::ast::Expr]) -> Option<Value> {
    if items.is_empty() {
        return Some(Value::EmptyList);
    }
    let mut text = String::from("\"$(__gnash_list_from_values");
    for item in items {
        text.push(' ');
        text.push_str(&render_value(item)?.operand());
    }
    text.push_str(")\"");
    Some(Value::ListHandle(text))
}

fn render_map(entries: &[MapEntry]) -> Option<Value> {
    if entries.is_empty() {
        return Some(Value::EmptyMap);
    }
    let mut text = String::from("\"$(__gnash_struct_pack");
    for entry in entries {
        let key = match &entry.key {
            MapKey::Ident(name) => single_quote(name),
            MapKey::Str(raw) => rewrite_string(raw),
        };
        let value = render_value(&entry.value)?;
        text.push(' ');
        text.push_str(&key);
        text.push(' ');
        text.push_str(&value.operand());
    }
    text.push_str(")\"");
    Some(Value::StructHandle(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, ExprKind};
    use crate::span::Span;

    fn lit(l: Literal) -> Expr {
        Expr::new(ExprKind::Literal(l), Span::default())
    }

    #[test]
    fn interpolation_mangles_lowercase_names_only() {
        assert_eq!(rewrite_string("hi ${userName} from ${HOME}"), "\"hi ${user_name} from ${HOME}\"");
        assert_eq!(rewrite_string("cost: $5"), "\"cost: $5\"");
    }

    #[test]
    fn booleans_differ_by_position() {
        let t = classify(&Literal::Bool(true));
        assert_eq!(t.value, Some(Value::scalar("\"1\"")));
        assert_eq!(t.condition, Some(Condition::new(":")));

        let null = classify(&Literal::Null);
        assert_eq!(null.value, Some(Value::scalar("\"\"")));
        assert_eq!(null.condition, Some(Condition::new("false")));
    }

    #[test]
    fn empty_collections_use_sentinels() {
        assert_eq!(classify(&Literal::List(vec![])).value, Some(Value::EmptyList));
        assert_eq!(classify(&Literal::Map(vec![])).value, Some(Value::EmptyMap));
    }

    #[test]
    fn list_literal_builds_handle() {
        let forms = classify(&Literal::List(vec![
            lit(Literal::Str("a".into())),
            lit(Literal::Number("2".into())),
        ]));
        assert_eq!(
            forms.value,
            Some(Value::ListHandle("\"$(__gnash_list_from_values \"a\" 2)\"".into()))
        );
        assert_eq!(forms.condition, None);
    }

    #[test]
    fn map_literal_packs_pairs() {
        let forms = classify(&Literal::Map(vec![
            MapEntry {
                key: MapKey::Ident("name".into()),
                value: lit(Literal::Str("gnash".into())),
            },
            MapEntry {
                key: MapKey::Str("${kind}".into()),
                value: lit(Literal::Bool(false)),
            },
        ]));
        assert_eq!(
            forms.value,
            Some(Value::StructHandle(
                "\"$(__gnash_struct_pack 'name' \"gnash\" \"${kind}\" \"0\")\"".into()
            ))
        );
    }

    #[test]
    fn shell_literal_runs_command() {
        let forms = classify(&Literal::Shell(" uname -s ".into()));
        assert_eq!(forms.value, Some(Value::scalar("$(uname -s)")));
        assert_eq!(forms.condition, Some(Condition::new("[[ -n \"$(uname -s)\" ]]")));
    }
}
