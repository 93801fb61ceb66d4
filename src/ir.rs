//! Rendered fragments: value expressions, boolean tests, and call shapes.

pub const EMPTY_LIST_SENTINEL: &str = "\"$(__gnash_list_empty)\"";
/// An empty map used as an operand: a struct with no fields.
pub const EMPTY_STRUCT_OPERAND: &str = "\"$(__gnash_struct_pack)\"";

/// A value expression together with what kind of runtime value it denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    /// Expression yielding a `__gnash_list::` handle.
    ListHandle(String),
    /// Expression yielding packed `key=encoding:value` lines.
    StructHandle(String),
    /// Field `key` of the struct held in shell variable `receiver`.
    StructField { receiver: String, key: String },
    EmptyList,
    /// Only meaningful as an assignment source, where it declares an
    /// associative array. Everywhere else it is an empty struct.
    EmptyMap,
}

impl Value {
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(text.into())
    }

    /// Text for argument, operand and right-hand-side positions.
    pub fn operand(&self) -> String {
        match self {
            Value::Scalar(s) | Value::ListHandle(s) | Value::StructHandle(s) => s.clone(),
            Value::StructField { receiver, key } => {
                format!("\"$(__gnash_struct_get \"${{{}:-}}\" {})\"", receiver, key)
            }
            Value::EmptyList => EMPTY_LIST_SENTINEL.to_string(),
            Value::EmptyMap => EMPTY_STRUCT_OPERAND.to_string(),
        }
    }

    /// Whether a `for` loop can iterate this value. Structs are not sequences.
    pub fn is_iterable(&self) -> bool {
        !matches!(self, Value::StructHandle(_) | Value::EmptyMap)
    }
}

/// A self-contained test usable directly after `if`, `elif` or `while`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    text: String,
    /// Built by `combine`; negation must wrap the whole chain.
    compound: bool,
}

impl Condition {
    pub fn new(text: impl AsRef<str>) -> Self {
        Condition {
            text: text.as_ref().trim().to_string(),
            compound: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn negate(&self) -> Condition {
        let text = self.text.as_str();
        if self.compound {
            return Condition::new(format!("! ({})", text));
        }
        if let Some(rest) = text.strip_prefix('!') {
            return Condition::new(rest);
        }
        if text.starts_with('[')
            || text.starts_with("__gnash")
            || text.starts_with("echo")
            || text.starts_with("$(")
        {
            return Condition::new(format!("! {}", text));
        }
        Condition::new(format!("! ({})", text))
    }

    /// Brace-groups a combined chain so it stays one operand of an enclosing chain.
    pub fn grouped(self) -> Condition {
        if !self.compound {
            return self;
        }
        Condition::new(format!("{{ {}; }}", self.text))
    }

    /// Joins `self op other` left to right, without regrouping.
    pub fn combine(&self, other: &Condition, op: &str) -> Condition {
        Condition {
            text: format!("{} {} {}", self.text, op, other.text),
            compound: true,
        }
    }
}

/// A call on a dotted target with its arguments already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub target: String,
    pub args: Vec<String>,
}

impl Call {
    /// Splits `receiver.method` at the first dot.
    pub fn receiver_method(&self) -> Option<(&str, &str)> {
        match self.target.split_once('.') {
            Some((receiver, method)) if !receiver.is_empty() => Some((receiver, method)),
            _ => None,
        }
    }
}
