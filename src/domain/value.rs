use std::fmt::{Display, Formatter, Result};
use std::sync::Arc;

use crate::runtime::Module;

/// The runtime value representation visible to embedders of the import
/// subsystem. Namespaces store these (or an internal placeholder, which no
/// public read path can ever return).
#[derive(Clone, Debug)]
pub enum Value {
    None,
    Integer(i64),
    Float(f64),
    Str(String),
    Boolean(bool),
    List(Vec<Value>),
    Module(Arc<Module>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_module(&self) -> Option<&Arc<Module>> {
        match self {
            Self::Module(m) => Some(m),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // Module identity, not structural equality: two references to the
            // same module object are the same module.
            (Value::Module(a), Value::Module(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Boolean(b) => match b {
                true => write!(f, "True"),
                false => write!(f, "False"),
            },
            Value::List(i) => {
                let items = i
                    .iter()
                    .map(|x| x.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{items}]")
            }
            Value::Module(m) => write!(f, "<module '{}'>", m.name()),
        }
    }
}
