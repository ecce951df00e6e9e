use crate::value::Value;
use std::fmt;

///
/// FieldModel
/// Runtime field metadata used by planning and validation.
///

pub struct FieldModel {
    /// Field name as used in predicates, selections, and rows.
    pub name: &'static str,
    /// Runtime type shape.
    pub kind: FieldKind,
    /// Soft nullability: `Value::Null` is a legal stored value.
    pub nullable: bool,
    /// Planner-level uniqueness candidate for where-unique lookups.
    pub unique: bool,
}

///
/// FieldKind
///
/// Minimal scalar surface needed by the planners and validators.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Bool,
    /// Closed variant set with wire-stable spellings.
    Enum { values: &'static [&'static str] },
    Float,
    Int,
    Text,
    Timestamp,
}

impl FieldKind {
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Fields usable in ORDER BY and range comparisons.
    #[must_use]
    pub const fn is_orderable(&self) -> bool {
        matches!(self, Self::Float | Self::Int | Self::Text | Self::Timestamp)
    }

    /// True when a literal is directly compatible with this field kind.
    /// Int literals widen to Float fields; nothing else widens.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool, Value::Bool(_))
            | (Self::Float, Value::Float(_) | Value::Int(_))
            | (Self::Int, Value::Int(_))
            | (Self::Text, Value::Text(_))
            | (Self::Timestamp, Value::Timestamp(_)) => true,
            (Self::Enum { values }, Value::Enum(literal)) => {
                values.contains(&literal.variant())
            }
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Enum { .. } => write!(f, "enum"),
            Self::Float => write!(f, "float"),
            Self::Int => write!(f, "int"),
            Self::Text => write!(f, "text"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::FieldKind;
    use crate::value::{Value, ValueEnum};

    #[test]
    fn int_literals_widen_to_float_fields() {
        assert!(FieldKind::Float.accepts(&Value::Int(3)));
        assert!(!FieldKind::Int.accepts(&Value::Text("3".to_string())));
    }

    #[test]
    fn enum_literals_check_declared_variants() {
        let kind = FieldKind::Enum {
            values: &["AVAILABLE", "RESERVED", "SOLD"],
        };

        assert!(kind.accepts(&Value::Enum(ValueEnum::new("SOLD"))));
        assert!(!kind.accepts(&Value::Enum(ValueEnum::new("sold"))));
        assert!(!kind.accepts(&Value::Text("SOLD".to_string())));
    }

    #[test]
    fn orderability_excludes_bool_and_enum() {
        assert!(FieldKind::Timestamp.is_orderable());
        assert!(!FieldKind::Bool.is_orderable());
        assert!(!FieldKind::Enum { values: &[] }.is_orderable());
    }
}
