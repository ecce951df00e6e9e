//! Wire-stable enumerations.
//!
//! Variant spellings are part of the external contract and must match the
//! store exactly; `as_str`/`from_str` round-trip through those spellings.

use estatedb_core::{
    traits::FieldValue,
    value::{Value, ValueEnum},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// EnumParseError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
#[error("unknown {kind} variant '{variant}'")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub variant: String,
}

// One declaration per wire enum: variants, spellings, and conversions.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// Wire-stable variant spellings, in declaration order.
            pub const VALUES: &'static [&'static str] = &[ $( $wire, )+ ];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(EnumParseError {
                        kind: stringify!($name),
                        variant: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FieldValue for $name {
            fn to_value(&self) -> Value {
                Value::Enum(ValueEnum::new(self.as_str()))
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Self {
                Self::Enum(ValueEnum::new(v.as_str()))
            }
        }
    };
}

wire_enum! {
    /// Account role of a CRM user.
    Role {
        Admin => "ADMIN",
        Agent => "AGENT",
    }
}

wire_enum! {
    /// Activation state of a CRM user.
    Status {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    }
}

wire_enum! {
    /// Pipeline state of a client.
    ClientStatus {
        Lead => "LEAD",
        Client => "CLIENT",
    }
}

wire_enum! {
    /// Property category of an apartment listing.
    PropertyType {
        Apartment => "APARTMENT",
        Duplex => "DUPLEX",
        Villa => "VILLA",
        Store => "STORE",
        Land => "LAND",
    }
}

wire_enum! {
    /// Sale state of an apartment listing.
    ApartmentStatus {
        Available => "AVAILABLE",
        Reserved => "RESERVED",
        Sold => "SOLD",
    }
}

wire_enum! {
    /// Progress state of a task.
    TodoStatus {
        Todo => "TODO",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{ApartmentStatus, PropertyType, Role, TodoStatus};
    use std::str::FromStr;

    #[test]
    fn wire_spellings_round_trip() {
        for value in ApartmentStatus::VALUES {
            let parsed = ApartmentStatus::from_str(value).expect("declared variant parses");
            assert_eq!(parsed.as_str(), *value);
        }
    }

    #[test]
    fn in_progress_uses_the_underscored_spelling() {
        assert_eq!(TodoStatus::InProgress.as_str(), "IN_PROGRESS");
        assert_eq!(
            TodoStatus::from_str("IN_PROGRESS").expect("parses"),
            TodoStatus::InProgress
        );
    }

    #[test]
    fn unknown_variants_are_rejected_with_context() {
        let err = Role::from_str("OWNER").expect_err("not a role");

        assert_eq!(err.kind, "Role");
        assert_eq!(err.variant, "OWNER");
    }

    #[test]
    fn serde_uses_the_wire_spellings() {
        let json = serde_json::to_string(&PropertyType::Duplex).expect("serializes");

        assert_eq!(json, "\"DUPLEX\"");
    }
}
