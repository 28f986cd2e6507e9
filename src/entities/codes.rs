//! String-backed codes stored by the owning application.
//!
//! The writer may introduce new codes at any time, so every enum here carries
//! an `Other` variant holding the raw value. Parsing never fails and the
//! stored text always round-trips unchanged.

use sea_orm::sea_query::{ArrayType, ColumnType, Nullable, StringLen, ValueType, ValueTypeErr};
use sea_orm::{ColIdx, QueryResult, TryGetError, TryGetable, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! string_code {
    ($ty:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Other(code) => code.as_str(),
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $ty {
            fn from(code: &str) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    other => Self::Other(other.to_owned()),
                }
            }
        }

        impl From<String> for $ty {
            fn from(code: String) -> Self {
                Self::from(code.as_str())
            }
        }

        impl From<$ty> for String {
            fn from(code: $ty) -> Self {
                match code {
                    $ty::Other(raw) => raw,
                    known => known.as_str().to_owned(),
                }
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }

        impl From<$ty> for Value {
            fn from(code: $ty) -> Self {
                Value::String(Some(Box::new(code.into())))
            }
        }

        impl TryGetable for $ty {
            fn try_get_by<I: ColIdx>(res: &QueryResult, index: I) -> Result<Self, TryGetError> {
                String::try_get_by(res, index).map(Self::from)
            }
        }

        impl ValueType for $ty {
            fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
                <String as ValueType>::try_from(v).map(Self::from)
            }

            fn type_name() -> String {
                stringify!($ty).to_owned()
            }

            fn array_type() -> ArrayType {
                ArrayType::String
            }

            fn column_type() -> ColumnType {
                ColumnType::String(StringLen::None)
            }
        }

        impl Nullable for $ty {
            fn null() -> Value {
                Value::String(None)
            }
        }
    };
}

/// `User.role`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserRole {
    Admin,
    User,
    Other(String),
}

string_code!(UserRole {
    Admin => "admin",
    User => "user",
});

/// `AuditSession.status` and `CountSession.status`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Active,
    Completed,
    Other(String),
}

string_code!(SessionStatus {
    Active => "active",
    Completed => "completed",
});

/// `Transaction.type`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Count,
    In,
    Out,
    Other(String),
}

string_code!(TransactionType {
    Count => "count",
    In => "in",
    Out => "out",
});
