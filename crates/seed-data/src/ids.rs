//! Typed identifiers returned by the gateway.
//!
//! Identifiers are opaque strings owned by the remote services. They are
//! validated once at the boundary (non-blank) and serialize transparently so
//! dumps carry plain string values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier, rejecting blank values.
            ///
            /// # Errors
            ///
            /// Returns [`IdentifierError::Empty`] when the value is empty or
            /// whitespace-only.
            pub fn new(raw: impl Into<String>) -> Result<Self, IdentifierError> {
                let value: String = raw.into();
                if value.trim().is_empty() {
                    return Err(IdentifierError::Empty { kind: $kind });
                }
                Ok(Self(value))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_identifier!(
    /// Identifier of a user created through the users gateway.
    UserId => "user"
);
define_identifier!(
    /// Identifier of an account opened through the accounts gateway.
    AccountId => "account"
);
define_identifier!(
    /// Identifier of a card, either issued or created with its account.
    CardId => "card"
);
define_identifier!(
    /// Identifier of an operation created through the operations gateway.
    OperationId => "operation"
);

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn rejects_blank_identifiers(#[case] raw: &str) {
        assert_eq!(
            UserId::new(raw),
            Err(IdentifierError::Empty { kind: "user" })
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = CardId::new("card-1").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"card-1\"");
    }

    #[test]
    fn deserialization_rejects_empty_string() {
        let result = serde_json::from_str::<AccountId>("\"\"");
        let err = result.expect_err("empty id must fail");
        assert!(err.to_string().contains("account identifier must not be empty"));
    }

    #[test]
    fn display_matches_raw_value() {
        let id = OperationId::new("op-42").expect("valid id");
        assert_eq!(id.to_string(), "op-42");
        assert_eq!(id.as_str(), "op-42");
    }
}
