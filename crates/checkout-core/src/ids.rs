//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a `CartId` where an `OrderId` is expected. Generated IDs
//! are UUID v4 so that identifiers exposed in URLs are not enumerable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random ID.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(UserId);
define_id!(CartId);
define_id!(CartItemId);
define_id!(VariantId);
define_id!(OrderId);
define_id!(OrderItemId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = CartId::new("cart-123");
        assert_eq!(id.as_str(), "cart-123");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generated_id_is_uuid() {
        let id = OrderId::generate();
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_id_from_str() {
        let id: VariantId = "var-7".into();
        assert_eq!(format!("{}", id), "var-7");
    }

    #[test]
    fn test_into_inner() {
        let id = UserId::new("user-9");
        assert_eq!(id.into_inner(), "user-9");
    }
}
