//! Row identifiers.
//!
//! Every persisted entity is keyed by an SQLite rowid. The newtypes keep a
//! `UserId` from being passed where a `ProgramId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Raw row id.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

row_id!(
    /// Identifier of a [`crate::Document`].
    DocumentId
);
row_id!(
    /// Identifier of a [`crate::DocumentType`].
    DocumentTypeId
);
row_id!(
    /// Identifier of a [`crate::User`].
    UserId
);
row_id!(
    /// Identifier of a [`crate::Program`].
    ProgramId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_serde() {
        let id = DocumentId(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: DocumentId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }
}
