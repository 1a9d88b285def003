//! Enum types: model permissions and the soft-delete state machine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypesError};

/// Model-level permission on documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Read a document and its detail page.
    View,
    /// Upload new documents.
    Add,
    /// Edit existing documents.
    Change,
    /// Soft-delete documents.
    Delete,
}

impl Permission {
    /// All permissions, in declaration order.
    pub const ALL: [Permission; 4] = [
        Permission::View,
        Permission::Add,
        Permission::Change,
        Permission::Delete,
    ];

    /// Codename used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Add => "add",
            Permission::Change => "change",
            Permission::Delete => "delete",
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Permission::View),
            "add" => Ok(Permission::Add),
            "change" => Ok(Permission::Change),
            "delete" => Ok(Permission::Delete),
            other => Err(TypesError::UnknownPermission(other.to_string())),
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a document.
///
/// Rows are never removed: deletion moves a document to `Deleted` and it
/// stays in storage (and in the index, flagged) from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    /// Visible in default listings and searches.
    #[default]
    Active,
    /// Soft-deleted.
    Deleted,
}

/// Something that happens to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Ordinary edit; keeps the current state.
    Edit,
    /// The delete action of the admin surface.
    SoftDelete,
    /// Clearing the deleted flag through a direct field edit.
    Restore,
}

/// Allowed transitions as `(from, transition, to)`.
pub const TRANSITIONS: [(DocumentState, Transition, DocumentState); 4] = [
    (DocumentState::Active, Transition::Edit, DocumentState::Active),
    (DocumentState::Active, Transition::SoftDelete, DocumentState::Deleted),
    (DocumentState::Deleted, Transition::Edit, DocumentState::Deleted),
    (DocumentState::Deleted, Transition::Restore, DocumentState::Active),
];

impl DocumentState {
    /// Whether this is the soft-deleted state.
    pub fn is_deleted(self) -> bool {
        self == DocumentState::Deleted
    }

    /// Map the boolean soft-delete flag to a state.
    pub fn from_deleted_flag(deleted: bool) -> Self {
        if deleted {
            DocumentState::Deleted
        } else {
            DocumentState::Active
        }
    }

    /// Apply a transition, returning the resulting state.
    pub fn apply(self, transition: Transition) -> Result<DocumentState> {
        TRANSITIONS
            .iter()
            .find(|(from, t, _)| *from == self && *t == transition)
            .map(|(_, _, to)| *to)
            .ok_or(TypesError::InvalidTransition {
                from: self,
                transition,
            })
    }

    /// The transition that takes `self` to the state named by a submitted
    /// `deleted` flag during an edit.
    pub fn edit_transition(self, deleted: bool) -> Transition {
        match (self, deleted) {
            (DocumentState::Active, true) => Transition::SoftDelete,
            (DocumentState::Deleted, false) => Transition::Restore,
            _ => Transition::Edit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use DocumentState::*;
        use Transition::*;

        assert_eq!(Active.apply(Edit).unwrap(), Active);
        assert_eq!(Active.apply(SoftDelete).unwrap(), Deleted);
        assert_eq!(Deleted.apply(Edit).unwrap(), Deleted);
        assert_eq!(Deleted.apply(Restore).unwrap(), Active);
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(matches!(
            DocumentState::Deleted.apply(Transition::SoftDelete),
            Err(TypesError::InvalidTransition { .. })
        ));
        assert!(DocumentState::Active.apply(Transition::Restore).is_err());
    }

    #[test]
    fn test_edit_transition_from_flag() {
        assert_eq!(
            DocumentState::Active.edit_transition(true),
            Transition::SoftDelete
        );
        assert_eq!(
            DocumentState::Deleted.edit_transition(false),
            Transition::Restore
        );
        assert_eq!(DocumentState::Active.edit_transition(false), Transition::Edit);
        assert_eq!(DocumentState::Deleted.edit_transition(true), Transition::Edit);
    }

    #[test]
    fn test_permission_parse() {
        assert_eq!("Delete".parse::<Permission>().unwrap(), Permission::Delete);
        assert!("publish".parse::<Permission>().is_err());
        for p in Permission::ALL {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
        }
    }
}
