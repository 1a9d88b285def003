//! Users, programs and document types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::GUEST_GROUP;
use crate::enums::Permission;
use crate::ids::{DocumentTypeId, ProgramId, UserId};

/// A named document category, unique by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: DocumentTypeId,
    pub name: String,
}

/// A program documents can be associated with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
}

/// A staff account as seen by this module.
///
/// Authentication is handled elsewhere; this only carries what the
/// document layer needs for authorization and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    /// Superusers pass every permission check.
    #[serde(default)]
    pub is_superuser: bool,
    /// Model-level permissions on documents.
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
    /// Group names.
    #[serde(default)]
    pub groups: BTreeSet<String>,
    /// Home program, used to scope guest visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<ProgramId>,
}

impl User {
    /// Whether the user holds `permission`, either directly or as superuser.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.is_superuser || self.permissions.contains(&permission)
    }

    /// Members of the guest group see only their own program's documents.
    pub fn is_guest(&self) -> bool {
        self.groups.contains(GUEST_GROUP)
    }

    /// Full name, falling back to the username when blank.
    pub fn display_name(&self) -> &str {
        let name = self.full_name.trim();
        if name.is_empty() {
            &self.username
        } else {
            name
        }
    }
}
