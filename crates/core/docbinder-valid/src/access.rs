//! Access rules for documents.
//!
//! Decisions take the actor, the owner of the document (its uploader) and
//! the requested permission. Superusers and holders of the model
//! permission are allowed; the owner of a document may always delete it.

use serde::{Deserialize, Serialize};

use docbinder_types::{Document, Permission, ProgramId, User, UserId};

use crate::error::AccessDenied;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessDecision {
    Allow,
    Deny,
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        self == AccessDecision::Allow
    }
}

/// Check if `actor` is the owner (uploader).
pub fn is_owner(actor: &User, owner: Option<UserId>) -> bool {
    owner == Some(actor.id)
}

/// Decide whether `actor` may exercise `permission` on a document owned by `owner`.
pub fn authorize(actor: &User, owner: Option<UserId>, permission: Permission) -> AccessDecision {
    if actor.has_permission(permission) {
        return AccessDecision::Allow;
    }
    if permission == Permission::Delete && is_owner(actor, owner) {
        return AccessDecision::Allow;
    }
    AccessDecision::Deny
}

/// Like [`authorize`], but a denial is an error.
pub fn require(
    actor: &User,
    owner: Option<UserId>,
    permission: Permission,
) -> Result<(), AccessDenied> {
    match authorize(actor, owner, permission) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny => Err(AccessDenied {
            username: actor.username.clone(),
            permission,
        }),
    }
}

/// Programs the actor is restricted to.
///
/// `None` means unrestricted. Guests are restricted to their own program.
/// A guest without a program is restricted to the empty set and sees no
/// documents at all, rather than falling back to unrestricted access.
pub fn visible_programs(actor: &User) -> Option<Vec<ProgramId>> {
    if actor.is_guest() && !actor.is_superuser {
        Some(actor.program.into_iter().collect())
    } else {
        None
    }
}

/// Whether `document` falls inside the actor's program restriction.
pub fn can_see(actor: &User, document: &Document) -> bool {
    match visible_programs(actor) {
        None => true,
        Some(programs) => programs.iter().any(|p| document.in_program(*p)),
    }
}
