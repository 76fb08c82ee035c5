//! The request-scoped actor: an authenticated identity plus granted scopes.

use tavla_domain::UserId;

use crate::ProjectScope;

/// Authenticated caller for the current request. Reconstructed from a
/// verified token and never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub scopes: Vec<ProjectScope>,
}

impl Actor {
    pub fn new(user_id: UserId, scopes: Vec<ProjectScope>) -> Self {
        Self { user_id, scopes }
    }

    pub fn has_scope(&self, scope: ProjectScope) -> bool {
        self.scopes.contains(&scope)
    }

    /// Whether the granted scope set intersects `scopes`.
    pub fn has_any_scope(&self, scopes: &[ProjectScope]) -> bool {
        scopes.iter().any(|s| self.has_scope(*s))
    }

    /// Owner restriction for read operations.
    ///
    /// `None` when the actor may read every owner's projects; `Some` when it
    /// is confined to its own. Unrestricted read wins over the self variant.
    pub fn read_owner(&self) -> Option<UserId> {
        if self.has_scope(ProjectScope::Read) {
            None
        } else {
            Some(self.user_id)
        }
    }

    /// Owner restriction for write operations. Same rule as [`read_owner`].
    ///
    /// [`read_owner`]: Actor::read_owner
    pub fn write_owner(&self) -> Option<UserId> {
        if self.has_scope(ProjectScope::Write) {
            None
        } else {
            Some(self.user_id)
        }
    }
}
