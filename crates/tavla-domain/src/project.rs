//! The Project aggregate: team membership, phases, and the revision log.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::{PhaseId, ProjectId, RevisionId, Role, UserId};

/// Aggregate rule violations, surfaced to callers as 4xx-class failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("role {role} for user {user_id} does not exist")]
    RoleNotHeld { user_id: UserId, role: Role },
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// Project team: an ordered member list plus one role per member.
///
/// Both views stay in sync: a user appears in the member list iff it has an
/// entry in the role map.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Team {
    members: Vec<UserId>,
    roles: HashMap<UserId, Role>,
}

impl Team {
    /// Add a member with a role, or replace the role of an existing member.
    pub fn add_member(&mut self, user: UserId, role: Role) {
        if !self.members.contains(&user) {
            self.members.push(user);
        }
        self.roles.insert(user, role);
    }

    /// Remove a member and its role. No-op if the user is not a member.
    pub fn remove_member(&mut self, user: &UserId) {
        self.members.retain(|m| m != user);
        self.roles.remove(user);
    }

    /// Drop a member's role entry, and with it the membership itself.
    pub fn clear_role(&mut self, user: &UserId) {
        self.remove_member(user);
    }

    /// Role currently held by a user, if any.
    pub fn role_of(&self, user: &UserId) -> Option<Role> {
        self.roles.get(user).copied()
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A dated slice of a project's schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Phase {
    id: PhaseId,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl Phase {
    /// Create a phase. Fails if the range is inverted.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, DomainError> {
        if start_date > end_date {
            return Err(DomainError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id: PhaseId::new(),
            start_date,
            end_date,
        })
    }

    pub fn id(&self) -> PhaseId {
        self.id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Whether today (local calendar) falls inside the phase.
    pub fn is_active(&self) -> bool {
        let today = Local::now().date_naive();
        self.start_date <= today && today <= self.end_date
    }
}

/// One immutable entry in a project's change history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Revision {
    id: RevisionId,
    timestamp: DateTime<Utc>,
    change_content: Map<String, Value>,
}

impl Revision {
    fn new(change_content: Map<String, Value>) -> Self {
        Self {
            id: RevisionId::new(),
            timestamp: Utc::now(),
            change_content,
        }
    }

    pub fn id(&self) -> RevisionId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn change_content(&self) -> &Map<String, Value> {
        &self.change_content
    }
}

/// Aggregate root. Construction seeds the team with the creator as Owner and
/// emits the initial revision; membership mutations each append exactly one
/// revision. Plain field edits (name, description, dates) are direct
/// attribute replacement and leave no revision, matching the service's
/// sparse-log contract.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    created_by: UserId,
    created_at: DateTime<Utc>,
    revisions: Vec<Revision>,
    phases: Vec<Phase>,
    team: Team,
    archived: bool,
}

impl Project {
    /// Create a new project owned by `created_by`.
    pub fn create(
        name: impl Into<String>,
        description: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        created_by: UserId,
    ) -> Self {
        let name = name.into();
        let description = description.into();

        let mut project = Self {
            id: ProjectId::new(),
            name: name.clone(),
            description: description.clone(),
            start_date,
            end_date,
            created_by,
            created_at: Utc::now(),
            revisions: Vec::new(),
            phases: Vec::new(),
            team: Team::default(),
            archived: false,
        };

        project.push_revision(json!({
            "project_created": {
                "name": name,
                "description": description,
            }
        }));
        project.team.add_member(created_by, Role::Owner);
        project
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Revision log, oldest first. Append-only; never rewritten.
    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn is_archived(&self) -> bool {
        self.archived
    }

    /// Mark the project archived. One-way; there is no un-archive.
    pub fn archive(&mut self) {
        self.archived = true;
    }

    /// Append a phase to the schedule.
    pub fn add_phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }

    /// Whether the user created this project.
    pub fn is_owner(&self, user: &UserId) -> bool {
        self.created_by == *user
    }

    /// Whether the user holds an editing role on the team.
    pub fn is_editor(&self, user: &UserId) -> bool {
        self.team.role_of(user).is_some_and(|r| r.is_editor())
    }

    /// Whether the user holds any role on the team.
    pub fn is_viewer(&self, user: &UserId) -> bool {
        self.team.role_of(user).is_some_and(|r| r.is_viewer())
    }

    /// Add a team member and record the change.
    pub fn add_member(&mut self, user: UserId, role: Role) {
        self.team.add_member(user, role);
        self.push_revision(json!({
            "added_member": {
                "user_id": user,
                "role": role,
            }
        }));
    }

    /// Drop a member's role, which also drops the membership.
    ///
    /// The given role must match the member's current role.
    pub fn remove_member_role(&mut self, user: &UserId, role: Role) -> Result<(), DomainError> {
        if self.team.role_of(user) != Some(role) {
            return Err(DomainError::RoleNotHeld {
                user_id: *user,
                role,
            });
        }
        self.team.clear_role(user);
        self.push_revision(json!({
            "removed_role": {
                "role": role,
                "user_id": user,
            }
        }));
        Ok(())
    }

    /// Remove a member and record the change. No error if absent.
    pub fn remove_member(&mut self, user: &UserId) {
        self.team.remove_member(user);
        self.push_revision(json!({
            "removed_member": user,
        }));
    }

    fn push_revision(&mut self, change_content: Value) {
        let content = match change_content {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("change".to_string(), other);
                map
            }
        };
        self.revisions.push(Revision::new(content));
    }
}
