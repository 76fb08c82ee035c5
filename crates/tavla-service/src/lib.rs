//! Project service: orchestrates the aggregate against a [`ProjectStore`].
//!
//! Every operation takes an optional owner restriction, derived once per
//! request from the actor's granted scope (see `Actor::read_owner` /
//! `Actor::write_owner` in tavla-access). With a restriction in place,
//! "exists but owned by someone else" is indistinguishable from "does not
//! exist", and mutations always re-resolve ownership before touching the
//! store.

use chrono::NaiveDate;
use serde::Deserialize;
use tavla_domain::{Project, ProjectId, UserId};
use tavla_storage::{ProjectPage, ProjectSpecs, ProjectStore, StoreError};
use thiserror::Error;

/// Service-level failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Mutation attempted on an archived project.
    #[error("project is archived")]
    ProjectArchived,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Payload for creating a project.
#[derive(Clone, Debug, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Partial field update. Absent fields are left untouched.
///
/// Plain field edits do not append a revision; only membership and role
/// changes do. Consumers rely on the sparse log.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Orchestrates project CRUD against a storage backend.
pub struct ProjectService<S> {
    store: S,
}

impl<S: ProjectStore> ProjectService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create and persist a project owned by `created_by`.
    pub async fn create_project(
        &self,
        draft: ProjectDraft,
        created_by: UserId,
    ) -> Result<Project, ServiceError> {
        let project = Project::create(
            draft.name,
            draft.description,
            draft.start_date,
            draft.end_date,
            created_by,
        );
        self.store.save(&project).await?;
        tracing::info!(project_id = %project.id(), %created_by, "created project");
        Ok(project)
    }

    /// Query projects. With an owner restriction, it is AND-combined with
    /// any caller-supplied filters before the store sees them.
    pub async fn query_projects(
        &self,
        mut specs: ProjectSpecs,
        owner: Option<UserId>,
    ) -> Result<ProjectPage, ServiceError> {
        if let Some(owner) = owner {
            specs.restrict_to_owner(owner);
        }
        tracing::debug!(restricted = owner.is_some(), "querying projects");
        Ok(self.store.find(&specs).await?)
    }

    /// Fetch a project by ID. Under an owner restriction, a project owned by
    /// someone else is reported as absent.
    pub async fn get_project_by_id(
        &self,
        id: &ProjectId,
        owner: Option<UserId>,
    ) -> Result<Option<Project>, ServiceError> {
        let project = match self.store.find_by_id(id).await? {
            Some(project) => project,
            None => return Ok(None),
        };
        if let Some(owner) = owner {
            if project.created_by() != owner {
                return Ok(None);
            }
        }
        Ok(Some(project))
    }

    /// Apply a partial field edit. Archived projects reject edits.
    pub async fn edit_project(
        &self,
        id: &ProjectId,
        edit: ProjectEdit,
        owner: Option<UserId>,
    ) -> Result<Option<Project>, ServiceError> {
        let mut project = match self.get_project_by_id(id, owner).await? {
            Some(project) => project,
            None => return Ok(None),
        };
        if project.is_archived() {
            return Err(ServiceError::ProjectArchived);
        }

        if let Some(name) = edit.name {
            project.name = name;
        }
        if let Some(description) = edit.description {
            project.description = description;
        }
        if let Some(start_date) = edit.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = edit.end_date {
            project.end_date = end_date;
        }

        self.store.save(&project).await?;
        Ok(Some(project))
    }

    /// Archive a project. Idempotent; returns false when the project is
    /// absent or not owned by the caller.
    pub async fn archive_project(
        &self,
        id: &ProjectId,
        owner: Option<UserId>,
    ) -> Result<bool, ServiceError> {
        let project = match self.get_project_by_id(id, owner).await? {
            Some(project) => project,
            None => return Ok(false),
        };
        if project.is_archived() {
            return Ok(true);
        }
        self.store.archive(id).await?;
        tracing::info!(project_id = %id, "archived project");
        Ok(true)
    }

    /// Delete a project. Returns false when absent or not owned by the
    /// caller; the store is only touched after ownership re-resolution.
    pub async fn delete_project(
        &self,
        id: &ProjectId,
        owner: Option<UserId>,
    ) -> Result<bool, ServiceError> {
        if self.get_project_by_id(id, owner).await?.is_none() {
            return Ok(false);
        }
        self.store.delete(id).await?;
        tracing::info!(project_id = %id, "deleted project");
        Ok(true)
    }
}
