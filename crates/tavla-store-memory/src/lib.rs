//! In-memory ProjectStore implementation.
//!
//! Suitable for tests and single-process deployments. Projects are only held
//! within one process; nothing is shared across replicas.

use dashmap::DashMap;
use tavla_domain::{Project, ProjectId};
use tavla_storage::{
    ProjectFilters, ProjectPage, ProjectSort, ProjectSpecs, ProjectStore, StoreError,
};

/// In-memory project store backed by a concurrent map.
#[derive(Default)]
pub struct MemoryStore {
    projects: DashMap<ProjectId, Project>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

fn matches(project: &Project, filters: &ProjectFilters) -> bool {
    if let Some(needle) = &filters.name_contains {
        if !project
            .name
            .to_lowercase()
            .contains(&needle.to_lowercase())
        {
            return false;
        }
    }
    if let Some(needle) = &filters.description_contains {
        if !project
            .description
            .to_lowercase()
            .contains(&needle.to_lowercase())
        {
            return false;
        }
    }
    if let Some(from) = filters.start_date_from {
        if project.start_date < from {
            return false;
        }
    }
    if let Some(to) = filters.start_date_to {
        if project.start_date > to {
            return false;
        }
    }
    if let Some(from) = filters.end_date_from {
        if project.end_date < from {
            return false;
        }
    }
    if let Some(to) = filters.end_date_to {
        if project.end_date > to {
            return false;
        }
    }
    if let Some(owner) = filters.created_by {
        if project.created_by() != owner {
            return false;
        }
    }
    if let Some(archived) = filters.archived {
        if project.is_archived() != archived {
            return false;
        }
    }
    true
}

fn sort_projects(projects: &mut [Project], sort: ProjectSort) {
    match sort {
        ProjectSort::Name => projects.sort_by(|a, b| a.name.cmp(&b.name)),
        ProjectSort::StartDate => projects.sort_by_key(|p| p.start_date),
        ProjectSort::EndDate => projects.sort_by_key(|p| p.end_date),
        // Creation times can collide; the ID breaks ties deterministically.
        ProjectSort::CreatedAt => projects.sort_by_key(|p| (p.created_at(), p.id().0)),
    }
}

#[async_trait::async_trait]
impl ProjectStore for MemoryStore {
    async fn find(&self, specs: &ProjectSpecs) -> Result<ProjectPage, StoreError> {
        let mut matched: Vec<Project> = self
            .projects
            .iter()
            .filter(|entry| {
                specs
                    .filters
                    .as_ref()
                    .map_or(true, |f| matches(entry.value(), f))
            })
            .map(|entry| entry.value().clone())
            .collect();

        sort_projects(&mut matched, specs.sort.unwrap_or_default());

        let total_count = matched.len() as u64;
        let projects = match specs.pagination {
            Some(page) => matched
                .into_iter()
                .skip(page.offset())
                .take(page.limit())
                .collect(),
            None => matched,
        };

        Ok(ProjectPage {
            projects,
            total_count,
        })
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, project: &Project) -> Result<(), StoreError> {
        self.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn archive(&self, id: &ProjectId) -> Result<(), StoreError> {
        let mut entry = self.projects.get_mut(id).ok_or(StoreError::NotFound)?;
        entry.value_mut().archive();
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), StoreError> {
        self.projects
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
