//! The ProjectStore trait that backends implement.

use tavla_domain::{Project, ProjectId};

use crate::{ProjectPage, ProjectSpecs, StoreError};

/// The repository contract the service layer depends on.
///
/// Backends own their isolation; the service re-fetches before every
/// mutation, so at minimum last-writer-wins semantics are expected here.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    /// Query projects matching `specs`, returning one page plus the total
    /// match count.
    async fn find(&self, specs: &ProjectSpecs) -> Result<ProjectPage, StoreError>;

    /// Fetch a project by ID, or `None` if absent.
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, StoreError>;

    /// Insert or replace a project.
    async fn save(&self, project: &Project) -> Result<(), StoreError>;

    /// Mark a project archived.
    async fn archive(&self, id: &ProjectId) -> Result<(), StoreError>;

    /// Remove a project entirely. Deletion is terminal; no tombstone remains.
    async fn delete(&self, id: &ProjectId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time smoke test for trait object usage.
    struct NoopStore;

    #[async_trait::async_trait]
    impl ProjectStore for NoopStore {
        async fn find(&self, _specs: &ProjectSpecs) -> Result<ProjectPage, StoreError> {
            Ok(ProjectPage::default())
        }

        async fn find_by_id(&self, _id: &ProjectId) -> Result<Option<Project>, StoreError> {
            Ok(None)
        }

        async fn save(&self, _project: &Project) -> Result<(), StoreError> {
            Ok(())
        }

        async fn archive(&self, _id: &ProjectId) -> Result<(), StoreError> {
            Err(StoreError::NotFound)
        }

        async fn delete(&self, _id: &ProjectId) -> Result<(), StoreError> {
            Err(StoreError::NotFound)
        }
    }

    #[tokio::test]
    async fn trait_smoke() {
        let store: Box<dyn ProjectStore> = Box::new(NoopStore);

        let page = store.find(&ProjectSpecs::default()).await.unwrap();
        assert_eq!(page.total_count, 0);
        assert!(store
            .find_by_id(&ProjectId::new())
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            store.delete(&ProjectId::new()).await,
            Err(StoreError::NotFound)
        ));
    }
}
