//! Query specifications: filters, pagination, and sorting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tavla_domain::{Project, UserId};

/// Filter criteria for project queries. All present fields are AND-combined.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectFilters {
    pub name_contains: Option<String>,
    pub description_contains: Option<String>,
    pub start_date_from: Option<NaiveDate>,
    pub start_date_to: Option<NaiveDate>,
    pub end_date_from: Option<NaiveDate>,
    pub end_date_to: Option<NaiveDate>,
    pub created_by: Option<UserId>,
    pub archived: Option<bool>,
}

/// 1-based pagination window.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Number of items to skip. Out-of-range values clamp to the first page.
    pub fn offset(&self) -> usize {
        let page = self.page.max(1) as usize;
        (page - 1) * self.limit()
    }

    /// Page size, at least 1.
    pub fn limit(&self) -> usize {
        self.page_size.max(1) as usize
    }
}

/// Sort key for project listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSort {
    Name,
    StartDate,
    EndDate,
    #[default]
    CreatedAt,
}

/// Full query specification passed to [`ProjectStore::find`].
///
/// [`ProjectStore::find`]: crate::ProjectStore::find
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectSpecs {
    pub filters: Option<ProjectFilters>,
    pub pagination: Option<Pagination>,
    pub sort: Option<ProjectSort>,
}

impl ProjectSpecs {
    /// Force an owner restriction into the filter set, AND-combined with any
    /// caller-supplied filters.
    pub fn restrict_to_owner(&mut self, owner: UserId) {
        self.filters
            .get_or_insert_with(ProjectFilters::default)
            .created_by = Some(owner);
    }
}

/// One page of query results along with the pre-pagination total.
#[derive(Clone, Debug, Default)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub total_count: u64,
}
