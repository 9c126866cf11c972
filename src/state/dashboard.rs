//! Home screen: groups, subjects and their totals.

use tracing::info;

use super::handle::StateHandle;
use super::resource::{run_load, LoadOutcome, Resource};
use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::{Group, Subject};

/// Which subjects the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupFilter {
    #[default]
    All,
    /// Subjects outside any group
    Ungrouped,
    Group(String),
}

impl GroupFilter {
    pub fn matches(&self, subject: &Subject) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Ungrouped => subject.group_id.is_none(),
            GroupFilter::Group(id) => subject.group_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// Aggregate counters shown above the subject grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardTotals {
    pub groups: usize,
    pub subjects: usize,
    pub pdfs: u32,
    pub exams: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub groups: Resource<Vec<Group>>,
    pub subjects: Resource<Vec<Subject>>,
    pub filter: GroupFilter,
    /// One-shot confirmation or failure message
    pub notice: Option<String>,
}

impl DashboardState {
    /// Subjects passing the current filter, in server order.
    pub fn visible_subjects(&self) -> Vec<&Subject> {
        self.subjects
            .data()
            .map(|subjects| subjects.iter().filter(|s| self.filter.matches(s)).collect())
            .unwrap_or_default()
    }

    pub fn totals(&self) -> DashboardTotals {
        let subjects = self.subjects.data().map(Vec::as_slice).unwrap_or_default();
        DashboardTotals {
            groups: self.groups.data().map_or(0, Vec::len),
            subjects: subjects.len(),
            pdfs: subjects.iter().map(|s| s.pdf_count).sum(),
            exams: subjects.iter().map(|s| s.exam_count).sum(),
        }
    }

    pub fn group_name(&self, group_id: &str) -> Option<&str> {
        self.groups
            .data()?
            .iter()
            .find(|g| g.id == group_id)
            .map(|g| g.name.as_str())
    }

    /// Subject count per group, computed from the loaded subjects.
    pub fn subject_count(&self, group_id: &str) -> usize {
        self.subjects.data().map_or(0, |subjects| {
            subjects
                .iter()
                .filter(|s| s.group_id.as_deref() == Some(group_id))
                .count()
        })
    }
}

pub struct DashboardViewModel {
    api: ApiClient,
    state: StateHandle<DashboardState>,
}

impl DashboardViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateHandle::default(),
        }
    }

    pub fn state(&self) -> &StateHandle<DashboardState> {
        &self.state
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.snapshot()
    }

    /// Load groups and subjects together. Returns the first failure, after
    /// both loads have settled.
    pub async fn load(&self, force: bool) -> AppResult<()> {
        let (groups, subjects) = tokio::join!(self.load_groups(force), self.load_subjects(force));
        groups?;
        subjects?;
        Ok(())
    }

    pub async fn load_groups(&self, force: bool) -> AppResult<LoadOutcome> {
        run_load(
            &self.state,
            |s: &mut DashboardState| &mut s.groups,
            force,
            "groups",
            self.api.list_groups(),
        )
        .await
    }

    /// All subjects; grouping is filtered locally.
    pub async fn load_subjects(&self, force: bool) -> AppResult<LoadOutcome> {
        run_load(
            &self.state,
            |s: &mut DashboardState| &mut s.subjects,
            force,
            "subjects",
            self.api.list_subjects(None),
        )
        .await
    }

    pub fn set_filter(&self, filter: GroupFilter) {
        self.state.update(|s| s.filter = filter);
    }

    /// Delete a group, then reload both lists since its subjects become
    /// ungrouped.
    pub async fn delete_group(&self, group_id: &str) -> AppResult<()> {
        let result = self.api.delete_group(group_id).await;
        self.finish_delete(result, "Group deleted").await?;
        self.state.update(|s| {
            if s.filter == GroupFilter::Group(group_id.to_string()) {
                s.filter = GroupFilter::All;
            }
        });
        info!("Deleted group {}", group_id);
        Ok(())
    }

    pub async fn delete_subject(&self, subject_id: &str) -> AppResult<()> {
        let result = self.api.delete_subject(subject_id).await;
        self.finish_delete(result, "Subject deleted").await?;
        info!("Deleted subject {}", subject_id);
        Ok(())
    }

    async fn finish_delete(&self, result: AppResult<()>, done: &str) -> AppResult<()> {
        let reload = self.load(true).await;
        match result {
            Ok(()) => {
                self.state.update(|s| s.notice = Some(done.to_string()));
                reload
            }
            Err(err) => {
                let message = err.user_message();
                self.state.update(|s| s.notice = Some(message));
                Err(err)
            }
        }
    }

    pub fn dismiss_notice(&self) {
        self.state.update(|s| s.notice = None);
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }
}
