use common::{ActivityType, StatusBucket};
use serde::Serialize;

use super::accessibility::Accessibility;
use super::activity::ActivityListItem;

/// Activity counts per status bucket. Every canonical status falls in
/// exactly one bucket, so the four counts add up to the dashboard total.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct StatusCounts {
    #[schema(example = 4)]
    pub upcoming: u64,
    #[schema(example = 2)]
    pub active: u64,
    #[schema(example = 7)]
    pub completed: u64,
    #[schema(example = 1)]
    pub cancelled: u64,
}

impl StatusCounts {
    pub fn add(&mut self, bucket: StatusBucket, count: u64) {
        match bucket {
            StatusBucket::Upcoming => self.upcoming += count,
            StatusBucket::Active => self.active += count,
            StatusBucket::Completed => self.completed += count,
            StatusBucket::Cancelled => self.cancelled += count,
        }
    }

    pub fn sum(&self) -> u64 {
        self.upcoming + self.active + self.completed + self.cancelled
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[schema(example = "Curso")]
    pub label: &'static str,
    #[schema(example = 3)]
    pub count: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DashboardPage {
    /// Number of activities.
    #[schema(example = 14)]
    pub total: u64,
    pub by_status: StatusCounts,
    /// One entry per activity type, zero counts included.
    pub by_type: Vec<TypeCount>,
    /// The most recently created activities.
    pub recent: Vec<ActivityListItem>,
    pub accessibility: Accessibility,
}
