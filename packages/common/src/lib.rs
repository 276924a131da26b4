pub mod activity_status;
pub mod activity_type;

pub use activity_status::{ActivityStatus, LEGACY_STATUS_ALIASES, StatusBucket};
pub use activity_type::ActivityType;
