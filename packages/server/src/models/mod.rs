pub mod accessibility;
pub mod activity;
pub mod dashboard;
pub mod shared;
