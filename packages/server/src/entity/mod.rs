pub mod activity;
pub mod activity_requirement;
pub mod activity_tag;
pub mod activity_tag_link;
