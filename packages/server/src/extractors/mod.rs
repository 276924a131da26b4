pub mod accessibility;
pub mod form;
pub mod path;
