pub mod path;
pub mod profile;
pub mod section;
