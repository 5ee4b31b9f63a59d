mod project;
mod status;

pub use project::{NewProject, Project};
pub use status::{ProjectStatus, StatusFilter};
