pub mod components;
pub mod login;
pub mod navbar;
pub mod project_wizard;
pub mod projects;
