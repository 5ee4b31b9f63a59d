use std::fmt;

/// Client-side routes of the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    AddProject,
    ProjectDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Home => "/home".to_string(),
            Route::AddProject => "/adicionar-projeto".to_string(),
            Route::ProjectDetail(id) => format!("/projeto/{id}"),
        }
    }

    /// Resolve a path; `/` redirects to the login route
    pub fn parse(path: &str) -> Option<Route> {
        match path {
            "/" | "/login" => Some(Route::Login),
            "/home" => Some(Route::Home),
            "/adicionar-projeto" => Some(Route::AddProject),
            _ => path
                .strip_prefix("/projeto/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Route::ProjectDetail(id.to_string())),
        }
    }

    /// Whether a view is registered for this route.
    /// Project details are served by a view outside this application.
    pub fn is_registered(&self) -> bool {
        !matches!(self, Route::ProjectDetail(_))
    }

    /// Routes drawn inside the navigation bar layout
    pub fn has_navbar(&self) -> bool {
        matches!(self, Route::Home | Route::AddProject)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
