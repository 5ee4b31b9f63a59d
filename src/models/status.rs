use serde::{Deserialize, Serialize};
use tui::style::Color;

/// Lifecycle stage of a project, as coded by the Project API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ProjectStatus {
    Created,
    InProgress,
    Suspended,
    Cancelled,
    Completed,
    Unknown(i32),
}

impl ProjectStatus {
    pub fn code(self) -> i32 {
        match self {
            ProjectStatus::Created => 0,
            ProjectStatus::InProgress => 1,
            ProjectStatus::Suspended => 2,
            ProjectStatus::Cancelled => 3,
            ProjectStatus::Completed => 4,
            ProjectStatus::Unknown(code) => code,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Created => "Created",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Suspended => "Suspended",
            ProjectStatus::Cancelled => "Cancelled",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Unknown(_) => "Unknown",
        }
    }

    /// Badge colour used by the list view
    pub fn color(self) -> Color {
        match self {
            ProjectStatus::Created => Color::Blue,
            ProjectStatus::InProgress => Color::Yellow,
            ProjectStatus::Suspended => Color::Gray,
            ProjectStatus::Cancelled => Color::Red,
            ProjectStatus::Completed => Color::Green,
            ProjectStatus::Unknown(_) => Color::DarkGray,
        }
    }

    /// Next known status, wrapping around; used by the add-project form
    pub fn next(self) -> Self {
        match self {
            ProjectStatus::Created => ProjectStatus::InProgress,
            ProjectStatus::InProgress => ProjectStatus::Suspended,
            ProjectStatus::Suspended => ProjectStatus::Cancelled,
            ProjectStatus::Cancelled => ProjectStatus::Completed,
            ProjectStatus::Completed | ProjectStatus::Unknown(_) => ProjectStatus::Created,
        }
    }
}

impl From<i32> for ProjectStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => ProjectStatus::Created,
            1 => ProjectStatus::InProgress,
            2 => ProjectStatus::Suspended,
            3 => ProjectStatus::Cancelled,
            4 => ProjectStatus::Completed,
            other => ProjectStatus::Unknown(other),
        }
    }
}

impl From<ProjectStatus> for i32 {
    fn from(status: ProjectStatus) -> Self {
        status.code()
    }
}

/// Status selection offered by the list view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProjectStatus),
}

impl StatusFilter {
    /// Options offered by the filter control, in display order.
    /// Suspended and Cancelled are not offered.
    pub const OPTIONS: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(ProjectStatus::Created),
        StatusFilter::Only(ProjectStatus::InProgress),
        StatusFilter::Only(ProjectStatus::Completed),
    ];

    /// Value sent as the `status` query parameter
    pub fn code(self) -> i32 {
        match self {
            StatusFilter::All => -1,
            StatusFilter::Only(status) => status.code(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.label(),
        }
    }

    /// The option after this one in `OPTIONS`; filters outside the list restart at `All`
    pub fn cycle(self) -> Self {
        let position = Self::OPTIONS.iter().position(|option| *option == self);
        match position {
            Some(i) => Self::OPTIONS[(i + 1) % Self::OPTIONS.len()],
            None => StatusFilter::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [ProjectStatus; 5] = [
        ProjectStatus::Created,
        ProjectStatus::InProgress,
        ProjectStatus::Suspended,
        ProjectStatus::Cancelled,
        ProjectStatus::Completed,
    ];

    #[test]
    fn codes_map_to_statuses() {
        for status in KNOWN {
            assert_eq!(ProjectStatus::from(status.code()), status);
        }
        assert_eq!(ProjectStatus::from(9), ProjectStatus::Unknown(9));
        assert_eq!(ProjectStatus::from(9).label(), "Unknown");
    }

    #[test]
    fn status_deserializes_from_integer() {
        let status: ProjectStatus = serde_json::from_str("4").unwrap();
        assert_eq!(status, ProjectStatus::Completed);
        assert_eq!(serde_json::to_string(&ProjectStatus::InProgress).unwrap(), "1");
    }

    #[test]
    fn filter_codes() {
        assert_eq!(StatusFilter::All.code(), -1);
        assert_eq!(StatusFilter::Only(ProjectStatus::Completed).code(), 4);
    }

    #[test]
    fn filter_cycles_through_offered_options() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..StatusFilter::OPTIONS.len() {
            seen.push(filter);
            filter = filter.cycle();
        }

        assert_eq!(seen, StatusFilter::OPTIONS.to_vec());
        assert_eq!(filter, StatusFilter::All);
        assert_eq!(
            StatusFilter::Only(ProjectStatus::Suspended).cycle(),
            StatusFilter::All
        );
    }
}
