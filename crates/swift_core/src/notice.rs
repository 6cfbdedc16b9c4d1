/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Short user-facing message produced by the demo flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(severity: Severity, title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity,
        }
    }

    pub fn info(title: &str, description: &str) -> Self {
        Self::new(Severity::Info, title, description)
    }

    pub fn success(title: &str, description: &str) -> Self {
        Self::new(Severity::Success, title, description)
    }

    pub fn error(title: &str, description: &str) -> Self {
        Self::new(Severity::Error, title, description)
    }
}
