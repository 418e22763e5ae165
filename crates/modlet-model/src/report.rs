//! Validation diagnostics and reports.

use std::fmt;

/// Severity of a diagnostic, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        f.write_str(label)
    }
}

/// A single structured finding produced during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category code, e.g. `"schema-public-id-conflict"`.
    pub identifier: Option<String>,
    pub severity: Severity,
    pub message: String,
    /// Name of the offending entity, when one can be named.
    pub element: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            identifier: None,
            severity,
            message: message.into(),
            element: None,
        }
    }

    pub fn error(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            severity: Severity::Error,
            message: message.into(),
            element: None,
        }
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Some(id) => write!(f, "[{}] {}: {}", self.severity, id, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// The merged outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    details: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.details.push(diagnostic);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.details.extend(other.details);
    }

    pub fn details(&self) -> &[Diagnostic] {
        &self.details
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// A report is valid iff no detail exceeds [`Severity::Warning`].
    pub fn is_valid(&self) -> bool {
        self.details.iter().all(|d| d.severity <= Severity::Warning)
    }

    /// All diagnostics carrying the given category identifier.
    pub fn diagnostics(&self, identifier: &str) -> Vec<&Diagnostic> {
        self.details
            .iter()
            .filter(|d| d.identifier.as_deref() == Some(identifier))
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, detail) in self.details.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{detail}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("FATAL".parse::<Severity>().unwrap(), Severity::Fatal);
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_empty_report_is_valid() {
        assert!(ValidationReport::new().is_valid());
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut report = ValidationReport::new();
        report.add(Diagnostic::new(Severity::Info, "note"));
        report.add(Diagnostic::new(Severity::Warning, "careful"));
        assert!(report.is_valid());
    }

    #[test]
    fn test_error_invalidates() {
        let mut report = ValidationReport::new();
        report.add(Diagnostic::new(Severity::Warning, "careful"));
        report.add(Diagnostic::error("broken", "bad"));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_merge_carries_diagnostics() {
        let mut a = ValidationReport::new();
        a.add(Diagnostic::new(Severity::Info, "one"));
        let mut b = ValidationReport::new();
        b.add(Diagnostic::error("x", "two"));

        a.merge(b);
        assert_eq!(a.details().len(), 2);
        assert!(!a.is_valid());
    }

    #[test]
    fn test_diagnostics_by_identifier() {
        let mut report = ValidationReport::new();
        report.add(Diagnostic::error("dup", "first"));
        report.add(Diagnostic::new(Severity::Info, "note"));
        report.add(Diagnostic::error("dup", "second"));

        assert_eq!(report.diagnostics("dup").len(), 2);
    }
}
