//! Project access scopes.

use std::str::FromStr;

/// A named permission unit. The `Self` variants restrict visibility and
/// mutation to resources created by the actor itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectScope {
    Read,
    Write,
    ReadSelf,
    WriteSelf,
}

/// Error type for parsing ProjectScope from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseScopeError(pub String);

impl std::fmt::Display for ParseScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid scope: {}", self.0)
    }
}

impl std::error::Error for ParseScopeError {}

impl FromStr for ProjectScope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "projects" => Ok(ProjectScope::Read),
            "projects:write" => Ok(ProjectScope::Write),
            "projects:self" => Ok(ProjectScope::ReadSelf),
            "projects:self.write" => Ok(ProjectScope::WriteSelf),
            _ => Err(ParseScopeError(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProjectScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProjectScope {
    /// Wire representation carried in token claims and request bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectScope::Read => "projects",
            ProjectScope::Write => "projects:write",
            ProjectScope::ReadSelf => "projects:self",
            ProjectScope::WriteSelf => "projects:self.write",
        }
    }

    /// Parse a list of scope strings, silently dropping unrecognized values.
    ///
    /// Request-body parsing uses this; callers must reject an empty result.
    pub fn parse_known<S: AsRef<str>>(values: &[S]) -> Vec<ProjectScope> {
        values
            .iter()
            .filter_map(|v| v.as_ref().parse().ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_round_trip() {
        for scope in [
            ProjectScope::Read,
            ProjectScope::Write,
            ProjectScope::ReadSelf,
            ProjectScope::WriteSelf,
        ] {
            assert_eq!(scope.as_str().parse::<ProjectScope>().unwrap(), scope);
        }
    }

    #[test]
    fn unknown_scope_is_an_error_when_strict() {
        assert!("projects:admin".parse::<ProjectScope>().is_err());
        assert!("".parse::<ProjectScope>().is_err());
    }

    #[test]
    fn lenient_parsing_drops_unknown_values() {
        let parsed =
            ProjectScope::parse_known(&["projects", "projects:admin", "projects:self.write"]);
        assert_eq!(parsed, vec![ProjectScope::Read, ProjectScope::WriteSelf]);

        assert!(ProjectScope::parse_known(&["bogus", "other"]).is_empty());
    }
}
