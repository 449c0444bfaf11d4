//! Project board references parsed from URLs
//!
//! A project board is addressed by a URL of the form
//! `https://github.com/<orgs|users>/<owner>/projects/<number>`. The scheme is
//! optional. A trailing `/views/<n>`, query string or fragment (as copied
//! from the browser) is accepted and ignored.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

static PROJECT_URL_RE: OnceLock<Regex> = OnceLock::new();

fn project_url_re() -> &'static Regex {
    PROJECT_URL_RE.get_or_init(|| {
        Regex::new(
            r"^(?:https?://)?(?:www\.)?github\.com/([^/\s?#]+)/([^/\s?#]+)/projects/(\d+)(?:/views/\d+)?/?(?:[?#].*)?$",
        )
        .expect("project URL pattern is valid")
    })
}

/// Kind of account owning a project board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    Organization,
    User,
}

impl OwnerType {
    /// Map a URL path segment (`orgs` / `users`) to an owner type
    pub fn from_url_segment(segment: &str) -> Result<Self> {
        match segment {
            "orgs" => Ok(OwnerType::Organization),
            "users" => Ok(OwnerType::User),
            other => Err(Error::UnsupportedOwnerType(other.to_string())),
        }
    }

    /// Name of the GraphQL root field that resolves this owner
    pub fn graphql_field(&self) -> &'static str {
        match self {
            OwnerType::Organization => "organization",
            OwnerType::User => "user",
        }
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerType::Organization => write!(f, "organization"),
            OwnerType::User => write!(f, "user"),
        }
    }
}

/// A project board identified by owner and number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
    /// Whether the board belongs to an organization or a user
    pub owner_type: OwnerType,
    /// Login of the owning account
    pub owner_name: String,
    /// Board number, always positive
    pub project_number: u64,
}

impl ProjectReference {
    /// Parse a project board URL
    pub fn parse(url: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidConfiguration {
            input: url.to_string(),
            reason: reason.to_string(),
        };

        let caps = project_url_re().captures(url).ok_or_else(|| {
            invalid("expected https://github.com/<orgs|users>/<owner>/projects/<number>")
        })?;

        let owner_type = OwnerType::from_url_segment(&caps[1])?;

        let project_number: u64 = caps[3]
            .parse()
            .map_err(|_| invalid("project number is out of range"))?;
        if project_number == 0 {
            return Err(invalid("project number must be positive"));
        }

        Ok(Self {
            owner_type,
            owner_name: caps[2].to_string(),
            project_number,
        })
    }
}

impl FromStr for ProjectReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ProjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} project #{}",
            self.owner_type, self.owner_name, self.project_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_org_url() {
        let project = ProjectReference::parse("https://github.com/orgs/acme/projects/7").unwrap();
        assert_eq!(project.owner_type, OwnerType::Organization);
        assert_eq!(project.owner_name, "acme");
        assert_eq!(project.project_number, 7);
    }

    #[test]
    fn test_parse_user_url_without_scheme() {
        let project = ProjectReference::parse("github.com/users/jdoe/projects/3").unwrap();
        assert_eq!(project.owner_type, OwnerType::User);
        assert_eq!(project.owner_name, "jdoe");
        assert_eq!(project.project_number, 3);
    }

    #[test]
    fn test_parse_view_suffix_and_trailing_slash() {
        let project =
            ProjectReference::parse("https://github.com/orgs/my-org/projects/12/views/4").unwrap();
        assert_eq!(project.owner_name, "my-org");
        assert_eq!(project.project_number, 12);

        let project = ProjectReference::parse("https://github.com/users/jdoe/projects/3/").unwrap();
        assert_eq!(project.project_number, 3);
    }

    #[test]
    fn test_parse_browser_query_and_fragment() {
        let project =
            ProjectReference::parse("https://github.com/orgs/acme/projects/7/views/1?layout=board")
                .unwrap();
        assert_eq!(project.owner_name, "acme");
        assert_eq!(project.project_number, 7);

        let project =
            ProjectReference::parse("https://github.com/orgs/acme/projects/7?query=is%3Aopen")
                .unwrap();
        assert_eq!(project.project_number, 7);

        let project = ProjectReference::parse("https://github.com/users/jdoe/projects/3#top").unwrap();
        assert_eq!(project.owner_type, OwnerType::User);
        assert_eq!(project.project_number, 3);
    }

    #[test]
    fn test_parse_wrong_host() {
        let err = ProjectReference::parse("https://gitlab.com/orgs/acme/projects/7").unwrap_err();
        match err {
            Error::InvalidConfiguration { input, .. } => {
                assert_eq!(input, "https://gitlab.com/orgs/acme/projects/7");
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for url in [
            "",
            "acme/projects/7",
            "https://github.com/orgs/acme/projects/",
            "https://github.com/orgs/acme/projects/seven",
            "https://github.com/orgs/acme/issues/7",
            "https://github.com/orgs/acme/projects/7/extra",
            "https://evil.example/github.com/orgs/acme/projects/7",
        ] {
            assert!(
                matches!(
                    ProjectReference::parse(url),
                    Err(Error::InvalidConfiguration { .. })
                ),
                "expected {url:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_unsupported_owner_type() {
        let err = ProjectReference::parse("https://github.com/teams/acme/projects/7").unwrap_err();
        assert!(matches!(err, Error::UnsupportedOwnerType(ref t) if t == "teams"));
    }

    #[test]
    fn test_parse_zero_and_overflowing_number() {
        assert!(matches!(
            ProjectReference::parse("https://github.com/orgs/acme/projects/0"),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            ProjectReference::parse("https://github.com/orgs/acme/projects/99999999999999999999999"),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_owner_type_segments() {
        assert_eq!(OwnerType::from_url_segment("orgs").unwrap(), OwnerType::Organization);
        assert_eq!(OwnerType::from_url_segment("users").unwrap(), OwnerType::User);
        assert!(OwnerType::from_url_segment("Orgs").is_err());
        assert_eq!(OwnerType::Organization.graphql_field(), "organization");
        assert_eq!(OwnerType::User.graphql_field(), "user");
    }

    #[test]
    fn test_from_str_and_display() {
        let project: ProjectReference = "github.com/orgs/acme/projects/7".parse().unwrap();
        assert_eq!(project.to_string(), "organization acme project #7");
    }
}
