use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AuthError;

/// Environment variable selecting a credential profile.
pub const PROFILE_VAR: &str = "NIMBUS_PROFILE";

const GLOBAL_PREFIX: &str = "NIMBUS";

#[allow(clippy::expect_used)] // literal pattern, cannot fail
static PROFILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9_]{1,16}$").expect("static regex should not panic"));

/// Which set of environment variables credentials are read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CredentialScope {
    Global,
    /// Upper-cased, validated profile name.
    Profile(String),
}

impl CredentialScope {
    /// Derive the scope from the raw `NIMBUS_PROFILE` value.
    ///
    /// The value is trimmed and upper-cased; an absent or blank value selects
    /// the global scope.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidProfile`] when the normalized name does not
    /// match `[A-Z0-9_]{1,16}`.
    pub fn from_profile(raw: Option<&str>) -> Result<Self, AuthError> {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Ok(Self::Global);
        }

        let name = trimmed.to_ascii_uppercase();
        if PROFILE_RE.is_match(&name) {
            Ok(Self::Profile(name))
        } else {
            Err(AuthError::InvalidProfile(trimmed.to_owned()))
        }
    }

    /// Variable names to look up for `suffix`, most specific first.
    #[must_use]
    pub fn candidate_keys(&self, suffix: &str) -> Vec<String> {
        match self {
            Self::Global => vec![format!("{GLOBAL_PREFIX}_{suffix}")],
            Self::Profile(name) => vec![
                format!("{GLOBAL_PREFIX}_PROFILE_{name}_{suffix}"),
                format!("{GLOBAL_PREFIX}_{suffix}"),
            ],
        }
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Profile(name) => write!(f, "profile:{name}"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn blank_profile_is_global() {
        assert_eq!(CredentialScope::from_profile(None).unwrap(), CredentialScope::Global);
        assert_eq!(
            CredentialScope::from_profile(Some("   ")).unwrap(),
            CredentialScope::Global
        );
    }

    #[test]
    fn profile_is_trimmed_and_upper_cased() {
        assert_eq!(
            CredentialScope::from_profile(Some("  dev_1 ")).unwrap(),
            CredentialScope::Profile("DEV_1".to_owned())
        );
    }

    #[test]
    fn invalid_profiles_are_rejected() {
        for raw in ["dev-eu", "has space", "A_VERY_LONG_PROFILE_NAME"] {
            assert!(
                matches!(
                    CredentialScope::from_profile(Some(raw)),
                    Err(AuthError::InvalidProfile(_))
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn candidates_are_profile_first() {
        let scope = CredentialScope::Profile("DEV".to_owned());
        assert_eq!(
            scope.candidate_keys("ACCESS_KEY"),
            vec!["NIMBUS_PROFILE_DEV_ACCESS_KEY", "NIMBUS_ACCESS_KEY"]
        );
        assert_eq!(
            CredentialScope::Global.candidate_keys("REGION"),
            vec!["NIMBUS_REGION"]
        );
    }

    #[test]
    fn display() {
        assert_eq!(CredentialScope::Global.to_string(), "global");
        assert_eq!(
            CredentialScope::Profile("OPS".to_owned()).to_string(),
            "profile:OPS"
        );
    }
}
