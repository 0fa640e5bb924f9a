//! Authentication and authorisation primitives.
//!
//! Login payloads are validated into [`LoginCredentials`] before a handler
//! talks to the login port. The visitor's access level is modelled by
//! [`AccessContext`], derived from the session user id and its profile row.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::{Error, UserId};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim; it is zeroed on drop.
///
/// # Examples
/// ```
/// use roster::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Stored profile for an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Identity issued by the login collaborator.
    pub user_id: UserId,
    /// Contact address shown in the session banner.
    pub email: Option<String>,
    /// Whether the user may import rosters.
    pub is_admin: bool,
}

/// Coarse access level of the current visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// No session.
    Anonymous,
    /// Logged in without the admin flag.
    Member,
    /// Logged in with the admin flag.
    Admin,
}

/// Resolved access for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessContext {
    /// Public visitor.
    Anonymous,
    /// Authenticated non-admin.
    Member {
        /// Session user.
        user_id: UserId,
        /// Profile email, when a profile exists.
        email: Option<String>,
    },
    /// Authenticated administrator.
    Admin {
        /// Session user.
        user_id: UserId,
        /// Profile email, when recorded.
        email: Option<String>,
    },
}

impl AccessContext {
    /// Derive access from a session user and its (possibly missing) profile.
    ///
    /// A user without a profile row is a member: the admin flag defaults to
    /// off.
    pub fn from_profile(user_id: UserId, profile: Option<Profile>) -> Self {
        match profile {
            Some(profile) if profile.is_admin => Self::Admin {
                user_id,
                email: profile.email,
            },
            Some(profile) => Self::Member {
                user_id,
                email: profile.email,
            },
            None => Self::Member {
                user_id,
                email: None,
            },
        }
    }

    /// Coarse access level.
    pub fn level(&self) -> AccessLevel {
        match self {
            Self::Anonymous => AccessLevel::Anonymous,
            Self::Member { .. } => AccessLevel::Member,
            Self::Admin { .. } => AccessLevel::Admin,
        }
    }

    /// Session user, when logged in.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::Member { user_id, .. } | Self::Admin { user_id, .. } => Some(user_id),
        }
    }

    /// Profile email, when known.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Member { email, .. } | Self::Admin { email, .. } => email.as_deref(),
        }
    }

    /// Whether the import feature is available.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin { .. })
    }

    /// Gate for import operations.
    ///
    /// Anonymous visitors get `unauthorized`; members get `forbidden`.
    pub fn require_admin(&self) -> Result<(), Error> {
        match self {
            Self::Admin { .. } => Ok(()),
            Self::Member { .. } => Err(Error::forbidden("only administrators can import rosters")),
            Self::Anonymous => Err(Error::unauthorized("login required")),
        }
    }

    /// Banner text describing the session.
    pub fn status_message(&self) -> String {
        let who = self.email().unwrap_or("unknown user");
        match self {
            Self::Anonymous => {
                "Public mode. Login is only required for importing rosters.".to_owned()
            }
            Self::Member { .. } => format!("Logged in as {who}. You are not an admin."),
            Self::Admin { .. } => format!("Logged in as {who}. Admin access granted."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("ana", " secret ").expect("valid");
        assert_eq!(creds.password(), " secret ");
    }

    fn profile(is_admin: bool) -> Profile {
        Profile {
            user_id: UserId::random(),
            email: Some("ana@example.org".to_owned()),
            is_admin,
        }
    }

    #[rstest]
    #[case(Some(profile(true)), AccessLevel::Admin)]
    #[case(Some(profile(false)), AccessLevel::Member)]
    #[case(None, AccessLevel::Member)]
    fn profile_drives_access_level(#[case] profile: Option<Profile>, #[case] expected: AccessLevel) {
        let access = AccessContext::from_profile(UserId::random(), profile);
        assert_eq!(access.level(), expected);
    }

    #[rstest]
    #[case(AccessContext::Anonymous, Some(ErrorCode::Unauthorized))]
    #[case(AccessContext::from_profile(UserId::random(), None), Some(ErrorCode::Forbidden))]
    #[case(AccessContext::from_profile(UserId::random(), Some(profile(true))), None)]
    fn require_admin_gates_by_level(
        #[case] access: AccessContext,
        #[case] expected: Option<ErrorCode>,
    ) {
        let result = access.require_admin();
        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    fn status_message_mentions_email() {
        let access = AccessContext::from_profile(UserId::random(), Some(profile(true)));
        assert_eq!(
            access.status_message(),
            "Logged in as ana@example.org. Admin access granted."
        );
    }
}
