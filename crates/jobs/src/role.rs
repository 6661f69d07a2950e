use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Access level of a caller, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// An unauthenticated caller. Holds no capabilities.
    Anonymous,
    Viewer,
    Operator,
    Admin,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Viewer => "viewer",
            Self::Operator => "operator",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anonymous" => Ok(Self::Anonymous),
            "viewer" => Ok(Self::Viewer),
            "operator" => Ok(Self::Operator),
            "admin" => Ok(Self::Admin),
            _ => Err(AuthError::UnknownRole(s.to_owned())),
        }
    }
}

/// What a service operation does with job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Query jobs and their results.
    Read,
    /// Submit new jobs.
    Write,
}

impl Capability {
    /// Least privileged role allowed to exercise this capability.
    #[must_use]
    pub fn minimum_role(self) -> Role {
        match self {
            Self::Read => Role::Viewer,
            Self::Write => Role::Operator,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

/// The identity an operation runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub role: Role,
}

impl Caller {
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// A caller that has not identified itself.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(Role::Anonymous)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("role {role} may not {capability} jobs")]
    Forbidden { role: Role, capability: Capability },

    #[error("unknown role `{0}`")]
    UnknownRole(String),
}

/// Checks that `caller` may exercise `capability`.
///
/// # Errors
///
/// Returns [`AuthError::Forbidden`] if the caller's role is below
/// [`Capability::minimum_role`].
pub fn authorize(caller: &Caller, capability: Capability) -> Result<(), AuthError> {
    if caller.role >= capability.minimum_role() {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            role: caller.role,
            capability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_ordered_by_privilege() {
        assert!(Role::Anonymous < Role::Viewer);
        assert!(Role::Viewer < Role::Operator);
        assert!(Role::Operator < Role::Admin);
    }

    #[test]
    fn writes_need_operator_or_above() {
        let viewer = Caller::new(Role::Viewer);
        assert!(authorize(&viewer, Capability::Read).is_ok());
        assert_eq!(
            authorize(&viewer, Capability::Write),
            Err(AuthError::Forbidden {
                role: Role::Viewer,
                capability: Capability::Write,
            })
        );

        for role in [Role::Operator, Role::Admin] {
            let caller = Caller::new(role);
            assert!(authorize(&caller, Capability::Read).is_ok());
            assert!(authorize(&caller, Capability::Write).is_ok());
        }
    }

    #[test]
    fn anonymous_callers_hold_no_capability() {
        let anonymous = Caller::anonymous();
        for capability in [Capability::Read, Capability::Write] {
            assert_eq!(
                authorize(&anonymous, capability),
                Err(AuthError::Forbidden {
                    role: Role::Anonymous,
                    capability,
                })
            );
        }
    }

    #[test]
    fn parses_role_names() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("operator".parse::<Role>(), Ok(Role::Operator));
        assert_eq!("anonymous".parse::<Role>(), Ok(Role::Anonymous));
        assert_eq!(
            "root".parse::<Role>(),
            Err(AuthError::UnknownRole("root".into()))
        );
        assert_eq!(serde_json::to_string(&Role::Viewer).unwrap(), r#""viewer""#);
    }
}
