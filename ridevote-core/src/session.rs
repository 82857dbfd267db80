//! Group membership, roles and the active session.
//!
//! Privilege is an explicit [`Role`] on each roster entry. A display name
//! alone grants nothing beyond [`Role::Member`].

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{UserName, UserRanking};

/// What a member may do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Role {
    /// Submit and view rankings.
    #[default]
    Member,
    /// Additionally reset rankings and edit display metadata.
    Admin,
}

impl Role {
    /// Lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by roster and session checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The name is not on the roster.
    #[error("{name} is not a member of this group")]
    UnknownMember {
        /// Requested name.
        name: String,
    },
    /// The roster lists a name twice.
    #[error("{name} appears more than once in the roster")]
    DuplicateMember {
        /// Repeated name.
        name: String,
    },
    /// The action needs [`Role::Admin`].
    #[error("{name} is not allowed to perform admin actions")]
    NotAdmin {
        /// Name of the active member.
        name: String,
    },
    /// The roster document could not be parsed.
    #[error("invalid roster: {message}")]
    InvalidRoster {
        /// Parser error description.
        message: String,
    },
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    /// Display name.
    pub name: UserName,
    /// Granted role.
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: Role,
}

impl Member {
    /// A member with [`Role::Member`].
    #[must_use]
    pub const fn new(name: UserName) -> Self {
        Self {
            name,
            role: Role::Member,
        }
    }

    /// A member with [`Role::Admin`].
    #[must_use]
    pub const fn admin(name: UserName) -> Self {
        Self {
            name,
            role: Role::Admin,
        }
    }
}

/// Who has voted and who is still expected to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Turnout {
    /// Members with a stored ranking, in roster order.
    pub voted: Vec<UserName>,
    /// Members without one, in roster order.
    pub pending: Vec<UserName>,
}

/// Ordered list of group members with unique names.
///
/// # Examples
/// ```
/// use ridevote_core::{Member, Role, Roster, UserName};
///
/// let roster = Roster::new(vec![
///     Member::admin(UserName::new("Izza")?),
///     Member::new(UserName::new("Leo")?),
/// ])?;
/// let session = roster.session_for("Izza")?;
/// assert_eq!(session.role(), Role::Admin);
/// assert!(roster.session_for("Nobody").is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    /// Validate and build a roster.
    ///
    /// # Errors
    /// Returns [`SessionError::DuplicateMember`] when a name repeats.
    pub fn new(members: Vec<Member>) -> Result<Self, SessionError> {
        let mut seen = HashSet::with_capacity(members.len());
        if let Some(member) = members.iter().find(|member| !seen.insert(&member.name)) {
            return Err(SessionError::DuplicateMember {
                name: member.name.to_string(),
            });
        }
        Ok(Self { members })
    }

    /// Parse a `{"members": [{"name": .., "role": ..}]}` document.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidRoster`] for malformed JSON and
    /// [`SessionError::DuplicateMember`] for repeated names.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let parsed: Self =
            serde_json::from_str(json).map_err(|err| SessionError::InvalidRoster {
                message: err.to_string(),
            })?;
        Self::new(parsed.members)
    }

    /// Members in roster order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Look up a member by display name.
    #[must_use]
    pub fn get(&self, name: &UserName) -> Option<&Member> {
        self.members.iter().find(|member| &member.name == name)
    }

    /// Open a session for `name`.
    ///
    /// # Errors
    /// Returns [`SessionError::UnknownMember`] when `name` is not listed.
    pub fn session_for(&self, name: &str) -> Result<Session, SessionError> {
        let unknown = || SessionError::UnknownMember {
            name: name.trim().to_owned(),
        };
        let user = UserName::new(name).map_err(|_| unknown())?;
        let member = self.get(&user).ok_or_else(unknown)?;
        Ok(Session::new(member.name.clone(), member.role))
    }

    /// Split the roster by whether each member has a ranking in `rankings`.
    #[must_use]
    pub fn turnout(&self, rankings: &[UserRanking]) -> Turnout {
        let voted: HashSet<&UserName> = rankings.iter().map(UserRanking::user_name).collect();
        let (done, waiting): (Vec<&Member>, Vec<&Member>) = self
            .members
            .iter()
            .partition(|member| voted.contains(&member.name));
        Turnout {
            voted: done.into_iter().map(|member| member.name.clone()).collect(),
            pending: waiting.into_iter().map(|member| member.name.clone()).collect(),
        }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Report whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The member currently using the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    name: UserName,
    role: Role,
}

impl Session {
    /// Start a session.
    #[must_use]
    pub const fn new(name: UserName, role: Role) -> Self {
        Self { name, role }
    }

    /// Active display name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Active role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Report whether the session holds [`Role::Admin`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Gate an admin-only action.
    ///
    /// # Errors
    /// Returns [`SessionError::NotAdmin`] for ordinary members.
    pub fn require_admin(&self) -> Result<(), SessionError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(SessionError::NotAdmin {
                name: self.name.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ranking;
    use rstest::{fixture, rstest};

    fn name(raw: &str) -> UserName {
        UserName::new(raw).expect("valid name")
    }

    #[fixture]
    fn roster() -> Roster {
        Roster::new(vec![
            Member::new(name("Camille")),
            Member::admin(name("Izza")),
            Member::new(name("Leo")),
        ])
        .expect("unique names")
    }

    #[rstest]
    fn rejects_duplicate_names() {
        let err = Roster::new(vec![Member::new(name("Leo")), Member::admin(name("Leo"))])
            .expect_err("duplicate");
        assert_eq!(
            err,
            SessionError::DuplicateMember {
                name: "Leo".to_owned()
            }
        );
    }

    #[rstest]
    #[case("Izza", true)]
    #[case(" Leo ", false)]
    fn sessions_carry_roster_role(roster: Roster, #[case] who: &str, #[case] admin: bool) {
        let session = roster.session_for(who).expect("listed member");
        assert_eq!(session.is_admin(), admin);
        assert_eq!(session.require_admin().is_ok(), admin);
    }

    #[rstest]
    #[case("Nobody")]
    #[case("   ")]
    fn unknown_names_are_rejected(roster: Roster, #[case] who: &str) {
        assert!(matches!(
            roster.session_for(who),
            Err(SessionError::UnknownMember { .. })
        ));
    }

    #[rstest]
    fn turnout_follows_roster_order(roster: Roster) {
        let rankings = [
            ranking("Leo", &["a"]),
            ranking("Camille", &["a"]),
            ranking("Stranger", &["a"]),
        ];
        let turnout = roster.turnout(&rankings);
        assert_eq!(turnout.voted, [name("Camille"), name("Leo")]);
        assert_eq!(turnout.pending, [name("Izza")]);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn parses_roster_json() {
        let roster = Roster::from_json(
            r#"{"members":[{"name":"Leo"},{"name":"Izza","role":"admin"}]}"#,
        )
        .expect("valid roster");
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(&name("Izza")).map(|m| m.role), Some(Role::Admin));
        assert_eq!(roster.get(&name("Leo")).map(|m| m.role), Some(Role::Member));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn malformed_roster_is_reported() {
        assert!(matches!(
            Roster::from_json("{"),
            Err(SessionError::InvalidRoster { .. })
        ));
    }
}
