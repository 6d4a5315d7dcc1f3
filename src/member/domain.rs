//! Core project member domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, project::ProjectId, user::UserId};

/// A validated, non-empty member display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct MemberName(String);

impl MemberName {
    /// Create a member name.
    ///
    /// # Errors
    /// Returns an [Error::EmptyMemberName] if `name` is empty or whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyMemberName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a member name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for MemberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for MemberName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemberName::new(s)
    }
}

impl Display for MemberName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a project member.
pub type MemberId = i64;

/// A person in the household a project tracks.
///
/// Each member is backed by a user account but carries its own display name
/// within the project. The same user may appear under several names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The ID of the member.
    pub id: MemberId,
    /// The project the member belongs to.
    pub project_id: ProjectId,
    /// The user account behind the member.
    pub user_id: UserId,
    /// The member's display name within the project.
    pub name: String,
    /// When the member was added to the project.
    pub create_time: OffsetDateTime,
    /// When the member was last renamed.
    pub update_time: OffsetDateTime,
}

/// Form data for member creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberFormData {
    /// The submitted member name.
    pub name: String,
    /// The project the member belongs to.
    pub project_id: ProjectId,
}
