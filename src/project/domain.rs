//! Core project domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, user::UserId};

/// A validated, non-empty project name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Create a project name.
    ///
    /// # Errors
    /// Returns an [Error::EmptyProjectName] if `name` is empty or whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyProjectName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a project name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectName::new(s)
    }
}

impl Display for ProjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a project.
pub type ProjectId = i64;

/// A budget shared by a household, owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// The ID of the project.
    pub id: ProjectId,
    /// The display name of the project.
    pub name: String,
    /// The user who created the project and may change it.
    pub owner: UserId,
    /// When the project was created.
    pub create_time: OffsetDateTime,
    /// When the project or its contents last changed.
    pub update_time: OffsetDateTime,
}

/// Form data for project creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFormData {
    /// The submitted project name.
    pub name: String,
}
