//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, project::ProjectId};

/// A validated, non-empty category name.
///
/// Category names are stored in lowercase so that lookups and the uniqueness
/// constraint are insensitive to how the user typed the name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, trimming whitespace and lowercasing.
    ///
    /// # Errors
    /// Returns an [Error::EmptyCategoryName] if `name` is empty or whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_lowercase()))
        }
    }

    /// Create a category name without validation or lowercasing.
    ///
    /// The caller should ensure that the string is not empty and already
    /// lowercase.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A spending or income category within a project (e.g., 'продукты').
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The project the category belongs to.
    pub project_id: ProjectId,
    /// The lowercase category name, unique within the project.
    pub name: String,
    /// When the category was created.
    pub create_time: OffsetDateTime,
    /// When the category was last renamed.
    pub update_time: OffsetDateTime,
}

/// A category joined with the name of its project, for the categories page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWithProject {
    /// The category itself.
    pub category: Category,
    /// The display name of the owning project.
    pub project_name: String,
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    /// The submitted category name.
    pub name: String,
    /// The project the category belongs to.
    pub project_id: ProjectId,
}
