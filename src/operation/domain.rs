//! Core financial operation domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{category::CategoryId, member::MemberId, project::ProjectId};

/// Database identifier for a financial operation.
pub type OperationId = i64;

/// Whether an operation adds money to the budget or spends it.
///
/// Stored as an integer: income is 0, charge is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinType {
    /// Money coming in.
    Income,
    /// Money going out.
    Charge,
}

impl FinType {
    /// The integer the fin type is stored as.
    pub fn as_i64(self) -> i64 {
        match self {
            FinType::Income => 0,
            FinType::Charge => 1,
        }
    }

    /// Parse a stored integer back into a fin type.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(FinType::Income),
            1 => Some(FinType::Charge),
            _ => None,
        }
    }
}

impl Display for FinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinType::Income => write!(f, "Income"),
            FinType::Charge => write!(f, "Charge"),
        }
    }
}

/// A single income or charge within a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// The ID of the operation.
    pub id: OperationId,
    /// The project the operation belongs to.
    pub project_id: ProjectId,
    /// Income or charge.
    pub fin_type: FinType,
    /// Whether the operation applies to the whole household rather than one
    /// member.
    pub for_all: bool,
    /// The amount in whole currency units.
    pub value: i64,
    /// The category the operation is filed under, if any.
    pub category_id: Option<CategoryId>,
    /// The member the operation is tagged to. `None` when `for_all` or
    /// untagged.
    pub member_id: Option<MemberId>,
    /// When the operation was recorded.
    pub create_time: OffsetDateTime,
    /// When the operation was last edited.
    pub update_time: OffsetDateTime,
}

/// The fields needed to record a new operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDraft {
    /// The project the operation belongs to.
    pub project_id: ProjectId,
    /// Income or charge.
    pub fin_type: FinType,
    /// Whether the operation applies to the whole household.
    pub for_all: bool,
    /// The amount in whole currency units.
    pub value: i64,
    /// The category the operation is filed under, if any.
    pub category_id: Option<CategoryId>,
    /// The member the operation is tagged to, if any.
    pub member_id: Option<MemberId>,
}

/// Form data submitted from the add-charge/add-income modals and the edit
/// page.
///
/// The category arrives as free text and is resolved to a row (creating it
/// when new) by the endpoint. An unticked checkbox is absent from the form
/// body, hence the `Option<String>` for `for_all`.
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationFormData {
    /// The project the operation belongs to.
    pub project_id: ProjectId,
    /// Income or charge.
    pub fin_type: FinType,
    /// Present when the for-all checkbox was ticked.
    pub for_all: Option<String>,
    /// The amount in whole currency units.
    pub value: i64,
    /// The category name typed or picked in the form. Blank means no
    /// category.
    #[serde(default)]
    pub category_name: String,
    /// The member picked in the form. The select's "nobody" option submits
    /// an empty string, which reads as absent.
    #[serde(default, deserialize_with = "empty_member_as_none")]
    pub member_id: Option<MemberId>,
}

fn empty_member_as_none<'de, D>(deserializer: D) -> Result<Option<MemberId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<MemberId>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
