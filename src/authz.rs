//! Capability checks for the acting user.
//!
//! Every entity in the app hangs off a project, and only the project's owner
//! may see or change it. Handlers resolve the owning project, compute the
//! acting user's [Capabilities] for the entity kind, and refuse the request
//! with [Error::Forbidden] when the needed capability is missing. A missing
//! entity is always reported as [Error::NotFound] before any capability
//! check, so the two outcomes stay distinct.

use crate::{Error, user::UserId};

/// What the acting user may do with a specific entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The user may see the entity and its details.
    pub can_view: bool,
    /// The user may change the entity.
    pub can_edit: bool,
    /// The user may delete the entity.
    pub can_delete: bool,
}

impl Capabilities {
    const NONE: Capabilities = Capabilities {
        can_view: false,
        can_edit: false,
        can_delete: false,
    };

    const ALL: Capabilities = Capabilities {
        can_view: true,
        can_edit: true,
        can_delete: true,
    };
}

fn owner_only(owner: UserId, acting_user: UserId) -> Capabilities {
    if owner == acting_user {
        Capabilities::ALL
    } else {
        Capabilities::NONE
    }
}

/// The acting user's capabilities for a project owned by `owner`.
pub fn project_capabilities(owner: UserId, acting_user: UserId) -> Capabilities {
    owner_only(owner, acting_user)
}

/// The acting user's capabilities for a category whose project is owned by
/// `owner`.
pub fn category_capabilities(owner: UserId, acting_user: UserId) -> Capabilities {
    owner_only(owner, acting_user)
}

/// The acting user's capabilities for a member whose project is owned by
/// `owner`.
pub fn member_capabilities(owner: UserId, acting_user: UserId) -> Capabilities {
    owner_only(owner, acting_user)
}

/// The acting user's capabilities for an operation whose project is owned by
/// `owner`.
pub fn operation_capabilities(owner: UserId, acting_user: UserId) -> Capabilities {
    owner_only(owner, acting_user)
}

impl Capabilities {
    /// Refuse with [Error::Forbidden] unless the user may view the entity.
    pub fn ensure_can_view(&self) -> Result<(), Error> {
        if self.can_view { Ok(()) } else { Err(Error::Forbidden) }
    }

    /// Refuse with [Error::Forbidden] unless the user may edit the entity.
    pub fn ensure_can_edit(&self) -> Result<(), Error> {
        if self.can_edit { Ok(()) } else { Err(Error::Forbidden) }
    }

    /// Refuse with [Error::Forbidden] unless the user may delete the entity.
    pub fn ensure_can_delete(&self) -> Result<(), Error> {
        if self.can_delete { Ok(()) } else { Err(Error::Forbidden) }
    }
}
