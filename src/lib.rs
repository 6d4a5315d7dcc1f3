//! Fambudget is a web app for tracking a shared family budget.
//!
//! Users own projects (budgets); each project has members, categories, and
//! financial operations (incomes and charges) tagged to a member and a
//! category. The app serves HTML pages directly.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod authz;
mod category;
mod db;
mod demo;
mod endpoints;
mod forbidden;
mod html;
mod internal_server_error;
mod logging;
mod member;
mod modal;
mod navigation;
mod not_found;
mod operation;
mod pagination;
mod project;
mod routing;
#[cfg(test)]
mod test_utils;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use user::{User, UserId};

use crate::{
    alert::Alert,
    forbidden::get_403_forbidden_response,
    internal_server_error::render_internal_server_error,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid name or password combination.
    #[error("invalid name or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request, or its
    /// contents could not be parsed as a user ID.
    #[error("no valid auth cookie in the cookie jar")]
    CookieMissing,

    /// The requested entity does not exist, or it vanished between the
    /// initial read and the write. A target row that is truly gone is
    /// reported as not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The entity exists but the acting user lacks the required capability.
    /// Always kept distinct from [Error::NotFound].
    #[error("the acting user is not allowed to access this resource")]
    Forbidden,

    /// An empty string was submitted as a project name.
    #[error("Project name cannot be empty")]
    EmptyProjectName,

    /// An empty string was submitted as a category name on a create or edit
    /// form. The resolve-or-create endpoint treats blank names as "no
    /// category" instead of erroring.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was submitted as a member display name.
    #[error("Member name cannot be empty")]
    EmptyMemberName,

    /// A category rename collided with another category in the same project.
    #[error("Category name is already in use")]
    DuplicateCategoryName,

    /// An unexpected error occurred with the password hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::Forbidden => get_403_forbidden_response(),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error()
            }
        }
    }
}

impl Error {
    /// Render the error as an htmx alert fragment with an accurate status
    /// code, for endpoints whose responses are swapped into the page.
    fn into_alert_response(self) -> Response {
        match self {
            Error::NotFound => Alert::error(
                StatusCode::NOT_FOUND,
                "Not found",
                "The item could not be found. \
                Try refreshing the page to see if it has already been deleted.",
            )
            .into_response(),
            Error::Forbidden => Alert::error(
                StatusCode::FORBIDDEN,
                "Not allowed",
                "You do not have access to this item.",
            )
            .into_response(),
            Error::EmptyProjectName
            | Error::EmptyCategoryName
            | Error::EmptyMemberName
            | Error::DuplicateCategoryName => {
                let message = self.to_string();
                Alert::error(StatusCode::BAD_REQUEST, "Invalid form data", &message)
                    .into_response()
            }
            _ => Alert::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response(),
        }
    }
}
