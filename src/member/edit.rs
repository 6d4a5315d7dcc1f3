//! Member editing page and rename endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    authz::member_capabilities,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    member::{Member, MemberId, MemberName, get_member, rename_member},
    navigation::NavBar,
    project::get_project,
    user::UserId,
};

/// The state needed for the member edit page and rename endpoint.
#[derive(Debug, Clone)]
pub struct EditMemberState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditMemberState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for renaming a member.
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameMemberFormData {
    /// The new display name.
    pub name: String,
}

/// Render the member edit page.
pub async fn get_edit_member_page(
    Path(member_id): Path<MemberId>,
    State(state): State<EditMemberState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let member = get_member(member_id, &connection)?;
    let project = get_project(member.project_id, &connection)?;
    member_capabilities(project.owner, user_id).ensure_can_edit()?;

    Ok(edit_member_view(&member, "").into_response())
}

/// Handle the member rename form submission.
pub async fn update_member_endpoint(
    Path(member_id): Path<MemberId>,
    State(state): State<EditMemberState>,
    Extension(user_id): Extension<UserId>,
    Form(form_data): Form<RenameMemberFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let member = match get_member(member_id, &connection) {
        Ok(member) => member,
        Err(error) => return error.into_alert_response(),
    };
    let project = match get_project(member.project_id, &connection) {
        Ok(project) => project,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = member_capabilities(project.owner, user_id).ensure_can_edit() {
        return error.into_alert_response();
    }

    let name = match MemberName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return edit_member_view(&member, &format!("Error: {error}")).into_response();
        }
    };

    match rename_member(member_id, name, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::EDIT_PROJECT_VIEW,
                member.project_id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while renaming member {member_id}: {error}"
            );

            error.into_alert_response()
        }
    }
}

fn edit_member_view(member: &Member, error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROJECTS_VIEW).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::MEMBER_API, member.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Member Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        value=(member.name)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                @if !error_message.is_empty() {
                    p class="text-red-600 dark:text-red-400" { (error_message) }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Rename Member" }
            }
        }
    };

    base("Edit Member", &content)
}
