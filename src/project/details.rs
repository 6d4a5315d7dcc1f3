//! Project details page: the filtered, sorted, paged operation listing.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    authz::project_capabilities,
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
    operation::{
        FinType, OperationPage, OperationQuery, OperationTableRow, SortDirection, SortKey,
        list_operations,
    },
    pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators},
    project::{Project, ProjectId, get_project},
    user::UserId,
};

/// The state needed for the project details page.
#[derive(Debug, Clone)]
pub struct ProjectDetailsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination: PaginationConfig,
}

impl FromRef<AppState> for ProjectDetailsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination: PaginationConfig::default(),
        }
    }
}

/// The filter, sort, and page query parameters of the details page URL.
///
/// The filter form submits empty strings for unset fields, so those fields
/// tolerate `""` and read it as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationListParams {
    /// Category name substring to filter by.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub category: Option<String>,
    /// Fin type to filter by.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub fin_type: Option<FinType>,
    /// The column to sort by.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub sort: Option<SortKey>,
    /// The sort direction.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub dir: Option<SortDirection>,
    /// The 1-based page to show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<String>::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => serde_json::from_value(serde_json::Value::String(text.to_string()))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Render a project's operations with filtering, sorting, and paging.
pub async fn get_project_details_page(
    Path(project_id): Path<ProjectId>,
    State(state): State<ProjectDetailsPageState>,
    Extension(user_id): Extension<UserId>,
    Query(params): Query<OperationListParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let project = get_project(project_id, &connection)?;
    project_capabilities(project.owner, user_id).ensure_can_view()?;

    let query = OperationQuery {
        fin_type: params.fin_type,
        category: params.category.clone(),
        sort: params.sort,
        direction: params.dir.unwrap_or_default(),
        page: params.page.unwrap_or(state.pagination.default_page),
    };
    let page = list_operations(project_id, &query, state.pagination.page_size, &connection)
        .inspect_err(|error| tracing::error!("Failed to list operations: {error}"))?;

    let indicators =
        create_pagination_indicators(page.page, page.page_count(), state.pagination.max_pages);

    Ok(details_view(&project, &page, &params, &indicators).into_response())
}

/// The details page URL with `params` encoded into the query string.
fn listing_url(project_id: ProjectId, params: &OperationListParams) -> String {
    let path = endpoints::format_endpoint(endpoints::PROJECT_VIEW, project_id);

    match serde_urlencoded::to_string(params) {
        Ok(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path,
    }
}

/// A column header that toggles sorting on its key. Clicking an already
/// ascending column flips it to descending.
fn sort_header(
    project_id: ProjectId,
    params: &OperationListParams,
    key: SortKey,
    label: &str,
) -> Markup {
    let next_direction = match (params.sort, params.dir.unwrap_or_default()) {
        (Some(current), SortDirection::Ascending) if current == key => SortDirection::Descending,
        _ => SortDirection::Ascending,
    };
    let url = listing_url(
        project_id,
        &OperationListParams {
            sort: Some(key),
            dir: Some(next_direction),
            page: None,
            ..params.clone()
        },
    );
    let marker = match (params.sort, params.dir.unwrap_or_default()) {
        (Some(current), SortDirection::Ascending) if current == key => " ↑",
        (Some(current), SortDirection::Descending) if current == key => " ↓",
        _ => "",
    };

    html!(
        th scope="col" class=(TABLE_CELL_STYLE)
        {
            a href=(url) class=(LINK_STYLE) { (label) (marker) }
        }
    )
}

fn details_view(
    project: &Project,
    page: &OperationPage,
    params: &OperationListParams,
    indicators: &[PaginationIndicator],
) -> Markup {
    let details_endpoint = endpoints::format_endpoint(endpoints::PROJECT_VIEW, project.id);
    let nav_bar = NavBar::new(&details_endpoint).into_html();
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_PROJECT_VIEW, project.id);
    let add_charge_url = endpoints::format_endpoint(endpoints::MODAL_ADD_CHARGE, project.id);
    let add_income_url = endpoints::format_endpoint(endpoints::MODAL_ADD_INCOME, project.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { (project.name) }

                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit project" }

                        button
                            type="button"
                            hx-get=(add_income_url)
                            hx-target="#modal-container"
                            hx-target-error="#alert-container"
                            class=(LINK_STYLE)
                        {
                            "Add income"
                        }

                        button
                            type="button"
                            hx-get=(add_charge_url)
                            hx-target="#modal-container"
                            hx-target-error="#alert-container"
                            class=(LINK_STYLE)
                        {
                            "Add charge"
                        }
                    }
                }

                (filter_form(&details_endpoint, params))

                section class="dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                (sort_header(project.id, params, SortKey::FinType, "Type"))
                                (sort_header(project.id, params, SortKey::Value, "Value"))
                                (sort_header(project.id, params, SortKey::Category, "Category"))
                                (sort_header(project.id, params, SortKey::Member, "Member"))
                                (sort_header(project.id, params, SortKey::CreateTime, "Recorded"))
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in &page.rows {
                                (operation_row(row))
                            }

                            @if page.rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No operations on this page."
                                    }
                                }
                            }
                        }
                    }
                }

                (pagination_bar(project.id, params, indicators))
            }
        }
    );

    base(&project.name, &content)
}

fn filter_form(details_endpoint: &str, params: &OperationListParams) -> Markup {
    let category = params.category.as_deref().unwrap_or("");

    html!(
        form method="get" action=(details_endpoint) class="flex flex-wrap items-end gap-4"
        {
            // Re-submit the current sort along with the new filters.
            @if let Some(sort) = params.sort {
                input type="hidden" name="sort" value=(serde_variant_name(&sort));
            }
            @if let Some(dir) = params.dir {
                input type="hidden" name="dir" value=(serde_variant_name(&dir));
            }

            div
            {
                label for="category" class="block mb-1 text-sm" { "Category contains" }
                input
                    id="category"
                    type="text"
                    name="category"
                    value=(category)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="fin_type" class="block mb-1 text-sm" { "Type" }
                select id="fin_type" name="fin_type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[params.fin_type.is_none()] { "All" }
                    option
                        value="income"
                        selected[params.fin_type == Some(FinType::Income)]
                    {
                        "Income"
                    }
                    option
                        value="charge"
                        selected[params.fin_type == Some(FinType::Charge)]
                    {
                        "Charge"
                    }
                }
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }
        }
    )
}

/// The serde snake_case name of a unit enum variant, for hidden form inputs.
fn serde_variant_name<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|json| json.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn operation_row(row: &OperationTableRow) -> Markup {
    let edit_url =
        endpoints::format_endpoint(endpoints::EDIT_OPERATION_VIEW, row.operation.id);
    let delete_url = endpoints::format_endpoint(endpoints::OPERATION_API, row.operation.id);
    let category = row.category_name.as_deref().unwrap_or("—");
    let member = if row.operation.for_all {
        "All members"
    } else {
        row.member_name.as_deref().unwrap_or("—")
    };

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (row.operation.fin_type) }
            td class=(TABLE_CELL_STYLE) { (row.operation.value) }
            td class=(TABLE_CELL_STYLE) { (category) }
            td class=(TABLE_CELL_STYLE) { (member) }
            td class=(TABLE_CELL_STYLE) { (row.operation.create_time.date()) }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        "Are you sure you want to delete this operation?",
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    )
}

fn pagination_bar(
    project_id: ProjectId,
    params: &OperationListParams,
    indicators: &[PaginationIndicator],
) -> Markup {
    let page_url = |page: u64| {
        listing_url(
            project_id,
            &OperationListParams {
                page: Some(page),
                ..params.clone()
            },
        )
    };

    html!(
        nav class="flex justify-center gap-2" aria-label="pagination"
        {
            @for indicator in indicators {
                @match indicator {
                    PaginationIndicator::Page(page) => {
                        a href=(page_url(*page)) class=(LINK_STYLE) { (page) }
                    }
                    PaginationIndicator::CurrPage(page) => {
                        span class="font-bold" { (page) }
                    }
                    PaginationIndicator::Ellipsis => {
                        span { "…" }
                    }
                    PaginationIndicator::BackButton(page) => {
                        a href=(page_url(*page)) class=(LINK_STYLE) { "←" }
                    }
                    PaginationIndicator::NextButton(page) => {
                        a href=(page_url(*page)) class=(LINK_STYLE) { "→" }
                    }
                }
            }
        }
    )
}
