//! The page to display when the acting user lacks access to an item.
//!
//! Kept separate from the not-found page so the client can tell "this does
//! not exist" apart from "this exists but is not yours".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// Render the 403 page with the matching status code.
pub fn get_403_forbidden_response() -> Response {
    (
        StatusCode::FORBIDDEN,
        error_view(
            "Forbidden",
            "403",
            "You do not have access to this item.",
            "Only the owner of a project can change it or its contents.",
        ),
    )
        .into_response()
}

#[cfg(test)]
mod forbidden_tests {
    use axum::http::StatusCode;

    use crate::test_utils::assert_valid_html;

    use super::get_403_forbidden_response;

    #[tokio::test]
    async fn returns_forbidden_status_and_html() {
        let response = get_403_forbidden_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_valid_html(&scraper::Html::parse_document(&text));
        assert!(text.contains("403"));
    }
}
