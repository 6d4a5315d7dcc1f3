//! Alert fragments for reporting the outcome of htmx form submissions.
//!
//! Endpoints whose responses are swapped into the page render failures as an
//! [Alert] so the status code stays accurate while the user still sees a
//! styled message. Alerts are swapped into the `#alert-container` element via
//! `hx-target-error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};

/// The kind of message an [Alert] carries, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertType {
    Success,
    Error,
}

/// A dismissible message with an HTTP status code.
pub struct Alert {
    status_code: StatusCode,
    alert_type: AlertType,
    title: String,
    details: String,
}

impl Alert {
    /// Create a success alert, sent with a 200 status.
    pub fn success(title: &str, details: &str) -> Self {
        Self {
            status_code: StatusCode::OK,
            alert_type: AlertType::Success,
            title: title.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create an error alert with the given status code.
    pub fn error(status_code: StatusCode, title: &str, details: &str) -> Self {
        Self {
            status_code,
            alert_type: AlertType::Error,
            title: title.to_owned(),
            details: details.to_owned(),
        }
    }

    fn into_markup(self) -> Markup {
        let (container_style, icon_style) = match self.alert_type {
            AlertType::Success => (
                "flex items-start gap-3 p-4 mb-4 rounded-lg border \
                border-green-300 bg-green-50 text-green-800 \
                dark:border-green-800 dark:bg-gray-800 dark:text-green-400",
                "shrink-0 mt-0.5 font-bold",
            ),
            AlertType::Error => (
                "flex items-start gap-3 p-4 mb-4 rounded-lg border \
                border-red-300 bg-red-50 text-red-800 \
                dark:border-red-800 dark:bg-gray-800 dark:text-red-400",
                "shrink-0 mt-0.5 font-bold",
            ),
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div class=(container_style) role="alert"
            {
                span class=(icon_style) aria-hidden="true" { "!" }

                div class="flex-1 text-sm"
                {
                    p class="font-medium" { (self.title) }

                    @if !self.details.is_empty()
                    {
                        p { (self.details) }
                    }
                }

                button
                    type="button"
                    class="shrink-0 font-bold cursor-pointer"
                    aria-label="Dismiss"
                    onclick="this.closest('[role=alert]').remove();
                        document.getElementById('alert-container').classList.add('hidden');"
                {
                    "✕"
                }

                // The container starts hidden so empty swaps take no space.
                script
                {
                    (PreEscaped(
                        "document.getElementById('alert-container').classList.remove('hidden');"
                    ))
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        let status_code = self.status_code;
        (status_code, self.into_markup()).into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use axum::http::StatusCode;

    use scraper::Html;

    use super::Alert;

    #[test]
    fn error_alert_renders_title_and_details() {
        let alert = Alert::error(StatusCode::NOT_FOUND, "Not found", "The item is gone.");

        let html = Html::parse_fragment(&alert.into_markup().into_string());

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Not found"), "want alert title in {text:?}");
        assert!(
            text.contains("The item is gone."),
            "want alert details in {text:?}"
        );
    }

    #[test]
    fn success_alert_omits_empty_details() {
        let alert = Alert::success("Saved", "");

        let html = Html::parse_fragment(&alert.into_markup().into_string());

        let paragraphs = html
            .select(&scraper::Selector::parse("p").unwrap())
            .count();
        assert_eq!(paragraphs, 1, "want only the title paragraph");
    }
}
