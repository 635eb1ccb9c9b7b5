//! Alert messages for HTMX error targets.
//!
//! Endpoints that are called from HTMX forms render an [Alert] into the
//! page's `#alert-container` instead of returning a full error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// An error alert message with a headline and details.
pub struct Alert<'a> {
    message: &'a str,
    details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self { message, details }
    }

    /// Render the alert as markup for swapping into the alert container.
    pub fn into_html(self) -> Markup {
        html!(
            div
                class="flex items-start p-4 mb-4 rounded-lg shadow text-red-800
                    bg-red-50 dark:bg-gray-800 dark:text-red-400"
                role="alert"
            {
                div class="text-sm font-medium"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p { (self.details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8 hover:bg-gray-200 dark:hover:bg-gray-700"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "✕"
                }
            }
        )
    }

    /// Render the alert into a response with the given status code.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn renders_message_and_details() {
        let markup = Alert::error("Something broke", "Try again later").into_html();

        let html = Html::parse_fragment(&markup.into_string());
        let selector = Selector::parse("[role=alert]").unwrap();
        let alert = html.select(&selector).next().expect("no alert rendered");
        let text = alert.text().collect::<String>();

        assert!(text.contains("Something broke"));
        assert!(text.contains("Try again later"));
    }

    #[test]
    fn omits_empty_details() {
        let markup = Alert::error("Could not save", "").into_html();

        let html = Html::parse_fragment(&markup.into_string());
        let selector = Selector::parse("p").unwrap();
        let paragraphs = html.select(&selector).count();

        assert_eq!(paragraphs, 1);
    }
}
