use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::WidgetError;

pub const QUERY_PATH: &str = "/query";
pub const USER_INPUT_FIELD: &str = "user_input";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const BOT_MESSAGE_CLASS: &str = "bot-message";

pub const CHAT_FORM_SELECTOR: &str = ".chat-form";
pub const CHAT_INPUT_SELECTOR: &str = ".chat-form input";
pub const CHAT_HISTORY_ID: &str = "chatHistory";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryForm {
    pub user_input: String,
}

impl QueryForm {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
        }
    }

    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(USER_INPUT_FIELD, &self.user_input)
            .finish()
    }
}

/// Returns the inner markup of the first element carrying `marker_class`.
pub fn extract_marked_markup(document: &str, marker_class: &str) -> Result<String, WidgetError> {
    let marker_class = marker_class.trim();
    if marker_class.is_empty() || marker_class.contains(char::is_whitespace) {
        return Err(WidgetError::MalformedResponse(format!(
            "unusable marker class '{marker_class}'"
        )));
    }

    let selector = Selector::parse(&format!(".{marker_class}")).map_err(|err| {
        WidgetError::MalformedResponse(format!("marker selector '.{marker_class}': {err:?}"))
    })?;

    let parsed = Html::parse_document(document);
    parsed
        .select(&selector)
        .next()
        .map(|element| element.inner_html())
        .ok_or_else(|| {
            WidgetError::MalformedResponse(format!("no element with class '{marker_class}'"))
        })
}
