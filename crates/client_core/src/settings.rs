use serde::{Deserialize, Serialize};
use shared::{
    domain::{Labels, Locale},
    protocol::{BOT_MESSAGE_CLASS, QUERY_PATH},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub endpoint_path: String,
    pub locale: Locale,
    pub marker_class: String,
    /// Ignore submissions and disable the submit control while an exchange is in flight.
    pub lock_while_pending: bool,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            endpoint_path: QUERY_PATH.into(),
            locale: Locale::default(),
            marker_class: BOT_MESSAGE_CLASS.into(),
            lock_while_pending: false,
        }
    }
}

impl WidgetSettings {
    pub fn labels(&self) -> Labels {
        self.locale.labels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: WidgetSettings =
            serde_json::from_str(r#"{"locale":"en"}"#).expect("settings");
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.endpoint_path, "/query");
        assert_eq!(settings.marker_class, "bot-message");
        assert!(!settings.lock_while_pending);
    }
}
