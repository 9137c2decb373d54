use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(EntryId);

const TEMP_ENTRY_PREFIX: &str = "temp-";

impl EntryId {
    pub fn dom_id(self) -> String {
        format!("{TEMP_ENTRY_PREFIX}{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }

    pub fn css_classes(self) -> String {
        format!("message {}-message", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Es,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub user: &'static str,
    pub bot: &'static str,
    pub thinking: &'static str,
    pub error: &'static str,
}

impl Locale {
    pub fn labels(self) -> Labels {
        match self {
            Locale::Es => Labels {
                user: "Tú:",
                bot: "Bot:",
                thinking: "Pensando...",
                error: "Error al procesar tu solicitud",
            },
            Locale::En => Labels {
                user: "You:",
                bot: "Bot:",
                thinking: "Thinking...",
                error: "Error processing your request",
            },
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "es" | "es-es" | "spanish" => Some(Locale::Es),
            "en" | "en-us" | "en-gb" | "english" => Some(Locale::En),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dom_id_is_prefixed() {
        assert_eq!(EntryId(42).dom_id(), "temp-42");
    }

    #[test]
    fn role_classes_follow_page_stylesheet() {
        assert_eq!(Role::User.css_classes(), "message user-message");
        assert_eq!(Role::Bot.css_classes(), "message bot-message");
    }

    #[test]
    fn spanish_is_default_locale() {
        let labels = Locale::default().labels();
        assert_eq!(labels.user, "Tú:");
        assert_eq!(labels.thinking, "Pensando...");
    }

    #[test]
    fn locale_deserializes_from_snake_case() {
        let locale: Locale = serde_json::from_str("\"en\"").expect("locale");
        assert_eq!(locale, Locale::En);
        assert_eq!(Locale::parse(" EN-us "), Some(Locale::En));
        assert_eq!(Locale::parse("fr"), None);
    }
}
