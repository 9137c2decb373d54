use std::{fs, path::Path};

use anyhow::Context;
use client_core::WidgetSettings;
use serde::Deserialize;
use shared::domain::Locale;

pub const DEFAULT_CONFIG_FILE: &str = "widget.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleSettings {
    pub server_url: String,
    pub widget: WidgetSettings,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            widget: WidgetSettings::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    widget: Option<WidgetSettings>,
}

/// Defaults, then the TOML file, then environment overrides.
///
/// An explicit `path` must exist; the default `widget.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<ConsoleSettings> {
    let mut settings = ConsoleSettings::default();

    let raw = match path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    if let Some(raw) = raw {
        apply_file(&mut settings, &raw)?;
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut ConsoleSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("invalid widget config")?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.widget {
        settings.widget = v;
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut ConsoleSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("CHAT_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__ENDPOINT_PATH") {
        settings.widget.endpoint_path = v;
    }

    if let Some(v) = lookup("APP__LOCALE") {
        match Locale::parse(&v) {
            Some(locale) => settings.widget.locale = locale,
            None => tracing::warn!(locale = %v, "ignoring unknown APP__LOCALE"),
        }
    }

    if let Some(v) = lookup("APP__LOCK_WHILE_PENDING") {
        if let Ok(parsed) = v.trim().parse::<bool>() {
            settings.widget.lock_while_pending = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn file_overrides_defaults() {
        let mut settings = ConsoleSettings::default();
        apply_file(
            &mut settings,
            r#"
server_url = "http://chat.internal:9000"

[widget]
locale = "en"
lock_while_pending = true
"#,
        )
        .expect("apply file");

        assert_eq!(settings.server_url, "http://chat.internal:9000");
        assert_eq!(settings.widget.locale, Locale::En);
        assert!(settings.widget.lock_while_pending);
        assert_eq!(settings.widget.endpoint_path, "/query");
    }

    #[test]
    fn app_prefixed_env_wins() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CHAT_SERVER_URL", "http://legacy:1"),
            ("APP__SERVER_URL", "http://current:2"),
            ("APP__LOCALE", "en"),
            ("APP__LOCK_WHILE_PENDING", "true"),
        ]);
        let mut settings = ConsoleSettings::default();
        apply_env_overrides(&mut settings, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.server_url, "http://current:2");
        assert_eq!(settings.widget.locale, Locale::En);
        assert!(settings.widget.lock_while_pending);
    }

    #[test]
    fn unknown_locale_keeps_default() {
        let mut settings = ConsoleSettings::default();
        apply_env_overrides(&mut settings, |key| {
            (key == "APP__LOCALE").then(|| "klingon".to_string())
        });
        assert_eq!(settings.widget.locale, Locale::Es);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let missing = env::temp_dir().join(format!("chat_widget_missing_{suffix}.toml"));

        assert!(load_settings(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("chat_widget_config_{suffix}.toml"));
        fs::write(&path, "[widget]\nendpoint_path = \"/api/query\"\n").expect("write config");

        let settings = load_settings(Some(&path)).expect("load");
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.widget.endpoint_path, "/api/query");
    }
}
