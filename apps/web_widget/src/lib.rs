// Only the settings parsing below builds outside wasm32.

use client_core::WidgetSettings;
use tracing::warn;

#[cfg(target_arch = "wasm32")]
mod dom_view;
#[cfg(target_arch = "wasm32")]
mod mount;

/// Optional JSON attribute on the chat form overriding [`WidgetSettings`] fields.
pub const SETTINGS_ATTRIBUTE: &str = "data-widget-settings";

pub fn widget_settings_from_attr(raw: Option<&str>) -> WidgetSettings {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return WidgetSettings::default();
    };

    match serde_json::from_str(raw) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "invalid {SETTINGS_ATTRIBUTE}; using defaults");
            WidgetSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::Locale;

    #[test]
    fn missing_attribute_uses_defaults() {
        assert_eq!(widget_settings_from_attr(None), WidgetSettings::default());
        assert_eq!(widget_settings_from_attr(Some("  ")), WidgetSettings::default());
    }

    #[test]
    fn attribute_overrides_selected_fields() {
        let settings =
            widget_settings_from_attr(Some(r#"{"locale":"en","lock_while_pending":true}"#));
        assert_eq!(settings.locale, Locale::En);
        assert!(settings.lock_while_pending);
        assert_eq!(settings.endpoint_path, "/query");
    }

    #[test]
    fn malformed_attribute_falls_back_to_defaults() {
        assert_eq!(
            widget_settings_from_attr(Some("{locale: en")),
            WidgetSettings::default()
        );
    }
}
