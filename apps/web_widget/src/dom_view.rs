use client_core::{ChatView, EntryBody, TranscriptEntry};
use shared::{
    domain::EntryId,
    error::WidgetError,
    protocol::{CHAT_HISTORY_ID, CHAT_INPUT_SELECTOR},
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement};

pub struct DomChatView {
    document: Document,
    history: Option<HtmlElement>,
    input: Option<HtmlInputElement>,
    submit_button: Option<HtmlButtonElement>,
}

impl DomChatView {
    pub fn locate(document: Document, form: Option<&HtmlFormElement>) -> Self {
        let history = document
            .get_element_by_id(CHAT_HISTORY_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let input = document
            .query_selector(CHAT_INPUT_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let submit_button = form
            .and_then(|form| {
                form.query_selector("button[type=submit], button:not([type])")
                    .ok()
                    .flatten()
            })
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());

        Self {
            document,
            history,
            input,
            submit_button,
        }
    }

    /// `Labeled` text goes in as a text node; only `Trusted` reaches `innerHTML`.
    fn render_body(&self, target: &Element, body: &EntryBody) -> Result<(), JsValue> {
        match body {
            EntryBody::Trusted(markup) => target.set_inner_html(markup),
            EntryBody::Labeled { label, text } => {
                target.set_text_content(None);
                let strong = self.document.create_element("strong")?;
                strong.set_text_content(Some(label));
                target.append_child(&strong)?;
                let text = self.document.create_text_node(&format!(" {text}"));
                target.append_child(&text)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn js_error(err: JsValue) -> WidgetError {
    WidgetError::Render(format!("{err:?}"))
}

impl ChatView for DomChatView {
    fn has_transcript(&self) -> bool {
        self.history.is_some()
    }

    fn input_value(&self) -> Option<String> {
        self.input.as_ref().map(HtmlInputElement::value)
    }

    fn clear_input(&mut self) {
        if let Some(input) = &self.input {
            input.set_value("");
        }
    }

    fn focus_input(&mut self) {
        if let Some(input) = &self.input {
            let _ = input.focus();
        }
    }

    fn append_entry(&mut self, entry: &TranscriptEntry) -> Result<(), WidgetError> {
        let history = self
            .history
            .as_ref()
            .ok_or_else(|| WidgetError::Render(format!("#{CHAT_HISTORY_ID} not found")))?;
        let node = self.document.create_element("div").map_err(js_error)?;
        node.set_class_name(&entry.role.css_classes());
        if let Some(id) = entry.temp_id {
            node.set_id(&id.dom_id());
        }
        self.render_body(&node, &entry.body).map_err(js_error)?;
        history.append_child(&node).map_err(js_error)?;
        Ok(())
    }

    fn replace_entry(&mut self, id: EntryId, body: &EntryBody) -> Result<(), WidgetError> {
        let dom_id = id.dom_id();
        let node = self
            .document
            .get_element_by_id(&dom_id)
            .ok_or_else(|| WidgetError::Render(format!("#{dom_id} not found")))?;
        self.render_body(&node, body).map_err(js_error)
    }

    fn scroll_to_bottom(&mut self) {
        if let Some(history) = &self.history {
            history.set_scroll_top(history.scroll_height());
        }
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        if let Some(button) = &self.submit_button {
            button.set_disabled(!enabled);
        }
    }
}
