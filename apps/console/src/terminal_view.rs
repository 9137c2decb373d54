use std::{collections::HashSet, io::Write};

use client_core::{ChatView, EntryBody, TranscriptEntry};
use scraper::Html;
use shared::{domain::EntryId, error::WidgetError};

// Printed lines cannot be rewritten, so a replacement prints below its placeholder.
pub struct TerminalView<W: Write> {
    out: W,
    input: String,
    pending: HashSet<EntryId>,
    prompt: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, prompt: bool) -> Self {
        Self {
            out,
            input: String::new(),
            pending: HashSet::new(),
            prompt,
        }
    }

    pub fn set_input(&mut self, line: &str) {
        self.input = line.to_string();
    }

    pub fn pending_entries(&self) -> usize {
        self.pending.len()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_body(&mut self, body: &EntryBody) -> Result<(), WidgetError> {
        writeln!(self.out, "{}", render_plain(body))
            .map_err(|err| WidgetError::Render(err.to_string()))
    }
}

/// Server markup is reduced to its text content; labeled entries print as-is.
pub fn render_plain(body: &EntryBody) -> String {
    match body {
        EntryBody::Labeled { label, text } => format!("{label} {text}"),
        EntryBody::Trusted(markup) => {
            let fragment = Html::parse_fragment(markup);
            let text: String = fragment.root_element().text().collect();
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn has_transcript(&self) -> bool {
        true
    }

    fn input_value(&self) -> Option<String> {
        Some(self.input.clone())
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn focus_input(&mut self) {
        if self.prompt {
            let _ = write!(self.out, "> ");
            let _ = self.out.flush();
        }
    }

    fn append_entry(&mut self, entry: &TranscriptEntry) -> Result<(), WidgetError> {
        if let Some(id) = entry.temp_id {
            self.pending.insert(id);
        }
        self.write_body(&entry.body)
    }

    fn replace_entry(&mut self, id: EntryId, body: &EntryBody) -> Result<(), WidgetError> {
        if !self.pending.remove(&id) {
            return Err(WidgetError::Render(format!("no entry {}", id.dom_id())));
        }
        self.write_body(body)
    }

    fn scroll_to_bottom(&mut self) {
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::Locale;

    #[test]
    fn trusted_markup_prints_as_text() {
        let body = EntryBody::Trusted(
            "<strong>Bot:</strong> Hay\n  <em>3</em> clientes".to_string(),
        );
        assert_eq!(render_plain(&body), "Bot: Hay 3 clientes");
    }

    #[test]
    fn replacement_is_printed_after_placeholder() {
        let labels = Locale::Es.labels();
        let mut view = TerminalView::new(Vec::new(), false);
        view.append_entry(&TranscriptEntry::user(&labels, "hola"))
            .expect("append user");
        view.append_entry(&TranscriptEntry::thinking(&labels, EntryId(1)))
            .expect("append placeholder");
        assert_eq!(view.pending_entries(), 1);
        view.replace_entry(EntryId(1), &EntryBody::Trusted("<b>Bot:</b> listo".into()))
            .expect("replace");

        assert_eq!(view.pending_entries(), 0);
        let printed = String::from_utf8(view.into_inner()).expect("utf8");
        assert_eq!(printed, "Tú: hola\nBot: Pensando...\nBot: listo\n");
    }

    #[test]
    fn replacing_unknown_entry_fails() {
        let mut view = TerminalView::new(Vec::new(), false);
        let err = view
            .replace_entry(EntryId(9), &EntryBody::Trusted("x".into()))
            .expect_err("unknown entry");
        assert!(matches!(err, WidgetError::Render(_)));
    }

    #[test]
    fn settled_entry_is_forgotten() {
        let labels = Locale::En.labels();
        let mut view = TerminalView::new(Vec::new(), false);
        view.append_entry(&TranscriptEntry::user(&labels, "hi"))
            .expect("append user");
        assert_eq!(view.pending_entries(), 0);
        view.append_entry(&TranscriptEntry::thinking(&labels, EntryId(3)))
            .expect("append placeholder");
        view.replace_entry(EntryId(3), &EntryBody::labeled("Bot:", "done"))
            .expect("replace");

        let err = view
            .replace_entry(EntryId(3), &EntryBody::labeled("Bot:", "again"))
            .expect_err("already replaced");
        assert!(matches!(err, WidgetError::Render(_)));
        assert_eq!(view.pending_entries(), 0);
    }
}
