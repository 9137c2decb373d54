use std::cell::{Cell, Ref, RefCell, RefMut};

use async_trait::async_trait;
use shared::{
    domain::{EntryId, Labels},
    error::{ErrorCode, WidgetError},
    protocol::extract_marked_markup,
};
use tracing::{debug, error, info, warn};

pub mod settings;
pub mod transcript;
pub mod transport;

pub use settings::WidgetSettings;
pub use transcript::{error_body, EntryBody, TranscriptEntry};
pub use transport::{resolve_endpoint, HttpQueryTransport};

/// Every page element is optional; a view skips whatever it lacks.
pub trait ChatView {
    fn has_transcript(&self) -> bool;
    fn input_value(&self) -> Option<String>;
    fn clear_input(&mut self);
    fn focus_input(&mut self);
    fn append_entry(&mut self, entry: &TranscriptEntry) -> Result<(), WidgetError>;
    fn replace_entry(&mut self, id: EntryId, body: &EntryBody) -> Result<(), WidgetError>;
    fn scroll_to_bottom(&mut self);
    fn set_submit_enabled(&mut self, _enabled: bool) {}
}

#[async_trait(?Send)]
pub trait QueryTransport {
    async fn post_query(&self, user_input: &str) -> Result<String, WidgetError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    NoTranscript,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    Rendered(EntryId),
    Failed(EntryId, ErrorCode),
}

pub struct ChatWidgetController<V: ChatView, T: QueryTransport> {
    view: RefCell<V>,
    transport: T,
    settings: WidgetSettings,
    labels: Labels,
    next_entry: Cell<u64>,
    pending: Cell<usize>,
}

impl<V: ChatView, T: QueryTransport> ChatWidgetController<V, T> {
    pub fn new(view: V, transport: T, settings: WidgetSettings) -> Self {
        let labels = settings.labels();
        Self {
            view: RefCell::new(view),
            transport,
            settings,
            labels,
            next_entry: Cell::new(1),
            pending: Cell::new(0),
        }
    }

    pub fn init(&self) {
        let mut view = self.view.borrow_mut();
        let has_transcript = view.has_transcript();
        let has_input = view.input_value().is_some();
        if has_transcript {
            view.scroll_to_bottom();
        }
        if has_input {
            view.focus_input();
        }
        info!(
            has_transcript,
            has_input,
            locale = ?self.settings.locale,
            "chat widget initialized"
        );
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let text = {
            let view = self.view.borrow();
            let raw = view.input_value().unwrap_or_default();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
            }
            if !view.has_transcript() {
                warn!("chat transcript container missing; submission ignored");
                return SubmitOutcome::Ignored(IgnoreReason::NoTranscript);
            }
            trimmed.to_string()
        };

        if self.settings.lock_while_pending && self.pending.get() > 0 {
            debug!(
                pending = self.pending.get(),
                "submission ignored while exchange in flight"
            );
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        }

        let entry_id = self.allocate_entry_id();
        let mut finalizer = ExchangeFinalizer::begin(self, entry_id);

        self.append(&TranscriptEntry::user(&self.labels, text.as_str()));
        self.append(&TranscriptEntry::thinking(&self.labels, entry_id));

        let outcome = match self.exchange(&text).await {
            Ok(markup) => {
                self.replace(entry_id, &EntryBody::Trusted(markup));
                debug!(entry = entry_id.0, "bot reply rendered");
                SubmitOutcome::Rendered(entry_id)
            }
            Err(err) => {
                error!(
                    entry = entry_id.0,
                    code = ?err.code(),
                    error = %err,
                    "chat exchange failed"
                );
                self.replace(entry_id, &error_body(&self.labels));
                SubmitOutcome::Failed(entry_id, err.code())
            }
        };
        finalizer.settled = true;
        outcome
    }

    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    pub fn view(&self) -> Ref<'_, V> {
        self.view.borrow()
    }

    /// Must not be held across [`ChatWidgetController::submit`].
    pub fn view_mut(&self) -> RefMut<'_, V> {
        self.view.borrow_mut()
    }

    async fn exchange(&self, text: &str) -> Result<String, WidgetError> {
        let body = self.transport.post_query(text).await?;
        extract_marked_markup(&body, &self.settings.marker_class)
    }

    fn allocate_entry_id(&self) -> EntryId {
        let id = self.next_entry.get();
        self.next_entry.set(id + 1);
        EntryId(id)
    }

    fn append(&self, entry: &TranscriptEntry) {
        let mut view = self.view.borrow_mut();
        if let Err(err) = view.append_entry(entry) {
            warn!(role = entry.role.as_str(), error = %err, "failed to append transcript entry");
        }
        view.scroll_to_bottom();
    }

    fn replace(&self, id: EntryId, body: &EntryBody) {
        if let Err(err) = self.view.borrow_mut().replace_entry(id, body) {
            warn!(entry = id.0, error = %err, "failed to replace temporary entry");
        }
    }
}

// Runs on every exit path of `submit`. A dropped submit future still gets its placeholder
// replaced with the error text.
struct ExchangeFinalizer<'a, V: ChatView, T: QueryTransport> {
    controller: &'a ChatWidgetController<V, T>,
    entry_id: EntryId,
    settled: bool,
}

impl<'a, V: ChatView, T: QueryTransport> ExchangeFinalizer<'a, V, T> {
    fn begin(controller: &'a ChatWidgetController<V, T>, entry_id: EntryId) -> Self {
        controller.pending.set(controller.pending.get() + 1);
        if controller.settings.lock_while_pending {
            controller.view.borrow_mut().set_submit_enabled(false);
        }
        Self {
            controller,
            entry_id,
            settled: false,
        }
    }
}

impl<V: ChatView, T: QueryTransport> Drop for ExchangeFinalizer<'_, V, T> {
    fn drop(&mut self) {
        let controller = self.controller;
        let remaining = controller.pending.get().saturating_sub(1);
        controller.pending.set(remaining);

        let Ok(mut view) = controller.view.try_borrow_mut() else {
            warn!(entry = self.entry_id.0, "transcript borrowed during exchange cleanup");
            return;
        };

        if !self.settled {
            warn!(entry = self.entry_id.0, "exchange abandoned before a response arrived");
            if let Err(err) = view.replace_entry(self.entry_id, &error_body(&controller.labels)) {
                warn!(entry = self.entry_id.0, error = %err, "failed to replace temporary entry");
            }
        }

        view.clear_input();
        view.focus_input();
        view.scroll_to_bottom();
        if controller.settings.lock_while_pending && remaining == 0 {
            view.set_submit_enabled(true);
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
