//! Per-content translation controller.
//!
//! One controller exists per displayed piece of text. It starts out showing
//! the original, decides whether a translation is warranted, issues at most
//! one request per input, and publishes every state change on a
//! [`tokio::sync::watch`] channel. Failures never surface: the state simply
//! settles back on the original text.
//!
//! Every evaluation bumps a generation counter. A request only publishes its
//! result if its generation is still current, and superseded tasks are
//! aborted, so a late answer for old input can never overwrite the state of
//! newer input.

use crate::client::{TranslateBackend, TranslationRequest};
use crate::content::AuthoredContent;
use crate::language::LanguageCode;
use crate::policy::needs_translation;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Render-ready view of one piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub original: String,
    pub translated: String,
    /// `true` only after a real round trip produced text different from `original`
    pub is_translated: bool,
    pub is_loading: bool,
}

impl ControllerState {
    fn idle(text: &str) -> Self {
        Self {
            original: text.to_string(),
            translated: text.to_string(),
            is_translated: false,
            is_loading: false,
        }
    }

    fn loading(text: &str) -> Self {
        Self {
            is_loading: true,
            ..Self::idle(text)
        }
    }

    fn resolved(original: String, translated: String) -> Self {
        Self {
            is_translated: translated != original,
            original,
            translated,
            is_loading: false,
        }
    }
}

pub struct TranslationController {
    backend: Arc<dyn TranslateBackend>,
    target: Option<LanguageCode>,
    content_lang: String,
    text: String,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<ControllerState>>,
    in_flight: Option<JoinHandle<()>>,
}

impl TranslationController {
    /// Create a controller and evaluate it immediately.
    ///
    /// `target` is `None` while the reader's language is still unknown. When a
    /// request is warranted it is spawned on the current Tokio runtime.
    ///
    /// # Panics
    /// Panics if a translation is warranted and no Tokio runtime is running.
    /// The same holds for [`for_content`](Self::for_content) and every setter
    /// that triggers a new request.
    pub fn new(
        backend: Arc<dyn TranslateBackend>,
        target: Option<LanguageCode>,
        content_lang: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let (state, _) = watch::channel(ControllerState::idle(&text));

        let mut controller = Self {
            backend,
            target,
            content_lang: content_lang.into(),
            text,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            in_flight: None,
        };
        controller.evaluate();
        controller
    }

    pub fn for_content(
        backend: Arc<dyn TranslateBackend>,
        target: Option<LanguageCode>,
        content: &impl AuthoredContent,
    ) -> Self {
        Self::new(backend, target, content.language(), content.text())
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.evaluate();
        }
    }

    pub fn set_target(&mut self, target: LanguageCode) {
        if self.target.as_ref() != Some(&target) {
            self.target = Some(target);
            self.evaluate();
        }
    }

    pub fn set_content_language(&mut self, content_lang: impl Into<String>) {
        let content_lang = content_lang.into();
        if content_lang != self.content_lang {
            self.content_lang = content_lang;
            self.evaluate();
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ControllerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    /// Wait until no request is outstanding and return the state at that point.
    pub async fn settled(&self) -> ControllerState {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|s| !s.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    fn evaluate(&mut self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        let target = match &self.target {
            Some(target)
                if !self.text.is_empty()
                    && needs_translation(&self.content_lang, target.as_str()) =>
            {
                target.clone()
            }
            _ => {
                self.state.send_replace(ControllerState::idle(&self.text));
                return;
            }
        };

        debug!(
            "Requesting translation {} -> {} (generation {})",
            self.content_lang, target, generation
        );
        self.state.send_replace(ControllerState::loading(&self.text));

        let request = TranslationRequest {
            text: self.text.clone(),
            target_lang: target,
            source_lang: Some(self.content_lang.clone()),
        };
        let backend = Arc::clone(&self.backend);
        let current = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);

        self.in_flight = Some(tokio::spawn(async move {
            let reply = AssertUnwindSafe(backend.request(&request)).catch_unwind().await;
            let translated = match reply {
                Ok(Ok(Some(text))) if !text.is_empty() => text,
                Ok(Ok(_)) => request.text.clone(),
                Ok(Err(e)) => {
                    warn!("Translation failed, showing original text: {}", e);
                    request.text.clone()
                }
                Err(_) => {
                    warn!("Translation backend panicked, showing original text");
                    request.text.clone()
                }
            };
            let resolved = ControllerState::resolved(request.text, translated);

            state.send_if_modified(|s| {
                if current.load(Ordering::SeqCst) != generation {
                    debug!("Dropping stale translation (generation {})", generation);
                    return false;
                }
                *s = resolved;
                true
            });
        }));
    }
}

impl Drop for TranslationController {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
