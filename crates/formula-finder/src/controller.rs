use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use finder_common::error::SubmissionError;
use finder_common::model::{AttachedFile, ResultSet};

use crate::attachment::AttachmentSlot;
use crate::error::InputError;
use crate::fallback;
use crate::render;
use crate::submission::{SearchBackend, SearchRequest};

/// What the page shows right now. Sent to the browser after every action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// Attachment row markup; `None` hides the preview region.
    pub preview: Option<String>,
    pub loading: bool,
    /// Results region markup.
    pub results: String,
    /// Blocking message for the user, set only when an action was refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl PageView {
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

#[derive(Default)]
struct PageState {
    attachment: AttachmentSlot,
    loading: bool,
    results: String,
}

impl PageState {
    fn view(&self) -> PageView {
        PageView {
            preview: render::render_preview(self.attachment.current()),
            loading: self.loading,
            results: self.results.clone(),
            notice: None,
        }
    }
}

/// Owns the attachment slot and the rendered page regions, and runs searches.
///
/// The lock is released while a search is in flight, so overlapping
/// submissions are allowed and whichever resolves last owns the results.
pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    state: Arc<Mutex<PageState>>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(PageState::default())),
        }
    }

    pub async fn view(&self) -> PageView {
        self.state.lock().await.view()
    }

    pub async fn select(&self, files: Vec<AttachedFile>) -> PageView {
        let picked = files.len();
        let mut state = self.state.lock().await;
        if state.attachment.select(files) {
            if let Some(file) = state.attachment.current() {
                info!(
                    file = %file.name,
                    media_type = %file.media_type,
                    bytes = file.content.len(),
                    ignored = picked.saturating_sub(1),
                    "attachment selected"
                );
            }
        }
        state.view()
    }

    pub async fn remove(&self) -> PageView {
        let mut state = self.state.lock().await;
        if let Some(file) = state.attachment.remove() {
            info!(file = %file.name, "attachment removed");
        }
        state.view()
    }

    /// Validates, then searches. Input problems come back as `Err` with the
    /// page untouched; any search failure renders the demo results instead.
    ///
    /// The search and the final state write run on their own task, so the
    /// loading flag is cleared even if the caller is dropped mid-flight.
    pub async fn submit(&self, query: &str) -> Result<PageView, InputError> {
        let request = {
            let mut state = self.state.lock().await;
            let request = SearchRequest::validate(query, state.attachment.current())?;
            state.loading = true;
            state.results.clear();
            request
        };

        info!(query = %request.query, file = %request.file.name, "submitting search");
        let backend = Arc::clone(&self.backend);
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let outcome = backend.search(&request).await;
            let results = render::render_results(&resolve(outcome));
            settle(&state, results).await
        });

        match task.await {
            Ok(view) => Ok(view),
            Err(e) => {
                warn!(error = %e, "search task failed, using demo data");
                let results = render::render_results(&fallback::demo_results());
                Ok(settle(&self.state, results).await)
            }
        }
    }
}

async fn settle(state: &Mutex<PageState>, results: String) -> PageView {
    let mut state = state.lock().await;
    state.loading = false;
    state.results = results;
    state.view()
}

/// Turns a failed search into the demo result set.
pub fn resolve(outcome: Result<ResultSet, SubmissionError>) -> ResultSet {
    match outcome {
        Ok(set) => {
            info!(size = set.size, results = set.results.len(), "search succeeded");
            set
        }
        Err(e) => {
            if e.is_unreachable() {
                warn!(error = %e, "search api unreachable, using demo data");
            } else {
                warn!(error = %e, "search failed, using demo data");
            }
            fallback::demo_results()
        }
    }
}
