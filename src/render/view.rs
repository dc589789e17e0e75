//! Reactive wrapper that keeps displayed markup in sync with its inputs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use super::lines::HighlightedLines;
use super::renderer::{RenderRequest, RenderResult, Renderer};
use crate::engine::HighlightEngine;
use crate::error::Result;
use crate::syntax::LanguageDescriptor;

/// What happened to a triggered render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The result is now displayed
    Applied,
    /// A newer render was triggered while this one ran; its result was dropped
    Stale,
    /// The inputs did not change, nothing was rendered
    Unchanged,
}

/// Holds the current render inputs and publishes the markup for the latest of them.
///
/// Every render is stamped with a generation when triggered. A render that
/// finishes after a newer one was triggered never reaches the display, so
/// out-of-order completions cannot overwrite fresher output.
pub struct HighlightedCode {
    renderer: Arc<Renderer>,
    request: Mutex<RenderRequest>,
    generation: AtomicU64,
    display: watch::Sender<RenderResult>,
}

impl HighlightedCode {
    pub fn new(renderer: Arc<Renderer>) -> Self {
        let (display, _) = watch::channel(RenderResult::default());
        Self {
            renderer,
            request: Mutex::new(RenderRequest::default()),
            generation: AtomicU64::new(0),
            display,
        }
    }

    pub fn renderer(&self) -> &Arc<Renderer> {
        &self.renderer
    }

    /// Watch the displayed markup
    pub fn subscribe(&self) -> watch::Receiver<RenderResult> {
        self.display.subscribe()
    }

    /// Snapshot of the displayed markup
    pub fn current(&self) -> RenderResult {
        self.display.borrow().clone()
    }

    pub fn request(&self) -> RenderRequest {
        self.request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Generation of the most recently triggered render
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn loading(&self) -> watch::Receiver<bool> {
        self.renderer.loading()
    }

    pub async fn set_request(&self, request: RenderRequest) -> Result<RenderOutcome> {
        self.update(|current| *current = request).await
    }

    pub async fn set_code(&self, code: impl Into<String>) -> Result<RenderOutcome> {
        let code = code.into();
        self.update(|current| current.code = code).await
    }

    pub async fn set_language(&self, language: Option<LanguageDescriptor>) -> Result<RenderOutcome> {
        self.update(|current| current.language = language).await
    }

    pub async fn set_highlighted_lines(&self, lines: HighlightedLines) -> Result<RenderOutcome> {
        self.update(|current| current.highlighted_lines = lines).await
    }

    pub async fn set_theme(&self, theme: impl Into<String>) -> Result<RenderOutcome> {
        let theme = theme.into();
        self.update(|current| current.theme = theme).await
    }

    /// Swap the engine; re-renders unless it is the same instance
    pub async fn set_engine(&self, engine: Option<Arc<dyn HighlightEngine>>) -> Result<RenderOutcome> {
        let unchanged = match (self.renderer.engine(), &engine) {
            (None, None) => true,
            (Some(current), Some(next)) => Arc::ptr_eq(&current, next),
            _ => false,
        };
        if unchanged {
            return Ok(RenderOutcome::Unchanged);
        }

        self.renderer.set_engine(engine);
        self.refresh().await
    }

    /// Re-render the current inputs unconditionally
    pub async fn refresh(&self) -> Result<RenderOutcome> {
        let (request, generation) = {
            let current = self.request.lock().unwrap_or_else(PoisonError::into_inner);
            (current.clone(), self.next_generation())
        };
        self.run(request, generation).await
    }

    async fn update(&self, change: impl FnOnce(&mut RenderRequest)) -> Result<RenderOutcome> {
        let (request, generation) = {
            let mut current = self.request.lock().unwrap_or_else(PoisonError::into_inner);
            let mut next = current.clone();
            change(&mut next);
            if next == *current {
                return Ok(RenderOutcome::Unchanged);
            }
            *current = next.clone();
            (next, self.next_generation())
        };
        self.run(request, generation).await
    }

    /// Must be called with the request lock held, so generations follow request order
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn run(&self, request: RenderRequest, generation: u64) -> Result<RenderOutcome> {
        // On failure the displayed markup stays as it was
        let result = self.renderer.render(&request).await?;

        let mut applied = false;
        self.display.send_if_modified(|shown| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            applied = true;
            if *shown == result {
                return false;
            }
            *shown = result;
            true
        });

        if applied {
            Ok(RenderOutcome::Applied)
        } else {
            tracing::debug!("Dropped stale render (generation {})", generation);
            Ok(RenderOutcome::Stale)
        }
    }
}
