use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use super::escape::escape_plain;
use super::lines::HighlightedLines;
use super::loading::{LoadLocks, LoadingState};
use crate::engine::{HighlightEngine, HtmlOptions, LineNode, LineTransform};
use crate::error::Result;
use crate::syntax::{LanguageDescriptor, ResolvedGrammars, resolve};
use crate::theme::CSS_VARIABLES;

/// Line property carrying the 1-based line number
pub const LINE_NUMBER_PROPERTY: &str = "data-line";
/// Class added to lines in the highlighted set
pub const HIGHLIGHTED_LINE_CLASS: &str = "highlighted-line";

/// Everything a render depends on
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub code: String,
    /// `None` or the plaintext sentinel renders without highlighting
    pub language: Option<LanguageDescriptor>,
    pub highlighted_lines: HighlightedLines,
    /// Resolved theme identifier, e.g. `tailwind-dark`
    pub theme: String,
}

impl RenderRequest {
    pub fn new(code: impl Into<String>, language: Option<LanguageDescriptor>) -> Self {
        Self {
            code: code.into(),
            language,
            ..Self::default()
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_highlighted_lines(mut self, lines: HighlightedLines) -> Self {
        self.highlighted_lines = lines;
        self
    }
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            code: String::new(),
            language: None,
            highlighted_lines: HighlightedLines::default(),
            theme: CSS_VARIABLES.to_string(),
        }
    }
}

/// Markup produced by a render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderResult(String);

impl RenderResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns render requests into markup, loading grammars on first use.
///
/// The engine is optional: without one every request takes the plain text
/// path. Grammar loads are shared through the engine, so one renderer (or
/// several over the same engine) only ever loads a language once.
pub struct Renderer {
    engine: RwLock<Option<Arc<dyn HighlightEngine>>>,
    loading: LoadingState,
    load_locks: LoadLocks,
}

impl Renderer {
    /// A renderer with no engine installed
    pub fn new() -> Self {
        Self {
            engine: RwLock::new(None),
            loading: LoadingState::new(),
            load_locks: LoadLocks::default(),
        }
    }

    pub fn with_engine(self, engine: Arc<dyn HighlightEngine>) -> Self {
        self.set_engine(Some(engine));
        self
    }

    pub fn set_engine(&self, engine: Option<Arc<dyn HighlightEngine>>) {
        *self.engine.write().unwrap_or_else(PoisonError::into_inner) = engine;
    }

    pub fn engine(&self) -> Option<Arc<dyn HighlightEngine>> {
        self.engine
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Watch the "loading a language" flag
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub async fn render(&self, request: &RenderRequest) -> Result<RenderResult> {
        let (engine, language) = match (self.engine(), &request.language) {
            (Some(engine), Some(language)) if !language.is_plaintext() => (engine, language),
            _ => return Ok(RenderResult(escape_plain(&request.code))),
        };

        let resolved = resolve(language).await?;
        self.ensure_loaded(engine.as_ref(), &resolved).await?;

        let highlighted = &request.highlighted_lines;
        let transform: LineTransform<'_> = &|node: &mut LineNode| annotate_line(node, highlighted);
        let html = engine.code_to_html(
            &request.code,
            &HtmlOptions {
                lang: render_name(&resolved.primary_name),
                theme: &request.theme,
                line_transform: Some(transform),
            },
        )?;

        Ok(RenderResult(html))
    }

    async fn ensure_loaded(&self, engine: &dyn HighlightEngine, resolved: &ResolvedGrammars) -> Result<()> {
        let name = resolved.primary_name.as_str();
        if engine.is_loaded(name) {
            tracing::debug!("Grammar {} already loaded", name);
            return Ok(());
        }

        let lock = self.load_locks.lock_for(name);
        let _guard = lock.lock().await;
        // Another render may have finished the load while we waited
        if engine.is_loaded(name) {
            return Ok(());
        }

        tracing::debug!(
            "Loading grammar {} ({} definitions)",
            name,
            resolved.grammars.len()
        );
        let _loading = self.loading.begin();
        engine.load_language(&resolved.grammars).await
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Name passed to the engine for a primary grammar
pub fn render_name(primary_name: &str) -> &str {
    match primary_name {
        "typescript" => "tsx",
        other => other,
    }
}

fn annotate_line(node: &mut LineNode, highlighted: &HighlightedLines) {
    node.set_property(LINE_NUMBER_PROPERTY, node.line());
    if highlighted.contains(node.line()) {
        node.add_class(HIGHLIGHTED_LINE_CLASS);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use tokio::sync::Notify;

    use super::*;
    use crate::error::HighlightError;
    use crate::render::test_support::{FakeEngine, failing_language, grammar, language};

    fn renderer_with(engine: &Arc<FakeEngine>) -> Renderer {
        Renderer::new().with_engine(engine.clone())
    }

    fn rust() -> LanguageDescriptor {
        language("rust", vec![grammar("rust")])
    }

    #[tokio::test]
    async fn test_no_language_escapes_code() {
        let engine = Arc::new(FakeEngine::default());
        let renderer = renderer_with(&engine);

        let result = renderer
            .render(&RenderRequest::new("a < b", None))
            .await
            .unwrap();
        assert_eq!(result.as_str(), "a &#60; b");
        assert_eq!(engine.load_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_plaintext_sentinel_escapes_code() {
        let engine = Arc::new(FakeEngine::default());
        let renderer = renderer_with(&engine);

        let request = RenderRequest::new("x & y", Some(LanguageDescriptor::plaintext()));
        let result = renderer.render(&request).await.unwrap();
        assert_eq!(result.as_str(), "x &#38; y");
    }

    #[tokio::test]
    async fn test_missing_engine_escapes_code() {
        let renderer = Renderer::new();
        let request = RenderRequest::new("<é>", Some(rust()));
        let result = renderer.render(&request).await.unwrap();
        assert_eq!(result.as_str(), "&#60;&#233;&#62;");
    }

    #[tokio::test]
    async fn test_lines_are_numbered_and_highlighted() {
        let engine = Arc::new(FakeEngine::default());
        let renderer = renderer_with(&engine);

        let request = RenderRequest::new("a\nb\nc", Some(rust()))
            .with_theme("tailwind-dark")
            .with_highlighted_lines([2].into_iter().collect());
        let result = renderer.render(&request).await.unwrap();

        assert_eq!(
            result.as_str(),
            "rust|tailwind-dark\n[line|1]a\n[line highlighted-line|2]b\n[line|3]c"
        );
    }

    #[tokio::test]
    async fn test_second_render_uses_cache() {
        let engine = Arc::new(FakeEngine::default());
        let renderer = renderer_with(&engine);
        let request = RenderRequest::new("fn main() {}", Some(rust()));

        let first = renderer.render(&request).await.unwrap();
        let second = renderer.render(&request).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.load_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_load_once() {
        let engine = Arc::new(FakeEngine::default());
        let renderer = renderer_with(&engine);
        let request = RenderRequest::new("x", Some(rust()));

        let (a, b) = tokio::join!(renderer.render(&request), renderer.render(&request));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(engine.load_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_composite_loads_in_order() {
        let engine = Arc::new(FakeEngine::default());
        let renderer = renderer_with(&engine);
        let vue = language("vue", vec![grammar("html"), grammar("css"), grammar("vue")]);

        renderer.render(&RenderRequest::new("<template/>", Some(vue))).await.unwrap();

        assert_eq!(*engine.loads.lock().unwrap(), vec![vec!["html", "css", "vue"]]);
        assert_eq!(*engine.rendered_langs.lock().unwrap(), vec!["vue"]);
    }

    #[tokio::test]
    async fn test_typescript_renders_as_tsx() {
        let engine = Arc::new(FakeEngine::default());
        let renderer = renderer_with(&engine);
        let typescript = language("typescript", vec![grammar("tsx"), grammar("typescript")]);
        let request = RenderRequest::new("let x: number = 1;", Some(typescript));

        renderer.render(&request).await.unwrap();
        renderer.render(&request).await.unwrap();

        // Cache key stays "typescript"; only the render name changes
        assert_eq!(engine.load_calls.load(Ordering::SeqCst), 1);
        assert_eq!(*engine.rendered_langs.lock().unwrap(), vec!["tsx", "tsx"]);
    }

    #[test]
    fn test_render_name() {
        assert_eq!(render_name("typescript"), "tsx");
        assert_eq!(render_name("TypeScript"), "TypeScript");
        assert_eq!(render_name("rust"), "rust");
    }

    #[tokio::test]
    async fn test_supplier_failure_propagates() {
        let engine = Arc::new(FakeEngine::default());
        let renderer = renderer_with(&engine);

        let err = renderer
            .render(&RenderRequest::new("x", Some(failing_language("cobol"))))
            .await
            .unwrap_err();
        assert!(matches!(err, HighlightError::GrammarFetch { .. }));
        assert_eq!(engine.load_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_load_failure_lowers_flag() {
        let engine = Arc::new(FakeEngine::default());
        engine.fail_loads.store(true, Ordering::SeqCst);
        let renderer = renderer_with(&engine);

        let err = renderer
            .render(&RenderRequest::new("x", Some(rust())))
            .await
            .unwrap_err();
        assert!(matches!(err, HighlightError::GrammarLoad { .. }));
        assert!(!renderer.is_loading());
        assert!(engine.loaded_languages().is_empty());
    }

    #[tokio::test]
    async fn test_flag_raised_while_loading() {
        let gate = Arc::new(Notify::new());
        let engine = Arc::new(FakeEngine::gated(gate.clone()));
        let renderer = renderer_with(&engine);
        let mut loading = renderer.loading();
        let request = RenderRequest::new("x", Some(rust()));

        let (result, ()) = tokio::join!(renderer.render(&request), async {
            loading.wait_for(|loading| *loading).await.unwrap();
            gate.notify_one();
        });

        result.unwrap();
        assert!(!renderer.is_loading());
    }
}
