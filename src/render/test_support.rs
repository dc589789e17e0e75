//! In-memory engine and suppliers for render tests

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::Notify;

use crate::engine::{HighlightEngine, HtmlOptions, LineNode};
use crate::error::{HighlightError, Result};
use crate::syntax::{GrammarBundle, GrammarDefinition, GrammarSource, LanguageDescriptor, supplier_fn};

/// Records every load and render; markup is `lang|theme` followed by one
/// `[classes|data-line]text` entry per line
#[derive(Default)]
pub struct FakeEngine {
    loaded: Mutex<HashSet<String>>,
    pub loads: Mutex<Vec<Vec<String>>>,
    pub load_calls: AtomicUsize,
    pub rendered_langs: Mutex<Vec<String>>,
    pub fail_loads: AtomicBool,
    /// When set, each load waits for one notification before committing
    pub load_gate: Option<Arc<Notify>>,
}

impl FakeEngine {
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            load_gate: Some(gate),
            ..Self::default()
        }
    }
}

impl HighlightEngine for FakeEngine {
    fn loaded_languages(&self) -> HashSet<String> {
        self.loaded.lock().unwrap().clone()
    }

    fn load_language<'a>(&'a self, grammars: &'a [GrammarDefinition]) -> BoxFuture<'a, Result<()>> {
        async move {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            let names: Vec<String> = grammars
                .iter()
                .map(|g| g.name().unwrap_or("<unnamed>").to_string())
                .collect();

            match &self.load_gate {
                Some(gate) => gate.notified().await,
                None => tokio::task::yield_now().await,
            }

            if self.fail_loads.load(Ordering::SeqCst) {
                return Err(HighlightError::load(names.join(","), "refused"));
            }

            self.loaded.lock().unwrap().extend(names.iter().cloned());
            self.loads.lock().unwrap().push(names);
            Ok(())
        }
        .boxed()
    }

    fn code_to_html(&self, code: &str, options: &HtmlOptions<'_>) -> Result<String> {
        if !self.is_loaded(options.lang) {
            return Err(HighlightError::UnknownGrammar(options.lang.to_string()));
        }
        self.rendered_langs.lock().unwrap().push(options.lang.to_string());

        let mut out = format!("{}|{}", options.lang, options.theme);
        for (index, text) in code.split('\n').enumerate() {
            let mut node = LineNode::new(index + 1);
            if let Some(transform) = options.line_transform {
                transform(&mut node);
            }
            out.push_str(&format!(
                "\n[{}|{}]{}",
                node.classes().join(" "),
                node.property("data-line").unwrap_or("-"),
                text
            ));
        }
        Ok(out)
    }
}

pub fn grammar(name: &str) -> GrammarDefinition {
    GrammarDefinition::new(name, GrammarSource::Static(tree_sitter_rust::LANGUAGE.into()))
}

/// A language whose supplier yields the given grammars immediately
pub fn language(key: &str, grammars: Vec<GrammarDefinition>) -> LanguageDescriptor {
    LanguageDescriptor::new(
        key,
        key,
        supplier_fn(move || {
            let bundle = GrammarBundle::Sequence(grammars.clone());
            async move { Ok::<_, HighlightError>(bundle) }
        }),
    )
}

/// A language whose supplier waits for one notification on `gate`
pub fn gated_language(key: &str, gate: Arc<Notify>) -> LanguageDescriptor {
    let name = key.to_string();
    LanguageDescriptor::new(
        key,
        key,
        supplier_fn(move || {
            let gate = Arc::clone(&gate);
            let bundle = GrammarBundle::Single(grammar(&name));
            async move {
                gate.notified().await;
                Ok::<_, HighlightError>(bundle)
            }
        }),
    )
}

/// A language whose supplier always fails
pub fn failing_language(key: &str) -> LanguageDescriptor {
    let name = key.to_string();
    LanguageDescriptor::new(
        key,
        key,
        supplier_fn(move || {
            let name = name.clone();
            async move { Err::<GrammarBundle, _>(HighlightError::fetch(name, "network down")) }
        }),
    )
}
