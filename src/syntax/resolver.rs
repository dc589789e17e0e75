//! Resolves a language into the ordered grammars it needs

use super::grammar::GrammarDefinition;
use super::languages::LanguageDescriptor;
use crate::error::{HighlightError, Result};

/// The grammars a language needs and the name its primary grammar is known by
#[derive(Debug, Clone)]
pub struct ResolvedGrammars {
    /// Dependencies first; the primary grammar is always last
    pub grammars: Vec<GrammarDefinition>,
    /// Cache key and render name of the primary grammar, case preserved
    pub primary_name: String,
}

/// Fetch a language's grammars and work out the primary grammar name.
///
/// The primary name is the last grammar's declared name, or the language's
/// display name if the grammar declares none. In that case the name is
/// stamped onto the grammar so the engine registers it under the same name.
pub async fn resolve(language: &LanguageDescriptor) -> Result<ResolvedGrammars> {
    let supplier = language
        .supplier()
        .ok_or_else(|| HighlightError::NoGrammarSupplier(language.key().to_string()))?;

    let mut grammars = supplier.fetch().await?.into_vec();

    let Some(primary) = grammars.pop() else {
        return Err(HighlightError::fetch(
            language.name(),
            "supplier returned no grammars",
        ));
    };

    let primary_name = primary.name().unwrap_or(language.name()).to_string();
    grammars.push(primary.with_name(primary_name.clone()));

    Ok(ResolvedGrammars {
        grammars,
        primary_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{GrammarBundle, GrammarSource, supplier_fn};

    fn static_grammar() -> GrammarSource {
        GrammarSource::Static(tree_sitter_rust::LANGUAGE.into())
    }

    fn language(bundle: GrammarBundle) -> LanguageDescriptor {
        LanguageDescriptor::new(
            "custom",
            "CustomLang",
            supplier_fn(move || {
                let bundle = bundle.clone();
                async move { Ok::<_, HighlightError>(bundle) }
            }),
        )
    }

    #[tokio::test]
    async fn single_grammar_becomes_one_element_list() {
        let lang = language(GrammarDefinition::new("rust", static_grammar()).into());
        let resolved = resolve(&lang).await.unwrap();
        assert_eq!(resolved.grammars.len(), 1);
        assert_eq!(resolved.primary_name, "rust");
    }

    #[tokio::test]
    async fn primary_is_last_of_sequence() {
        let lang = language(GrammarBundle::Sequence(vec![
            GrammarDefinition::new("dependency", static_grammar()),
            GrammarDefinition::new("Main", static_grammar()),
        ]));
        let resolved = resolve(&lang).await.unwrap();
        assert_eq!(resolved.primary_name, "Main");
        let names: Vec<_> = resolved.grammars.iter().map(|g| g.name().unwrap()).collect();
        assert_eq!(names, vec!["dependency", "Main"]);
    }

    #[tokio::test]
    async fn unnamed_primary_takes_descriptor_name() {
        let lang = language(GrammarDefinition::unnamed(static_grammar()).into());
        let resolved = resolve(&lang).await.unwrap();
        // Case preserved, never lower-cased
        assert_eq!(resolved.primary_name, "CustomLang");
        assert_eq!(resolved.grammars[0].name(), Some("CustomLang"));
    }

    #[tokio::test]
    async fn empty_sequence_is_a_fetch_failure() {
        let lang = language(GrammarBundle::Sequence(Vec::new()));
        let err = resolve(&lang).await.unwrap_err();
        assert!(matches!(err, HighlightError::GrammarFetch { .. }));
    }

    #[tokio::test]
    async fn supplier_failure_propagates() {
        let lang = LanguageDescriptor::new(
            "broken",
            "Broken",
            supplier_fn(|| async {
                Err::<GrammarBundle, _>(HighlightError::fetch("Broken", "network down"))
            }),
        );
        let err = resolve(&lang).await.unwrap_err();
        assert!(err.to_string().contains("network down"));
    }

    #[tokio::test]
    async fn plaintext_has_no_supplier() {
        let err = resolve(&LanguageDescriptor::plaintext()).await.unwrap_err();
        assert!(matches!(err, HighlightError::NoGrammarSupplier(_)));
    }
}
