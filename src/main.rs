use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use lark_highlight::config::ConfigEngine;
use lark_highlight::syntax::GrammarInstaller;
use lark_highlight::{
    HighlightError, HighlightedCode, LanguageCatalog, RenderRequest, Renderer, TreeSitterEngine,
    logging,
};

mod cli;

use cli::CliArgs;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lark-highlight: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> lark_highlight::Result<()> {
    // Config script first, then command-line overrides
    let mut config = ConfigEngine::new();
    match &args.config {
        Some(path) => config.load_file(path)?,
        None => config.load_default()?,
    }
    let mut settings = config.settings();
    args.apply(&mut settings);

    let installer = Arc::new(GrammarInstaller::new(settings.grammars_dir.clone()));
    let catalog = LanguageCatalog::builtin(installer, settings.auto_install);

    if args.list_languages {
        for language in catalog.iter() {
            println!("{}\t{}", language.key(), language.name());
        }
        return Ok(());
    }

    let Some(path) = args.file.as_deref() else {
        return Err(HighlightError::MissingInput);
    };
    let code = tokio::fs::read_to_string(path).await?;

    let language = match &args.language {
        Some(key) => catalog
            .get(key)
            .cloned()
            .ok_or_else(|| HighlightError::UnknownLanguage(key.clone()))?,
        None => catalog.detect(path),
    };
    tracing::debug!("Rendering {} as {}", path.display(), language.name());

    let renderer = Renderer::new().with_engine(Arc::new(TreeSitterEngine::new()));
    let view = HighlightedCode::new(Arc::new(renderer));
    let request = RenderRequest::new(code, Some(language))
        .with_theme(settings.resolved_theme())
        .with_highlighted_lines(settings.highlighted_lines);
    view.set_request(request).await?;

    println!("{}", view.current());
    Ok(())
}
