//! The rendering pipeline: grammar loading on demand, line annotation and
//! the reactive view that publishes the latest markup.

mod escape;
mod lines;
mod loading;
mod renderer;
mod view;

#[cfg(test)]
mod test_support;

pub use escape::escape_plain;
pub use lines::HighlightedLines;
pub use renderer::{
    HIGHLIGHTED_LINE_CLASS, LINE_NUMBER_PROPERTY, RenderRequest, RenderResult, Renderer,
    render_name,
};
pub use view::{HighlightedCode, RenderOutcome};
