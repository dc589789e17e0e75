//! Configuration: [`Settings`] and the Rhai script engine that fills them

mod api;
mod engine;
mod settings;

pub use engine::ConfigEngine;
pub use settings::Settings;
