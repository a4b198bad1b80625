pub mod comic;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;

pub use comic::{
    LogSink, NullSink, PanelRenderer, RunOutcome, RunReport, RunState, ScriptGenerator,
    SlideAssembler, SlideSink,
};
pub use config::GeminiConfig;
pub use error::{PanelGenError, Result};
pub use gemini::{GeminiClient, ImageClient, TextClient};
pub use models::*;
