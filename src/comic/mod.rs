pub mod assembler;
pub mod html;
pub mod renderer;
pub mod script;

pub use assembler::SlideAssembler;
pub use renderer::{
    LogSink, NullSink, PanelRenderer, RunOutcome, RunReport, RunState, SlideSink,
};
pub use script::ScriptGenerator;
