pub mod common;
pub mod image;
pub mod script;
pub mod slide;
pub mod text;

pub use common::*;
pub use image::*;
pub use script::*;
pub use slide::*;
pub use text::*;
