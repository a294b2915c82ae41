//! Mirror emission: descriptors to definitions to Java source.

mod emitter;
pub mod ir;
mod render;


pub use emitter::{Emitted, Emitter};
pub use ir::TypeDefinition;
pub use render::render_file;
