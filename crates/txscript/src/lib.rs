/// Transaction script codec - parsing, serialization, standard pattern
/// recognition, and construction.
///
/// Provides the Script type, opcode definitions, script chunk encoding,
/// classification of the standard output and input shapes, and a builder
/// with the common script templates.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod standard;
pub mod builder;
pub mod config;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use chunk::ScriptChunk;
pub use standard::{Capture, ScriptType};
pub use builder::ScriptBuilder;
pub use config::Config;
