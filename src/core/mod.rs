// Public modules
pub mod collect;
pub mod convert;
pub mod defaults;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod render;

// Re-export common types for convenience
pub use collect::{Collection, CollisionSet, ExportItem, NameMapping};
pub use convert::{convert, run, Conversion};
pub use defaults::{ConvertConfig, ConvertOptions};
pub use diagnostics::{Diagnostic, Diagnostics, Level, Verbosity};
pub use error::{Error, ErrorCode, Result};
pub use loader::OutputSet;
