//! Convert deployment stack outputs into a sourceable shell script.
//!
//! ```no_run
//! use stackenv::{convert, ConvertOptions, Diagnostics, Verbosity};
//!
//! let mut diagnostics = Diagnostics::new(Verbosity::QUIET);
//! let conversion = convert(ConvertOptions::default(), &mut diagnostics)?;
//! for (name, origin) in &conversion.mapping {
//!     println!("{} <= {}", name, origin);
//! }
//! # Ok::<(), stackenv::Error>(())
//! ```

pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `stackenv::render` instead of `stackenv::core::render`
pub use self::core::*;
pub use utils::*;
