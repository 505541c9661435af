//! Generic utility primitives with no knowledge of stack outputs.
//!
//! - `io` - File I/O with consistent error handling
//! - `shell` - Shell escaping and quoting

pub mod io;
pub mod shell;
