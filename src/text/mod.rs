//! Text module: Turning raw document text into fixed-width display lines.
//!
//! Width is measured in extended grapheme clusters, so a base character is
//! never separated from its combining marks.

mod wrap;

pub use wrap::{wrap, wrap_into, wrapped_len};
