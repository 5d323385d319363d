//! # sheetlint_text
//!
//! Document coordinates and the text buffer collaborator for sheetlint.
//!
//! This crate provides:
//! - `Position` / `Span` in line/column coordinates (0-indexed, columns in chars)
//! - `TextEdit` for mapping positions across an edit
//! - The `TextBuffer` trait the engine reads documents through
//! - `LineBuffer`, a line-indexed `String` implementation of it
//!
//! ## Example
//!
//! ```rust
//! use sheetlint_text::{LineBuffer, Position, Span, TextBuffer};
//!
//! let buffer = LineBuffer::new("a { color: red; }\nb { }");
//! let brace = buffer.find_next("}", Position::new(0, 0)).unwrap();
//!
//! assert_eq!(brace, Span::new(Position::new(0, 16), Position::new(0, 17)));
//! assert_eq!(buffer.end(), Position::new(1, 5));
//! ```

mod buffer;
mod span;

pub use buffer::{LineBuffer, TextBuffer};
pub use span::{Position, Span, TextEdit};
