//! Content module - lecture notes, front-matter and Markdown rendering

mod frontmatter;
pub mod loader;
mod markdown;
mod note;

pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use note::{Document, NoteStore};

#[cfg(test)]
pub(crate) use note::test_document;
