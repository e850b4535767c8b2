//! Helper functions shared by the page renderers
//!
//! URL generation and the trusted HTML fragment type.

mod html;
mod url;

pub use html::*;
pub use url::*;
