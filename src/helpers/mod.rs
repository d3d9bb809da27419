//! Helper functions shared by the content pipeline and the generator

mod date;
mod url;

pub use date::*;
pub use url::*;
