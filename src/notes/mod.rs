pub mod markdown;

pub use markdown::{format_document, format_line};
