// File: ./src/model/mod.rs
pub mod catalog;
pub mod hymn;
pub mod records;

pub use catalog::Catalog;
pub use hymn::Hymn;
pub use records::{Bookmark, ViewedEntry};
