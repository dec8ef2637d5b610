//! Name indexing, fuzzy matching and dependency tree construction.
//!
//! [`index::NameIndex`] maps primary class names to files, [`tree::TreeBuilder`]
//! walks from a root file through the references the scanner finds, and
//! [`report`] turns the result into the JSON shapes the documentation stage reads.

pub mod fuzzy;
pub mod index;
pub mod interfaces;
pub mod predicate;
pub mod report;
pub mod tree;
