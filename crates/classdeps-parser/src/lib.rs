//! Pattern-based scanning of C#-style sources.
//!
//! A lightweight lexical scan, not a parser: comments are stripped, then a
//! fixed table of regular expressions pulls out the primary class name and the
//! type names the file refers to. The table sits behind [`ReferenceScanner`]
//! so it can be replaced without touching tree construction.

pub mod condense;
pub mod extract;
pub mod names;
pub mod patterns;

pub use patterns::{FileScan, ReferenceScanner, RegexScanner};
