//! Element resolution against a live document
//!
//! This module provides:
//! - selector: classification and splitting of selector expressions
//! - resolver: lookup strategies and their fallback chains per finder kind
//! - collection: ElementCollection, the ordered and de-duplicated match set

pub mod collection;
pub mod resolver;
pub mod selector;

pub use collection::{ElementCollection, Handle, Node};
pub use resolver::{Chain, FieldKind, LookupIssue, Strategy};
pub use selector::{QualifiedTag, SelectorExpression, SelectorKind};
