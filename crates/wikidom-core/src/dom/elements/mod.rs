//! Typed wrappers over element nodes.
//!
//! Each wrapper is a thin handle validated by `cast()`; accessors go
//! through the document's attribute pipeline, so typed and name-based
//! access can never disagree.

pub mod horizontal_rule;
pub mod paragraph;

pub use horizontal_rule::HorizontalRule;
pub use paragraph::Paragraph;
