//! wikidom core
//!
//! A format-preserving wiki markup syntax tree and the mutable, typed
//! document object model kept in sync with it. The syntax tree records
//! every byte of the original source; the object model gives editing
//! applications DOM-like node, attribute and child semantics. The
//! synchronization engine guarantees that an unedited document serializes
//! back to byte-identical source text, and that structural or attribute
//! edits reconcile the two trees without ever leaving stale state visible
//! to the object model.

pub mod ast;
pub mod dom;
pub mod error;
pub mod result;
pub mod text;

// Re-export commonly used types
pub use ast::{Ast, AstId, AstKind, RtData};
pub use dom::descriptors::{
    AttributeDescriptor, HorizAlign, Length, LengthUnit, MAX_GAP, Normalization,
};
pub use dom::elements::{HorizontalRule, Paragraph};
pub use dom::siblings::{SiblingIter, Siblings};
pub use dom::{Dom, ElementTag, NodeId, NodeKind};
pub use error::{DomError, ErrorKind};
pub use result::Result;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wikidom=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
