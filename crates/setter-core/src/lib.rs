//! # Setter Core
//!
//! The `@setterFunction` peer macro and what it needs to run outside a
//! compiler:
//! - syntax tree for Swift-style member declarations, with a source printer
//! - a nom front end producing that tree
//! - the property inspector and setter synthesizer
//! - a small macro host that splices generated peers into a source unit
//!
//! ```
//! use setter_core::{expand_str, ToSource};
//!
//! let expansion = expand_str("@setterFunction\nvar title: String = \"\"\n").unwrap();
//! assert!(!expansion.has_errors());
//! assert_eq!(
//!     expansion.file.to_source(),
//!     "var title: String = \"\"\n\n@discardableResult\nfunc title(_ title: String) -> Self {\n    self.title = title\n    return self\n}\n"
//! );
//! ```

#![warn(clippy::all)]

pub mod diagnostic;
pub mod error;
pub mod expansion;
pub mod host;
pub mod inspector;
pub mod parser;
pub mod synthesizer;
pub mod syntax;

// Re-export commonly used types
pub use diagnostic::{
    render_diagnostics, Diagnostic, DiagnosticCollector, ExpansionContext, Severity,
};
pub use error::SetterError;
pub use expansion::{PeerMacro, SetterFunctionMacro, SETTER_FUNCTION};
pub use host::{expand_source, Expansion, MacroRegistry};
pub use inspector::{inspect, ValidatedProperty};
pub use parser::{parse_file, parse_source, parse_type, ParseError};
pub use synthesizer::{synthesize, synthesize_all, GeneratedMethod};
pub use syntax::{Decl, SourceFile, SourceGenConfig, Span, ToSource};

use tracing_subscriber::EnvFilter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing on stderr. `RUST_LOG` wins over the default filter;
/// calling this twice is harmless.
pub fn init_tracing(debug: bool) {
    let default = if debug {
        "setter_core=debug,setter_expand=debug"
    } else {
        "setter_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse `source` and expand it with the standard registry
pub fn expand_str(source: &str) -> std::result::Result<Expansion, ParseError> {
    let file = parse_source(source)?;
    Ok(expand_source(&file, &MacroRegistry::standard()))
}

/// Error types for operations that touch the outside world
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Front end rejected the input
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for setter-core operations
pub type Result<T> = std::result::Result<T, Error>;
