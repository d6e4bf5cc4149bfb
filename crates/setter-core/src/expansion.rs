//! The `@setterFunction` peer macro
//!
//! ```swift
//! @setterFunction
//! var someText: String = ""
//! ```
//!
//! expands to
//!
//! ```swift
//! var someText: String = ""
//!
//! @discardableResult
//! func someText(_ someText: String) -> Self {
//!     self.someText = someText
//!     return self
//! }
//! ```

use tracing::debug;

use crate::{
    diagnostic::{Diagnostic, ExpansionContext},
    error::SetterError,
    inspector::inspect,
    synthesizer::synthesize_all,
    syntax::{Attribute, Decl},
};

/// Attribute name the setter macro is registered under
pub const SETTER_FUNCTION: &str = "setterFunction";

/// A macro that produces declarations placed next to the one it annotates
pub trait PeerMacro: Send + Sync {
    /// Attribute name without the `@`
    fn name(&self) -> &'static str;

    /// Expand `declaration`. Failures are reported to `context` against the
    /// attribute's span and returned; no peers are produced on failure.
    fn expansion(
        &self,
        attribute: &Attribute,
        declaration: &Decl,
        context: &mut dyn ExpansionContext,
    ) -> Result<Vec<Decl>, SetterError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SetterFunctionMacro;

impl PeerMacro for SetterFunctionMacro {
    fn name(&self) -> &'static str {
        SETTER_FUNCTION
    }

    fn expansion(
        &self,
        attribute: &Attribute,
        declaration: &Decl,
        context: &mut dyn ExpansionContext,
    ) -> Result<Vec<Decl>, SetterError> {
        match inspect(declaration) {
            Ok(properties) => Ok(synthesize_all(properties)
                .into_iter()
                .map(Decl::from)
                .collect()),
            Err(error) => {
                debug!(%error, "expansion failed");
                context.diagnose(Diagnostic::error(error, attribute.span));
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostic::DiagnosticCollector,
        syntax::{Binding, BindingSpecifier, Span, ToSource, TypeExpr, VariableDecl},
    };

    fn attribute() -> Attribute {
        Attribute {
            span: Span::new(4, 19),
            ..Attribute::new(SETTER_FUNCTION)
        }
    }

    #[test]
    fn test_success_produces_peers_without_diagnostics() {
        let decl = Decl::Variable(VariableDecl::new(
            BindingSpecifier::Var,
            vec![
                Binding::simple("a", Some(TypeExpr::named("Int"))),
                Binding::simple("b", Some(TypeExpr::named("Int"))),
            ],
        ));
        let mut context = DiagnosticCollector::new();

        let peers = SetterFunctionMacro
            .expansion(&attribute(), &decl, &mut context)
            .unwrap();

        assert_eq!(peers.len(), 2);
        assert!(peers[1].to_source().starts_with("@discardableResult\nfunc b(_ b: Int)"));
        assert!(context.diagnostics().is_empty());
    }

    #[test]
    fn test_failure_is_reported_at_attribute_span() {
        let decl = Decl::Variable(VariableDecl::new(
            BindingSpecifier::Var,
            vec![Binding::simple("text", None).with_initializer("\"\"")],
        ));
        let mut context = DiagnosticCollector::new();

        let result = SetterFunctionMacro.expansion(&attribute(), &decl, &mut context);

        assert_eq!(result, Err(SetterError::TypeMissing));
        assert_eq!(
            context.diagnostics(),
            &[Diagnostic::error(SetterError::TypeMissing, Span::new(4, 19))]
        );
    }
}
