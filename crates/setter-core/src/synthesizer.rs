// Setter synthesis
// Builds the chainable setter for a validated property:
//
//     @discardableResult
//     public func text(_ text: String) -> Self {
//         self.text = text
//         return self
//     }

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    inspector::ValidatedProperty,
    syntax::{
        Attribute, Decl, Expr, FunctionDecl, FunctionDeclBuilder, Modifier, Parameter, Stmt,
        TypeExpr,
    },
};

/// Attribute telling call sites the returned `Self` may be ignored
pub const DISCARDABLE_RESULT: &str = "discardableResult";

/// A synthesized setter declaration, owned by the caller once returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedMethod {
    decl: FunctionDecl,
}

impl GeneratedMethod {
    pub fn as_decl(&self) -> &FunctionDecl {
        &self.decl
    }

    pub fn into_decl(self) -> FunctionDecl {
        self.decl
    }
}

impl From<GeneratedMethod> for Decl {
    fn from(method: GeneratedMethod) -> Self {
        Decl::Function(method.decl)
    }
}

pub fn synthesize(property: ValidatedProperty) -> GeneratedMethod {
    let (identifier, ty, visibility) = property.into_parts();
    trace!(property = %identifier, "synthesizing setter");

    let mut builder = FunctionDeclBuilder::new(identifier.clone())
        .attribute(Attribute::new(DISCARDABLE_RESULT))
        .parameter(Parameter::unlabeled(identifier.clone(), ty))
        .returns(TypeExpr::self_type())
        .statement(Stmt::assign(
            Expr::self_member(identifier.clone()),
            Expr::identifier(identifier),
        ))
        .statement(Stmt::return_self())
        .leading_blank_line(true);

    if let Some(visibility) = visibility {
        builder = builder.modifier(Modifier::visibility(visibility));
    }

    GeneratedMethod {
        decl: builder.build(),
    }
}

pub fn synthesize_all(properties: Vec<ValidatedProperty>) -> Vec<GeneratedMethod> {
    properties.into_iter().map(synthesize).collect()
}
