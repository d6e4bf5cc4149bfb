//! Property inspection
//!
//! Classifies a declaration as transformable or not. Rules run in a fixed
//! order and the first failure wins:
//!
//! 1. the declaration is a variable declaration
//! 2. it is declared with `var`
//! 3. per binding, in source order:
//!    a simple identifier, an explicit type annotation, and either no
//!    accessors, observers only, or an explicit `set`.

use tracing::{debug, trace};

use crate::{
    error::SetterError,
    syntax::{
        AccessorBlock, AccessorKind, Binding, BindingSpecifier, Decl, Identifier, Keyword,
        Pattern, TypeExpr, VariableDecl, Visibility,
    },
};

/// Facts about one binding that passed every rule.
///
/// Only [`inspect`] constructs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProperty {
    identifier: Identifier,
    ty: TypeExpr,
    visibility: Option<Visibility>,
}

impl ValidatedProperty {
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn ty(&self) -> &TypeExpr {
        &self.ty
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.visibility
    }

    pub(crate) fn into_parts(self) -> (Identifier, TypeExpr, Option<Visibility>) {
        (self.identifier, self.ty, self.visibility)
    }
}

/// What the binding pattern names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierFact<'a> {
    Simple(&'a Identifier),
    Complex,
}

/// Whether the binding spells out its type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFact<'a> {
    Explicit(&'a TypeExpr),
    Missing,
}

/// Storage shape implied by the accessor block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorShape {
    /// No accessor block, or an empty one
    Stored,
    /// Only `willSet`/`didSet`
    ObserversOnly,
    /// Contains an explicit `set`
    WithSetter,
    /// Getter only, or implicit getter shorthand
    Computed,
}

pub fn identifier_fact(binding: &Binding) -> IdentifierFact<'_> {
    match &binding.pattern {
        Pattern::Identifier(name) => IdentifierFact::Simple(name),
        Pattern::Tuple(_) | Pattern::Wildcard => IdentifierFact::Complex,
    }
}

pub fn type_fact(binding: &Binding) -> TypeFact<'_> {
    match &binding.type_annotation {
        Some(ty) => TypeFact::Explicit(ty),
        None => TypeFact::Missing,
    }
}

pub fn accessor_shape(binding: &Binding) -> AccessorShape {
    match &binding.accessors {
        None => AccessorShape::Stored,
        Some(AccessorBlock::Getter(_)) => AccessorShape::Computed,
        Some(AccessorBlock::Accessors(accessors)) if accessors.is_empty() => AccessorShape::Stored,
        Some(AccessorBlock::Accessors(accessors)) => {
            if accessors.iter().any(|a| a.kind == AccessorKind::Set) {
                AccessorShape::WithSetter
            } else if accessors.iter().all(|a| a.kind.is_observer()) {
                AccessorShape::ObserversOnly
            } else {
                AccessorShape::Computed
            }
        }
    }
}

/// Only `public` is carried over to the generated method
pub fn propagated_visibility(decl: &VariableDecl) -> Option<Visibility> {
    decl.modifiers
        .iter()
        .find(|m| m.keyword == Keyword::Public && m.detail.is_none())
        .map(|_| Visibility::Public)
}

fn as_variable(decl: &Decl) -> Result<&VariableDecl, SetterError> {
    match decl {
        Decl::Variable(variable) => Ok(variable),
        Decl::Function(_) | Decl::Type(_) | Decl::Other(_) => Err(SetterError::NotAVariable),
    }
}

fn ensure_settable(decl: &VariableDecl) -> Result<(), SetterError> {
    match decl.specifier {
        BindingSpecifier::Var => Ok(()),
        BindingSpecifier::Let => Err(SetterError::NotSettable),
    }
}

fn validate_binding(
    binding: &Binding,
    visibility: Option<Visibility>,
) -> Result<ValidatedProperty, SetterError> {
    let identifier = match identifier_fact(binding) {
        IdentifierFact::Simple(name) => name,
        IdentifierFact::Complex => return Err(SetterError::ComplexIdentifier),
    };

    let ty = match type_fact(binding) {
        TypeFact::Explicit(ty) => ty,
        TypeFact::Missing => return Err(SetterError::TypeMissing),
    };

    let shape = accessor_shape(binding);
    trace!(property = %identifier, ?shape, "accessor shape");
    if shape == AccessorShape::Computed {
        return Err(SetterError::Computed);
    }

    Ok(ValidatedProperty {
        identifier: identifier.clone(),
        ty: ty.clone(),
        visibility,
    })
}

/// Validate `decl` and return one [`ValidatedProperty`] per binding, in
/// source order. A declaration without bindings yields an empty vector.
pub fn inspect(decl: &Decl) -> Result<Vec<ValidatedProperty>, SetterError> {
    let variable = as_variable(decl).inspect_err(|_| {
        debug!(kind = decl.kind_name(), "rejected: not a variable declaration");
    })?;
    ensure_settable(variable)?;

    let visibility = propagated_visibility(variable);
    let properties = variable
        .bindings
        .iter()
        .map(|binding| validate_binding(binding, visibility))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = properties.len(), "declaration accepted");
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Accessor, CodeBlock, FunctionDeclBuilder, Modifier, Stmt};

    fn string_type() -> TypeExpr {
        TypeExpr::named("String")
    }

    fn var_decl(bindings: Vec<Binding>) -> Decl {
        Decl::Variable(VariableDecl::new(BindingSpecifier::Var, bindings))
    }

    fn body(line: &str) -> Option<CodeBlock> {
        Some(CodeBlock::new(vec![Stmt::Raw(line.to_string())]))
    }

    #[test]
    fn test_stored_property_is_accepted() {
        let decl = var_decl(vec![
            Binding::simple("text", Some(string_type())).with_initializer("\"\""),
        ]);

        let properties = inspect(&decl).unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].identifier().as_str(), "text");
        assert_eq!(properties[0].ty(), &string_type());
        assert_eq!(properties[0].visibility(), None);
    }

    #[test]
    fn test_function_is_not_a_variable() {
        let decl = Decl::Function(FunctionDeclBuilder::new(Identifier::new("text")).build());
        assert_eq!(inspect(&decl), Err(SetterError::NotAVariable));
    }

    #[test]
    fn test_let_is_not_settable_before_binding_rules() {
        // The binding would also fail TypeMissing; NotSettable comes first
        let decl = Decl::Variable(VariableDecl::new(
            BindingSpecifier::Let,
            vec![Binding::simple("text", None).with_initializer("\"foo\"")],
        ));
        assert_eq!(inspect(&decl), Err(SetterError::NotSettable));
    }

    #[test]
    fn test_tuple_pattern_is_complex() {
        let decl = var_decl(vec![Binding {
            type_annotation: Some(TypeExpr::named("Int")),
            ..Binding::new(Pattern::Tuple(vec![
                Pattern::Identifier(Identifier::new("a")),
                Pattern::Identifier(Identifier::new("b")),
            ]))
        }]);
        assert_eq!(inspect(&decl), Err(SetterError::ComplexIdentifier));

        let wildcard = var_decl(vec![Binding::new(Pattern::Wildcard)]);
        assert_eq!(inspect(&wildcard), Err(SetterError::ComplexIdentifier));
    }

    #[test]
    fn test_initializer_does_not_replace_type_annotation() {
        let decl = var_decl(vec![Binding::simple("text", None).with_initializer("\"\"")]);
        assert_eq!(inspect(&decl), Err(SetterError::TypeMissing));
    }

    #[test]
    fn test_getter_only_is_computed() {
        let implicit = var_decl(vec![Binding::simple("text", Some(string_type()))
            .with_accessors(AccessorBlock::Getter(CodeBlock::new(vec![Stmt::Raw(
                "\"foo\"".to_string(),
            )])))]);
        assert_eq!(inspect(&implicit), Err(SetterError::Computed));

        let explicit = var_decl(vec![Binding::simple("text", Some(string_type()))
            .with_accessors(AccessorBlock::Accessors(vec![Accessor::new(
                AccessorKind::Get,
                body("\"foo\""),
            )]))]);
        assert_eq!(inspect(&explicit), Err(SetterError::Computed));
    }

    #[test]
    fn test_getter_with_observer_is_still_computed() {
        let decl = var_decl(vec![Binding::simple("text", Some(string_type()))
            .with_accessors(AccessorBlock::Accessors(vec![
                Accessor::new(AccessorKind::Get, body("storage")),
                Accessor::new(AccessorKind::DidSet, body("refresh()")),
            ]))]);
        assert_eq!(inspect(&decl), Err(SetterError::Computed));
    }

    #[test]
    fn test_observers_and_setters_are_accepted() {
        let observed = var_decl(vec![Binding::simple("text", Some(string_type()))
            .with_initializer("\"\"")
            .with_accessors(AccessorBlock::Accessors(vec![
                Accessor::new(AccessorKind::WillSet, body("prepare()")),
                Accessor::new(AccessorKind::DidSet, body("refresh()")),
            ]))]);
        assert_eq!(inspect(&observed).map(|p| p.len()), Ok(1));

        let computed_with_setter = var_decl(vec![Binding::simple("text", Some(string_type()))
            .with_accessors(AccessorBlock::Accessors(vec![
                Accessor::new(AccessorKind::Get, body("storage")),
                Accessor::new(AccessorKind::Set, body("storage = newValue")),
            ]))]);
        assert_eq!(inspect(&computed_with_setter).map(|p| p.len()), Ok(1));

        let empty_block = Binding::simple("text", Some(string_type()))
            .with_accessors(AccessorBlock::Accessors(Vec::new()));
        assert_eq!(accessor_shape(&empty_block), AccessorShape::Stored);
        assert!(inspect(&var_decl(vec![empty_block])).is_ok());
    }

    #[test]
    fn test_multiple_bindings_in_order() {
        let decl = var_decl(vec![
            Binding::simple("a", Some(TypeExpr::named("Int"))),
            Binding::simple("b", Some(string_type())),
        ]);
        let names: Vec<_> = inspect(&decl)
            .unwrap()
            .iter()
            .map(|p| p.identifier().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_one_bad_binding_fails_the_declaration() {
        let decl = var_decl(vec![
            Binding::simple("a", Some(TypeExpr::named("Int"))),
            Binding::simple("b", None).with_initializer("1"),
        ]);
        assert_eq!(inspect(&decl), Err(SetterError::TypeMissing));
    }

    #[test]
    fn test_empty_declaration_yields_nothing() {
        assert_eq!(inspect(&var_decl(Vec::new())), Ok(Vec::new()));
    }

    #[test]
    fn test_visibility_propagation() {
        let binding = Binding::simple("text", Some(string_type()));

        let public = Decl::Variable(
            VariableDecl::new(BindingSpecifier::Var, vec![binding.clone()])
                .with_modifier(Keyword::Public),
        );
        assert_eq!(
            inspect(&public).unwrap()[0].visibility(),
            Some(Visibility::Public)
        );

        let private = Decl::Variable(
            VariableDecl::new(BindingSpecifier::Var, vec![binding.clone()])
                .with_modifier(Keyword::Private),
        );
        assert_eq!(inspect(&private).unwrap()[0].visibility(), None);

        let mut setter_only = VariableDecl::new(BindingSpecifier::Var, vec![binding]);
        setter_only.modifiers.push(Modifier {
            keyword: Keyword::Public,
            detail: Some("set".to_string()),
        });
        assert_eq!(
            inspect(&Decl::Variable(setter_only)).unwrap()[0].visibility(),
            None
        );
    }
}
