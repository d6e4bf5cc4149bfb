// Field-by-field construction of function declarations

use super::{
    Attribute, CodeBlock, Comments, FunctionDecl, Identifier, Modifier, Parameter, Span, Stmt,
    TypeExpr,
};

/// Assembles a [`FunctionDecl`] without going through source text.
///
/// ```
/// use setter_core::syntax::{FunctionDeclBuilder, Identifier, Stmt, ToSource, TypeExpr};
///
/// let decl = FunctionDeclBuilder::new(Identifier::new("reset"))
///     .returns(TypeExpr::self_type())
///     .statement(Stmt::return_self())
///     .build();
/// assert_eq!(decl.to_source(), "func reset() -> Self {\n    return self\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct FunctionDeclBuilder {
    decl: FunctionDecl,
}

impl FunctionDeclBuilder {
    pub fn new(name: Identifier) -> Self {
        Self {
            decl: FunctionDecl {
                attributes: Vec::new(),
                modifiers: Vec::new(),
                name,
                generic_params: None,
                parameters: Vec::new(),
                effects: Vec::new(),
                return_type: None,
                where_clause: None,
                body: Some(CodeBlock::default()),
                span: Span::default(),
                leading_blank_line: false,
                comments: Comments::default(),
            },
        }
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.decl.attributes.push(attribute);
        self
    }

    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.decl.modifiers.push(modifier);
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.decl.parameters.push(parameter);
        self
    }

    pub fn returns(mut self, ty: TypeExpr) -> Self {
        self.decl.return_type = Some(ty);
        self
    }

    pub fn statement(mut self, statement: Stmt) -> Self {
        self.decl
            .body
            .get_or_insert_with(CodeBlock::default)
            .statements
            .push(statement);
        self
    }

    /// Separate the declaration from whatever precedes it by an empty line
    pub fn leading_blank_line(mut self, blank: bool) -> Self {
        self.decl.leading_blank_line = blank;
        self
    }

    pub fn build(self) -> FunctionDecl {
        self.decl
    }
}
