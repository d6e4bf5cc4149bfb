// Syntax tree for Swift-style member declarations
// The front end produces it, the macro consumes and synthesizes it, and
// source_gen prints it back out.

pub mod builder;
pub mod source_gen;

pub use builder::FunctionDeclBuilder;
pub use source_gen::{SourceGenConfig, SourceWriter, ToSource};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Byte range into the original source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-based line and column of the span start within `source`.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let start = self.start.min(source.len());
        let before = source.get(..start).unwrap_or("");
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

/// A simple name as written in source, backticks included
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// `@name` or `@name(arguments)` attached to a declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// Raw text between the parentheses, if any
    pub arguments: Option<String>,
    pub span: Span,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
            span: Span::default(),
        }
    }
}

/// Declaration modifier keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Open,
    Public,
    Package,
    Internal,
    Fileprivate,
    Private,
    Static,
    Class,
    Final,
    Override,
    Lazy,
    Weak,
    Unowned,
    Mutating,
    Nonmutating,
    Dynamic,
    Required,
    Convenience,
    Optional,
    Nonisolated,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "open" => Keyword::Open,
            "public" => Keyword::Public,
            "package" => Keyword::Package,
            "internal" => Keyword::Internal,
            "fileprivate" => Keyword::Fileprivate,
            "private" => Keyword::Private,
            "static" => Keyword::Static,
            "class" => Keyword::Class,
            "final" => Keyword::Final,
            "override" => Keyword::Override,
            "lazy" => Keyword::Lazy,
            "weak" => Keyword::Weak,
            "unowned" => Keyword::Unowned,
            "mutating" => Keyword::Mutating,
            "nonmutating" => Keyword::Nonmutating,
            "dynamic" => Keyword::Dynamic,
            "required" => Keyword::Required,
            "convenience" => Keyword::Convenience,
            "optional" => Keyword::Optional,
            "nonisolated" => Keyword::Nonisolated,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Open => "open",
            Keyword::Public => "public",
            Keyword::Package => "package",
            Keyword::Internal => "internal",
            Keyword::Fileprivate => "fileprivate",
            Keyword::Private => "private",
            Keyword::Static => "static",
            Keyword::Class => "class",
            Keyword::Final => "final",
            Keyword::Override => "override",
            Keyword::Lazy => "lazy",
            Keyword::Weak => "weak",
            Keyword::Unowned => "unowned",
            Keyword::Mutating => "mutating",
            Keyword::Nonmutating => "nonmutating",
            Keyword::Dynamic => "dynamic",
            Keyword::Required => "required",
            Keyword::Convenience => "convenience",
            Keyword::Optional => "optional",
            Keyword::Nonisolated => "nonisolated",
        }
    }
}

/// Access levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Open,
    Public,
    Package,
    Internal,
    Fileprivate,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> Keyword {
        match self {
            Visibility::Open => Keyword::Open,
            Visibility::Public => Keyword::Public,
            Visibility::Package => Keyword::Package,
            Visibility::Internal => Keyword::Internal,
            Visibility::Fileprivate => Keyword::Fileprivate,
            Visibility::Private => Keyword::Private,
        }
    }
}

/// A modifier such as `public`, `static` or `private(set)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub keyword: Keyword,
    /// Parenthesised detail, e.g. `set` in `private(set)`
    pub detail: Option<String>,
}

impl Modifier {
    pub fn new(keyword: Keyword) -> Self {
        Self {
            keyword,
            detail: None,
        }
    }

    pub fn visibility(visibility: Visibility) -> Self {
        Self::new(visibility.keyword())
    }
}

/// A type expression, kept structurally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeExpr {
    /// `Foo`, `Swift.Array<Int>`, `Self`
    Named(Vec<TypeSegment>),
    /// `T?`
    Optional(Box<TypeExpr>),
    /// `T!`
    ImplicitlyUnwrapped(Box<TypeExpr>),
    /// `[T]`
    Array(Box<TypeExpr>),
    /// `[K: V]`
    Dictionary {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `(T, label: U)`; a single unlabeled element is a parenthesised type
    Tuple(Vec<TupleTypeElement>),
    /// `(T) async throws -> U`
    Function {
        params: Vec<TupleTypeElement>,
        effects: Vec<String>,
        result: Box<TypeExpr>,
    },
    /// `some P` / `any P`
    Opaque { keyword: String, base: Box<TypeExpr> },
    /// `@escaping T`
    Attributed {
        attributes: Vec<String>,
        base: Box<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(vec![TypeSegment::new(name)])
    }

    /// The covariant `Self` type
    pub fn self_type() -> Self {
        Self::named("Self")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSegment {
    pub name: String,
    pub generic_args: Vec<TypeExpr>,
}

impl TypeSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleTypeElement {
    pub label: Option<String>,
    pub ty: TypeExpr,
}

/// Expressions. Parsed initializers stay opaque; the synthesizer builds the
/// structural forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Identifier(Identifier),
    /// `self`
    SelfRef,
    /// `base.member`
    Member {
        base: Box<Expr>,
        member: Identifier,
    },
    /// Source text kept verbatim
    Raw(String),
}

impl Expr {
    pub fn identifier(name: Identifier) -> Self {
        Expr::Identifier(name)
    }

    /// `self.<member>`
    pub fn self_member(member: Identifier) -> Self {
        Expr::Member {
            base: Box::new(Expr::SelfRef),
            member,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stmt {
    /// `target = value`
    Assign { target: Expr, value: Expr },
    /// `return` / `return value`
    Return(Option<Expr>),
    Expr(Expr),
    /// One source line, indentation relative to the enclosing block
    Raw(String),
}

impl Stmt {
    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }

    pub fn return_self() -> Self {
        Stmt::Return(Some(Expr::SelfRef))
    }
}

/// `{ ... }` statement list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeBlock {
    pub statements: Vec<Stmt>,
}

impl CodeBlock {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingSpecifier {
    Var,
    Let,
}

impl BindingSpecifier {
    pub fn as_str(self) -> &'static str {
        match self {
            BindingSpecifier::Var => "var",
            BindingSpecifier::Let => "let",
        }
    }
}

/// Binding pattern of a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Identifier(Identifier),
    Tuple(Vec<Pattern>),
    Wildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessorKind {
    Get,
    Set,
    WillSet,
    DidSet,
}

impl AccessorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::WillSet => "willSet",
            AccessorKind::DidSet => "didSet",
        }
    }

    /// willSet/didSet observe a stored property instead of replacing it
    pub fn is_observer(self) -> bool {
        matches!(self, AccessorKind::WillSet | AccessorKind::DidSet)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessor {
    pub kind: AccessorKind,
    /// `newValue` in `set(newValue)`
    pub parameter: Option<String>,
    /// Absent in protocol requirements such as `{ get set }`
    pub body: Option<CodeBlock>,
}

impl Accessor {
    pub fn new(kind: AccessorKind, body: Option<CodeBlock>) -> Self {
        Self {
            kind,
            parameter: None,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorBlock {
    /// Explicit accessor list
    Accessors(Vec<Accessor>),
    /// `var x: T { expr }` shorthand for a lone getter
    Getter(CodeBlock),
}

/// One name declared by a `var`/`let`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub pattern: Pattern,
    pub type_annotation: Option<TypeExpr>,
    pub initializer: Option<Expr>,
    pub accessors: Option<AccessorBlock>,
}

impl Binding {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            type_annotation: None,
            initializer: None,
            accessors: None,
        }
    }

    pub fn simple(name: &str, ty: Option<TypeExpr>) -> Self {
        Self {
            type_annotation: ty,
            ..Self::new(Pattern::Identifier(Identifier::new(name)))
        }
    }

    pub fn with_initializer(mut self, text: impl Into<String>) -> Self {
        self.initializer = Some(Expr::Raw(text.into()));
        self
    }

    pub fn with_accessors(mut self, accessors: AccessorBlock) -> Self {
        self.accessors = Some(accessors);
        self
    }
}

/// Comments the front end keeps with a declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comments {
    /// Comment lines above the declaration, including any found among its
    /// attributes and modifiers
    pub leading: Vec<String>,
    /// Comment on the same line as the end of the declaration
    pub trailing: Option<String>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_none()
    }
}

/// A `var`/`let` statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub specifier: BindingSpecifier,
    pub bindings: Vec<Binding>,
    pub span: Span,
    pub leading_blank_line: bool,
    #[serde(default)]
    pub comments: Comments,
}

impl VariableDecl {
    pub fn new(specifier: BindingSpecifier, bindings: Vec<Binding>) -> Self {
        Self {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            specifier,
            bindings,
            span: Span::default(),
            leading_blank_line: false,
            comments: Comments::default(),
        }
    }

    pub fn with_modifier(mut self, keyword: Keyword) -> Self {
        self.modifiers.push(Modifier::new(keyword));
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// A function parameter: `label name: Type = default`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// External label; `_` suppresses it, `None` reuses the name
    pub label: Option<String>,
    pub name: Identifier,
    /// `inout`, `borrowing`, `consuming`
    pub specifier: Option<String>,
    pub ty: TypeExpr,
    pub variadic: bool,
    pub default: Option<Expr>,
}

impl Parameter {
    /// `_ name: Type`
    pub fn unlabeled(name: Identifier, ty: TypeExpr) -> Self {
        Self {
            label: Some("_".to_string()),
            name,
            specifier: None,
            ty,
            variadic: false,
            default: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub name: Identifier,
    /// Raw text inside `<...>`
    pub generic_params: Option<String>,
    pub parameters: Vec<Parameter>,
    pub effects: Vec<String>,
    pub return_type: Option<TypeExpr>,
    /// Raw text after `where`
    pub where_clause: Option<String>,
    pub body: Option<CodeBlock>,
    pub span: Span,
    pub leading_blank_line: bool,
    #[serde(default)]
    pub comments: Comments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Struct,
    Enum,
    Extension,
    Actor,
    Protocol,
}

impl TypeKind {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "class" => Some(TypeKind::Class),
            "struct" => Some(TypeKind::Struct),
            "enum" => Some(TypeKind::Enum),
            "extension" => Some(TypeKind::Extension),
            "actor" => Some(TypeKind::Actor),
            "protocol" => Some(TypeKind::Protocol),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Extension => "extension",
            TypeKind::Actor => "actor",
            TypeKind::Protocol => "protocol",
        }
    }
}

/// class/struct/enum/extension/actor/protocol with its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub kind: TypeKind,
    /// Name including generic parameters
    pub name: String,
    /// Raw inheritance and where clause, e.g. `: Base, P`
    pub clause: Option<String>,
    pub members: Vec<Decl>,
    /// Comment lines after the last member, before the closing brace
    #[serde(default)]
    pub closing_comments: Vec<String>,
    pub span: Span,
    pub leading_blank_line: bool,
    #[serde(default)]
    pub comments: Comments,
}

/// Any member the front end does not model, kept line by line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    /// First line, then continuation lines relative to the member's column
    pub lines: Vec<String>,
    pub span: Span,
    pub leading_blank_line: bool,
    #[serde(default)]
    pub comments: Comments,
}

/// Closed set of declaration kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Variable(VariableDecl),
    Function(FunctionDecl),
    Type(TypeDecl),
    Other(OtherDecl),
}

impl Decl {
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Decl::Variable(d) => &d.attributes,
            Decl::Function(d) => &d.attributes,
            Decl::Type(d) => &d.attributes,
            Decl::Other(d) => &d.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
        match self {
            Decl::Variable(d) => &mut d.attributes,
            Decl::Function(d) => &mut d.attributes,
            Decl::Type(d) => &mut d.attributes,
            Decl::Other(d) => &mut d.attributes,
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Decl::Variable(d) => &d.modifiers,
            Decl::Function(d) => &d.modifiers,
            Decl::Type(d) => &d.modifiers,
            Decl::Other(d) => &d.modifiers,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Decl::Variable(d) => d.span,
            Decl::Function(d) => d.span,
            Decl::Type(d) => d.span,
            Decl::Other(d) => d.span,
        }
    }

    pub fn leading_blank_line(&self) -> bool {
        match self {
            Decl::Variable(d) => d.leading_blank_line,
            Decl::Function(d) => d.leading_blank_line,
            Decl::Type(d) => d.leading_blank_line,
            Decl::Other(d) => d.leading_blank_line,
        }
    }

    pub fn comments(&self) -> &Comments {
        match self {
            Decl::Variable(d) => &d.comments,
            Decl::Function(d) => &d.comments,
            Decl::Type(d) => &d.comments,
            Decl::Other(d) => &d.comments,
        }
    }

    pub fn comments_mut(&mut self) -> &mut Comments {
        match self {
            Decl::Variable(d) => &mut d.comments,
            Decl::Function(d) => &mut d.comments,
            Decl::Type(d) => &mut d.comments,
            Decl::Other(d) => &mut d.comments,
        }
    }

    /// Short name of the declaration kind, for logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Variable(d) => d.specifier.as_str(),
            Decl::Function(_) => "func",
            Decl::Type(d) => d.kind.as_str(),
            Decl::Other(_) => "other",
        }
    }
}

/// A parsed source unit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub members: Vec<Decl>,
    /// Comment lines after the last member
    #[serde(default)]
    pub trailing_comments: Vec<String>,
}
