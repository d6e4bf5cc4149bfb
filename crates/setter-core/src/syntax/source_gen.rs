// Source code generation from the syntax tree
// Declarations are printed one per line with nesting handled by SourceWriter;
// types, patterns and expressions print inline.

use serde::{Deserialize, Serialize};

use super::*;

/// Printer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceGenConfig {
    /// Spaces per nesting level
    pub indent_width: usize,
}

impl Default for SourceGenConfig {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

/// Line-oriented output buffer that tracks nesting depth
pub struct SourceWriter<'c> {
    config: &'c SourceGenConfig,
    depth: usize,
    out: String,
    line: String,
}

impl<'c> SourceWriter<'c> {
    pub fn new(config: &'c SourceGenConfig) -> Self {
        Self {
            config,
            depth: 0,
            out: String::new(),
            line: String::new(),
        }
    }

    /// Append to the current line
    pub fn text(&mut self, text: &str) {
        self.line.push_str(text);
    }

    /// Finish the current line. An empty line is written without indentation.
    pub fn newline(&mut self) {
        if !self.line.is_empty() {
            self.push_indent();
            self.out.push_str(&self.line);
            self.line.clear();
        }
        self.out.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn finish(mut self) -> String {
        if !self.line.is_empty() {
            self.push_indent();
            self.out.push_str(&self.line);
        }
        self.out
    }

    fn push_indent(&mut self) {
        let width = self.depth * self.config.indent_width;
        self.out.extend(std::iter::repeat(' ').take(width));
    }
}

/// Trait for nodes that can print their source representation
pub trait ToSource {
    fn write_source(&self, out: &mut SourceWriter<'_>);

    fn to_source(&self) -> String {
        self.to_source_with(&SourceGenConfig::default())
    }

    fn to_source_with(&self, config: &SourceGenConfig) -> String {
        let mut writer = SourceWriter::new(config);
        self.write_source(&mut writer);
        writer.finish()
    }
}

fn write_attributes(attributes: &[Attribute], out: &mut SourceWriter<'_>) {
    for attribute in attributes {
        attribute.write_source(out);
        out.newline();
    }
}

fn write_comment_lines(lines: &[String], out: &mut SourceWriter<'_>) {
    for line in lines {
        out.text(line);
        out.newline();
    }
}

// Ends the declaration's last line, keeping a same-line comment
fn end_line(comments: &Comments, out: &mut SourceWriter<'_>) {
    if let Some(trailing) = &comments.trailing {
        out.text(" ");
        out.text(trailing);
    }
    out.newline();
}

fn write_modifiers(modifiers: &[Modifier], out: &mut SourceWriter<'_>) {
    for modifier in modifiers {
        modifier.write_source(out);
        out.text(" ");
    }
}

fn write_separated<T: ToSource>(items: &[T], separator: &str, out: &mut SourceWriter<'_>) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.text(separator);
        }
        item.write_source(out);
    }
}

fn write_block(block: &CodeBlock, out: &mut SourceWriter<'_>) {
    if block.statements.is_empty() {
        out.text(" {}");
        return;
    }
    out.text(" {");
    out.newline();
    out.indent();
    for statement in &block.statements {
        statement.write_source(out);
        out.newline();
    }
    out.dedent();
    out.text("}");
}

fn write_members(members: &[Decl], out: &mut SourceWriter<'_>) {
    for (i, member) in members.iter().enumerate() {
        if i > 0 && member.leading_blank_line() {
            out.newline();
        }
        member.write_source(out);
    }
}

impl ToSource for SourceFile {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        write_members(&self.members, out);
        write_comment_lines(&self.trailing_comments, out);
    }
}

impl ToSource for Decl {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        match self {
            Decl::Variable(d) => d.write_source(out),
            Decl::Function(d) => d.write_source(out),
            Decl::Type(d) => d.write_source(out),
            Decl::Other(d) => d.write_source(out),
        }
    }
}

impl ToSource for VariableDecl {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        write_comment_lines(&self.comments.leading, out);
        write_attributes(&self.attributes, out);
        write_modifiers(&self.modifiers, out);
        out.text(self.specifier.as_str());
        out.text(" ");
        write_separated(&self.bindings, ", ", out);
        end_line(&self.comments, out);
    }
}

impl ToSource for Binding {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        self.pattern.write_source(out);
        if let Some(ty) = &self.type_annotation {
            out.text(": ");
            ty.write_source(out);
        }
        if let Some(initializer) = &self.initializer {
            out.text(" = ");
            initializer.write_source(out);
        }
        if let Some(accessors) = &self.accessors {
            accessors.write_source(out);
        }
    }
}

impl ToSource for AccessorBlock {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        match self {
            AccessorBlock::Getter(block) => write_block(block, out),
            AccessorBlock::Accessors(accessors) if accessors.is_empty() => out.text(" {}"),
            AccessorBlock::Accessors(accessors) if accessors.iter().all(|a| a.body.is_none()) => {
                out.text(" {");
                for accessor in accessors {
                    out.text(" ");
                    accessor.write_source(out);
                }
                out.text(" }");
            }
            AccessorBlock::Accessors(accessors) => {
                out.text(" {");
                out.newline();
                out.indent();
                for accessor in accessors {
                    accessor.write_source(out);
                    out.newline();
                }
                out.dedent();
                out.text("}");
            }
        }
    }
}

impl ToSource for Accessor {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        out.text(self.kind.as_str());
        if let Some(parameter) = &self.parameter {
            out.text(&format!("({parameter})"));
        }
        if let Some(body) = &self.body {
            write_block(body, out);
        }
    }
}

impl ToSource for FunctionDecl {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        write_comment_lines(&self.comments.leading, out);
        write_attributes(&self.attributes, out);
        write_modifiers(&self.modifiers, out);
        out.text("func ");
        out.text(self.name.as_str());
        if let Some(generics) = &self.generic_params {
            out.text(&format!("<{generics}>"));
        }
        out.text("(");
        write_separated(&self.parameters, ", ", out);
        out.text(")");
        for effect in &self.effects {
            out.text(" ");
            out.text(effect);
        }
        if let Some(return_type) = &self.return_type {
            out.text(" -> ");
            return_type.write_source(out);
        }
        if let Some(where_clause) = &self.where_clause {
            out.text(" where ");
            out.text(where_clause);
        }
        if let Some(body) = &self.body {
            write_block(body, out);
        }
        end_line(&self.comments, out);
    }
}

impl ToSource for TypeDecl {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        write_comment_lines(&self.comments.leading, out);
        write_attributes(&self.attributes, out);
        write_modifiers(&self.modifiers, out);
        out.text(self.kind.as_str());
        out.text(" ");
        out.text(&self.name);
        if let Some(clause) = &self.clause {
            if !clause.starts_with(':') {
                out.text(" ");
            }
            out.text(clause);
        }
        if self.members.is_empty() && self.closing_comments.is_empty() {
            out.text(" {}");
        } else {
            out.text(" {");
            out.newline();
            out.indent();
            write_members(&self.members, out);
            write_comment_lines(&self.closing_comments, out);
            out.dedent();
            out.text("}");
        }
        end_line(&self.comments, out);
    }
}

impl ToSource for OtherDecl {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        write_comment_lines(&self.comments.leading, out);
        write_attributes(&self.attributes, out);
        write_modifiers(&self.modifiers, out);
        if let Some((last, lines)) = self.lines.split_last() {
            write_comment_lines(lines, out);
            out.text(last);
        }
        end_line(&self.comments, out);
    }
}

impl ToSource for Attribute {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        out.text("@");
        out.text(&self.name);
        if let Some(arguments) = &self.arguments {
            out.text(&format!("({arguments})"));
        }
    }
}

impl ToSource for Modifier {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        out.text(self.keyword.as_str());
        if let Some(detail) = &self.detail {
            out.text(&format!("({detail})"));
        }
    }
}

impl ToSource for Pattern {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        match self {
            Pattern::Identifier(name) => out.text(name.as_str()),
            Pattern::Tuple(elements) => {
                out.text("(");
                write_separated(elements, ", ", out);
                out.text(")");
            }
            Pattern::Wildcard => out.text("_"),
        }
    }
}

impl ToSource for Parameter {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        if let Some(label) = &self.label {
            out.text(label);
            out.text(" ");
        }
        out.text(self.name.as_str());
        out.text(": ");
        if let Some(specifier) = &self.specifier {
            out.text(specifier);
            out.text(" ");
        }
        self.ty.write_source(out);
        if self.variadic {
            out.text("...");
        }
        if let Some(default) = &self.default {
            out.text(" = ");
            default.write_source(out);
        }
    }
}

impl ToSource for TypeExpr {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        match self {
            TypeExpr::Named(segments) => write_separated(segments, ".", out),
            TypeExpr::Optional(inner) => {
                write_wrapped(inner, out);
                out.text("?");
            }
            TypeExpr::ImplicitlyUnwrapped(inner) => {
                write_wrapped(inner, out);
                out.text("!");
            }
            TypeExpr::Array(element) => {
                out.text("[");
                element.write_source(out);
                out.text("]");
            }
            TypeExpr::Dictionary { key, value } => {
                out.text("[");
                key.write_source(out);
                out.text(": ");
                value.write_source(out);
                out.text("]");
            }
            TypeExpr::Tuple(elements) => {
                out.text("(");
                write_separated(elements, ", ", out);
                out.text(")");
            }
            TypeExpr::Function {
                params,
                effects,
                result,
            } => {
                out.text("(");
                write_separated(params, ", ", out);
                out.text(")");
                for effect in effects {
                    out.text(" ");
                    out.text(effect);
                }
                out.text(" -> ");
                result.write_source(out);
            }
            TypeExpr::Opaque { keyword, base } => {
                out.text(keyword);
                out.text(" ");
                base.write_source(out);
            }
            TypeExpr::Attributed { attributes, base } => {
                for attribute in attributes {
                    out.text(attribute);
                    out.text(" ");
                }
                base.write_source(out);
            }
        }
    }
}

// Postfix `?`/`!` binds tighter than function arrows and prefixes
fn write_wrapped(inner: &TypeExpr, out: &mut SourceWriter<'_>) {
    let needs_parens = matches!(
        inner,
        TypeExpr::Function { .. } | TypeExpr::Opaque { .. } | TypeExpr::Attributed { .. }
    );
    if needs_parens {
        out.text("(");
        inner.write_source(out);
        out.text(")");
    } else {
        inner.write_source(out);
    }
}

impl ToSource for TypeSegment {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        out.text(&self.name);
        if !self.generic_args.is_empty() {
            out.text("<");
            write_separated(&self.generic_args, ", ", out);
            out.text(">");
        }
    }
}

impl ToSource for TupleTypeElement {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        if let Some(label) = &self.label {
            out.text(label);
            out.text(": ");
        }
        self.ty.write_source(out);
    }
}

impl ToSource for Expr {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        match self {
            Expr::Identifier(name) => out.text(name.as_str()),
            Expr::SelfRef => out.text("self"),
            Expr::Member { base, member } => {
                base.write_source(out);
                out.text(".");
                out.text(member.as_str());
            }
            Expr::Raw(text) => out.text(text),
        }
    }
}

impl ToSource for Stmt {
    fn write_source(&self, out: &mut SourceWriter<'_>) {
        match self {
            Stmt::Assign { target, value } => {
                target.write_source(out);
                out.text(" = ");
                value.write_source(out);
            }
            Stmt::Return(None) => out.text("return"),
            Stmt::Return(Some(value)) => {
                out.text("return ");
                value.write_source(out);
            }
            Stmt::Expr(expr) => expr.write_source(out),
            Stmt::Raw(text) => out.text(text),
        }
    }
}
