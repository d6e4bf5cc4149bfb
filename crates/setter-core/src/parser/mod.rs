//! Front end for Swift-style member declarations, using nom
//!
//! Only the shapes the macro host needs are modelled structurally; statement
//! bodies and initializer expressions are kept as text.
//!
//! # Grammar
//!
//! ```ebnf
//! source      = { gap, member, [ comment ] }, gap;
//! gap         = { whitespace | comment | ";" };
//! member      = { attribute }, { modifier }, ( variable | function | type | other );
//! attribute   = "@", identifier, [ "(", balanced, ")" ];
//! modifier    = keyword, [ "(", identifier, ")" ];
//!
//! variable    = ( "var" | "let" ), binding, { ",", binding };
//! binding     = pattern, [ ":", type ], [ "=", initializer ], [ accessors ];
//! pattern     = "_" | identifier | "(", pattern, { ",", pattern }, ")";
//! accessors   = "{", ( { accessor } | statements ), "}";
//! accessor    = ( "get" | "set" | "willSet" | "didSet" ), [ "(", identifier, ")" ], [ block ];
//!
//! function    = "func", identifier, [ generics ], "(", [ parameter, { ",", parameter } ], ")",
//!               { effect }, [ "->", type ], [ "where", text ], [ block ];
//! parameter   = [ label ], identifier, ":", [ specifier ], type, [ "..." ], [ "=", text ];
//!
//! type        = { "@", identifier }, postfix, [ { effect }, "->", type ];
//! postfix     = primary, { "?" | "!" };
//! primary     = tuple | "[", type, [ ":", type ], "]" | ( "some" | "any" ), type | path;
//! path        = segment, { ".", segment };
//! segment     = identifier, [ "<", type, { ",", type }, ">" ];
//!
//! type_decl   = ( "class" | "struct" | "enum" | "extension" | "actor" | "protocol" ),
//!               name, [ clause ], "{", { member }, "}";
//! other       = text up to the end of the line, brackets balanced;
//! ```

mod scan;

#[cfg(test)]
mod tests;

use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace1, not_line_ending, satisfy, space0},
    combinator::{all_consuming, map, not, opt, recognize, value, verify},
    error::{Error, ErrorKind},
    multi::{many0, many1, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use tracing::debug;

use crate::syntax::{
    Accessor, AccessorBlock, AccessorKind, Attribute, Binding, BindingSpecifier, Comments, Decl,
    Expr, FunctionDecl, Identifier, Keyword, Modifier, OtherDecl, Parameter, Pattern, SourceFile,
    Span, TupleTypeElement, TypeDecl, TypeExpr, TypeKind, TypeSegment, VariableDecl,
};

use scan::{
    angle_group, block_lines, delimited_group, scan_until, starts_with_word, strip_indent,
};

/// Front end failure with a position in the source
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Parse a source unit
pub fn parse_source(source: &str) -> Result<SourceFile, ParseError> {
    let parser = SourceParser::new(source);
    match parser.members(source, None) {
        Ok((_, (members, trailing_comments))) => {
            debug!(members = members.len(), "parsed source");
            Ok(SourceFile {
                members,
                trailing_comments,
            })
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(parser.error_at(e)),
        Err(nom::Err::Incomplete(_)) => Err(ParseError {
            line: 1,
            column: 1,
            message: "incomplete input".to_string(),
        }),
    }
}

/// Read and parse a file
pub fn parse_file(path: &Path) -> crate::Result<SourceFile> {
    let source = std::fs::read_to_string(path)?;
    Ok(parse_source(&source)?)
}

/// Parse a single type expression, e.g. `[String: Int]?`
pub fn parse_type(source: &str) -> Result<TypeExpr, ParseError> {
    let parser = SourceParser::new(source);
    match all_consuming(delimited(space0, type_expr, space0))(source) {
        Ok((_, ty)) => Ok(ty),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(parser.error_at(e)),
        Err(nom::Err::Incomplete(_)) => Err(parser.error_at(Error::new("", ErrorKind::Eof))),
    }
}

fn fail<T>(input: &str, kind: ErrorKind) -> IResult<&str, T> {
    Err(nom::Err::Error(Error::new(input, kind)))
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(is_ident_start), take_while(is_ident_continue)))(input)
}

fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(kw), not(satisfy(is_ident_continue)))
}

fn identifier(input: &str) -> IResult<&str, Identifier> {
    map(
        alt((
            recognize(delimited(
                char('`'),
                take_while1(|c: char| c != '`' && c != '\n'),
                char('`'),
            )),
            word,
        )),
        Identifier::new,
    )(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), not_line_ending))(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    let (rest, _) = tag("/*")(input)?;
    match rest.find("*/") {
        Some(end) => Ok((&rest[end + 2..], &input[..end + 4])),
        None => Err(nom::Err::Failure(Error::new(input, ErrorKind::TakeUntil))),
    }
}

/// Whitespace, comments and stray semicolons
fn trivia(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((
        multispace1,
        line_comment,
        block_comment,
        recognize(char(';')),
    ))))(input)
}

/// Trivia between members, with its comments kept
struct Gap<'a> {
    comments: Vec<&'a str>,
    blank_line: bool,
}

fn gap(input: &str) -> IResult<&str, Gap<'_>> {
    let (rest, pieces) = many0(alt((
        map(multispace1, |_| None),
        map(line_comment, Some),
        map(block_comment, Some),
        map(char(';'), |_| None),
    )))(input)?;
    let consumed = &input[..input.len() - rest.len()];
    Ok((
        rest,
        Gap {
            comments: pieces.into_iter().flatten().collect(),
            blank_line: has_blank_line(consumed),
        },
    ))
}

/// A comment on the same line as the end of a declaration
fn trailing_comment(input: &str) -> IResult<&str, &str> {
    preceded(
        tuple((space0, opt(char(';')), space0)),
        alt((
            line_comment,
            verify(block_comment, |comment: &str| !comment.contains('\n')),
        )),
    )(input)
}

/// True when the trivia contains an empty line
fn has_blank_line(trivia: &str) -> bool {
    let segments: Vec<&str> = trivia.split('\n').collect();
    segments.len() > 2
        && segments[1..segments.len() - 1]
            .iter()
            .any(|segment| segment.trim().is_empty())
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(trivia, char(','), trivia)(input)
}

fn modifier(input: &str) -> IResult<&str, Modifier> {
    let (rest, text) = word(input)?;
    let Some(keyword) = Keyword::from_word(text) else {
        return fail(input, ErrorKind::Tag);
    };
    // `class var` is a modifier, `class Foo` is a declaration
    if keyword == Keyword::Class && !class_is_modifier(rest) {
        return fail(input, ErrorKind::Tag);
    }
    let (rest, detail) = opt(preceded(
        space0,
        delimited(char('('), take_while1(is_ident_continue), char(')')),
    ))(rest)?;
    Ok((
        rest,
        Modifier {
            keyword,
            detail: detail.map(str::to_string),
        },
    ))
}

fn class_is_modifier(rest: &str) -> bool {
    let Ok((after, _)) = trivia(rest) else {
        return false;
    };
    match word(after) {
        Ok((_, next)) => {
            matches!(next, "var" | "let" | "func" | "subscript")
                || Keyword::from_word(next).is_some_and(|k| k != Keyword::Class)
        }
        Err(_) => false,
    }
}

fn pattern(input: &str) -> IResult<&str, Pattern> {
    alt((
        map(
            delimited(
                pair(char('('), trivia),
                separated_list1(comma, pattern),
                pair(trivia, char(')')),
            ),
            Pattern::Tuple,
        ),
        value(Pattern::Wildcard, keyword("_")),
        map(identifier, Pattern::Identifier),
    ))(input)
}

// Types

fn type_expr(input: &str) -> IResult<&str, TypeExpr> {
    let (input, attributes) = many0(terminated(
        recognize(pair(char('@'), word)),
        space0,
    ))(input)?;
    let (input, base) = postfix_type(input)?;
    let (input, function) = opt(tuple((
        many0(preceded(space0, alt((keyword("async"), keyword("throws"))))),
        delimited(space0, tag("->"), space0),
        type_expr,
    )))(input)?;

    let ty = match function {
        Some((effects, _, result)) => TypeExpr::Function {
            params: match base {
                TypeExpr::Tuple(elements) => elements,
                other => vec![TupleTypeElement {
                    label: None,
                    ty: other,
                }],
            },
            effects: effects.into_iter().map(str::to_string).collect(),
            result: Box::new(result),
        },
        None => base,
    };

    if attributes.is_empty() {
        Ok((input, ty))
    } else {
        Ok((
            input,
            TypeExpr::Attributed {
                attributes: attributes.into_iter().map(str::to_string).collect(),
                base: Box::new(ty),
            },
        ))
    }
}

fn postfix_type(input: &str) -> IResult<&str, TypeExpr> {
    let (mut input, mut ty) = primary_type(input)?;
    loop {
        if let Some(rest) = input.strip_prefix('?') {
            ty = TypeExpr::Optional(Box::new(ty));
            input = rest;
        } else if let Some(rest) = input.strip_prefix('!') {
            ty = TypeExpr::ImplicitlyUnwrapped(Box::new(ty));
            input = rest;
        } else {
            return Ok((input, ty));
        }
    }
}

fn primary_type(input: &str) -> IResult<&str, TypeExpr> {
    alt((tuple_type, collection_type, opaque_type, named_type))(input)
}

// `(T)` is just `T`
fn tuple_type(input: &str) -> IResult<&str, TypeExpr> {
    let (input, mut elements) = delimited(
        pair(char('('), trivia),
        separated_list0(comma, tuple_type_element),
        pair(trivia, char(')')),
    )(input)?;

    let ty = match elements.as_slice() {
        [TupleTypeElement { label: None, .. }] => elements.remove(0).ty,
        _ => TypeExpr::Tuple(elements),
    };
    Ok((input, ty))
}

fn tuple_type_element(input: &str) -> IResult<&str, TupleTypeElement> {
    let (input, label) = opt(terminated(
        word,
        tuple((space0, char(':'), space0)),
    ))(input)?;
    let (input, ty) = type_expr(input)?;
    Ok((
        input,
        TupleTypeElement {
            label: label.map(str::to_string),
            ty,
        },
    ))
}

fn collection_type(input: &str) -> IResult<&str, TypeExpr> {
    let (input, _) = pair(char('['), trivia)(input)?;
    let (input, first) = type_expr(input)?;
    let (input, second) = opt(preceded(
        tuple((trivia, char(':'), trivia)),
        type_expr,
    ))(input)?;
    let (input, _) = pair(trivia, char(']'))(input)?;

    let ty = match second {
        Some(value) => TypeExpr::Dictionary {
            key: Box::new(first),
            value: Box::new(value),
        },
        None => TypeExpr::Array(Box::new(first)),
    };
    Ok((input, ty))
}

fn opaque_type(input: &str) -> IResult<&str, TypeExpr> {
    let (input, kw) = alt((keyword("some"), keyword("any")))(input)?;
    let (input, base) = preceded(space0, postfix_type)(input)?;
    Ok((
        input,
        TypeExpr::Opaque {
            keyword: kw.to_string(),
            base: Box::new(base),
        },
    ))
}

fn type_segment(input: &str) -> IResult<&str, TypeSegment> {
    let (input, name) = word(input)?;
    let (input, generic_args) = opt(delimited(
        pair(char('<'), trivia),
        separated_list1(comma, type_expr),
        pair(trivia, char('>')),
    ))(input)?;
    Ok((
        input,
        TypeSegment {
            name: name.to_string(),
            generic_args: generic_args.unwrap_or_default(),
        },
    ))
}

fn named_type(input: &str) -> IResult<&str, TypeExpr> {
    map(separated_list1(char('.'), type_segment), TypeExpr::Named)(input)
}

// Accessors

fn accessor_kind(input: &str) -> IResult<&str, AccessorKind> {
    alt((
        value(AccessorKind::Get, keyword("get")),
        value(AccessorKind::Set, keyword("set")),
        value(AccessorKind::WillSet, keyword("willSet")),
        value(AccessorKind::DidSet, keyword("didSet")),
    ))(input)
}

fn starts_with_accessor(input: &str) -> bool {
    accessor_kind(input).is_ok()
}

fn starts_with_observer(input: &str) -> bool {
    starts_with_word(input, "willSet") || starts_with_word(input, "didSet")
}

fn accessor(input: &str) -> IResult<&str, Accessor> {
    let (input, kind) = accessor_kind(input)?;
    let (input, parameter) = opt(preceded(
        space0,
        delimited(
            pair(char('('), space0),
            word,
            pair(space0, char(')')),
        ),
    ))(input)?;
    let (input, body) = opt(preceded(trivia, delimited_group('{', '}')))(input)?;
    Ok((
        input,
        Accessor {
            kind,
            parameter: parameter.map(str::to_string),
            body: body.map(block_lines),
        },
    ))
}

fn accessor_block(input: &str) -> IResult<&str, AccessorBlock> {
    let (inside, _) = char('{')(input)?;
    let (probe, _) = trivia(inside)?;

    if let Some(rest) = probe.strip_prefix('}') {
        return Ok((rest, AccessorBlock::Accessors(Vec::new())));
    }
    // `{ set.count }` starts like an accessor but is a getter body
    if starts_with_accessor(probe) {
        match terminated(many1(preceded(trivia, accessor)), preceded(trivia, char('}')))(inside) {
            Ok((rest, accessors)) => return Ok((rest, AccessorBlock::Accessors(accessors))),
            Err(nom::Err::Error(_)) => {}
            Err(e) => return Err(e),
        }
    }

    let (rest, body) = delimited_group('{', '}')(input)?;
    Ok((rest, AccessorBlock::Getter(block_lines(body))))
}

// Initializers end at a top-level comma, newline, semicolon or closing
// bracket. A `{` only ends them when it opens an observer block.
fn initializer(input: &str) -> IResult<&str, Expr> {
    let (rest, text) = scan_until(input, |c, rest| match c {
        ',' | '\n' | ';' | '}' | ')' | ']' => true,
        '/' => rest.starts_with("//") || rest.starts_with("/*"),
        '{' => trivia(&rest[1..]).is_ok_and(|(after, _)| starts_with_observer(after)),
        _ => false,
    });
    let text = text.trim();
    if text.is_empty() {
        return fail(input, ErrorKind::Verify);
    }
    Ok((rest, Expr::Raw(text.to_string())))
}

fn binding(input: &str) -> IResult<&str, Binding> {
    let (input, pattern) = pattern(input)?;
    let (input, type_annotation) = opt(preceded(
        tuple((space0, char(':'), space0)),
        type_expr,
    ))(input)?;
    let (input, initializer) = opt(preceded(
        tuple((space0, char('='), space0)),
        initializer,
    ))(input)?;
    let (input, accessors) = opt(preceded(space0, accessor_block))(input)?;
    Ok((
        input,
        Binding {
            pattern,
            type_annotation,
            initializer,
            accessors,
        },
    ))
}

// Functions

fn parameter(input: &str) -> IResult<&str, Parameter> {
    let (input, first) = word(input)?;
    let (input, second) = opt(preceded(space0, identifier))(input)?;
    let (input, _) = tuple((space0, char(':'), space0))(input)?;
    let (input, specifier) = opt(terminated(
        alt((keyword("inout"), keyword("borrowing"), keyword("consuming"))),
        space0,
    ))(input)?;
    let (input, ty) = type_expr(input)?;
    let (input, variadic) = opt(tag("..."))(input)?;
    let (input, default) = opt(preceded(
        tuple((space0, char('='), space0)),
        map(take_while1(|_: char| true), |text: &str| {
            Expr::Raw(text.trim().to_string())
        }),
    ))(input)?;

    let (label, name) = match second {
        Some(name) => (Some(first.to_string()), name),
        None => (None, Identifier::new(first)),
    };
    Ok((
        input,
        Parameter {
            label,
            name,
            specifier: specifier.map(str::to_string),
            ty,
            variadic: variadic.is_some(),
            default,
        },
    ))
}

/// Header text up to the opening brace or end of line
fn rest_of_header(input: &str) -> IResult<&str, &str> {
    Ok(scan_until(input, |c, _| c == '{' || c == '\n'))
}

/// Split a parameter clause at top-level commas and parse each part
fn parameter_list(text: &str) -> IResult<&str, Vec<Parameter>> {
    let mut parameters = Vec::new();
    let mut rest = text;
    while !rest.trim().is_empty() {
        let (after, part) = scan_until(rest, |c, _| c == ',');
        let (_, parameter) = all_consuming(delimited(trivia, parameter, trivia))(part)?;
        parameters.push(parameter);
        rest = after.strip_prefix(',').unwrap_or(after);
    }
    Ok(("", parameters))
}

struct SourceParser<'a> {
    source: &'a str,
}

/// Attributes, modifiers and layout shared by every member
struct MemberHeader {
    attributes: Vec<Attribute>,
    modifiers: Vec<Modifier>,
    start: usize,
    leading_blank_line: bool,
    comments: Comments,
}

impl<'a> SourceParser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn offset(&self, rest: &str) -> usize {
        let base = self.source.as_ptr() as usize;
        (rest.as_ptr() as usize)
            .saturating_sub(base)
            .min(self.source.len())
    }

    fn span_from(&self, start: usize, rest: &str) -> Span {
        Span::new(start, self.offset(rest))
    }

    fn error_at(&self, error: Error<&str>) -> ParseError {
        let offset = self.offset(error.input);
        let (line, column) = Span::new(offset, offset).line_col(self.source);
        let near: String = error.input.chars().take(20).collect();
        ParseError {
            line,
            column,
            message: if near.is_empty() {
                format!("unexpected end of input ({:?})", error.code)
            } else {
                format!("unexpected input near {near:?} ({:?})", error.code)
            },
        }
    }

    /// Column (zero-based) of `input` within its line
    fn column_of(&self, input: &str) -> usize {
        let offset = self.offset(input);
        let before = &self.source[..offset];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        before[line_start..].chars().count()
    }

    /// Comment text as lines, continuation lines relative to where it starts
    fn comment_lines(&self, comment: &str, into: &mut Vec<String>) {
        let column = self.column_of(comment);
        let mut lines = comment.lines();
        if let Some(first) = lines.next() {
            into.push(first.trim_end().to_string());
        }
        for line in lines {
            into.push(strip_indent(line, column).trim_end().to_string());
        }
    }

    fn gap_comments(&self, comments: &[&str], into: &mut Vec<String>) {
        for comment in comments {
            self.comment_lines(comment, into);
        }
    }

    /// Members until `closing` (or end of input at top level), then the
    /// comments left before it
    fn members(
        &self,
        mut input: &'a str,
        closing: Option<char>,
    ) -> IResult<&'a str, (Vec<Decl>, Vec<String>)> {
        let mut members = Vec::new();
        loop {
            let (rest, between) = gap(input)?;
            let at_end = match closing {
                None => rest.is_empty().then_some(rest),
                Some(_) if rest.is_empty() => {
                    return Err(nom::Err::Failure(Error::new(rest, ErrorKind::Eof)))
                }
                Some(close) => rest.strip_prefix(close),
            };
            if let Some(after) = at_end {
                let mut remaining = Vec::new();
                self.gap_comments(&between.comments, &mut remaining);
                return Ok((after, (members, remaining)));
            }

            let (rest, mut member) = self.member(rest, between)?;
            let (rest, trailing) = opt(trailing_comment)(rest)?;
            if let Some(comment) = trailing {
                member.comments_mut().trailing = Some(comment.trim_end().to_string());
            }
            members.push(member);
            input = rest;
        }
    }

    fn attribute(&self, input: &'a str) -> IResult<&'a str, Attribute> {
        let start = self.offset(input);
        let (rest, name) = preceded(char('@'), word)(input)?;
        let (rest, arguments) = opt(delimited_group('(', ')'))(rest)?;
        Ok((
            rest,
            Attribute {
                name: name.to_string(),
                arguments: arguments.map(|a| a.trim().to_string()),
                span: self.span_from(start, rest),
            },
        ))
    }

    fn member(&self, input: &'a str, before: Gap<'a>) -> IResult<&'a str, Decl> {
        let start = self.offset(input);
        let column = self.column_of(input);
        let mut comments = Comments::default();
        self.gap_comments(&before.comments, &mut comments.leading);

        // comments among attributes and modifiers move above the declaration
        let (input, attributes) = many0(pair(|i| self.attribute(i), gap))(input)?;
        let (input, modifiers) = many0(pair(modifier, gap))(input)?;
        for (_, after) in &attributes {
            self.gap_comments(&after.comments, &mut comments.leading);
        }
        for (_, after) in &modifiers {
            self.gap_comments(&after.comments, &mut comments.leading);
        }
        let header = MemberHeader {
            attributes: attributes.into_iter().map(|(a, _)| a).collect(),
            modifiers: modifiers.into_iter().map(|(m, _)| m).collect(),
            start,
            leading_blank_line: before.blank_line,
            comments,
        };

        let next = word(input).map(|(_, w)| w).unwrap_or("");
        match next {
            "var" | "let" => self.variable_decl(input, header),
            "func" => match self.function_decl(input) {
                Ok((rest, function)) => Ok((rest, self.finish_function(function, header, rest))),
                Err(nom::Err::Error(_)) => self.other_decl(input, header, column),
                Err(e) => Err(e),
            },
            _ if TypeKind::from_word(next).is_some() => self.type_decl(input, header),
            _ => self.other_decl(input, header, column),
        }
    }

    fn variable_decl(&self, input: &'a str, header: MemberHeader) -> IResult<&'a str, Decl> {
        let (input, specifier) = alt((
            value(BindingSpecifier::Var, keyword("var")),
            value(BindingSpecifier::Let, keyword("let")),
        ))(input)?;
        let (input, bindings) =
            preceded(trivia, separated_list1(pair(space0, char(',')), preceded(trivia, binding)))(
                input,
            )?;
        Ok((
            input,
            Decl::Variable(VariableDecl {
                attributes: header.attributes,
                modifiers: header.modifiers,
                specifier,
                bindings,
                span: self.span_from(header.start, input),
                leading_blank_line: header.leading_blank_line,
                comments: header.comments,
            }),
        ))
    }

    fn function_decl(&self, input: &'a str) -> IResult<&'a str, FunctionDecl> {
        let (input, _) = pair(keyword("func"), trivia)(input)?;
        let (input, name) = identifier(input)?;
        let (input, generic_params) = opt(angle_group)(input)?;
        let (input, params_text) = preceded(space0, delimited_group('(', ')'))(input)?;
        let (_, parameters) = parameter_list(params_text)?;
        let (input, effects) = many0(preceded(
            space0,
            alt((keyword("async"), keyword("throws"), keyword("rethrows"))),
        ))(input)?;
        let (input, return_type) =
            opt(preceded(delimited(space0, tag("->"), space0), type_expr))(input)?;
        let (input, where_clause) = opt(preceded(
            delimited(space0, keyword("where"), space0),
            rest_of_header,
        ))(input)?;
        let (input, body) = opt(preceded(trivia, delimited_group('{', '}')))(input)?;

        Ok((
            input,
            FunctionDecl {
                attributes: Vec::new(),
                modifiers: Vec::new(),
                name,
                generic_params: generic_params.map(|g| g.trim().to_string()),
                parameters,
                effects: effects.into_iter().map(str::to_string).collect(),
                return_type,
                where_clause: where_clause
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty()),
                body: body.map(block_lines),
                span: Span::default(),
                leading_blank_line: false,
                comments: Comments::default(),
            },
        ))
    }

    fn finish_function(&self, function: FunctionDecl, header: MemberHeader, rest: &str) -> Decl {
        Decl::Function(FunctionDecl {
            attributes: header.attributes,
            modifiers: header.modifiers,
            span: self.span_from(header.start, rest),
            leading_blank_line: header.leading_blank_line,
            comments: header.comments,
            ..function
        })
    }

    fn type_decl(&self, input: &'a str, header: MemberHeader) -> IResult<&'a str, Decl> {
        let (input, kind_word) = word(input)?;
        let Some(kind) = TypeKind::from_word(kind_word) else {
            return fail(input, ErrorKind::Tag);
        };
        let (input, name) = preceded(
            trivia,
            recognize(pair(identifier, opt(angle_group))),
        )(input)?;
        let (input, clause) = scan_until(input, |c, _| c == '{');
        let (input, (members, closing_comments)) =
            preceded(char('{'), |i| self.members(i, Some('}')))(input)?;

        let clause = clause.trim();
        Ok((
            input,
            Decl::Type(TypeDecl {
                attributes: header.attributes,
                modifiers: header.modifiers,
                kind,
                name: name.to_string(),
                clause: (!clause.is_empty()).then(|| clause.to_string()),
                members,
                closing_comments,
                span: self.span_from(header.start, input),
                leading_blank_line: header.leading_blank_line,
                comments: header.comments,
            }),
        ))
    }

    /// Anything else, up to the end of the line with brackets balanced
    fn other_decl(
        &self,
        input: &'a str,
        header: MemberHeader,
        column: usize,
    ) -> IResult<&'a str, Decl> {
        let (rest, text) = scan_until(input, |c, _| c == '\n' || c == '}');
        let text = text.trim_end();
        if text.is_empty() {
            return Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify)));
        }

        let mut lines = text.lines();
        let mut kept = Vec::new();
        if let Some(first) = lines.next() {
            kept.push(first.trim_end().to_string());
        }
        for line in lines {
            kept.push(strip_indent(line, column).trim_end().to_string());
        }

        Ok((
            rest,
            Decl::Other(OtherDecl {
                attributes: header.attributes,
                modifiers: header.modifiers,
                lines: kept,
                span: self.span_from(header.start, rest),
                leading_blank_line: header.leading_blank_line,
                comments: header.comments,
            }),
        ))
    }
}
