use super::*;
use crate::syntax::{Stmt, ToSource};
use pretty_assertions::assert_eq;

fn only_type(file: &SourceFile) -> &TypeDecl {
    match file.members.as_slice() {
        [Decl::Type(ty)] => ty,
        other => panic!("expected a single type, got {other:?}"),
    }
}

fn only_variable(decl: &Decl) -> &VariableDecl {
    match decl {
        Decl::Variable(variable) => variable,
        other => panic!("expected a variable, got {other:?}"),
    }
}

#[test]
fn test_annotated_stored_property() {
    let source = "class Test {\n    @setterFunction\n    var text: String = \"\"\n}\n";
    let file = parse_source(source).unwrap();

    let ty = only_type(&file);
    assert_eq!(ty.kind, TypeKind::Class);
    assert_eq!(ty.name, "Test");
    assert_eq!(ty.clause, None);

    let variable = only_variable(&ty.members[0]);
    assert_eq!(variable.specifier, BindingSpecifier::Var);
    assert_eq!(variable.attributes.len(), 1);
    assert_eq!(variable.attributes[0].name, "setterFunction");
    assert_eq!(variable.attributes[0].span, Span::new(17, 32));
    assert_eq!(
        variable.bindings,
        vec![Binding::simple("text", Some(TypeExpr::named("String"))).with_initializer("\"\"")]
    );

    assert_eq!(file.to_source(), source);
}

#[test]
fn test_public_modifier_is_recorded() {
    let source = "public class Test {\n    @setterFunction\n    public var text: String = \"\"\n}\n";
    let file = parse_source(source).unwrap();

    let ty = only_type(&file);
    assert_eq!(ty.modifiers, vec![Modifier::new(Keyword::Public)]);
    let variable = only_variable(&ty.members[0]);
    assert_eq!(variable.modifiers, vec![Modifier::new(Keyword::Public)]);
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_modifier_detail() {
    let file = parse_source("public private(set) var count: Int = 0\n").unwrap();
    let variable = only_variable(&file.members[0]);
    assert_eq!(
        variable.modifiers,
        vec![
            Modifier::new(Keyword::Public),
            Modifier {
                keyword: Keyword::Private,
                detail: Some("set".to_string()),
            },
        ]
    );
}

#[test]
fn test_inferred_type_has_no_annotation() {
    let file = parse_source("class Test {\n    @setterFunction\n    var text = \"\"\n}\n").unwrap();
    let variable = only_variable(&only_type(&file).members[0]);
    assert_eq!(variable.bindings[0].type_annotation, None);
    assert_eq!(
        variable.bindings[0].initializer,
        Some(Expr::Raw("\"\"".to_string()))
    );
}

#[test]
fn test_constant_in_struct() {
    let source = "struct Test {\n    @setterFunction\n    let text = \"foo\"\n}\n";
    let file = parse_source(source).unwrap();

    let ty = only_type(&file);
    assert_eq!(ty.kind, TypeKind::Struct);
    assert_eq!(only_variable(&ty.members[0]).specifier, BindingSpecifier::Let);
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_computed_property_shorthand() {
    let source = "class Test {\n    @setterFunction\n    var text: String {\n        \"foo\"\n    }\n}\n";
    let file = parse_source(source).unwrap();

    let variable = only_variable(&only_type(&file).members[0]);
    assert_eq!(
        variable.bindings[0].accessors,
        Some(AccessorBlock::Getter(crate::syntax::CodeBlock::new(vec![
            Stmt::Raw("\"foo\"".to_string())
        ])))
    );
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_observer_after_initializer() {
    let source = "class Test {\n    @setterFunction\n    var text: Style = .Default {\n        didSet {\n            update()\n        }\n    }\n}\n";
    let file = parse_source(source).unwrap();

    let binding = &only_variable(&only_type(&file).members[0]).bindings[0];
    assert_eq!(binding.initializer, Some(Expr::Raw(".Default".to_string())));
    match &binding.accessors {
        Some(AccessorBlock::Accessors(accessors)) => {
            assert_eq!(accessors.len(), 1);
            assert_eq!(accessors[0].kind, AccessorKind::DidSet);
            assert!(accessors[0].body.is_some());
        }
        other => panic!("expected accessors, got {other:?}"),
    }
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_observer_with_parameter() {
    let file =
        parse_source("var level = 0 {\n    willSet(next) {\n        log(next)\n    }\n}\n").unwrap();
    let binding = &only_variable(&file.members[0]).bindings[0];
    match &binding.accessors {
        Some(AccessorBlock::Accessors(accessors)) => {
            assert_eq!(accessors[0].kind, AccessorKind::WillSet);
            assert_eq!(accessors[0].parameter.as_deref(), Some("next"));
        }
        other => panic!("expected accessors, got {other:?}"),
    }
}

#[test]
fn test_closure_initializer_is_not_an_accessor_block() {
    let file = parse_source("let handler = makeHandler { value in value }\n").unwrap();
    let binding = &only_variable(&file.members[0]).bindings[0];
    assert_eq!(
        binding.initializer,
        Some(Expr::Raw("makeHandler { value in value }".to_string()))
    );
    assert_eq!(binding.accessors, None);
}

#[test]
fn test_protocol_requirements_print_inline() {
    let source = "protocol Named {\n    var name: String { get set }\n    var id: Int { get }\n}\n";
    let file = parse_source(source).unwrap();

    let ty = only_type(&file);
    assert_eq!(ty.kind, TypeKind::Protocol);
    match &only_variable(&ty.members[0]).bindings[0].accessors {
        Some(AccessorBlock::Accessors(accessors)) => {
            let kinds: Vec<_> = accessors.iter().map(|a| a.kind).collect();
            assert_eq!(kinds, vec![AccessorKind::Get, AccessorKind::Set]);
        }
        other => panic!("expected accessors, got {other:?}"),
    }
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_tuple_pattern_and_multiple_bindings() {
    let file = parse_source("var (a, b): (Int, String)\nvar x = 1, y: Int = 2\n").unwrap();

    let tuple = only_variable(&file.members[0]);
    assert_eq!(
        tuple.bindings[0].pattern,
        Pattern::Tuple(vec![
            Pattern::Identifier(Identifier::new("a")),
            Pattern::Identifier(Identifier::new("b")),
        ])
    );

    let pair = only_variable(&file.members[1]);
    assert_eq!(pair.bindings.len(), 2);
    assert_eq!(pair.bindings[1].type_annotation, Some(TypeExpr::named("Int")));
    assert_eq!(pair.bindings[1].initializer, Some(Expr::Raw("2".to_string())));

    assert_eq!(
        file.to_source(),
        "var (a, b): (Int, String)\nvar x = 1, y: Int = 2\n"
    );
}

#[test]
fn test_wildcard_and_backticked_names() {
    let file = parse_source("var _ = setup()\nvar `default`: Int = 0\n").unwrap();
    assert_eq!(
        only_variable(&file.members[0]).bindings[0].pattern,
        Pattern::Wildcard
    );
    assert_eq!(
        only_variable(&file.members[1]).bindings[0].pattern,
        Pattern::Identifier(Identifier::new("`default`"))
    );
}

#[test]
fn test_function_declaration() {
    let source = "@discardableResult\nfunc resize<T: Numeric>(_ width: T, height h: T = 1) throws -> Self where T: Sendable {\n    return self\n}\n";
    let file = parse_source(source).unwrap();

    let function = match &file.members[0] {
        Decl::Function(function) => function,
        other => panic!("expected a function, got {other:?}"),
    };
    assert_eq!(function.name, Identifier::new("resize"));
    assert_eq!(function.generic_params.as_deref(), Some("T: Numeric"));
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.parameters[0].label.as_deref(), Some("_"));
    assert_eq!(function.parameters[1].label.as_deref(), Some("height"));
    assert_eq!(function.parameters[1].name, Identifier::new("h"));
    assert_eq!(
        function.parameters[1].default,
        Some(Expr::Raw("1".to_string()))
    );
    assert_eq!(function.effects, vec!["throws".to_string()]);
    assert_eq!(function.return_type, Some(TypeExpr::self_type()));
    assert_eq!(function.where_clause.as_deref(), Some("T: Sendable"));
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_other_declarations_are_kept_as_text() {
    let source = "enum Mode {\n    case on, off\n\n    init() {\n        self = .on\n    }\n}\n";
    let file = parse_source(source).unwrap();

    let ty = only_type(&file);
    assert_eq!(ty.members.len(), 2);
    match &ty.members[1] {
        Decl::Other(other) => {
            assert!(other.leading_blank_line);
            assert_eq!(
                other.lines,
                vec!["init() {", "    self = .on", "}"]
            );
        }
        other => panic!("expected raw text, got {other:?}"),
    }
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_getter_starting_with_accessor_word() {
    let source = "class A {\n    var set: Set<Int> = []\n    var size: Int { set.count }\n    var total: Int { get() }\n}\n";
    let file = parse_source(source).unwrap();

    let ty = only_type(&file);
    assert_eq!(ty.members.len(), 3);
    let getter = |i: usize| only_variable(&ty.members[i]).bindings[0].accessors.clone();
    assert_eq!(
        getter(1),
        Some(AccessorBlock::Getter(crate::syntax::CodeBlock::new(vec![
            Stmt::Raw("set.count".to_string())
        ])))
    );
    assert_eq!(
        getter(2),
        Some(AccessorBlock::Getter(crate::syntax::CodeBlock::new(vec![
            Stmt::Raw("get()".to_string())
        ])))
    );
}

#[test]
fn test_other_declaration_with_non_ascii_indentation() {
    let file = parse_source(" init() {\n\u{a0}x = 1\n }\n").unwrap();
    match &file.members[0] {
        Decl::Other(other) => {
            assert_eq!(other.lines, vec!["init() {", "\u{a0}x = 1", "}"]);
        }
        other => panic!("expected raw text, got {other:?}"),
    }
}

#[test]
fn test_class_modifier_versus_class_declaration() {
    let file = parse_source("final class Cache {\n    class var shared: Cache { make() }\n}\n")
        .unwrap();
    let ty = only_type(&file);
    assert_eq!(ty.modifiers, vec![Modifier::new(Keyword::Final)]);
    assert_eq!(
        only_variable(&ty.members[0]).modifiers,
        vec![Modifier::new(Keyword::Class)]
    );
}

#[test]
fn test_inheritance_clause() {
    let source = "struct Box<T>: Equatable where T: Equatable {\n    var value: T\n}\n";
    let file = parse_source(source).unwrap();
    let ty = only_type(&file);
    assert_eq!(ty.name, "Box<T>");
    assert_eq!(ty.clause.as_deref(), Some(": Equatable where T: Equatable"));
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_comments_are_kept() {
    let source = "// header\nclass A {\n    /* note */ var x: Int = 1 // trailing\n}\n";
    let file = parse_source(source).unwrap();

    let ty = only_type(&file);
    assert_eq!(ty.comments.leading, vec!["// header"]);
    let variable = only_variable(&ty.members[0]);
    assert_eq!(variable.comments.leading, vec!["/* note */"]);
    assert_eq!(variable.comments.trailing.as_deref(), Some("// trailing"));
    assert_eq!(
        file.to_source(),
        "// header\nclass A {\n    /* note */\n    var x: Int = 1 // trailing\n}\n"
    );
}

#[test]
fn test_doc_comment_above_attribute() {
    let source = "class A {\n    /// Display title\n    @setterFunction\n    var title: String = \"\"\n}";
    let file = parse_source(source).unwrap();

    let variable = only_variable(&only_type(&file).members[0]);
    assert_eq!(variable.comments.leading, vec!["/// Display title"]);
    assert_eq!(variable.attributes[0].name, "setterFunction");
    assert_eq!(file.to_source(), format!("{source}\n"));
}

#[test]
fn test_comment_among_attributes_moves_above() {
    let file = parse_source("@setterFunction // chainable\npublic /* api */ var x: Int = 0\n").unwrap();

    let variable = only_variable(&file.members[0]);
    assert_eq!(variable.comments.leading, vec!["// chainable", "/* api */"]);
    assert_eq!(
        file.to_source(),
        "// chainable\n/* api */\n@setterFunction\npublic var x: Int = 0\n"
    );
}

#[test]
fn test_block_comment_keeps_relative_indentation() {
    let source = "struct S {\n    /*\n     * Count of items\n     */\n    var count = 0\n}\n";
    let file = parse_source(source).unwrap();

    let variable = only_variable(&only_type(&file).members[0]);
    assert_eq!(
        variable.comments.leading,
        vec!["/*", " * Count of items", " */"]
    );
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_comments_before_closing_brace_and_end_of_file() {
    let source = "extension A {\n    var x: Int { 1 }\n\n    // MARK: - Done\n}\n// end of file\n";
    let file = parse_source(source).unwrap();

    assert_eq!(only_type(&file).closing_comments, vec!["// MARK: - Done"]);
    assert_eq!(file.trailing_comments, vec!["// end of file"]);
    assert_eq!(
        file.to_source(),
        "extension A {\n    var x: Int {\n        1\n    }\n    // MARK: - Done\n}\n// end of file\n"
    );
}

#[test]
fn test_same_line_comments() {
    let file = parse_source("var a = 1; // one\nvar b = 2 /* two */\nvar c = 3 /* three\n */\n").unwrap();

    let trailing: Vec<_> = file
        .members
        .iter()
        .map(|member| member.comments().trailing.as_deref())
        .collect();
    assert_eq!(trailing, vec![Some("// one"), Some("/* two */"), None]);
    assert_eq!(file.trailing_comments, vec!["/* three", "*/"]);
    assert_eq!(
        file.to_source(),
        "var a = 1 // one\nvar b = 2 /* two */\nvar c = 3\n/* three\n*/\n"
    );
}

#[test]
fn test_blank_lines_between_members() {
    let source = "var a: Int = 1\n\nvar b: Int = 2\nvar c: Int = 3\n";
    let file = parse_source(source).unwrap();

    let flags: Vec<_> = file.members.iter().map(Decl::leading_blank_line).collect();
    assert_eq!(flags, vec![false, true, false]);
    assert_eq!(file.to_source(), source);
}

#[test]
fn test_has_blank_line() {
    assert!(!has_blank_line("\n    "));
    assert!(has_blank_line("\n\n    "));
    assert!(has_blank_line("\n  \n"));
    assert!(!has_blank_line(" // note\n"));
}

#[test]
fn test_variable_span_covers_attributes() {
    let source = "@setterFunction var a: Int = 1\nvar b: Int = 2\n";
    let file = parse_source(source).unwrap();
    assert_eq!(file.members[0].span(), Span::new(0, 30));
}

#[test]
fn test_parse_type() {
    assert_eq!(parse_type("String").unwrap(), TypeExpr::named("String"));
    assert_eq!(
        parse_type("[String: Int]?").unwrap().to_source(),
        "[String: Int]?"
    );
    assert_eq!(
        parse_type("@escaping (Int) async throws -> Void").unwrap().to_source(),
        "@escaping (Int) async throws -> Void"
    );
    assert_eq!(
        parse_type("Swift.Array<some View>").unwrap().to_source(),
        "Swift.Array<some View>"
    );
    assert_eq!(
        parse_type("((Int) -> Void)?").unwrap(),
        TypeExpr::Optional(Box::new(TypeExpr::Function {
            params: vec![TupleTypeElement {
                label: None,
                ty: TypeExpr::named("Int"),
            }],
            effects: Vec::new(),
            result: Box::new(TypeExpr::named("Void")),
        }))
    );
}

#[test]
fn test_parse_type_rejects_trailing_input() {
    assert!(parse_type("Int Int").is_err());
}

#[test]
fn test_unclosed_type_reports_end_of_input() {
    let error = parse_source("class Test {\n    var x: Int\n").unwrap_err();
    assert_eq!((error.line, error.column), (3, 1));
}

#[test]
fn test_unterminated_comment() {
    let error = parse_source("var x = 1\n/* open").unwrap_err();
    assert_eq!(error.line, 2);
}

#[test]
fn test_missing_pattern_is_an_error() {
    let error = parse_source("var = 1\n").unwrap_err();
    assert_eq!(error.line, 1);
    assert!(!error.message.is_empty());
}
