use pretty_assertions::assert_eq;

use crate::ast::*;
use crate::parser::{parse_kotlin, parse_kotlin_expression, SyntaxNode};
use crate::syntax_kind::KindSet;
use crate::{ConstantValue, FqName, SyntaxError, SyntaxKind};

fn parse(text: &str) -> SyntaxNode {
    let parse = parse_kotlin(text);
    assert_eq!(parse.errors, Vec::new(), "unexpected errors in {text:?}");
    parse.syntax()
}

fn expr(text: &str) -> SyntaxNode {
    let parse = parse_kotlin_expression(text);
    assert_eq!(parse.errors, Vec::new(), "unexpected errors in {text:?}");
    parse.syntax()
}

fn first<N: AstNode>(root: &SyntaxNode) -> N {
    root.descendants()
        .find_map(N::cast)
        .unwrap_or_else(|| panic!("no {} in tree", std::any::type_name::<N>()))
}

fn all<N: AstNode>(root: &SyntaxNode) -> Vec<N> {
    root.descendants().filter_map(N::cast).collect()
}

#[test]
fn binary_operands_skip_operator_and_trivia() {
    let root = expr("a  /* left */ +\n b * c");
    let sum: BinaryExpression = first(&root);
    assert_eq!(sum.operation_kind(), Some(SyntaxKind::Plus));

    let left = sum.left().expect("left operand");
    assert_eq!(left.syntax().kind(), SyntaxKind::NameReferenceExpression);
    assert_eq!(left.text(), "a");

    let right = sum.right().expect("right operand");
    let product = BinaryExpression::cast(right.syntax().clone()).expect("b * c");
    assert_eq!(product.operation_kind(), Some(SyntaxKind::Mul));
    assert_eq!(product.left().map(|e| e.text()).as_deref(), Some("b"));
    assert_eq!(product.right().map(|e| e.text()).as_deref(), Some("c"));
}

#[test]
fn incomplete_binary_has_no_right_operand() {
    let parse = parse_kotlin_expression("a +");
    assert!(!parse.errors.is_empty());
    let sum: BinaryExpression = first(&parse.syntax());
    assert!(sum.left().is_some());
    assert_eq!(sum.right(), None);
}

#[test]
fn primary_constructor_follows_secondary_constructor_count() {
    let root = parse("class A { fun f() {} }");
    let class: Class = first(&root);
    assert!(!class.has_explicit_primary_constructor());
    assert!(class.has_primary_constructor());

    let root = parse("class A { constructor(x: Int) }");
    let class: Class = first(&root);
    assert_eq!(class.secondary_constructors().len(), 1);
    assert!(!class.has_primary_constructor());

    let root = parse("class A(val x: Int) { constructor() : this(0) }");
    let class: Class = first(&root);
    assert!(class.has_primary_constructor());
    assert_eq!(class.primary_constructor_parameters().len(), 1);
}

#[test]
fn interfaces_report_a_primary_constructor() {
    // Interfaces have no constructors at all, yet count as having a primary
    // one because they declare no secondary constructors.
    let root = parse("interface I { fun f() }");
    let class: Class = first(&root);
    assert!(class.is_interface());
    assert!(class.has_primary_constructor());
}

#[test]
fn import_alias_and_qualified_name() {
    let root = parse("import foo.bar.Baz as Qux\nimport kotlin.collections.*\n");
    let file = KtFile::cast(root).expect("file");
    let imports = file.import_directives();
    assert_eq!(imports.len(), 2);

    let aliased = &imports[0];
    assert_eq!(aliased.alias_name().as_deref(), Some("Qux"));
    assert!(!aliased.is_all_under());
    assert_eq!(aliased.imported_fq_name(), Some(FqName::from("foo.bar.Baz")));
    assert_eq!(aliased.imported_name().as_deref(), Some("Qux"));
    assert_eq!(file.find_import_by_alias("Qux").as_ref(), Some(aliased));

    let star = &imports[1];
    assert!(star.is_all_under());
    assert_eq!(star.imported_fq_name(), Some(FqName::from("kotlin.collections")));
    assert_eq!(star.imported_name(), None);
}

#[test]
fn package_directive_segments() {
    let root = parse("package com.example.app\n\nfun main() {}\n");
    let file = KtFile::cast(root.clone()).expect("file");
    assert_eq!(file.package_fq_name(), FqName::from("com.example.app"));

    let without = KtFile::cast(parse("fun main() {}")).expect("file");
    assert!(without.package_fq_name().is_root());
}

#[test]
fn children_of_kind_is_restartable() {
    let root = parse("class A {\n  val x = 1\n  fun f() {}\n  val y = 2\n  class B\n}");
    let body: ClassBody = first(&root);
    let kinds = KindSet::new(&[SyntaxKind::Property, SyntaxKind::Class]);

    let first_walk: Vec<_> = support::children_of_kind(body.syntax(), kinds).collect();
    let second_walk: Vec<_> = support::children_of_kind(body.syntax(), kinds).collect();
    assert_eq!(first_walk, second_walk);
    assert_eq!(
        first_walk.iter().map(|n| n.kind()).collect::<Vec<_>>(),
        vec![SyntaxKind::Property, SyntaxKind::Property, SyntaxKind::Class]
    );

    let mut partial = support::children_of_kind(body.syntax(), kinds);
    partial.next();
    let fresh: Vec<_> = support::children_of_kind(body.syntax(), kinds).collect();
    assert_eq!(fresh, first_walk);
}

#[test]
fn child_of_kind_takes_the_first_match() {
    let root = parse("fun f(a: Int): String = \"\"");
    let fun: NamedFunction = first(&root);
    let list = support::child_of_kind(fun.syntax(), SyntaxKind::ValueParameterList);
    assert_eq!(list.map(|n| n.text().to_string()).as_deref(), Some("(a: Int)"));
    assert_eq!(support::child_of_kind(fun.syntax(), SyntaxKind::Block), None);
}

#[test]
fn owner_file_requires_attachment() {
    let root = parse("val x = 1");
    let property: Property = first(&root);
    let element = KtElement::from_node(&property).expect("kt element");
    assert!(element.owner_file().is_ok());

    let fragment = expr("1 + 2");
    let sum: BinaryExpression = first(&fragment);
    let element = KtElement::from_node(&sum).expect("kt element");
    assert!(matches!(
        element.owner_file(),
        Err(SyntaxError::InvalidTreeState {
            kind: SyntaxKind::BinaryExpression,
            ..
        })
    ));
}

#[test]
fn callable_reference_exposes_name() {
    let root = expr("String::length");
    let reference: CallableReferenceExpression = first(&root);
    assert_eq!(
        reference
            .callable_reference()
            .map(|name| name.referenced_name()),
        Ok(Some("length".to_string()))
    );
    assert!(reference.receiver_expression().is_some());
}

#[test]
fn declarations_expose_capabilities() {
    let root = parse(
        "private data class P<T : Any>(val a: T, var b: Int = 0) : Base(), Marker where T : Comparable<T>",
    );
    let class: Class = first(&root);
    assert_eq!(class.name().as_deref(), Some("P"));
    assert!(class.is_data());
    assert!(class.has_modifier(SyntaxKind::PrivateKw));
    assert_eq!(class.type_parameters().len(), 1);
    assert_eq!(class.type_constraints().len(), 1);

    let supers: Vec<_> = class
        .super_type_list_entries()
        .iter()
        .filter_map(|entry| entry.referenced_name())
        .collect();
    assert_eq!(supers, vec!["Base".to_string(), "Marker".to_string()]);

    let params = class.primary_constructor_parameters();
    assert_eq!(params.len(), 2);
    assert!(!params[0].is_mutable());
    assert!(params[1].is_mutable());
    assert!(params[1].has_default_value());
    assert!(params.iter().all(Parameter::has_val_or_var));
}

#[test]
fn property_accessors_and_delegates() {
    let root = parse(
        "class C {\n  var v: Int = 0\n    get() = field\n    private set(value) { field = value }\n  val lazyOne by lazy { 1 }\n}",
    );
    let properties: Vec<Property> = all(&root);
    assert_eq!(properties.len(), 2);

    let v = &properties[0];
    assert!(v.is_var());
    assert!(v.is_member());
    assert!(v.has_initializer());
    assert!(v.has_declared_return_type());
    assert!(v.getter().map_or(false, |g| g.has_body()));
    let setter = v.setter().expect("setter");
    assert!(setter.has_block_body());
    assert_eq!(setter.parameter().and_then(|p| p.name()).as_deref(), Some("value"));

    let lazy = &properties[1];
    assert!(lazy.has_delegate());
    assert!(!lazy.has_initializer());
    assert!(lazy.has_delegate_expression_or_initializer());
}

#[test]
fn secondary_constructor_delegation() {
    let root = parse("class A(x: Int) {\n  constructor() : this(1)\n  constructor(s: String) { }\n}");
    let ctors: Vec<SecondaryConstructor> = all(&root);
    assert_eq!(ctors.len(), 2);

    assert!(ctors[0].is_delegated_call_to_this());
    assert_eq!(ctors[0].delegation_call().map(|c| c.value_arguments().len()), Ok(1));

    assert!(ctors[1].has_implicit_delegation_call());
    let implicit = ctors[1].delegation_call().expect("implicit call node");
    assert!(implicit.is_implicit());
    assert!(implicit.callee_expression().map_or(false, |r| r.is_empty()));
}

#[test]
fn string_templates_and_constants() {
    let root = expr("\"a\\tb $x ${y + 1}\"");
    let template: StringTemplate = first(&root);
    assert!(template.has_interpolation());
    assert_eq!(template.plain_content(), None);
    let kinds: Vec<_> = template.entries().map(|e| e.syntax().kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::LiteralStringTemplateEntry,
            SyntaxKind::EscapeStringTemplateEntry,
            SyntaxKind::LiteralStringTemplateEntry,
            SyntaxKind::ShortStringTemplateEntry,
            SyntaxKind::LiteralStringTemplateEntry,
            SyntaxKind::LongStringTemplateEntry,
        ]
    );

    let plain: StringTemplate = first(&expr("\"a\\nb\""));
    assert_eq!(plain.plain_content().as_deref(), Some("a\nb"));

    let constants: Vec<ConstantExpression> = all(&expr("listOf(1, 2L, 'c', true, null)"));
    let values: Vec<_> = constants.iter().filter_map(|c| c.value()).collect();
    assert_eq!(
        values,
        vec![
            Ok(ConstantValue::Int(1)),
            Ok(ConstantValue::Long(2)),
            Ok(ConstantValue::Char('c')),
            Ok(ConstantValue::Boolean(true)),
            Ok(ConstantValue::Null),
        ]
    );
}

#[test]
fn control_flow_accessors() {
    let root = expr("if (a) b else if (c) d else e");
    let outer: IfExpression = first(&root);
    assert_eq!(outer.condition().map(|e| e.text()).as_deref(), Some("a"));
    assert_eq!(outer.then_branch().map(|e| e.text()).as_deref(), Some("b"));
    let nested = outer
        .else_branch()
        .and_then(|e| IfExpression::cast(e.syntax().clone()))
        .expect("else-if");
    assert!(nested.is_else_if());
    assert!(!outer.is_else_if());
    let root = expr("if (a) b else (if (c) d else e)");
    let outer: IfExpression = first(&root);
    assert!(!outer.is_else_if());
    let parenthesized = root
        .descendants()
        .filter_map(IfExpression::cast)
        .nth(1)
        .expect("inner if");
    assert!(!parenthesized.is_else_if());

    let root = expr("when (x) { 1, 2 -> a\n in r -> b\n !is T -> c\n else -> d }");
    let when: WhenExpression = first(&root);
    assert_eq!(when.subject_expression().map(|e| e.text()).as_deref(), Some("x"));
    let entries: Vec<_> = when.entries().collect();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].conditions().count(), 2);
    assert!(entries[3].is_else());
    assert_eq!(when.else_expression().map(|e| e.text()).as_deref(), Some("d"));
    let is_pattern: WhenConditionIsPattern = first(entries[2].syntax());
    assert!(is_pattern.is_negated());

    let root = expr("for ((k, v) in map) println(k)");
    let for_expr: ForExpression = first(&root);
    assert!(for_expr.destructuring_declaration().is_some());
    assert_eq!(for_expr.loop_range().map(|e| e.text()).as_deref(), Some("map"));

    let root = expr("try { f() } catch (e: E) { g() } finally { h() }");
    let try_expr: TryExpression = first(&root);
    assert_eq!(try_expr.catch_clauses().count(), 1);
    assert!(try_expr.finally_block().is_some());
}

#[test]
fn calls_lambdas_and_labels() {
    let root = expr("items.filter(limit = 3, *rest) loop@{ x -> return@loop x }");
    let call: CallExpression = first(&root);
    assert_eq!(call.callee_expression().map(|e| e.text()).as_deref(), Some("filter"));

    let args = call.value_arguments();
    assert_eq!(args.len(), 2);
    assert!(args[0].is_named());
    assert_eq!(
        args[0].argument_name().and_then(|n| n.as_name()).as_deref(),
        Some("limit")
    );
    assert!(args[1].is_spread());
    assert_eq!(call.lambda_arguments().len(), 1);
    assert_eq!(call.all_arguments().len(), 3);

    let lambda: LambdaExpression = first(&root);
    assert!(lambda.has_declared_parameters());
    assert_eq!(lambda.value_parameters().len(), 1);

    let ret: ReturnExpression = first(&root);
    assert_eq!(ret.label_name().as_deref(), Some("loop"));

    let qualified: DotQualifiedExpression = first(&root);
    assert_eq!(qualified.receiver_expression().map(|e| e.text()).as_deref(), Some("items"));
    assert_eq!(
        qualified.selector_expression().map(|e| e.syntax().kind()),
        Some(SyntaxKind::CallExpression)
    );
}

#[test]
fn type_references_look_through_nullability() {
    let root = parse("val m: Map.Entry<String, *>? = null");
    let ty: TypeReference = first(&root);
    assert!(ty.is_nullable());
    assert_eq!(ty.short_name().as_deref(), Some("Entry"));
    let user = ty.user_type().expect("user type");
    assert_eq!(user.qualified_name().as_deref(), Some("Map.Entry"));
    let args = user.type_arguments();
    assert_eq!(args.len(), 2);
    assert!(args[1].is_star());
}

#[test]
fn categories_cover_their_kinds() {
    let root = parse("object O { fun f() = 1 }\nenum class E { A, B }");
    let declarations: Vec<Declaration> = all(&root);
    assert!(declarations.iter().all(|d| d.syntax().kind().is_node()));
    let named: Vec<String> = all::<NamedDeclaration>(&root)
        .iter()
        .filter_map(|d| d.name())
        .collect();
    assert_eq!(named, vec!["O", "f", "E", "A", "B"]);

    let enum_class = all::<Class>(&root)
        .into_iter()
        .find(|c| c.is_enum())
        .expect("enum");
    assert_eq!(enum_class.enum_entries().len(), 2);
    let entry: EnumEntry = first(&root);
    assert_eq!(entry.enum_class().as_ref(), Some(&enum_class));

    let object = ClassOrObject::from_node(&first::<ObjectDeclaration>(&root)).expect("object");
    assert!(object.is_object());
    assert_eq!(object.declarations().len(), 1);
}
