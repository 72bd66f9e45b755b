use kt_syntax::precedence::are_parentheses_useless;
use kt_syntax::visitor::{Accept, Visitor, VoidVisitor, VoidVisitorWithParameter};
use kt_syntax::{
    parse_kotlin, parse_kotlin_expression, AnnotationEntry, AstNode, BinaryExpression, Class,
    ClassOrObject, Declaration, Element, Expression, FqName, KtFile, NamedDeclaration,
    NamedDeclarationOwner, ParenthesizedExpression, SyntaxKind,
};
use pretty_assertions::assert_eq;

fn file(text: &str) -> KtFile {
    let parse = parse_kotlin(text);
    assert_eq!(parse.errors, Vec::new(), "unexpected errors in {text:?}");
    KtFile::cast(parse.syntax()).expect("file root")
}

#[test]
fn right_operand_of_sum_is_the_product() {
    let parse = parse_kotlin_expression("a + b * c");
    let sum = parse
        .syntax()
        .descendants()
        .find_map(BinaryExpression::cast)
        .expect("binary expression");
    let left = sum.left().expect("left");
    let right = sum.right().expect("right");
    assert_eq!(left.syntax().kind(), SyntaxKind::NameReferenceExpression);
    assert_eq!(right.syntax().kind(), SyntaxKind::BinaryExpression);
    assert_eq!(right.text(), "b * c");
}

#[test]
fn adding_a_secondary_constructor_removes_the_implicit_primary() {
    let before = file("class Widget {\n    val id = 0\n}\n");
    let class = before
        .syntax()
        .descendants()
        .find_map(Class::cast)
        .expect("class");
    assert!(class.has_primary_constructor());

    let after = file("class Widget {\n    val id = 0\n    constructor(name: String)\n}\n");
    let class = after
        .syntax()
        .descendants()
        .find_map(Class::cast)
        .expect("class");
    assert!(!class.has_primary_constructor());
}

#[test]
fn aliased_import() {
    let file = file("import foo.bar.Baz as Qux\n");
    let import = file.import_directives().pop().expect("import");
    assert_eq!(import.alias_name().as_deref(), Some("Qux"));
    assert!(!import.is_all_under());
    assert_eq!(import.imported_fq_name(), Some(FqName::from("foo.bar.Baz")));
    assert_eq!(import.imported_fq_name().map(|n| n.to_string()).as_deref(), Some("foo.bar.Baz"));
}

#[test]
fn negation_of_negation_keeps_parentheses() {
    let useless = |text: &str| {
        let parse = parse_kotlin_expression(text);
        let paren = parse
            .syntax()
            .descendants()
            .find_map(ParenthesizedExpression::cast)
            .expect("parenthesized");
        are_parentheses_useless(&paren)
    };
    assert!(!useless("-(-x)"));
    assert!(useless("-(x)"));
}

/// Counts declarations through the most general declaration method only.
#[derive(Default)]
struct DeclarationKinds(Vec<SyntaxKind>);

impl VoidVisitor for DeclarationKinds {
    fn visit_declaration(&mut self, node: &Declaration) {
        self.0.push(node.syntax().kind());
        node.accept_children(self);
    }
}

#[test]
fn ancestor_override_receives_descendant_kinds() {
    let file = file(
        "enum class Color { RED, GREEN }\nobject Registry\ntypealias Name = String\nfun main() { val local = 1 }\n",
    );
    let mut visitor = DeclarationKinds::default();
    file.accept_void(&mut visitor);
    assert_eq!(
        visitor.0,
        vec![
            SyntaxKind::Class,
            SyntaxKind::EnumEntry,
            SyntaxKind::EnumEntry,
            SyntaxKind::ObjectDeclaration,
            SyntaxKind::TypeAlias,
            SyntaxKind::Fun,
            SyntaxKind::Property,
        ]
    );
}

/// Enum entries fall back to `visit_class`, classes to
/// `visit_class_or_object`.
struct ClassNames;

impl VoidVisitorWithParameter<Vec<String>> for ClassNames {
    fn visit_class_or_object(&mut self, node: &ClassOrObject, names: &mut Vec<String>) {
        names.push(node.name().unwrap_or_default());
        node.accept_children_with(self, names);
    }
}

#[test]
fn parameter_visitor_collects_through_class_chain() {
    let file = file("class Outer { enum class E { A } companion object Factory }\n");
    let mut names = Vec::new();
    file.accept_with(&mut ClassNames, &mut names);
    assert_eq!(names, vec!["Outer", "E", "A", "Factory"]);
}

/// Counts expressions, stopping at named declarations.
struct ExpressionCount;

impl Visitor<()> for ExpressionCount {
    type Output = usize;

    fn visit_element(&mut self, element: &Element, _: ()) -> usize {
        element
            .syntax()
            .children()
            .filter_map(Element::cast)
            .map(|child| child.accept(self, ()))
            .sum()
    }

    fn visit_expression(&mut self, node: &Expression, _: ()) -> usize {
        1 + self.visit_element(&Element::from_node(node).expect("element"), ())
    }

    fn visit_named_declaration(&mut self, _: &NamedDeclaration, _: ()) -> usize {
        0
    }
}

#[test]
fn context_visitor_overrides_at_two_levels() {
    let parse = parse_kotlin_expression("f(a + 1, b)");
    let root = Element::cast(parse.syntax()).expect("root");
    // call, callee, binary, a, operation reference, 1, b
    assert_eq!(root.accept(&mut ExpressionCount, ()), 7);

    let file = file("fun f() = 1\nval x = 2");
    let root = Element::from_node(&file).expect("root");
    assert_eq!(root.accept(&mut ExpressionCount, ()), 0);
}

#[derive(Default)]
struct Annotations(Vec<String>);

impl VoidVisitor for Annotations {
    fn visit_annotation_entry(&mut self, node: &AnnotationEntry) {
        self.0.extend(node.short_name());
    }
}

#[test]
fn void_visitor_walks_the_whole_tree() {
    let file = file("@file:JvmName(\"X\")\n@Deprecated(\"no\") class A { @Volatile var v = 0\n fun f(@Ann p: Int) {} }\n");
    let mut visitor = Annotations::default();
    file.accept_void(&mut visitor);
    assert_eq!(visitor.0, vec!["JvmName", "Deprecated", "Volatile", "Ann"]);
}
