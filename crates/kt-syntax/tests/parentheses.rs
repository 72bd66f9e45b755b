use kt_syntax::edit::TreeEditor;
use kt_syntax::precedence::{are_parentheses_necessary, are_parentheses_useless};
use kt_syntax::{
    parse_kotlin, parse_kotlin_expression, AstNode, Expression, KtElement, KtFile,
    ParenthesizedExpression, PrefixExpression, SyntaxNode,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Preorder kinds plus the text of significant tokens.
fn shape(node: &SyntaxNode) -> Vec<String> {
    node.preorder_with_tokens()
        .filter_map(|event| match event {
            rowan::WalkEvent::Enter(element) => Some(element),
            rowan::WalkEvent::Leave(_) => None,
        })
        .filter(|element| !element.kind().is_trivia())
        .map(|element| match element {
            rowan::NodeOrToken::Node(node) => format!("{:?}", node.kind()),
            rowan::NodeOrToken::Token(token) => format!("{:?} {}", token.kind(), token.text()),
        })
        .collect()
}

fn necessary(text: &str) -> bool {
    let parse = parse_kotlin_expression(text);
    assert_eq!(parse.errors, Vec::new(), "{text}");
    let root = parse.syntax();
    let paren = root
        .descendants()
        .find_map(ParenthesizedExpression::cast)
        .expect("parenthesized expression");
    let inner = paren.expression().expect("inner expression");
    let current = Expression::cast(paren.syntax().clone()).expect("expression");
    let parent = paren
        .syntax()
        .parent()
        .and_then(KtElement::cast)
        .expect("parent element");
    are_parentheses_necessary(&inner, &current, &parent)
}

#[test]
fn nested_negation_keeps_parentheses() {
    assert!(necessary("-(-x)"));
    assert!(!necessary("-(x)"));
    assert!(necessary("+(+x)"));
    assert!(!necessary("-(+x)"));

    let parse = parse_kotlin_expression("-(-x)");
    let outer = parse
        .syntax()
        .descendants()
        .find_map(PrefixExpression::cast)
        .expect("prefix");
    assert_eq!(outer.text(), "-(-x)");
}

#[test]
fn same_priority_only_on_the_left() {
    assert!(!necessary("(a - b) - c"));
    assert!(necessary("a - (b - c)"));
    assert!(necessary("(a + b) * c"));
    assert!(!necessary("a + (b * c)"));
    // Conjunctions and disjunctions may be regrouped freely.
    assert!(!necessary("a && (b && c)"));
}

/// Operators whose chains keep their grouping when reparsed. `&&` and `||`
/// are left out: their parentheses are dropped even where that regroups
/// the chain.
fn binary_operator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "+", "-", "*", "/", "%", "..", "?:", "<=", ">=", "==", "!=", "to",
    ])
}

fn prefix_operator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["-", "+", "!"])
}

fn expression() -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(vec!["a", "b", "c", "true", "s.size", "g(a)"])
        .prop_map(str::to_string);
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), binary_operator(), inner.clone())
                .prop_map(|(left, op, right)| format!("({left}) {op} ({right})")),
            (prefix_operator(), inner.clone()).prop_map(|(op, e)| format!("{op}({e})")),
            inner.clone().prop_map(|e| format!("({e})!!")),
            inner.clone().prop_map(|e| format!("({e}).m")),
            inner.prop_map(|e| format!("f({e})")),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Dropping parentheses judged useless must not change the tree apart
    /// from the removed wrapper.
    #[test]
    fn useless_parentheses_reparse_to_the_same_tree(expr in expression()) {
        let text = format!("val v = {expr}\n");
        let parse = parse_kotlin(&text);
        prop_assert_eq!(parse.errors.clone(), Vec::new(), "{}", text);
        let file = KtFile::cast(parse.syntax()).expect("file");

        let candidates: Vec<ParenthesizedExpression> = file
            .syntax()
            .descendants()
            .filter_map(ParenthesizedExpression::cast)
            .filter(are_parentheses_useless)
            .collect();

        for paren in candidates {
            let mut editor = TreeEditor::new(&file);
            let target = editor.find(&paren).expect("parenthesized node in copy");
            let inner = target.expression().expect("inner expression");
            editor.replace(&target, &inner).expect("replace");
            let edited = editor.finish();

            let reparsed = parse_kotlin(&edited.text());
            prop_assert_eq!(reparsed.errors.clone(), Vec::new(), "{}", edited.text());
            prop_assert_eq!(
                shape(&reparsed.syntax()),
                shape(edited.syntax()),
                "removing {} from {}",
                paren.text(),
                text
            );
        }
    }
}
