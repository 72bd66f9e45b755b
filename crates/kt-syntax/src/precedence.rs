//! Operator precedence and parenthesization.
//!
//! The same table drives the Pratt parser and the "are these parentheses
//! needed" query, so a tree printed with only the necessary parentheses
//! reparses to the same shape.

use crate::ast::{
    support, AstNode, BinaryExpression, DotQualifiedExpression, Expression, KtElement,
    ParenthesizedExpression, QualifiedExpression, ValueArgument,
};
use crate::parser::{SyntaxElement, SyntaxNode};
use crate::syntax_kind::{KindSet, SyntaxKind};

/// Binary and unary operator precedence, tightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Postfix,
    Prefix,
    As,
    Multiplicative,
    Additive,
    Range,
    /// Infix function calls: `a to b`.
    SimpleName,
    Elvis,
    InOrIs,
    Comparison,
    Equality,
    Conjunction,
    Disjunction,
    Assignment,
}

/// One past the number of precedence levels; the priority of atoms.
const MAX_PRIORITY: u8 = Precedence::Assignment as u8 + 2;

impl Precedence {
    pub const ALL: [Precedence; 14] = [
        Precedence::Postfix,
        Precedence::Prefix,
        Precedence::As,
        Precedence::Multiplicative,
        Precedence::Additive,
        Precedence::Range,
        Precedence::SimpleName,
        Precedence::Elvis,
        Precedence::InOrIs,
        Precedence::Comparison,
        Precedence::Equality,
        Precedence::Conjunction,
        Precedence::Disjunction,
        Precedence::Assignment,
    ];

    /// The precedence of `op` used as a binary operator. Prefix and postfix
    /// operators are not binary and return `None`.
    pub fn of_binary_operation(op: SyntaxKind) -> Option<Precedence> {
        Some(match op {
            SyntaxKind::AsKw | SyntaxKind::AsSafe => Precedence::As,
            SyntaxKind::Mul | SyntaxKind::Div | SyntaxKind::Perc => Precedence::Multiplicative,
            SyntaxKind::Plus | SyntaxKind::Minus => Precedence::Additive,
            SyntaxKind::Range | SyntaxKind::RangeUntil => Precedence::Range,
            SyntaxKind::Identifier => Precedence::SimpleName,
            SyntaxKind::Elvis => Precedence::Elvis,
            SyntaxKind::InKw | SyntaxKind::NotIn | SyntaxKind::IsKw | SyntaxKind::NotIs => {
                Precedence::InOrIs
            }
            SyntaxKind::Lt | SyntaxKind::Gt | SyntaxKind::LtEq | SyntaxKind::GtEq => {
                Precedence::Comparison
            }
            SyntaxKind::EqEq | SyntaxKind::ExclEq | SyntaxKind::EqEqEq | SyntaxKind::ExclEqEq => {
                Precedence::Equality
            }
            SyntaxKind::AndAnd => Precedence::Conjunction,
            SyntaxKind::OrOr => Precedence::Disjunction,
            kind if KindSet::ASSIGNMENT_OPERATORS.contains(kind) => Precedence::Assignment,
            _ => return None,
        })
    }

    /// Pratt binding powers `(left, right)`. Assignment is right
    /// associative, everything else left associative.
    pub fn binding_power(self) -> (u8, u8) {
        let left = 2 * (Precedence::Assignment as u8 - self as u8 + 1);
        match self {
            Precedence::Assignment => (left, left - 1),
            _ => (left, left + 1),
        }
    }
}

/// How tightly `expr` binds when it appears as an operand. Higher binds
/// tighter.
pub fn priority(expr: &Expression) -> u8 {
    match expr.syntax().kind() {
        SyntaxKind::PostfixExpression
        | SyntaxKind::DotQualifiedExpression
        | SyntaxKind::SafeAccessExpression
        | SyntaxKind::CallExpression
        | SyntaxKind::ArrayAccessExpression
        | SyntaxKind::CallableReferenceExpression
        | SyntaxKind::ClassLiteralExpression => MAX_PRIORITY - 1,
        SyntaxKind::PrefixExpression | SyntaxKind::LabeledExpression => MAX_PRIORITY - 2,
        SyntaxKind::IfExpression => Precedence::Assignment as u8,
        SyntaxKind::SuperExpression => MAX_PRIORITY,
        kind if is_statement_like(kind) => 0,
        _ => match operation_kind(expr.syntax()).and_then(Precedence::of_binary_operation) {
            Some(precedence) => MAX_PRIORITY - precedence as u8 - 1,
            None => MAX_PRIORITY,
        },
    }
}

/// Declarations and loops never act as operands.
fn is_statement_like(kind: SyntaxKind) -> bool {
    KindSet::DECLARATIONS.contains(kind) || KindSet::LOOP_EXPRESSIONS.contains(kind)
}

/// The operator of a binary, type-binary, `is` or unary expression.
fn operation_kind(node: &SyntaxNode) -> Option<SyntaxKind> {
    if !matches!(
        node.kind(),
        SyntaxKind::BinaryExpression
            | SyntaxKind::BinaryWithTypeRhsExpression
            | SyntaxKind::IsExpression
            | SyntaxKind::PrefixExpression
            | SyntaxKind::PostfixExpression
    ) {
        return None;
    }
    let op = support::child_of_kind(node, SyntaxKind::OperationReference)?;
    op.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|tok| !tok.kind().is_trivia())
        .map(|tok| tok.kind())
}

/// Strip parentheses, labels and (unless `keep_annotations`) annotations.
/// Returns `None` if a wrapper is empty, as in `()`.
pub fn deparenthesize(expr: Expression, keep_annotations: bool) -> Option<Expression> {
    let mut current = expr;
    loop {
        let next = match current.syntax().kind() {
            SyntaxKind::AnnotatedExpression if !keep_annotations => support::child(current.syntax()),
            SyntaxKind::LabeledExpression | SyntaxKind::ParenthesizedExpression => {
                support::child(current.syntax())
            }
            _ => return Some(current),
        };
        current = next?;
    }
}

/// [`deparenthesize`], falling back to `expr` itself when a wrapper is
/// empty.
pub fn safe_deparenthesize(expr: Expression, keep_annotations: bool) -> Expression {
    deparenthesize(expr.clone(), keep_annotations).unwrap_or(expr)
}

/// `=`, `+=`, `-=`, ...
pub fn is_assignment(node: &SyntaxNode) -> bool {
    node.kind() == SyntaxKind::BinaryExpression
        && operation_kind(node).map_or(false, |op| KindSet::ASSIGNMENT_OPERATORS.contains(op))
}

pub fn is_ordinary_assignment(node: &SyntaxNode) -> bool {
    node.kind() == SyntaxKind::BinaryExpression && operation_kind(node) == Some(SyntaxKind::Eq)
}

/// Whether the parentheses of `expr` can be dropped without changing how
/// the code parses.
pub fn are_parentheses_useless(expr: &ParenthesizedExpression) -> bool {
    let Some(inner) = expr.expression() else {
        return true;
    };
    let Some(parent) = expr.syntax().parent().and_then(KtElement::cast) else {
        return true;
    };
    let current = Expression::new_unchecked(expr.syntax().clone());
    !are_parentheses_necessary(&inner, &current, &parent)
}

/// Whether `inner` needs parentheses when it sits where `current_inner` is,
/// as a child of `parent`.
///
/// `current_inner` is the node currently occupying the position (usually
/// the parenthesized wrapper around `inner`); `inner` is what would remain
/// after unwrapping.
pub fn are_parentheses_necessary(
    inner: &Expression,
    current_inner: &Expression,
    parent: &KtElement,
) -> bool {
    let inner_kind = inner.syntax().kind();
    let parent_node = parent.syntax();
    let parent_kind = parent_node.kind();

    if parent_kind == SyntaxKind::DelegatedSuperTypeEntry {
        return true;
    }
    if parent_kind == SyntaxKind::ParenthesizedExpression
        || inner_kind == SyntaxKind::ParenthesizedExpression
    {
        return false;
    }
    if matches!(
        parent_kind,
        SyntaxKind::PackageDirective
            | SyntaxKind::WhenExpression
            | SyntaxKind::CollectionLiteralExpression
    ) || inner_kind == SyntaxKind::WhenExpression
    {
        return false;
    }

    if inner_kind == SyntaxKind::IfExpression {
        if KindSet::QUALIFIED_EXPRESSIONS.contains(parent_kind) {
            return true;
        }
        // An `if` swallows everything after its else branch, so it needs
        // parentheses unless it ends where its enclosing statement ends.
        let inner_end = current_inner.syntax().text_range().end();
        let mut current = Some(parent_node.clone());
        while let Some(node) = current {
            if is_if_walk_boundary(node.kind()) {
                break;
            }
            if node.text_range().end() != inner_end {
                return !matches!(
                    node.kind(),
                    SyntaxKind::ParenthesizedExpression | SyntaxKind::ValueArgumentList
                );
            }
            current = node.parent();
        }
    }

    if inner_kind == SyntaxKind::LambdaExpression {
        let prev = previous_significant_sibling(current_inner.syntax());
        if prev.map_or(false, |element| ends_with_parenthesis_or_call(&element)) {
            return true;
        }
    }

    if parent_kind == SyntaxKind::CallExpression
        && support::child::<Expression>(parent_node).as_ref() == Some(current_inner)
    {
        let mut target = inner.syntax().clone();
        if target.kind() == SyntaxKind::DotQualifiedExpression {
            if let Some(selector) = DotQualifiedExpression::cast(target.clone())
                .and_then(|qualified| qualified.selector_expression())
            {
                target = selector.syntax().clone();
            }
        }
        if KindSet::SIMPLE_NAME_EXPRESSIONS.contains(target.kind()) {
            return false;
        }
        if is_selector_of_qualified(parent_node) {
            return true;
        }
        if target.kind() == SyntaxKind::CallExpression
            && support::child_of_kind(parent_node, SyntaxKind::ValueArgumentList).is_none()
        {
            return true;
        }
        return !(matches!(
            target.kind(),
            SyntaxKind::ThisExpression
                | SyntaxKind::ArrayAccessExpression
                | SyntaxKind::StringTemplate
                | SyntaxKind::CallExpression
        ) || KindSet::CONSTANTS.contains(target.kind()));
    }

    let inner_op = operation_kind(inner.syntax());

    if parent_kind == SyntaxKind::ValueArgument && inner_op == Some(SyntaxKind::Lt) {
        // `a((b < c), d > e)` must not turn into a type argument list.
        let next_is_gt = support::sibling::<ValueArgument>(parent_node, rowan::Direction::Next)
            .and_then(|arg| arg.argument_expression())
            .map_or(false, |next| {
                next.syntax().kind() == SyntaxKind::BinaryExpression
                    && operation_kind(next.syntax()) == Some(SyntaxKind::Gt)
            });
        if inner_kind == SyntaxKind::BinaryExpression && next_is_gt {
            return true;
        }
    }

    if inner_kind == SyntaxKind::BinaryExpression {
        let inner_binary = BinaryExpression::new_unchecked(inner.syntax().clone());
        if parent_kind == SyntaxKind::BinaryExpression
            && inner_binary
                .right()
                .map_or(false, |right| right.syntax().kind() == SyntaxKind::ReturnExpression)
        {
            return true;
        }
        // Inside these, newlines do not end the expression.
        let parent_allows_line_break = matches!(
            parent_kind,
            SyntaxKind::ValueArgument
                | SyntaxKind::ValueParameter
                | SyntaxKind::LongStringTemplateEntry
                | SyntaxKind::Condition
                | SyntaxKind::LoopRange
                | SyntaxKind::Indices
        );
        if inner_op != Some(SyntaxKind::Elvis)
            && !parent_allows_line_break
            && keeps_line_break(&inner_binary)
        {
            return true;
        }
    }

    let Some(parent_expr) = Expression::cast(parent_node.clone()) else {
        return false;
    };
    let parent_op = operation_kind(parent_node);

    if parent_kind == SyntaxKind::ReturnExpression
        && matches!(
            inner_kind,
            SyntaxKind::LabeledExpression | SyntaxKind::AnnotatedExpression
        )
    {
        return true;
    }
    if inner_kind == SyntaxKind::BinaryWithTypeRhsExpression && parent_op == Some(SyntaxKind::Lt) {
        return true;
    }
    if parent_kind == SyntaxKind::LabeledExpression {
        return false;
    }

    let is_right_operand = || {
        parent_kind == SyntaxKind::BinaryExpression
            && BinaryExpression::new_unchecked(parent_node.clone()).right().as_ref()
                == Some(current_inner)
    };

    if parent_op == Some(SyntaxKind::Elvis)
        && parent_kind == SyntaxKind::BinaryExpression
        && inner_kind != SyntaxKind::BinaryExpression
        && is_right_operand()
    {
        return false;
    }
    if parent_op == Some(SyntaxKind::Eq)
        && parent_kind == SyntaxKind::BinaryExpression
        && inner_kind == SyntaxKind::Fun
        && is_right_operand()
    {
        return false;
    }

    let inner_priority = priority(inner);
    let parent_priority = priority(&parent_expr);

    if inner_priority == parent_priority {
        if parent_kind == SyntaxKind::BinaryExpression {
            if matches!(inner_op, Some(SyntaxKind::AndAnd | SyntaxKind::OrOr)) {
                return false;
            }
            return is_right_operand();
        }
        if parent_kind == SyntaxKind::PrefixExpression && inner_kind == SyntaxKind::PrefixExpression
        {
            // `+(+x)` and `-(--x)` would lex as a different operator.
            return match parent_op {
                Some(SyntaxKind::Plus) => {
                    matches!(inner_op, Some(SyntaxKind::Plus | SyntaxKind::PlusPlus))
                }
                Some(SyntaxKind::Minus) => {
                    matches!(inner_op, Some(SyntaxKind::Minus | SyntaxKind::MinusMinus))
                }
                _ => false,
            };
        }
        return false;
    }

    inner_priority < parent_priority
}

fn is_if_walk_boundary(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::Block | SyntaxKind::KtFile) || is_statement_like(kind)
}

fn is_selector_of_qualified(node: &SyntaxNode) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    if !KindSet::QUALIFIED_EXPRESSIONS.contains(parent.kind()) {
        return false;
    }
    QualifiedExpression::cast(parent)
        .and_then(|qualified| qualified.selector_expression())
        .map_or(false, |selector| selector.syntax() == node)
}

fn previous_significant_sibling(node: &SyntaxNode) -> Option<SyntaxElement> {
    let mut prev = node.prev_sibling_or_token();
    while let Some(element) = prev {
        if !element.kind().is_trivia() {
            return Some(element);
        }
        prev = element.prev_sibling_or_token();
    }
    None
}

fn ends_with_parenthesis_or_call(element: &SyntaxElement) -> bool {
    match element {
        SyntaxElement::Token(token) => token.text().ends_with(')'),
        SyntaxElement::Node(node) => {
            if node.kind() == SyntaxKind::CallExpression || node.text().to_string().ends_with(')') {
                return true;
            }
            match node.last_child() {
                Some(child) => ends_with_parenthesis_or_call(&SyntaxElement::Node(child)),
                None => false,
            }
        }
    }
}

/// A line break before the operator of `expr` or of any binary operand
/// inside it. Removing the parentheses would end the statement at that
/// line break.
fn keeps_line_break(expr: &BinaryExpression) -> bool {
    for element in expr.syntax().children_with_tokens() {
        if element.kind() == SyntaxKind::OperationReference {
            break;
        }
        if let SyntaxElement::Token(token) = &element {
            if token.kind() == SyntaxKind::Whitespace && token.text().contains('\n') {
                return true;
            }
        }
    }
    let nested = |operand: Option<Expression>| {
        operand
            .and_then(|expr| BinaryExpression::cast(expr.syntax().clone()))
            .map_or(false, |binary| keeps_line_break(&binary))
    };
    nested(expr.right()) || nested(expr.left())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse_kotlin_expression;

    fn first_parenthesized(text: &str) -> ParenthesizedExpression {
        let parse = parse_kotlin_expression(text);
        assert_eq!(parse.errors, Vec::new(), "unexpected errors for {text:?}");
        parse
            .syntax()
            .descendants()
            .find_map(ParenthesizedExpression::cast)
            .expect("parenthesized expression")
    }

    fn useless(text: &str) -> bool {
        are_parentheses_useless(&first_parenthesized(text))
    }

    #[test]
    fn binding_powers_follow_table_order() {
        let (mul, _) = Precedence::Multiplicative.binding_power();
        let (add, _) = Precedence::Additive.binding_power();
        let (assign_left, assign_right) = Precedence::Assignment.binding_power();
        assert!(mul > add);
        assert!(assign_right < assign_left);
        for pair in Precedence::ALL.windows(2) {
            assert!(pair[0].binding_power().0 > pair[1].binding_power().0);
        }
    }

    #[test]
    fn nested_negation_keeps_parentheses() {
        assert!(!useless("-(-x)"));
        assert!(!useless("-(--x)"));
        assert!(!useless("+(+x)"));
        assert!(useless("-(x)"));
        assert!(useless("-(+x)"));
    }

    #[test]
    fn priorities_decide_binary_operands() {
        assert!(!useless("(a + b) * c"));
        assert!(useless("a + (b * c)"));
        assert!(useless("(a - b) - c"));
        assert!(!useless("a - (b - c)"));
        assert!(useless("a && (b && c)"));
        assert!(!useless("(a || b) && c"));
    }

    #[test]
    fn elvis_right_operand_needs_no_parentheses() {
        assert!(useless("a ?: (b.c())"));
        assert!(!useless("(a ?: b).c()"));
    }

    #[test]
    fn if_in_receiver_position_needs_parentheses() {
        assert!(!useless("(if (a) b else c).d"));
        assert!(!useless("(if (a) b else c) + 1"));
        assert!(useless("x = (if (a) b else c)"));
    }

    #[test]
    fn call_callee_rules() {
        assert!(useless("(foo)(1)"));
        assert!(!useless("(a + b)(1)"));
    }

    #[test]
    fn deparenthesize_strips_wrappers() {
        let parse = parse_kotlin_expression("((l@ (x)))");
        let expr = parse
            .syntax()
            .children()
            .find_map(Expression::cast)
            .expect("expression");
        let inner = deparenthesize(expr, false).expect("inner");
        assert_eq!(inner.syntax().kind(), SyntaxKind::NameReferenceExpression);
        assert_eq!(inner.text(), "x");
    }

    #[test]
    fn assignments_are_recognised() {
        let parse = parse_kotlin_expression("a += 1");
        let node = parse.syntax().first_child().expect("binary");
        assert!(is_assignment(&node));
        assert!(!is_ordinary_assignment(&node));
    }
}
