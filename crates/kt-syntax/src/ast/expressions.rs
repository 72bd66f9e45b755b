use rowan::Direction;

use crate::ast::{
    support, AnnotationEntry, AstNode, FunctionLiteral, ObjectDeclaration, Parameter,
    ParameterList, Property, TypeArgumentList, TypeReference,
};
use crate::errors::SyntaxError;
use crate::literals::{self, ConstantValue, LiteralError};
use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::{KindSet, SyntaxKind};

ast_category! {
    /// Every expression kind. Declarations are expressions too, which lets
    /// a local `fun` or `val` appear wherever a statement can.
    Expression => KindSet::EXPRESSIONS
}
ast_category!(ReferenceExpression => KindSet::REFERENCE_EXPRESSIONS);
ast_category!(SimpleNameExpression => KindSet::SIMPLE_NAME_EXPRESSIONS);
ast_category!(QualifiedExpression => KindSet::QUALIFIED_EXPRESSIONS);
ast_category!(UnaryExpression => KindSet::UNARY_EXPRESSIONS);
ast_category!(LoopExpression => KindSet::LOOP_EXPRESSIONS);
ast_category! {
    /// Expressions that may carry an `@label`.
    ExpressionWithLabel => KindSet::EXPRESSIONS_WITH_LABEL
}
ast_category!(DoubleColonExpression => KindSet::DOUBLE_COLON_EXPRESSIONS);
ast_category!(ConstantExpression => KindSet::CONSTANTS);
ast_category!(StringTemplateEntry => KindSet::STRING_TEMPLATE_ENTRIES);
ast_category!(StringTemplateEntryWithExpression => KindSet::STRING_TEMPLATE_ENTRIES_WITH_EXPRESSION);
ast_category!(WhenCondition => KindSet::WHEN_CONDITIONS);
ast_category! {
    /// Positional wrappers around an expression: `Condition`, `Then`,
    /// `Else`, `Body`, `LoopRange` and `Indices`.
    ContainerNode => KindSet::CONTAINER_NODES
}

ast_node!(NameReferenceExpression => NameReferenceExpression);
ast_node!(OperationReference => OperationReference);
ast_node!(LabelReference => LabelReference);
ast_node!(LabelQualifier => LabelQualifier);
ast_node!(
    /// `this` or `super` after the `:` of a secondary constructor. Empty
    /// when the delegation is implicit.
    ConstructorDelegationReference => ConstructorDelegationReference
);
ast_node!(StringTemplate => StringTemplate);
ast_node!(LiteralStringTemplateEntry => LiteralStringTemplateEntry);
ast_node!(EscapeStringTemplateEntry => EscapeStringTemplateEntry);
ast_node!(ShortStringTemplateEntry => ShortStringTemplateEntry);
ast_node!(LongStringTemplateEntry => LongStringTemplateEntry);
ast_node!(ParenthesizedExpression => ParenthesizedExpression);
ast_node!(ThisExpression => ThisExpression);
ast_node!(SuperExpression => SuperExpression);
ast_node!(IfExpression => IfExpression);
ast_node!(WhenExpression => WhenExpression);
ast_node!(WhenEntry => WhenEntry);
ast_node!(WhenConditionWithExpression => WhenConditionExpression);
ast_node!(WhenConditionInRange => WhenConditionInRange);
ast_node!(WhenConditionIsPattern => WhenConditionIsPattern);
ast_node!(TryExpression => TryExpression);
ast_node!(CatchClause => CatchClause);
ast_node!(FinallySection => FinallySection);
ast_node!(ForExpression => ForExpression);
ast_node!(WhileExpression => WhileExpression);
ast_node!(DoWhileExpression => DoWhileExpression);
ast_node!(LambdaExpression => LambdaExpression);
ast_node!(AnnotatedExpression => AnnotatedExpression);
ast_node!(LabeledExpression => LabeledExpression);
ast_node!(BinaryExpression => BinaryExpression);
ast_node!(
    /// `x as T` and `x as? T`.
    BinaryWithTypeRhsExpression => BinaryWithTypeRhsExpression
);
ast_node!(IsExpression => IsExpression);
ast_node!(PrefixExpression => PrefixExpression);
ast_node!(PostfixExpression => PostfixExpression);
ast_node!(CallExpression => CallExpression);
ast_node!(ArrayAccessExpression => ArrayAccessExpression);
ast_node!(DotQualifiedExpression => DotQualifiedExpression);
ast_node!(SafeQualifiedExpression => SafeAccessExpression);
ast_node!(CallableReferenceExpression => CallableReferenceExpression);
ast_node!(ClassLiteralExpression => ClassLiteralExpression);
ast_node!(ObjectLiteralExpression => ObjectLiteralExpression);
ast_node!(ReturnExpression => ReturnExpression);
ast_node!(ThrowExpression => ThrowExpression);
ast_node!(BreakExpression => BreakExpression);
ast_node!(ContinueExpression => ContinueExpression);
ast_node!(CollectionLiteralExpression => CollectionLiteralExpression);
ast_node!(
    /// `{ ... }` statement blocks, the body of a lambda, and the top-level
    /// statement list of a script (which has no braces).
    BlockExpression => Block
);
ast_node!(ValueArgumentList => ValueArgumentList);
ast_node!(
    /// An argument inside parentheses or a trailing lambda.
    ValueArgument => ValueArgument | LambdaArgument
);
ast_node!(ValueArgumentName => ValueArgumentName);
ast_node!(LambdaArgument => LambdaArgument);
ast_node!(
    /// `val (a, b) = pair`, or `(a, b)` as a lambda or loop parameter.
    DestructuringDeclaration => DestructuringDeclaration
);

/// The first non-trivia token directly under `node`.
fn first_significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|tok| !tok.kind().is_trivia())
}

/// The expression wrapped by a container node of `kind` directly under
/// `node`.
fn container_expression(node: &SyntaxNode, kind: SyntaxKind) -> Option<Expression> {
    let container = support::child_of_kind(node, kind)?;
    support::child(&container)
}

impl Expression {
    /// The nearest enclosing expression, skipping container nodes and
    /// argument wrappers.
    pub fn parent_expression(&self) -> Option<Expression> {
        self.syntax.ancestors().skip(1).find_map(Expression::cast)
    }

    pub fn is_declaration(&self) -> bool {
        KindSet::DECLARATIONS.contains(self.syntax.kind())
    }
}

impl ReferenceExpression {
    /// The referenced simple name, if this is a plain name or operation.
    pub fn referenced_name(&self) -> Option<String> {
        SimpleNameExpression::cast(self.syntax.clone())?.referenced_name()
    }
}

impl SimpleNameExpression {
    pub fn referenced_name_element(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }

    pub fn referenced_name(&self) -> Option<String> {
        self.referenced_name_element()
            .map(|tok| support::unquote(tok.text()).to_string())
    }
}

impl NameReferenceExpression {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind().is_identifier_like())
    }

    /// The name with backticks removed.
    pub fn referenced_name(&self) -> Option<String> {
        self.identifier()
            .map(|tok| support::unquote(tok.text()).to_string())
    }
}

impl OperationReference {
    pub fn operation_token(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }

    /// The operator kind. Infix function calls (`a to b`) report
    /// `Identifier`.
    pub fn operation_kind(&self) -> Option<SyntaxKind> {
        self.operation_token().map(|tok| tok.kind())
    }

    pub fn is_assignment(&self) -> bool {
        self.operation_kind()
            .map_or(false, |kind| KindSet::ASSIGNMENT_OPERATORS.contains(kind))
    }
}

impl LabelReference {
    pub fn label_name(&self) -> Option<String> {
        support::ident_token(&self.syntax).map(|tok| support::unquote(tok.text()).to_string())
    }
}

impl LabelQualifier {
    pub fn label_reference(&self) -> Option<LabelReference> {
        support::child(&self.syntax)
    }

    pub fn label_name(&self) -> Option<String> {
        self.label_reference()?.label_name()
    }
}

impl ConstructorDelegationReference {
    pub fn is_this(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::ThisKw).is_some()
    }

    pub fn is_super(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::SuperKw).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.syntax.text_range().is_empty()
    }
}

impl ConstantExpression {
    pub fn literal_token(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }

    /// Evaluate the literal. Malformed literals (overflow, a bad suffix)
    /// are reported as errors rather than rejected by the parser.
    pub fn value(&self) -> Option<Result<ConstantValue, LiteralError>> {
        let token = self.literal_token()?;
        Some(literals::parse_constant(token.kind(), token.text()))
    }
}

impl StringTemplate {
    pub fn entries(&self) -> impl Iterator<Item = StringTemplateEntry> + '_ {
        support::children(&self.syntax)
    }

    pub fn has_interpolation(&self) -> bool {
        self.entries().any(|entry| {
            KindSet::STRING_TEMPLATE_ENTRIES_WITH_EXPRESSION.contains(entry.syntax().kind())
        })
    }

    /// `"""` strings are raw: escapes are not interpreted.
    pub fn is_raw(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::OpenQuote)
            .map_or(false, |tok| tok.text() == "\"\"\"")
    }

    /// The string value of a template without interpolation.
    pub fn plain_content(&self) -> Option<String> {
        let mut out = String::new();
        for entry in self.entries() {
            match entry.syntax().kind() {
                SyntaxKind::LiteralStringTemplateEntry => out.push_str(&entry.text()),
                SyntaxKind::EscapeStringTemplateEntry => {
                    let escape = EscapeStringTemplateEntry::new_unchecked(entry.syntax().clone());
                    out.push(escape.unescaped_value().ok()?);
                }
                _ => return None,
            }
        }
        Some(out)
    }
}

impl StringTemplateEntry {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl StringTemplateEntryWithExpression {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl EscapeStringTemplateEntry {
    pub fn unescaped_value(&self) -> Result<char, LiteralError> {
        literals::unescape_sequence(&self.text())
    }
}

impl ShortStringTemplateEntry {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl LongStringTemplateEntry {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl ParenthesizedExpression {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl ExpressionWithLabel {
    pub fn label_qualifier(&self) -> Option<LabelQualifier> {
        support::child(&self.syntax)
    }

    pub fn label_name(&self) -> Option<String> {
        self.label_qualifier()?.label_name()
    }
}

impl ThisExpression {
    pub fn label_name(&self) -> Option<String> {
        support::child::<LabelQualifier>(&self.syntax)?.label_name()
    }
}

impl SuperExpression {
    /// `Base` in `super<Base>`.
    pub fn super_type_qualifier(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }

    pub fn label_name(&self) -> Option<String> {
        support::child::<LabelQualifier>(&self.syntax)?.label_name()
    }
}

impl ContainerNode {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl IfExpression {
    pub fn condition(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::Condition)
    }

    pub fn then_branch(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::Then)
    }

    pub fn else_branch(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::Else)
    }

    pub fn else_keyword(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::ElseKw)
    }

    /// Whether this `if` is the else branch of another `if`: the inner `if`
    /// of `else if (...)`.
    pub fn is_else_if(&self) -> bool {
        self.syntax
            .parent()
            .filter(|container| container.kind() == SyntaxKind::Else)
            .and_then(|container| container.parent())
            .map_or(false, |owner| owner.kind() == SyntaxKind::IfExpression)
    }
}

impl WhenExpression {
    /// `x` in `when (x)`. `None` for subject-less `when` and for a subject
    /// variable.
    pub fn subject_expression(&self) -> Option<Expression> {
        support::child::<Expression>(&self.syntax)
            .filter(|expr| expr.syntax().kind() != SyntaxKind::Property)
    }

    /// `val y` in `when (val y = f())`.
    pub fn subject_variable(&self) -> Option<Property> {
        support::child(&self.syntax)
    }

    pub fn entries(&self) -> impl Iterator<Item = WhenEntry> + '_ {
        support::children(&self.syntax)
    }

    pub fn else_expression(&self) -> Option<Expression> {
        self.entries().find(|entry| entry.is_else())?.expression()
    }
}

impl WhenEntry {
    pub fn is_else(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::ElseKw).is_some()
    }

    pub fn conditions(&self) -> impl Iterator<Item = WhenCondition> + '_ {
        support::children(&self.syntax)
    }

    /// The branch body after `->`.
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl WhenConditionWithExpression {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl WhenConditionInRange {
    pub fn operation_reference(&self) -> Option<OperationReference> {
        support::child(&self.syntax)
    }

    /// `!in`
    pub fn is_negated(&self) -> bool {
        self.operation_reference()
            .and_then(|op| op.operation_kind())
            == Some(SyntaxKind::NotIn)
    }

    pub fn range_expression(&self) -> Option<Expression> {
        support::sibling(self.operation_reference()?.syntax(), Direction::Next)
    }
}

impl WhenConditionIsPattern {
    /// `!is`
    pub fn is_negated(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::NotIs).is_some()
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }
}

impl TryExpression {
    pub fn try_block(&self) -> Option<BlockExpression> {
        support::child(&self.syntax)
    }

    pub fn catch_clauses(&self) -> impl Iterator<Item = CatchClause> + '_ {
        support::children(&self.syntax)
    }

    pub fn finally_block(&self) -> Option<FinallySection> {
        support::child(&self.syntax)
    }
}

impl CatchClause {
    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    pub fn catch_parameter(&self) -> Option<Parameter> {
        self.parameter_list()?.parameters().next()
    }

    pub fn catch_body(&self) -> Option<BlockExpression> {
        support::child(&self.syntax)
    }
}

impl FinallySection {
    pub fn final_expression(&self) -> Option<BlockExpression> {
        support::child(&self.syntax)
    }
}

impl LoopExpression {
    pub fn body(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::Body)
    }
}

impl ForExpression {
    pub fn loop_parameter(&self) -> Option<Parameter> {
        support::child(&self.syntax)
    }

    pub fn destructuring_declaration(&self) -> Option<DestructuringDeclaration> {
        self.loop_parameter()?.destructuring_declaration()
    }

    pub fn loop_range(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::LoopRange)
    }

    pub fn body(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::Body)
    }
}

impl WhileExpression {
    pub fn condition(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::Condition)
    }

    pub fn body(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::Body)
    }
}

impl DoWhileExpression {
    pub fn condition(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::Condition)
    }

    pub fn body(&self) -> Option<Expression> {
        container_expression(&self.syntax, SyntaxKind::Body)
    }
}

impl LambdaExpression {
    pub fn function_literal(&self) -> Option<FunctionLiteral> {
        support::child(&self.syntax)
    }

    pub fn value_parameters(&self) -> Vec<Parameter> {
        self.function_literal()
            .map(|literal| literal.value_parameters())
            .unwrap_or_default()
    }

    /// Whether the lambda spells out an arrow, possibly with zero
    /// parameters (`{ -> 1 }`).
    pub fn has_declared_parameters(&self) -> bool {
        self.function_literal()
            .map_or(false, |literal| literal.has_parameter_specification())
    }

    pub fn body_expression(&self) -> Option<BlockExpression> {
        self.function_literal()?.body_expression()
    }
}

impl AnnotatedExpression {
    pub fn annotation_entries(&self) -> impl Iterator<Item = AnnotationEntry> + '_ {
        support::children(&self.syntax)
    }

    pub fn base_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl LabeledExpression {
    pub fn label_qualifier(&self) -> Option<LabelQualifier> {
        support::child(&self.syntax)
    }

    pub fn label_name(&self) -> Option<String> {
        self.label_qualifier()?.label_name()
    }

    pub fn base_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl BinaryExpression {
    pub fn operation_reference(&self) -> Option<OperationReference> {
        support::child(&self.syntax)
    }

    pub fn operation_token(&self) -> Option<SyntaxToken> {
        self.operation_reference()?.operation_token()
    }

    pub fn operation_kind(&self) -> Option<SyntaxKind> {
        self.operation_reference()?.operation_kind()
    }

    /// The nearest expression before the operator. Error nodes and other
    /// non-expressions between the operand and the operator are skipped.
    pub fn left(&self) -> Option<Expression> {
        support::sibling(self.operation_reference()?.syntax(), Direction::Prev)
    }

    /// The nearest expression after the operator.
    pub fn right(&self) -> Option<Expression> {
        support::sibling(self.operation_reference()?.syntax(), Direction::Next)
    }
}

impl BinaryWithTypeRhsExpression {
    pub fn left(&self) -> Option<Expression> {
        support::sibling(self.operation_reference()?.syntax(), Direction::Prev)
    }

    pub fn operation_reference(&self) -> Option<OperationReference> {
        support::child(&self.syntax)
    }

    /// `as?`
    pub fn is_safe(&self) -> bool {
        self.operation_reference()
            .and_then(|op| op.operation_kind())
            == Some(SyntaxKind::AsSafe)
    }

    pub fn right(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }
}

impl IsExpression {
    pub fn left_hand_side(&self) -> Option<Expression> {
        support::sibling(self.operation_reference()?.syntax(), Direction::Prev)
    }

    pub fn operation_reference(&self) -> Option<OperationReference> {
        support::child(&self.syntax)
    }

    pub fn is_negated(&self) -> bool {
        self.operation_reference()
            .and_then(|op| op.operation_kind())
            == Some(SyntaxKind::NotIs)
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }
}

impl UnaryExpression {
    pub fn operation_reference(&self) -> Option<OperationReference> {
        support::child(&self.syntax)
    }

    pub fn operation_kind(&self) -> Option<SyntaxKind> {
        self.operation_reference()?.operation_kind()
    }

    pub fn base_expression(&self) -> Option<Expression> {
        let op = self.operation_reference()?;
        let direction = match self.syntax.kind() {
            SyntaxKind::PrefixExpression => Direction::Next,
            _ => Direction::Prev,
        };
        support::sibling(op.syntax(), direction)
    }
}

impl PrefixExpression {
    pub fn operation_kind(&self) -> Option<SyntaxKind> {
        support::child::<OperationReference>(&self.syntax)?.operation_kind()
    }

    pub fn base_expression(&self) -> Option<Expression> {
        let op = support::child::<OperationReference>(&self.syntax)?;
        support::sibling(op.syntax(), Direction::Next)
    }
}

impl PostfixExpression {
    pub fn operation_kind(&self) -> Option<SyntaxKind> {
        support::child::<OperationReference>(&self.syntax)?.operation_kind()
    }

    pub fn base_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl CallExpression {
    pub fn callee_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn type_argument_list(&self) -> Option<TypeArgumentList> {
        support::child(&self.syntax)
    }

    pub fn value_argument_list(&self) -> Option<ValueArgumentList> {
        support::child(&self.syntax)
    }

    pub fn value_arguments(&self) -> Vec<ValueArgument> {
        self.value_argument_list()
            .map(|list| list.arguments().collect())
            .unwrap_or_default()
    }

    /// Trailing lambdas after the parentheses.
    pub fn lambda_arguments(&self) -> Vec<LambdaArgument> {
        support::children(&self.syntax).collect()
    }

    /// Parenthesized arguments followed by trailing lambdas.
    pub fn all_arguments(&self) -> Vec<ValueArgument> {
        let mut args = self.value_arguments();
        args.extend(support::children::<ValueArgument>(&self.syntax));
        args
    }
}

impl ArrayAccessExpression {
    pub fn array_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn index_expressions(&self) -> Vec<Expression> {
        support::child_of_kind(&self.syntax, SyntaxKind::Indices)
            .map(|indices| support::children(&indices).collect())
            .unwrap_or_default()
    }
}

impl QualifiedExpression {
    pub fn receiver_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    /// The part after `.` or `?.`.
    pub fn selector_expression(&self) -> Option<Expression> {
        let op = self.operation_token()?;
        op.siblings_with_tokens(Direction::Next)
            .filter_map(|it| it.into_node())
            .find_map(Expression::cast)
    }

    pub fn operation_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Dot)
            .or_else(|| support::token(&self.syntax, SyntaxKind::SafeAccess))
    }

    pub fn is_safe_access(&self) -> bool {
        self.syntax.kind() == SyntaxKind::SafeAccessExpression
    }
}

impl DotQualifiedExpression {
    pub fn receiver_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn selector_expression(&self) -> Option<Expression> {
        QualifiedExpression::new_unchecked(self.syntax.clone()).selector_expression()
    }
}

impl SafeQualifiedExpression {
    pub fn receiver_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn selector_expression(&self) -> Option<Expression> {
        QualifiedExpression::new_unchecked(self.syntax.clone()).selector_expression()
    }
}

impl DoubleColonExpression {
    /// `String` in `String::length`. `None` for `::foo`.
    pub fn receiver_expression(&self) -> Option<Expression> {
        support::children::<Expression>(&self.syntax)
            .find(|expr| support::followed_by(expr.syntax(), SyntaxKind::ColonColon))
    }

    pub fn has_receiver(&self) -> bool {
        self.receiver_expression().is_some()
    }
}

impl CallableReferenceExpression {
    pub fn receiver_expression(&self) -> Option<Expression> {
        DoubleColonExpression::new_unchecked(self.syntax.clone()).receiver_expression()
    }

    /// The referenced member. The parser always produces one, possibly with
    /// an empty name after a recovery.
    pub fn callable_reference(&self) -> Result<NameReferenceExpression, SyntaxError> {
        support::child_after_token(&self.syntax, SyntaxKind::ColonColon)
            .ok_or_else(|| SyntaxError::missing(&self.syntax, SyntaxKind::NameReferenceExpression))
    }
}

impl ClassLiteralExpression {
    pub fn receiver_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl ObjectLiteralExpression {
    pub fn object_declaration(&self) -> Option<ObjectDeclaration> {
        support::child(&self.syntax)
    }
}

impl ReturnExpression {
    pub fn returned_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    /// `foo` in `return@foo`.
    pub fn label_name(&self) -> Option<String> {
        support::child::<LabelQualifier>(&self.syntax)?.label_name()
    }
}

impl ThrowExpression {
    pub fn thrown_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }
}

impl BreakExpression {
    pub fn label_name(&self) -> Option<String> {
        support::child::<LabelQualifier>(&self.syntax)?.label_name()
    }
}

impl ContinueExpression {
    pub fn label_name(&self) -> Option<String> {
        support::child::<LabelQualifier>(&self.syntax)?.label_name()
    }
}

impl CollectionLiteralExpression {
    pub fn inner_expressions(&self) -> Vec<Expression> {
        support::children(&self.syntax).collect()
    }
}

impl BlockExpression {
    pub fn statements(&self) -> impl Iterator<Item = Expression> + '_ {
        support::children(&self.syntax)
    }

    pub fn first_statement(&self) -> Option<Expression> {
        self.statements().next()
    }

    pub fn last_statement(&self) -> Option<Expression> {
        self.statements().last()
    }

    pub fn lbrace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::LBrace)
    }

    pub fn rbrace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::RBrace)
    }
}

impl ValueArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = ValueArgument> + '_ {
        support::children(&self.syntax)
    }

    pub fn left_paren(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::LParen)
    }

    pub fn right_paren(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::RParen)
    }
}

impl ValueArgument {
    /// The argument value. For a trailing lambda this is the lambda itself,
    /// or the labeled expression around it.
    pub fn argument_expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn argument_name(&self) -> Option<ValueArgumentName> {
        support::child(&self.syntax)
    }

    pub fn is_named(&self) -> bool {
        self.argument_name().is_some()
    }

    /// `*array`
    pub fn is_spread(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::Mul).is_some()
    }

    pub fn is_lambda_argument(&self) -> bool {
        self.syntax.kind() == SyntaxKind::LambdaArgument
    }
}

impl ValueArgumentName {
    pub fn reference_expression(&self) -> Option<NameReferenceExpression> {
        support::child(&self.syntax)
    }

    pub fn as_name(&self) -> Option<String> {
        self.reference_expression()?.referenced_name()
    }
}

impl LambdaArgument {
    /// The lambda, looking through a `label@`.
    pub fn lambda_expression(&self) -> Option<LambdaExpression> {
        let expr = support::child::<Expression>(&self.syntax)?;
        match LabeledExpression::cast(expr.syntax().clone()) {
            Some(labeled) => LambdaExpression::cast(labeled.base_expression()?.syntax().clone()),
            None => LambdaExpression::cast(expr.syntax().clone()),
        }
    }
}

impl DestructuringDeclaration {
    pub fn entries(&self) -> impl Iterator<Item = crate::ast::DestructuringDeclarationEntry> + '_ {
        support::children(&self.syntax)
    }

    pub fn val_or_var_keyword(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::ValKw)
            .or_else(|| support::token(&self.syntax, SyntaxKind::VarKw))
    }

    pub fn is_var(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::VarKw).is_some()
    }

    pub fn initializer(&self) -> Option<Expression> {
        support::child_after_token(&self.syntax, SyntaxKind::Eq)
    }
}
