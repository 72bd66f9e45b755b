use super::{ModifierContext, Parser};
use crate::precedence::Precedence;
use crate::syntax_kind::{KindSet, SyntaxKind};

/// Tokens that never start an expression; an erroneous expression does not
/// consume them so the enclosing construct can recover.
const EXPRESSION_RECOVERY: KindSet = KindSet::new(&[
    SyntaxKind::RParen,
    SyntaxKind::RBrace,
    SyntaxKind::RBracket,
    SyntaxKind::Comma,
    SyntaxKind::Semicolon,
    SyntaxKind::Arrow,
    SyntaxKind::ElseKw,
    SyntaxKind::LongTemplateEntryEnd,
    SyntaxKind::ClosingQuote,
    SyntaxKind::Eof,
]);

/// Binary operators that may start a continuation line.
const NEWLINE_CONTINUATIONS: KindSet = KindSet::new(&[
    SyntaxKind::Elvis,
    SyntaxKind::AndAnd,
    SyntaxKind::OrOr,
    SyntaxKind::AsKw,
    SyntaxKind::AsSafe,
]);

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) {
        self.parse_expression_bp(0);
    }

    /// Pratt loop over binary operators. Operands are prefix expressions.
    fn parse_expression_bp(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        self.parse_prefix_expression();

        loop {
            let op = self.current();
            if self.newline_before() && !NEWLINE_CONTINUATIONS.contains(op) {
                break;
            }
            let Some(precedence) = Precedence::of_binary_operation(op) else {
                break;
            };
            let (left_bp, right_bp) = precedence.binding_power();
            if left_bp < min_bp {
                break;
            }

            match op {
                SyntaxKind::AsKw | SyntaxKind::AsSafe => {
                    self.parse_operation_reference();
                    self.parse_type_ref();
                    self.start_node_at(checkpoint, SyntaxKind::BinaryWithTypeRhsExpression);
                }
                SyntaxKind::IsKw | SyntaxKind::NotIs => {
                    self.parse_operation_reference();
                    self.parse_type_ref();
                    self.start_node_at(checkpoint, SyntaxKind::IsExpression);
                }
                _ => {
                    self.parse_operation_reference();
                    self.parse_expression_bp(right_bp);
                    self.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
                }
            }
            self.finish_node();
        }
    }

    fn parse_operation_reference(&mut self) {
        self.start_node(SyntaxKind::OperationReference);
        self.bump();
        self.finish_node();
    }

    fn parse_prefix_expression(&mut self) {
        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::ExclExcl => {
                self.split_excl_excl();
                self.parse_prefix_expression_at(checkpoint);
            }
            SyntaxKind::Minus
            | SyntaxKind::Plus
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus
            | SyntaxKind::Excl => self.parse_prefix_expression_at(checkpoint),
            SyntaxKind::At if self.nth(1) == Some(SyntaxKind::Identifier) => {
                while self.at(SyntaxKind::At) && self.nth(1) == Some(SyntaxKind::Identifier) {
                    self.parse_annotation_entry();
                }
                self.parse_prefix_expression();
                self.start_node_at(checkpoint, SyntaxKind::AnnotatedExpression);
                self.finish_node();
            }
            SyntaxKind::Identifier
                if self.nth(1) == Some(SyntaxKind::At) && self.nth_adjacent_to_next(0) =>
            {
                self.start_node(SyntaxKind::LabelQualifier);
                self.start_node(SyntaxKind::LabelReference);
                self.bump();
                self.bump();
                self.finish_node();
                self.finish_node();
                self.parse_prefix_expression();
                self.start_node_at(checkpoint, SyntaxKind::LabeledExpression);
                self.finish_node();
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_prefix_expression_at(&mut self, checkpoint: rowan::Checkpoint) {
        self.parse_operation_reference();
        self.parse_prefix_expression();
        self.start_node_at(checkpoint, SyntaxKind::PrefixExpression);
        self.finish_node();
    }

    fn parse_postfix_expression(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_atomic_expression();

        loop {
            let newline = self.newline_before();
            match self.current() {
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus | SyntaxKind::ExclExcl
                    if !newline =>
                {
                    self.parse_operation_reference();
                    self.start_node_at(checkpoint, SyntaxKind::PostfixExpression);
                    self.finish_node();
                }
                SyntaxKind::Dot | SyntaxKind::SafeAccess => {
                    let kind = if self.at(SyntaxKind::Dot) {
                        SyntaxKind::DotQualifiedExpression
                    } else {
                        SyntaxKind::SafeAccessExpression
                    };
                    self.bump();
                    self.parse_selector();
                    self.start_node_at(checkpoint, kind);
                    self.finish_node();
                }
                SyntaxKind::ColonColon if !newline => {
                    self.bump();
                    if self.at(SyntaxKind::ClassKw) {
                        self.bump();
                        self.start_node_at(checkpoint, SyntaxKind::ClassLiteralExpression);
                    } else {
                        self.parse_simple_name_reference();
                        self.start_node_at(checkpoint, SyntaxKind::CallableReferenceExpression);
                    }
                    self.finish_node();
                }
                SyntaxKind::LBracket if !newline => {
                    self.parse_indices();
                    self.start_node_at(checkpoint, SyntaxKind::ArrayAccessExpression);
                    self.finish_node();
                }
                SyntaxKind::LParen | SyntaxKind::Lt | SyntaxKind::LBrace | SyntaxKind::Identifier
                    if !newline =>
                {
                    if !self.parse_call_suffix(checkpoint) {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// The selector after `.`/`?.`: a name, optionally called.
    fn parse_selector(&mut self) {
        let checkpoint = self.checkpoint();
        if self.at(SyntaxKind::Identifier) {
            self.parse_simple_name_reference();
        } else {
            self.error_here("expected a name after `.`");
            return;
        }
        if !self.newline_before() {
            self.parse_call_suffix(checkpoint);
        }
    }

    /// Type arguments, value arguments and trailing lambdas after a callee
    /// starting at `checkpoint`. Returns `false` (consuming nothing) if none
    /// are present.
    fn parse_call_suffix(&mut self, checkpoint: rowan::Checkpoint) -> bool {
        let has_type_args = self.at(SyntaxKind::Lt) && self.at_call_type_arguments();
        let has_args = self.at(SyntaxKind::LParen);
        if !has_type_args && !has_args && !self.at_lambda_argument() {
            return false;
        }

        if has_type_args {
            self.parse_type_argument_list();
        }
        if self.at(SyntaxKind::LParen) && !self.newline_before() {
            self.parse_value_argument_list();
        }
        while self.at_lambda_argument() {
            self.start_node(SyntaxKind::LambdaArgument);
            if self.at(SyntaxKind::Identifier) {
                let checkpoint = self.checkpoint();
                self.start_node(SyntaxKind::LabelQualifier);
                self.start_node(SyntaxKind::LabelReference);
                self.bump();
                self.bump();
                self.finish_node();
                self.finish_node();
                self.parse_lambda_expression();
                self.start_node_at(checkpoint, SyntaxKind::LabeledExpression);
                self.finish_node();
            } else {
                self.parse_lambda_expression();
            }
            self.finish_node();
        }
        self.start_node_at(checkpoint, SyntaxKind::CallExpression);
        self.finish_node();
        true
    }

    /// A trailing lambda on the same line: `{`, `label@ {` or `@Ann {`.
    fn at_lambda_argument(&self) -> bool {
        if !self.allow_trailing_lambda || self.newline_before() {
            return false;
        }
        match self.current() {
            SyntaxKind::LBrace => true,
            SyntaxKind::Identifier => {
                self.nth(1) == Some(SyntaxKind::At)
                    && self.nth_adjacent_to_next(0)
                    && self.nth(2) == Some(SyntaxKind::LBrace)
            }
            _ => false,
        }
    }

    fn parse_atomic_expression(&mut self) {
        match self.current() {
            SyntaxKind::IntegerLiteral => self.parse_constant(SyntaxKind::IntegerConstant),
            SyntaxKind::FloatLiteral => self.parse_constant(SyntaxKind::FloatConstant),
            SyntaxKind::CharacterLiteral => self.parse_constant(SyntaxKind::CharacterConstant),
            SyntaxKind::TrueKw | SyntaxKind::FalseKw => {
                self.parse_constant(SyntaxKind::BooleanConstant)
            }
            SyntaxKind::NullKw => self.parse_constant(SyntaxKind::NullConstant),
            SyntaxKind::OpenQuote => self.parse_string_template(),
            SyntaxKind::Identifier => self.parse_simple_name_reference(),
            SyntaxKind::ThisKw => {
                self.start_node(SyntaxKind::ThisExpression);
                self.bump();
                self.parse_label_qualifier_opt();
                self.finish_node();
            }
            SyntaxKind::SuperKw => {
                self.start_node(SyntaxKind::SuperExpression);
                self.bump();
                if self.at(SyntaxKind::Lt) && self.current_is_adjacent() {
                    self.bump();
                    self.parse_type_ref();
                    self.expect(SyntaxKind::Gt, "expected `>` after super type");
                }
                self.parse_label_qualifier_opt();
                self.finish_node();
            }
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::ParenthesizedExpression);
                self.bump();
                self.with_newlines(false, |p| p.parse_expression());
                self.expect(SyntaxKind::RParen, "expected `)`");
                self.finish_node();
            }
            SyntaxKind::LBracket => {
                self.start_node(SyntaxKind::CollectionLiteralExpression);
                self.bump();
                self.with_newlines(false, |p| {
                    while !p.at(SyntaxKind::RBracket) && !p.at(SyntaxKind::Eof) {
                        p.parse_expression();
                        if !p.eat(SyntaxKind::Comma) {
                            break;
                        }
                    }
                });
                self.expect(SyntaxKind::RBracket, "expected `]`");
                self.finish_node();
            }
            SyntaxKind::LBrace => self.parse_lambda_expression(),
            SyntaxKind::IfKw => self.parse_if(),
            SyntaxKind::WhenKw => self.parse_when(),
            SyntaxKind::TryKw => self.parse_try(),
            SyntaxKind::ForKw => self.parse_for(),
            SyntaxKind::WhileKw => self.parse_while(),
            SyntaxKind::DoKw => self.parse_do_while(),
            SyntaxKind::ReturnKw => {
                self.start_node(SyntaxKind::ReturnExpression);
                self.bump();
                self.parse_label_qualifier_opt();
                if !self.newline_before() && !self.at_set(EXPRESSION_RECOVERY) {
                    self.parse_expression();
                }
                self.finish_node();
            }
            SyntaxKind::ThrowKw => {
                self.start_node(SyntaxKind::ThrowExpression);
                self.bump();
                self.parse_expression();
                self.finish_node();
            }
            SyntaxKind::BreakKw | SyntaxKind::ContinueKw => {
                let kind = if self.at(SyntaxKind::BreakKw) {
                    SyntaxKind::BreakExpression
                } else {
                    SyntaxKind::ContinueExpression
                };
                self.start_node(kind);
                self.bump();
                self.parse_label_qualifier_opt();
                self.finish_node();
            }
            SyntaxKind::ObjectKw => {
                self.start_node(SyntaxKind::ObjectLiteralExpression);
                let checkpoint = self.checkpoint();
                self.parse_object_declaration(checkpoint);
                self.finish_node();
            }
            SyntaxKind::FunKw => {
                let checkpoint = self.checkpoint();
                self.parse_function(checkpoint);
            }
            SyntaxKind::ColonColon => {
                self.start_node(SyntaxKind::CallableReferenceExpression);
                self.bump();
                self.parse_simple_name_reference();
                self.finish_node();
            }
            _ => {
                self.error_here("expected an expression");
                if !self.at_set(EXPRESSION_RECOVERY) {
                    self.start_node(SyntaxKind::Error);
                    self.bump();
                    self.finish_node();
                }
            }
        }
    }

    fn parse_constant(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// `@label` directly attached to `this`, `super`, `return`, `break` or
    /// `continue`.
    fn parse_label_qualifier_opt(&mut self) {
        if self.at(SyntaxKind::At)
            && self.current_is_adjacent()
            && self.nth(1) == Some(SyntaxKind::Identifier)
            && self.nth_adjacent_to_next(0)
        {
            self.start_node(SyntaxKind::LabelQualifier);
            self.start_node(SyntaxKind::LabelReference);
            self.bump();
            self.bump();
            self.finish_node();
            self.finish_node();
        }
    }

    fn parse_indices(&mut self) {
        self.start_node(SyntaxKind::Indices);
        self.bump();
        self.with_newlines(false, |p| {
            while !p.at(SyntaxKind::RBracket) && !p.at(SyntaxKind::Eof) {
                p.parse_expression();
                if !p.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        });
        self.expect(SyntaxKind::RBracket, "expected `]`");
        self.finish_node();
    }

    pub(crate) fn parse_value_argument_list(&mut self) {
        self.start_node(SyntaxKind::ValueArgumentList);
        self.bump();
        let saved = std::mem::replace(&mut self.allow_trailing_lambda, true);
        self.with_newlines(false, |p| {
            while !p.at(SyntaxKind::RParen) && !p.at(SyntaxKind::Eof) {
                p.start_node(SyntaxKind::ValueArgument);
                if p.at(SyntaxKind::Identifier) && p.nth(1) == Some(SyntaxKind::Eq) {
                    p.start_node(SyntaxKind::ValueArgumentName);
                    p.parse_simple_name_reference();
                    p.finish_node();
                    p.bump();
                }
                if p.at(SyntaxKind::Mul) {
                    p.bump();
                }
                p.parse_expression();
                p.finish_node();
                if !p.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        });
        self.allow_trailing_lambda = saved;
        self.expect(SyntaxKind::RParen, "expected `)` to close arguments");
        self.finish_node();
    }

    fn parse_string_template(&mut self) {
        self.start_node(SyntaxKind::StringTemplate);
        self.bump();
        loop {
            match self.current() {
                SyntaxKind::RegularStringPart => {
                    self.parse_constant(SyntaxKind::LiteralStringTemplateEntry)
                }
                SyntaxKind::EscapeSequence => {
                    self.parse_constant(SyntaxKind::EscapeStringTemplateEntry)
                }
                SyntaxKind::ShortTemplateEntryStart => {
                    self.start_node(SyntaxKind::ShortStringTemplateEntry);
                    self.bump();
                    if self.at(SyntaxKind::ThisKw) {
                        self.parse_constant(SyntaxKind::ThisExpression);
                    } else {
                        self.parse_simple_name_reference();
                    }
                    self.finish_node();
                }
                SyntaxKind::LongTemplateEntryStart => {
                    self.start_node(SyntaxKind::LongStringTemplateEntry);
                    self.bump();
                    self.with_newlines(false, |p| p.parse_expression());
                    self.expect(SyntaxKind::LongTemplateEntryEnd, "expected `}` in template");
                    self.finish_node();
                }
                SyntaxKind::ClosingQuote => {
                    self.bump();
                    break;
                }
                _ => {
                    self.error_here("unterminated string literal");
                    break;
                }
            }
        }
        self.finish_node();
    }

    fn parse_lambda_expression(&mut self) {
        self.start_node(SyntaxKind::LambdaExpression);
        self.start_node(SyntaxKind::FunctionLiteral);
        self.bump();
        if self.lambda_has_parameters() {
            if !self.at(SyntaxKind::Arrow) {
                self.start_node(SyntaxKind::ValueParameterList);
                loop {
                    self.start_node(SyntaxKind::ValueParameter);
                    if self.at(SyntaxKind::LParen) {
                        self.start_node(SyntaxKind::DestructuringDeclaration);
                        self.parse_destructuring_entries();
                        self.finish_node();
                    } else {
                        self.expect_identifier("expected lambda parameter name");
                    }
                    if self.eat(SyntaxKind::Colon) {
                        self.parse_type_ref();
                    }
                    self.finish_node();
                    if !self.eat(SyntaxKind::Comma) {
                        break;
                    }
                }
                self.finish_node();
            }
            self.expect(SyntaxKind::Arrow, "expected `->` after lambda parameters");
        }
        self.start_node(SyntaxKind::Block);
        self.parse_statements(SyntaxKind::RBrace);
        self.finish_node();
        self.expect(SyntaxKind::RBrace, "expected `}` to close lambda");
        self.finish_node();
        self.finish_node();
    }

    /// Lookahead from just after `{` for a `->` reachable over parameter
    /// syntax only.
    fn lambda_has_parameters(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            match self.nth(n) {
                Some(SyntaxKind::Arrow) if depth == 0 => return true,
                Some(SyntaxKind::LParen) | Some(SyntaxKind::Lt) => depth += 1,
                Some(SyntaxKind::RParen) | Some(SyntaxKind::Gt) => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                Some(
                    SyntaxKind::Identifier
                    | SyntaxKind::Comma
                    | SyntaxKind::Colon
                    | SyntaxKind::Dot
                    | SyntaxKind::Quest
                    | SyntaxKind::Mul
                    | SyntaxKind::Arrow,
                ) => {}
                _ => return false,
            }
            n += 1;
        }
    }

    /// Bodies of `if`, `when` entries and loops: a block or a single
    /// expression.
    fn parse_control_structure_body(&mut self) {
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.parse_expression();
        }
    }

    fn parse_parenthesized_condition(&mut self, container: SyntaxKind) {
        self.expect(SyntaxKind::LParen, "expected `(`");
        self.start_node(container);
        self.with_newlines(false, |p| p.parse_expression());
        self.finish_node();
        self.expect(SyntaxKind::RParen, "expected `)`");
    }

    fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IfExpression);
        self.bump();
        self.parse_parenthesized_condition(SyntaxKind::Condition);

        if !self.at(SyntaxKind::ElseKw) && !self.at(SyntaxKind::Semicolon) {
            self.start_node(SyntaxKind::Then);
            self.parse_control_structure_body();
            self.finish_node();
        }
        if self.at(SyntaxKind::Semicolon) && self.nth(1) == Some(SyntaxKind::ElseKw) {
            self.bump();
        }
        if self.at(SyntaxKind::ElseKw) {
            self.bump();
            self.start_node(SyntaxKind::Else);
            if !self.at(SyntaxKind::Semicolon) && !self.at(SyntaxKind::RBrace) {
                self.parse_control_structure_body();
            }
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_when(&mut self) {
        self.start_node(SyntaxKind::WhenExpression);
        self.bump();
        if self.at(SyntaxKind::LParen) {
            self.bump();
            self.with_newlines(false, |p| {
                if p.at(SyntaxKind::ValKw) || p.at(SyntaxKind::VarKw) {
                    p.parse_declaration(super::DeclContext::Local);
                } else {
                    p.parse_expression();
                }
            });
            self.expect(SyntaxKind::RParen, "expected `)` after when subject");
        }

        self.expect(SyntaxKind::LBrace, "expected `{` to open when body");
        let saved = std::mem::replace(&mut self.newlines_significant, true);
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::Semicolon) {
                self.bump();
                continue;
            }
            let before = self.tokens.len();
            self.parse_when_entry();
            if self.tokens.len() == before {
                self.start_node(SyntaxKind::Error);
                self.bump();
                self.finish_node();
            }
        }
        self.newlines_significant = saved;
        self.expect(SyntaxKind::RBrace, "expected `}` to close when body");
        self.finish_node();
    }

    fn parse_when_entry(&mut self) {
        self.start_node(SyntaxKind::WhenEntry);
        if self.at(SyntaxKind::ElseKw) {
            self.bump();
        } else {
            loop {
                self.parse_when_condition();
                if !self.eat(SyntaxKind::Comma) || self.at(SyntaxKind::Arrow) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::Arrow, "expected `->` in when entry");
        self.parse_control_structure_body();
        self.finish_node();
    }

    fn parse_when_condition(&mut self) {
        match self.current() {
            SyntaxKind::InKw | SyntaxKind::NotIn => {
                self.start_node(SyntaxKind::WhenConditionInRange);
                self.parse_operation_reference();
                self.parse_expression();
                self.finish_node();
            }
            SyntaxKind::IsKw | SyntaxKind::NotIs => {
                self.start_node(SyntaxKind::WhenConditionIsPattern);
                self.bump();
                self.parse_type_ref();
                self.finish_node();
            }
            _ => {
                self.start_node(SyntaxKind::WhenConditionExpression);
                self.parse_expression();
                self.finish_node();
            }
        }
    }

    fn parse_try(&mut self) {
        self.start_node(SyntaxKind::TryExpression);
        self.bump();
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.error_here("expected `{` after `try`");
        }
        while self.at_soft("catch") {
            self.start_node(SyntaxKind::CatchClause);
            self.bump_remap(SyntaxKind::CatchKw);
            if self.at(SyntaxKind::LParen) {
                self.parse_value_parameter_list();
            } else {
                self.error_here("expected catch parameter");
            }
            if self.at(SyntaxKind::LBrace) {
                self.parse_block();
            }
            self.finish_node();
        }
        if self.at_soft("finally") {
            self.start_node(SyntaxKind::FinallySection);
            self.bump_remap(SyntaxKind::FinallyKw);
            if self.at(SyntaxKind::LBrace) {
                self.parse_block();
            }
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_for(&mut self) {
        self.start_node(SyntaxKind::ForExpression);
        self.bump();
        self.expect(SyntaxKind::LParen, "expected `(` after `for`");
        self.with_newlines(false, |p| {
            p.start_node(SyntaxKind::ValueParameter);
            p.parse_modifier_list(ModifierContext::Parameter);
            if p.at(SyntaxKind::LParen) {
                p.start_node(SyntaxKind::DestructuringDeclaration);
                p.parse_destructuring_entries();
                p.finish_node();
            } else {
                p.expect_identifier("expected loop variable");
            }
            if p.eat(SyntaxKind::Colon) {
                p.parse_type_ref();
            }
            p.finish_node();
            p.expect(SyntaxKind::InKw, "expected `in` in for loop");
            p.start_node(SyntaxKind::LoopRange);
            p.parse_expression();
            p.finish_node();
        });
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.parse_loop_body();
        self.finish_node();
    }

    fn parse_loop_body(&mut self) {
        self.start_node(SyntaxKind::Body);
        if !self.at(SyntaxKind::Semicolon) && !self.at(SyntaxKind::RBrace) {
            self.parse_control_structure_body();
        }
        self.finish_node();
    }

    fn parse_while(&mut self) {
        self.start_node(SyntaxKind::WhileExpression);
        self.bump();
        self.parse_parenthesized_condition(SyntaxKind::Condition);
        self.parse_loop_body();
        self.finish_node();
    }

    fn parse_do_while(&mut self) {
        self.start_node(SyntaxKind::DoWhileExpression);
        self.bump();
        self.start_node(SyntaxKind::Body);
        if !self.at(SyntaxKind::WhileKw) {
            self.parse_control_structure_body();
        }
        self.finish_node();
        self.expect(SyntaxKind::WhileKw, "expected `while` after do body");
        self.parse_parenthesized_condition(SyntaxKind::Condition);
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::parser::{debug_dump, parse_kotlin, parse_kotlin_expression};

    fn dump(text: &str) -> String {
        let parse = parse_kotlin_expression(text);
        assert_eq!(parse.errors, Vec::new(), "unexpected errors for {text:?}");
        debug_dump(&parse.syntax())
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expected = "\
ExpressionFragment
  BinaryExpression
    NameReferenceExpression
      Identifier \"a\"
    OperationReference
      Plus \"+\"
    BinaryExpression
      NameReferenceExpression
        Identifier \"b\"
      OperationReference
        Mul \"*\"
      NameReferenceExpression
        Identifier \"c\"
";
        assert_eq!(dump("a + b * c"), expected);
    }

    #[test]
    fn assignment_is_right_associative() {
        let out = dump("a = b = c");
        let first = out.find("BinaryExpression").expect("outer binary");
        let second = out[first + 1..].find("BinaryExpression").expect("inner binary");
        let inner_start = first + 1 + second;
        assert!(out[..inner_start].contains("Identifier \"a\""));
        assert!(!out[..inner_start].contains("Identifier \"c\""));
    }

    #[test]
    fn qualified_call_selector_is_the_call() {
        let expected = "\
ExpressionFragment
  DotQualifiedExpression
    NameReferenceExpression
      Identifier \"a\"
    Dot \".\"
    CallExpression
      NameReferenceExpression
        Identifier \"b\"
      ValueArgumentList
        LParen \"(\"
        ValueArgument
          NameReferenceExpression
            Identifier \"c\"
        RParen \")\"
";
        assert_eq!(dump("a.b(c)"), expected);
    }

    #[test]
    fn generic_call_versus_comparison() {
        let out = dump("listOf<Int>(1)");
        assert!(out.contains("TypeArgumentList"));
        let out = dump("a < b && c > d");
        assert!(!out.contains("TypeArgumentList"));
        assert_eq!(out.matches("BinaryExpression").count(), 3);
    }

    #[test]
    fn prefix_double_bang_splits() {
        let out = dump("!!x");
        assert_eq!(out.matches("PrefixExpression").count(), 2);
        let out = dump("x!!");
        assert!(out.contains("PostfixExpression"));
    }

    #[test]
    fn labels_and_lambdas() {
        let out = dump("list.forEach loop@{ if (it == 0) return@loop }");
        assert!(out.contains("LambdaArgument"));
        assert!(out.contains("LabeledExpression"));
        assert!(out.contains("ReturnExpression\n"));
        assert!(out.contains("LabelQualifier"));

        let out = dump("map.mapValues { (k, v) -> k + v }");
        assert!(out.contains("DestructuringDeclaration"));
    }

    #[test]
    fn templates_nest() {
        let out = dump(r#""a${"b$c"}d""#);
        assert_eq!(out.matches("StringTemplate\n").count(), 2);
        assert!(out.contains("LongStringTemplateEntry"));
        assert!(out.contains("ShortStringTemplateEntry"));
    }

    #[test]
    fn control_structures() {
        let out = dump("when (val x = f()) { 1, 2 -> a\n in 3..4 -> b\n is String -> c\n else -> d }");
        assert!(out.contains("Property"));
        assert!(out.contains("WhenConditionInRange"));
        assert!(out.contains("WhenConditionIsPattern"));
        assert_eq!(out.matches("WhenEntry").count(), 4);

        let out = dump("try { f() } catch (e: Exception) { g() } finally { h() }");
        assert!(out.contains("CatchClause"));
        assert!(out.contains("FinallySection"));

        let out = dump("for ((i, v) in xs.withIndex()) println(v)");
        assert!(out.contains("LoopRange"));
        assert!(out.contains("DestructuringDeclaration"));
    }

    #[test]
    fn newline_ends_statement_unless_continuation() {
        let parse = parse_kotlin("fun f() {\n  val a = b\n  -c\n  val d = e\n    ?: g\n}");
        assert_eq!(parse.errors, Vec::new());
        let out = debug_dump(&parse.syntax());
        assert!(out.contains("PrefixExpression"));
        assert!(out.contains("Elvis"));
        assert_eq!(out.matches("BinaryExpression").count(), 1);
    }

    #[test]
    fn parentheses_suspend_newlines() {
        let out = dump("(a\n + b)");
        assert!(out.contains("BinaryExpression"));
    }
}
