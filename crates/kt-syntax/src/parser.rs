use std::collections::VecDeque;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};
use text_size::TextSize;

use crate::lexer::{lex_with_errors, Token};
use crate::syntax_kind::{KindSet, KotlinLanguage, SyntaxKind};
use crate::{FileKind, ParseError, TextRange};

mod declarations;
mod expressions;
mod types;

pub type SyntaxNode = rowan::SyntaxNode<KotlinLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<KotlinLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<KotlinLanguage>;

#[cfg(feature = "test-parse-counter")]
thread_local! {
    pub(crate) static PARSE_COUNT: std::cell::Cell<usize> = std::cell::Cell::new(0);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KotlinParseResult {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl KotlinParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn token_at_offset(&self, offset: u32) -> rowan::TokenAtOffset<SyntaxToken> {
        self.syntax().token_at_offset(TextSize::from(offset))
    }

    pub fn covering_element(&self, range: TextRange) -> SyntaxElement {
        self.syntax().covering_element(range.into())
    }
}

/// Parse a Kotlin source file.
pub fn parse_kotlin(input: &str) -> KotlinParseResult {
    parse_kotlin_file(input, FileKind::Source)
}

pub(crate) fn parse_kotlin_file(input: &str, kind: FileKind) -> KotlinParseResult {
    #[cfg(feature = "test-parse-counter")]
    PARSE_COUNT.with(|count| count.set(count.get() + 1));

    let _span = tracing::debug_span!("parse_kotlin", len = input.len(), ?kind).entered();
    let result = Parser::new(input).parse_file(kind);
    if !result.errors.is_empty() {
        tracing::debug!(errors = result.errors.len(), "parsed with errors");
    }
    result
}

/// Parse a standalone expression. The root node is
/// [`SyntaxKind::ExpressionFragment`].
pub fn parse_kotlin_expression(input: &str) -> KotlinParseResult {
    let mut parser = Parser::new(input);
    parser.builder.start_node(SyntaxKind::ExpressionFragment.into());
    parser.parse_expression();
    parser.finish_fragment()
}

/// Parse a standalone type reference. The root node is
/// [`SyntaxKind::TypeFragment`].
pub fn parse_kotlin_type(input: &str) -> KotlinParseResult {
    let mut parser = Parser::new(input);
    parser.builder.start_node(SyntaxKind::TypeFragment.into());
    parser.parse_type_ref();
    parser.finish_fragment()
}

/// Where a declaration is being parsed; some constructs are only valid in
/// certain containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclContext {
    TopLevel,
    ClassBody,
    Local,
}

/// Which modifiers are recognised at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModifierContext {
    Declaration,
    Parameter,
    TypeParameter,
    TypeProjection,
    TypeReference,
}

/// Modifier keywords seen by the last [`Parser::parse_modifier_list`] call.
#[derive(Debug, Default)]
pub(crate) struct ParsedModifiers {
    kinds: Vec<SyntaxKind>,
    present: bool,
}

impl ParsedModifiers {
    pub(crate) fn contains(&self, kind: SyntaxKind) -> bool {
        self.kinds.contains(&kind)
    }
}

pub(crate) struct Parser<'a> {
    input: &'a str,
    tokens: VecDeque<Token>,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
    /// A line break was consumed as trivia after the last significant token.
    newline_seen: bool,
    /// Inside parentheses and brackets line breaks do not end expressions.
    newlines_significant: bool,
    /// Disabled while parsing `by` delegates in a super type list, where a
    /// following `{` starts the class body.
    allow_trailing_lambda: bool,
    /// Set while parsing a receiver type in a declaration header, so that the
    /// final `.name` is left for the declaration.
    receiver_mode: bool,
    last_token_end: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let (tokens, lex_errors) = lex_with_errors(input);
        let errors = lex_errors
            .into_iter()
            .map(|err| ParseError {
                message: err.message,
                range: err.range,
            })
            .collect();
        Self {
            input,
            tokens: VecDeque::from(tokens),
            builder: GreenNodeBuilder::new(),
            errors,
            newline_seen: false,
            newlines_significant: true,
            allow_trailing_lambda: true,
            receiver_mode: false,
            last_token_end: 0,
        }
    }

    fn parse_file(mut self, kind: FileKind) -> KotlinParseResult {
        self.builder.start_node(SyntaxKind::KtFile.into());
        self.parse_preamble();

        match kind {
            FileKind::Source => {
                while !self.at(SyntaxKind::Eof) {
                    self.parse_top_level_declaration();
                }
            }
            FileKind::Script => {
                self.start_node(SyntaxKind::Script);
                self.start_node(SyntaxKind::Block);
                self.parse_statements(SyntaxKind::Eof);
                self.finish_node();
                self.finish_node();
            }
        }

        self.eat_trivia();
        self.builder.finish_node();

        KotlinParseResult {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn finish_fragment(mut self) -> KotlinParseResult {
        self.eat_trivia();
        if !self.at(SyntaxKind::Eof) {
            self.start_node(SyntaxKind::Error);
            self.error_here("unexpected trailing input");
            while !self.at(SyntaxKind::Eof) {
                self.bump_any();
            }
            self.finish_node();
        }
        self.eat_trivia();
        self.builder.finish_node();
        KotlinParseResult {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    /// File annotations, the package directive and the import list. The
    /// package directive and the import list are always present, possibly
    /// empty.
    fn parse_preamble(&mut self) {
        if self.at_file_annotation() {
            self.start_node(SyntaxKind::FileAnnotationList);
            while self.at_file_annotation() {
                self.parse_annotation_entry();
            }
            self.finish_node();
        }

        if self.at(SyntaxKind::PackageKw) {
            self.start_node(SyntaxKind::PackageDirective);
            self.bump();
            if self.at(SyntaxKind::Identifier) {
                self.parse_dotted_name();
            } else {
                self.error_here("expected package name");
            }
            self.eat(SyntaxKind::Semicolon);
            self.finish_node();
        } else {
            self.empty_node(SyntaxKind::PackageDirective);
        }

        if self.at_soft("import") {
            self.start_node(SyntaxKind::ImportList);
            while self.at_soft("import") {
                self.parse_import_directive();
            }
            self.finish_node();
        } else {
            self.empty_node(SyntaxKind::ImportList);
        }
    }

    fn at_file_annotation(&self) -> bool {
        self.at(SyntaxKind::At)
            && self.nth_is_soft(1, "file")
            && self.nth(2) == Some(SyntaxKind::Colon)
    }

    fn parse_import_directive(&mut self) {
        self.start_node(SyntaxKind::ImportDirective);
        self.bump_remap(SyntaxKind::ImportKw);
        if self.at(SyntaxKind::Identifier) {
            self.parse_dotted_name();
        } else {
            self.error_here("expected import name");
        }
        if self.at(SyntaxKind::Dot) && self.nth(1) == Some(SyntaxKind::Mul) {
            self.bump();
            self.bump();
        } else if self.at(SyntaxKind::AsKw) {
            self.start_node(SyntaxKind::ImportAlias);
            self.bump();
            self.expect_identifier("expected import alias name");
            self.finish_node();
        }
        self.eat(SyntaxKind::Semicolon);
        self.finish_node();
    }

    /// `a.b.c` as left-nested dot-qualified reference expressions.
    fn parse_dotted_name(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_simple_name_reference();
        while self.at(SyntaxKind::Dot) && self.nth(1) == Some(SyntaxKind::Identifier) {
            self.start_node_at(checkpoint, SyntaxKind::DotQualifiedExpression);
            self.bump();
            self.parse_simple_name_reference();
            self.finish_node();
        }
    }

    fn parse_simple_name_reference(&mut self) {
        self.start_node(SyntaxKind::NameReferenceExpression);
        self.expect_identifier("expected a name");
        self.finish_node();
    }

    fn parse_top_level_declaration(&mut self) {
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
            return;
        }
        let before = self.tokens.len();
        if !self.parse_declaration(DeclContext::TopLevel) {
            self.recover_top_level();
        } else if self.tokens.len() == before {
            self.skip_stuck_token();
        }
    }

    /// Wrap the current token in an `Error` node. Loops call this when an
    /// iteration consumed nothing.
    pub(crate) fn skip_stuck_token(&mut self) {
        self.start_node(SyntaxKind::Error);
        self.error_here("unexpected token");
        self.bump_any_significant();
        self.finish_node();
    }

    fn recover_top_level(&mut self) {
        self.start_node(SyntaxKind::Error);
        self.error_here("expected a top-level declaration");
        self.bump_any_significant();
        while !self.at(SyntaxKind::Eof) && !self.at_declaration_keyword() {
            self.bump_any_significant();
        }
        self.finish_node();
    }

    fn recover_class_member(&mut self) {
        self.start_node(SyntaxKind::Error);
        self.error_here("expected a member declaration");
        self.bump_any_significant();
        while !self.at(SyntaxKind::Eof)
            && !self.at(SyntaxKind::RBrace)
            && !self.at_declaration_keyword()
        {
            self.bump_any_significant();
        }
        self.finish_node();
    }

    fn at_declaration_keyword(&self) -> bool {
        matches!(
            self.current(),
            SyntaxKind::ClassKw
                | SyntaxKind::InterfaceKw
                | SyntaxKind::FunKw
                | SyntaxKind::ValKw
                | SyntaxKind::VarKw
                | SyntaxKind::ObjectKw
                | SyntaxKind::TypeAliasKw
                | SyntaxKind::At
        ) || self.current_modifier(ModifierContext::Declaration).is_some()
    }

    /// Statements until `end` (not consumed). Used for blocks, lambdas and
    /// script bodies.
    fn parse_statements(&mut self, end: SyntaxKind) {
        let saved = std::mem::replace(&mut self.newlines_significant, true);
        while !self.at(end) && !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::Semicolon) {
                self.bump();
                continue;
            }
            let before = self.tokens.len();
            self.parse_statement();
            if self.tokens.len() == before {
                self.skip_stuck_token();
            }
        }
        self.newlines_significant = saved;
    }

    fn parse_statement(&mut self) {
        if self.at_local_declaration_start() && self.parse_declaration(DeclContext::Local) {
            return;
        }
        self.parse_expression();
    }

    /// Lookahead: modifiers and annotations followed by a declaration
    /// keyword.
    fn at_local_declaration_start(&self) -> bool {
        let mut n = 0;
        loop {
            match self.nth(n) {
                Some(SyntaxKind::At) => n = self.skip_annotation_ahead(n),
                Some(SyntaxKind::ClassKw)
                | Some(SyntaxKind::InterfaceKw)
                | Some(SyntaxKind::TypeAliasKw)
                | Some(SyntaxKind::ValKw)
                | Some(SyntaxKind::VarKw) => return true,
                Some(SyntaxKind::FunKw) => return self.nth(n + 1) != Some(SyntaxKind::LParen),
                Some(SyntaxKind::ObjectKw) => {
                    return self.nth(n + 1) == Some(SyntaxKind::Identifier)
                }
                Some(SyntaxKind::Identifier)
                    if self.nth_modifier(n, ModifierContext::Declaration).is_some() =>
                {
                    n += 1
                }
                _ => return false,
            }
        }
    }

    /// Index just past an annotation starting at significant token `n`.
    fn skip_annotation_ahead(&self, n: usize) -> usize {
        let mut n = n + 1;
        if self.nth(n) == Some(SyntaxKind::Identifier) && self.nth(n + 1) == Some(SyntaxKind::Colon)
        {
            n += 2;
        }
        if self.nth(n) != Some(SyntaxKind::Identifier) {
            return n;
        }
        n += 1;
        while self.nth(n) == Some(SyntaxKind::Dot) && self.nth(n + 1) == Some(SyntaxKind::Identifier)
        {
            n += 2;
        }
        if self.nth(n) == Some(SyntaxKind::Lt) {
            n = self.skip_balanced_ahead(n);
        }
        if self.nth(n) == Some(SyntaxKind::LParen) && !self.newline_before_nth(n) {
            n = self.skip_balanced_ahead(n);
        }
        n
    }

    /// Given an opening bracket at significant token `n`, the index just past
    /// its partner.
    fn skip_balanced_ahead(&self, n: usize) -> usize {
        let (open, close) = match self.nth(n) {
            Some(SyntaxKind::LParen) => (SyntaxKind::LParen, SyntaxKind::RParen),
            Some(SyntaxKind::LBracket) => (SyntaxKind::LBracket, SyntaxKind::RBracket),
            Some(SyntaxKind::LBrace) => (SyntaxKind::LBrace, SyntaxKind::RBrace),
            Some(SyntaxKind::Lt) => (SyntaxKind::Lt, SyntaxKind::Gt),
            _ => return n + 1,
        };
        let mut depth = 0usize;
        let mut i = n;
        while let Some(kind) = self.nth(i) {
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            i += 1;
        }
        i
    }

    // --- Modifiers & annotations ---

    pub(crate) fn parse_modifier_list(&mut self, ctx: ModifierContext) -> ParsedModifiers {
        let mut parsed = ParsedModifiers::default();
        if !self.at(SyntaxKind::At) && self.current_modifier(ctx).is_none() {
            return parsed;
        }

        parsed.present = true;
        self.start_node(SyntaxKind::ModifierList);
        loop {
            // Also a stray `@`, which becomes an erroneous annotation entry.
            if self.at(SyntaxKind::At) {
                self.parse_annotation_entry();
                continue;
            }
            match self.current_modifier(ctx) {
                Some(kind) => {
                    parsed.kinds.push(kind);
                    self.bump_remap(kind);
                }
                None => break,
            }
        }
        self.finish_node();
        parsed
    }

    fn current_modifier(&self, ctx: ModifierContext) -> Option<SyntaxKind> {
        self.nth_modifier(0, ctx)
    }

    /// The modifier kind of significant token `n`, if it acts as a modifier
    /// in this context.
    fn nth_modifier(&self, n: usize, ctx: ModifierContext) -> Option<SyntaxKind> {
        let kind = self.nth(n)?;
        let next = self.nth(n + 1);
        let follows_modifier = matches!(
            next,
            Some(SyntaxKind::Identifier)
                | Some(SyntaxKind::ClassKw)
                | Some(SyntaxKind::InterfaceKw)
                | Some(SyntaxKind::FunKw)
                | Some(SyntaxKind::ValKw)
                | Some(SyntaxKind::VarKw)
                | Some(SyntaxKind::ObjectKw)
                | Some(SyntaxKind::TypeAliasKw)
                | Some(SyntaxKind::InKw)
                | Some(SyntaxKind::At)
        ) || (matches!(ctx, ModifierContext::TypeReference | ModifierContext::TypeProjection)
            && next == Some(SyntaxKind::LParen));

        match kind {
            SyntaxKind::Identifier if follows_modifier => {
                let text = self.nth_text(n)?;
                let modifier = SyntaxKind::modifier_from_text(text)?;
                let allowed = match ctx {
                    ModifierContext::Declaration | ModifierContext::Parameter => true,
                    ModifierContext::TypeParameter => matches!(
                        modifier,
                        SyntaxKind::ReifiedKw | SyntaxKind::OutKw
                    ),
                    ModifierContext::TypeProjection => modifier == SyntaxKind::OutKw,
                    ModifierContext::TypeReference => modifier == SyntaxKind::SuspendKw,
                };
                allowed.then_some(modifier)
            }
            // `in` is a hard keyword that doubles as a variance modifier.
            SyntaxKind::InKw
                if matches!(
                    ctx,
                    ModifierContext::TypeParameter | ModifierContext::TypeProjection
                ) && follows_modifier =>
            {
                Some(SyntaxKind::InKw)
            }
            // `fun interface`
            SyntaxKind::FunKw
                if ctx == ModifierContext::Declaration
                    && next == Some(SyntaxKind::InterfaceKw) =>
            {
                Some(SyntaxKind::FunKw)
            }
            _ => None,
        }
    }

    /// `@Ann`, `@Ann(args)`, `@get:Ann`, `@file:Ann`.
    pub(crate) fn parse_annotation_entry(&mut self) {
        self.start_node(SyntaxKind::AnnotationEntry);
        self.bump();
        if self.at(SyntaxKind::Identifier) && self.nth(1) == Some(SyntaxKind::Colon) {
            self.start_node(SyntaxKind::AnnotationTarget);
            if self.at_soft("file") {
                self.bump_remap(SyntaxKind::FileKw);
            } else {
                self.bump();
            }
            self.finish_node();
            self.bump();
        }

        self.start_node(SyntaxKind::ConstructorCallee);
        self.start_node(SyntaxKind::TypeReference);
        self.parse_user_type();
        self.finish_node();
        self.finish_node();

        if self.at(SyntaxKind::LParen) && !self.newline_before() && self.current_is_adjacent() {
            self.parse_value_argument_list();
        }
        self.finish_node();
    }

    // --- Token access ---

    /// Index into `tokens` of the `n`-th significant token.
    fn significant_index(&self, n: usize) -> Option<usize> {
        let mut remaining = n;
        for (idx, tok) in self.tokens.iter().enumerate() {
            if tok.kind.is_trivia() {
                continue;
            }
            if remaining == 0 {
                return Some(idx);
            }
            remaining -= 1;
        }
        None
    }

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0).unwrap_or(SyntaxKind::Eof)
    }

    pub(crate) fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.significant_index(n).map(|idx| self.tokens[idx].kind)
    }

    fn nth_token(&self, n: usize) -> Option<Token> {
        self.significant_index(n).map(|idx| self.tokens[idx])
    }

    pub(crate) fn nth_text(&self, n: usize) -> Option<&'a str> {
        let input = self.input;
        self.nth_token(n).map(|tok| tok.text(input))
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_set(&self, set: KindSet) -> bool {
        set.contains(self.current())
    }

    /// The current token is the identifier `text` (a soft keyword).
    pub(crate) fn at_soft(&self, text: &str) -> bool {
        self.nth_is_soft(0, text)
    }

    pub(crate) fn nth_is_soft(&self, n: usize, text: &str) -> bool {
        self.nth(n) == Some(SyntaxKind::Identifier) && self.nth_text(n) == Some(text)
    }

    /// Whether a line break separates the previous significant token from
    /// the current one. Always false inside parentheses and brackets.
    pub(crate) fn newline_before(&self) -> bool {
        self.newlines_significant && self.newline_before_nth(0)
    }

    fn newline_before_nth(&self, n: usize) -> bool {
        if n == 0 && self.newline_seen {
            return true;
        }
        let Some(end) = self.significant_index(n) else {
            return false;
        };
        let start = if n == 0 {
            0
        } else {
            self.significant_index(n - 1).map_or(0, |idx| idx + 1)
        };
        (start..end).any(|idx| {
            let tok = self.tokens[idx];
            tok.kind == SyntaxKind::Whitespace
                && tok.text(self.input).contains(['\n', '\r'])
        })
    }

    /// No trivia separates the previous significant token from the current
    /// one (`this@label`, `foo@ {`).
    pub(crate) fn current_is_adjacent(&self) -> bool {
        self.tokens
            .front()
            .map_or(false, |tok| !tok.kind.is_trivia() && tok.range.start as usize == self.last_token_end)
    }

    /// Significant tokens `n` and `n + 1` touch.
    pub(crate) fn nth_adjacent_to_next(&self, n: usize) -> bool {
        match (self.nth_token(n), self.nth_token(n + 1)) {
            (Some(a), Some(b)) => a.range.end == b.range.start,
            _ => false,
        }
    }

    fn eat_trivia(&mut self) {
        while self.tokens.front().map_or(false, |t| t.kind.is_trivia()) {
            if let Some(tok) = self.tokens.front() {
                if tok.kind == SyntaxKind::Whitespace && tok.text(self.input).contains(['\n', '\r']) {
                    self.newline_seen = true;
                }
            }
            self.bump_any();
        }
    }

    pub(crate) fn bump(&mut self) {
        self.eat_trivia();
        self.bump_any();
    }

    /// Bump the current token with a different kind (soft keyword
    /// remapping).
    pub(crate) fn bump_remap(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        if let Some(tok) = self.tokens.pop_front() {
            let text = tok.text(self.input);
            self.builder.token(kind.into(), text);
            self.newline_seen = false;
            self.last_token_end = tok.range.end as usize;
        }
    }

    fn bump_any(&mut self) {
        if let Some(tok) = self.tokens.pop_front() {
            let text = tok.text(self.input);
            self.builder.token(tok.kind.into(), text);
            if !tok.kind.is_trivia() {
                self.newline_seen = false;
                self.last_token_end = tok.range.end as usize;
            }
        }
    }

    fn bump_any_significant(&mut self) {
        self.eat_trivia();
        if !self.tokens.is_empty() {
            self.bump_any();
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error_here(message);
            false
        }
    }

    pub(crate) fn expect_identifier(&mut self, message: &str) -> bool {
        self.expect(SyntaxKind::Identifier, message)
    }

    /// Split a `!!` token into two `!` tokens (`!!x` in prefix position).
    pub(crate) fn split_excl_excl(&mut self) {
        let Some(idx) = self.significant_index(0) else {
            return;
        };
        let tok = self.tokens[idx];
        if tok.kind != SyntaxKind::ExclExcl {
            return;
        }
        let start = tok.range.start;
        self.tokens[idx] = Token {
            kind: SyntaxKind::Excl,
            range: TextRange {
                start,
                end: start + 1,
            },
        };
        self.tokens.insert(
            idx + 1,
            Token {
                kind: SyntaxKind::Excl,
                range: TextRange {
                    start: start + 1,
                    end: tok.range.end,
                },
            },
        );
    }

    pub(crate) fn error_here(&mut self, message: &str) {
        let range = self.current_range();
        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    fn current_range(&self) -> TextRange {
        self.nth_token(0).map(|t| t.range).unwrap_or_else(|| {
            let end = self.input.len() as u32;
            TextRange { start: end, end }
        })
    }

    // --- Tree building ---

    /// Leading trivia stays outside of the node.
    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    /// A node without tokens, such as an absent package directive or an
    /// implicit constructor delegation call.
    pub(crate) fn empty_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
        self.builder.finish_node();
    }

    pub(crate) fn with_newlines<T>(&mut self, significant: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.newlines_significant, significant);
        let result = f(self);
        self.newlines_significant = saved;
        result
    }
}

/// Render a tree as an indented kind/text dump.
#[cfg(test)]
pub(crate) fn debug_dump(node: &SyntaxNode) -> String {
    use rowan::NodeOrToken;

    fn go(node: &SyntaxNode, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{:?}\n", node.kind()));
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(n) => go(&n, depth + 1, out),
                NodeOrToken::Token(t) => {
                    if t.kind().is_trivia() {
                        continue;
                    }
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str(&format!("{:?} {:?}\n", t.kind(), t.text()));
                }
            }
        }
    }

    let mut out = String::new();
    go(node, 0, &mut out);
    out
}
