use rowan::Checkpoint;

use super::{DeclContext, ModifierContext, Parser};
use crate::syntax_kind::SyntaxKind;

impl<'a> Parser<'a> {
    /// Parse a declaration with its leading modifiers. Returns `false` (and
    /// consumes nothing) if the input does not start a declaration.
    pub(crate) fn parse_declaration(&mut self, ctx: DeclContext) -> bool {
        let checkpoint = self.checkpoint();
        let modifiers = self.parse_modifier_list(ModifierContext::Declaration);

        match self.current() {
            SyntaxKind::ClassKw | SyntaxKind::InterfaceKw => {
                self.parse_class(checkpoint, modifiers.contains(SyntaxKind::EnumKw))
            }
            SyntaxKind::FunKw => self.parse_function(checkpoint),
            SyntaxKind::ValKw | SyntaxKind::VarKw => self.parse_property(checkpoint, ctx),
            SyntaxKind::TypeAliasKw => self.parse_type_alias(checkpoint),
            SyntaxKind::ObjectKw => self.parse_object_declaration(checkpoint),
            SyntaxKind::Identifier
                if ctx == DeclContext::ClassBody && self.at_soft("constructor") =>
            {
                self.parse_secondary_constructor(checkpoint)
            }
            SyntaxKind::Identifier
                if ctx == DeclContext::ClassBody
                    && self.at_soft("init")
                    && self.nth(1) == Some(SyntaxKind::LBrace) =>
            {
                self.start_node_at(checkpoint, SyntaxKind::ClassInitializer);
                self.bump_remap(SyntaxKind::InitKw);
                self.parse_block();
                self.finish_node();
            }
            _ => {
                if !modifiers.present {
                    return false;
                }
                self.start_node_at(checkpoint, SyntaxKind::Error);
                self.error_here("expected a declaration after modifiers");
                self.finish_node();
            }
        }
        true
    }

    fn parse_class(&mut self, checkpoint: Checkpoint, is_enum: bool) {
        self.start_node_at(checkpoint, SyntaxKind::Class);
        self.bump();
        self.expect_identifier("expected class name");

        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        if self.at_primary_constructor() {
            self.parse_primary_constructor();
        }
        if self.at(SyntaxKind::Colon) {
            self.bump();
            self.parse_super_type_list();
        }
        if self.at_soft("where") {
            self.parse_type_constraint_list();
        }
        if self.at(SyntaxKind::LBrace) {
            if is_enum {
                self.parse_enum_class_body();
            } else {
                self.parse_class_body();
            }
        }
        self.finish_node();
    }

    /// `(`, `constructor`, or modifiers/annotations followed by `constructor`.
    fn at_primary_constructor(&self) -> bool {
        if self.at(SyntaxKind::LParen) {
            return true;
        }
        let mut n = 0;
        loop {
            match self.nth(n) {
                Some(SyntaxKind::Identifier) if self.nth_is_soft(n, "constructor") => return true,
                Some(SyntaxKind::At) => n = self.skip_annotation_ahead(n),
                Some(SyntaxKind::Identifier)
                    if self.nth_modifier(n, ModifierContext::Declaration).is_some() =>
                {
                    n += 1
                }
                _ => return false,
            }
        }
    }

    fn parse_primary_constructor(&mut self) {
        self.start_node(SyntaxKind::PrimaryConstructor);
        self.parse_modifier_list(ModifierContext::Declaration);
        if self.at_soft("constructor") {
            self.bump_remap(SyntaxKind::ConstructorKw);
        }
        if self.at(SyntaxKind::LParen) {
            self.parse_value_parameter_list();
        } else {
            self.error_here("expected constructor parameters");
        }
        self.finish_node();
    }

    fn parse_super_type_list(&mut self) {
        self.start_node(SyntaxKind::SuperTypeList);
        loop {
            self.parse_super_type_entry();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_super_type_entry(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_type_ref();
        if self.at(SyntaxKind::LParen) && !self.newline_before() {
            self.start_node_at(checkpoint, SyntaxKind::ConstructorCallee);
            self.finish_node();
            self.parse_value_argument_list();
            self.start_node_at(checkpoint, SyntaxKind::SuperTypeCallEntry);
            self.finish_node();
        } else if self.at_soft("by") {
            self.bump_remap(SyntaxKind::ByKw);
            let saved = std::mem::replace(&mut self.allow_trailing_lambda, false);
            self.parse_expression();
            self.allow_trailing_lambda = saved;
            self.start_node_at(checkpoint, SyntaxKind::DelegatedSuperTypeEntry);
            self.finish_node();
        } else {
            self.start_node_at(checkpoint, SyntaxKind::SuperTypeEntry);
            self.finish_node();
        }
    }

    pub(crate) fn parse_class_body(&mut self) {
        self.start_node(SyntaxKind::ClassBody);
        self.bump();
        self.parse_class_members();
        self.expect(SyntaxKind::RBrace, "expected `}` to close class body");
        self.finish_node();
    }

    fn parse_class_members(&mut self) {
        let saved = std::mem::replace(&mut self.newlines_significant, true);
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::Semicolon) {
                self.bump();
                continue;
            }
            let before = self.tokens.len();
            if !self.parse_declaration(DeclContext::ClassBody) {
                self.recover_class_member();
            } else if self.tokens.len() == before {
                self.skip_stuck_token();
            }
        }
        self.newlines_significant = saved;
    }

    /// Enum entries come first, separated by commas and terminated by an
    /// optional `;`; ordinary members follow.
    fn parse_enum_class_body(&mut self) {
        self.start_node(SyntaxKind::ClassBody);
        self.bump();
        while self.at_enum_entry_start() {
            self.parse_enum_entry();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.eat(SyntaxKind::Semicolon);
        self.parse_class_members();
        self.expect(SyntaxKind::RBrace, "expected `}` to close enum body");
        self.finish_node();
    }

    fn at_enum_entry_start(&self) -> bool {
        let mut n = 0;
        while self.nth(n) == Some(SyntaxKind::At) {
            n = self.skip_annotation_ahead(n);
        }
        self.nth(n) == Some(SyntaxKind::Identifier)
            && matches!(
                self.nth(n + 1),
                Some(SyntaxKind::Comma)
                    | Some(SyntaxKind::Semicolon)
                    | Some(SyntaxKind::LParen)
                    | Some(SyntaxKind::LBrace)
                    | Some(SyntaxKind::RBrace)
                    | None
            )
    }

    fn parse_enum_entry(&mut self) {
        self.start_node(SyntaxKind::EnumEntry);
        self.parse_modifier_list(ModifierContext::Declaration);
        self.expect_identifier("expected enum entry name");
        if self.at(SyntaxKind::LParen) {
            self.start_node(SyntaxKind::InitializerList);
            self.start_node(SyntaxKind::SuperTypeCallEntry);
            self.empty_node(SyntaxKind::ConstructorCallee);
            self.parse_value_argument_list();
            self.finish_node();
            self.finish_node();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_class_body();
        }
        self.finish_node();
    }

    pub(crate) fn parse_object_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::ObjectDeclaration);
        self.bump();
        if self.at(SyntaxKind::Identifier) && !self.at_soft("where") {
            self.bump();
        }
        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        if self.at(SyntaxKind::Colon) {
            self.bump();
            self.parse_super_type_list();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_class_body();
        }
        self.finish_node();
    }

    /// Named and anonymous functions. The anonymous form (`fun(x: Int) = x`)
    /// is parsed here too when it appears as an expression.
    pub(crate) fn parse_function(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::Fun);
        self.bump();
        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }

        let has_receiver = match self.current() {
            SyntaxKind::Identifier => match self.nth(1) {
                Some(SyntaxKind::LParen) | None => false,
                Some(SyntaxKind::Lt) => {
                    let after = self.skip_balanced_ahead(1);
                    matches!(
                        self.nth(after),
                        Some(SyntaxKind::Dot) | Some(SyntaxKind::Quest)
                    )
                }
                _ => true,
            },
            // `fun (A.() -> Unit).name()` versus an anonymous `fun(x: Int)`.
            SyntaxKind::LParen => {
                let after = self.skip_balanced_ahead(0);
                self.nth(after) == Some(SyntaxKind::Dot)
            }
            _ => false,
        };
        if has_receiver {
            self.parse_receiver_type();
            self.expect(SyntaxKind::Dot, "expected `.` after receiver type");
            self.expect_identifier("expected function name");
        } else if self.at(SyntaxKind::Identifier) {
            self.bump();
        }

        if self.at(SyntaxKind::LParen) {
            self.parse_value_parameter_list();
        } else {
            self.error_here("expected function parameters");
        }
        if self.at(SyntaxKind::Colon) {
            self.bump();
            self.parse_type_ref();
        }
        if self.at_soft("where") {
            self.parse_type_constraint_list();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else if self.at(SyntaxKind::Eq) {
            self.bump();
            self.parse_expression();
        }
        self.finish_node();
    }

    fn parse_property(&mut self, checkpoint: Checkpoint, ctx: DeclContext) {
        if self.nth(1) == Some(SyntaxKind::LParen) {
            self.start_node_at(checkpoint, SyntaxKind::DestructuringDeclaration);
            self.bump();
            self.parse_destructuring_entries();
            if self.eat(SyntaxKind::Eq) {
                self.parse_expression();
            }
            self.finish_node();
            return;
        }

        self.start_node_at(checkpoint, SyntaxKind::Property);
        self.bump();
        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }

        let has_receiver = match self.current() {
            SyntaxKind::Identifier => matches!(
                self.nth(1),
                Some(SyntaxKind::Dot) | Some(SyntaxKind::Lt) | Some(SyntaxKind::Quest)
            ),
            SyntaxKind::LParen => true,
            _ => false,
        };
        if has_receiver {
            self.parse_receiver_type();
            self.expect(SyntaxKind::Dot, "expected `.` after receiver type");
            self.expect_identifier("expected property name");
        } else {
            self.expect_identifier("expected property name");
        }

        if self.at(SyntaxKind::Colon) {
            self.bump();
            self.parse_type_ref();
        }
        if self.at_soft("where") {
            self.parse_type_constraint_list();
        }
        if self.at(SyntaxKind::Eq) {
            self.bump();
            self.parse_expression();
        } else if self.at_soft("by") {
            self.start_node(SyntaxKind::PropertyDelegate);
            self.bump_remap(SyntaxKind::ByKw);
            self.parse_expression();
            self.finish_node();
        }

        if ctx != DeclContext::Local {
            if self.at(SyntaxKind::Semicolon) && self.at_accessor_start_from(1) {
                self.bump();
            }
            for _ in 0..2 {
                if !self.at_accessor_start_from(0) {
                    break;
                }
                self.parse_property_accessor();
            }
        }
        self.finish_node();
    }

    /// `get`/`set` (after optional modifiers) starting at significant token
    /// `n`, followed by something an accessor can continue with.
    fn at_accessor_start_from(&self, n: usize) -> bool {
        let mut n = n;
        loop {
            match self.nth(n) {
                Some(SyntaxKind::At) => n = self.skip_annotation_ahead(n),
                Some(SyntaxKind::Identifier)
                    if self.nth_is_soft(n, "get") || self.nth_is_soft(n, "set") =>
                {
                    return matches!(
                        self.nth(n + 1),
                        Some(SyntaxKind::LParen)
                            | Some(SyntaxKind::Eq)
                            | Some(SyntaxKind::LBrace)
                            | Some(SyntaxKind::Colon)
                            | Some(SyntaxKind::Semicolon)
                            | Some(SyntaxKind::RBrace)
                            | None
                    ) || self.newline_before_nth(n + 1);
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

    fn parse_property_accessor(&mut self) {
        self.start_node(SyntaxKind::PropertyAccessor);
        self.parse_modifier_list(ModifierContext::Declaration);
        let is_setter = self.at_soft("set");
        self.bump_remap(if is_setter {
            SyntaxKind::SetKw
        } else {
            SyntaxKind::GetKw
        });

        if self.at(SyntaxKind::LParen) {
            if is_setter {
                self.parse_value_parameter_list();
            } else {
                self.bump();
                self.expect(SyntaxKind::RParen, "expected `)`");
            }
        }
        if self.at(SyntaxKind::Colon) {
            self.bump();
            self.parse_type_ref();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else if self.at(SyntaxKind::Eq) {
            self.bump();
            self.parse_expression();
        }
        self.finish_node();
    }

    fn parse_type_alias(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::TypeAlias);
        self.bump();
        self.expect_identifier("expected type alias name");
        if self.at(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        self.expect(SyntaxKind::Eq, "expected `=` in type alias");
        self.parse_type_ref();
        self.finish_node();
    }

    /// Without an explicit `: this(..)`/`: super(..)` the constructor still
    /// carries an empty, implicit delegation call.
    fn parse_secondary_constructor(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::SecondaryConstructor);
        self.bump_remap(SyntaxKind::ConstructorKw);
        if self.at(SyntaxKind::LParen) {
            self.parse_value_parameter_list();
        } else {
            self.error_here("expected constructor parameters");
        }

        if self.at(SyntaxKind::Colon) {
            self.bump();
            self.start_node(SyntaxKind::ConstructorDelegationCall);
            self.start_node(SyntaxKind::ConstructorDelegationReference);
            if self.at(SyntaxKind::ThisKw) || self.at(SyntaxKind::SuperKw) {
                self.bump();
            } else {
                self.error_here("expected `this` or `super`");
            }
            self.finish_node();
            if self.at(SyntaxKind::LParen) {
                self.parse_value_argument_list();
            } else {
                self.error_here("expected delegation call arguments");
            }
            self.finish_node();
        } else {
            self.builder
                .start_node(SyntaxKind::ConstructorDelegationCall.into());
            self.empty_node(SyntaxKind::ConstructorDelegationReference);
            self.builder.finish_node();
        }

        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        }
        self.finish_node();
    }

    pub(crate) fn parse_value_parameter_list(&mut self) {
        self.start_node(SyntaxKind::ValueParameterList);
        self.bump();
        self.with_newlines(false, |p| {
            while !p.at(SyntaxKind::RParen) && !p.at(SyntaxKind::Eof) {
                p.parse_value_parameter();
                if !p.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        });
        self.expect(SyntaxKind::RParen, "expected `)` to close parameter list");
        self.finish_node();
    }

    fn parse_value_parameter(&mut self) {
        self.start_node(SyntaxKind::ValueParameter);
        self.parse_modifier_list(ModifierContext::Parameter);
        if self.at(SyntaxKind::ValKw) || self.at(SyntaxKind::VarKw) {
            self.bump();
        }
        self.expect_identifier("expected parameter name");
        if self.eat(SyntaxKind::Colon) {
            self.parse_type_ref();
        }
        if self.eat(SyntaxKind::Eq) {
            self.parse_expression();
        }
        self.finish_node();
    }

    /// `(a, b: Int, _)` as a destructuring declaration; the caller has not
    /// consumed the `(`.
    pub(crate) fn parse_destructuring_entries(&mut self) {
        self.expect(SyntaxKind::LParen, "expected `(`");
        self.with_newlines(false, |p| {
            while !p.at(SyntaxKind::RParen) && !p.at(SyntaxKind::Eof) {
                p.start_node(SyntaxKind::DestructuringDeclarationEntry);
                p.parse_modifier_list(ModifierContext::Parameter);
                p.expect_identifier("expected a name");
                if p.eat(SyntaxKind::Colon) {
                    p.parse_type_ref();
                }
                p.finish_node();
                if !p.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        });
        self.expect(SyntaxKind::RParen, "expected `)`");
    }

    pub(crate) fn parse_type_parameter_list(&mut self) {
        self.start_node(SyntaxKind::TypeParameterList);
        self.bump();
        let saved = std::mem::replace(&mut self.receiver_mode, false);
        while !self.at(SyntaxKind::Gt) && !self.at(SyntaxKind::Eof) {
            self.start_node(SyntaxKind::TypeParameter);
            self.parse_modifier_list(ModifierContext::TypeParameter);
            self.expect_identifier("expected type parameter name");
            if self.eat(SyntaxKind::Colon) {
                self.parse_type_ref();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.receiver_mode = saved;
        self.expect(SyntaxKind::Gt, "expected `>` to close type parameter list");
        self.finish_node();
    }

    fn parse_type_constraint_list(&mut self) {
        self.start_node(SyntaxKind::TypeConstraintList);
        self.bump_remap(SyntaxKind::WhereKw);
        loop {
            self.start_node(SyntaxKind::TypeConstraint);
            while self.at(SyntaxKind::At) {
                self.parse_annotation_entry();
            }
            self.parse_simple_name_reference();
            self.expect(SyntaxKind::Colon, "expected `:` in type constraint");
            self.parse_type_ref();
            self.finish_node();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
    }

    pub(crate) fn parse_block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.bump();
        self.parse_statements(SyntaxKind::RBrace);
        self.expect(SyntaxKind::RBrace, "expected `}` to close block");
        self.finish_node();
    }
}
