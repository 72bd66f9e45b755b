use super::{ModifierContext, Parser};
use crate::syntax_kind::SyntaxKind;

impl<'a> Parser<'a> {
    /// `TypeReference = ModifierList? TypeElement`
    pub(crate) fn parse_type_ref(&mut self) {
        self.start_node(SyntaxKind::TypeReference);
        self.parse_modifier_list(ModifierContext::TypeReference);
        self.parse_type_element();
        self.finish_node();
    }

    /// A receiver type in a declaration header. The trailing `.name` is left
    /// for the caller.
    pub(crate) fn parse_receiver_type(&mut self) {
        let saved = std::mem::replace(&mut self.receiver_mode, true);
        self.parse_type_ref();
        self.receiver_mode = saved;
    }

    fn parse_type_element(&mut self) {
        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::LParen if self.paren_starts_function_type() => {
                self.parse_function_type_parameters();
                self.expect(SyntaxKind::Arrow, "expected `->` in function type");
                self.parse_type_ref();
                self.start_node_at(checkpoint, SyntaxKind::FunctionType);
                self.finish_node();
            }
            SyntaxKind::LParen => {
                // Parenthesised type: the parentheses stay inside the
                // enclosing node.
                self.bump();
                let saved = std::mem::replace(&mut self.receiver_mode, false);
                self.parse_type_element();
                self.receiver_mode = saved;
                self.expect(SyntaxKind::RParen, "expected `)` in type");
            }
            SyntaxKind::Identifier
                if self.at_soft("dynamic") && self.nth(1) != Some(SyntaxKind::Dot) =>
            {
                self.start_node(SyntaxKind::DynamicType);
                self.bump_remap(SyntaxKind::DynamicKw);
                self.finish_node();
            }
            SyntaxKind::Identifier => self.parse_user_type(),
            _ => {
                self.error_here("expected a type");
                return;
            }
        }

        // `A.() -> B`
        if self.at(SyntaxKind::Dot) && self.nth(1) == Some(SyntaxKind::LParen) && !self.receiver_mode
        {
            self.start_node_at(checkpoint, SyntaxKind::TypeReference);
            self.finish_node();
            self.start_node_at(checkpoint, SyntaxKind::FunctionTypeReceiver);
            self.finish_node();
            self.bump();
            self.parse_function_type_parameters();
            self.expect(SyntaxKind::Arrow, "expected `->` in function type");
            self.parse_type_ref();
            self.start_node_at(checkpoint, SyntaxKind::FunctionType);
            self.finish_node();
        }

        while self.at(SyntaxKind::Quest) && !self.newline_before() {
            self.start_node_at(checkpoint, SyntaxKind::NullableType);
            self.bump();
            self.finish_node();
        }

        if self.at(SyntaxKind::Amp) {
            self.start_node_at(checkpoint, SyntaxKind::TypeReference);
            self.finish_node();
            self.bump();
            self.parse_type_ref();
            self.start_node_at(checkpoint, SyntaxKind::IntersectionType);
            self.finish_node();
        }
    }

    /// `Outer<A>.Inner<B>` as nested user types, innermost qualifier first.
    pub(crate) fn parse_user_type(&mut self) {
        let checkpoint = self.checkpoint();
        self.start_node(SyntaxKind::UserType);
        self.parse_simple_name_reference();
        if self.at(SyntaxKind::Lt) {
            self.parse_type_argument_list();
        }
        self.finish_node();

        while self.at(SyntaxKind::Dot)
            && self.nth(1) == Some(SyntaxKind::Identifier)
            && !self.at_receiver_name()
        {
            self.start_node_at(checkpoint, SyntaxKind::UserType);
            self.bump();
            self.parse_simple_name_reference();
            if self.at(SyntaxKind::Lt) {
                self.parse_type_argument_list();
            }
            self.finish_node();
        }
    }

    /// In receiver mode, `.name` not followed by more type syntax names the
    /// declaration.
    fn at_receiver_name(&self) -> bool {
        self.receiver_mode
            && !matches!(
                self.nth(2),
                Some(SyntaxKind::Dot) | Some(SyntaxKind::Lt) | Some(SyntaxKind::Quest)
            )
    }

    fn paren_starts_function_type(&self) -> bool {
        let after = self.skip_balanced_ahead(0);
        self.nth(after) == Some(SyntaxKind::Arrow)
    }

    /// `(Int, name: String)` in a function type.
    fn parse_function_type_parameters(&mut self) {
        self.start_node(SyntaxKind::ValueParameterList);
        self.bump();
        let saved = std::mem::replace(&mut self.receiver_mode, false);
        self.with_newlines(false, |p| {
            while !p.at(SyntaxKind::RParen) && !p.at(SyntaxKind::Eof) {
                p.start_node(SyntaxKind::ValueParameter);
                if p.at(SyntaxKind::Identifier) && p.nth(1) == Some(SyntaxKind::Colon) {
                    p.bump();
                    p.bump();
                }
                p.parse_type_ref();
                p.finish_node();
                if !p.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        });
        self.receiver_mode = saved;
        self.expect(SyntaxKind::RParen, "expected `)` in function type");
        self.finish_node();
    }

    pub(crate) fn parse_type_argument_list(&mut self) {
        self.start_node(SyntaxKind::TypeArgumentList);
        self.bump();
        let saved = std::mem::replace(&mut self.receiver_mode, false);
        self.with_newlines(false, |p| loop {
            p.start_node(SyntaxKind::TypeProjection);
            if p.at(SyntaxKind::Mul) {
                p.bump();
            } else {
                p.parse_modifier_list(ModifierContext::TypeProjection);
                p.parse_type_ref();
            }
            p.finish_node();
            if !p.eat(SyntaxKind::Comma) || p.at(SyntaxKind::Gt) {
                break;
            }
        });
        self.receiver_mode = saved;
        self.expect(SyntaxKind::Gt, "expected `>` to close type arguments");
        self.finish_node();
    }

    /// Speculative check for `<...>` type arguments in call position: the
    /// brackets must balance over type-like tokens and be followed by `(`,
    /// a same-line `{`, or `::`.
    pub(crate) fn at_call_type_arguments(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            match self.nth(n) {
                Some(SyntaxKind::Lt) => depth += 1,
                Some(SyntaxKind::Gt) => {
                    depth -= 1;
                    if depth == 0 {
                        return match self.nth(n + 1) {
                            Some(SyntaxKind::LParen) | Some(SyntaxKind::ColonColon) => true,
                            Some(SyntaxKind::LBrace) => !self.newline_before_nth(n + 1),
                            _ => false,
                        };
                    }
                }
                Some(
                    SyntaxKind::Identifier
                    | SyntaxKind::Dot
                    | SyntaxKind::Comma
                    | SyntaxKind::Quest
                    | SyntaxKind::Mul
                    | SyntaxKind::InKw
                    | SyntaxKind::At
                    | SyntaxKind::Colon
                    | SyntaxKind::Amp
                    | SyntaxKind::Arrow
                    | SyntaxKind::LParen
                    | SyntaxKind::RParen,
                ) => {}
                _ => return false,
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::parser::{debug_dump, parse_kotlin_type};

    fn dump(text: &str) -> String {
        let parse = parse_kotlin_type(text);
        assert_eq!(parse.errors, Vec::new(), "unexpected errors for {text:?}");
        debug_dump(&parse.syntax())
    }

    #[test]
    fn nested_user_type() {
        let expected = "\
TypeFragment
  TypeReference
    UserType
      UserType
        NameReferenceExpression
          Identifier \"Map\"
      Dot \".\"
      NameReferenceExpression
        Identifier \"Entry\"
      TypeArgumentList
        Lt \"<\"
        TypeProjection
          TypeReference
            UserType
              NameReferenceExpression
                Identifier \"K\"
        Comma \",\"
        TypeProjection
          Mul \"*\"
        Gt \">\"
";
        assert_eq!(dump("Map.Entry<K, *>"), expected);
    }

    #[test]
    fn function_types_with_receiver_and_suspend() {
        let out = dump("suspend String.(Int) -> Unit?");
        assert!(out.contains("SuspendKw"));
        assert!(out.contains("FunctionTypeReceiver"));
        assert!(out.contains("FunctionType\n"));
    }

    #[test]
    fn nullable_and_intersection() {
        let out = dump("T & Any");
        assert!(out.contains("IntersectionType"));
        let out = dump("List<out T>??");
        assert_eq!(out.matches("NullableType").count(), 2);
        assert!(out.contains("OutKw"));
    }
}
