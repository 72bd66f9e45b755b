use crate::ast::{support, AstNode, ModifierList, NameReferenceExpression, ParameterList};
use crate::syntax_kind::{KindSet, SyntaxKind};

ast_category! {
    TypeElement => KindSet::TYPE_ELEMENTS
}

ast_node!(TypeReference => TypeReference);
ast_node!(UserType => UserType);
ast_node!(NullableType => NullableType);
ast_node!(FunctionType => FunctionType);
ast_node!(FunctionTypeReceiver => FunctionTypeReceiver);
ast_node!(DynamicType => DynamicType);
ast_node!(
    /// `T & Any`
    IntersectionType => IntersectionType
);
ast_node!(TypeArgumentList => TypeArgumentList);
ast_node!(TypeProjection => TypeProjection);

impl TypeReference {
    pub fn modifier_list(&self) -> Option<ModifierList> {
        support::child(&self.syntax)
    }

    pub fn type_element(&self) -> Option<TypeElement> {
        support::child(&self.syntax)
    }

    pub fn is_suspend(&self) -> bool {
        self.modifier_list()
            .map_or(false, |list| list.has_modifier(SyntaxKind::SuspendKw))
    }

    /// The user type, looking through `?`.
    pub fn user_type(&self) -> Option<UserType> {
        let mut element = self.type_element()?;
        loop {
            match element.syntax().kind() {
                SyntaxKind::UserType => return UserType::cast(element.syntax().clone()),
                SyntaxKind::NullableType => {
                    element = support::child(element.syntax())?;
                }
                _ => return None,
            }
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.type_element()
            .map_or(false, |element| element.syntax().kind() == SyntaxKind::NullableType)
    }

    /// Last segment of the type name (`Entry` for `Map.Entry<K, V>?`).
    pub fn short_name(&self) -> Option<String> {
        self.user_type()?.referenced_name()
    }
}

impl UserType {
    /// `Outer` in `Outer.Inner`.
    pub fn qualifier(&self) -> Option<UserType> {
        support::child(&self.syntax)
    }

    pub fn reference_expression(&self) -> Option<NameReferenceExpression> {
        support::child(&self.syntax)
    }

    pub fn referenced_name(&self) -> Option<String> {
        self.reference_expression()?.referenced_name()
    }

    pub fn type_argument_list(&self) -> Option<TypeArgumentList> {
        support::child(&self.syntax)
    }

    pub fn type_arguments(&self) -> Vec<TypeProjection> {
        self.type_argument_list()
            .map(|list| list.arguments().collect())
            .unwrap_or_default()
    }

    /// `Outer.Inner` as written, without type arguments.
    pub fn qualified_name(&self) -> Option<String> {
        let name = self.referenced_name()?;
        Some(match self.qualifier().and_then(|q| q.qualified_name()) {
            Some(outer) => format!("{outer}.{name}"),
            None => name,
        })
    }
}

impl NullableType {
    pub fn inner_type(&self) -> Option<TypeElement> {
        support::child(&self.syntax)
    }
}

impl FunctionType {
    pub fn receiver(&self) -> Option<FunctionTypeReceiver> {
        support::child(&self.syntax)
    }

    pub fn receiver_type_reference(&self) -> Option<TypeReference> {
        self.receiver()?.type_reference()
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    /// The type after `->`.
    pub fn return_type_reference(&self) -> Option<TypeReference> {
        support::child_after_token(&self.syntax, SyntaxKind::Arrow)
    }
}

impl FunctionTypeReceiver {
    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }
}

impl IntersectionType {
    pub fn left_type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }

    pub fn right_type_reference(&self) -> Option<TypeReference> {
        support::child_after_token(&self.syntax, SyntaxKind::Amp)
    }
}

impl TypeArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = TypeProjection> + '_ {
        support::children(&self.syntax)
    }
}

impl TypeProjection {
    /// `*`
    pub fn is_star(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::Mul).is_some()
    }

    /// `in`, `out`, or `None` for invariant projections.
    pub fn variance(&self) -> Option<SyntaxKind> {
        let list = support::child::<ModifierList>(&self.syntax)?;
        [SyntaxKind::InKw, SyntaxKind::OutKw]
            .into_iter()
            .find(|kind| list.has_modifier(*kind))
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }
}
