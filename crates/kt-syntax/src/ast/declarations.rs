use crate::ast::traits::{child_declarations, is_local_declaration, is_top_level_declaration};
use crate::ast::{
    support, AstNode, BlockExpression, CallableDeclaration, ConstructorDelegationReference,
    DeclarationContainer, DestructuringDeclaration, Expression, ModifierListOwner,
    NamedDeclarationOwner, TypeParameterListOwner, TypeReference, ValueArgument,
    ValueArgumentList,
};
use crate::errors::SyntaxError;
use crate::parser::SyntaxToken;
use crate::syntax_kind::{KindSet, SyntaxKind};

ast_category! {
    /// Any declaration. Declarations are expressions too.
    Declaration => KindSet::DECLARATIONS
}

ast_category! {
    NamedDeclaration => KindSet::NAMED_DECLARATIONS
}

ast_category! {
    /// Classes, interfaces, enum entries and objects.
    ClassOrObject => KindSet::CLASS_OR_OBJECT
}

ast_category! {
    SuperTypeListEntry => KindSet::SUPER_TYPE_LIST_ENTRIES
}

ast_node!(
    /// Classes and interfaces. Enum entries are classes as well.
    Class => Class | EnumEntry
);
ast_node!(EnumEntry => EnumEntry);
ast_node!(ObjectDeclaration => ObjectDeclaration);
ast_node!(
    /// Named functions, and anonymous functions in expression position.
    NamedFunction => Fun
);
ast_node!(Property => Property);
ast_node!(PropertyAccessor => PropertyAccessor);
ast_node!(PropertyDelegate => PropertyDelegate);
ast_node!(TypeAlias => TypeAlias);
ast_node!(PrimaryConstructor => PrimaryConstructor);
ast_node!(SecondaryConstructor => SecondaryConstructor);
ast_node!(ConstructorDelegationCall => ConstructorDelegationCall);
ast_node!(
    /// An `init { }` block.
    ClassInitializer => ClassInitializer
);
ast_node!(ClassBody => ClassBody);
ast_node!(DestructuringDeclarationEntry => DestructuringDeclarationEntry);
ast_node!(
    /// The `{ params -> body }` part of a lambda expression.
    FunctionLiteral => FunctionLiteral
);
ast_node!(ParameterList => ValueParameterList);
ast_node!(Parameter => ValueParameter);
ast_node!(TypeParameterList => TypeParameterList);
ast_node!(TypeParameter => TypeParameter);
ast_node!(SuperTypeList => SuperTypeList);
ast_node!(SuperTypeEntry => SuperTypeEntry);
ast_node!(SuperTypeCallEntry => SuperTypeCallEntry);
ast_node!(DelegatedSuperTypeEntry => DelegatedSuperTypeEntry);
ast_node!(
    /// The type being constructed in a super type call or annotation.
    ConstructorCallee => ConstructorCallee
);
ast_node!(
    /// The constructor call of an enum entry with arguments.
    InitializerList => InitializerList
);

macro_rules! impl_capabilities {
    ($($ty:ty: $($cap:ident),+;)*) => {
        $($(impl $cap for $ty {})+)*
    };
}

impl_capabilities! {
    NamedDeclaration: NamedDeclarationOwner, ModifierListOwner;
    ClassOrObject: NamedDeclarationOwner, ModifierListOwner;
    Class: NamedDeclarationOwner, ModifierListOwner, TypeParameterListOwner;
    EnumEntry: NamedDeclarationOwner, ModifierListOwner;
    ObjectDeclaration: NamedDeclarationOwner, ModifierListOwner, TypeParameterListOwner;
    NamedFunction: NamedDeclarationOwner, ModifierListOwner, TypeParameterListOwner, CallableDeclaration;
    Property: NamedDeclarationOwner, ModifierListOwner, TypeParameterListOwner, CallableDeclaration;
    PropertyAccessor: ModifierListOwner;
    TypeAlias: NamedDeclarationOwner, ModifierListOwner, TypeParameterListOwner;
    PrimaryConstructor: NamedDeclarationOwner, ModifierListOwner, CallableDeclaration;
    SecondaryConstructor: NamedDeclarationOwner, ModifierListOwner, CallableDeclaration;
    Parameter: NamedDeclarationOwner, ModifierListOwner;
    TypeParameter: NamedDeclarationOwner, ModifierListOwner;
    DestructuringDeclarationEntry: NamedDeclarationOwner, ModifierListOwner;
    ClassInitializer: ModifierListOwner;
}

impl Declaration {
    pub fn is_local(&self) -> bool {
        is_local_declaration(&self.syntax)
    }

    pub fn modifier_list(&self) -> Option<crate::ast::ModifierList> {
        support::child(&self.syntax)
    }
}

impl ClassOrObject {
    pub fn body(&self) -> Option<ClassBody> {
        support::child(&self.syntax)
    }

    pub fn super_type_list(&self) -> Option<SuperTypeList> {
        support::child(&self.syntax)
    }

    pub fn super_type_list_entries(&self) -> Vec<SuperTypeListEntry> {
        self.super_type_list()
            .map(|list| list.entries().collect())
            .unwrap_or_default()
    }

    pub fn primary_constructor(&self) -> Option<PrimaryConstructor> {
        support::child(&self.syntax)
    }

    pub fn is_local(&self) -> bool {
        is_local_declaration(&self.syntax)
    }

    pub fn is_top_level(&self) -> bool {
        is_top_level_declaration(&self.syntax)
    }

    /// Object declarations, companions and object literals.
    pub fn is_object(&self) -> bool {
        self.syntax.kind() == SyntaxKind::ObjectDeclaration
    }
}

impl DeclarationContainer for ClassOrObject {
    fn declarations(&self) -> Vec<Declaration> {
        self.body()
            .map(|body| body.declarations())
            .unwrap_or_default()
    }
}

impl Class {
    pub fn is_interface(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::InterfaceKw).is_some()
    }

    pub fn is_enum(&self) -> bool {
        self.has_modifier(SyntaxKind::EnumKw)
    }

    pub fn is_data(&self) -> bool {
        self.has_modifier(SyntaxKind::DataKw)
    }

    pub fn is_sealed(&self) -> bool {
        self.has_modifier(SyntaxKind::SealedKw)
    }

    pub fn is_inner(&self) -> bool {
        self.has_modifier(SyntaxKind::InnerKw)
    }

    pub fn is_annotation(&self) -> bool {
        self.has_modifier(SyntaxKind::AnnotationKw)
    }

    pub fn is_fun_interface(&self) -> bool {
        self.is_interface() && self.has_modifier(SyntaxKind::FunKw)
    }

    pub fn is_local(&self) -> bool {
        is_local_declaration(&self.syntax)
    }

    pub fn primary_constructor(&self) -> Option<PrimaryConstructor> {
        support::child(&self.syntax)
    }

    pub fn has_explicit_primary_constructor(&self) -> bool {
        self.primary_constructor().is_some()
    }

    /// A class has a primary constructor when one is written, or when it
    /// declares no secondary constructors. Interfaces follow the same rule.
    pub fn has_primary_constructor(&self) -> bool {
        self.has_explicit_primary_constructor() || self.secondary_constructors().is_empty()
    }

    pub fn primary_constructor_parameters(&self) -> Vec<Parameter> {
        self.primary_constructor()
            .map(|ctor| ctor.value_parameters())
            .unwrap_or_default()
    }

    pub fn secondary_constructors(&self) -> Vec<SecondaryConstructor> {
        self.body()
            .map(|body| body.secondary_constructors().collect())
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<ClassBody> {
        support::child(&self.syntax)
    }

    pub fn super_type_list(&self) -> Option<SuperTypeList> {
        support::child(&self.syntax)
    }

    pub fn super_type_list_entries(&self) -> Vec<SuperTypeListEntry> {
        self.super_type_list()
            .map(|list| list.entries().collect())
            .unwrap_or_default()
    }

    pub fn enum_entries(&self) -> Vec<EnumEntry> {
        self.body()
            .map(|body| body.enum_entries().collect())
            .unwrap_or_default()
    }

    pub fn companion_objects(&self) -> Vec<ObjectDeclaration> {
        self.body()
            .map(|body| body.companion_objects().collect())
            .unwrap_or_default()
    }

    /// `class`, `interface` or `enum class` keyword token.
    pub fn class_keyword(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::ClassKw)
            .or_else(|| support::token(&self.syntax, SyntaxKind::InterfaceKw))
    }
}

impl DeclarationContainer for Class {
    fn declarations(&self) -> Vec<Declaration> {
        self.body()
            .map(|body| body.declarations())
            .unwrap_or_default()
    }
}

impl EnumEntry {
    pub fn initializer_list(&self) -> Option<InitializerList> {
        support::child(&self.syntax)
    }

    pub fn has_initializer(&self) -> bool {
        self.initializer_list().is_some()
    }

    pub fn body(&self) -> Option<ClassBody> {
        support::child(&self.syntax)
    }

    /// The enum class declaring this entry.
    pub fn enum_class(&self) -> Option<Class> {
        self.syntax.parent()?.parent().and_then(Class::cast)
    }
}

impl ObjectDeclaration {
    pub fn is_companion(&self) -> bool {
        self.has_modifier(SyntaxKind::CompanionKw)
    }

    pub fn is_data(&self) -> bool {
        self.has_modifier(SyntaxKind::DataKw)
    }

    /// `object : Base { }` in expression position.
    pub fn is_object_literal(&self) -> bool {
        self.syntax
            .parent()
            .map_or(false, |parent| parent.kind() == SyntaxKind::ObjectLiteralExpression)
    }

    pub fn body(&self) -> Option<ClassBody> {
        support::child(&self.syntax)
    }

    pub fn super_type_list_entries(&self) -> Vec<SuperTypeListEntry> {
        support::child::<SuperTypeList>(&self.syntax)
            .map(|list| list.entries().collect())
            .unwrap_or_default()
    }

    pub fn is_local(&self) -> bool {
        !self.is_object_literal() && is_local_declaration(&self.syntax)
    }
}

impl DeclarationContainer for ObjectDeclaration {
    fn declarations(&self) -> Vec<Declaration> {
        self.body()
            .map(|body| body.declarations())
            .unwrap_or_default()
    }
}

impl ClassBody {
    pub fn declarations(&self) -> Vec<Declaration> {
        child_declarations(&self.syntax)
    }

    pub fn enum_entries(&self) -> impl Iterator<Item = EnumEntry> + '_ {
        support::children(&self.syntax)
    }

    pub fn secondary_constructors(&self) -> impl Iterator<Item = SecondaryConstructor> + '_ {
        support::children(&self.syntax)
    }

    pub fn companion_objects(&self) -> impl Iterator<Item = ObjectDeclaration> + '_ {
        support::children::<ObjectDeclaration>(&self.syntax).filter(|object| object.is_companion())
    }

    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        support::children(&self.syntax)
    }

    pub fn functions(&self) -> impl Iterator<Item = NamedFunction> + '_ {
        support::children(&self.syntax)
    }

    pub fn anonymous_initializers(&self) -> impl Iterator<Item = ClassInitializer> + '_ {
        support::children(&self.syntax)
    }

    pub fn l_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::LBrace)
    }

    pub fn r_brace(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::RBrace)
    }
}

impl DeclarationContainer for ClassBody {
    fn declarations(&self) -> Vec<Declaration> {
        child_declarations(&self.syntax)
    }
}

impl NamedFunction {
    pub fn has_body(&self) -> bool {
        self.body_expression().is_some()
    }

    pub fn has_block_body(&self) -> bool {
        self.equals_token().is_none()
    }

    /// `fun f() = expr`
    pub fn equals_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Eq)
    }

    /// The block body, or the expression after `=`.
    pub fn body_expression(&self) -> Option<Expression> {
        match self.equals_token() {
            Some(_) => support::child_after_token(&self.syntax, SyntaxKind::Eq),
            None => support::child::<BlockExpression>(&self.syntax)
                .and_then(|block| Expression::from_node(&block)),
        }
    }

    pub fn body_block_expression(&self) -> Option<BlockExpression> {
        support::child(&self.syntax)
    }

    pub fn has_declared_return_type(&self) -> bool {
        self.type_reference().is_some()
    }

    pub fn is_local(&self) -> bool {
        is_local_declaration(&self.syntax)
    }

    pub fn is_top_level(&self) -> bool {
        is_top_level_declaration(&self.syntax)
    }

    /// `fun(x: Int) = x` in expression position.
    pub fn is_anonymous(&self) -> bool {
        self.name_identifier().is_none()
    }
}

impl Property {
    pub fn is_var(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::VarKw).is_some()
    }

    pub fn val_or_var_keyword(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::ValKw)
            .or_else(|| support::token(&self.syntax, SyntaxKind::VarKw))
    }

    pub fn is_local(&self) -> bool {
        is_local_declaration(&self.syntax)
    }

    pub fn is_top_level(&self) -> bool {
        is_top_level_declaration(&self.syntax)
    }

    pub fn is_member(&self) -> bool {
        self.syntax
            .parent()
            .map_or(false, |parent| parent.kind() == SyntaxKind::ClassBody)
    }

    /// The expression after `=`.
    pub fn initializer(&self) -> Option<Expression> {
        support::token(&self.syntax, SyntaxKind::Eq)?;
        support::child_after_token::<Expression>(&self.syntax, SyntaxKind::Eq)
            .filter(|expr| expr.syntax().kind() != SyntaxKind::PropertyAccessor)
    }

    pub fn has_initializer(&self) -> bool {
        self.initializer().is_some()
    }

    pub fn delegate(&self) -> Option<PropertyDelegate> {
        support::child(&self.syntax)
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate().is_some()
    }

    pub fn delegate_expression(&self) -> Option<Expression> {
        self.delegate()?.expression()
    }

    pub fn has_delegate_expression_or_initializer(&self) -> bool {
        self.delegate_expression().is_some() || self.has_initializer()
    }

    pub fn accessors(&self) -> impl Iterator<Item = PropertyAccessor> + '_ {
        support::children(&self.syntax)
    }

    pub fn getter(&self) -> Option<PropertyAccessor> {
        self.accessors().find(|accessor| accessor.is_getter())
    }

    pub fn setter(&self) -> Option<PropertyAccessor> {
        self.accessors().find(|accessor| accessor.is_setter())
    }

    pub fn has_declared_return_type(&self) -> bool {
        self.type_reference().is_some()
    }
}

impl PropertyAccessor {
    pub fn is_getter(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::GetKw).is_some()
    }

    pub fn is_setter(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::SetKw).is_some()
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    /// The setter's value parameter.
    pub fn parameter(&self) -> Option<Parameter> {
        self.parameter_list()?.parameters().next()
    }

    pub fn return_type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }

    pub fn equals_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Eq)
    }

    pub fn body_expression(&self) -> Option<Expression> {
        match self.equals_token() {
            Some(_) => support::child_after_token(&self.syntax, SyntaxKind::Eq),
            None => support::child::<BlockExpression>(&self.syntax)
                .and_then(|block| Expression::from_node(&block)),
        }
    }

    pub fn has_body(&self) -> bool {
        self.body_expression().is_some()
    }

    pub fn has_block_body(&self) -> bool {
        self.equals_token().is_none() && self.has_body()
    }

    pub fn property(&self) -> Option<Property> {
        self.syntax.parent().and_then(Property::cast)
    }
}

impl PropertyDelegate {
    pub fn expression(&self) -> Option<Expression> {
        support::child(&self.syntax)
    }

    pub fn by_keyword(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::ByKw)
    }
}

impl TypeAlias {
    /// The aliased type, after `=`.
    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child_after_token(&self.syntax, SyntaxKind::Eq)
    }

    pub fn is_top_level(&self) -> bool {
        is_top_level_declaration(&self.syntax)
    }
}

impl PrimaryConstructor {
    pub fn containing_class_or_object(&self) -> Option<ClassOrObject> {
        self.syntax.parent().and_then(ClassOrObject::cast)
    }

    pub fn has_constructor_keyword(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::ConstructorKw).is_some()
    }
}

impl SecondaryConstructor {
    /// Every secondary constructor has a delegation call node; it is empty
    /// when the source has no `: this(..)` / `: super(..)`.
    pub fn delegation_call(&self) -> Result<ConstructorDelegationCall, SyntaxError> {
        support::child(&self.syntax)
            .ok_or_else(|| SyntaxError::missing(&self.syntax, SyntaxKind::ConstructorDelegationCall))
    }

    pub fn body_expression(&self) -> Option<BlockExpression> {
        support::child(&self.syntax)
    }

    pub fn has_body(&self) -> bool {
        self.body_expression().is_some()
    }

    pub fn has_implicit_delegation_call(&self) -> bool {
        self.delegation_call().map_or(true, |call| call.is_implicit())
    }

    pub fn is_delegated_call_to_this(&self) -> bool {
        self.delegation_call()
            .map_or(false, |call| call.is_call_to_this())
    }

    pub fn containing_class_or_object(&self) -> Option<ClassOrObject> {
        self.syntax.parent()?.parent().and_then(ClassOrObject::cast)
    }
}

impl ConstructorDelegationCall {
    pub fn callee_expression(&self) -> Option<ConstructorDelegationReference> {
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

    /// No delegation written in source: the node exists but holds no text.
    pub fn is_implicit(&self) -> bool {
        self.syntax.text_range().is_empty()
    }

    pub fn is_call_to_this(&self) -> bool {
        self.callee_expression().map_or(false, |callee| callee.is_this())
    }
}

impl ClassInitializer {
    pub fn body(&self) -> Option<BlockExpression> {
        support::child(&self.syntax)
    }

    pub fn containing_declaration(&self) -> Option<ClassOrObject> {
        self.syntax.parent()?.parent().and_then(ClassOrObject::cast)
    }
}

impl DestructuringDeclarationEntry {
    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }

    pub fn destructuring_declaration(&self) -> Option<DestructuringDeclaration> {
        self.syntax.parent().and_then(DestructuringDeclaration::cast)
    }
}

impl FunctionLiteral {
    pub fn value_parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    pub fn value_parameters(&self) -> Vec<Parameter> {
        self.value_parameter_list()
            .map(|list| list.parameters().collect())
            .unwrap_or_default()
    }

    pub fn has_parameter_specification(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::Arrow).is_some()
    }

    pub fn body_expression(&self) -> Option<BlockExpression> {
        support::child(&self.syntax)
    }
}

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        support::children(&self.syntax)
    }
}

impl Parameter {
    /// The parameter type; parameters of function types may be unnamed.
    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }

    /// The default value after `=`.
    pub fn default_value(&self) -> Option<Expression> {
        support::token(&self.syntax, SyntaxKind::Eq)?;
        support::child_after_token(&self.syntax, SyntaxKind::Eq)
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value().is_some()
    }

    /// `val`/`var` on a primary constructor parameter.
    pub fn has_val_or_var(&self) -> bool {
        self.val_or_var_keyword().is_some()
    }

    pub fn val_or_var_keyword(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::ValKw)
            .or_else(|| support::token(&self.syntax, SyntaxKind::VarKw))
    }

    pub fn is_mutable(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::VarKw).is_some()
    }

    pub fn is_vararg(&self) -> bool {
        self.has_modifier(SyntaxKind::VarargKw)
    }

    /// `{ (a, b) -> }` and `for ((a, b) in xs)`.
    pub fn destructuring_declaration(&self) -> Option<DestructuringDeclaration> {
        support::child(&self.syntax)
    }

    pub fn is_lambda_parameter(&self) -> bool {
        self.syntax
            .parent()
            .and_then(|list| list.parent())
            .map_or(false, |owner| owner.kind() == SyntaxKind::FunctionLiteral)
    }

    pub fn is_loop_parameter(&self) -> bool {
        self.syntax
            .parent()
            .map_or(false, |parent| parent.kind() == SyntaxKind::ForExpression)
    }

    /// The function, constructor, lambda or catch clause that declares the
    /// parameter.
    pub fn owner_function(&self) -> Option<crate::ast::Element> {
        self.syntax.parent()?.parent().and_then(crate::ast::Element::cast)
    }
}

impl TypeParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = TypeParameter> + '_ {
        support::children(&self.syntax)
    }
}

impl TypeParameter {
    pub fn extends_bound(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }

    pub fn is_reified(&self) -> bool {
        self.has_modifier(SyntaxKind::ReifiedKw)
    }

    /// `in`, `out`, or `None` for invariant parameters.
    pub fn variance(&self) -> Option<SyntaxKind> {
        let list = self.modifier_list()?;
        [SyntaxKind::InKw, SyntaxKind::OutKw]
            .into_iter()
            .find(|kind| list.has_modifier(*kind))
    }
}

impl SuperTypeList {
    pub fn entries(&self) -> impl Iterator<Item = SuperTypeListEntry> + '_ {
        support::children(&self.syntax)
    }
}

impl SuperTypeListEntry {
    pub fn type_reference(&self) -> Option<TypeReference> {
        match self.syntax.kind() {
            SyntaxKind::SuperTypeCallEntry => {
                support::child::<ConstructorCallee>(&self.syntax)?.type_reference()
            }
            _ => support::child(&self.syntax),
        }
    }

    /// The last segment of the referenced type name, without type arguments.
    pub fn referenced_name(&self) -> Option<String> {
        self.type_reference()?.short_name()
    }
}

impl SuperTypeCallEntry {
    pub fn callee(&self) -> Option<ConstructorCallee> {
        support::child(&self.syntax)
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        self.callee()?.type_reference()
    }

    pub fn value_argument_list(&self) -> Option<ValueArgumentList> {
        support::child(&self.syntax)
    }
}

impl SuperTypeEntry {
    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }
}

impl DelegatedSuperTypeEntry {
    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }

    pub fn delegate_expression(&self) -> Option<Expression> {
        support::child_after_token(&self.syntax, SyntaxKind::ByKw)
    }
}

impl InitializerList {
    pub fn initializers(&self) -> impl Iterator<Item = SuperTypeCallEntry> + '_ {
        support::children(&self.syntax)
    }
}

impl ConstructorCallee {
    pub fn type_reference(&self) -> Option<TypeReference> {
        support::child(&self.syntax)
    }

    pub fn constructor_reference(&self) -> Option<crate::ast::NameReferenceExpression> {
        self.type_reference()?.user_type()?.reference_expression()
    }
}
