//! Visitors over typed nodes with cascading defaults.
//!
//! Each node kind has a `visit_*` method whose default forwards to the
//! method of its category (`visit_class` -> `visit_class_or_object` ->
//! `visit_named_declaration` -> `visit_declaration` -> `visit_expression`
//! -> `visit_kt_element` -> `visit_element`). Overriding a category method
//! therefore catches every kind in the category that is not overridden
//! more specifically.
//!
//! Three flavours share one method table:
//! - [`Visitor`] threads a value of type `D` into the call and returns
//!   `Self::Output`.
//! - [`VoidVisitor`] returns nothing; its `visit_element` walks into
//!   children by default, so an empty impl visits the whole subtree.
//! - [`VoidVisitorWithParameter`] is the void flavour with a `&mut P`
//!   context.
//!
//! Dispatch starts from [`Accept`], implemented for every [`AstNode`].

use crate::ast::*;
use crate::parser::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

macro_rules! visitors {
    (
        categories {
            $($cat_method:ident($cat_ty:ident) => $cat_parent:ident($cat_parent_ty:ident);)*
        }
        nodes {
            $([$($kind:ident)|+] $method:ident($ty:ident) => $parent:ident($parent_ty:ident);)*
        }
    ) => {
        /// A visitor that threads `D` through each call.
        pub trait Visitor<D> {
            type Output;

            /// The root of every default chain.
            fn visit_element(&mut self, element: &Element, data: D) -> Self::Output;

            $(
                fn $cat_method(&mut self, node: &$cat_ty, data: D) -> Self::Output {
                    self.$cat_parent(&$cat_parent_ty::new_unchecked(node.syntax().clone()), data)
                }
            )*
            $(
                fn $method(&mut self, node: &$ty, data: D) -> Self::Output {
                    self.$parent(&$parent_ty::new_unchecked(node.syntax().clone()), data)
                }
            )*
        }

        /// A visitor without context or result. Visits the whole subtree
        /// unless a method stops the descent by not calling
        /// [`Accept::accept_children`].
        pub trait VoidVisitor {
            fn visit_element(&mut self, element: &Element) {
                walk_children(self, element.syntax());
            }

            $(
                fn $cat_method(&mut self, node: &$cat_ty) {
                    self.$cat_parent(&$cat_parent_ty::new_unchecked(node.syntax().clone()))
                }
            )*
            $(
                fn $method(&mut self, node: &$ty) {
                    self.$parent(&$parent_ty::new_unchecked(node.syntax().clone()))
                }
            )*
        }

        /// [`VoidVisitor`] with a mutable context shared by every call.
        pub trait VoidVisitorWithParameter<P> {
            fn visit_element(&mut self, element: &Element, data: &mut P) {
                walk_children_with(self, element.syntax(), data);
            }

            $(
                fn $cat_method(&mut self, node: &$cat_ty, data: &mut P) {
                    self.$cat_parent(&$cat_parent_ty::new_unchecked(node.syntax().clone()), data)
                }
            )*
            $(
                fn $method(&mut self, node: &$ty, data: &mut P) {
                    self.$parent(&$parent_ty::new_unchecked(node.syntax().clone()), data)
                }
            )*
        }

        fn dispatch<V, D>(node: SyntaxNode, visitor: &mut V, data: D) -> V::Output
        where
            V: Visitor<D> + ?Sized,
        {
            match node.kind() {
                $($(SyntaxKind::$kind)|+ => visitor.$method(&$ty::new_unchecked(node), data),)*
                _ => visitor.visit_element(&Element::new_unchecked(node), data),
            }
        }

        fn dispatch_void<V>(node: SyntaxNode, visitor: &mut V)
        where
            V: VoidVisitor + ?Sized,
        {
            match node.kind() {
                $($(SyntaxKind::$kind)|+ => visitor.$method(&$ty::new_unchecked(node)),)*
                _ => visitor.visit_element(&Element::new_unchecked(node)),
            }
        }

        fn dispatch_with<V, P>(node: SyntaxNode, visitor: &mut V, data: &mut P)
        where
            V: VoidVisitorWithParameter<P> + ?Sized,
        {
            match node.kind() {
                $($(SyntaxKind::$kind)|+ => visitor.$method(&$ty::new_unchecked(node), data),)*
                _ => visitor.visit_element(&Element::new_unchecked(node), data),
            }
        }
    };
}

visitors! {
    categories {
        visit_kt_element(KtElement) => visit_element(Element);
        visit_expression(Expression) => visit_kt_element(KtElement);
        visit_declaration(Declaration) => visit_expression(Expression);
        visit_named_declaration(NamedDeclaration) => visit_declaration(Declaration);
        visit_class_or_object(ClassOrObject) => visit_named_declaration(NamedDeclaration);
        visit_super_type_list_entry(SuperTypeListEntry) => visit_kt_element(KtElement);
        visit_type_element(TypeElement) => visit_kt_element(KtElement);
        visit_reference_expression(ReferenceExpression) => visit_expression(Expression);
        visit_simple_name_expression(SimpleNameExpression) => visit_reference_expression(ReferenceExpression);
        visit_string_template_entry(StringTemplateEntry) => visit_kt_element(KtElement);
        visit_string_template_entry_with_expression(StringTemplateEntryWithExpression) => visit_string_template_entry(StringTemplateEntry);
        visit_expression_with_label(ExpressionWithLabel) => visit_expression(Expression);
        visit_when_condition(WhenCondition) => visit_kt_element(KtElement);
        visit_loop_expression(LoopExpression) => visit_expression(Expression);
        visit_unary_expression(UnaryExpression) => visit_expression(Expression);
        visit_qualified_expression(QualifiedExpression) => visit_expression(Expression);
        visit_double_colon_expression(DoubleColonExpression) => visit_expression(Expression);
    }
    nodes {
        // Files
        [KtFile] visit_kt_file(KtFile) => visit_element(Element);
        [Script] visit_script(Script) => visit_declaration(Declaration);
        [PackageDirective] visit_package_directive(PackageDirective) => visit_kt_element(KtElement);
        [ImportList] visit_import_list(ImportList) => visit_kt_element(KtElement);
        [ImportDirective] visit_import_directive(ImportDirective) => visit_kt_element(KtElement);
        [ImportAlias] visit_import_alias(ImportAlias) => visit_kt_element(KtElement);
        [FileAnnotationList] visit_file_annotation_list(FileAnnotationList) => visit_kt_element(KtElement);
        [ExpressionFragment | TypeFragment] visit_code_fragment(CodeFragment) => visit_kt_element(KtElement);

        // Declarations
        [Class] visit_class(Class) => visit_class_or_object(ClassOrObject);
        [EnumEntry] visit_enum_entry(EnumEntry) => visit_class(Class);
        [ObjectDeclaration] visit_object_declaration(ObjectDeclaration) => visit_class_or_object(ClassOrObject);
        [Fun] visit_named_function(NamedFunction) => visit_named_declaration(NamedDeclaration);
        [Property] visit_property(Property) => visit_named_declaration(NamedDeclaration);
        [TypeAlias] visit_type_alias(TypeAlias) => visit_named_declaration(NamedDeclaration);
        [ValueParameter] visit_parameter(Parameter) => visit_named_declaration(NamedDeclaration);
        [TypeParameter] visit_type_parameter(TypeParameter) => visit_named_declaration(NamedDeclaration);
        [DestructuringDeclarationEntry] visit_destructuring_declaration_entry(DestructuringDeclarationEntry) => visit_named_declaration(NamedDeclaration);
        [PropertyAccessor] visit_property_accessor(PropertyAccessor) => visit_declaration(Declaration);
        [PrimaryConstructor] visit_primary_constructor(PrimaryConstructor) => visit_declaration(Declaration);
        [SecondaryConstructor] visit_secondary_constructor(SecondaryConstructor) => visit_declaration(Declaration);
        [ClassInitializer] visit_class_initializer(ClassInitializer) => visit_declaration(Declaration);
        [DestructuringDeclaration] visit_destructuring_declaration(DestructuringDeclaration) => visit_declaration(Declaration);
        [FunctionLiteral] visit_function_literal(FunctionLiteral) => visit_declaration(Declaration);
        [PropertyDelegate] visit_property_delegate(PropertyDelegate) => visit_kt_element(KtElement);
        [ConstructorDelegationCall] visit_constructor_delegation_call(ConstructorDelegationCall) => visit_kt_element(KtElement);
        [ConstructorDelegationReference] visit_constructor_delegation_reference(ConstructorDelegationReference) => visit_reference_expression(ReferenceExpression);
        [ClassBody] visit_class_body(ClassBody) => visit_kt_element(KtElement);
        [ModifierList] visit_modifier_list(ModifierList) => visit_kt_element(KtElement);
        [AnnotationEntry] visit_annotation_entry(AnnotationEntry) => visit_kt_element(KtElement);
        [AnnotationTarget] visit_annotation_use_site_target(AnnotationTarget) => visit_kt_element(KtElement);
        [ConstructorCallee] visit_constructor_callee(ConstructorCallee) => visit_kt_element(KtElement);
        [ValueParameterList] visit_parameter_list(ParameterList) => visit_kt_element(KtElement);
        [TypeParameterList] visit_type_parameter_list(TypeParameterList) => visit_kt_element(KtElement);
        [TypeConstraintList] visit_type_constraint_list(TypeConstraintList) => visit_kt_element(KtElement);
        [TypeConstraint] visit_type_constraint(TypeConstraint) => visit_kt_element(KtElement);
        [SuperTypeList] visit_super_type_list(SuperTypeList) => visit_kt_element(KtElement);
        [InitializerList] visit_initializer_list(InitializerList) => visit_kt_element(KtElement);
        [SuperTypeEntry] visit_super_type_entry(SuperTypeEntry) => visit_super_type_list_entry(SuperTypeListEntry);
        [SuperTypeCallEntry] visit_super_type_call_entry(SuperTypeCallEntry) => visit_super_type_list_entry(SuperTypeListEntry);
        [DelegatedSuperTypeEntry] visit_delegated_super_type_entry(DelegatedSuperTypeEntry) => visit_super_type_list_entry(SuperTypeListEntry);

        // Types
        [TypeReference] visit_type_reference(TypeReference) => visit_kt_element(KtElement);
        [FunctionTypeReceiver] visit_function_type_receiver(FunctionTypeReceiver) => visit_kt_element(KtElement);
        [TypeArgumentList] visit_type_argument_list(TypeArgumentList) => visit_kt_element(KtElement);
        [TypeProjection] visit_type_projection(TypeProjection) => visit_kt_element(KtElement);
        [UserType] visit_user_type(UserType) => visit_type_element(TypeElement);
        [NullableType] visit_nullable_type(NullableType) => visit_type_element(TypeElement);
        [FunctionType] visit_function_type(FunctionType) => visit_type_element(TypeElement);
        [DynamicType] visit_dynamic_type(DynamicType) => visit_type_element(TypeElement);
        [IntersectionType] visit_intersection_type(IntersectionType) => visit_type_element(TypeElement);

        // Names, constants and strings
        [NameReferenceExpression] visit_name_reference_expression(NameReferenceExpression) => visit_simple_name_expression(SimpleNameExpression);
        [OperationReference] visit_operation_reference(OperationReference) => visit_simple_name_expression(SimpleNameExpression);
        [LabelReference] visit_label_reference(LabelReference) => visit_simple_name_expression(SimpleNameExpression);
        [NullConstant | BooleanConstant | IntegerConstant | FloatConstant | CharacterConstant]
            visit_constant_expression(ConstantExpression) => visit_expression(Expression);
        [StringTemplate] visit_string_template(StringTemplate) => visit_expression(Expression);
        [LiteralStringTemplateEntry] visit_literal_string_template_entry(LiteralStringTemplateEntry) => visit_string_template_entry(StringTemplateEntry);
        [EscapeStringTemplateEntry] visit_escape_string_template_entry(EscapeStringTemplateEntry) => visit_string_template_entry(StringTemplateEntry);
        [ShortStringTemplateEntry] visit_short_string_template_entry(ShortStringTemplateEntry) => visit_string_template_entry_with_expression(StringTemplateEntryWithExpression);
        [LongStringTemplateEntry] visit_long_string_template_entry(LongStringTemplateEntry) => visit_string_template_entry_with_expression(StringTemplateEntryWithExpression);

        // Expressions
        [ParenthesizedExpression] visit_parenthesized_expression(ParenthesizedExpression) => visit_expression(Expression);
        [ThisExpression] visit_this_expression(ThisExpression) => visit_expression_with_label(ExpressionWithLabel);
        [SuperExpression] visit_super_expression(SuperExpression) => visit_expression_with_label(ExpressionWithLabel);
        [LabeledExpression] visit_labeled_expression(LabeledExpression) => visit_expression_with_label(ExpressionWithLabel);
        [ReturnExpression] visit_return_expression(ReturnExpression) => visit_expression_with_label(ExpressionWithLabel);
        [BreakExpression] visit_break_expression(BreakExpression) => visit_expression_with_label(ExpressionWithLabel);
        [ContinueExpression] visit_continue_expression(ContinueExpression) => visit_expression_with_label(ExpressionWithLabel);
        [IfExpression] visit_if_expression(IfExpression) => visit_expression(Expression);
        [WhenExpression] visit_when_expression(WhenExpression) => visit_expression(Expression);
        [WhenEntry] visit_when_entry(WhenEntry) => visit_kt_element(KtElement);
        [WhenConditionExpression] visit_when_condition_with_expression(WhenConditionWithExpression) => visit_when_condition(WhenCondition);
        [WhenConditionInRange] visit_when_condition_in_range(WhenConditionInRange) => visit_when_condition(WhenCondition);
        [WhenConditionIsPattern] visit_when_condition_is_pattern(WhenConditionIsPattern) => visit_when_condition(WhenCondition);
        [TryExpression] visit_try_expression(TryExpression) => visit_expression(Expression);
        [CatchClause] visit_catch_section(CatchClause) => visit_kt_element(KtElement);
        [FinallySection] visit_finally_section(FinallySection) => visit_kt_element(KtElement);
        [ForExpression] visit_for_expression(ForExpression) => visit_loop_expression(LoopExpression);
        [WhileExpression] visit_while_expression(WhileExpression) => visit_loop_expression(LoopExpression);
        [DoWhileExpression] visit_do_while_expression(DoWhileExpression) => visit_loop_expression(LoopExpression);
        [LambdaExpression] visit_lambda_expression(LambdaExpression) => visit_expression(Expression);
        [AnnotatedExpression] visit_annotated_expression(AnnotatedExpression) => visit_expression(Expression);
        [BinaryExpression] visit_binary_expression(BinaryExpression) => visit_expression(Expression);
        [BinaryWithTypeRhsExpression] visit_binary_with_type_rhs_expression(BinaryWithTypeRhsExpression) => visit_expression(Expression);
        [IsExpression] visit_is_expression(IsExpression) => visit_expression(Expression);
        [PrefixExpression] visit_prefix_expression(PrefixExpression) => visit_unary_expression(UnaryExpression);
        [PostfixExpression] visit_postfix_expression(PostfixExpression) => visit_unary_expression(UnaryExpression);
        [CallExpression] visit_call_expression(CallExpression) => visit_reference_expression(ReferenceExpression);
        [ArrayAccessExpression] visit_array_access_expression(ArrayAccessExpression) => visit_reference_expression(ReferenceExpression);
        [DotQualifiedExpression] visit_dot_qualified_expression(DotQualifiedExpression) => visit_qualified_expression(QualifiedExpression);
        [SafeAccessExpression] visit_safe_qualified_expression(SafeQualifiedExpression) => visit_qualified_expression(QualifiedExpression);
        [CallableReferenceExpression] visit_callable_reference_expression(CallableReferenceExpression) => visit_double_colon_expression(DoubleColonExpression);
        [ClassLiteralExpression] visit_class_literal_expression(ClassLiteralExpression) => visit_double_colon_expression(DoubleColonExpression);
        [ObjectLiteralExpression] visit_object_literal_expression(ObjectLiteralExpression) => visit_expression(Expression);
        [ThrowExpression] visit_throw_expression(ThrowExpression) => visit_expression(Expression);
        [CollectionLiteralExpression] visit_collection_literal_expression(CollectionLiteralExpression) => visit_expression(Expression);
        [Block] visit_block_expression(BlockExpression) => visit_expression(Expression);
        [ValueArgumentList] visit_value_argument_list(ValueArgumentList) => visit_kt_element(KtElement);
        [ValueArgument] visit_argument(ValueArgument) => visit_kt_element(KtElement);
        [LambdaArgument] visit_lambda_argument(LambdaArgument) => visit_argument(ValueArgument);
        [ValueArgumentName] visit_argument_name(ValueArgumentName) => visit_kt_element(KtElement);
        [LabelQualifier] visit_label_qualifier(LabelQualifier) => visit_kt_element(KtElement);
        [Condition | Then | Else | Body | LoopRange | Indices]
            visit_container_node(ContainerNode) => visit_kt_element(KtElement);
    }
}

fn walk_children<V: VoidVisitor + ?Sized>(visitor: &mut V, node: &SyntaxNode) {
    for child in node.children() {
        dispatch_void(child, visitor);
    }
}

fn walk_children_with<V, P>(visitor: &mut V, node: &SyntaxNode, data: &mut P)
where
    V: VoidVisitorWithParameter<P> + ?Sized,
{
    for child in node.children() {
        dispatch_with(child, visitor, data);
    }
}

/// Entry points for visiting a node.
pub trait Accept: AstNode {
    /// Call the most specific `visit_*` method for this node's kind.
    fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
    where
        V: Visitor<D> + ?Sized,
    {
        dispatch(self.syntax().clone(), visitor, data)
    }

    fn accept_void<V: VoidVisitor + ?Sized>(&self, visitor: &mut V) {
        dispatch_void(self.syntax().clone(), visitor)
    }

    fn accept_with<V, P>(&self, visitor: &mut V, data: &mut P)
    where
        V: VoidVisitorWithParameter<P> + ?Sized,
    {
        dispatch_with(self.syntax().clone(), visitor, data)
    }

    /// Visit each child node in order. Used by visitors that override a
    /// method but still want to descend.
    fn accept_children<V: VoidVisitor + ?Sized>(&self, visitor: &mut V) {
        walk_children(visitor, self.syntax())
    }

    fn accept_children_with<V, P>(&self, visitor: &mut V, data: &mut P)
    where
        V: VoidVisitorWithParameter<P> + ?Sized,
    {
        walk_children_with(visitor, self.syntax(), data)
    }
}

impl<N: AstNode> Accept for N {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse_kotlin;

    /// Records the kind of every node that reaches `visit_named_declaration`.
    #[derive(Default)]
    struct NamedDeclarations(Vec<(SyntaxKind, String)>);

    impl VoidVisitor for NamedDeclarations {
        fn visit_named_declaration(&mut self, node: &NamedDeclaration) {
            self.0.push((node.kind(), node.name().unwrap_or_default()));
            node.accept_children(self);
        }
    }

    #[test]
    fn category_override_catches_every_member_kind() {
        let parse = parse_kotlin("class A(val x: Int) { fun f(y: Int) = y }\nobject O\ntypealias T = A");
        let file = KtFile::cast(parse.syntax()).expect("file");
        let mut visitor = NamedDeclarations::default();
        file.accept_void(&mut visitor);
        assert_eq!(
            visitor.0,
            vec![
                (SyntaxKind::Class, "A".to_string()),
                (SyntaxKind::ValueParameter, "x".to_string()),
                (SyntaxKind::Fun, "f".to_string()),
                (SyntaxKind::ValueParameter, "y".to_string()),
                (SyntaxKind::ObjectDeclaration, "O".to_string()),
                (SyntaxKind::TypeAlias, "T".to_string()),
            ]
        );
    }

    struct Depth;

    impl Visitor<usize> for Depth {
        type Output = usize;

        fn visit_element(&mut self, element: &Element, depth: usize) -> usize {
            element
                .syntax()
                .children()
                .map(|child| Element::new_unchecked(child).accept(self, depth + 1))
                .max()
                .unwrap_or(depth)
        }

        fn visit_constant_expression(&mut self, _node: &ConstantExpression, depth: usize) -> usize {
            depth
        }
    }

    #[test]
    fn context_threading_visitor_returns_values() {
        let parse = crate::parser::parse_kotlin_expression("1 + (2 * 3)");
        let root = Element::cast(parse.syntax()).expect("root");
        // ExpressionFragment > Binary > Parenthesized > Binary > Constant
        assert_eq!(root.accept(&mut Depth, 0), 4);
    }
}
