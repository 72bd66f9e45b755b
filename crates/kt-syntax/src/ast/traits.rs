//! Capabilities shared by several node kinds.
//!
//! A node opts into a capability by implementing the trait; the shared
//! behaviour is in the free functions below, which the provided trait
//! methods call.

use crate::ast::{
    support, AnnotationEntry, AstNode, Declaration, ModifierList, Parameter, ParameterList,
    TypeConstraint, TypeConstraintList, TypeParameter, TypeParameterList, TypeReference,
};
use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::{KindSet, SyntaxKind};

pub trait NamedDeclarationOwner: AstNode {
    fn name_identifier(&self) -> Option<SyntaxToken> {
        support::ident_token(self.syntax())
    }

    /// The declared name with backticks removed.
    fn name(&self) -> Option<String> {
        self.name_identifier()
            .map(|tok| support::unquote(tok.text()).to_string())
    }
}

pub trait ModifierListOwner: AstNode {
    fn modifier_list(&self) -> Option<ModifierList> {
        support::child(self.syntax())
    }

    fn has_modifier(&self, kind: SyntaxKind) -> bool {
        has_modifier(self, kind)
    }

    fn annotation_entries(&self) -> Vec<AnnotationEntry> {
        self.modifier_list()
            .map(|list| list.annotation_entries().collect())
            .unwrap_or_default()
    }
}

pub trait TypeParameterListOwner: NamedDeclarationOwner {
    fn type_parameter_list(&self) -> Option<TypeParameterList> {
        support::child(self.syntax())
    }

    fn type_parameters(&self) -> Vec<TypeParameter> {
        self.type_parameter_list()
            .map(|list| list.parameters().collect())
            .unwrap_or_default()
    }

    fn type_constraint_list(&self) -> Option<TypeConstraintList> {
        support::child(self.syntax())
    }

    fn type_constraints(&self) -> Vec<TypeConstraint> {
        self.type_constraint_list()
            .map(|list| list.constraints().collect())
            .unwrap_or_default()
    }
}

/// Files, scripts, class bodies and classes: anything holding an ordered
/// sequence of declarations.
pub trait DeclarationContainer: AstNode {
    /// Declarations in source order.
    fn declarations(&self) -> Vec<Declaration>;
}

pub trait CallableDeclaration: NamedDeclarationOwner + ModifierListOwner {
    fn value_parameter_list(&self) -> Option<ParameterList> {
        support::child(self.syntax())
    }

    fn value_parameters(&self) -> Vec<Parameter> {
        self.value_parameter_list()
            .map(|list| list.parameters().collect())
            .unwrap_or_default()
    }

    fn receiver_type_reference(&self) -> Option<TypeReference> {
        receiver_type_reference(self.syntax())
    }

    /// The declared type: the return type of a function, the type of a
    /// property or parameter.
    fn type_reference(&self) -> Option<TypeReference> {
        declared_type_reference(self.syntax())
    }
}

pub fn has_modifier<N: ModifierListOwner + ?Sized>(owner: &N, kind: SyntaxKind) -> bool {
    owner
        .modifier_list()
        .map_or(false, |list| list.has_modifier(kind))
}

/// A type reference directly followed by `.`: the receiver of an extension.
pub fn receiver_type_reference(node: &SyntaxNode) -> Option<TypeReference> {
    support::children::<TypeReference>(node).find(|ty| support::followed_by(ty.syntax(), SyntaxKind::Dot))
}

/// The type reference introduced by a direct `:` token.
pub fn declared_type_reference(node: &SyntaxNode) -> Option<TypeReference> {
    support::child_after_token(node, SyntaxKind::Colon)
}

/// Declarations among the immediate children of `node`.
pub fn child_declarations(node: &SyntaxNode) -> Vec<Declaration> {
    support::children::<Declaration>(node).collect()
}

/// Containers whose direct declarations are not local.
const NON_LOCAL_PARENTS: KindSet = KindSet::new(&[SyntaxKind::KtFile, SyntaxKind::ClassBody]);

/// Declarations inside function bodies, lambdas and initializers are local.
/// Top-level statements of a script are not.
pub fn is_local_declaration(node: &SyntaxNode) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    if NON_LOCAL_PARENTS.contains(parent.kind()) {
        return false;
    }
    !is_script_block(&parent)
}

/// Declarations directly in a file or in a script's top-level block.
pub fn is_top_level_declaration(node: &SyntaxNode) -> bool {
    node.parent().map_or(false, |parent| {
        parent.kind() == SyntaxKind::KtFile || is_script_block(&parent)
    })
}

pub(crate) fn is_script_block(node: &SyntaxNode) -> bool {
    node.kind() == SyntaxKind::Block
        && node
            .parent()
            .map_or(false, |parent| parent.kind() == SyntaxKind::Script)
}
