//! Typed views over the untyped rowan tree.
//!
//! Every wrapper is a cheap handle around a [`SyntaxNode`]; casting checks the
//! node kind and never allocates. Category wrappers (`Expression`,
//! `Declaration`, ...) accept every kind of their category, so a node can be
//! viewed at any level of the kind hierarchy.

use crate::parser::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(syntax: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    fn kind(&self) -> SyntaxKind {
        self.syntax().kind()
    }

    /// Source text of the node, trivia inside the node included.
    fn text(&self) -> String {
        self.syntax().text().to_string()
    }
}

pub mod support {
    use rowan::Direction;

    use crate::ast::{AstNode, KtFile};
    use crate::errors::SyntaxError;
    use crate::parser::{SyntaxNode, SyntaxToken};
    use crate::syntax_kind::{KindSet, SyntaxKind};

    pub fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
        node.children().find_map(N::cast)
    }

    pub fn children<'a, N: AstNode + 'a>(node: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
        node.children().filter_map(N::cast)
    }

    /// The first immediate child of `kind`. Only meaningful for kinds the
    /// grammar allows at most once under `node`.
    pub fn child_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
        node.children().find(|child| child.kind() == kind)
    }

    /// Immediate children whose kind is in `kinds`, in source order.
    ///
    /// Every call starts a fresh walk over the sibling chain, so the result
    /// can be requested any number of times.
    pub fn children_of_kind(node: &SyntaxNode, kinds: impl Into<KindSet>) -> ChildrenOfKind {
        ChildrenOfKind {
            next: node.first_child(),
            kinds: kinds.into(),
        }
    }

    #[derive(Debug, Clone)]
    pub struct ChildrenOfKind {
        next: Option<SyntaxNode>,
        kinds: KindSet,
    }

    impl Iterator for ChildrenOfKind {
        type Item = SyntaxNode;

        fn next(&mut self) -> Option<SyntaxNode> {
            while let Some(node) = self.next.take() {
                self.next = node.next_sibling();
                if self.kinds.contains(node.kind()) {
                    return Some(node);
                }
            }
            None
        }
    }

    pub fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind() == kind)
    }

    pub fn tokens<'a>(
        node: &'a SyntaxNode,
        kind: SyntaxKind,
    ) -> impl Iterator<Item = SyntaxToken> + 'a {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(move |tok| tok.kind() == kind)
    }

    /// The first token among the node's direct children that is in `kinds`.
    pub fn token_in(node: &SyntaxNode, kinds: KindSet) -> Option<SyntaxToken> {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| kinds.contains(tok.kind()))
    }

    /// The declared name among the node's direct children.
    ///
    /// Receivers and types live in child nodes, so the only identifier token
    /// directly under a declaration is its name.
    pub fn ident_token(node: &SyntaxNode) -> Option<SyntaxToken> {
        token(node, SyntaxKind::Identifier)
    }

    /// Strip the backticks of a quoted identifier.
    pub fn unquote(text: &str) -> &str {
        text.strip_prefix('`')
            .and_then(|rest| rest.strip_suffix('`'))
            .unwrap_or(text)
    }

    /// The file this node belongs to.
    pub fn owner_file(node: &SyntaxNode) -> Result<KtFile, SyntaxError> {
        node.ancestors()
            .find_map(KtFile::cast)
            .ok_or_else(|| SyntaxError::invalid_tree_state(node))
    }

    /// The nearest sibling of `node` in `direction` that casts to `N`.
    /// Sibling nodes of other kinds (error nodes, operators) are skipped.
    pub fn sibling<N: AstNode>(node: &SyntaxNode, direction: Direction) -> Option<N> {
        node.siblings(direction).skip(1).find_map(N::cast)
    }

    /// The first child node of type `N` that comes after a direct `kind`
    /// token.
    pub fn child_after_token<N: AstNode>(node: &SyntaxNode, kind: SyntaxKind) -> Option<N> {
        node.children_with_tokens()
            .skip_while(|it| it.as_token().map_or(true, |tok| tok.kind() != kind))
            .filter_map(|it| it.into_node())
            .find_map(N::cast)
    }

    /// Whether the first non-trivia token after `node` (within its parent)
    /// has the given kind.
    pub fn followed_by(node: &SyntaxNode, kind: SyntaxKind) -> bool {
        let mut next = node.next_sibling_or_token();
        while let Some(element) = next {
            if !element.kind().is_trivia() {
                return element.kind() == kind;
            }
            next = element.next_sibling_or_token();
        }
        false
    }
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident => $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: crate::parser::SyntaxNode,
        }

        impl crate::ast::AstNode for $name {
            fn can_cast(kind: crate::syntax_kind::SyntaxKind) -> bool {
                matches!(kind, $(crate::syntax_kind::SyntaxKind::$kind)|+)
            }

            fn cast(syntax: crate::parser::SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &crate::parser::SyntaxNode {
                &self.syntax
            }
        }

        #[allow(dead_code)]
        impl $name {
            /// Wrap a node whose kind the caller has already checked.
            pub(crate) fn new_unchecked(syntax: crate::parser::SyntaxNode) -> Self {
                debug_assert!(
                    <Self as crate::ast::AstNode>::can_cast(syntax.kind()),
                    "{:?} is not a {}",
                    syntax.kind(),
                    stringify!($name)
                );
                Self { syntax }
            }
        }
    };
}

macro_rules! ast_category {
    ($(#[$meta:meta])* $name:ident => $set:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: crate::parser::SyntaxNode,
        }

        impl crate::ast::AstNode for $name {
            fn can_cast(kind: crate::syntax_kind::SyntaxKind) -> bool {
                $set.contains(kind)
            }

            fn cast(syntax: crate::parser::SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &crate::parser::SyntaxNode {
                &self.syntax
            }
        }

        #[allow(dead_code)]
        impl $name {
            /// Wrap a node whose kind the caller has already checked.
            pub(crate) fn new_unchecked(syntax: crate::parser::SyntaxNode) -> Self {
                debug_assert!(
                    <Self as crate::ast::AstNode>::can_cast(syntax.kind()),
                    "{:?} is not a {}",
                    syntax.kind(),
                    stringify!($name)
                );
                Self { syntax }
            }

            /// View `node` as this category, if its kind belongs to it.
            pub fn from_node(node: &impl crate::ast::AstNode) -> Option<Self> {
                <Self as crate::ast::AstNode>::cast(node.syntax().clone())
            }
        }
    };
}

mod declarations;
mod expressions;
mod file;
mod traits;
mod types;

pub use declarations::*;
pub use expressions::*;
pub use file::*;
pub use traits::*;
pub use types::*;

#[cfg(test)]
mod tests;

ast_category! {
    /// Any node, including error nodes.
    Element => crate::syntax_kind::KindSet::ALL_NODES
}

ast_category! {
    /// Any node produced by the grammar.
    KtElement => crate::syntax_kind::KindSet::KT_ELEMENTS
}

impl Element {
    pub fn is_error(&self) -> bool {
        self.syntax.kind() == SyntaxKind::Error
    }
}

impl KtElement {
    pub fn owner_file(&self) -> Result<KtFile, crate::errors::SyntaxError> {
        support::owner_file(&self.syntax)
    }
}
