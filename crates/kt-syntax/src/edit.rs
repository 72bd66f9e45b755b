//! Mutation over a mutable copy of a file.
//!
//! [`TreeEditor`] owns a `clone_for_update` copy of a [`KtFile`]; the tree the
//! copy was made from is never touched. Every edit goes through
//! `splice_children`, so removed subtrees are detached and inserted ones are
//! attached in one step and parent pointers stay consistent. New nodes come
//! from [`make`], which parses small snippets.
//!
//! The editor caches derived per-node state ([`TreeEditor::fq_name`]). An edit
//! drops cached entries for the edited node, its ancestors and its
//! descendants.

use std::cell::RefCell;
use std::collections::HashMap;

use rowan::NodeOrToken;

use crate::ast::{support, AstNode, KtFile, ParenthesizedExpression};
use crate::errors::SyntaxError;
use crate::fq_name::{fq_name, FqName};
use crate::parser::{SyntaxElement, SyntaxNode, SyntaxToken};
use crate::precedence::are_parentheses_useless;
use crate::syntax_kind::{KindSet, SyntaxKind};

/// Nodes whose items are separated by commas.
const COMMA_SEPARATED: KindSet = KindSet::new(&[
    SyntaxKind::ValueParameterList,
    SyntaxKind::TypeParameterList,
    SyntaxKind::TypeConstraintList,
    SyntaxKind::SuperTypeList,
    SyntaxKind::TypeArgumentList,
    SyntaxKind::ValueArgumentList,
    SyntaxKind::CollectionLiteralExpression,
    SyntaxKind::Indices,
    SyntaxKind::WhenEntry,
    SyntaxKind::DestructuringDeclaration,
]);

/// Nodes whose items sit on their own lines.
const LINE_SEPARATED: KindSet = KindSet::new(&[
    SyntaxKind::KtFile,
    SyntaxKind::ImportList,
    SyntaxKind::ClassBody,
    SyntaxKind::Block,
]);

pub struct TreeEditor {
    root: KtFile,
    fq_names: RefCell<HashMap<SyntaxNode, Option<FqName>>>,
}

impl TreeEditor {
    /// Start editing a mutable copy of `file`.
    pub fn new(file: &KtFile) -> TreeEditor {
        let root = file.syntax().clone_subtree().clone_for_update();
        TreeEditor {
            root: KtFile::new_unchecked(root),
            fq_names: RefCell::default(),
        }
    }

    /// The file being edited. Nodes reached from here can be passed back to
    /// the editing methods.
    pub fn file(&self) -> &KtFile {
        &self.root
    }

    /// The current text of the edited file.
    pub fn text(&self) -> String {
        self.root.text()
    }

    /// An immutable snapshot of the edited tree.
    pub fn finish(self) -> KtFile {
        let green = self.root.syntax().green().into_owned();
        KtFile::new_unchecked(SyntaxNode::new_root(green))
    }

    /// The node of the edited copy that corresponds to `node` in the tree the
    /// editor was created from. Only meaningful before the first edit that
    /// shifts text before `node`.
    pub fn find<N: AstNode>(&self, node: &N) -> Option<N> {
        let range = node.syntax().text_range();
        let start = match self.root.syntax().covering_element(range) {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent()?,
        };
        start
            .ancestors()
            .filter(|candidate| {
                candidate.text_range() == range && candidate.kind() == node.syntax().kind()
            })
            .find_map(N::cast)
    }

    /// The qualified name of a declaration in the edited tree, computed once
    /// and cached until an edit touches the declaration.
    pub fn fq_name(&self, decl: &impl AstNode) -> Option<FqName> {
        let key = decl.syntax().clone();
        if let Some(cached) = self.fq_names.borrow().get(&key) {
            return cached.clone();
        }
        let computed = fq_name(decl);
        self.fq_names.borrow_mut().insert(key, computed.clone());
        computed
    }

    /// Insert a copy of `new` as the previous sibling of `anchor`.
    ///
    /// Inside comma-separated lists a `, ` separator follows the new item;
    /// inside blocks, class bodies and files the new item gets its own line
    /// with the anchor's indentation.
    pub fn insert_before(
        &mut self,
        anchor: &impl AstNode,
        new: &impl AstNode,
    ) -> Result<SyntaxNode, SyntaxError> {
        let (parent, anchor) = self.attached(anchor.syntax(), "insert_before")?;
        let inserted = new.syntax().clone_subtree().clone_for_update();
        let mut elements = vec![SyntaxElement::Node(inserted.clone())];
        elements.extend(separator(&parent, &anchor));
        self.invalidate(&parent);
        let index = anchor.index();
        tracing::debug!(kind = ?inserted.kind(), anchor = ?anchor.kind(), "insert before");
        parent.splice_children(index..index, elements);
        Ok(inserted)
    }

    /// Insert a copy of `new` as the next sibling of `anchor`, with the same
    /// separators as [`TreeEditor::insert_before`].
    pub fn insert_after(
        &mut self,
        anchor: &impl AstNode,
        new: &impl AstNode,
    ) -> Result<SyntaxNode, SyntaxError> {
        let (parent, anchor) = self.attached(anchor.syntax(), "insert_after")?;
        let inserted = new.syntax().clone_subtree().clone_for_update();
        let mut elements: Vec<SyntaxElement> = separator(&parent, &anchor).collect();
        elements.push(SyntaxElement::Node(inserted.clone()));
        self.invalidate(&parent);
        let index = anchor.index() + 1;
        tracing::debug!(kind = ?inserted.kind(), anchor = ?anchor.kind(), "insert after");
        parent.splice_children(index..index, elements);
        Ok(inserted)
    }

    /// Remove `node` together with the separator that ties it to its list.
    ///
    /// In a comma-separated list the following comma is removed, or the
    /// preceding one for the last item. On a line-separated container the
    /// whitespace before the item and a trailing `;` go as well.
    pub fn delete_with_delimiters(&mut self, node: &impl AstNode) -> Result<(), SyntaxError> {
        let (parent, node) = self.attached(node.syntax(), "delete_with_delimiters")?;
        let index = node.index();
        let mut range = index..index + 1;

        if COMMA_SEPARATED.contains(parent.kind()) {
            let next = significant(node.next_sibling_or_token(), Step::Next);
            let prev = significant(node.prev_sibling_or_token(), Step::Prev);
            match (next, prev) {
                (Some(comma), _) if comma.kind() == SyntaxKind::Comma => {
                    range.end = element_index(&comma) + 1;
                    if comma
                        .next_sibling_or_token()
                        .map_or(false, |it| it.kind() == SyntaxKind::Whitespace)
                    {
                        range.end += 1;
                    }
                }
                (_, Some(comma)) if comma.kind() == SyntaxKind::Comma => {
                    range.start = element_index(&comma);
                }
                _ => {}
            }
        } else if LINE_SEPARATED.contains(parent.kind()) {
            if node
                .prev_sibling_or_token()
                .map_or(false, |it| it.kind() == SyntaxKind::Whitespace)
            {
                range.start -= 1;
            }
            if node
                .next_sibling_or_token()
                .map_or(false, |it| it.kind() == SyntaxKind::Semicolon)
            {
                range.end += 1;
            }
        }

        self.invalidate(&node);
        tracing::debug!(kind = ?node.kind(), removed = range.len(), "delete with delimiters");
        parent.splice_children(range, Vec::new());
        Ok(())
    }

    /// Replace the subtree at `old` with a copy of `new`. Returns the
    /// inserted node.
    pub fn replace(
        &mut self,
        old: &impl AstNode,
        new: &impl AstNode,
    ) -> Result<SyntaxNode, SyntaxError> {
        let (parent, old) = self.attached(old.syntax(), "replace")?;
        let inserted = new.syntax().clone_subtree().clone_for_update();
        self.invalidate(&old);
        let index = old.index();
        tracing::debug!(old = ?old.kind(), new = ?inserted.kind(), "replace");
        parent.splice_children(index..index + 1, vec![SyntaxElement::Node(inserted.clone())]);
        Ok(inserted)
    }

    /// Rename a declaration or a name reference. Names that are not plain
    /// identifiers are written with backticks.
    pub fn rename(&mut self, node: &impl AstNode, name: &str) -> Result<(), SyntaxError> {
        let node = node.syntax();
        self.ensure_owned(node)?;
        let unsupported = || SyntaxError::Unsupported {
            operation: "rename",
            kind: node.kind(),
        };
        let old = name_slot(node).ok_or_else(unsupported)?;
        let text = make::identifier_text(name).ok_or_else(|| SyntaxError::InvalidName {
            name: name.to_string(),
        })?;
        let new = make::token(old.kind(), &text);
        let parent = old.parent().ok_or_else(unsupported)?;

        self.invalidate(node);
        tracing::debug!(kind = ?node.kind(), from = old.text(), to = %text, "rename");
        let index = old.index();
        parent.splice_children(index..index + 1, vec![SyntaxElement::Token(new)]);
        Ok(())
    }

    /// Unwrap every parenthesized expression whose parentheses do not change
    /// the parse. Returns the number of pairs removed.
    pub fn remove_useless_parentheses(&mut self) -> usize {
        let mut removed = 0;
        loop {
            let candidate = self
                .root
                .syntax()
                .descendants()
                .filter_map(ParenthesizedExpression::cast)
                .filter(|paren| paren.expression().is_some())
                .find(are_parentheses_useless);
            let Some(paren) = candidate else {
                break;
            };
            let (Some(inner), Some(parent)) = (paren.expression(), paren.syntax().parent()) else {
                break;
            };
            self.invalidate(paren.syntax());
            let index = paren.syntax().index();
            inner.syntax().detach();
            parent.splice_children(
                index..index + 1,
                vec![SyntaxElement::Node(inner.syntax().clone())],
            );
            removed += 1;
        }
        if removed > 0 {
            tracing::debug!(removed, "removed useless parentheses");
        }
        removed
    }

    /// `node` must belong to this editor's tree and have a parent.
    fn attached(
        &self,
        node: &SyntaxNode,
        operation: &'static str,
    ) -> Result<(SyntaxNode, SyntaxNode), SyntaxError> {
        self.ensure_owned(node)?;
        let parent = node.parent().ok_or(SyntaxError::Unsupported {
            operation,
            kind: node.kind(),
        })?;
        Ok((parent, node.clone()))
    }

    fn ensure_owned(&self, node: &SyntaxNode) -> Result<(), SyntaxError> {
        match node.ancestors().last() {
            // Nodes of the source tree compare equal to their copies.
            Some(root) if root.is_mutable() && &root == self.root.syntax() => Ok(()),
            _ => Err(SyntaxError::invalid_tree_state(node)),
        }
    }

    fn invalidate(&self, edited: &SyntaxNode) {
        let mut cache = self.fq_names.borrow_mut();
        if cache.is_empty() {
            return;
        }
        let before = cache.len();
        cache.retain(|node, _| {
            let descendant = node.ancestors().any(|it| &it == edited);
            let ancestor = edited.ancestors().any(|it| &it == node);
            !descendant && !ancestor
        });
        tracing::debug!(dropped = before - cache.len(), "invalidated cached names");
    }
}

/// The token holding the name of a declaration or reference.
fn name_slot(node: &SyntaxNode) -> Option<SyntaxToken> {
    match node.kind() {
        SyntaxKind::NameReferenceExpression => node
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind() == SyntaxKind::Identifier),
        kind if KindSet::NAMED_DECLARATIONS.contains(kind) => support::ident_token(node),
        SyntaxKind::ImportAlias | SyntaxKind::TypeParameter => support::ident_token(node),
        _ => None,
    }
}

/// Tokens to place between a new item and `anchor` inside `parent`.
fn separator(parent: &SyntaxNode, anchor: &SyntaxNode) -> impl Iterator<Item = SyntaxElement> {
    let tokens = if COMMA_SEPARATED.contains(parent.kind()) {
        vec![
            make::token(SyntaxKind::Comma, ","),
            make::token(SyntaxKind::Whitespace, " "),
        ]
    } else if LINE_SEPARATED.contains(parent.kind()) {
        let indent = anchor
            .prev_sibling_or_token()
            .and_then(|it| it.into_token())
            .filter(|tok| tok.kind() == SyntaxKind::Whitespace && tok.text().contains('\n'))
            .map(|tok| tok.text().to_string())
            .unwrap_or_else(|| "\n".to_string());
        vec![make::token(SyntaxKind::Whitespace, &indent)]
    } else {
        Vec::new()
    };
    tokens.into_iter().map(SyntaxElement::Token)
}

#[derive(Clone, Copy)]
enum Step {
    Next,
    Prev,
}

/// The first sibling from `start` on that is not trivia.
fn significant(start: Option<SyntaxElement>, step: Step) -> Option<SyntaxElement> {
    let mut current = start;
    while let Some(element) = current {
        if !element.kind().is_trivia() {
            return Some(element);
        }
        current = match step {
            Step::Next => element.next_sibling_or_token(),
            Step::Prev => element.prev_sibling_or_token(),
        };
    }
    None
}

fn element_index(element: &SyntaxElement) -> usize {
    match element {
        NodeOrToken::Node(node) => node.index(),
        NodeOrToken::Token(token) => token.index(),
    }
}

/// Constructors for detached nodes, built by parsing snippets.
///
/// Every function returns `None` when the snippet does not parse cleanly
/// into the requested construct. Results are standalone roots that can be
/// handed to [`TreeEditor`].
pub mod make {
    use rowan::{GreenNode, GreenToken, NodeOrToken};

    use crate::ast::{
        AstNode, Declaration, Expression, ImportDirective, NameReferenceExpression, Parameter,
        ParenthesizedExpression, TypeReference, ValueArgument,
    };
    use crate::lexer::lex;
    use crate::parser::{
        parse_kotlin, parse_kotlin_expression, parse_kotlin_type, KotlinParseResult, SyntaxNode,
        SyntaxToken,
    };
    use crate::syntax_kind::SyntaxKind;

    pub fn expression(text: &str) -> Option<Expression> {
        first(&parse_kotlin_expression(text))
    }

    pub fn parenthesized(inner: &Expression) -> Option<ParenthesizedExpression> {
        first(&parse_kotlin_expression(&format!("({})", inner.text())))
    }

    pub fn name_reference(name: &str) -> Option<NameReferenceExpression> {
        let text = identifier_text(name)?;
        first(&parse_kotlin_expression(&text))
    }

    pub fn type_reference(text: &str) -> Option<TypeReference> {
        first(&parse_kotlin_type(text))
    }

    /// A top-level or member declaration such as `fun f() = 1`.
    pub fn declaration(text: &str) -> Option<Declaration> {
        first(&parse_kotlin(text))
    }

    /// A parameter such as `x: Int = 0`.
    pub fn parameter(text: &str) -> Option<Parameter> {
        first(&parse_kotlin(&format!("fun f({text}) {{}}")))
    }

    /// A call argument such as `name = value` or `*items`.
    pub fn value_argument(text: &str) -> Option<ValueArgument> {
        first(&parse_kotlin_expression(&format!("f({text})")))
    }

    /// `import path` or `import path as alias`.
    pub fn import_directive(path: &str, alias: Option<&str>) -> Option<ImportDirective> {
        let text = match alias {
            Some(alias) => format!("import {path} as {}", identifier_text(alias)?),
            None => format!("import {path}"),
        };
        first(&parse_kotlin(&text))
    }

    /// `name` as it must be written in source: unchanged when it lexes as a
    /// single identifier, otherwise backticked. `None` for names that cannot
    /// be written at all.
    pub fn identifier_text(name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        if let [token] = lex(name).as_slice() {
            if token.kind == SyntaxKind::Identifier && token.range.len() as usize == name.len() {
                return Some(name.to_string());
            }
        }
        if name.contains(['`', '\n', '\r']) {
            return None;
        }
        Some(format!("`{name}`"))
    }

    /// A detached mutable token, ready to be spliced into an edited tree.
    pub(crate) fn token(kind: SyntaxKind, text: &str) -> SyntaxToken {
        let green = GreenToken::new(kind.into(), text);
        let holder = GreenNode::new(SyntaxKind::Error.into(), [NodeOrToken::Token(green)]);
        let holder = SyntaxNode::new_root(holder).clone_for_update();
        let token = holder
            .first_token()
            .unwrap_or_else(|| unreachable!("holder node was built with one token"));
        token.detach();
        token
    }

    fn first<N: AstNode>(parse: &KotlinParseResult) -> Option<N> {
        if !parse.errors.is_empty() {
            tracing::debug!(errors = parse.errors.len(), "snippet did not parse cleanly");
            return None;
        }
        let node = parse.syntax().descendants().find_map(N::cast)?;
        N::cast(node.syntax().clone_subtree())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{
        BinaryExpression, Class, ImportDirective, NamedFunction, Parameter, Property, ValueArgument,
    };
    use crate::parser::parse_kotlin;

    fn editor(text: &str) -> TreeEditor {
        let parse = parse_kotlin(text);
        assert_eq!(parse.errors, Vec::new());
        let file = KtFile::cast(parse.syntax()).expect("file root");
        TreeEditor::new(&file)
    }

    fn nth<N: AstNode>(editor: &TreeEditor, n: usize) -> N {
        editor
            .file()
            .syntax()
            .descendants()
            .filter_map(N::cast)
            .nth(n)
            .expect("node present")
    }

    #[test]
    fn deleting_an_argument_takes_its_comma() {
        let mut ed = editor("val x = f(a, b, c)");
        let b: ValueArgument = nth(&ed, 1);
        ed.delete_with_delimiters(&b).unwrap();
        assert_eq!(ed.text(), "val x = f(a, c)");

        let c: ValueArgument = nth(&ed, 1);
        ed.delete_with_delimiters(&c).unwrap();
        assert_eq!(ed.text(), "val x = f(a)");

        let a: ValueArgument = nth(&ed, 0);
        ed.delete_with_delimiters(&a).unwrap();
        assert_eq!(ed.text(), "val x = f()");
    }

    #[test]
    fn deleting_a_member_takes_its_line() {
        let mut ed = editor("class A {\n    fun f() {}\n    fun g() {}\n}");
        let f: NamedFunction = nth(&ed, 0);
        ed.delete_with_delimiters(&f).unwrap();
        assert_eq!(ed.text(), "class A {\n    fun g() {}\n}");
    }

    #[test]
    fn insert_before_adds_separators() {
        let mut ed = editor("fun f(b: Int) {}");
        let b: Parameter = nth(&ed, 0);
        let a = make::parameter("a: String").unwrap();
        ed.insert_before(&b, &a).unwrap();
        assert_eq!(ed.text(), "fun f(a: String, b: Int) {}");

        let mut ed = editor("class A {\n    fun g() {}\n}");
        let g: NamedFunction = nth(&ed, 0);
        let f = make::declaration("fun f() {}").unwrap();
        ed.insert_before(&g, &f).unwrap();
        assert_eq!(ed.text(), "class A {\n    fun f() {}\n    fun g() {}\n}");
    }

    #[test]
    fn insert_after_appends_list_item() {
        let mut ed = editor("val x = f(a)");
        let a: ValueArgument = nth(&ed, 0);
        let b = make::value_argument("name = b").unwrap();
        let inserted = ed.insert_after(&a, &b).unwrap();
        assert_eq!(ed.text(), "val x = f(a, name = b)");
        assert_eq!(inserted.parent().map(|p| p.kind()), Some(SyntaxKind::ValueArgumentList));
    }

    #[test]
    fn replace_swaps_subtree_and_keeps_parents_consistent() {
        let mut ed = editor("val x = a + b");
        let sum: BinaryExpression = nth(&ed, 0);
        let right = sum.right().unwrap();
        let product = make::expression("c * d").unwrap();
        let inserted = ed.replace(&right, &product).unwrap();
        assert_eq!(ed.text(), "val x = a + c * d");
        assert_eq!(inserted.parent().as_ref(), Some(sum.syntax()));
        assert_eq!(right.syntax().parent(), None);
        let right = sum.right().unwrap();
        assert_eq!(right.syntax().kind(), SyntaxKind::BinaryExpression);
    }

    #[test]
    fn rename_rewrites_name_slot_and_drops_cached_names() {
        let mut ed = editor("package p\nclass A { fun f() {} }");
        let class: Class = nth(&ed, 0);
        let f: NamedFunction = nth(&ed, 0);
        assert_eq!(ed.fq_name(&f), Some(FqName::from("p.A.f")));
        assert_eq!(ed.fq_names.borrow().len(), 1);

        ed.rename(&class, "B").unwrap();
        assert!(ed.fq_names.borrow().is_empty());
        assert_eq!(ed.fq_name(&f), Some(FqName::from("p.B.f")));
        assert_eq!(ed.text(), "package p\nclass B { fun f() {} }");

        ed.rename(&f, "fun").unwrap();
        assert_eq!(ed.text(), "package p\nclass B { fun `fun`() {} }");
    }

    #[test]
    fn edits_elsewhere_keep_cached_names() {
        let mut ed = editor("class A { fun f() {} }\nclass B { fun g() {} }");
        let f: NamedFunction = nth(&ed, 0);
        let g: NamedFunction = nth(&ed, 1);
        ed.fq_name(&f);
        ed.fq_name(&g);
        ed.rename(&g, "h").unwrap();
        let cache = ed.fq_names.borrow();
        assert!(cache.contains_key(f.syntax()));
        assert!(!cache.contains_key(g.syntax()));
    }

    #[test]
    fn rename_without_name_slot_is_unsupported() {
        let mut ed = editor("val x = a + b");
        let sum: BinaryExpression = nth(&ed, 0);
        let err = ed.rename(&sum, "c").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::Unsupported {
                operation: "rename",
                kind: SyntaxKind::BinaryExpression
            }
        );
    }

    #[test]
    fn foreign_nodes_are_rejected() {
        let mut ed = editor("val x = f(a)");
        let other = parse_kotlin("val y = g(b)");
        let arg = other
            .syntax()
            .descendants()
            .find_map(ValueArgument::cast)
            .unwrap();
        let err = ed.delete_with_delimiters(&arg).unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidTreeState { .. }));
    }

    #[test]
    fn useless_parentheses_are_removed() {
        let mut ed = editor("val x = (a) + (b * c)\nval y = -(-z)\nval w = (a + b) * c");
        assert_eq!(ed.remove_useless_parentheses(), 2);
        assert_eq!(ed.text(), "val x = a + b * c\nval y = -(-z)\nval w = (a + b) * c");
    }

    #[test]
    fn find_maps_original_nodes_into_the_copy() {
        let parse = parse_kotlin("import a.b.C as D\nclass X");
        let file = KtFile::cast(parse.syntax()).unwrap();
        let import = parse
            .syntax()
            .descendants()
            .find_map(ImportDirective::cast)
            .unwrap();
        let ed = TreeEditor::new(&file);
        let copy = ed.find(&import).unwrap();
        assert!(copy.syntax().is_mutable());
        assert!(!import.syntax().is_mutable());
        assert_eq!(copy.text(), import.text());
    }

    #[test]
    fn nodes_of_the_source_tree_are_rejected() {
        let parse = parse_kotlin("val x = f(a, b)");
        let file = KtFile::cast(parse.syntax()).unwrap();
        let arg = parse
            .syntax()
            .descendants()
            .find_map(ValueArgument::cast)
            .unwrap();
        let mut ed = TreeEditor::new(&file);

        let err = ed.delete_with_delimiters(&arg).unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidTreeState { .. }));
        let anchor = parse.syntax().descendants().find_map(Property::cast).unwrap();
        let err = ed.replace(&anchor, &anchor).unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidTreeState { .. }));
        assert_eq!(ed.text(), "val x = f(a, b)");

        let copy = ed.find(&arg).unwrap();
        ed.delete_with_delimiters(&copy).unwrap();
        assert_eq!(ed.text(), "val x = f(b)");
    }

    #[test]
    fn empty_parentheses_do_not_stop_the_cleanup() {
        let parse = parse_kotlin("val e = ()\nval x = (a) + b");
        assert!(!parse.errors.is_empty());
        let mut ed = TreeEditor::new(&KtFile::cast(parse.syntax()).unwrap());
        assert_eq!(ed.remove_useless_parentheses(), 1);
        assert_eq!(ed.text(), "val e = ()\nval x = a + b");
    }

    #[test]
    fn finish_snapshots_without_sharing() {
        let mut ed = editor("val x = f(a, b)");
        let a: ValueArgument = nth(&ed, 0);
        ed.delete_with_delimiters(&a).unwrap();
        let file = ed.finish();
        assert_eq!(file.text(), "val x = f(b)");
        assert_eq!(parse_kotlin(&file.text()).errors, Vec::new());
    }

    #[test]
    fn identifier_text_quotes_keywords() {
        assert_eq!(make::identifier_text("foo").as_deref(), Some("foo"));
        assert_eq!(make::identifier_text("class").as_deref(), Some("`class`"));
        assert_eq!(make::identifier_text("two words").as_deref(), Some("`two words`"));
        assert_eq!(make::identifier_text("a`b"), None);
        assert_eq!(make::identifier_text(""), None);
        assert!(make::import_directive("foo.bar.Baz", Some("Qux")).is_some());
    }
}
