use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::{is_script_block, support, AstNode, KtFile, ObjectDeclaration, Parameter};
use crate::parser::SyntaxNode;
use crate::syntax_kind::{KindSet, SyntaxKind};

/// A dot-separated qualified name. The root (empty) name is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FqName {
    segments: Vec<String>,
}

impl FqName {
    pub fn root() -> FqName {
        FqName::default()
    }

    pub fn from_segments<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> FqName {
        FqName {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn child(&self, name: impl Into<String>) -> FqName {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        FqName { segments }
    }

    /// `None` for the root.
    pub fn parent(&self) -> Option<FqName> {
        let (_, init) = self.segments.split_last()?;
        Some(FqName {
            segments: init.to_vec(),
        })
    }

    pub fn short_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn starts_with(&self, prefix: &FqName) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for FqName {
    fn from(text: &str) -> Self {
        if text.is_empty() {
            return FqName::root();
        }
        FqName::from_segments(text.split('.'))
    }
}

/// Name of an unnamed companion object.
pub const DEFAULT_COMPANION_NAME: &str = "Companion";

/// The fully qualified name of a named declaration.
///
/// Members of a class are qualified by the class; the class body itself
/// contributes no segment. Top-level declarations are qualified by the
/// file's package, if it has one. Classes and objects declared in a
/// function body are qualified by the function, and `val`/`var`
/// constructor parameters by their class. Anything else that is local,
/// and everything inside an object literal, has no qualified name.
pub fn fq_name(decl: &impl AstNode) -> Option<FqName> {
    fq_name_of(decl.syntax())
}

fn fq_name_of(node: &SyntaxNode) -> Option<FqName> {
    if !KindSet::NAMED_DECLARATIONS.contains(node.kind()) {
        return None;
    }
    let name = declared_name(node)?;
    let mut parent = node.parent()?;
    if parent.kind() == SyntaxKind::ClassBody {
        parent = parent.parent()?;
    }
    let container = match parent.kind() {
        SyntaxKind::KtFile => KtFile::cast(parent)?.package_fq_name(),
        SyntaxKind::Block if is_script_block(&parent) => {
            support::owner_file(&parent).ok()?.package_fq_name()
        }
        SyntaxKind::Class | SyntaxKind::EnumEntry | SyntaxKind::ObjectDeclaration => {
            fq_name_of(&parent)?
        }
        SyntaxKind::Block if KindSet::CLASS_OR_OBJECT.contains(node.kind()) => {
            let function = parent.parent().filter(|it| it.kind() == SyntaxKind::Fun)?;
            fq_name_of(&function)?
        }
        SyntaxKind::ValueParameterList => {
            let class = property_parameter_class(node)?;
            fq_name_of(&class)?
        }
        _ => return None,
    };
    Some(container.child(name))
}

/// The class whose primary constructor declares `param` with `val`/`var`.
fn property_parameter_class(param: &SyntaxNode) -> Option<SyntaxNode> {
    let param = Parameter::cast(param.clone())?;
    if !param.has_val_or_var() {
        return None;
    }
    let constructor = param.syntax().parent()?.parent()?;
    if constructor.kind() != SyntaxKind::PrimaryConstructor {
        return None;
    }
    constructor.parent()
}

fn declared_name(node: &SyntaxNode) -> Option<String> {
    match support::ident_token(node) {
        Some(token) => Some(support::unquote(token.text()).to_string()),
        None => ObjectDeclaration::cast(node.clone())
            .filter(|object| object.is_companion())
            .map(|_| DEFAULT_COMPANION_NAME.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{Class, NamedFunction, Property};
    use crate::parser::parse_kotlin;

    fn find<N: AstNode>(root: &SyntaxNode, name: &str) -> N {
        root.descendants()
            .filter_map(N::cast)
            .find(|node| {
                support::ident_token(node.syntax()).map_or(false, |tok| tok.text() == name)
            })
            .unwrap_or_else(|| panic!("no declaration named {name}"))
    }

    #[test]
    fn class_body_contributes_no_segment() {
        let parse = parse_kotlin("package a.b\nclass Outer { class Inner { fun f() {} } }");
        let root = parse.syntax();
        let f: NamedFunction = find(&root, "f");
        assert_eq!(fq_name(&f).map(|n| n.to_string()).as_deref(), Some("a.b.Outer.Inner.f"));
    }

    #[test]
    fn root_package_is_not_prepended() {
        let parse = parse_kotlin("class Top { val x = 1 }");
        let root = parse.syntax();
        let x: Property = find(&root, "x");
        assert_eq!(fq_name(&x), Some(FqName::from("Top.x")));
        let top: Class = find(&root, "Top");
        assert_eq!(fq_name(&top).map(|n| n.to_string()).as_deref(), Some("Top"));
    }

    #[test]
    fn local_functions_have_no_fq_name() {
        let parse = parse_kotlin("fun outer() { fun inner() {} }");
        let root = parse.syntax();
        let inner: NamedFunction = find(&root, "inner");
        assert_eq!(fq_name(&inner), None);
    }

    #[test]
    fn local_classes_are_qualified_by_their_function() {
        let parse = parse_kotlin("package p\nfun outer() { class Local { fun m() {} } }");
        let root = parse.syntax();
        let m: NamedFunction = find(&root, "m");
        assert_eq!(fq_name(&m), Some(FqName::from("p.outer.Local.m")));
    }

    #[test]
    fn property_parameters_belong_to_their_class() {
        let parse = parse_kotlin("class Point(val x: Int, y: Int)");
        let root = parse.syntax();
        let x: Parameter = find(&root, "x");
        let y: Parameter = find(&root, "y");
        assert_eq!(fq_name(&x), Some(FqName::from("Point.x")));
        assert_eq!(fq_name(&y), None);
    }

    #[test]
    fn object_literal_members_have_no_fq_name() {
        let parse = parse_kotlin("val o = object { fun f() {} }");
        let root = parse.syntax();
        let f: NamedFunction = find(&root, "f");
        assert_eq!(fq_name(&f), None);
    }

    #[test]
    fn unnamed_companion_uses_default_name() {
        let parse = parse_kotlin("package p\nclass C { companion object { fun make() = C() } }");
        let root = parse.syntax();
        let make: NamedFunction = find(&root, "make");
        assert_eq!(fq_name(&make), Some(FqName::from("p.C.Companion.make")));
    }

    #[test]
    fn fq_name_navigation() {
        let name = FqName::from("a.b.c");
        assert_eq!(name.short_name(), Some("c"));
        assert_eq!(name.parent(), Some(FqName::from("a.b")));
        assert!(name.starts_with(&FqName::from("a")));
        assert!(FqName::from("").is_root());
        assert_eq!(FqName::root().parent(), None);
    }
}
