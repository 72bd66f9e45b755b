//! Nodes that answer from stubs when they can.
//!
//! [`StubBased`] holds an optional stub plus a lazily filled cell for the
//! typed syntax node. Accessors for attributes the stub carries read the
//! stub and never parse. Everything else goes through [`StubBased::syntax`],
//! which materializes the owning [`LazyFile`] once and then hands out the
//! same node on every call.
//!
//! A node built with [`StubBased::from_node`] has no stub and answers every
//! query from the tree.

use std::fmt;

use once_cell::unsync::OnceCell;

use kt_syntax::ast::support;
use kt_syntax::{
    AnnotationEntry, AstNode, CallableDeclaration, Class, EnumEntry, Expression, ImportDirective,
    KindSet, ModifierList, NamedDeclarationOwner, NamedFunction, ObjectDeclaration, Parameter,
    Property, PropertyAccessor, SecondaryConstructor, SuperTypeListEntry, SyntaxKind, SyntaxNode,
    TypeAlias, TypeParameter, TypeParameterListOwner, TypeReference,
};

use crate::builder::{modifier_flags, stub_data};
use crate::error::{Result, StubError};
use crate::lazy::LazyFile;
use crate::stub::{ModifierFlags, StubData, StubId, StubNode, Variance};

static EMPTY: StubData = StubData::Empty;

/// A stub inside a [`LazyFile`].
#[derive(Clone, Copy)]
pub struct StubRef<'f> {
    file: &'f LazyFile,
    id: StubId,
}

impl fmt::Debug for StubRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubRef")
            .field("id", &self.id.index())
            .field("kind", &self.kind())
            .finish()
    }
}

impl PartialEq for StubRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.file, other.file) && self.id == other.id
    }
}

impl Eq for StubRef<'_> {}

impl<'f> StubRef<'f> {
    pub(crate) fn new(file: &'f LazyFile, id: StubId) -> StubRef<'f> {
        StubRef { file, id }
    }

    pub fn id(self) -> StubId {
        self.id
    }

    pub fn file(self) -> &'f LazyFile {
        self.file
    }

    fn stub(self) -> Option<&'f StubNode> {
        self.file.stubs().get(self.id)
    }

    pub fn kind(self) -> SyntaxKind {
        self.stub().map_or(SyntaxKind::Error, StubNode::kind)
    }

    pub fn data(self) -> &'f StubData {
        self.stub().map_or(&EMPTY, StubNode::data)
    }

    pub fn parent(self) -> Option<StubRef<'f>> {
        let parent = self.stub()?.parent()?;
        Some(StubRef::new(self.file, parent))
    }

    /// Child stubs in source order.
    pub fn children(self) -> impl Iterator<Item = StubRef<'f>> {
        let file = self.file;
        self.stub()
            .map(StubNode::children)
            .unwrap_or_default()
            .iter()
            .map(move |id| StubRef::new(file, *id))
    }

    /// Child stubs whose kind is in `kinds`. Every call walks the children
    /// afresh.
    pub fn children_of_kind(self, kinds: impl Into<KindSet>) -> impl Iterator<Item = StubRef<'f>> {
        let kinds = kinds.into();
        self.children().filter(move |child| kinds.contains(child.kind()))
    }

    pub fn child_of_kind(self, kind: SyntaxKind) -> Option<StubRef<'f>> {
        self.children_of_kind(kind).next()
    }

    /// Stubbed declarations of a file, script, class body, class or object,
    /// in source order.
    pub fn declarations(self) -> Vec<StubRef<'f>> {
        match self.kind() {
            SyntaxKind::KtFile => match self.child_of_kind(SyntaxKind::Script) {
                Some(script) => script.declarations(),
                None => self.children_of_kind(KindSet::DECLARATIONS).collect(),
            },
            SyntaxKind::Script | SyntaxKind::ClassBody => {
                self.children_of_kind(KindSet::DECLARATIONS).collect()
            }
            SyntaxKind::Class | SyntaxKind::EnumEntry | SyntaxKind::ObjectDeclaration => self
                .child_of_kind(SyntaxKind::ClassBody)
                .map(StubRef::declarations)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Modifiers from the stub's modifier list, if it has one.
    pub fn modifier_flags(self) -> ModifierFlags {
        match self.child_of_kind(SyntaxKind::ModifierList).map(StubRef::data) {
            Some(StubData::ModifierList(list)) => list.flags(),
            _ => ModifierFlags::empty(),
        }
    }

    /// The materialized node for this stub.
    pub fn node(self) -> Result<&'f SyntaxNode> {
        self.file.node(self.id)
    }

    /// A typed stub-backed view, if the stub's kind fits `N`.
    pub fn downcast<N: AstNode>(self) -> Option<StubBased<'f, N>> {
        N::can_cast(self.kind()).then(|| StubBased::from_stub(self))
    }
}

/// A typed node backed by a stub, a syntax node, or both.
#[derive(Clone)]
pub struct StubBased<'f, N> {
    stub: Option<StubRef<'f>>,
    node: OnceCell<N>,
}

impl<N: fmt::Debug> fmt::Debug for StubBased<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubBased")
            .field("stub", &self.stub)
            .field("node", &self.node.get())
            .finish()
    }
}

impl<'f, N: AstNode> StubBased<'f, N> {
    /// A node from a fully parsed tree. It has no stub.
    pub fn from_node(node: N) -> Self {
        StubBased {
            stub: None,
            node: OnceCell::with_value(node),
        }
    }

    fn from_stub(stub: StubRef<'f>) -> Self {
        StubBased {
            stub: Some(stub),
            node: OnceCell::new(),
        }
    }

    pub fn stub(&self) -> Option<StubRef<'f>> {
        self.stub
    }

    pub fn is_materialized(&self) -> bool {
        self.node.get().is_some()
    }

    /// The syntax node, materializing the file on first use. Every call
    /// returns the same node.
    pub fn syntax(&self) -> Result<&N> {
        self.node.get_or_try_init(|| {
            let stub = self.stub.ok_or(StubError::SourceUnavailable)?;
            let node = stub.node()?;
            N::cast(node.clone()).ok_or_else(|| {
                StubError::mismatch(
                    stub.id(),
                    stub.kind(),
                    format!("materialized as {:?}", node.kind()),
                )
            })
        })
    }

    fn stub_data(&self) -> Option<&'f StubData> {
        self.stub.map(StubRef::data)
    }

    /// Runs `f` on the syntax node. If the node cannot be materialized the
    /// error is logged and the default value is returned.
    fn with_node<T: Default>(&self, what: &'static str, f: impl FnOnce(&N) -> T) -> T {
        match self.syntax() {
            Ok(node) => f(node),
            Err(err) => {
                tracing::error!(target = "kt.stubs", %err, what, "cannot materialize node");
                T::default()
            }
        }
    }

    /// An attribute the stub carries. `from_stub` returning `None` means the
    /// stub payload does not have the expected shape; the tree answers
    /// instead.
    fn carried<T: Default>(
        &self,
        what: &'static str,
        from_stub: impl FnOnce(&'f StubData) -> Option<T>,
        from_node: impl FnOnce(&N) -> T,
    ) -> T {
        if let Some(data) = self.stub_data() {
            if let Some(value) = from_stub(data) {
                return value;
            }
            tracing::warn!(
                target = "kt.stubs",
                what,
                kind = ?self.stub.map(StubRef::kind),
                "stub does not carry attribute"
            );
        }
        self.with_node(what, from_node)
    }

    /// Typed children reached through the stubs `path`, or through the tree
    /// when there is no stub.
    fn stubbed_children<M: AstNode>(
        &self,
        path: &[SyntaxKind],
        from_node: impl FnOnce(&N) -> Vec<M>,
    ) -> Vec<StubBased<'f, M>> {
        match self.stub {
            Some(stub) => {
                let mut level = vec![stub];
                for kind in path {
                    level = level
                        .into_iter()
                        .flat_map(|parent| parent.children_of_kind(*kind))
                        .collect();
                }
                level.into_iter().filter_map(StubRef::downcast).collect()
            }
            None => self
                .with_node("children", from_node)
                .into_iter()
                .map(StubBased::from_node)
                .collect(),
        }
    }

    pub fn modifier_flags(&self) -> ModifierFlags {
        match self.stub {
            Some(stub) => stub.modifier_flags(),
            None => self.with_node("modifier_flags", |node| {
                support::child::<ModifierList>(node.syntax())
                    .map(|list| modifier_flags(&list))
                    .unwrap_or_else(ModifierFlags::empty)
            }),
        }
    }

    pub fn has_modifier(&self, kind: SyntaxKind) -> bool {
        ModifierFlags::from_kind(kind).map_or(false, |flag| self.modifier_flags().contains(flag))
    }

    /// Re-derives the stub from the syntax tree and compares. Nodes without
    /// a stub always verify.
    pub fn verify(&self) -> Result<()> {
        let Some(stub) = self.stub else {
            return Ok(());
        };
        let node = self.syntax()?;
        let actual = stub_data(node.syntax());
        if &actual != stub.data() {
            return Err(StubError::mismatch(
                stub.id(),
                stub.kind(),
                format!("stored {:?}, source gives {actual:?}", stub.data()),
            ));
        }
        Ok(())
    }
}

fn fq_string(node: &impl AstNode) -> Option<String> {
    kt_syntax::fq_name(node).map(|name| name.to_string())
}

fn super_names(entries: Vec<SuperTypeListEntry>) -> Vec<String> {
    entries
        .iter()
        .filter_map(SuperTypeListEntry::referenced_name)
        .collect()
}

macro_rules! stub_accessors {
    ($node:ty, $variant:ident { $($(#[$meta:meta])* fn $name:ident() -> $ty:ty = |$stub:ident| $from_stub:expr, |$n:ident| $from_node:expr;)* }) => {
        impl<'f> StubBased<'f, $node> {
            $(
                $(#[$meta])*
                pub fn $name(&self) -> $ty {
                    self.carried(
                        stringify!($name),
                        |data| match data {
                            StubData::$variant($stub) => Some($from_stub),
                            _ => None,
                        },
                        |$n| $from_node,
                    )
                }
            )*
        }
    };
}

stub_accessors!(Class, Class {
    fn name() -> Option<String> = |s| s.name.clone(), |n| n.name();
    fn fq_name() -> Option<String> = |s| s.fq_name.clone(), |n| fq_string(n);
    fn is_interface() -> bool = |s| s.is_interface, |n| n.is_interface();
    fn is_local() -> bool = |s| s.is_local, |n| n.is_local();
    fn has_explicit_primary_constructor() -> bool =
        |s| s.has_explicit_primary_constructor, |n| n.has_explicit_primary_constructor();
    /// True with an explicit parameter list, or with no secondary
    /// constructors at all. Interfaces qualify too.
    fn has_primary_constructor() -> bool =
        |s| s.has_primary_constructor(), |n| n.has_primary_constructor();
    fn secondary_constructor_count() -> u32 =
        |s| s.secondary_constructor_count, |n| n.secondary_constructors().len() as u32;
    /// Short names of the super types, in declaration order.
    fn super_type_names() -> Vec<String> =
        |s| s.super_names.clone(), |n| super_names(n.super_type_list_entries());
});

impl<'f> StubBased<'f, Class> {
    pub fn is_enum(&self) -> bool {
        self.has_modifier(SyntaxKind::EnumKw)
    }

    pub fn is_data(&self) -> bool {
        self.has_modifier(SyntaxKind::DataKw)
    }

    pub fn is_sealed(&self) -> bool {
        self.has_modifier(SyntaxKind::SealedKw)
    }

    pub fn is_abstract(&self) -> bool {
        self.has_modifier(SyntaxKind::AbstractKw)
    }

    pub fn secondary_constructors(&self) -> Vec<StubBased<'f, SecondaryConstructor>> {
        self.stubbed_children(
            &[SyntaxKind::ClassBody, SyntaxKind::SecondaryConstructor],
            |n| n.secondary_constructors(),
        )
    }

    pub fn enum_entries(&self) -> Vec<StubBased<'f, EnumEntry>> {
        self.stubbed_children(&[SyntaxKind::ClassBody, SyntaxKind::EnumEntry], |n| {
            n.enum_entries()
        })
    }

    pub fn type_parameters(&self) -> Vec<StubBased<'f, TypeParameter>> {
        self.stubbed_children(
            &[SyntaxKind::TypeParameterList, SyntaxKind::TypeParameter],
            |n| n.type_parameters(),
        )
    }

    pub fn primary_constructor_parameters(&self) -> Vec<StubBased<'f, Parameter>> {
        self.stubbed_children(
            &[
                SyntaxKind::PrimaryConstructor,
                SyntaxKind::ValueParameterList,
                SyntaxKind::ValueParameter,
            ],
            |n| n.primary_constructor_parameters(),
        )
    }
}

stub_accessors!(EnumEntry, EnumEntry {
    fn name() -> Option<String> = |s| s.name.clone(), |n| n.name();
    fn fq_name() -> Option<String> = |s| s.fq_name.clone(), |n| fq_string(n);
    fn has_initializer() -> bool = |s| s.has_initializer, |n| n.has_initializer();
});

stub_accessors!(ObjectDeclaration, Object {
    fn name() -> Option<String> = |s| s.name.clone(), |n| n.name();
    fn fq_name() -> Option<String> = |s| s.fq_name.clone(), |n| fq_string(n);
    fn is_companion() -> bool = |s| s.is_companion, |n| n.is_companion();
    fn is_local() -> bool = |s| s.is_local, |n| n.is_local();
    fn super_type_names() -> Vec<String> =
        |s| s.super_names.clone(), |n| super_names(n.super_type_list_entries());
});

stub_accessors!(NamedFunction, Function {
    fn name() -> Option<String> = |s| s.name.clone(), |n| n.name();
    fn fq_name() -> Option<String> = |s| s.fq_name.clone(), |n| fq_string(n);
    fn is_top_level() -> bool = |s| s.is_top_level, |n| n.is_top_level();
    fn is_extension() -> bool = |s| s.is_extension, |n| n.receiver_type_reference().is_some();
    fn has_body() -> bool = |s| s.has_body, |n| n.has_body();
    fn has_block_body() -> bool = |s| s.has_block_body, |n| n.has_block_body();
    fn has_declared_return_type() -> bool =
        |s| s.has_declared_return_type, |n| n.has_declared_return_type();
    fn has_type_parameters() -> bool =
        |s| s.has_type_parameters, |n| n.type_parameter_list().is_some();
    fn value_parameter_count() -> u32 =
        |s| s.value_parameter_count, |n| n.value_parameters().len() as u32;
});

impl<'f> StubBased<'f, NamedFunction> {
    pub fn value_parameters(&self) -> Vec<StubBased<'f, Parameter>> {
        self.stubbed_children(
            &[SyntaxKind::ValueParameterList, SyntaxKind::ValueParameter],
            |n| n.value_parameters(),
        )
    }

    pub fn type_parameters(&self) -> Vec<StubBased<'f, TypeParameter>> {
        self.stubbed_children(
            &[SyntaxKind::TypeParameterList, SyntaxKind::TypeParameter],
            |n| n.type_parameters(),
        )
    }

    /// The declared return type. Without one, no parse happens.
    pub fn type_reference(&self) -> Result<Option<TypeReference>> {
        let expected = match self.stub_data() {
            Some(StubData::Function(stub)) => {
                if !stub.has_declared_return_type {
                    return Ok(None);
                }
                Some(usize::from(stub.is_extension) + 1)
            }
            _ => None,
        };
        let node = self.syntax()?;
        Ok(checked_type_reference(self.stub, node, expected))
    }

    pub fn receiver_type_reference(&self) -> Result<Option<TypeReference>> {
        if let Some(StubData::Function(stub)) = self.stub_data() {
            if !stub.is_extension {
                return Ok(None);
            }
        }
        Ok(self.syntax()?.receiver_type_reference())
    }

    pub fn body_expression(&self) -> Result<Option<Expression>> {
        if let Some(StubData::Function(stub)) = self.stub_data() {
            if !stub.has_body {
                return Ok(None);
            }
        }
        Ok(self.syntax()?.body_expression())
    }
}

stub_accessors!(Property, Property {
    fn name() -> Option<String> = |s| s.name.clone(), |n| n.name();
    fn fq_name() -> Option<String> = |s| s.fq_name.clone(), |n| fq_string(n);
    fn is_var() -> bool = |s| s.is_var, |n| n.is_var();
    fn is_top_level() -> bool = |s| s.is_top_level, |n| n.is_top_level();
    fn is_extension() -> bool = |s| s.is_extension, |n| n.receiver_type_reference().is_some();
    fn has_declared_type() -> bool = |s| s.has_declared_type, |n| n.has_declared_return_type();
    fn has_initializer() -> bool = |s| s.has_initializer, |n| n.has_initializer();
    fn has_delegate() -> bool = |s| s.has_delegate, |n| n.has_delegate();
});

impl<'f> StubBased<'f, Property> {
    pub fn is_const(&self) -> bool {
        self.has_modifier(SyntaxKind::ConstKw)
    }

    pub fn is_lateinit(&self) -> bool {
        self.has_modifier(SyntaxKind::LateinitKw)
    }

    pub fn accessors(&self) -> Vec<StubBased<'f, PropertyAccessor>> {
        self.stubbed_children(&[SyntaxKind::PropertyAccessor], |n| n.accessors().collect())
    }

    pub fn getter(&self) -> Option<StubBased<'f, PropertyAccessor>> {
        self.accessors().into_iter().find(|accessor| accessor.is_getter())
    }

    pub fn setter(&self) -> Option<StubBased<'f, PropertyAccessor>> {
        self.accessors().into_iter().find(|accessor| accessor.is_setter())
    }

    /// The declared type. The receiver of an extension property is also a
    /// type reference child, so the stub tells how many to expect.
    pub fn type_reference(&self) -> Result<Option<TypeReference>> {
        let expected = match self.stub_data() {
            Some(StubData::Property(stub)) => {
                if !stub.has_declared_type {
                    return Ok(None);
                }
                Some(usize::from(stub.is_extension) + 1)
            }
            _ => None,
        };
        let node = self.syntax()?;
        Ok(checked_type_reference(self.stub, node, expected))
    }

    pub fn initializer(&self) -> Result<Option<Expression>> {
        if let Some(StubData::Property(stub)) = self.stub_data() {
            if !stub.has_initializer {
                return Ok(None);
            }
        }
        Ok(self.syntax()?.initializer())
    }

    pub fn delegate_expression(&self) -> Result<Option<Expression>> {
        if let Some(StubData::Property(stub)) = self.stub_data() {
            if !stub.has_delegate {
                return Ok(None);
            }
        }
        Ok(self.syntax()?.delegate_expression())
    }
}

/// The declared type of a callable, after checking that the tree has as
/// many type reference children as the stub implies. A disagreement is
/// logged and the tree's answer is used.
fn checked_type_reference<N: CallableDeclaration>(
    stub: Option<StubRef<'_>>,
    node: &N,
    expected: Option<usize>,
) -> Option<TypeReference> {
    if let (Some(stub), Some(expected)) = (stub, expected) {
        let found = support::children::<TypeReference>(node.syntax()).count();
        if found != expected {
            tracing::error!(
                target = "kt.stubs",
                stub = stub.id().index(),
                kind = ?stub.kind(),
                expected,
                found,
                "stub implies a different number of type references"
            );
        }
    }
    node.type_reference()
}

stub_accessors!(PropertyAccessor, Accessor {
    fn is_getter() -> bool = |s| s.is_getter, |n| n.is_getter();
    fn is_setter() -> bool = |s| !s.is_getter, |n| n.is_setter();
    fn has_body() -> bool = |s| s.has_body, |n| n.has_body();
    fn has_block_body() -> bool = |s| s.has_block_body, |n| n.has_block_body();
});

stub_accessors!(TypeAlias, TypeAlias {
    fn name() -> Option<String> = |s| s.name.clone(), |n| n.name();
    fn fq_name() -> Option<String> = |s| s.fq_name.clone(), |n| fq_string(n);
    fn is_top_level() -> bool = |s| s.is_top_level, |n| n.is_top_level();
});

stub_accessors!(SecondaryConstructor, Constructor {
    fn has_body() -> bool = |s| s.has_body, |n| n.has_body();
    fn has_implicit_delegation_call() -> bool =
        |s| s.has_implicit_delegation_call, |n| n.has_implicit_delegation_call();
    fn is_delegated_call_to_this() -> bool =
        |s| s.is_delegated_call_to_this, |n| n.is_delegated_call_to_this();
});

stub_accessors!(Parameter, Parameter {
    fn name() -> Option<String> = |s| s.name.clone(), |n| n.name();
    fn fq_name() -> Option<String> = |s| s.fq_name.clone(), |n| fq_string(n);
    fn has_default_value() -> bool = |s| s.has_default_value, |n| n.has_default_value();
    fn has_val_or_var() -> bool = |s| s.has_val_or_var, |n| n.has_val_or_var();
    fn is_mutable() -> bool = |s| s.is_mutable, |n| n.is_mutable();
    fn is_vararg() -> bool = |s| s.is_vararg, |n| n.is_vararg();
    fn has_type() -> bool = |s| s.has_type, |n| n.type_reference().is_some();
});

impl<'f> StubBased<'f, Parameter> {
    pub fn default_value(&self) -> Result<Option<Expression>> {
        if let Some(StubData::Parameter(stub)) = self.stub_data() {
            if !stub.has_default_value {
                return Ok(None);
            }
        }
        Ok(self.syntax()?.default_value())
    }

    pub fn type_reference(&self) -> Result<Option<TypeReference>> {
        if let Some(StubData::Parameter(stub)) = self.stub_data() {
            if !stub.has_type {
                return Ok(None);
            }
        }
        Ok(self.syntax()?.type_reference())
    }
}

stub_accessors!(TypeParameter, TypeParameter {
    fn name() -> Option<String> = |s| s.name.clone(), |n| n.name();
    fn variance() -> Variance = |s| s.variance, |n| match n.variance() {
        Some(SyntaxKind::InKw) => Variance::In,
        Some(SyntaxKind::OutKw) => Variance::Out,
        _ => Variance::Invariant,
    };
    fn is_reified() -> bool = |s| s.is_reified, |n| n.is_reified();
    fn has_bound() -> bool = |s| s.has_bound, |n| n.extends_bound().is_some();
});

stub_accessors!(ImportDirective, Import {
    fn imported_fq_name() -> Option<String> =
        |s| s.imported_fq_name.clone(), |n| n.imported_fq_name().map(|name| name.to_string());
    fn is_all_under() -> bool = |s| s.is_all_under, |n| n.is_all_under();
    fn alias_name() -> Option<String> = |s| s.alias_name.clone(), |n| n.alias_name();
});

stub_accessors!(AnnotationEntry, Annotation {
    fn short_name() -> Option<String> = |s| s.short_name.clone(), |n| n.short_name();
    fn use_site_target() -> Option<String> =
        |s| s.use_site_target.clone(), |n| n.use_site_target().and_then(|t| t.target_name());
    fn has_value_arguments() -> bool =
        |s| s.has_value_arguments, |n| n.value_argument_list().is_some();
});

impl<'f> StubBased<'f, ModifierList> {
    /// Flags of this list itself.
    pub fn flags(&self) -> ModifierFlags {
        self.carried(
            "flags",
            |data| match data {
                StubData::ModifierList(stub) => Some(stub.flags()),
                _ => None,
            },
            modifier_flags,
        )
    }

    pub fn contains(&self, kind: SyntaxKind) -> bool {
        ModifierFlags::from_kind(kind).map_or(false, |flag| self.flags().contains(flag))
    }

    pub fn annotation_entries(&self) -> Vec<StubBased<'f, AnnotationEntry>> {
        self.stubbed_children(&[SyntaxKind::AnnotationEntry], |n| {
            n.annotation_entries().collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use kt_syntax::FileKind;

    use super::*;

    const SOURCE: &str = r#"
package sample

import kotlin.collections.List as KList

@Target(AnnotationTarget.CLASS)
annotation class Marker

interface Shape

enum class Color(val rgb: Int) { RED(0xff0000), GREEN(0x00ff00) }

class Box<out T : Any>(val value: T, vararg val extra: Int) : Shape {
    constructor(value: T) : this(value, 1)

    var size: Int = 0
        private set

    val String.shout: String get() = uppercase()

    companion object Factory
}
"#;

    fn stubbed() -> LazyFile {
        let stubs = LazyFile::parsed(SOURCE, FileKind::Source)
            .unwrap()
            .stubs()
            .clone();
        LazyFile::new(stubs, SOURCE.to_string())
    }

    fn class<'f>(file: &'f LazyFile, name: &str) -> StubBased<'f, Class> {
        file.declarations()
            .into_iter()
            .find(|decl| decl.data().name() == Some(name))
            .and_then(StubRef::downcast::<Class>)
            .unwrap()
    }

    #[test]
    fn class_attributes_come_from_stubs() {
        let file = stubbed();
        let shape = class(&file, "Shape");
        assert!(shape.is_interface());
        // Interfaces count as having a primary constructor.
        assert!(shape.has_primary_constructor());

        let color = class(&file, "Color");
        assert!(color.is_enum());
        let entries: Vec<Option<String>> =
            color.enum_entries().iter().map(|entry| entry.name()).collect();
        assert_eq!(entries, vec![Some("RED".into()), Some("GREEN".into())]);
        assert!(color.enum_entries().iter().all(|entry| entry.has_initializer()));

        let b = class(&file, "Box");
        assert_eq!(b.fq_name().as_deref(), Some("sample.Box"));
        assert!(b.has_explicit_primary_constructor());
        assert_eq!(b.secondary_constructor_count(), 1);
        assert_eq!(b.super_type_names(), vec!["Shape".to_string()]);
        let params: Vec<(Option<String>, bool, bool)> = b
            .primary_constructor_parameters()
            .iter()
            .map(|p| (p.name(), p.has_val_or_var(), p.is_vararg()))
            .collect();
        assert_eq!(
            params,
            vec![(Some("value".into()), true, false), (Some("extra".into()), true, true)]
        );
        let type_params = b.type_parameters();
        assert_eq!(type_params.len(), 1);
        assert_eq!(type_params[0].variance(), Variance::Out);
        assert!(type_params[0].has_bound());

        let ctor = &b.secondary_constructors()[0];
        assert!(ctor.is_delegated_call_to_this());
        assert!(!ctor.has_body());

        assert!(!file.is_materialized());
    }

    #[test]
    fn property_and_accessor_attributes() {
        let file = stubbed();
        let b = class(&file, "Box");
        let body = b.stub().unwrap().declarations();
        let props: Vec<StubBased<'_, Property>> =
            body.into_iter().filter_map(StubRef::downcast).collect();
        assert_eq!(props.len(), 2);

        let size = &props[0];
        assert!(size.is_var());
        assert!(size.has_initializer());
        assert!(!size.is_extension());
        let setter = size.setter().unwrap();
        assert!(!setter.has_body());
        assert!(setter.modifier_flags().contains(ModifierFlags::PRIVATE));

        let shout = &props[1];
        assert!(shout.is_extension());
        assert!(shout.getter().unwrap().has_body());
        assert!(!shout.getter().unwrap().has_block_body());
        assert!(!file.is_materialized());

        let ty = shout.type_reference().unwrap().unwrap();
        assert_eq!(ty.text().trim(), "String");
        assert!(file.is_materialized());
    }

    #[test]
    fn absent_parts_do_not_parse() {
        let file = stubbed();
        let b = class(&file, "Box");
        let value = &b.primary_constructor_parameters()[0];
        assert_eq!(value.default_value().unwrap(), None);
        assert!(!file.is_materialized());
        assert!(value.type_reference().unwrap().is_some());
        assert!(file.is_materialized());
    }

    #[test]
    fn syntax_is_reference_stable() {
        let file = stubbed();
        let b = class(&file, "Box");
        let first: *const Class = b.syntax().unwrap();
        let second: *const Class = b.syntax().unwrap();
        assert_eq!(first, second);
        assert_eq!(b.syntax().unwrap().syntax(), file.node(b.stub().unwrap().id()).unwrap());
        assert_eq!(file.parse_count(), 1);
    }

    #[test]
    fn imports_and_annotations() {
        let file = stubbed();
        let import = file.imports()[0].downcast::<ImportDirective>().unwrap();
        assert_eq!(import.imported_fq_name().as_deref(), Some("kotlin.collections.List"));
        assert_eq!(import.alias_name().as_deref(), Some("KList"));
        assert!(!import.is_all_under());

        let marker = class(&file, "Marker");
        let list = marker
            .stub()
            .unwrap()
            .child_of_kind(SyntaxKind::ModifierList)
            .and_then(StubRef::downcast::<ModifierList>)
            .unwrap();
        assert!(list.contains(SyntaxKind::AnnotationKw));
        let annotations = list.annotation_entries();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].short_name().as_deref(), Some("Target"));
        assert!(annotations[0].has_value_arguments());
        assert!(!file.is_materialized());
    }

    #[test]
    fn every_stub_verifies() {
        let file = stubbed();
        for (id, _) in file.stubs().iter() {
            let stub = file.stub(id).unwrap();
            if let Some(class) = stub.downcast::<Class>() {
                assert_eq!(class.verify().ok(), Some(()));
            }
            if let Some(param) = stub.downcast::<Parameter>() {
                assert_eq!(param.verify().ok(), Some(()));
            }
        }
    }

    #[test]
    fn nodes_without_stubs_answer_from_the_tree() {
        let file = LazyFile::parsed(SOURCE, FileKind::Source).unwrap();
        let node = file
            .materialize()
            .unwrap()
            .syntax()
            .descendants()
            .filter_map(Class::cast)
            .find(|class| class.name().as_deref() == Some("Box"))
            .unwrap();
        let b = StubBased::from_node(node);
        assert!(b.stub().is_none());
        assert_eq!(b.secondary_constructor_count(), 1);
        assert_eq!(b.primary_constructor_parameters().len(), 2);
        assert_eq!(b.verify().ok(), Some(()));
    }

    #[test]
    fn wrong_kind_does_not_downcast() {
        let file = stubbed();
        let import = file.imports()[0];
        assert!(import.downcast::<Class>().is_none());
        assert_eq!(import.parent().map(StubRef::kind), Some(SyntaxKind::ImportList));
    }
}
