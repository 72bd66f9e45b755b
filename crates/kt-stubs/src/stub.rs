//! The stub model: a flat, serializable shadow of the declaration skeleton
//! of a file.
//!
//! Stubs are stored in preorder in one arena. Every stub knows its parent
//! and its children, so both directions of navigation work without the
//! source text. Each stub carries a [`StubData`] payload with the attributes
//! indexing needs; everything else has to come from the syntax tree.

use bitflags::bitflags;
use kt_syntax::{KindSet, KotlinLanguage, SyntaxKind};
use rowan::Language;
use serde::{Deserialize, Serialize};

use crate::error::StubError;

/// Index of a stub in its [`StubTree`]. The root is always `0`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
#[archive(check_bytes)]
pub struct StubId(u32);

impl StubId {
    pub const ROOT: StubId = StubId(0);

    pub(crate) fn new(index: usize) -> StubId {
        StubId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Modifier keywords written on a declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u32 {
        const ABSTRACT = 1 << 0;
        const OPEN = 1 << 1;
        const FINAL = 1 << 2;
        const SEALED = 1 << 3;
        const DATA = 1 << 4;
        const ENUM = 1 << 5;
        const ANNOTATION = 1 << 6;
        const INNER = 1 << 7;
        const COMPANION = 1 << 8;
        const OVERRIDE = 1 << 9;
        const PUBLIC = 1 << 10;
        const PROTECTED = 1 << 11;
        const INTERNAL = 1 << 12;
        const PRIVATE = 1 << 13;
        const LATEINIT = 1 << 14;
        const CONST = 1 << 15;
        const INLINE = 1 << 16;
        const VALUE = 1 << 17;
        const SUSPEND = 1 << 18;
        const OPERATOR = 1 << 19;
        const INFIX = 1 << 20;
        const TAILREC = 1 << 21;
        const EXTERNAL = 1 << 22;
        const VARARG = 1 << 23;
        const NOINLINE = 1 << 24;
        const CROSSINLINE = 1 << 25;
        const REIFIED = 1 << 26;
        const EXPECT = 1 << 27;
        const ACTUAL = 1 << 28;
        const IN = 1 << 29;
        const OUT = 1 << 30;
        /// `fun interface`.
        const FUN = 1 << 31;
    }
}

impl ModifierFlags {
    /// The flag for a modifier keyword kind.
    pub fn from_kind(kind: SyntaxKind) -> Option<ModifierFlags> {
        Some(match kind {
            SyntaxKind::AbstractKw => ModifierFlags::ABSTRACT,
            SyntaxKind::OpenKw => ModifierFlags::OPEN,
            SyntaxKind::FinalKw => ModifierFlags::FINAL,
            SyntaxKind::SealedKw => ModifierFlags::SEALED,
            SyntaxKind::DataKw => ModifierFlags::DATA,
            SyntaxKind::EnumKw => ModifierFlags::ENUM,
            SyntaxKind::AnnotationKw => ModifierFlags::ANNOTATION,
            SyntaxKind::InnerKw => ModifierFlags::INNER,
            SyntaxKind::CompanionKw => ModifierFlags::COMPANION,
            SyntaxKind::OverrideKw => ModifierFlags::OVERRIDE,
            SyntaxKind::PublicKw => ModifierFlags::PUBLIC,
            SyntaxKind::ProtectedKw => ModifierFlags::PROTECTED,
            SyntaxKind::InternalKw => ModifierFlags::INTERNAL,
            SyntaxKind::PrivateKw => ModifierFlags::PRIVATE,
            SyntaxKind::LateinitKw => ModifierFlags::LATEINIT,
            SyntaxKind::ConstKw => ModifierFlags::CONST,
            SyntaxKind::InlineKw => ModifierFlags::INLINE,
            SyntaxKind::ValueKw => ModifierFlags::VALUE,
            SyntaxKind::SuspendKw => ModifierFlags::SUSPEND,
            SyntaxKind::OperatorKw => ModifierFlags::OPERATOR,
            SyntaxKind::InfixKw => ModifierFlags::INFIX,
            SyntaxKind::TailrecKw => ModifierFlags::TAILREC,
            SyntaxKind::ExternalKw => ModifierFlags::EXTERNAL,
            SyntaxKind::VarargKw => ModifierFlags::VARARG,
            SyntaxKind::NoinlineKw => ModifierFlags::NOINLINE,
            SyntaxKind::CrossinlineKw => ModifierFlags::CROSSINLINE,
            SyntaxKind::ReifiedKw => ModifierFlags::REIFIED,
            SyntaxKind::ExpectKw => ModifierFlags::EXPECT,
            SyntaxKind::ActualKw => ModifierFlags::ACTUAL,
            SyntaxKind::InKw => ModifierFlags::IN,
            SyntaxKind::OutKw => ModifierFlags::OUT,
            SyntaxKind::FunKw => ModifierFlags::FUN,
            _ => return None,
        })
    }
}

/// Variance written on a type parameter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
#[archive(check_bytes)]
pub enum Variance {
    #[default]
    Invariant,
    In,
    Out,
}

macro_rules! stub_payloads {
    ($($(#[$meta:meta])* pub struct $name:ident { $($(#[$fmeta:meta])* pub $field:ident: $ty:ty,)* })*) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug,
                Clone,
                PartialEq,
                Eq,
                Default,
                Serialize,
                Deserialize,
                rkyv::Archive,
                rkyv::Serialize,
                rkyv::Deserialize,
            )]
            #[archive(check_bytes)]
            pub struct $name {
                $($(#[$fmeta])* pub $field: $ty,)*
            }
        )*
    };
}

stub_payloads! {
    pub struct FileStub {
        /// Dotted package name; empty for the root package.
        pub package_fq_name: String,
        pub is_script: bool,
    }

    pub struct PackageStub {
        pub fq_name: String,
    }

    pub struct ImportStub {
        pub imported_fq_name: Option<String>,
        pub is_all_under: bool,
        pub alias_name: Option<String>,
    }

    /// Classes and interfaces.
    pub struct ClassStub {
        pub name: Option<String>,
        pub fq_name: Option<String>,
        pub is_interface: bool,
        pub is_local: bool,
        pub has_explicit_primary_constructor: bool,
        pub secondary_constructor_count: u32,
        /// Short names of the super types, in declaration order.
        pub super_names: Vec<String>,
    }

    pub struct EnumEntryStub {
        pub name: Option<String>,
        pub fq_name: Option<String>,
        pub has_initializer: bool,
    }

    pub struct ObjectStub {
        pub name: Option<String>,
        pub fq_name: Option<String>,
        pub is_companion: bool,
        pub is_local: bool,
        pub super_names: Vec<String>,
    }

    pub struct FunctionStub {
        pub name: Option<String>,
        pub fq_name: Option<String>,
        pub is_top_level: bool,
        pub is_extension: bool,
        pub has_body: bool,
        pub has_block_body: bool,
        pub has_declared_return_type: bool,
        pub has_type_parameters: bool,
        pub value_parameter_count: u32,
    }

    pub struct PropertyStub {
        pub name: Option<String>,
        pub fq_name: Option<String>,
        pub is_var: bool,
        pub is_top_level: bool,
        pub is_extension: bool,
        pub has_declared_type: bool,
        pub has_initializer: bool,
        pub has_delegate: bool,
    }

    pub struct AccessorStub {
        pub is_getter: bool,
        pub has_body: bool,
        pub has_block_body: bool,
    }

    pub struct TypeAliasStub {
        pub name: Option<String>,
        pub fq_name: Option<String>,
        pub is_top_level: bool,
    }

    pub struct ConstructorStub {
        pub has_body: bool,
        /// Secondary constructors only: no `: this(..)`/`: super(..)` in
        /// source.
        pub has_implicit_delegation_call: bool,
        pub is_delegated_call_to_this: bool,
    }

    pub struct ParameterStub {
        pub name: Option<String>,
        pub fq_name: Option<String>,
        pub has_default_value: bool,
        pub has_val_or_var: bool,
        pub is_mutable: bool,
        pub is_vararg: bool,
        pub has_type: bool,
    }

    pub struct TypeParameterStub {
        pub name: Option<String>,
        pub variance: Variance,
        pub is_reified: bool,
        pub has_bound: bool,
    }

    pub struct ModifierListStub {
        /// Raw [`ModifierFlags`] bits.
        pub bits: u32,
    }

    pub struct AnnotationStub {
        pub short_name: Option<String>,
        pub use_site_target: Option<String>,
        pub has_value_arguments: bool,
    }

    /// `A`, `A()` and `A by b` entries of a super type list.
    pub struct SuperTypeStub {
        pub referenced_name: Option<String>,
    }
}

impl ClassStub {
    /// Declared or implicit. A class without an explicit parameter list
    /// only has an implicit primary constructor when it declares no
    /// secondary constructors.
    pub fn has_primary_constructor(&self) -> bool {
        self.has_explicit_primary_constructor || self.secondary_constructor_count == 0
    }
}

impl ModifierListStub {
    pub fn flags(&self) -> ModifierFlags {
        ModifierFlags::from_bits_retain(self.bits)
    }
}

/// Attributes carried by one stub, by stub kind.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
#[archive(check_bytes)]
pub enum StubData {
    File(FileStub),
    Package(PackageStub),
    Import(ImportStub),
    Class(ClassStub),
    EnumEntry(EnumEntryStub),
    Object(ObjectStub),
    Function(FunctionStub),
    Property(PropertyStub),
    Accessor(AccessorStub),
    TypeAlias(TypeAliasStub),
    Constructor(ConstructorStub),
    Parameter(ParameterStub),
    TypeParameter(TypeParameterStub),
    ModifierList(ModifierListStub),
    Annotation(AnnotationStub),
    SuperType(SuperTypeStub),
    /// Structural stubs without attributes: import lists, class bodies,
    /// parameter lists, initializers, scripts.
    Empty,
}

impl StubData {
    pub fn name(&self) -> Option<&str> {
        match self {
            StubData::Class(stub) => stub.name.as_deref(),
            StubData::EnumEntry(stub) => stub.name.as_deref(),
            StubData::Object(stub) => stub.name.as_deref(),
            StubData::Function(stub) => stub.name.as_deref(),
            StubData::Property(stub) => stub.name.as_deref(),
            StubData::TypeAlias(stub) => stub.name.as_deref(),
            StubData::Parameter(stub) => stub.name.as_deref(),
            StubData::TypeParameter(stub) => stub.name.as_deref(),
            _ => None,
        }
    }

    pub fn fq_name(&self) -> Option<&str> {
        match self {
            StubData::Class(stub) => stub.fq_name.as_deref(),
            StubData::EnumEntry(stub) => stub.fq_name.as_deref(),
            StubData::Object(stub) => stub.fq_name.as_deref(),
            StubData::Function(stub) => stub.fq_name.as_deref(),
            StubData::Property(stub) => stub.fq_name.as_deref(),
            StubData::TypeAlias(stub) => stub.fq_name.as_deref(),
            StubData::Parameter(stub) => stub.fq_name.as_deref(),
            StubData::Package(stub) => Some(&stub.fq_name),
            _ => None,
        }
    }
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
#[archive(check_bytes)]
pub struct StubNode {
    /// Raw [`SyntaxKind`] discriminant.
    kind: u16,
    parent: Option<StubId>,
    children: Vec<StubId>,
    data: StubData,
}

impl StubNode {
    pub fn kind(&self) -> SyntaxKind {
        KotlinLanguage::kind_from_raw(rowan::SyntaxKind(self.kind))
    }

    pub fn parent(&self) -> Option<StubId> {
        self.parent
    }

    pub fn children(&self) -> &[StubId] {
        &self.children
    }

    pub fn data(&self) -> &StubData {
        &self.data
    }
}

/// All stubs of one file in preorder. `StubId::ROOT` is the file stub.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
#[archive(check_bytes)]
pub struct StubTree {
    nodes: Vec<StubNode>,
}

impl StubTree {
    pub(crate) fn with_root(data: StubData) -> StubTree {
        StubTree {
            nodes: vec![StubNode {
                kind: SyntaxKind::KtFile as u16,
                parent: None,
                children: Vec::new(),
                data,
            }],
        }
    }

    /// Appends a stub under `parent`. Stubs must be pushed in preorder.
    pub(crate) fn push(&mut self, parent: StubId, kind: SyntaxKind, data: StubData) -> StubId {
        let id = StubId::new(self.nodes.len());
        self.nodes.push(StubNode {
            kind: kind as u16,
            parent: Some(parent),
            children: Vec::new(),
            data,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn root(&self) -> StubId {
        StubId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: StubId) -> Option<&StubNode> {
        self.nodes.get(id.index())
    }

    /// Stubs in preorder with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (StubId, &StubNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (StubId::new(index), node))
    }

    /// Children of `id` whose kind is in `kinds`, in source order.
    pub fn children_of_kind(
        &self,
        id: StubId,
        kinds: impl Into<KindSet>,
    ) -> impl Iterator<Item = StubId> + '_ {
        let kinds = kinds.into();
        self.get(id)
            .map(StubNode::children)
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(move |child| {
                self.get(*child)
                    .map_or(false, |node| kinds.contains(node.kind()))
            })
    }

    /// Structural checks for trees that come from outside the process:
    /// every stub kind is a stub kind, the root is a file, parent and child
    /// links agree and the order is a preorder.
    pub fn validate(&self) -> Result<(), StubError> {
        let Some(root) = self.nodes.first() else {
            return Err(StubError::Decode("stub tree is empty".into()));
        };
        if root.kind() != SyntaxKind::KtFile || root.parent.is_some() {
            return Err(StubError::Decode("stub tree root is not a file".into()));
        }

        // Walking children in order from the root must visit every stub
        // exactly once, in index order.
        let mut expected = 0usize;
        let mut stack = vec![StubId::ROOT];
        while let Some(id) = stack.pop() {
            if id.index() != expected {
                return Err(StubError::Decode(format!(
                    "stub #{} is out of preorder (expected #{expected})",
                    id.index()
                )));
            }
            expected += 1;
            let node = &self.nodes[id.index()];
            if !KindSet::STUB_KINDS.contains(node.kind()) {
                return Err(StubError::Decode(format!(
                    "stub #{} has non-stub kind {:?}",
                    id.index(),
                    node.kind()
                )));
            }
            for child in node.children.iter().rev() {
                let Some(child_node) = self.nodes.get(child.index()) else {
                    return Err(StubError::Decode(format!(
                        "stub #{} refers to missing child #{}",
                        id.index(),
                        child.index()
                    )));
                };
                if child_node.parent != Some(id) {
                    return Err(StubError::Decode(format!(
                        "stub #{} is listed under #{} but points elsewhere",
                        child.index(),
                        id.index()
                    )));
                }
                stack.push(*child);
            }
        }
        if expected != self.nodes.len() {
            return Err(StubError::Decode(format!(
                "{} stubs are unreachable from the root",
                self.nodes.len() - expected
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> StubTree {
        let mut tree = StubTree::with_root(StubData::File(FileStub::default()));
        let class = tree.push(
            StubId::ROOT,
            SyntaxKind::Class,
            StubData::Class(ClassStub {
                name: Some("A".into()),
                ..ClassStub::default()
            }),
        );
        tree.push(class, SyntaxKind::ClassBody, StubData::Empty);
        tree.push(
            StubId::ROOT,
            SyntaxKind::Fun,
            StubData::Function(FunctionStub::default()),
        );
        tree
    }

    #[test]
    fn push_links_parent_and_children() {
        let tree = sample();
        assert_eq!(tree.len(), 4);
        let root = tree.get(tree.root()).expect("root");
        assert_eq!(root.children(), &[StubId::new(1), StubId::new(3)]);
        assert_eq!(tree.get(StubId::new(2)).and_then(StubNode::parent), Some(StubId::new(1)));
        assert_eq!(tree.validate().ok(), Some(()));
    }

    #[test]
    fn children_of_kind_filters_and_restarts() {
        let tree = sample();
        let first: Vec<_> = tree.children_of_kind(StubId::ROOT, SyntaxKind::Fun).collect();
        let second: Vec<_> = tree.children_of_kind(StubId::ROOT, SyntaxKind::Fun).collect();
        assert_eq!(first, vec![StubId::new(3)]);
        assert_eq!(first, second);
    }

    #[test]
    fn validate_rejects_broken_links() {
        let mut tree = sample();
        tree.nodes[2].parent = Some(StubId::ROOT);
        assert!(matches!(tree.validate(), Err(StubError::Decode(_))));

        let mut tree = sample();
        tree.nodes[3].kind = SyntaxKind::Block as u16;
        assert!(matches!(tree.validate(), Err(StubError::Decode(_))));

        let empty = StubTree { nodes: Vec::new() };
        assert!(matches!(empty.validate(), Err(StubError::Decode(_))));
    }

    #[test]
    fn class_primary_constructor_rule() {
        let implicit = ClassStub::default();
        assert!(implicit.has_primary_constructor());
        let secondary_only = ClassStub {
            secondary_constructor_count: 1,
            ..ClassStub::default()
        };
        assert!(!secondary_only.has_primary_constructor());
    }

    #[test]
    fn modifier_flags_cover_every_modifier_keyword() {
        for raw in 0..(SyntaxKind::__Last as u16) {
            let kind = KotlinLanguage::kind_from_raw(rowan::SyntaxKind(raw));
            if KindSet::MODIFIER_KEYWORDS.contains(kind) {
                assert!(ModifierFlags::from_kind(kind).is_some(), "{kind:?}");
            }
        }
    }
}
