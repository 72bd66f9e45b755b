//! Building stubs from a parsed file.
//!
//! [`stub_nodes`] defines which nodes get a stub and in what order. The
//! builder and [`crate::LazyFile`] both go through it, so stub `i` always
//! corresponds to the `i`-th node of the walk.

use kt_syntax::{
    fq_name, AnnotationEntry, AstNode, CallableDeclaration, Class, EnumEntry, ImportDirective,
    KindSet, KtFile, ModifierList, NamedDeclarationOwner,
    NamedFunction, ObjectDeclaration, PackageDirective, Parameter, PrimaryConstructor, Property,
    PropertyAccessor, SecondaryConstructor, SuperTypeListEntry, SyntaxKind, SyntaxNode, TypeAlias,
    TypeParameter, TypeParameterListOwner,
};

use crate::stub::{
    AccessorStub, AnnotationStub, ClassStub, ConstructorStub, EnumEntryStub, FileStub,
    FunctionStub, ImportStub, ModifierFlags, ModifierListStub, ObjectStub, PackageStub,
    ParameterStub, PropertyStub, StubData, StubId, StubTree, SuperTypeStub, TypeAliasStub,
    TypeParameterStub, Variance,
};

/// Builds the stub tree of `file`.
pub fn build_stub_tree(file: &KtFile) -> StubTree {
    let _span = tracing::debug_span!(target: "kt.stubs", "build_stub_tree").entered();

    let root = file.syntax();
    let mut tree = StubTree::with_root(stub_data(root));
    let mut stack: Vec<(SyntaxNode, StubId)> = stub_children(root)
        .into_iter()
        .rev()
        .map(|child| (child, StubId::ROOT))
        .collect();
    while let Some((node, parent)) = stack.pop() {
        let id = tree.push(parent, node.kind(), stub_data(&node));
        stack.extend(stub_children(&node).into_iter().rev().map(|child| (child, id)));
    }

    tracing::debug!(target = "kt.stubs", stubs = tree.len(), "built stub tree");
    tree
}

/// The nodes that have stubs, in stub order.
pub(crate) fn stub_nodes(root: &SyntaxNode) -> Vec<SyntaxNode> {
    let mut out = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        stack.extend(stub_children(&node).into_iter().rev());
        out.push(node);
    }
    out
}

/// Stubbed descendants reachable from `node` without crossing another stub.
/// The file annotation list and a script's top-level block have no stubs of
/// their own; their children attach to the enclosing stub. Function bodies,
/// initializers and other expressions are never entered.
fn stub_children(node: &SyntaxNode) -> Vec<SyntaxNode> {
    let mut out = Vec::new();
    for child in node.children() {
        if KindSet::STUB_KINDS.contains(child.kind()) {
            out.push(child);
        } else if is_transparent(&child) {
            out.extend(stub_children(&child));
        }
    }
    out
}

fn is_transparent(node: &SyntaxNode) -> bool {
    match node.kind() {
        SyntaxKind::FileAnnotationList => true,
        SyntaxKind::Block => node
            .parent()
            .map_or(false, |parent| parent.kind() == SyntaxKind::Script),
        _ => false,
    }
}

fn fq_string(node: &impl AstNode) -> Option<String> {
    fq_name(node).map(|name| name.to_string())
}

fn super_names(entries: Vec<SuperTypeListEntry>) -> Vec<String> {
    entries
        .iter()
        .filter_map(SuperTypeListEntry::referenced_name)
        .collect()
}

/// The stub payload for a stubbed node. Kinds without attributes get
/// [`StubData::Empty`].
pub(crate) fn stub_data(node: &SyntaxNode) -> StubData {
    let node = node.clone();
    match node.kind() {
        SyntaxKind::KtFile => KtFile::cast(node).map_or(StubData::Empty, |file| {
            StubData::File(FileStub {
                package_fq_name: file.package_fq_name().to_string(),
                is_script: file.is_script(),
            })
        }),
        SyntaxKind::PackageDirective => {
            PackageDirective::cast(node).map_or(StubData::Empty, |package| {
                StubData::Package(PackageStub {
                    fq_name: package.qualified_name(),
                })
            })
        }
        SyntaxKind::ImportDirective => {
            ImportDirective::cast(node).map_or(StubData::Empty, |import| {
                StubData::Import(ImportStub {
                    imported_fq_name: import.imported_fq_name().map(|name| name.to_string()),
                    is_all_under: import.is_all_under(),
                    alias_name: import.alias_name(),
                })
            })
        }
        SyntaxKind::Class => Class::cast(node).map_or(StubData::Empty, |class| {
            StubData::Class(ClassStub {
                name: class.name(),
                fq_name: fq_string(&class),
                is_interface: class.is_interface(),
                is_local: class.is_local(),
                has_explicit_primary_constructor: class.has_explicit_primary_constructor(),
                secondary_constructor_count: class.secondary_constructors().len() as u32,
                super_names: super_names(class.super_type_list_entries()),
            })
        }),
        SyntaxKind::EnumEntry => EnumEntry::cast(node).map_or(StubData::Empty, |entry| {
            StubData::EnumEntry(EnumEntryStub {
                name: entry.name(),
                fq_name: fq_string(&entry),
                has_initializer: entry.has_initializer(),
            })
        }),
        SyntaxKind::ObjectDeclaration => {
            ObjectDeclaration::cast(node).map_or(StubData::Empty, |object| {
                StubData::Object(ObjectStub {
                    name: object.name(),
                    fq_name: fq_string(&object),
                    is_companion: object.is_companion(),
                    is_local: object.is_local(),
                    super_names: super_names(object.super_type_list_entries()),
                })
            })
        }
        SyntaxKind::Fun => NamedFunction::cast(node).map_or(StubData::Empty, |function| {
            StubData::Function(FunctionStub {
                name: function.name(),
                fq_name: fq_string(&function),
                is_top_level: function.is_top_level(),
                is_extension: function.receiver_type_reference().is_some(),
                has_body: function.has_body(),
                has_block_body: function.has_block_body(),
                has_declared_return_type: function.has_declared_return_type(),
                has_type_parameters: function.type_parameter_list().is_some(),
                value_parameter_count: function.value_parameters().len() as u32,
            })
        }),
        SyntaxKind::Property => Property::cast(node).map_or(StubData::Empty, |property| {
            StubData::Property(PropertyStub {
                name: property.name(),
                fq_name: fq_string(&property),
                is_var: property.is_var(),
                is_top_level: property.is_top_level(),
                is_extension: property.receiver_type_reference().is_some(),
                has_declared_type: property.has_declared_return_type(),
                has_initializer: property.has_initializer(),
                has_delegate: property.has_delegate(),
            })
        }),
        SyntaxKind::PropertyAccessor => {
            PropertyAccessor::cast(node).map_or(StubData::Empty, |accessor| {
                StubData::Accessor(AccessorStub {
                    is_getter: accessor.is_getter(),
                    has_body: accessor.has_body(),
                    has_block_body: accessor.has_block_body(),
                })
            })
        }
        SyntaxKind::TypeAlias => TypeAlias::cast(node).map_or(StubData::Empty, |alias| {
            StubData::TypeAlias(TypeAliasStub {
                name: alias.name(),
                fq_name: fq_string(&alias),
                is_top_level: alias.is_top_level(),
            })
        }),
        SyntaxKind::PrimaryConstructor => {
            PrimaryConstructor::cast(node).map_or(StubData::Empty, |_| {
                StubData::Constructor(ConstructorStub::default())
            })
        }
        SyntaxKind::SecondaryConstructor => {
            SecondaryConstructor::cast(node).map_or(StubData::Empty, |ctor| {
                StubData::Constructor(ConstructorStub {
                    has_body: ctor.has_body(),
                    has_implicit_delegation_call: ctor.has_implicit_delegation_call(),
                    is_delegated_call_to_this: ctor.is_delegated_call_to_this(),
                })
            })
        }
        SyntaxKind::ValueParameter => Parameter::cast(node).map_or(StubData::Empty, |param| {
            StubData::Parameter(ParameterStub {
                name: param.name(),
                fq_name: fq_string(&param),
                has_default_value: param.has_default_value(),
                has_val_or_var: param.has_val_or_var(),
                is_mutable: param.is_mutable(),
                is_vararg: param.is_vararg(),
                has_type: param.type_reference().is_some(),
            })
        }),
        SyntaxKind::TypeParameter => TypeParameter::cast(node).map_or(StubData::Empty, |param| {
            StubData::TypeParameter(TypeParameterStub {
                name: param.name(),
                variance: match param.variance() {
                    Some(SyntaxKind::InKw) => Variance::In,
                    Some(SyntaxKind::OutKw) => Variance::Out,
                    _ => Variance::Invariant,
                },
                is_reified: param.is_reified(),
                has_bound: param.extends_bound().is_some(),
            })
        }),
        SyntaxKind::ModifierList => ModifierList::cast(node).map_or(StubData::Empty, |list| {
            StubData::ModifierList(ModifierListStub {
                bits: modifier_flags(&list).bits(),
            })
        }),
        SyntaxKind::AnnotationEntry => {
            AnnotationEntry::cast(node).map_or(StubData::Empty, |entry| {
                StubData::Annotation(AnnotationStub {
                    short_name: entry.short_name(),
                    use_site_target: entry.use_site_target().and_then(|t| t.target_name()),
                    has_value_arguments: entry.value_argument_list().is_some(),
                })
            })
        }
        SyntaxKind::SuperTypeEntry
        | SyntaxKind::SuperTypeCallEntry
        | SyntaxKind::DelegatedSuperTypeEntry => {
            SuperTypeListEntry::cast(node).map_or(StubData::Empty, |entry| {
                StubData::SuperType(SuperTypeStub {
                    referenced_name: entry.referenced_name(),
                })
            })
        }
        _ => StubData::Empty,
    }
}

pub(crate) fn modifier_flags(list: &ModifierList) -> ModifierFlags {
    list.modifier_tokens()
        .filter_map(|token| ModifierFlags::from_kind(token.kind()))
        .fold(ModifierFlags::empty(), |flags, flag| flags | flag)
}
