//! Stubs for Kotlin files.
//!
//! A stub tree is the declaration skeleton of a file: packages, imports,
//! classes, functions, properties, parameters, modifiers and annotations,
//! each with the attributes that indexing needs. Stubs can be persisted and
//! read back without the source text.
//!
//! - [`build_stub_tree`] derives stubs from a parsed [`kt_syntax::KtFile`].
//! - [`persist`] writes and reads the versioned stub file format.
//! - [`LazyFile`] pairs a stub tree with a [`SourceProvider`] and parses the
//!   source only when a query needs the full tree.
//! - [`StubBased`] is a typed node that answers stub-carried attributes from
//!   the stub and everything else from the materialized tree.

mod builder;
mod error;
mod lazy;
pub mod persist;
mod stub;
mod stub_based;

pub use builder::build_stub_tree;
pub use error::{Result, StubError};
pub use lazy::{LazyFile, NoSource, SourceProvider};
pub use persist::{
    decode_stub_tree, encode_stub_tree, from_archive_bytes, read_stub_file, to_archive_bytes,
    write_stub_file, STUB_FILE_MAGIC, STUB_FORMAT_VERSION,
};
pub use stub::{
    AccessorStub, AnnotationStub, ClassStub, ConstructorStub, EnumEntryStub, FileStub,
    FunctionStub, ImportStub, ModifierFlags, ModifierListStub, ObjectStub, PackageStub,
    ParameterStub, PropertyStub, StubData, StubId, StubNode, StubTree, SuperTypeStub,
    TypeAliasStub, TypeParameterStub, Variance,
};
pub use stub_based::{StubBased, StubRef};
