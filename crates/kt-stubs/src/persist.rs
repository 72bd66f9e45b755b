//! On-disk stub format.
//!
//! A stub file is a small bincode header followed by the bincode-encoded
//! [`StubTree`]:
//!
//! ```text
//! magic: [u8; 4] = "KSTB"
//! format_version: u32
//! syntax_schema_version: u32
//! tree: StubTree
//! ```
//!
//! Integers are fixed width little endian. The syntax schema version guards
//! the stored kind discriminants. Decoding validates the tree structure, so
//! a tree that decodes is always safe to walk.
//!
//! [`to_archive_bytes`] produces an rkyv archive of the same data for
//! callers that want zero-copy validation.

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;

use bincode::Options;
use rkyv::Deserialize as _;
use serde::{Deserialize, Serialize};

use kt_syntax::SYNTAX_SCHEMA_VERSION;

use crate::error::{Result, StubError};
use crate::stub::StubTree;

pub const STUB_FILE_MAGIC: [u8; 4] = *b"KSTB";

/// Bump when the layout of [`StubTree`] or any stub payload changes.
pub const STUB_FORMAT_VERSION: u32 = 1;

/// Upper bound on a decoded stub payload. Corrupted length prefixes must not
/// turn into huge allocations.
pub const STUB_PAYLOAD_LIMIT_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct StubFileHeader {
    magic: [u8; 4],
    format_version: u32,
    syntax_schema_version: u32,
}

impl StubFileHeader {
    fn current() -> Self {
        StubFileHeader {
            magic: STUB_FILE_MAGIC,
            format_version: STUB_FORMAT_VERSION,
            syntax_schema_version: SYNTAX_SCHEMA_VERSION,
        }
    }

    fn check(&self) -> Result<()> {
        if self.magic != STUB_FILE_MAGIC {
            return Err(StubError::Decode(format!(
                "bad magic {:?}",
                String::from_utf8_lossy(&self.magic)
            )));
        }
        check_versions(self.format_version, self.syntax_schema_version)
    }
}

fn check_versions(format_version: u32, syntax_schema_version: u32) -> Result<()> {
    if format_version != STUB_FORMAT_VERSION {
        return Err(StubError::VersionMismatch {
            what: "stub format version",
            expected: STUB_FORMAT_VERSION,
            found: format_version,
        });
    }
    if syntax_schema_version != SYNTAX_SCHEMA_VERSION {
        return Err(StubError::VersionMismatch {
            what: "syntax schema version",
            expected: SYNTAX_SCHEMA_VERSION,
            found: syntax_schema_version,
        });
    }
    Ok(())
}

fn bincode_options() -> impl bincode::Options + Copy {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

fn bincode_options_limited() -> impl bincode::Options + Copy {
    bincode_options().with_limit(STUB_PAYLOAD_LIMIT_BYTES as u64)
}

pub fn encode_stub_tree(tree: &StubTree) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_stub_tree(&mut out, tree)?;
    Ok(out)
}

pub fn write_stub_tree(writer: &mut impl Write, tree: &StubTree) -> Result<()> {
    let options = bincode_options();
    options
        .serialize_into(&mut *writer, &StubFileHeader::current())
        .map_err(encode_error)?;
    options.serialize_into(writer, tree).map_err(encode_error)?;
    Ok(())
}

fn encode_error(err: bincode::Error) -> StubError {
    match *err {
        bincode::ErrorKind::Io(err) => StubError::Io(err),
        other => StubError::Encode(other.to_string()),
    }
}

pub fn decode_stub_tree(bytes: &[u8]) -> Result<StubTree> {
    if bytes.len() > STUB_PAYLOAD_LIMIT_BYTES {
        return Err(StubError::Decode(format!(
            "stub payload of {} bytes exceeds the limit",
            bytes.len()
        )));
    }

    let options = bincode_options_limited();
    let mut cursor = Cursor::new(bytes);
    let header: StubFileHeader = options.deserialize_from(&mut cursor)?;
    header.check()?;
    let tree: StubTree = options.deserialize_from(&mut cursor)?;

    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(StubError::Decode(format!(
            "{} trailing bytes after stub tree",
            bytes.len() - consumed
        )));
    }

    tree.validate()?;
    Ok(tree)
}

/// Writes `tree` to `path` atomically: readers see the old file or the new
/// one, never a partial write.
pub fn write_stub_file(path: &Path, tree: &StubTree) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => return Err(io::Error::other("path has no parent").into()),
    };
    fs::create_dir_all(parent)?;

    let bytes = encode_stub_tree(tree)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| StubError::Io(err.error))?;

    tracing::debug!(
        target = "kt.stubs",
        path = %path.display(),
        stubs = tree.len(),
        bytes = bytes.len(),
        "wrote stub file"
    );
    Ok(())
}

pub fn read_stub_file(path: &Path) -> Result<StubTree> {
    let meta = fs::metadata(path)?;
    if meta.len() > STUB_PAYLOAD_LIMIT_BYTES as u64 {
        return Err(StubError::Decode(format!(
            "stub file {} is {} bytes",
            path.display(),
            meta.len()
        )));
    }
    let bytes = fs::read(path)?;
    decode_stub_tree(&bytes).map_err(|err| {
        tracing::debug!(
            target = "kt.stubs",
            path = %path.display(),
            error = %err,
            "failed to decode stub file"
        );
        err
    })
}

#[derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
#[archive(check_bytes)]
struct StubArchive {
    format_version: u32,
    syntax_schema_version: u32,
    tree: StubTree,
}

/// Encodes `tree` as a validated rkyv archive.
pub fn to_archive_bytes(tree: &StubTree) -> Result<Vec<u8>> {
    let archive = StubArchive {
        format_version: STUB_FORMAT_VERSION,
        syntax_schema_version: SYNTAX_SCHEMA_VERSION,
        tree: tree.clone(),
    };
    let bytes = rkyv::to_bytes::<_, 256>(&archive)
        .map_err(|err| StubError::Encode(err.to_string()))?;
    Ok(bytes.into_vec())
}

pub fn from_archive_bytes(bytes: &[u8]) -> Result<StubTree> {
    let mut aligned = rkyv::util::AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);
    let archived = rkyv::check_archived_root::<StubArchive>(&aligned)
        .map_err(|err| StubError::Decode(err.to_string()))?;
    check_versions(archived.format_version, archived.syntax_schema_version)?;

    let tree: StubTree = archived
        .tree
        .deserialize(&mut rkyv::Infallible)
        .map_err(|err| StubError::Decode(format!("{err:?}")))?;
    tree.validate()?;
    Ok(tree)
}
