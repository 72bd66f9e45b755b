use std::cell::Cell;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use kt_syntax::{
    parse_kotlin_with_options, AstNode, FileKind, KtFile, ParseOptions, SyntaxKind,
    SyntaxNode,
};

use crate::builder::{build_stub_tree, stub_data, stub_nodes};
use crate::error::{Result, StubError};
use crate::stub::{StubData, StubId, StubTree};
use crate::stub_based::StubRef;

/// Where the text behind a stub tree comes from when a query needs the full
/// syntax tree.
pub trait SourceProvider {
    fn source_text(&self) -> Result<String>;
}

impl SourceProvider for String {
    fn source_text(&self) -> Result<String> {
        Ok(self.clone())
    }
}

impl SourceProvider for PathBuf {
    fn source_text(&self) -> Result<String> {
        match fs::read_to_string(self) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StubError::SourceUnavailable)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// A source provider that never has text. Queries that need the syntax
/// tree fail with [`StubError::SourceUnavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl SourceProvider for NoSource {
    fn source_text(&self) -> Result<String> {
        Err(StubError::SourceUnavailable)
    }
}

struct Materialized {
    file: KtFile,
    /// Node of each stub, indexed by [`StubId`].
    nodes: Vec<SyntaxNode>,
}

/// A file known by its stubs, parsed on first demand.
///
/// The parse happens at most once per successful materialization; the root
/// and every stubbed node are cached, so repeated lookups hand out the same
/// nodes.
pub struct LazyFile {
    stubs: StubTree,
    source: Box<dyn SourceProvider>,
    materialized: OnceCell<Materialized>,
    parses: Cell<usize>,
}

impl fmt::Debug for LazyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyFile")
            .field("stubs", &self.stubs.len())
            .field("materialized", &self.is_materialized())
            .field("parses", &self.parses.get())
            .finish()
    }
}

impl LazyFile {
    pub fn new(stubs: StubTree, source: impl SourceProvider + 'static) -> LazyFile {
        LazyFile {
            stubs,
            source: Box::new(source),
            materialized: OnceCell::new(),
            parses: Cell::new(0),
        }
    }

    /// Parses `text` right away and derives the stubs from the result.
    pub fn parsed(text: impl Into<String>, file_kind: FileKind) -> Result<LazyFile> {
        let text = text.into();
        let parse = parse_kotlin_with_options(
            &text,
            ParseOptions {
                file_kind,
                ..ParseOptions::default()
            },
        );
        let file = cast_file(parse.result.syntax())?;
        let stubs = build_stub_tree(&file);
        let nodes = stub_nodes(file.syntax());

        let lazy = LazyFile::new(stubs, text);
        lazy.parses.set(1);
        // The cell is fresh, so this cannot fail.
        let _ = lazy.materialized.set(Materialized { file, nodes });
        Ok(lazy)
    }

    pub fn stubs(&self) -> &StubTree {
        &self.stubs
    }

    pub fn is_materialized(&self) -> bool {
        self.materialized.get().is_some()
    }

    /// Number of times this file's source has been parsed.
    pub fn parse_count(&self) -> usize {
        self.parses.get()
    }

    pub fn file_kind(&self) -> FileKind {
        match self.stubs.get(self.stubs.root()).map(|root| root.data()) {
            Some(StubData::File(file)) if file.is_script => FileKind::Script,
            _ => FileKind::Source,
        }
    }

    pub fn root(&self) -> StubRef<'_> {
        StubRef::new(self, self.stubs.root())
    }

    pub fn stub(&self, id: StubId) -> Option<StubRef<'_>> {
        self.stubs.get(id).map(|_| StubRef::new(self, id))
    }

    pub fn package_fq_name(&self) -> &str {
        match self.stubs.get(self.stubs.root()).map(|root| root.data()) {
            Some(StubData::File(file)) => &file.package_fq_name,
            _ => "",
        }
    }

    /// Import directive stubs in source order.
    pub fn imports(&self) -> Vec<StubRef<'_>> {
        self.stubs
            .children_of_kind(self.stubs.root(), SyntaxKind::ImportList)
            .flat_map(|list| self.stubs.children_of_kind(list, SyntaxKind::ImportDirective))
            .map(|id| StubRef::new(self, id))
            .collect()
    }

    /// Top-level declarations, including those of a script.
    pub fn declarations(&self) -> Vec<StubRef<'_>> {
        self.root().declarations()
    }

    /// The full tree, parsing the source if this is the first request.
    pub fn materialize(&self) -> Result<&KtFile> {
        Ok(&self.materialized()?.file)
    }

    /// The syntax node behind stub `id`.
    pub fn node(&self, id: StubId) -> Result<&SyntaxNode> {
        let materialized = self.materialized()?;
        materialized.nodes.get(id.index()).ok_or_else(|| {
            StubError::Decode(format!("no stub #{} in a tree of {}", id.index(), self.stubs.len()))
        })
    }

    fn materialized(&self) -> Result<&Materialized> {
        self.materialized.get_or_try_init(|| {
            let _span =
                tracing::debug_span!(target: "kt.stubs", "materialize", stubs = self.stubs.len())
                    .entered();

            let text = self.source.source_text()?;
            let parse = parse_kotlin_with_options(
                &text,
                ParseOptions {
                    file_kind: self.file_kind(),
                    ..ParseOptions::default()
                },
            );
            self.parses.set(self.parses.get() + 1);

            let file = cast_file(parse.result.syntax())?;
            let nodes = stub_nodes(file.syntax());
            self.check_shape(&nodes)?;

            tracing::debug!(
                target = "kt.stubs",
                nodes = nodes.len(),
                errors = parse.result.errors.len(),
                "materialized stubbed file"
            );
            Ok(Materialized { file, nodes })
        })
    }

    /// The parsed tree must have a node of the same kind for every stub.
    fn check_shape(&self, nodes: &[SyntaxNode]) -> Result<()> {
        for ((id, stub), node) in self.stubs.iter().zip(nodes) {
            if stub.kind() != node.kind() {
                return Err(StubError::mismatch(
                    id,
                    stub.kind(),
                    format!("the source has {:?} here", node.kind()),
                ));
            }
        }
        if nodes.len() != self.stubs.len() {
            let id = StubId::new(nodes.len().min(self.stubs.len()));
            let kind = self
                .stubs
                .get(id)
                .map(|stub| stub.kind())
                .or_else(|| nodes.get(id.index()).map(SyntaxNode::kind))
                .unwrap_or(SyntaxKind::Error);
            return Err(StubError::mismatch(
                id,
                kind,
                format!(
                    "{} stubs but {} stubbed nodes in the source",
                    self.stubs.len(),
                    nodes.len()
                ),
            ));
        }
        Ok(())
    }

    /// Recomputes every stub from the materialized tree and reports the
    /// first stub that disagrees.
    pub fn verify(&self) -> Result<()> {
        for (id, stub) in self.stubs.iter() {
            let node = self.node(id)?;
            let actual = stub_data(node);
            if &actual != stub.data() {
                return Err(StubError::mismatch(
                    id,
                    stub.kind(),
                    format!("stored {:?}, source gives {actual:?}", stub.data()),
                ));
            }
        }
        Ok(())
    }
}

fn cast_file(root: SyntaxNode) -> Result<KtFile> {
    let kind = root.kind();
    KtFile::cast(root)
        .ok_or_else(|| StubError::mismatch(StubId::ROOT, kind, "source did not parse to a file"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SOURCE: &str = "package p\n\nimport a.B\n\nclass C {\n    fun f(x: Int = 1) {}\n}\n\nval top = 1\n";

    fn stubbed(text: &str) -> LazyFile {
        let stubs = LazyFile::parsed(text, FileKind::Source).unwrap().stubs().clone();
        LazyFile::new(stubs, text.to_string())
    }

    #[test]
    fn stub_queries_do_not_parse() {
        let file = stubbed(SOURCE);
        assert_eq!(file.package_fq_name(), "p");
        assert_eq!(file.imports().len(), 1);
        let names: Vec<Option<&str>> = file
            .declarations()
            .iter()
            .map(|decl| decl.data().name())
            .collect();
        assert_eq!(names, vec![Some("C"), Some("top")]);
        assert!(!file.is_materialized());
        assert_eq!(file.parse_count(), 0);
    }

    #[test]
    fn materializes_once() {
        let file = stubbed(SOURCE);
        let first = file.materialize().unwrap().syntax().clone();
        let second = file.materialize().unwrap().syntax().clone();
        assert_eq!(first, second);
        for (id, _) in file.stubs().iter() {
            let a: *const SyntaxNode = file.node(id).unwrap();
            let b: *const SyntaxNode = file.node(id).unwrap();
            assert_eq!(a, b);
        }
        assert_eq!(file.parse_count(), 1);
        assert_eq!(file.verify().ok(), Some(()));
    }

    #[test]
    fn parsed_files_start_materialized() {
        let file = LazyFile::parsed(SOURCE, FileKind::Source).unwrap();
        assert!(file.is_materialized());
        file.materialize().unwrap();
        assert_eq!(file.parse_count(), 1);
    }

    #[test]
    fn missing_source_is_reported() {
        let stubs = LazyFile::parsed(SOURCE, FileKind::Source).unwrap().stubs().clone();
        let file = LazyFile::new(stubs, NoSource);
        assert!(matches!(
            file.materialize(),
            Err(StubError::SourceUnavailable)
        ));
        assert_eq!(file.declarations().len(), 2);

        let stubs = file.stubs().clone();
        let file = LazyFile::new(stubs, PathBuf::from("/nonexistent/definitely/missing.kt"));
        assert!(matches!(
            file.materialize(),
            Err(StubError::SourceUnavailable)
        ));
    }

    #[test]
    fn structural_change_is_a_mismatch() {
        let stubs = LazyFile::parsed(SOURCE, FileKind::Source).unwrap().stubs().clone();
        let file = LazyFile::new(stubs, SOURCE.replace("class C", "object C"));
        match file.materialize() {
            Err(StubError::Mismatch { kind, .. }) => assert_eq!(kind, SyntaxKind::Class),
            other => panic!("expected a mismatch, got {other:?}"),
        }
        assert!(!file.is_materialized());
    }

    #[test]
    fn attribute_change_fails_verification() {
        let stubs = LazyFile::parsed(SOURCE, FileKind::Source).unwrap().stubs().clone();
        let file = LazyFile::new(stubs, SOURCE.replace("x: Int = 1", "x: Int"));
        file.materialize().unwrap();
        match file.verify() {
            Err(StubError::Mismatch { kind, .. }) => {
                assert_eq!(kind, SyntaxKind::ValueParameter)
            }
            other => panic!("expected a mismatch, got {other:?}"),
        }
    }

    #[test]
    fn scripts_reparse_as_scripts() {
        let stubs =
            LazyFile::parsed("val x = 1\nprintln(x)\n", FileKind::Script)
            .unwrap()
            .stubs()
            .clone();
        let file = LazyFile::new(stubs, "val x = 1\nprintln(x)\n".to_string());
        assert_eq!(file.file_kind(), FileKind::Script);
        assert!(file.materialize().unwrap().is_script());
        let names: Vec<Option<&str>> = file
            .declarations()
            .iter()
            .map(|decl| decl.data().name())
            .collect();
        assert_eq!(names, vec![Some("x")]);
    }
}
