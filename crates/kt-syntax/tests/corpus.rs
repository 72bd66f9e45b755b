use pretty_assertions::assert_eq;

use kt_syntax::ast::support;
use kt_syntax::visitor::{Accept, VoidVisitor};
use kt_syntax::{
    parse_kotlin, AstNode, Declaration, Element, KindSet, KtFile, ParseError, SyntaxKind,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn collect_kotlin_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("kt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_normalized(path: &Path) -> io::Result<String> {
    Ok(fs::read_to_string(path)?.replace("\r\n", "\n"))
}

fn line_col(text: &str, offset: u32) -> (usize, usize) {
    let before = &text[..offset as usize];
    let line = before.matches('\n').count() + 1;
    let col = before.len() - before.rfind('\n').map_or(0, |idx| idx + 1) + 1;
    (line, col)
}

fn format_errors(text: &str, errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|error| {
            let (line, col) = line_col(text, error.range.start);
            format!("{line}:{col}: {}\n", error.message)
        })
        .collect()
}

#[derive(Default)]
struct CountNodes(usize);

impl VoidVisitor for CountNodes {
    fn visit_element(&mut self, element: &Element) {
        self.0 += 1;
        element.accept_children(self);
    }
}

fn corpus() -> io::Result<Vec<(PathBuf, String)>> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata");
    collect_kotlin_files(&root)?
        .into_iter()
        .map(|path| read_normalized(&path).map(|text| (path, text)))
        .collect()
}

#[test]
fn corpus_parses_without_errors() -> io::Result<()> {
    let files = corpus()?;
    assert!(!files.is_empty(), "testdata has no .kt files");

    for (path, text) in files {
        let parse = parse_kotlin(&text);
        if !parse.errors.is_empty() {
            panic!(
                "expected no parse errors for `{}`\n{}",
                path.display(),
                format_errors(&text, &parse.errors)
            );
        }
        assert_eq!(
            parse.syntax().text().to_string(),
            text,
            "tree is not lossless for `{}`",
            path.display()
        );
    }
    Ok(())
}

#[test]
fn corpus_children_of_kind_restart() -> io::Result<()> {
    let interesting = KindSet::new(&[
        SyntaxKind::Class,
        SyntaxKind::Fun,
        SyntaxKind::Property,
        SyntaxKind::ValueParameter,
        SyntaxKind::ValueArgument,
        SyntaxKind::ImportDirective,
        SyntaxKind::PropertyAccessor,
    ]);

    for (path, text) in corpus()? {
        let parse = parse_kotlin(&text);
        for node in parse.syntax().descendants() {
            let expected: Vec<_> = node
                .children()
                .filter(|child| interesting.contains(child.kind()))
                .collect();
            let first: Vec<_> = support::children_of_kind(&node, interesting).collect();
            let second: Vec<_> = support::children_of_kind(&node, interesting).collect();
            assert_eq!(first, expected, "in `{}` at {:?}", path.display(), node);
            assert_eq!(second, expected, "in `{}` at {:?}", path.display(), node);
        }
    }
    Ok(())
}

#[test]
fn corpus_visitor_reaches_every_node() -> io::Result<()> {
    for (path, text) in corpus()? {
        let parse = parse_kotlin(&text);
        let file = KtFile::cast(parse.syntax()).expect("file root");
        let mut visitor = CountNodes::default();
        file.accept_void(&mut visitor);
        assert_eq!(
            visitor.0,
            parse.syntax().descendants().count(),
            "visitor skipped nodes in `{}`",
            path.display()
        );
    }
    Ok(())
}

#[test]
fn corpus_declarations_know_their_file() -> io::Result<()> {
    for (path, text) in corpus()? {
        let parse = parse_kotlin(&text);
        let root = parse.syntax();
        let declarations: Vec<Declaration> =
            root.descendants().filter_map(Declaration::cast).collect();
        assert!(!declarations.is_empty(), "no declarations in `{}`", path.display());
        for declaration in declarations {
            let owner = support::owner_file(declaration.syntax()).expect("attached declaration");
            assert_eq!(owner.syntax(), &root);
        }
    }
    Ok(())
}
