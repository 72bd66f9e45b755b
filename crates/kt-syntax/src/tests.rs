use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{
    lex, parse_kotlin, parse_kotlin_expression, parse_kotlin_type, parse_kotlin_with_options,
    FileKind, KotlinLanguage, LanguageVersion, ParseOptions, SyntaxKind, TextRange,
};

fn dump_non_trivia(input: &str) -> Vec<(SyntaxKind, String)> {
    lex(input)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| (t.kind, t.text(input).to_string()))
        .collect()
}

#[test]
fn syntax_kind_raw_roundtrip_is_total_for_valid_range() {
    use rowan::Language;

    for raw in 0..(SyntaxKind::__Last as u16) {
        let kind = <KotlinLanguage as Language>::kind_from_raw(rowan::SyntaxKind(raw));
        assert_eq!(
            <KotlinLanguage as Language>::kind_to_raw(kind).0,
            raw,
            "failed roundtrip for raw={raw}"
        );
    }
    let past_end = <KotlinLanguage as Language>::kind_from_raw(rowan::SyntaxKind(u16::MAX));
    assert_eq!(past_end, SyntaxKind::Error);
}

#[test]
fn syntax_kind_helper_classification_smoke_test() {
    assert!(SyntaxKind::ClassKw.is_keyword());
    assert!(SyntaxKind::NotIs.is_keyword());
    assert!(!SyntaxKind::DataKw.is_keyword());
    assert!(SyntaxKind::DataKw.is_modifier_keyword());
    assert!(SyntaxKind::WhereKw.is_soft_keyword());
    assert!(SyntaxKind::WhereKw.is_identifier_like());
    assert!(SyntaxKind::DocComment.is_trivia());
    assert!(SyntaxKind::Identifier.is_token());
    assert!(SyntaxKind::KtFile.is_node());
    assert!(SyntaxKind::Error.is_node());
    assert!(!SyntaxKind::Whitespace.is_keyword());
}

#[test]
fn text_range_rkyv_roundtrip_with_validation() {
    use rkyv::Deserialize;

    let range = TextRange::new(3, 17);
    let bytes = rkyv::to_bytes::<_, 64>(&range).expect("rkyv serialization should succeed");
    let archived =
        rkyv::check_archived_root::<TextRange>(&bytes).expect("rkyv archive should validate");
    let roundtripped: TextRange = archived
        .deserialize(&mut rkyv::Infallible)
        .expect("rkyv deserialization should succeed");

    assert_eq!(roundtripped, range);
    assert_eq!(roundtripped.len(), 14);
}

#[test]
fn lexer_templates_and_keywords() {
    let input = "val s = \"x=$x, ${y + 1}\\n\" as? String";
    let expected = vec![
        (SyntaxKind::ValKw, "val".into()),
        (SyntaxKind::Identifier, "s".into()),
        (SyntaxKind::Eq, "=".into()),
        (SyntaxKind::OpenQuote, "\"".into()),
        (SyntaxKind::RegularStringPart, "x=".into()),
        (SyntaxKind::ShortTemplateEntryStart, "$".into()),
        (SyntaxKind::Identifier, "x".into()),
        (SyntaxKind::RegularStringPart, ", ".into()),
        (SyntaxKind::LongTemplateEntryStart, "${".into()),
        (SyntaxKind::Identifier, "y".into()),
        (SyntaxKind::Plus, "+".into()),
        (SyntaxKind::IntegerLiteral, "1".into()),
        (SyntaxKind::LongTemplateEntryEnd, "}".into()),
        (SyntaxKind::EscapeSequence, "\\n".into()),
        (SyntaxKind::ClosingQuote, "\"".into()),
        (SyntaxKind::AsSafe, "as?".into()),
        (SyntaxKind::Identifier, "String".into()),
    ];
    assert_eq!(dump_non_trivia(input), expected);
}

#[test]
fn parse_is_lossless_even_with_errors() {
    let inputs = [
        "package a.b\n\nimport c.D\n\nclass E<T>(val t: T) : D() { fun f() = t }\n",
        "fun broken( { val = }\n",
        "val x = when (y) { 1, 2 -> \"a\" else -> { b } }",
        "/* unterminated",
    ];
    for input in inputs {
        let parse = parse_kotlin(input);
        assert_eq!(parse.syntax().text().to_string(), input);
        assert_eq!(parse.syntax().kind(), SyntaxKind::KtFile);
        for error in &parse.errors {
            assert!(error.range.end as usize <= input.len(), "{error:?} out of range");
        }
    }
    assert!(!parse_kotlin("fun broken( { val = }\n").errors.is_empty());
}

#[test]
fn stray_at_signs_become_error_nodes() {
    let inputs = [
        "@",
        "label@",
        "return@",
        "@ class A",
        "class A { @ }",
        "f(@)",
        "class A(@)",
        "x = break@",
        "a@",
        "@1",
    ];
    for input in inputs {
        for file_kind in [FileKind::Source, FileKind::Script] {
            let opts = ParseOptions {
                file_kind,
                ..ParseOptions::default()
            };
            let parse = parse_kotlin_with_options(input, opts).result;
            assert_eq!(parse.syntax().text().to_string(), input, "{file_kind:?}");
            assert!(!parse.errors.is_empty(), "{input:?} as {file_kind:?} parsed cleanly");
        }
    }

    let parse = parse_kotlin("@ class A");
    let class = parse
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::Class)
        .expect("class after the stray annotation");
    assert!(class
        .children()
        .any(|child| child.kind() == SyntaxKind::ModifierList));
}

#[test]
fn fragments_have_dedicated_roots() {
    let expr = parse_kotlin_expression("a?.b ?: c");
    assert_eq!(expr.errors, Vec::new());
    assert_eq!(expr.syntax().kind(), SyntaxKind::ExpressionFragment);

    let ty = parse_kotlin_type("Map<String, List<Int>>?");
    assert_eq!(ty.errors, Vec::new());
    assert_eq!(ty.syntax().kind(), SyntaxKind::TypeFragment);

    let trailing = parse_kotlin_expression("a b");
    assert_eq!(trailing.errors.len(), 1);
    assert_eq!(trailing.syntax().text().to_string(), "a b");
}

#[test]
fn token_at_offset_finds_identifier() {
    let parse = parse_kotlin("fun answer() = 42");
    let token = parse
        .token_at_offset(5)
        .right_biased()
        .expect("token at offset");
    assert_eq!(token.kind(), SyntaxKind::Identifier);
    assert_eq!(token.text(), "answer");
}

#[test]
fn options_select_script_mode_and_version() {
    let opts = ParseOptions {
        language_version: LanguageVersion::KOTLIN_1_3,
        file_kind: FileKind::from_path(std::path::Path::new("build.gradle.kts")),
    };
    assert_eq!(opts.file_kind, FileKind::Script);

    let parse = parse_kotlin_with_options("println(\"hi\")\nval x = 1\n", opts);
    assert_eq!(parse.result.errors, Vec::new());
    let root = parse.result.syntax();
    assert!(root.children().any(|child| child.kind() == SyntaxKind::Script));

    assert_eq!(ParseOptions::default().file_kind, FileKind::Source);
}

/// Fragments that exercise every lexer mode: templates, raw strings,
/// nested comments, backticked names and unterminated literals.
fn kotlin_fragment() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        prop::sample::select(vec![
            "fun", "val", "var", "class", "when", "in", "!in", "is", "as?", "?.", "?:", "::",
            "->", "..<", "&&", "||", "++", "@", "#", "`a b`", "0x1F", "1_000L", "1.5e-3f",
            "'\\n'", "'x", "\"a${b}c\"", "\"$x\"", "\"\"\"raw ${ {} }\"\"\"", "\"open",
            "/* a /* b */ c */", "/* open", "// line", "\n", " ", "\t", "{", "}", "(", ")",
        ])
        .prop_map(str::to_string),
        "[ -~]{0,6}",
        "\\PC{0,3}",
    ];
    prop::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
}

/// Whole tokens, including the label and annotation forms of `@`, glued
/// with and without separating whitespace.
fn kotlin_token_soup() -> impl Strategy<Value = String> {
    let token = prop::sample::select(vec![
        "@", "label@", "return@", "break@", "@Ann", "@file:", "a", "x", "1", "\"s\"", "class",
        "interface", "object", "fun", "val", "var", "typealias", "constructor", "init",
        "private", "data", "enum", "companion", "return", "break", "this", "super", "if",
        "else", "when", "for", "while", "do", "try", "catch", "in", "is", "as", "by", "where",
        "package", "import", "(", ")", "{", "}", "[", "]", "<", ">", ",", ".", ":", ";", "=",
        "->", "?", "!!", "+", "-", "*", "&&", "::", "\n",
    ]);
    let separator = prop::sample::select(vec!["", " ", "\n"]);
    prop::collection::vec((token, separator), 0..32).prop_map(|pieces| {
        pieces
            .into_iter()
            .flat_map(|(token, separator)| [token, separator])
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn parser_terminates_and_is_lossless(input in kotlin_token_soup()) {
        for file_kind in [FileKind::Source, FileKind::Script] {
            let opts = ParseOptions {
                file_kind,
                ..ParseOptions::default()
            };
            let parse = parse_kotlin_with_options(&input, opts).result;
            prop_assert_eq!(parse.syntax().text().to_string(), input.clone());
            prop_assert_eq!(parse.syntax().kind(), SyntaxKind::KtFile);
        }
    }

    #[test]
    fn lexer_is_lossless(input in kotlin_fragment()) {
        let tokens = lex(&input);
        let mut offset = 0u32;
        for token in &tokens {
            prop_assert_eq!(token.range.start, offset, "gap before {:?} in {:?}", token, input);
            offset = token.range.end;
        }
        prop_assert_eq!(offset as usize, input.len());
        let joined: String = tokens.iter().map(|token| token.text(&input)).collect();
        prop_assert_eq!(joined, input.clone());
    }
}
