use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kt_syntax::edit::TreeEditor;
use kt_syntax::precedence::are_parentheses_useless;
use kt_syntax::{AstNode, KtFile, ParenthesizedExpression};

const DECLARATIONS_KT: &str = include_str!("../testdata/declarations.kt");
const EXPRESSIONS_KT: &str = include_str!("../testdata/expressions.kt");

fn large_kotlin_source() -> String {
    let mut out = String::from("package bench\n\nclass Large {\n");
    for i in 0..1000u32 {
        out.push_str(&format!(
            "    fun method{0}(x: Int): Int {{ val y = (x + {0}) * 2; return (y) }}\n",
            i
        ));
    }
    out.push_str("}\n");
    out
}

fn bench_parse_kotlin(c: &mut Criterion) {
    let large = large_kotlin_source();

    let mut group = c.benchmark_group("syntax_parse_kotlin");
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(20);

    for (id, src) in [
        ("declarations", DECLARATIONS_KT),
        ("expressions", EXPRESSIONS_KT),
        ("large", large.as_str()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(id), src, |b, src| {
            b.iter(|| black_box(kt_syntax::parse_kotlin(black_box(src))))
        });
    }

    group.finish();
}

fn bench_parentheses(c: &mut Criterion) {
    let large = large_kotlin_source();
    let file = KtFile::cast(kt_syntax::parse_kotlin(&large).syntax())
        .expect("bench source must parse to a file");

    let mut group = c.benchmark_group("syntax_parentheses");
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(20);

    group.bench_function("query", |b| {
        b.iter(|| {
            file.syntax()
                .descendants()
                .filter_map(ParenthesizedExpression::cast)
                .filter(are_parentheses_useless)
                .count()
        })
    });

    group.bench_function("remove_useless", |b| {
        b.iter(|| {
            let mut editor = TreeEditor::new(black_box(&file));
            black_box(editor.remove_useless_parentheses())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse_kotlin, bench_parentheses);
criterion_main!(benches);
