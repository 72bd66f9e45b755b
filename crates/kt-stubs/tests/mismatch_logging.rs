//! Stale stubs are reported through `tracing` and degrade to the tree's
//! answer where one exists.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kt_stubs::{LazyFile, StubError, StubRef};
use kt_syntax::{AstNode, FileKind, Property, SyntaxKind};
use tracing::{field::Visit, Event, Level};
use tracing_subscriber::{layer::Context, prelude::*, Layer};

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    fields: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct CapturingLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturingLayer {
    fn errors(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .expect("events mutex poisoned")
            .iter()
            .filter(|event| event.level == Level::ERROR)
            .cloned()
            .collect()
    }
}

impl<S> Layer<S> for CapturingLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events
            .lock()
            .expect("events mutex poisoned")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                fields: visitor.fields,
            });
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, CapturingLayer) {
    let layer = CapturingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, layer)
}

fn stale(stub_source: &str, current_source: &str) -> LazyFile {
    let stubs = LazyFile::parsed(stub_source, FileKind::Source)
        .unwrap()
        .stubs()
        .clone();
    LazyFile::new(stubs, current_source.to_string())
}

#[test]
fn structural_mismatch_is_logged_and_returned() {
    let file = stale("class A\nfun f() {}\n", "class A\nval f = 1\n");
    let (result, layer) = capture(|| file.materialize().map(|_| ()));

    match result {
        Err(StubError::Mismatch { kind, .. }) => assert_eq!(kind, SyntaxKind::Fun),
        other => panic!("expected a mismatch, got {other:?}"),
    }
    let errors = layer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].fields.get("target").map(String::as_str), Some("kt.stubs"));
    assert!(errors[0].fields["err"].contains("Fun"));
}

#[test]
fn stub_attribute_drift_fails_verification() {
    let file = stale("fun f(x: Int = 0) {}\n", "fun f(x: Int) {}\n");
    let (result, layer) = capture(|| file.verify());

    assert!(matches!(
        result,
        Err(StubError::Mismatch {
            kind: SyntaxKind::ValueParameter,
            ..
        })
    ));
    assert_eq!(layer.errors().len(), 1);
}

#[test]
fn type_reference_count_check_degrades_to_the_tree() {
    // Same stub shape, but the current source has gained a receiver.
    let file = stale("val x: Int = 1\n", "val String.x: Int = 1\n");
    let property = file
        .declarations()
        .into_iter()
        .find_map(StubRef::downcast::<Property>)
        .unwrap();

    let (ty, layer) = capture(|| property.type_reference());
    let ty = ty.unwrap().unwrap();
    assert_eq!(ty.text().trim(), "Int");

    let errors = layer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].fields.get("expected").map(String::as_str), Some("1"));
    assert_eq!(errors[0].fields.get("found").map(String::as_str), Some("2"));
    assert_eq!(property.syntax().unwrap().kind(), SyntaxKind::Property);
}
