use std::sync::{Arc, Mutex};
use std::time::Duration;

use sheetlint_lsp::Backend;
use tower_lsp::lsp_types::*;
use tower_lsp::{LanguageServer, LspService};
use tracing_subscriber::prelude::*;

struct LogCounter(Arc<Mutex<usize>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if visitor.0.contains("Validating document") {
            *self.0.lock().unwrap() += 1;
        }
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            use std::fmt::Write;
            let _ = write!(self.0, "{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }
}

#[tokio::test]
async fn test_did_change_validation_frequency() {
    let counter = Arc::new(Mutex::new(0));
    let subscriber = tracing_subscriber::registry().with(LogCounter(counter.clone()));

    // Try to set global default. If it fails, we might miss logs.
    let _ = tracing::subscriber::set_global_default(subscriber);

    let (service, _) = LspService::new(Backend::new);
    let uri = Url::parse("file:///tmp/test.css").unwrap();

    let _ = service
        .inner()
        .initialize(InitializeParams::default())
        .await;
    service.inner().initialized(InitializedParams {}).await;

    // Opening validates right away.
    service
        .inner()
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "css".to_string(),
                version: 0,
                text: "a { }\n".to_string(),
            },
        })
        .await;

    // Send 5 rapid changes
    for i in 1..=5u32 {
        service
            .inner()
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: uri.clone(),
                    version: i as i32,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: Some(Range::new(Position::new(0, 3 + i), Position::new(0, 3 + i))),
                    range_length: None,
                    text: "x".to_string(),
                }],
            })
            .await;

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // Default debounce is 300ms.
    tokio::time::sleep(Duration::from_millis(800)).await;

    let count = *counter.lock().unwrap();

    assert!(
        count <= 3,
        "Expected debouncing to reduce validations (actual: {})",
        count
    );
    assert!(
        count >= 2,
        "Expected the open and at least one change to validate (actual: {})",
        count
    );
}
