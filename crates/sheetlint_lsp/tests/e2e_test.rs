mod common;

use common::{next_diagnostics, recv_msg, send_msg};
use pretty_assertions::assert_eq;
use sheetlint_lsp::Backend;
use tower_lsp::LspService;
use tower_lsp::lsp_types::Url;

struct Harness {
    writer: tokio::io::DuplexStream,
    rx: tokio::sync::mpsc::UnboundedReceiver<String>,
    _root: tempfile::TempDir,
}

impl Harness {
    async fn start(config: Option<&str>) -> Self {
        let (client_read, server_write) = tokio::io::duplex(4096);
        let (server_read, client_write) = tokio::io::duplex(4096);

        let (service, socket) = LspService::new(Backend::new);
        tokio::spawn(async move {
            tower_lsp::Server::new(server_read, server_write, socket)
                .serve(service)
                .await;
        });

        let mut reader = tokio::io::BufReader::new(client_read);
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(msg) = recv_msg(&mut reader).await {
                if tx.send(msg).is_err() {
                    break;
                }
            }
        });

        let root = tempfile::tempdir().unwrap();
        if let Some(config) = config {
            std::fs::write(root.path().join(".sheetlint.json"), config).unwrap();
        }

        let mut harness = Self {
            writer: client_write,
            rx,
            _root: root,
        };
        let root_uri = Url::from_file_path(harness._root.path()).unwrap();
        harness
            .send(&format!(
                r#"{{"jsonrpc":"2.0","id":1,"method":"initialize","params":{{"rootUri":"{}","capabilities":{{}}}}}}"#,
                root_uri
            ))
            .await;
        let _resp = harness.rx.recv().await.unwrap();
        harness
            .send(r#"{"jsonrpc":"2.0","method":"initialized","params":{}}"#)
            .await;
        harness
    }

    async fn send(&mut self, msg: &str) {
        send_msg(&mut self.writer, msg).await;
    }

    async fn open(&mut self, uri: &str, text: &str) {
        let msg = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "textDocument/didOpen",
            "params": {
                "textDocument": { "uri": uri, "languageId": "css", "version": 1, "text": text }
            }
        });
        self.send(&msg.to_string()).await;
    }

    async fn change(&mut self, uri: &str, version: i32, range: [u32; 4], text: &str) {
        let msg = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "textDocument/didChange",
            "params": {
                "textDocument": { "uri": uri, "version": version },
                "contentChanges": [{
                    "range": {
                        "start": { "line": range[0], "character": range[1] },
                        "end": { "line": range[2], "character": range[3] }
                    },
                    "text": text
                }]
            }
        });
        self.send(&msg.to_string()).await;
    }
}

fn codes(params: &serde_json::Value) -> Vec<String> {
    params["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_open_publishes_diagnostics() {
    let mut lsp = Harness::start(None).await;
    let uri = "file:///tmp/sheet.css";

    lsp.open(uri, "a { }\nb { margin: 0px }").await;
    let params = next_diagnostics(&mut lsp.rx).await;

    assert_eq!(params["uri"], uri);
    assert_eq!(params["version"], 1);
    assert_eq!(codes(&params), vec!["block-no-empty", "length-zero-no-unit"]);
    assert_eq!(params["diagnostics"][0]["range"]["start"]["character"], 2);
    assert_eq!(params["diagnostics"][1]["severity"], 3);
}

#[tokio::test]
async fn test_incremental_change_updates_diagnostics() {
    let mut lsp = Harness::start(Some(r#"{ "debounce_ms": 20 }"#)).await;
    let uri = "file:///tmp/sheet.css";

    lsp.open(uri, "a { }\nb { color: red }\nc { }").await;
    let params = next_diagnostics(&mut lsp.rx).await;
    assert_eq!(codes(&params).len(), 2);

    // Fill the first block.
    lsp.change(uri, 2, [0, 4, 0, 4], "top: 1px ").await;
    let params = next_diagnostics(&mut lsp.rx).await;

    assert_eq!(params["version"], 2);
    assert_eq!(codes(&params), vec!["block-no-empty"]);
    assert_eq!(params["diagnostics"][0]["range"]["start"]["line"], 2);
}

#[tokio::test]
async fn test_workspace_config_disables_rules() {
    let mut lsp = Harness::start(Some(r#"{ "rules": { "block-no-empty": false } }"#)).await;
    let uri = "file:///tmp/sheet.css";

    lsp.open(uri, "a { }\nb { color: #ggg }").await;
    let params = next_diagnostics(&mut lsp.rx).await;

    assert_eq!(codes(&params), vec!["color-no-invalid-hex"]);
    assert_eq!(params["diagnostics"][0]["severity"], 1);
}

#[tokio::test]
async fn test_close_clears_diagnostics() {
    let mut lsp = Harness::start(None).await;
    let uri = "file:///tmp/sheet.css";

    lsp.open(uri, "a { }").await;
    next_diagnostics(&mut lsp.rx).await;

    let msg = serde_json::json!({
        "jsonrpc": "2.0",
        "method": "textDocument/didClose",
        "params": { "textDocument": { "uri": uri } }
    });
    lsp.send(&msg.to_string()).await;
    let params = next_diagnostics(&mut lsp.rx).await;

    assert!(params["diagnostics"].as_array().unwrap().is_empty());
}
