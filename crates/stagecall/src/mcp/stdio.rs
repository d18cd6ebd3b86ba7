//! The stdio serve loop.

use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::mcp::types::*;
use crate::{tools, Session};

/// Serve MCP over stdin/stdout until EOF. Returns on clean shutdown; the
/// session is disconnected on the way out.
pub async fn serve(session: Arc<Session>) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    // All stdout writes funnel through one task so concurrent tool-call
    // replies cannot interleave bytes.
    let (out_tx, mut out_rx) = mpsc::channel::<String>(64);
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err()
                || stdout.write_all(b"\n").await.is_err()
                || stdout.flush().await.is_err()
            {
                return;
            }
        }
    });

    info!("stagecall MCP server on stdio");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let message: JsonRpcMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "unparseable frame on stdin");
                send(&out_tx, &JsonRpcErrorResponse::new(None, PARSE_ERROR, e.to_string())).await;
                continue;
            }
        };

        if message.is_notification() {
            debug!(method = %message.method, "notification");
            continue;
        }
        let id = message.id.clone().expect("checked by is_notification");

        match message.method.as_str() {
            "initialize" => {
                let result = json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": "stagecall",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                });
                send(&out_tx, &JsonRpcResponse::new(id, result)).await;
            }
            "ping" => {
                send(&out_tx, &JsonRpcResponse::new(id, json!({}))).await;
            }
            "tools/list" => {
                let result = json!({ "tools": tools::list_tools() });
                send(&out_tx, &JsonRpcResponse::new(id, result)).await;
            }
            "tools/call" => {
                let params: CallToolParams = match message
                    .params
                    .ok_or_else(|| "missing params".to_string())
                    .and_then(|p| serde_json::from_value(p).map_err(|e| e.to_string()))
                {
                    Ok(params) => params,
                    Err(e) => {
                        send(&out_tx, &JsonRpcErrorResponse::new(Some(id), INVALID_PARAMS, e))
                            .await;
                        continue;
                    }
                };

                // One task per tool call; calls run concurrently and the
                // per-address locks below keep the wire sane.
                let session = Arc::clone(&session);
                let out_tx = out_tx.clone();
                tokio::spawn(async move {
                    let args = params.arguments.unwrap_or_else(|| json!({}));
                    let outcome = tools::dispatch(&session, &params.name, args).await;
                    let result = json!({
                        "content": [{ "type": "text", "text": outcome.render_message() }],
                        "structuredContent": outcome.to_json(),
                        "isError": !outcome.success,
                    });
                    send(&out_tx, &JsonRpcResponse::new(id, result)).await;
                });
            }
            other => {
                send(
                    &out_tx,
                    &JsonRpcErrorResponse::new(
                        Some(id),
                        METHOD_NOT_FOUND,
                        format!("unknown method: {other}"),
                    ),
                )
                .await;
            }
        }
    }

    info!("stdin closed, shutting down");
    session.disconnect().await;
    drop(out_tx);
    let _ = writer.await;
    Ok(())
}

async fn send<T: serde::Serialize>(out_tx: &mpsc::Sender<String>, frame: &T) {
    match serde_json::to_string(frame) {
        Ok(line) => {
            let _ = out_tx.send(line).await;
        }
        Err(e) => warn!(error = %e, "failed to serialize response frame"),
    }
}
