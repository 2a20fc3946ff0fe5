//! Stdio serving loop
//!
//! Reads one JSON-RPC message per line, dispatches it and writes one
//! response per line. Lines that are not UTF-8 get a parse error reply.
//! Runs until EOF or the shutdown future resolves.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::error::ToolError;
use crate::executor::{Executor, ToolRequest};
use crate::protocol::{
    parse_request, CallToolParams, CallToolResult, Request, Response, RpcError, PROTOCOL_VERSION,
};
use crate::registry::Registry;

pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct Server {
    registry: Registry,
    executor: Executor,
    name: String,
}

impl Server {
    pub fn new(registry: Registry, executor: Executor) -> Self {
        Self {
            registry,
            executor,
            name: SERVER_NAME.to_string(),
        }
    }

    /// Name reported by `initialize`, e.g. the selected agent
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        match parse_request(line) {
            Ok(request) => self.handle_request(request).await,
            Err(response) => {
                warn!("Rejected message: {:?}", response.error);
                Some(response)
            }
        }
    }

    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        debug!("Received method={} id={:?}", request.method, request.id);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "tools/list" => Ok(json!({ "tools": self.registry.list_tools() })),
            "tools/call" => self.call_tool(request.params).await,
            "ping" => Ok(json!({})),
            other if request.id.is_none() => {
                debug!("Ignoring notification {other}");
                return None;
            }
            other => Err(RpcError::method_not_found(other)),
        };

        let id = request.id?;
        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::error(id, error),
        })
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": { "name": self.name, "version": SERVER_VERSION },
            "capabilities": { "tools": {} },
        })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, RpcError> {
        let params: CallToolParams =
            serde_json::from_value(params).map_err(RpcError::invalid_params)?;

        let result = match self
            .executor
            .execute(&self.registry, ToolRequest::new(&params.name, params.arguments))
            .await
        {
            Ok(output) => {
                let text = serde_json::to_string_pretty(&output.content)
                    .map_err(|e| RpcError::internal_error(format!("unserializable result: {e}")))?;
                CallToolResult::text(text, false)
            }
            Err(err @ (ToolError::NotFound(_) | ToolError::Validation { .. })) => {
                return Err(RpcError::from(&err));
            }
            Err(err) => CallToolResult::text(err.to_string(), true),
        };

        serde_json::to_value(result).map_err(RpcError::internal_error)
    }

    /// Serve until EOF on `reader` or until `shutdown` resolves
    pub async fn serve<R, W, S>(&self, mut reader: R, mut writer: W, shutdown: S) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        info!(
            "Serving {} tools over stdio as {}",
            self.registry.tool_count(),
            self.name
        );
        tokio::pin!(shutdown);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping serve loop");
                    break;
                }
                read = reader.read_until(b'\n', &mut buf) => {
                    if read.context("Failed to read from input")? == 0 {
                        info!("Input closed, stopping serve loop");
                        break;
                    }
                    let response = match std::str::from_utf8(&buf) {
                        Ok(line) if line.trim().is_empty() => continue,
                        Ok(line) => self.handle_line(line).await,
                        Err(e) => {
                            warn!("Rejected message that is not UTF-8: {e}");
                            Some(Response::error(
                                Value::Null,
                                RpcError::parse_error(format!("message is not valid UTF-8: {e}")),
                            ))
                        }
                    };
                    if let Some(response) = response {
                        let mut encoded = serde_json::to_vec(&response)
                            .context("Failed to encode response")?;
                        encoded.push(b'\n');
                        writer.write_all(&encoded).await.context("Failed to write response")?;
                        writer.flush().await.context("Failed to flush output")?;
                    }
                }
            }
        }

        writer.flush().await.context("Failed to flush output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, TOOL_NOT_FOUND};
    use crate::registry::make_tool;
    use crate::schema::{InputSchema, PropertySchema};
    use std::time::Duration;

    fn test_server() -> Server {
        let mut reg = Registry::new();
        reg.register_tool(
            make_tool(
                "echo",
                "Echo the code back",
                InputSchema::object().required("code", PropertySchema::string("Code")),
            ),
            |args| Ok(json!({ "code": args["code"] })),
        )
        .unwrap();
        reg.register_tool(make_tool("fail", "Always fails", InputSchema::object()), |_| {
            anyhow::bail!("boom")
        })
        .unwrap();
        Server::new(reg, Executor::with_timeout(Duration::from_secs(5)))
    }

    async fn call(server: &Server, line: &str) -> Response {
        server.handle_line(line).await.expect("response expected")
    }

    #[tokio::test]
    async fn test_initialize() {
        let resp = call(&test_server(), r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#).await;
        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let resp = call(&test_server(), r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        let tools = resp.result.unwrap()["tools"].clone();
        assert_eq!(tools.as_array().unwrap().len(), 2);
        assert_eq!(tools[0]["name"], "echo");
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["code"]));
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let resp = call(
            &test_server(),
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"echo","arguments":{"code":"x"}}}"#,
        )
        .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["code"], "x");
    }

    #[tokio::test]
    async fn test_tools_call_handler_failure_is_flagged_result() {
        let resp = call(
            &test_server(),
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"fail"}}"#,
        )
        .await;
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let resp = call(
            &test_server(),
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#,
        )
        .await;
        let error = resp.error.unwrap();
        assert_eq!(error.code, TOOL_NOT_FOUND);
        assert_eq!(error.data.unwrap()["kind"], "tool_not_found");
    }

    #[tokio::test]
    async fn test_tools_call_validation_error() {
        let resp = call(
            &test_server(),
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"echo","arguments":{}}}"#,
        )
        .await;
        let error = resp.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.data.unwrap()["kind"], "validation_error");
    }

    #[tokio::test]
    async fn test_tools_call_missing_params() {
        let resp = call(&test_server(), r#"{"jsonrpc":"2.0","id":7,"method":"tools/call"}"#).await;
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let line = r#"{"jsonrpc":"2.0","id":8,"method":"resources/list"}"#;
        let resp = call(&test_server(), line).await;
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = test_server();
        let line = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        assert!(server.handle_line(line).await.is_none());
        let ping = r#"{"jsonrpc":"2.0","method":"ping"}"#;
        assert!(server.handle_line(ping).await.is_none());
    }

    #[tokio::test]
    async fn test_serve_until_eof() {
        let server = test_server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            "not json\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        server
            .serve(input.as_bytes(), &mut output, std::future::pending())
            .await
            .unwrap();

        let responses: Vec<Response> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].id, json!(1));
        assert_eq!(responses[1].error.as_ref().unwrap().code, PARSE_ERROR);
        assert_eq!(responses[2].id, json!(2));
    }

    #[tokio::test]
    async fn test_serve_survives_invalid_utf8() {
        let server = test_server();
        let mut input = Vec::new();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
        input.extend_from_slice(b"\n");

        let mut output = Vec::new();
        server
            .serve(input.as_slice(), &mut output, std::future::pending())
            .await
            .unwrap();

        let responses: Vec<Response> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].id, json!(1));
        assert_eq!(responses[1].id, Value::Null);
        assert_eq!(responses[1].error.as_ref().unwrap().code, PARSE_ERROR);
        assert_eq!(responses[2].id, json!(2));
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let server = test_server();
        let (client, server_side) = tokio::io::duplex(64);
        let reader = tokio::io::BufReader::new(server_side);
        let mut output = Vec::new();

        let result = server.serve(reader, &mut output, async {}).await;
        assert!(result.is_ok());
        assert!(output.is_empty());
        drop(client);
    }
}
