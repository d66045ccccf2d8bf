//! Line-delimited JSON call protocol
//!
//! Each request is one JSON object per line:
//!
//! ```json
//! {"id": 1, "method": "get_functions"}
//! {"id": 2, "method": "call_function", "params": {"name": "merge_objects", "arguments": [{"record": {}}]}}
//! ```
//!
//! and gets exactly one response line carrying either `result` or `error`.
//! Arguments and results use the typed value encoding so that unknown
//! values survive the trip.

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use deepmerge_core::Value;
use deepmerge_runtime::{FunctionError, Provider};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use serde_json::value::RawValue;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, debug_span, info, warn, Instrument};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<CallParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Value>,
}

/// Wire form of a request. Arguments stay raw until the header has been read,
/// so a bad argument still gets a response carrying the request id.
#[derive(Deserialize)]
struct RawRequest<'a> {
    id: u64,
    method: String,
    #[serde(borrow, default)]
    params: Option<RawCallParams<'a>>,
}

#[derive(Deserialize)]
struct RawCallParams<'a> {
    name: String,
    #[serde(borrow, default)]
    arguments: Vec<&'a RawValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// `None` when the request was too malformed to carry an id
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FunctionError>,
}

impl Response {
    pub fn success(id: u64, result: serde_json::Value) -> Self {
        Self {
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<u64>, error: FunctionError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Routes requests to the provider's functions.
///
/// Cloning is cheap; every clone shares the same immutable provider.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    provider: Arc<Provider>,
    config: ServerConfig,
}

impl Dispatcher {
    pub fn new(provider: Arc<Provider>, config: ServerConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Decode one request line and handle it.
    pub async fn handle_line(&self, line: &str) -> Response {
        let raw = match serde_json::from_str::<RawRequest>(line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Malformed request: {}", e);
                return Response::failure(
                    None,
                    FunctionError::new(format!("malformed request: {}", e)),
                );
            }
        };

        let id = raw.id;
        let span = debug_span!("request", id, method = %raw.method);
        match self.decode(raw) {
            Ok(request) => self.handle(request).instrument(span).await,
            Err(error) => span.in_scope(|| reject(id, error)),
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        let id = request.id;
        let outcome = match request.method.as_str() {
            "get_functions" => encode(&self.provider.signatures()),
            "call_function" => match request.params {
                Some(params) => match self.call(&params.name, params.arguments).await {
                    Ok(value) => encode(&value),
                    Err(e) => Err(e),
                },
                None => Err(FunctionError::new("call_function requires params")),
            },
            other => Err(FunctionError::new(format!("unknown method {:?}", other))),
        };

        match outcome {
            Ok(result) => Response::success(id, result),
            Err(error) => reject(id, error),
        }
    }

    fn decode(&self, raw: RawRequest<'_>) -> Result<Request, FunctionError> {
        let params = match raw.params {
            Some(params) => Some(CallParams {
                arguments: params
                    .arguments
                    .iter()
                    .enumerate()
                    .map(|(index, argument)| self.decode_argument(index, argument))
                    .collect::<Result<Vec<_>, FunctionError>>()?,
                name: params.name,
            }),
            None => None,
        };

        Ok(Request {
            id: raw.id,
            method: raw.method,
            params,
        })
    }

    fn decode_argument(&self, index: usize, raw: &RawValue) -> Result<Value, FunctionError> {
        serde_json::from_str(raw.get()).map_err(|e| match e.classify() {
            // The raw text already parsed, so only the nesting limit is left.
            Category::Syntax => FunctionError::argument(
                index,
                format!(
                    "argument nests too deeply to decode, the limit is {}",
                    self.config.max_nesting_depth
                ),
            ),
            _ => FunctionError::argument(index, format!("invalid argument: {}", e)),
        })
    }

    /// Call a function by name, enforcing the nesting limit and deadline.
    ///
    /// The merge itself cannot be interrupted; on timeout the caller gets an
    /// error while the computation finishes on the blocking pool.
    pub async fn call(&self, name: &str, arguments: Vec<Value>) -> Result<Value, FunctionError> {
        self.check_depth(&arguments)?;

        let provider = Arc::clone(&self.provider);
        let function = name.to_string();
        let task = tokio::task::spawn_blocking(move || provider.call(&function, arguments));

        let joined = match self.config.call_timeout() {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
                warn!(function = name, "call exceeded deadline");
                FunctionError::new(format!(
                    "call to {:?} exceeded the {}ms deadline",
                    name,
                    limit.as_millis()
                ))
            })?,
            None => task.await,
        };

        joined.map_err(|e| FunctionError::new(format!("call to {:?} failed: {}", name, e)))?
    }

    fn check_depth(&self, arguments: &[Value]) -> Result<(), FunctionError> {
        let limit = self.config.max_nesting_depth;
        for (index, argument) in arguments.iter().enumerate() {
            let depth = argument.depth();
            if depth > limit {
                return Err(FunctionError::argument(
                    index,
                    format!("argument nests {} levels deep, the limit is {}", depth, limit),
                ));
            }
        }
        Ok(())
    }
}

fn reject(id: u64, error: FunctionError) -> Response {
    debug!(error = %error, argument = ?error.argument, "request failed");
    Response::failure(Some(id), error)
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, FunctionError> {
    serde_json::to_value(value)
        .map_err(|e| FunctionError::new(format!("failed to encode result: {}", e)))
}

/// Counters for one protocol session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub requests: usize,
    pub errors: usize,
}

/// Answer requests from `reader` on `writer` until end of input.
///
/// Blank lines are skipped. Malformed lines get an error response and the
/// session continues.
pub async fn serve<R, W>(dispatcher: &Dispatcher, reader: R, writer: &mut W) -> Result<ServeSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!(
        functions = ?dispatcher.provider().names().collect::<Vec<_>>(),
        "Serving function calls"
    );

    let mut summary = ServeSummary::default();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        if line.trim().is_empty() {
            continue;
        }

        let response = dispatcher.handle_line(&line).await;
        summary.requests += 1;
        if response.is_error() {
            summary.errors += 1;
        }

        let mut encoded = serde_json::to_vec(&response).context("Failed to encode response")?;
        encoded.push(b'\n');
        writer
            .write_all(&encoded)
            .await
            .context("Failed to write response")?;
        writer.flush().await.context("Failed to write response")?;
    }

    info!(
        requests = summary.requests,
        errors = summary.errors,
        "Session finished"
    );
    Ok(summary)
}
