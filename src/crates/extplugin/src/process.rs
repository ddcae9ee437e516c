use crate::wire::{ExternalConfig, HandlerRequest, HandlerResponse, Rpc, RpcReply};
use imposter_base::{FileRef, Request, ResponseState};
use imposter_errors::plugin::PluginError;
use imposter_errors::ImposterError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};

/// One launched, handshaken child process cooperating over the external
/// plugin RPC protocol (spec.md §4.7).
pub struct ExternalPlugin {
    pub name: String,
    child: Child,
    reader: FramedRead<tokio::process::ChildStdout, LengthDelimitedCodec>,
    writer: FramedWrite<tokio::process::ChildStdin, LengthDelimitedCodec>,
}

impl ExternalPlugin {
    pub async fn launch(name: &str, executable: &Path) -> Result<Self, ImposterError> {
        let mut child = Command::new(executable)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|_| ImposterError::PluginError(PluginError::ExecutableNotFound(name.to_string())))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ImposterError::PluginError(PluginError::PluginExited(name.to_string())))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ImposterError::PluginError(PluginError::PluginExited(name.to_string())))?;

        let mut plugin = Self {
            name: name.to_string(),
            child,
            reader: FramedRead::new(stdout, LengthDelimitedCodec::new()),
            writer: FramedWrite::new(stdin, LengthDelimitedCodec::new()),
        };
        plugin.handshake().await?;
        Ok(plugin)
    }

    async fn handshake(&mut self) -> Result<(), ImposterError> {
        use crate::wire::{Handshake, HANDSHAKE_COOKIE, PLUGIN_PROTOCOL_VERSION};
        use futures::{SinkExt, StreamExt};

        let ours = serde_json::to_vec(&Handshake::ours())
            .map_err(|e| wire_err(&self.name, e))?;
        self.writer
            .send(ours.into())
            .await
            .map_err(|e| wire_err(&self.name, e))?;

        let frame = self
            .reader
            .next()
            .await
            .ok_or_else(|| ImposterError::PluginError(PluginError::PluginExited(self.name.clone())))?
            .map_err(|e| wire_err(&self.name, e))?;

        let theirs: Handshake = serde_json::from_slice(&frame)
            .map_err(|_| ImposterError::PluginError(PluginError::HandshakeFailed(self.name.clone())))?;

        if theirs.cookie != HANDSHAKE_COOKIE {
            return Err(ImposterError::PluginError(PluginError::HandshakeFailed(self.name.clone())));
        }
        if theirs.version != PLUGIN_PROTOCOL_VERSION {
            return Err(ImposterError::PluginError(PluginError::UnsupportedProtocolVersion(
                self.name.clone(),
                theirs.version,
            )));
        }
        Ok(())
    }

    async fn call(&mut self, rpc: Rpc) -> Result<RpcReply, ImposterError> {
        use futures::{SinkExt, StreamExt};

        let bytes = serde_json::to_vec(&rpc).map_err(|e| wire_err(&self.name, e))?;
        self.writer.send(bytes.into()).await.map_err(|e| wire_err(&self.name, e))?;

        let frame = self
            .reader
            .next()
            .await
            .ok_or_else(|| ImposterError::PluginError(PluginError::PluginExited(self.name.clone())))?
            .map_err(|e| wire_err(&self.name, e))?;

        serde_json::from_slice(&frame).map_err(|e| wire_err(&self.name, e))
    }

    pub async fn configure(&mut self, config: ExternalConfig) -> Result<(), ImposterError> {
        match self.call(Rpc::Configure(config)).await? {
            RpcReply::Configured => Ok(()),
            RpcReply::Error(msg) => Err(ImposterError::PluginError(PluginError::WireError(self.name.clone(), msg))),
            other => Err(unexpected_reply(&self.name, &other)),
        }
    }

    /// Sends one `Handle` RPC. Returns `Ok(None)` when the reply's status is
    /// `0`/`404` (not a claim, per the dispatch policy in spec.md §4.7).
    pub async fn handle(&mut self, request: &Request) -> Result<Option<HandlerResponse>, ImposterError> {
        let wire_request = to_handler_request(request);
        match self.call(Rpc::Handle(wire_request)).await? {
            RpcReply::Handled(response) => {
                if response.status == 0 || response.status == 404 {
                    Ok(None)
                } else {
                    Ok(Some(response))
                }
            }
            RpcReply::Error(msg) => Err(ImposterError::PluginError(PluginError::WireError(self.name.clone(), msg))),
            other => Err(unexpected_reply(&self.name, &other)),
        }
    }

    pub async fn shutdown(mut self) {
        use futures::SinkExt;
        if let Ok(bytes) = serde_json::to_vec(&Rpc::Shutdown) {
            let _ = self.writer.send(bytes.into()).await;
        }
        let _ = self.child.start_kill();
        let _ = self.child.wait().await;
    }
}

fn wire_err(name: &str, err: impl std::fmt::Display) -> ImposterError {
    ImposterError::PluginError(PluginError::WireError(name.to_string(), err.to_string()))
}

fn unexpected_reply(name: &str, reply: &RpcReply) -> ImposterError {
    ImposterError::PluginError(PluginError::WireError(
        name.to_string(),
        format!("unexpected reply {reply:?}"),
    ))
}

fn to_handler_request(request: &Request) -> HandlerRequest {
    let headers = request
        .headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let query = request
        .query
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    HandlerRequest {
        method: request.method.clone(),
        path: request.path.clone(),
        headers,
        query,
        body: request.body.clone(),
    }
}

/// Applies a `HandlerResponse` onto the Exchange's `ResponseState`, mirroring
/// the in-process `imposter-response` builder's field semantics.
pub fn apply_handler_response(response: HandlerResponse, state: &mut ResponseState) {
    state.status = response.status;
    for (name, value) in response.headers {
        state.headers.set(name, value);
    }
    if let Some(file_name) = response.file_name.or(response.file) {
        state.file = Some(FileRef {
            base_dir: response.file_base_dir.unwrap_or_default(),
            file_name,
        });
    } else {
        state.body = response.body;
    }
    state.mark_handled();
}
