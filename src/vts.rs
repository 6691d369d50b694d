//! VTube Studio control endpoint
//!
//! Minimal client for the VTube Studio Public API over WebSocket: connect,
//! token-based authentication handshake, close. The plugin token is read
//! from a fixed local path and persisted there when first granted.

use crate::config::Config;
use crate::session::ControlEndpoint;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const API_NAME: &str = "VTubeStudioPublicAPI";
const API_VERSION: &str = "1.0";

pub struct VtsClient {
    url: String,
    token_path: PathBuf,
    plugin_name: String,
    plugin_developer: String,
    ws: Option<WsStream>,
    request_seq: u64,
}

impl VtsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.vts_url.clone(),
            token_path: PathBuf::from(&config.vts_token_path),
            plugin_name: config.plugin_name.clone(),
            plugin_developer: config.plugin_developer.clone(),
            ws: None,
            request_seq: 0,
        }
    }

    /// Send one API request and wait for its response frame.
    async fn request(&mut self, message_type: &str, data: Value) -> Result<Value> {
        self.request_seq += 1;
        let request_id = format!("yumi-{}", self.request_seq);
        let ws = self.ws.as_mut().context("session not connected")?;

        let request = json!({
            "apiName": API_NAME,
            "apiVersion": API_VERSION,
            "requestID": request_id,
            "messageType": message_type,
            "data": data,
        });
        debug!("-> {}", message_type);
        ws.send(Message::Text(request.to_string().into())).await?;

        while let Some(frame) = ws.next().await {
            match frame? {
                Message::Text(text) => {
                    let value: Value = serde_json::from_str(&text)?;
                    debug!("<- {}", value["messageType"]);
                    if value["messageType"] == "APIError" {
                        return Err(anyhow!(
                            "API error: {}",
                            value["data"]["message"].as_str().unwrap_or("unknown")
                        ));
                    }
                    return Ok(value);
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(_) => return Err(anyhow!("endpoint closed the connection")),
                other => return Err(anyhow!("unexpected frame: {:?}", other)),
            }
        }

        Err(anyhow!("connection lost while awaiting {}", message_type))
    }

    /// Read the durable plugin token, requesting and persisting a fresh one
    /// if none is stored yet.
    async fn load_or_request_token(&mut self) -> Result<String> {
        match std::fs::read_to_string(&self.token_path) {
            Ok(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => {
                info!("No stored token, requesting one from VTube Studio");
                let response = self
                    .request(
                        "AuthenticationTokenRequest",
                        json!({
                            "pluginName": self.plugin_name,
                            "pluginDeveloper": self.plugin_developer,
                        }),
                    )
                    .await?;

                let token = response["data"]["authenticationToken"]
                    .as_str()
                    .context("no authenticationToken in response")?
                    .to_string();

                if let Err(e) = std::fs::write(&self.token_path, &token) {
                    warn!("Could not persist token to {:?}: {}", self.token_path, e);
                }
                Ok(token)
            }
        }
    }
}

#[async_trait]
impl ControlEndpoint for VtsClient {
    async fn connect(&mut self) -> Result<()> {
        let (ws, _) = connect_async(self.url.as_str())
            .await
            .with_context(|| format!("failed to connect to {}", self.url))?;
        self.ws = Some(ws);
        info!("Connected to VTube Studio at {}", self.url);
        Ok(())
    }

    async fn authenticate(&mut self) -> Result<()> {
        let token = self.load_or_request_token().await?;

        let response = self
            .request(
                "AuthenticationRequest",
                json!({
                    "pluginName": self.plugin_name,
                    "pluginDeveloper": self.plugin_developer,
                    "authenticationToken": token,
                }),
            )
            .await?;

        if response["data"]["authenticated"].as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(anyhow!(
                "authentication rejected: {}",
                response["data"]["reason"].as_str().unwrap_or("unknown")
            ))
        }
    }

    async fn close(&mut self) -> Result<()> {
        // Taking the stream makes a second close a no-op.
        if let Some(mut ws) = self.ws.take() {
            ws.close(None).await.context("close frame failed")?;
        }
        Ok(())
    }
}
