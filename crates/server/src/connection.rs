//! One WebSocket connection bridged to the lobby.
//!
//! Inbound text frames are decoded as [`ClientMessage`]s and forwarded to the
//! lobby; everything the lobby pushes into this connection's outbound channel
//! is encoded and written back. The lobby learns about the disconnect however
//! the socket ends.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use runtime::{ClientMessage, ConnectionId, LobbyHandle, RuntimeError, ServerMessage};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};
use tracing::{debug, info, warn};

type Sink = futures_util::stream::SplitSink<WebSocketStream<TcpStream>, Message>;

pub async fn serve(stream: TcpStream, peer: SocketAddr, lobby: LobbyHandle) -> Result<()> {
    let socket = accept_async(stream)
        .await
        .with_context(|| format!("websocket handshake with {peer} failed"))?;

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let id = lobby.connect(outbound_tx).await?;
    info!(target: "server::connection", conn = %id, %peer, "client connected");

    let result = pump(id, socket, outbound_rx, &lobby).await;

    lobby.disconnect(id).await?;
    info!(target: "server::connection", conn = %id, %peer, "client disconnected");
    result
}

async fn pump(
    id: ConnectionId,
    socket: WebSocketStream<TcpStream>,
    mut outbound_rx: mpsc::UnboundedReceiver<ServerMessage>,
    lobby: &LobbyHandle,
) -> Result<()> {
    let (mut write, mut read) = socket.split();

    loop {
        tokio::select! {
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => match ClientMessage::from_json(&text) {
                    Ok(message) => lobby.handle_message(id, message).await?,
                    Err(error) => {
                        debug!(target: "server::connection", conn = %id, %error, "malformed frame");
                        let reply = ServerMessage::error(RuntimeError::MalformedMessage(error).to_string());
                        send(&mut write, &reply).await?;
                    }
                },
                Some(Ok(Message::Binary(_))) => {
                    send(&mut write, &ServerMessage::error("Binary frames are not supported")).await?;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    warn!(target: "server::connection", conn = %id, %error, "socket error");
                    break;
                }
            },
            Some(message) = outbound_rx.recv() => send(&mut write, &message).await?,
        }
    }

    Ok(())
}

async fn send(write: &mut Sink, message: &ServerMessage) -> Result<()> {
    let text = message.to_json().context("failed to encode server message")?;
    write
        .send(Message::Text(text))
        .await
        .with_context(|| format!("failed to send {}", message.event_name()))
}
