//! Real Time Messaging websocket loop.
//!
//! Connects via `rtm.connect`, loads the channel/user directory, then feeds
//! every frame to the event sink. Frames are handled one at a time: the next
//! frame is not read until the sink has finished with the current one.

use std::sync::Arc;

use {
    futures::StreamExt,
    regina_channels::{EventSink, IncomingEvent},
    serde_json::Value,
    tokio_tungstenite::tungstenite::Message as WsMessage,
    tracing::{debug, info, warn},
};

use crate::{Result, transport::SlackTransport};

/// A decoded RTM frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// The server accepted the connection.
    Hello,
    /// The server is about to close the connection.
    Goodbye,
    /// Any typed event, messages included.
    Event(IncomingEvent),
    /// Replies to our own sends and other untyped frames.
    Ignored,
}

/// Decode one websocket text frame.
pub fn parse_frame(text: &str) -> Result<Frame> {
    let value: Value = serde_json::from_str(text)?;
    let frame = match value["type"].as_str() {
        Some("hello") => Frame::Hello,
        Some("goodbye") => Frame::Goodbye,
        Some(_) => Frame::Event(serde_json::from_value(value)?),
        None => Frame::Ignored,
    };
    Ok(frame)
}

/// Connect the transport and pump events into `sink` until the server closes
/// the connection.
///
/// `sink.ready()` is called once, on the first `hello` frame, after the
/// directory has been loaded.
pub async fn run(transport: Arc<SlackTransport>, sink: Arc<dyn EventSink>) -> Result<()> {
    let session = transport.api().rtm_connect().await?;
    info!(bot_id = %session.bot.id, bot_name = %session.bot.name, "slack rtm session opened");

    transport.load_directory().await?;

    let (ws, _) = tokio_tungstenite::connect_async(session.url.as_str()).await?;
    info!("connected to slack rtm");
    let (_write, mut read) = ws.split();

    let mut announced = false;
    while let Some(msg) = read.next().await {
        let text = match msg {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(frame)) => {
                info!(?frame, "slack closed the rtm connection");
                break;
            },
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "slack rtm read failed");
                return Err(e.into());
            },
        };

        match parse_frame(text.as_str()) {
            Ok(Frame::Hello) => {
                if !announced {
                    announced = true;
                    sink.ready().await;
                }
            },
            Ok(Frame::Goodbye) => {
                info!("slack sent goodbye");
                break;
            },
            Ok(Frame::Event(event)) => sink.handle(event).await,
            Ok(Frame::Ignored) => {},
            Err(e) => debug!(error = %e, "ignoring undecodable rtm frame"),
        }
    }

    info!("slack rtm stream ended");
    Ok(())
}
