use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tracing::{debug, info};

/// Connects to `url`, sends every entry of `outgoing` as a text frame, then
/// collects incoming data frames until none arrives for `idle`.
///
/// Binary frames are returned lossily decoded as UTF-8.
pub async fn exchange(url: &str, outgoing: &[String], idle: Duration) -> Result<Vec<String>, WsError> {
    let (mut ws_stream, _response) = connect_async(url).await?;
    info!("connected to {url}");

    for text in outgoing {
        ws_stream.send(WsMessage::text(text.clone())).await?;
    }

    let mut received = Vec::new();
    while let Ok(frame) = timeout(idle, ws_stream.next()).await {
        match frame {
            Some(Ok(WsMessage::Text(text))) => received.push(text.as_str().to_owned()),
            Some(Ok(WsMessage::Binary(data))) => {
                received.push(String::from_utf8_lossy(&data).into_owned())
            }
            Some(Ok(WsMessage::Close(_))) | None => break,
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e),
        }
    }

    if let Err(e) = ws_stream.close(None).await {
        debug!(error = %e, "close handshake failed");
    }
    Ok(received)
}
