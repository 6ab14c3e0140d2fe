// WebSocket server for guess submissions.

use std::sync::Arc;

use futures_util::stream::Stream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};
use woertle_core::WordRepository;

use crate::service::GuessService;

/// Replies buffered per connection before the reader waits for the writer.
const REPLY_BUFFER: usize = 32;

/// Bind the game listener on `127.0.0.1:{port}`. Port 0 picks a free port.
pub async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    info!("WebSocket server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accept connections forever, serving each one on its own task.
///
/// Every text frame is answered with exactly one text frame. The server runs
/// until the task is cancelled or accepting fails.
pub async fn run<R>(listener: TcpListener, service: Arc<GuessService<R>>) -> anyhow::Result<()>
where
    R: WordRepository + Send + Sync + 'static,
{
    loop {
        let (stream, addr) = listener.accept().await?;
        let addr_str = addr.to_string();
        info!("Accepted TCP connection from {addr_str}");

        let service = Arc::clone(&service);
        tokio::spawn(async move {
            serve_connection(stream, addr_str, service).await;
        });
    }
}

async fn serve_connection<R>(stream: TcpStream, addr: String, service: Arc<GuessService<R>>)
where
    R: WordRepository + Send + Sync + 'static,
{
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed for {addr}: {e}");
            return;
        }
    };

    let (mut write, read) = ws_stream.split();
    let (reply_tx, mut reply_rx) = mpsc::channel::<Message>(REPLY_BUFFER);

    let writer_addr = addr.clone();
    let writer = tokio::spawn(async move {
        while let Some(msg) = reply_rx.recv().await {
            if let Err(e) = write.send(msg).await {
                warn!("Failed to send reply to {writer_addr}: {e}");
                break;
            }
        }
    });

    // Err only means the writer is gone; the connection is over either way.
    let _ = process_message_stream(read, &reply_tx, &service, &addr).await;

    drop(reply_tx);
    let _ = writer.await;
    info!("Client {addr} disconnected");
}

/// Answer every text message from `stream` through `tx`. Returns `Err(())` if
/// the reply channel is closed, signalling the caller to stop.
///
/// Generic over the stream type so it can be tested with in-memory streams
/// without opening TCP ports.
pub async fn process_message_stream<St, R>(
    mut stream: St,
    tx: &mpsc::Sender<Message>,
    service: &GuessService<R>,
    addr: &str,
) -> Result<(), ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    R: WordRepository,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let reply = service.handle_text(text.as_str());
                let json = match serde_json::to_string(&reply) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to encode reply for {addr}: {e}");
                        continue;
                    }
                };
                if tx.send(Message::Text(json.into())).await.is_err() {
                    return Err(());
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {addr} sent close frame");
                break;
            }
            Err(e) => {
                warn!("WebSocket error from {addr}: {e}");
                break;
            }
            _ => {
                // Ignore Binary, Ping, Pong, Frame variants.
            }
        }
    }
    Ok(())
}
