//! Full-duplex stream relay
//!
//! Input chunks become binary messages, one per chunk. Received messages are
//! written to the output as they arrive. The two directions are driven
//! concurrently so an idle side never stalls the other.

use std::io::{self, Read};

use bytes::Bytes;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use issh_core::error::SessionError;

/// Maximum bytes per stdin read, and so per outbound message
pub const INPUT_CHUNK_SIZE: usize = 4096;

/// Chunks buffered between the stdin thread and the relay.
///
/// Bounded so a stalled transport stops the reader instead of growing memory.
const INPUT_CHANNEL_CAPACITY: usize = 32;

/// Relay between `transport` and local `input`/`output` until one side ends.
///
/// Returns `Ok(())` when `input` is exhausted (a Close frame is sent first).
/// Remote closure is an error: [`SessionError::RemoteClosed`]. A message taken
/// off the socket is always written out in full before the relay returns.
pub async fn relay<T, I, O>(transport: T, input: I, output: &mut O) -> Result<(), SessionError>
where
    T: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
    I: Stream<Item = io::Result<Bytes>> + Unpin,
    O: AsyncWrite + Unpin,
{
    let (mut sink, mut stream) = transport.split();

    let result = {
        let outbound = pump_outbound(&mut sink, input);
        tokio::pin!(outbound);

        // Outbound runs concurrently with reads; a write to `output` is never
        // cancelled halfway.
        loop {
            tokio::select! {
                result = &mut outbound => break result,
                message = stream.next() => {
                    if let Err(e) = deliver(message, output).await {
                        break Err(e);
                    }
                }
            }
        }
    };

    if let Err(SessionError::RemoteClosed { .. }) = &result {
        // Send the queued Close reply so the peer sees a completed handshake
        let _ = sink.flush().await;
    }
    result
}

fn transport_error(e: WsError) -> SessionError {
    SessionError::Transport(Box::new(e))
}

/// Local input -> session
async fn pump_outbound<K, I>(sink: &mut K, mut input: I) -> Result<(), SessionError>
where
    K: Sink<Message, Error = WsError> + Unpin,
    I: Stream<Item = io::Result<Bytes>> + Unpin,
{
    while let Some(chunk) = input.next().await {
        let chunk = chunk?;
        if chunk.is_empty() {
            continue;
        }
        tracing::trace!("-> {} bytes", chunk.len());
        sink.send(Message::Binary(chunk.to_vec()))
            .await
            .map_err(transport_error)?;
    }

    tracing::debug!("Input closed, closing session");
    sink.close().await.map_err(transport_error)?;
    Ok(())
}

/// Session -> local output, one message at a time
async fn deliver<O>(
    message: Option<Result<Message, WsError>>,
    output: &mut O,
) -> Result<(), SessionError>
where
    O: AsyncWrite + Unpin,
{
    let message = match message {
        Some(message) => message.map_err(transport_error)?,
        None => return Err(SessionError::RemoteClosed { reason: None }),
    };

    match message {
        Message::Binary(data) => write_out(output, &data).await?,
        Message::Text(text) => write_out(output, text.as_bytes()).await?,
        Message::Close(frame) => {
            let reason = frame.map(|f| {
                tracing::debug!("Close frame: code {}", f.code);
                f.reason.into_owned()
            });
            return Err(SessionError::RemoteClosed { reason });
        }
        // Control frames; pongs are answered by the transport
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
    }
    Ok(())
}

async fn write_out<O: AsyncWrite + Unpin>(output: &mut O, data: &[u8]) -> io::Result<()> {
    tracing::trace!("<- {} bytes", data.len());
    output.write_all(data).await?;
    output.flush().await
}

/// Read `reader` on a dedicated thread and yield its chunks.
///
/// Each successful `read` becomes one item, so chunk boundaries are those the
/// reader produced. The stream ends at EOF; a read error is yielded once and
/// then the stream ends.
pub fn chunk_reader<R>(reader: R) -> io::Result<impl Stream<Item = io::Result<Bytes>> + Unpin + Send>
where
    R: Read + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);

    std::thread::Builder::new()
        .name("issh-input".to_string())
        .spawn(move || read_chunks(reader, tx))?;

    Ok(futures::stream::poll_fn(move |cx| rx.poll_recv(cx)))
}

/// Chunks of the process's standard input
pub fn stdin_chunks() -> io::Result<impl Stream<Item = io::Result<Bytes>> + Unpin + Send> {
    chunk_reader(io::stdin())
}

fn read_chunks<R: Read>(mut reader: R, tx: mpsc::Sender<io::Result<Bytes>>) {
    let mut buf = vec![0u8; INPUT_CHUNK_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.blocking_send(Ok(Bytes::copy_from_slice(&buf[..n]))).is_err() {
                    // Relay is gone
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }
}
