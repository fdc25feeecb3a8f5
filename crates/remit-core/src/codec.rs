//! Async frame codec over any byte stream.
//!
//! Reads and writes one [`Frame`] at a time against `AsyncRead` /
//! `AsyncWrite`. Header validation (magic, payload cap) happens before
//! the payload is read, so a hostile peer cannot make the reader allocate
//! more than [`remit_proto::MAX_PAYLOAD_SIZE`] bytes.

use bytes::Bytes;
use remit_proto::{Frame, FrameHeader, HEADER_SIZE, WireError};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Errors while reading or writing frames on a stream.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying stream failed or closed.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// The peer sent a malformed frame.
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Read one complete frame.
///
/// # Errors
///
/// Returns [`CodecError::Io`] when the stream closes mid-frame (or, with
/// `UnexpectedEof` before any header byte, on a clean disconnect) and
/// [`CodecError::Wire`] on a malformed header.
pub async fn read_frame<R>(reader: &mut R) -> Result<Frame, CodecError>
where
    R: AsyncRead + Unpin,
{
    let mut header_buf = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header_buf).await?;

    let header = FrameHeader::parse(&header_buf)?;

    let mut payload = vec![0u8; header.payload_len() as usize];
    if !payload.is_empty() {
        reader.read_exact(&mut payload).await?;
    }

    Ok(Frame::new(header, Bytes::from(payload)))
}

/// Write one complete frame and flush.
pub async fn write_frame<W>(writer: &mut W, frame: &Frame) -> Result<(), CodecError>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(HEADER_SIZE + frame.payload.len());
    frame.encode(&mut buf)?;

    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}
