// Length-prefixed JSON frames for the live dashboard stream
//
// Each frame is a 4-byte big-endian length followed by that many bytes of JSON,
// Brotli-compressed per frame when requested.
use crate::application::streaming_service::StreamMessage;
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use std::io;
use tokio::sync::mpsc;

pub const FRAME_CONTENT_TYPE: &str = "application/x-ndframe+json";

/// Turn a message receiver into a streaming response, one frame per message.
/// The body ends when the receiver closes.
pub fn frame_response(mut rx: mpsc::Receiver<StreamMessage>, compress: bool) -> Response<Body> {
    let frames = async_stream::stream! {
        while let Some(msg) = rx.recv().await {
            match frame_message(&msg, compress).await {
                Ok(frame) => yield Ok(frame),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode dashboard frame");
                    yield Err(e);
                    break;
                }
            }
        }
    };

    // Frames are compressed individually, so no Content-Encoding on the response
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, FRAME_CONTENT_TYPE)
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(Body::from_stream(frames))
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build dashboard stream response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

async fn frame_message(msg: &StreamMessage, compress: bool) -> io::Result<Bytes> {
    let json = serde_json::to_vec(msg)?;
    let payload = if compress {
        brotli_compress(json).await?
    } else {
        json
    };
    encode_frame(&payload)
}

fn encode_frame(payload: &[u8]) -> io::Result<Bytes> {
    let length = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "frame exceeds u32 length"))?;
    let mut frame = BytesMut::with_capacity(4 + payload.len());
    frame.put_u32(length);
    frame.put_slice(payload);
    Ok(frame.freeze())
}

/// Split a buffer of frames back into their JSON payloads. Trailing partial
/// frames are ignored.
#[cfg(test)]
pub fn decode_frames(mut buf: &[u8]) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Some(prefix) = buf.first_chunk::<4>() {
        let len = u32::from_be_bytes(*prefix) as usize;
        let Some(payload) = buf.get(4..4 + len) else {
            break;
        };
        frames.push(serde_json::from_slice(payload).expect("frame is valid JSON"));
        buf = &buf[4 + len..];
    }
    frames
}
