//! Server-Sent-Event Stream Decoder
//!
//! Every supported provider streams completions as line-oriented
//! `data: <json>` events terminated by a `data: [DONE]` sentinel. This
//! module turns the raw byte stream of an open HTTP response into a lazy,
//! forward-only sequence of decoded JSON chunks.
//!
//! Decoding is deliberately lenient: lines without the `data: ` prefix are
//! ignored, and a payload that fails to parse as JSON is dropped without
//! aborting the stream. Some providers emit keep-alive or partial frames,
//! and a stream must survive them.
//!
//! The decoder owns the response; ending or dropping the sequence releases
//! the connection.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::debug;

use crate::types::{CompletionChunk, RepoWikiError, Result};

/// Lazy, non-restartable sequence of decoded stream frames.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<CompletionChunk>> + Send>>;

/// Outcome of decoding one line of the event stream.
#[derive(Debug)]
enum LineEvent {
    /// A parsed JSON frame.
    Chunk(CompletionChunk),
    /// The `[DONE]` sentinel: no further frames are read.
    Done,
    /// A non-data line or unparseable payload; dropped.
    Skip,
}

/// Decode a single line of the event stream.
fn decode_line(line: &str) -> LineEvent {
    let line = line.trim_end_matches('\r');
    let Some(payload) = line.strip_prefix("data: ") else {
        return LineEvent::Skip;
    };
    if payload.trim() == "[DONE]" {
        return LineEvent::Done;
    }
    match serde_json::from_str(payload) {
        Ok(value) => LineEvent::Chunk(value),
        Err(e) => {
            debug!("Dropping unparseable stream frame: {}", e);
            LineEvent::Skip
        }
    }
}

/// Decode a stream of raw bytes into completion chunks.
///
/// Generic over the byte source so the decoder can be exercised without a
/// live connection. A read error surfaces as a single `Transport` item and
/// ends the sequence. After the `[DONE]` sentinel the source is not polled
/// again.
pub fn decode_lines<S, E>(upstream: S) -> ChunkStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    struct DecodeState<S> {
        upstream: Pin<Box<S>>,
        buffer: Vec<u8>,
        pending: VecDeque<Result<CompletionChunk>>,
        finished: bool,
    }

    impl<S> DecodeState<S> {
        /// Drain complete lines out of the buffer into `pending`.
        fn drain_lines(&mut self) {
            while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
                match decode_line(&line) {
                    LineEvent::Chunk(value) => self.pending.push_back(Ok(value)),
                    LineEvent::Done => {
                        self.finished = true;
                        return;
                    }
                    LineEvent::Skip => {}
                }
            }
        }
    }

    let state = DecodeState {
        upstream: Box::pin(upstream),
        buffer: Vec::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    let chunks = futures::stream::unfold(state, |mut st| async move {
        loop {
            if let Some(item) = st.pending.pop_front() {
                return Some((item, st));
            }
            if st.finished {
                // Returning None drops the state, and with it the upstream
                // response and its connection.
                return None;
            }
            match st.upstream.next().await {
                Some(Ok(bytes)) => {
                    st.buffer.extend_from_slice(&bytes);
                    st.drain_lines();
                }
                Some(Err(e)) => {
                    st.finished = true;
                    st.pending.push_back(Err(RepoWikiError::Transport(format!(
                        "stream read error: {}",
                        e
                    ))));
                }
                None => {
                    // EOF without a sentinel: decode a trailing unterminated
                    // line, then end.
                    st.finished = true;
                    if !st.buffer.is_empty() {
                        let raw = std::mem::take(&mut st.buffer);
                        let line = String::from_utf8_lossy(&raw);
                        if let LineEvent::Chunk(value) = decode_line(&line) {
                            st.pending.push_back(Ok(value));
                        }
                    }
                }
            }
        }
    });

    Box::pin(chunks)
}

/// Decode an open provider response into completion chunks.
pub fn decode_sse(response: reqwest::Response) -> ChunkStream {
    decode_lines(response.bytes_stream())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn byte_stream(
        parts: Vec<&str>,
    ) -> impl Stream<Item = std::result::Result<Bytes, Infallible>> {
        futures::stream::iter(
            parts
                .into_iter()
                .map(|s| Ok(Bytes::copy_from_slice(s.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    async fn collect_ok(stream: ChunkStream) -> Vec<CompletionChunk> {
        stream
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_malformed_frame_dropped_and_sentinel_stops() {
        let input = byte_stream(vec![
            "data: {\"a\":1}\n",
            "data: not-json\n",
            "data: {\"b\":2}\n",
            "data: [DONE]\n",
        ]);
        let chunks = collect_ok(decode_lines(input)).await;
        assert_eq!(
            chunks,
            vec![serde_json::json!({"a":1}), serde_json::json!({"b":2})]
        );
    }

    #[tokio::test]
    async fn test_frames_after_sentinel_ignored() {
        let input = byte_stream(vec!["data: {\"a\":1}\ndata: [DONE]\ndata: {\"late\":true}\n"]);
        let chunks = collect_ok(decode_lines(input)).await;
        assert_eq!(chunks, vec![serde_json::json!({"a":1})]);
    }

    #[tokio::test]
    async fn test_non_data_lines_ignored() {
        let input = byte_stream(vec![
            ": keep-alive\n",
            "event: ping\n",
            "\n",
            "data: {\"x\":1}\n",
            "data: [DONE]\n",
        ]);
        let chunks = collect_ok(decode_lines(input)).await;
        assert_eq!(chunks, vec![serde_json::json!({"x":1})]);
    }

    #[tokio::test]
    async fn test_frame_split_across_byte_chunks() {
        let input = byte_stream(vec!["data: {\"he", "llo\":\"wor", "ld\"}\ndata: [DONE]\n"]);
        let chunks = collect_ok(decode_lines(input)).await;
        assert_eq!(chunks, vec![serde_json::json!({"hello":"world"})]);
    }

    #[tokio::test]
    async fn test_crlf_lines() {
        let input = byte_stream(vec!["data: {\"a\":1}\r\ndata: [DONE]\r\n"]);
        let chunks = collect_ok(decode_lines(input)).await;
        assert_eq!(chunks, vec![serde_json::json!({"a":1})]);
    }

    #[tokio::test]
    async fn test_eof_without_sentinel_flushes_trailing_line() {
        let input = byte_stream(vec!["data: {\"a\":1}\ndata: {\"b\":2}"]);
        let chunks = collect_ok(decode_lines(input)).await;
        assert_eq!(
            chunks,
            vec![serde_json::json!({"a":1}), serde_json::json!({"b":2})]
        );
    }

    #[tokio::test]
    async fn test_read_error_surfaces_and_ends_stream() {
        let input = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"data: {\"a\":1}\n")),
            Err("connection reset"),
        ]);
        let items: Vec<_> = decode_lines(input).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(*items[0].as_ref().unwrap(), serde_json::json!({"a":1}));
        assert!(matches!(items[1], Err(RepoWikiError::Transport(_))));
    }

    #[tokio::test]
    async fn test_early_termination_stops_consumption() {
        let mut stream = decode_lines(byte_stream(vec![
            "data: {\"a\":1}\ndata: {\"b\":2}\ndata: [DONE]\n",
        ]));
        let first = stream.next().await;
        assert!(first.is_some());
        // Dropping the stream here releases the source without draining it.
        drop(stream);
    }
}
