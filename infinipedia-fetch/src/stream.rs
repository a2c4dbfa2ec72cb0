//! Incremental decoders for streamed response bodies.
//!
//! Network chunks split anywhere: inside a multi-byte UTF-8 sequence, inside
//! an SSE line, between the `\r` and `\n` of a line ending. The decoders here
//! buffer the incomplete tail and only emit complete units.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};
use infinipedia_core::ProviderError;

// ============================================================================
// UTF-8
// ============================================================================

/// Streaming UTF-8 decoder.
///
/// Invalid sequences decode to U+FFFD; an incomplete sequence at the end of a
/// chunk is held until the next one arrives.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds bytes, returning all text that is now complete.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        let mut consumed = 0;

        loop {
            let rest = &self.pending[consumed..];
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    consumed = self.pending.len();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&rest[..valid]));
                    consumed += valid;
                    match err.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            consumed += bad;
                        }
                        None => break,
                    }
                }
            }
        }

        self.pending.drain(..consumed);
        out
    }

    /// Flushes any held bytes at end of stream.
    pub fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }
}

// ============================================================================
// Server-sent events
// ============================================================================

/// Streaming server-sent-events decoder.
///
/// Yields the joined `data:` payload of every complete event. Comment lines,
/// other fields, and events without data are skipped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    line: String,
    data: Vec<String>,
}

impl SseDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds text, returning the payloads of events completed by it.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        let mut events = Vec::new();
        for ch in text.chars() {
            if ch == '\n' {
                let line = std::mem::take(&mut self.line);
                let line = line.strip_suffix('\r').unwrap_or(&line);
                if let Some(event) = self.handle_line(line) {
                    events.push(event);
                }
            } else {
                self.line.push(ch);
            }
        }
        events
    }

    /// Dispatches a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.line);
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if !line.is_empty() {
            self.handle_line(line);
        }
        self.dispatch()
    }

    fn handle_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        let payload = self.data.join("\n");
        self.data.clear();
        Some(payload)
    }
}

// ============================================================================
// Stream adapters
// ============================================================================

struct TextState<S> {
    inner: Pin<Box<S>>,
    utf8: Utf8Decoder,
    done: bool,
}

/// Decodes a byte stream into UTF-8 text chunks.
///
/// Empty chunks are not emitted. The first error ends the stream.
pub fn utf8_text<S, B>(bytes: S) -> impl Stream<Item = Result<String, ProviderError>> + Send
where
    S: Stream<Item = Result<B, ProviderError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = TextState {
        inner: Box::pin(bytes),
        utf8: Utf8Decoder::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.done {
                return None;
            }
            match state.inner.next().await {
                Some(Ok(chunk)) => {
                    let text = state.utf8.push(chunk.as_ref());
                    if !text.is_empty() {
                        return Some((Ok(text), state));
                    }
                }
                Some(Err(err)) => {
                    state.done = true;
                    return Some((Err(err), state));
                }
                None => {
                    state.done = true;
                    let tail = state.utf8.finish();
                    if tail.is_empty() {
                        return None;
                    }
                    return Some((Ok(tail), state));
                }
            }
        }
    })
}

struct SseState<S> {
    inner: Pin<Box<S>>,
    utf8: Utf8Decoder,
    sse: SseDecoder,
    ready: VecDeque<String>,
    done: bool,
}

/// Decodes a byte stream of server-sent events into event payloads.
///
/// The first error ends the stream.
pub fn sse_data<S, B>(bytes: S) -> impl Stream<Item = Result<String, ProviderError>> + Send
where
    S: Stream<Item = Result<B, ProviderError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = SseState {
        inner: Box::pin(bytes),
        utf8: Utf8Decoder::new(),
        sse: SseDecoder::new(),
        ready: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(data) = state.ready.pop_front() {
                return Some((Ok(data), state));
            }
            if state.done {
                return None;
            }
            match state.inner.next().await {
                Some(Ok(chunk)) => {
                    let text = state.utf8.push(chunk.as_ref());
                    let events = state.sse.push(&text);
                    state.ready.extend(events);
                }
                Some(Err(err)) => {
                    state.done = true;
                    state.ready.clear();
                    return Some((Err(err), state));
                }
                None => {
                    state.done = true;
                    let tail = state.utf8.finish();
                    let events = state.sse.push(&tail);
                    state.ready.extend(events);
                    state.ready.extend(state.sse.finish());
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use infinipedia_core::ProviderErrorKind;

    fn chunks(parts: &[&[u8]]) -> Vec<Result<Vec<u8>, ProviderError>> {
        parts.iter().map(|p| Ok(p.to_vec())).collect()
    }

    #[test]
    fn test_utf8_split_sequence() {
        let bytes = "héllo wörld".as_bytes();
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        for byte in bytes {
            out.push_str(&decoder.push(std::slice::from_ref(byte)));
        }
        out.push_str(&decoder.finish());
        assert_eq!(out, "héllo wörld");
    }

    #[test]
    fn test_utf8_invalid_bytes() {
        let mut decoder = Utf8Decoder::new();
        let out = decoder.push(b"a\xffb");
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn test_utf8_truncated_tail_flushed() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.push(b"ok\xe2\x82"), "ok");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }

    #[test]
    fn test_sse_basic_events() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push("data: one\n\ndata: two\n\n");
        assert_eq!(events, vec!["one", "two"]);
    }

    #[test]
    fn test_sse_crlf_and_split_lines() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push("data: {\"a\"").is_empty());
        assert!(decoder.push(":1}\r").is_empty());
        let events = decoder.push("\n\r\n");
        assert_eq!(events, vec!["{\"a\":1}"]);
    }

    #[test]
    fn test_sse_multiline_and_comments() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(": keepalive\nevent: message\ndata: a\ndata:b\n\n");
        assert_eq!(events, vec!["a\nb"]);
    }

    #[test]
    fn test_sse_finish_without_blank_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push("data: last").is_empty());
        assert_eq!(decoder.finish(), Some("last".to_string()));
        assert_eq!(decoder.finish(), None);
    }

    #[tokio::test]
    async fn test_sse_stream_across_chunks() {
        let input = stream::iter(chunks(&[b"data: x\n", b"\ndata: \xc3", b"\xa9\n\n"]));
        let events: Vec<_> = sse_data(input).collect().await;
        let events: Vec<String> = events.into_iter().map(Result::unwrap).collect();
        assert_eq!(events, vec!["x", "é"]);
    }

    #[tokio::test]
    async fn test_utf8_stream_stops_at_error() {
        let input = stream::iter(vec![
            Ok(b"Gravity is".to_vec()),
            Err(ProviderError::new(ProviderErrorKind::Unknown, "reset")),
            Ok(b" ignored".to_vec()),
        ]);
        let items: Vec<_> = utf8_text(input).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "Gravity is");
        assert!(items[1].is_err());
    }
}
