//! Server-sent event decoding
//!
//! `LineStream` splits a byte stream into lines across chunk boundaries;
//! `StreamDecoder` turns `data:` lines into answer events in a single forward
//! pass.

use crate::models::{AnswerResponse, AnswerStreamChunk, StreamEvent};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::DebugTrace;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio_stream::{Stream, StreamExt};

/// Prefix of payload-carrying lines
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends the stream
pub const DONE_SENTINEL: &str = "[DONE]";

pin_project! {
    /// Newline-delimited lines from a byte stream
    ///
    /// Holds at most one partial line. A trailing `\r` is stripped; bytes that
    /// are not valid UTF-8 are replaced rather than failing the line.
    pub struct LineStream<S> {
        #[pin]
        inner: S,
        buffer: Vec<u8>,
        finished: bool,
    }
}

impl<S> LineStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            finished: false,
        }
    }
}

fn into_line(mut raw: Vec<u8>) -> String {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    String::from_utf8_lossy(&raw).into_owned()
}

impl<S, B, E> Stream for LineStream<S>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<AppError>,
{
    type Item = AppResult<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if let Some(pos) = this.buffer.iter().position(|b| *b == b'\n') {
                let mut raw: Vec<u8> = this.buffer.drain(..=pos).collect();
                raw.pop();
                return Poll::Ready(Some(Ok(into_line(raw))));
            }

            if *this.finished {
                if this.buffer.is_empty() {
                    return Poll::Ready(None);
                }
                let raw = std::mem::take(this.buffer);
                return Poll::Ready(Some(Ok(into_line(raw))));
            }

            match ready!(this.inner.as_mut().poll_next(cx)) {
                Some(Ok(chunk)) => this.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => return Poll::Ready(Some(Err(e.into()))),
                None => *this.finished = true,
            }
        }
    }
}

/// Outcome of decoding one line
#[derive(Debug)]
pub enum SseLine {
    /// Not a payload line (comments, keep-alives, other fields)
    Ignored,
    /// Terminal sentinel
    Done,
    /// Events carried by the payload, possibly none
    Events(Vec<StreamEvent>),
    /// Payload that failed to parse
    Malformed(AppError),
}

/// Counters reported after a stream finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub text_deltas: usize,
    pub skipped: usize,
    pub completed: bool,
}

/// Answer stream decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamDecoder {
    trace: DebugTrace,
}

impl StreamDecoder {
    pub fn new(trace: DebugTrace) -> Self {
        Self { trace }
    }

    /// Decode a single line
    pub fn decode_line(&self, line: &str) -> SseLine {
        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            return SseLine::Ignored;
        };

        if data.trim() == DONE_SENTINEL {
            return SseLine::Done;
        }

        match serde_json::from_str::<AnswerStreamChunk>(data) {
            Ok(chunk) => SseLine::Events(chunk.into_events()),
            Err(e) => {
                self.trace.skipped_chunk(&e, data);
                SseLine::Malformed(AppError::StreamDecode(e.to_string()))
            }
        }
    }

    /// Drive `lines` to the end, the sentinel, or the first transport error
    ///
    /// Text deltas go to `on_text` in arrival order. The first terminal event
    /// goes to `on_done`; later ones are ignored. Malformed payloads are
    /// skipped. A stream that closes without a terminal event is not an
    /// error. Dropping the returned future stops delivery immediately.
    pub async fn run<S, T, D>(&self, lines: S, mut on_text: T, mut on_done: D) -> AppResult<StreamSummary>
    where
        S: Stream<Item = AppResult<String>>,
        T: FnMut(&str),
        D: FnMut(AnswerResponse),
    {
        tokio::pin!(lines);
        let mut summary = StreamSummary::default();

        while let Some(line) = lines.next().await {
            match self.decode_line(&line?) {
                SseLine::Ignored => {}
                SseLine::Done => {
                    self.trace.note("Received streaming response end marker");
                    break;
                }
                SseLine::Malformed(_) => summary.skipped += 1,
                SseLine::Events(events) => {
                    for event in events {
                        match event {
                            StreamEvent::TextDelta(text) => {
                                summary.text_deltas += 1;
                                on_text(&text);
                            }
                            StreamEvent::Completed(answer) if !summary.completed => {
                                summary.completed = true;
                                on_done(answer);
                            }
                            StreamEvent::Completed(_) => {
                                self.trace.note("Ignoring repeated terminal event");
                            }
                        }
                    }
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line_kinds() {
        let decoder = StreamDecoder::default();

        assert!(matches!(decoder.decode_line(""), SseLine::Ignored));
        assert!(matches!(decoder.decode_line(": keep-alive"), SseLine::Ignored));
        assert!(matches!(decoder.decode_line("event: message"), SseLine::Ignored));
        assert!(matches!(decoder.decode_line("data: [DONE]"), SseLine::Done));
        assert!(matches!(decoder.decode_line("data: {oops"), SseLine::Malformed(_)));

        match decoder.decode_line(r#"data: {"text":"Hel"}"#) {
            SseLine::Events(events) => {
                assert_eq!(events, vec![StreamEvent::TextDelta("Hel".to_string())]);
            }
            other => panic!("Expected events, got {:?}", other),
        }
    }

    #[test]
    fn test_noop_chunk() {
        let decoder = StreamDecoder::default();
        match decoder.decode_line(r#"data: {"text":"","type":"ping"}"#) {
            SseLine::Events(events) => assert!(events.is_empty()),
            other => panic!("Expected empty events, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_line_stream_joins_split_chunks() {
        let chunks: Vec<Result<&[u8], AppError>> = vec![
            Ok(&b"data: {\"te"[..]),
            Ok(&b"xt\":\"a\"}\r\n\ndata: [DO"[..]),
            Ok(&b"NE]"[..]),
        ];
        let lines: Vec<String> = LineStream::new(tokio_stream::iter(chunks))
            .map(|line| line.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["data: {\"text\":\"a\"}", "", "data: [DONE]"]);
    }
}
