//! Incremental request parser.
//!
//! [`RequestParser`] is a four-state machine
//! (`RequestLine → Headers → Body → Done`) that consumes bytes from the
//! front of whatever the caller hands it. Each state rule either consumes
//! a complete unit (one line, or a run of body bytes) or nothing at all;
//! the driver loop stops on the first rule that makes no progress and
//! reports how many bytes it took. Callers keep the unconsumed tail and
//! resubmit it with more data appended, so the result is the same no
//! matter how the stream was fragmented.

use std::io::{Seek, Write};
use std::sync::LazyLock;

use bytes::{Buf, Bytes, BytesMut};
use regex::bytes::Regex;
use tracing::{debug, trace};

use crate::body::BodySink;
use crate::config::ParserConfig;
use crate::error::{ParseError, ParseResult};
use crate::header::HeaderMap;
use crate::method::Method;
use crate::request::Request;

static REQUEST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^([A-Za-z]+) (.+) HTTP/([0-9]+)\.([0-9]+)\r?$")
        .expect("request-line pattern is valid")
});

static HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^([A-Za-z-]+):[ \t]*(.*?)[ \t]*\r?$").expect("header pattern is valid")
});

static CONTINUATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^[ \t]+(.*?)[ \t]*\r?$").expect("continuation pattern is valid")
});

/// Upper bound on the up-front allocation for an in-memory body.
const MEMORY_BODY_PREALLOC: usize = 64 * 1024;

/// Where the parser is in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    RequestLine,
    Headers,
    Body,
    Done,
}

/// One line at the front of the input.
struct Line<'a> {
    /// Line content without the trailing `\n`; a trailing `\r` is kept.
    text: &'a [u8],
    /// Bytes to consume, terminator included.
    consumed: usize,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.is_empty() || self.text == b"\r"
    }
}

enum LineScan<'a> {
    Complete(Line<'a>),
    Partial,
    TooLong,
}

/// Find the first complete line, enforcing `limit` on its content length
/// (excluding CRLF).
///
/// A partial line is only rejected once it is longer than any valid line
/// could be before its `\n` arrives, so the verdict is independent of
/// fragmentation.
fn scan_line(input: &[u8], limit: usize) -> LineScan<'_> {
    let Some(newline) = input.iter().position(|&b| b == b'\n') else {
        if input.len() > limit.saturating_add(1) {
            return LineScan::TooLong;
        }
        return LineScan::Partial;
    };

    let text = &input[..newline];
    let content_len = text.strip_suffix(b"\r").unwrap_or(text).len();
    if content_len > limit {
        return LineScan::TooLong;
    }
    LineScan::Complete(Line {
        text,
        consumed: newline + 1,
    })
}

fn header_value(bytes: &[u8]) -> ParseResult<String> {
    if bytes
        .iter()
        .any(|&b| b == 0x7f || (b < 0x20 && b != b'\t'))
    {
        return Err(ParseError::MalformedHeader);
    }
    String::from_utf8(bytes.to_vec()).map_err(|_| ParseError::MalformedHeader)
}

fn version_number(digits: &[u8]) -> ParseResult<u32> {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(ParseError::MalformedRequestLine)
}

fn content_length(raw: &str) -> ParseResult<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidContentLength(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| ParseError::InvalidContentLength(raw.to_string()))
}

/// Incremental parser for a single HTTP/1.x request.
///
/// ```ignore
/// let mut parser = RequestParser::new();
/// let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\nHost:"[..]);
/// parser.feed_buf(&mut buf)?;
/// assert!(parser.done_request_line());
/// assert_eq!(&buf[..], b"Host:");
/// ```
///
/// An instance handles exactly one request. Once [`done`](Self::done) is
/// true, further feeds consume nothing. After any error the instance must
/// be discarded.
#[derive(Debug)]
pub struct RequestParser {
    config: ParserConfig,
    state: ParserState,
    request: Request,
    last_header: Option<String>,
    header_lines: usize,
}

impl RequestParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            state: ParserState::RequestLine,
            request: Request::default(),
            last_header: None,
            header_lines: 0,
        }
    }

    /// Consume as much of `input` as can be fully interpreted.
    ///
    /// Returns the number of bytes consumed from the front of `input`. The
    /// caller must drop that prefix and pass the rest again, with more
    /// data appended, on the next call.
    pub fn feed(&mut self, input: &[u8]) -> ParseResult<usize> {
        let mut consumed = 0;
        self.drive(input, &mut consumed)?;
        Ok(consumed)
    }

    /// Like [`feed`](Self::feed), but removes the consumed prefix from `buf`.
    ///
    /// Bytes consumed before an error are removed as well.
    pub fn feed_buf(&mut self, buf: &mut BytesMut) -> ParseResult<()> {
        let mut consumed = 0;
        let result = self.drive(&buf[..], &mut consumed);
        buf.advance(consumed);
        result
    }

    /// Like [`feed`](Self::feed), but returns a copy of the unconsumed tail.
    pub fn parse(&mut self, input: &[u8]) -> ParseResult<Bytes> {
        let consumed = self.feed(input)?;
        Ok(Bytes::copy_from_slice(&input[consumed..]))
    }

    fn drive(&mut self, input: &[u8], offset: &mut usize) -> ParseResult<()> {
        while *offset < input.len() {
            let rest = &input[*offset..];
            let consumed = match self.state {
                ParserState::RequestLine => self.parse_request_line(rest)?,
                ParserState::Headers => self.parse_header_line(rest)?,
                ParserState::Body => self.parse_body(rest)?,
                ParserState::Done => 0,
            };
            if consumed == 0 {
                break;
            }
            *offset += consumed;
        }
        Ok(())
    }

    fn parse_request_line(&mut self, input: &[u8]) -> ParseResult<usize> {
        let limit = self.config.max_header_line_length;
        let line = match scan_line(input, limit) {
            LineScan::Complete(line) => line,
            LineScan::Partial => return Ok(0),
            LineScan::TooLong => return Err(ParseError::RequestLineTooLong { limit }),
        };

        let caps = REQUEST_LINE
            .captures(line.text)
            .ok_or(ParseError::MalformedRequestLine)?;
        let path = std::str::from_utf8(&caps[2])
            .map_err(|_| ParseError::MalformedRequestLine)?
            .to_string();
        let version = (version_number(&caps[3])?, version_number(&caps[4])?);

        // The method group only matches ASCII letters.
        let token = String::from_utf8_lossy(&caps[1]);
        let method =
            Method::from_token(&token).ok_or_else(|| ParseError::NotImplemented(token.to_string()))?;

        debug!(method = %method, path = %path, ?version, "parsed request line");
        self.request.method = Some(method);
        self.request.path = Some(path);
        self.request.version = Some(version);
        self.state = ParserState::Headers;
        Ok(line.consumed)
    }

    fn parse_header_line(&mut self, input: &[u8]) -> ParseResult<usize> {
        let limit = self.config.max_header_line_length;
        let line = match scan_line(input, limit) {
            LineScan::Complete(line) => line,
            LineScan::Partial => return Ok(0),
            LineScan::TooLong => return Err(ParseError::HeaderLineTooLong { limit }),
        };

        if line.is_blank() {
            self.finish_headers()?;
            return Ok(line.consumed);
        }

        if self.header_lines >= self.config.max_header_count {
            return Err(ParseError::TooManyHeaders {
                limit: self.config.max_header_count,
            });
        }
        self.header_lines += 1;

        if let Some(caps) = HEADER_LINE.captures(line.text) {
            let name = String::from_utf8_lossy(&caps[1]);
            let value = header_value(&caps[2])?;
            let key = self.request.headers.insert(&name, value);
            trace!(header = %key, "parsed header");
            self.last_header = Some(key);
        } else if let (Some(key), Some(caps)) = (
            self.last_header.as_deref(),
            CONTINUATION_LINE.captures(line.text),
        ) {
            let content = header_value(&caps[1])?;
            self.request.headers.append_folded(key, &content);
            trace!(header = %key, "folded continuation line");
        } else {
            return Err(ParseError::MalformedHeader);
        }
        Ok(line.consumed)
    }

    fn finish_headers(&mut self) -> ParseResult<()> {
        self.last_header = None;
        let headers = self.request.headers.len();

        if !self.request.has_body() {
            debug!(headers, "header section complete, no body expected");
            self.state = ParserState::Done;
            return Ok(());
        }

        let raw = self
            .request
            .headers
            .get("CONTENT_LENGTH")
            .ok_or(ParseError::LengthRequired)?;
        let length = content_length(raw)?;

        let spilled = length >= self.config.min_spill_to_disk_size;
        let sink = if spilled {
            BodySink::disk(self.config.spill()?)
        } else {
            let capacity =
                usize::try_from(length).map_or(MEMORY_BODY_PREALLOC, |l| l.min(MEMORY_BODY_PREALLOC));
            BodySink::memory(capacity)
        };
        debug!(headers, content_length = length, spilled, "header section complete");

        self.request.body = Some(sink);
        self.request.declared_body_length = Some(length);
        self.state = if length == 0 {
            ParserState::Done
        } else {
            ParserState::Body
        };
        Ok(())
    }

    fn parse_body(&mut self, input: &[u8]) -> ParseResult<usize> {
        // Body is only entered after finish_headers installs both.
        let (Some(declared), Some(sink)) =
            (self.request.declared_body_length, self.request.body.as_mut())
        else {
            self.state = ParserState::Done;
            return Ok(0);
        };

        let remaining = declared.saturating_sub(sink.len());
        let take = usize::try_from(remaining).map_or(input.len(), |r| r.min(input.len()));
        sink.write_all(&input[..take])?;

        if sink.len() >= declared {
            sink.flush()?;
            sink.rewind()?;
            debug!(bytes = declared, spilled = sink.is_spilled(), "body complete");
            self.state = ParserState::Done;
        }
        Ok(take)
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    pub fn method(&self) -> Option<Method> {
        self.request.method()
    }

    pub fn path(&self) -> Option<&str> {
        self.request.path()
    }

    pub fn version(&self) -> Option<(u32, u32)> {
        self.request.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// The body sink, present once the header section of a `POST`/`PUT`
    /// request has ended. It is rewound to the start when the body is
    /// complete.
    pub fn body(&self) -> Option<&BodySink> {
        self.request.body()
    }

    pub fn body_mut(&mut self) -> Option<&mut BodySink> {
        self.request.body_mut()
    }

    pub fn declared_body_length(&self) -> Option<u64> {
        self.request.declared_body_length()
    }

    /// Whether the method is known and carries a body.
    pub fn has_body(&self) -> bool {
        self.request.has_body()
    }

    pub fn done(&self) -> bool {
        self.state == ParserState::Done
    }

    pub fn done_request_line(&self) -> bool {
        self.state != ParserState::RequestLine
    }

    pub fn done_headers(&self) -> bool {
        matches!(self.state, ParserState::Body | ParserState::Done)
    }

    pub fn done_body(&self) -> bool {
        self.done()
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}
