//! WarpGrid incremental HTTP/1.x request parser.
//!
//! [`RequestParser`] consumes a request as it arrives off the wire, in
//! chunks of any size, and takes only the bytes it can fully interpret.
//! Whatever it leaves behind is the caller's to resubmit once more data
//! is available.
//!
//! # Parsing Model
//!
//! The parser walks four states: request line, headers, body, done. The
//! request line and each header line are consumed whole or not at all;
//! body bytes are consumed up to the declared `Content-Length` and never
//! past it. Header names are normalized to `UPPERCASE_WITH_UNDERSCORES`
//! and legacy folded header lines are joined onto the preceding header.
//!
//! Only `POST` and `PUT` carry a body, and they must declare its length.
//! Bodies at or above [`ParserConfig::min_spill_to_disk_size`] are written
//! to an anonymous temporary file instead of memory.
//!
//! # Example
//!
//! ```ignore
//! use bytes::BytesMut;
//! use warpgrid_h1::RequestParser;
//!
//! let mut parser = RequestParser::new();
//! let mut buf = BytesMut::new();
//! for chunk in socket_chunks {
//!     buf.extend_from_slice(chunk);
//!     parser.feed_buf(&mut buf)?;
//!     if parser.done() {
//!         break;
//!     }
//! }
//! ```

mod body;
mod config;
mod error;
mod header;
mod method;
mod parser;
mod request;

pub use body::{BodySink, SpillFactory, TempFileSpill};
pub use config::{
    ParserConfig, DEFAULT_MAX_HEADER_COUNT, DEFAULT_MAX_HEADER_LINE_LENGTH,
    DEFAULT_MIN_SPILL_TO_DISK_SIZE,
};
pub use error::{ConfigError, ParseError, ParseResult};
pub use header::{normalize_header_name, Header, HeaderMap};
pub use method::Method;
pub use parser::{ParserState, RequestParser};
pub use request::Request;
