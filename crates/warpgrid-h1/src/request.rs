use crate::body::BodySink;
use crate::header::HeaderMap;
use crate::method::Method;

/// The request assembled by a [`RequestParser`](crate::RequestParser).
///
/// Fields fill in as parsing advances: method, path and version together
/// once the request line is read, headers line by line, and the body once
/// the header section ends. Only `POST` and `PUT` requests get a body sink
/// and a declared length.
#[derive(Debug, Default)]
pub struct Request {
    pub(crate) method: Option<Method>,
    pub(crate) path: Option<String>,
    pub(crate) version: Option<(u32, u32)>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<BodySink>,
    pub(crate) declared_body_length: Option<u64>,
}

impl Request {
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    /// The request target exactly as sent; no decoding is applied.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// `(major, minor)` from `HTTP/<major>.<minor>`.
    pub fn version(&self) -> Option<(u32, u32)> {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&BodySink> {
        self.body.as_ref()
    }

    /// Mutable body access, needed to read from the sink.
    pub fn body_mut(&mut self) -> Option<&mut BodySink> {
        self.body.as_mut()
    }

    pub fn into_body(self) -> Option<BodySink> {
        self.body
    }

    pub fn declared_body_length(&self) -> Option<u64> {
        self.declared_body_length
    }

    /// Whether the method is known and carries a body.
    pub fn has_body(&self) -> bool {
        self.method.is_some_and(|m| m.implies_body())
    }
}
