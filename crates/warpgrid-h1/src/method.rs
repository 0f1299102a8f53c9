use std::fmt;

/// The request methods this parser knows how to frame.
///
/// Body framing depends on the method alone, so any other token is
/// rejected by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Options,
    Get,
    Head,
    Post,
    Put,
    Delete,
    Trace,
    Connect,
}

impl Method {
    /// Parse a request-line method token. Matching is case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "OPTIONS" => Some(Self::Options),
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "TRACE" => Some(Self::Trace),
            "CONNECT" => Some(Self::Connect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Options => "OPTIONS",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
        }
    }

    /// Whether a request with this method carries a Content-Length framed body.
    pub fn implies_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Method; 8] = [
        Method::Options,
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Trace,
        Method::Connect,
    ];

    #[test]
    fn token_round_trip() {
        for method in ALL {
            assert_eq!(Method::from_token(method.as_str()), Some(method));
        }
    }

    #[test]
    fn unknown_and_lowercase_tokens_rejected() {
        assert_eq!(Method::from_token("FOO"), None);
        assert_eq!(Method::from_token("get"), None);
        assert_eq!(Method::from_token("PATCH"), None);
        assert_eq!(Method::from_token(""), None);
    }

    #[test]
    fn only_post_and_put_imply_body() {
        let with_body: Vec<_> = ALL.iter().filter(|m| m.implies_body()).collect();
        assert_eq!(with_body, vec![&Method::Post, &Method::Put]);
    }

    #[test]
    fn display_is_token() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
