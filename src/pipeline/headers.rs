//! Well-known header identifiers shared with the pipeline.
//!
//! Pipelines address the common headers by identifier rather than by name.
//! The numeric indices are stable so a pipeline can keep its own tables
//! keyed by them.

macro_rules! known_headers {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $header:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Header name in its canonical casing.
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $header),+
                }
            }

            /// Stable position of this header in [`Self::ALL`].
            pub fn index(&self) -> usize {
                *self as usize
            }

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            /// Case-insensitive lookup by header name.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|h| h.name().eq_ignore_ascii_case(name))
            }
        }
    };
}

known_headers! {
    /// Request headers a pipeline can ask for by identifier.
    pub enum KnownRequestHeader {
        CacheControl => "Cache-Control",
        Connection => "Connection",
        Date => "Date",
        KeepAlive => "Keep-Alive",
        Pragma => "Pragma",
        Trailer => "Trailer",
        TransferEncoding => "Transfer-Encoding",
        Upgrade => "Upgrade",
        Via => "Via",
        Warning => "Warning",
        Allow => "Allow",
        ContentLength => "Content-Length",
        ContentType => "Content-Type",
        ContentEncoding => "Content-Encoding",
        ContentLanguage => "Content-Language",
        ContentLocation => "Content-Location",
        ContentMd5 => "Content-MD5",
        ContentRange => "Content-Range",
        Expires => "Expires",
        LastModified => "Last-Modified",
        Accept => "Accept",
        AcceptCharset => "Accept-Charset",
        AcceptEncoding => "Accept-Encoding",
        AcceptLanguage => "Accept-Language",
        Authorization => "Authorization",
        Cookie => "Cookie",
        Expect => "Expect",
        From => "From",
        Host => "Host",
        IfMatch => "If-Match",
        IfModifiedSince => "If-Modified-Since",
        IfNoneMatch => "If-None-Match",
        IfRange => "If-Range",
        IfUnmodifiedSince => "If-Unmodified-Since",
        MaxForwards => "Max-Forwards",
        ProxyAuthorization => "Proxy-Authorization",
        Referer => "Referer",
        Range => "Range",
        Te => "TE",
        UserAgent => "User-Agent",
    }
}

known_headers! {
    /// Response headers a pipeline can set by identifier.
    pub enum KnownResponseHeader {
        CacheControl => "Cache-Control",
        Connection => "Connection",
        Date => "Date",
        KeepAlive => "Keep-Alive",
        Pragma => "Pragma",
        Trailer => "Trailer",
        TransferEncoding => "Transfer-Encoding",
        Upgrade => "Upgrade",
        Via => "Via",
        Warning => "Warning",
        Allow => "Allow",
        ContentLength => "Content-Length",
        ContentType => "Content-Type",
        ContentEncoding => "Content-Encoding",
        ContentLanguage => "Content-Language",
        ContentLocation => "Content-Location",
        ContentMd5 => "Content-MD5",
        ContentRange => "Content-Range",
        Expires => "Expires",
        LastModified => "Last-Modified",
        AcceptRanges => "Accept-Ranges",
        Age => "Age",
        Etag => "ETag",
        Location => "Location",
        ProxyAuthenticate => "Proxy-Authenticate",
        RetryAfter => "Retry-After",
        Server => "Server",
        SetCookie => "Set-Cookie",
        Vary => "Vary",
        WwwAuthenticate => "WWW-Authenticate",
    }
}
