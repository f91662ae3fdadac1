use crate::{Error, Result};
use http::header;
use http::uri::{Authority, PathAndQuery, Scheme};
use http::{HeaderMap, HeaderValue, Method, Uri};
use std::str::FromStr;

/// Signing context for request.
///
/// Built from `http::request::Parts`, mutated by a signer and applied back.
/// The request does not need an absolute URI: a `Host` header is enough,
/// which is what presigned token requests look like.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme, kept only to be returned on apply.
    pub scheme: Option<Scheme>,
    /// HTTP authority, kept only to be returned on apply.
    pub authority: Option<Authority>,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    ///
    /// `parts` is only read, so a failed signing leaves it as it was.
    pub fn build(parts: &http::request::Parts) -> Result<Self> {
        let uri = parts.uri.clone().into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        let mut headers = parts.headers.clone();
        if headers.get(header::HOST).is_none() {
            let Some(authority) = &uri.authority else {
                return Err(Error::request_invalid(
                    "request without host is invalid for signing",
                ));
            };
            headers.insert(header::HOST, HeaderValue::from_str(authority.as_str())?);
        }

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme,
            authority: uri.authority,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers,
        })
    }

    /// Apply the signing context back to http::request::Parts.
    ///
    /// Query pairs are written as is, callers must encode them first.
    /// `parts` is only touched once the new URI is known to be valid.
    pub fn apply(self, parts: &mut http::request::Parts) -> Result<()> {
        let paq = if self.query.is_empty() {
            self.path
        } else {
            let mut s = self.path;
            s.push('?');
            s.push_str(&Self::query_to_string(&self.query));
            s
        };

        let mut uri_parts = http::uri::Parts::default();
        uri_parts.scheme = self.scheme;
        uri_parts.authority = self.authority;
        uri_parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
        let uri = Uri::from_parts(uri_parts)?;

        parts.method = self.method;
        parts.uri = uri;
        parts.headers = self.headers;
        Ok(())
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Join query pairs with `&`, omitting `=` for empty values.
    ///
    /// ```shell
    /// [(a, b), (c, "")] => "a=b&c"
    /// ```
    pub fn query_to_string(query: &[(String, String)]) -> String {
        let mut s = String::with_capacity(query.iter().map(|(k, v)| k.len() + v.len() + 2).sum());

        for (idx, (k, v)) in query.iter().enumerate() {
            if idx != 0 {
                s.push('&');
            }

            s.push_str(k);
            if !v.is_empty() {
                s.push('=');
                s.push_str(v);
            }
        }

        s
    }

    /// Normalize header value by trimming surrounding spaces.
    pub fn header_value_normalize(v: &mut HeaderValue) -> Result<()> {
        let bs = v.as_bytes();

        let Some(starting_index) = bs.iter().position(|b| *b != b' ') else {
            *v = HeaderValue::from_static("");
            return Ok(());
        };
        let ending_offset = bs.iter().rev().position(|b| *b != b' ').unwrap_or(0);
        let ending_index = bs.len() - ending_offset;

        let sensitive = v.is_sensitive();
        *v = HeaderValue::from_bytes(&bs[starting_index..ending_index])?;
        v.set_sensitive(sensitive);
        Ok(())
    }

    /// Get header names as sorted vector.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }

    /// Get the path with dot segments resolved and duplicate slashes removed.
    ///
    /// A trailing slash is kept so `/a/` and `/a` stay distinct.
    pub fn path_normalized(&self) -> String {
        let mut segments: Vec<&str> = Vec::new();
        for seg in self.path.split('/') {
            match seg {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }

        let mut normalized = String::with_capacity(self.path.len().max(1));
        normalized.push('/');
        normalized.push_str(&segments.join("/"));
        if !segments.is_empty() && self.path.ends_with('/') {
            normalized.push('/');
        }
        normalized
    }
}
