use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use dsql_auth_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use dsql_auth_core::time::{format_date, format_iso8601, now, DateTime};
use dsql_auth_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::request::Parts;
use log::debug;
use percent_encoding::utf8_percent_encode;
use std::fmt::Write;
use std::time::Duration;

/// RequestSigner presigns requests with AWS SigV4 in query parameter style.
///
/// Only presigning is supported: the signature, credential scope and session
/// token all travel in the query string and the payload is always empty.
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// The current time is used when unset.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn scope(&self, now: DateTime) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            format_date(now),
            self.region,
            self.service
        )
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(expires_in) = expires_in else {
            return Err(Error::request_invalid(
                "expires_in is required, only presigned requests are supported",
            ));
        };
        let Some(cred) = credential else {
            return Err(Error::request_invalid("credential is required for signing"));
        };

        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;
        for (_, value) in signed_req.headers.iter_mut() {
            SigningRequest::header_value_normalize(value)?;
        }

        let scope = self.scope(now);
        debug!("calculated scope: {scope}");

        let signed_headers = signed_req.header_name_to_vec_sorted().join(";");
        signed_req.query_push(X_AMZ_ALGORITHM, AWS4_HMAC_SHA256);
        signed_req.query_push(
            X_AMZ_CREDENTIAL,
            format!("{}/{scope}", cred.access_key_id),
        );
        signed_req.query_push(X_AMZ_DATE, format_iso8601(now));
        signed_req.query_push(X_AMZ_SIGNED_HEADERS, signed_headers);
        signed_req.query_push(X_AMZ_EXPIRES, expires_in.as_secs().to_string());
        if let Some(token) = cred.session_token.as_deref().filter(|v| !v.is_empty()) {
            signed_req.query_push(X_AMZ_SECURITY_TOKEN, token);
        }

        // Everything below works on the encoded form, in insertion order.
        signed_req.query = signed_req
            .query
            .iter()
            .map(|(k, v)| {
                (
                    utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                    utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
                )
            })
            .collect();

        let creq = canonical_request_string(&signed_req)?;

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20240827T000000Z
        // 20240827/<region>/dsql/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{AWS4_HMAC_SHA256}")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{scope}")?;
            write!(f, "{}", hex_sha256(creq.as_bytes()))?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());
        signed_req.query_push(X_AMZ_SIGNATURE, signature);

        signed_req.apply(req)
    }
}

/// Build the canonical request from an already encoded query.
fn canonical_request_string(ctx: &SigningRequest) -> Result<String> {
    let mut f = String::with_capacity(256);

    writeln!(f, "{}", ctx.method)?;
    writeln!(f, "{}", ctx.path_normalized())?;

    let mut query = ctx.query.iter().collect::<Vec<_>>();
    query.sort();
    writeln!(
        f,
        "{}",
        query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;

    let signed_headers = ctx.header_name_to_vec_sorted();
    for name in signed_headers.iter() {
        let value = ctx.headers[*name].to_str()?;
        writeln!(f, "{name}:{value}")?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;

    // The body is always empty.
    write!(f, "{}", hex_sha256(&[]))?;

    Ok(f)
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    let secret = format!("AWS4{secret}");
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    hmac_sha256(sign_service.as_slice(), b"aws4_request")
}
