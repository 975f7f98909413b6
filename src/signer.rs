//! Signature version 2 request signing.
//!
//! The string to sign is the HTTP method, the lowercase host, the request
//! path and the canonical query string, joined by newlines.
use crate::error::RequestError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Capability that turns a string to sign into a signature.
pub trait Signer: Send + Sync {
    /// Value sent in the `SignatureMethod` parameter.
    fn signature_method(&self) -> &'static str;

    /// Compute the signature of `data` keyed with `secret`.
    fn sign(&self, secret: &str, data: &str) -> Result<String, RequestError>;
}

/// HMAC-SHA256 signer, producing base64 encoded signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSha256Signer;

impl Signer for HmacSha256Signer {
    fn signature_method(&self) -> &'static str {
        "HmacSHA256"
    }

    fn sign(&self, secret: &str, data: &str) -> Result<String, RequestError> {
        if secret.is_empty() {
            return Err(RequestError::SigningFailure("empty secret key".into()));
        }

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| RequestError::SigningFailure(e.to_string()))?;
        mac.update(data.as_bytes());

        Ok(base64::encode(mac.finalize().into_bytes()))
    }
}

/// Build the string to sign for a request.
pub fn string_to_sign(method: &str, host: &str, path: &str, canonical_query: &str) -> String {
    let host = host.to_lowercase();
    [method, host.as_str(), path, canonical_query].join("\n")
}
