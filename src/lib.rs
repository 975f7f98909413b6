#![deny(missing_docs)]
//! <fullname>Product Advertising API requests</fullname>
//!
//! Builds signed query URLs for the Amazon Product Advertising API.
//! A request resolves its regional host from a locale, merges the
//! fixed service parameters with the caller's, and signs the canonical
//! query with the secret key. Sending the request is up to the caller.

mod credentials;
pub use credentials::{CredentialProvider, Credentials};

mod error;
pub use error::RequestError;

/// `locale` maps locale codes to regional API hosts
pub mod locale;
pub use locale::Locale;

/// `query` builds canonical query strings
pub mod query;

/// `signer` computes request signatures
pub mod signer;
pub use signer::{HmacSha256Signer, Signer};

mod request;
pub use request::Request;

#[cfg(test)]
mod test_util;
