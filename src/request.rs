use crate::{
    credentials::CredentialProvider,
    error::RequestError,
    locale::{self, Locale, REQUEST_PATH},
    query::{self, Params, SIGNATURE_PARAM},
    signer::{self, HmacSha256Signer, Signer},
};
use time::{
    format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime, UtcOffset,
};

const SERVICE: &str = "AWSECommerceService";
const VERSION: &str = "2011-08-01";
const SIGNATURE_VERSION: &str = "2";
const METHOD: &str = "GET";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Associate tag lifecycle. A URL can only be built once the tag is set.
#[derive(Clone, Debug, Default, PartialEq)]
enum AssociateTag {
    #[default]
    Unset,
    Set(String),
}

/// A Product Advertising API request for one locale and credential set.
///
/// The request is reusable: every call to [`Request::url`] produces a new
/// signed URL and leaves the request untouched. `set_tag` needs a mutable
/// borrow, so configure the tag before sharing the request between threads.
#[derive(Clone)]
pub struct Request<S = HmacSha256Signer> {
    locale: Locale,
    access_key: String,
    secret_key: String,
    tag: AssociateTag,
    signer: S,
}

impl Request {
    /// Create a new request for the given locale, `US` when omitted.
    /// Fails with `InvalidLocale` right away if the locale is not supported.
    #[tracing::instrument(skip(provider))]
    pub fn new<P: CredentialProvider>(
        locale: Option<&str>,
        provider: P,
    ) -> Result<Request, RequestError> {
        Request::with_signer(locale, provider, HmacSha256Signer)
    }
}

impl<S: Signer> Request<S> {
    /// Create a new request that signs with a custom signer.
    pub fn with_signer<P: CredentialProvider>(
        locale: Option<&str>,
        provider: P,
        signer: S,
    ) -> Result<Request<S>, RequestError> {
        let locale = locale::resolve(locale)?;
        let tag = match provider.tag() {
            Some(tag) => AssociateTag::Set(tag.into()),
            None => AssociateTag::Unset,
        };

        tracing::debug!(host = locale.host(), "request initialized");
        Ok(Request {
            locale,
            access_key: provider.access_key().into(),
            secret_key: provider.secret_key().into(),
            tag,
            signer,
        })
    }

    /// Set the associate tag, replacing any previous one.
    pub fn set_tag(&mut self, tag: &str) {
        self.tag = AssociateTag::Set(tag.into());
    }

    /// Get the associate tag.
    ///
    /// Fails with `MissingTag` if it hasn't been set yet.
    pub fn tag(&self) -> Result<&str, RequestError> {
        match &self.tag {
            AssociateTag::Set(tag) => Ok(tag.as_str()),
            AssociateTag::Unset => Err(RequestError::MissingTag),
        }
    }

    /// Locale the request is sent to.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// API host the request is sent to.
    pub fn host(&self) -> &'static str {
        self.locale.host()
    }

    /// Endpoint URL, without query string.
    pub fn endpoint(&self) -> String {
        self.locale.endpoint()
    }

    /// Build a signed URL timestamped with the current time.
    pub fn url<I, K, V>(&self, params: I) -> Result<String, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.url_at(params, OffsetDateTime::now_utc())
    }

    /// Build a signed URL with an explicit timestamp.
    /// The output only depends on the arguments and the request state.
    #[tracing::instrument(skip(self, params), fields(locale = %self.locale))]
    pub fn url_at<I, K, V>(
        &self,
        params: I,
        timestamp: OffsetDateTime,
    ) -> Result<String, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params = query::merge(self.fixed_params(timestamp)?, params);
        let canonical = query::canonical_query(&params);

        let data = signer::string_to_sign(METHOD, self.host(), REQUEST_PATH, &canonical);
        let signature = self.signer.sign(&self.secret_key, &data)?;

        tracing::debug!(params = params.len(), "signed request");
        Ok(format!(
            "{}?{}&{}={}",
            self.endpoint(),
            canonical,
            SIGNATURE_PARAM,
            query::encode(&signature)
        ))
    }

    /// Parameters every request carries, caller input never overrides them.
    fn fixed_params(&self, timestamp: OffsetDateTime) -> Result<Params, RequestError> {
        let tag = self.tag()?;
        if self.access_key.is_empty() {
            return Err(RequestError::SigningFailure("empty access key".into()));
        }
        if self.secret_key.is_empty() {
            return Err(RequestError::SigningFailure("empty secret key".into()));
        }

        let timestamp = timestamp
            .to_offset(UtcOffset::UTC)
            .format(TIMESTAMP_FORMAT)
            .map_err(|e| RequestError::SigningFailure(e.to_string()))?;

        let mut params = Params::new();
        params.insert("AssociateTag".into(), tag.into());
        params.insert("Service".into(), SERVICE.into());
        params.insert("Version".into(), VERSION.into());
        params.insert("AWSAccessKeyId".into(), self.access_key.clone());
        params.insert("SignatureMethod".into(), self.signer.signature_method().into());
        params.insert("SignatureVersion".into(), SIGNATURE_VERSION.into());
        params.insert("Timestamp".into(), timestamp);
        Ok(params)
    }
}

impl<S> std::fmt::Debug for Request<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("locale", &self.locale)
            .field("access_key", &self.access_key)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{credentials::Credentials, test_util::*};
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_invalid_locale_fails_at_construction() {
        let res = Request::new(Some("XX"), get_mock_credentials());
        assert!(matches!(res, Err(RequestError::InvalidLocale(code)) if code == "XX"));
    }

    #[test]
    fn test_missing_tag() -> Result<(), RequestError> {
        // GIVEN a request without a tag
        let mut req = Request::new(None, Credentials::new("AKIAEXAMPLE", "secretkey", None))?;
        assert_eq!(Locale::US, req.locale());

        // WHEN building a URL
        // THEN it fails until the tag is set
        let res = req.url_at(item_search_params(), get_mock_timestamp());
        assert!(matches!(res, Err(RequestError::MissingTag)));

        req.set_tag("mytag");
        assert_eq!("mytag", req.tag()?);
        req.url_at(item_search_params(), get_mock_timestamp())?;

        Ok(())
    }

    #[test]
    fn test_reference_url() -> Result<(), RequestError> {
        let req = Request::new(Some("US"), get_mock_credentials())?;

        let url = req.url_at(item_search_params(), get_mock_timestamp())?;
        assert_eq!(
            "http://ecs.amazonaws.com/onca/xml?AWSAccessKeyId=AKIAEXAMPLE&AssociateTag=mytag\
             &Keywords=golang&Operation=ItemSearch&Service=AWSECommerceService\
             &SignatureMethod=HmacSHA256&SignatureVersion=2&Timestamp=2011-08-01T12%3A00%3A00Z\
             &Version=2011-08-01&Signature=70XrWQB%2FV69MtokDWbU7tHfDeclno4Nlt5WvBGeeV%2BM%3D",
            url
        );

        Ok(())
    }

    #[test]
    fn test_encoded_values_are_signed() -> Result<(), RequestError> {
        let req = Request::new(Some("US"), get_mock_credentials())?;

        let url = req.url_at(
            [("Operation", "ItemSearch"), ("Keywords", "rust & go lang")],
            get_mock_timestamp(),
        )?;
        assert!(url.contains("&Keywords=rust%20%26%20go%20lang&"));
        assert!(url.ends_with("&Signature=cffRqZJkVOBGgslCJBAqFTBSb9eXBTNK69ouvIgfsi0%3D"));

        Ok(())
    }

    #[test]
    fn test_fixed_params_win() -> Result<(), RequestError> {
        let mut req = Request::new(Some("DE"), Credentials::new("AKIAEXAMPLE", "secretkey", None))?;
        req.set_tag("tag123");

        let mut params = HashMap::new();
        params.insert("Operation", "ItemLookup");
        params.insert("AssociateTag", "spoofed");
        params.insert("Service", "OtherService");
        params.insert("Version", "2000-01-01");
        params.insert("Signature", "forged");

        let url = req.url_at(params, get_mock_timestamp())?;
        assert!(url.starts_with("http://ecs.amazonaws.de/onca/xml?"));
        assert!(url.contains("AssociateTag=tag123&"));
        assert!(url.contains("Service=AWSECommerceService&"));
        assert!(url.contains("Version=2011-08-01&"));
        assert!(!url.contains("spoofed"));
        assert!(!url.contains("forged"));
        assert_eq!(1, url.matches("Signature=").count());

        Ok(())
    }

    #[test]
    fn test_url_is_deterministic() -> Result<(), RequestError> {
        let req = Request::new(Some("JP"), get_mock_credentials())?;

        let mut forward = HashMap::new();
        let mut backward = BTreeMap::new();
        for (k, v) in [("Operation", "ItemSearch"), ("Keywords", "golang"), ("SearchIndex", "Books")] {
            forward.insert(k, v);
        }
        for (k, v) in [("SearchIndex", "Books"), ("Keywords", "golang"), ("Operation", "ItemSearch")] {
            backward.insert(k, v);
        }

        let first = req.url_at(&forward, get_mock_timestamp())?;
        let second = req.url_at(&backward, get_mock_timestamp())?;
        assert_eq!(first, second);
        assert_eq!(first, req.url_at(&forward, get_mock_timestamp())?);

        Ok(())
    }

    #[test]
    fn test_secret_changes_signature() -> Result<(), RequestError> {
        let req = Request::new(Some("US"), get_mock_credentials())?;
        let other = Request::new(
            Some("US"),
            Credentials::new("AKIAEXAMPLE", "secretkez", Some("mytag")),
        )?;

        let url = other.url_at(item_search_params(), get_mock_timestamp())?;
        assert_ne!(req.url_at(item_search_params(), get_mock_timestamp())?, url);
        assert!(url.ends_with("&Signature=2RQpMXIpEOep6g%2FwsN9d%2F0%2F%2FekVWysZPiiyojvI6QwI%3D"));

        Ok(())
    }

    #[test]
    fn test_empty_credentials_fail_signing() -> Result<(), RequestError> {
        let req = Request::new(None, Credentials::new("AKIAEXAMPLE", "", Some("mytag")))?;
        let res = req.url_at(item_search_params(), get_mock_timestamp());
        assert!(matches!(res, Err(RequestError::SigningFailure(_))));

        let req = Request::new(None, Credentials::new("", "secretkey", Some("mytag")))?;
        let res = req.url_at(item_search_params(), get_mock_timestamp());
        assert!(matches!(res, Err(RequestError::SigningFailure(_))));

        Ok(())
    }

    #[test]
    fn test_timestamp_is_converted_to_utc() -> Result<(), RequestError> {
        let req = Request::new(None, get_mock_credentials())?;
        let local = get_mock_timestamp().to_offset(time::macros::offset!(+9));

        assert_eq!(
            req.url_at(item_search_params(), get_mock_timestamp())?,
            req.url_at(item_search_params(), local)?
        );

        Ok(())
    }

    #[test]
    fn test_timestamp_format() -> Result<(), RequestError> {
        let req = Request::new(None, get_mock_credentials())?;
        let params = req.fixed_params(time::macros::datetime!(2011-01-02 03:04:05 UTC))?;
        assert_eq!(Some("2011-01-02T03:04:05Z"), params.get("Timestamp").map(String::as_str));
        Ok(())
    }

    #[test]
    fn test_custom_signer() -> Result<(), RequestError> {
        struct FixedSigner;

        impl Signer for FixedSigner {
            fn signature_method(&self) -> &'static str {
                "Fixed"
            }

            fn sign(&self, _secret: &str, _data: &str) -> Result<String, RequestError> {
                Ok("fixed signature".into())
            }
        }

        let req = Request::with_signer(Some("FR"), get_mock_credentials(), FixedSigner)?;
        let url = req.url_at(item_search_params(), get_mock_timestamp())?;
        assert!(url.starts_with("http://ecs.amazonaws.fr/onca/xml?"));
        assert!(url.contains("&SignatureMethod=Fixed&"));
        assert!(url.ends_with("&Signature=fixed%20signature"));

        Ok(())
    }

    #[test]
    fn test_debug_redacts_secret() -> Result<(), RequestError> {
        let req = Request::new(None, get_mock_credentials())?;
        assert!(!format!("{req:?}").contains("secretkey"));
        Ok(())
    }
}
