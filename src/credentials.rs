use crate::error::RequestError;
use serde::Deserialize;
use std::fmt;

const ACCESS_KEY_VAR: &str = "AMAZON_API_KEY";
const SECRET_KEY_VAR: &str = "AMAZON_API_SECRET";
const TAG_VAR: &str = "AMAZON_API_TAG";

/// Source of the secrets used to sign requests.
///
/// The request builder only reads these values once, when it's created.
pub trait CredentialProvider {
    /// AWS access key id.
    fn access_key(&self) -> &str;
    /// AWS secret access key.
    fn secret_key(&self) -> &str;
    /// Associate tag, if the source knows it.
    fn tag(&self) -> Option<&str> {
        None
    }
}

/// `Credentials` holds the three values the Product Advertising API needs
#[derive(Clone, Default, Deserialize, PartialEq)]
pub struct Credentials {
    /// AWS access key id
    #[serde(alias = "key")]
    pub access_key: String,
    /// AWS secret access key
    #[serde(alias = "secret")]
    pub secret_key: String,
    /// Associate tag
    #[serde(default)]
    pub tag: Option<String>,
}

impl Credentials {
    /// Build credentials from their parts.
    pub fn new(access_key: &str, secret_key: &str, tag: Option<&str>) -> Credentials {
        Credentials {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            tag: tag.map(Into::into),
        }
    }

    /// Read credentials from `AMAZON_API_KEY`, `AMAZON_API_SECRET`
    /// and the optional `AMAZON_API_TAG` environment variables.
    pub fn from_env() -> Result<Credentials, RequestError> {
        Credentials::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through a variable lookup.
    /// An empty tag counts as no tag.
    pub fn from_lookup<F>(lookup: F) -> Result<Credentials, RequestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var =
            |name: &str| lookup(name).ok_or_else(|| RequestError::MissingCredentials(name.into()));

        Ok(Credentials {
            access_key: var(ACCESS_KEY_VAR)?,
            secret_key: var(SECRET_KEY_VAR)?,
            tag: lookup(TAG_VAR).filter(|t| !t.is_empty()),
        })
    }

    /// Parse a JSON credentials document.
    pub fn from_json(document: &str) -> Result<Credentials, RequestError> {
        Ok(serde_json::from_str(document)?)
    }
}

impl CredentialProvider for Credentials {
    fn access_key(&self) -> &str {
        &self.access_key
    }

    fn secret_key(&self) -> &str {
        &self.secret_key
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"** redacted **")
            .field("tag", &self.tag)
            .finish()
    }
}

impl CredentialProvider for aws_types::Credentials {
    fn access_key(&self) -> &str {
        self.access_key_id()
    }

    fn secret_key(&self) -> &str {
        self.secret_access_key()
    }
}

impl<P: CredentialProvider + ?Sized> CredentialProvider for &P {
    fn access_key(&self) -> &str {
        (**self).access_key()
    }

    fn secret_key(&self) -> &str {
        (**self).secret_key()
    }

    fn tag(&self) -> Option<&str> {
        (**self).tag()
    }
}
