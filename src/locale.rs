use crate::error::RequestError;
use std::{fmt, str::FromStr};

/// Path every Product Advertising API request is sent to.
pub const REQUEST_PATH: &str = "/onca/xml";

/// `Locale` selects the regional Product Advertising API deployment
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Locale {
    /// Canada
    CA,
    /// China
    CN,
    /// Germany
    DE,
    /// Spain
    ES,
    /// France
    FR,
    /// Italy
    IT,
    /// Japan
    JP,
    /// United Kingdom
    UK,
    /// United States
    #[default]
    US,
}

impl Locale {
    /// Every supported locale, in code order.
    pub const ALL: [Locale; 9] = [
        Locale::CA,
        Locale::CN,
        Locale::DE,
        Locale::ES,
        Locale::FR,
        Locale::IT,
        Locale::JP,
        Locale::UK,
        Locale::US,
    ];

    /// Two letter code of the locale.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::CA => "CA",
            Locale::CN => "CN",
            Locale::DE => "DE",
            Locale::ES => "ES",
            Locale::FR => "FR",
            Locale::IT => "IT",
            Locale::JP => "JP",
            Locale::UK => "UK",
            Locale::US => "US",
        }
    }

    /// API host serving the locale.
    pub fn host(&self) -> &'static str {
        match self {
            Locale::CA => "ecs.amazonaws.ca",
            Locale::CN => "webservices.amazon.cn",
            Locale::DE => "ecs.amazonaws.de",
            Locale::ES => "webservices.amazon.es",
            Locale::FR => "ecs.amazonaws.fr",
            Locale::IT => "webservices.amazon.it",
            Locale::JP => "ecs.amazonaws.jp",
            Locale::UK => "ecs.amazonaws.co.uk",
            Locale::US => "ecs.amazonaws.com",
        }
    }

    /// Full endpoint URL, without query string.
    pub fn endpoint(&self) -> String {
        format!("http://{}{}", self.host(), REQUEST_PATH)
    }
}

impl FromStr for Locale {
    type Err = RequestError;

    /// Codes are matched exactly, so `"us"` is rejected.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code() == code)
            .ok_or_else(|| RequestError::InvalidLocale(code.into()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Resolve an optional locale code, defaulting to `US` when it's omitted.
pub fn resolve(code: Option<&str>) -> Result<Locale, RequestError> {
    code.unwrap_or("US").parse()
}
