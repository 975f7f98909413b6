use crate::credentials::Credentials;
use time::{macros::datetime, OffsetDateTime};

/// Credentials matching the documented reference vector
pub fn get_mock_credentials() -> Credentials {
    Credentials::new("AKIAEXAMPLE", "secretkey", Some("mytag"))
}

/// Timestamp used to sign the reference vector
pub fn get_mock_timestamp() -> OffsetDateTime {
    datetime!(2011-08-01 12:00:00 UTC)
}

/// Query parameters of a basic item search
pub fn item_search_params() -> [(&'static str, &'static str); 2] {
    [("Operation", "ItemSearch"), ("Keywords", "golang")]
}
