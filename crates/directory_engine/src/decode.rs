use serde::Deserialize;

use crate::{FetchedUser, UserPage};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid user page json: {message}")]
    Json { message: String },
}

/// Wire shape of `GET /users?page=N`. Fields we do not use are ignored.
#[derive(Debug, Deserialize)]
struct WirePage {
    data: Vec<FetchedUser>,
    total_pages: u32,
}

/// Decode a user listing body. A reported `total_pages` of 0 becomes 1.
pub fn decode_user_page(bytes: &[u8]) -> Result<UserPage, DecodeError> {
    let wire: WirePage = serde_json::from_slice(bytes).map_err(|err| DecodeError::Json {
        message: err.to_string(),
    })?;
    Ok(UserPage {
        records: wire.data,
        total_pages: wire.total_pages.max(1),
    })
}
