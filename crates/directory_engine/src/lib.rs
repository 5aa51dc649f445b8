//! Directory engine: user source over HTTP and background fetch execution.
mod decode;
mod engine;
mod fetch;
mod types;

pub use decode::{decode_user_page, DecodeError};
pub use engine::EngineHandle;
pub use fetch::{ReqwestUserSource, SourceSettings, UserSource, DEFAULT_BASE_URL};
pub use types::{EngineEvent, FailureKind, FetchError, FetchedUser, PageNumber, UserPage};
