//! Directory core: pure state machine, derivation pipeline and view model.
mod derive;
mod effect;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use derive::{collate, derive_view, filter_and_sort, DerivedView, Query, PAGE_SIZE};
pub use effect::Effect;
pub use msg::Msg;
pub use record::{FilterKind, SortKey, UserId, UserRecord};
pub use state::{DirectoryState, LoadStatus, PageNumber};
pub use update::update;
pub use view_model::DirectoryViewModel;
