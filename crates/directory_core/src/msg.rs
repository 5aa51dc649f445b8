use crate::{FilterKind, PageNumber, SortKey, UserRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the search box.
    SearchChanged(String),
    /// User picked a sort field.
    SortChanged(SortKey),
    /// User picked a filter.
    FilterChanged(FilterKind),
    /// Fetch the next server page, if any remain and none is in flight.
    LoadNextRequested,
    /// User asked to see more rows.
    MoreRequested,
    /// Start over from page 1; page 1 replaces what was accumulated.
    ReloadRequested,
    /// Engine delivered a page.
    PageLoaded {
        page: PageNumber,
        records: Vec<UserRecord>,
        total_pages: u32,
    },
    /// Engine failed to fetch or decode a page.
    PageFailed { page: PageNumber, reason: String },
    /// Blank input line; changes nothing but asks for a redraw.
    NoOp,
}
