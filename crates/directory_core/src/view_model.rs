use crate::{FilterKind, LoadStatus, PageNumber, SortKey, UserRecord};

/// Everything the display surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryViewModel {
    pub visible_records: Vec<UserRecord>,
    pub total_matching: usize,
    pub has_more: bool,
    pub status: LoadStatus,
    pub search_term: String,
    pub sort_key: SortKey,
    pub filter_kind: FilterKind,
    pub server_page: PageNumber,
    pub server_total_pages: u32,
    pub accumulated_count: usize,
    /// Loading with nothing to show yet.
    pub show_spinner: bool,
    pub show_no_results: bool,
    pub can_request_more: bool,
    pub error_message: Option<String>,
    pub dirty: bool,
}
