use crate::derive::{derive_view, DerivedView, Query, PAGE_SIZE};
use crate::view_model::DirectoryViewModel;
use crate::{FilterKind, SortKey, UserRecord};

pub type PageNumber = u32;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DeriveKey {
    query: Query,
    visible_window: usize,
    accumulated_version: u64,
    server_pages_remain: bool,
}

/// Last derivation, reused until one of its inputs changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewMemo {
    key: Option<DeriveKey>,
    derived: DerivedView,
    recomputations: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryState {
    accumulated: Vec<UserRecord>,
    accumulated_version: u64,
    query: Query,
    server_page: PageNumber,
    server_total_pages: u32,
    visible_window: usize,
    status: LoadStatus,
    in_flight: Option<PageNumber>,
    memo: ViewMemo,
    dirty: bool,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryState {
    pub fn new() -> Self {
        let mut state = Self {
            accumulated: Vec::new(),
            accumulated_version: 0,
            query: Query::default(),
            server_page: 0,
            server_total_pages: 1,
            visible_window: PAGE_SIZE,
            status: LoadStatus::Idle,
            in_flight: None,
            memo: ViewMemo::default(),
            dirty: false,
        };
        state.refresh_derived();
        state
    }

    pub fn view(&self) -> DirectoryViewModel {
        let derived = &self.memo.derived;
        let loading = self.status == LoadStatus::Loading;
        let failed = matches!(self.status, LoadStatus::Failed(_));
        let shown = derived.visible_records.len();
        DirectoryViewModel {
            visible_records: derived.visible_records.clone(),
            total_matching: derived.total_matching,
            has_more: derived.has_more,
            status: self.status.clone(),
            search_term: self.query.search_term.clone(),
            sort_key: self.query.sort_key,
            filter_kind: self.query.filter_kind,
            server_page: self.server_page,
            server_total_pages: self.server_total_pages,
            accumulated_count: self.accumulated.len(),
            show_spinner: loading && shown == 0,
            show_no_results: !loading && !failed && derived.total_matching == 0,
            can_request_more: !loading
                && (shown < derived.total_matching || self.server_pages_remain()),
            error_message: match &self.status {
                LoadStatus::Failed(reason) => Some(format!(
                    "Failed to fetch users. Please try again. ({reason})"
                )),
                _ => None,
            },
            dirty: self.dirty,
        }
    }

    pub fn accumulated(&self) -> &[UserRecord] {
        &self.accumulated
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn server_page(&self) -> PageNumber {
        self.server_page
    }

    pub fn server_total_pages(&self) -> u32 {
        self.server_total_pages
    }

    pub fn visible_window(&self) -> usize {
        self.visible_window
    }

    pub fn derived(&self) -> &DerivedView {
        &self.memo.derived
    }

    /// Number of times the pipeline actually ran.
    pub fn derivations(&self) -> u64 {
        self.memo.recomputations
    }

    /// Returns and clears the "display needs a redraw" flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn server_pages_remain(&self) -> bool {
        self.server_page < self.server_total_pages
    }

    pub(crate) fn set_search_term(&mut self, term: String) {
        if self.query.search_term != term {
            self.query.search_term = term;
            self.dirty = true;
        }
    }

    pub(crate) fn set_sort_key(&mut self, key: SortKey) {
        if self.query.sort_key != key {
            self.query.sort_key = key;
            self.dirty = true;
        }
    }

    pub(crate) fn set_filter_kind(&mut self, kind: FilterKind) {
        if self.query.filter_kind != kind {
            self.query.filter_kind = kind;
            self.dirty = true;
        }
    }

    pub(crate) fn grow_window(&mut self) {
        self.visible_window += PAGE_SIZE;
        self.dirty = true;
    }

    /// Marks the next page as in flight and returns its number, or `None`
    /// while a fetch is outstanding or when no pages remain.
    pub(crate) fn begin_load(&mut self) -> Option<PageNumber> {
        if self.status == LoadStatus::Loading || !self.server_pages_remain() {
            return None;
        }
        let page = self.server_page + 1;
        self.status = LoadStatus::Loading;
        self.in_flight = Some(page);
        self.dirty = true;
        Some(page)
    }

    /// Requests page 1 again. Paging and the window keep their values until
    /// the page arrives, so a failed reload leaves the display as it was.
    pub(crate) fn begin_reload(&mut self) -> Option<PageNumber> {
        if self.status == LoadStatus::Loading {
            return None;
        }
        self.status = LoadStatus::Loading;
        self.in_flight = Some(1);
        self.dirty = true;
        Some(1)
    }

    /// Merges the in-flight page. Returns false for a stale completion.
    pub(crate) fn apply_page(
        &mut self,
        page: PageNumber,
        records: Vec<UserRecord>,
        total_pages: u32,
    ) -> bool {
        if self.in_flight != Some(page) {
            return false;
        }
        if page == 1 {
            self.accumulated = records;
            self.visible_window = PAGE_SIZE;
        } else {
            self.accumulated.extend(records);
        }
        self.accumulated_version += 1;
        self.server_page = page;
        self.server_total_pages = total_pages.max(1);
        self.status = LoadStatus::Idle;
        self.in_flight = None;
        self.dirty = true;
        true
    }

    /// Records a failed fetch. `accumulated` is left untouched.
    pub(crate) fn apply_failure(&mut self, page: PageNumber, reason: String) -> bool {
        if self.in_flight != Some(page) {
            return false;
        }
        self.status = LoadStatus::Failed(reason);
        self.in_flight = None;
        self.dirty = true;
        true
    }

    pub(crate) fn refresh_derived(&mut self) {
        let key = DeriveKey {
            query: self.query.clone(),
            visible_window: self.visible_window,
            accumulated_version: self.accumulated_version,
            server_pages_remain: self.server_pages_remain(),
        };
        if self.memo.key.as_ref() == Some(&key) {
            return;
        }
        self.memo.derived = derive_view(
            &self.accumulated,
            &key.query,
            key.visible_window,
            key.server_pages_remain,
        );
        self.memo.key = Some(key);
        self.memo.recomputations += 1;
    }
}
