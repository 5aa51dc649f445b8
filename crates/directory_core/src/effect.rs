#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one server page. At most one is outstanding at a time.
    FetchPage { page: crate::PageNumber },
}
