use crate::{DirectoryState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// The derived view is refreshed before returning, so `state.view()` always
/// reflects the message just applied.
pub fn update(mut state: DirectoryState, msg: Msg) -> (DirectoryState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchChanged(term) => {
            state.set_search_term(term);
            Vec::new()
        }
        Msg::SortChanged(key) => {
            state.set_sort_key(key);
            Vec::new()
        }
        Msg::FilterChanged(kind) => {
            state.set_filter_kind(kind);
            Vec::new()
        }
        Msg::LoadNextRequested => load_next(&mut state).into_iter().collect(),
        Msg::MoreRequested => request_more(&mut state),
        Msg::ReloadRequested => state
            .begin_reload()
            .map(|page| Effect::FetchPage { page })
            .into_iter()
            .collect(),
        Msg::PageLoaded {
            page,
            records,
            total_pages,
        } => {
            state.apply_page(page, records, total_pages);
            Vec::new()
        }
        Msg::PageFailed { page, reason } => {
            state.apply_failure(page, reason);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    state.refresh_derived();
    (state, effects)
}

fn load_next(state: &mut DirectoryState) -> Option<Effect> {
    state.begin_load().map(|page| Effect::FetchPage { page })
}

fn request_more(state: &mut DirectoryState) -> Vec<Effect> {
    state.refresh_derived();
    let total_matching = state.derived().total_matching;

    if state.visible_window() < total_matching {
        state.grow_window();
        if state.visible_window() > total_matching && state.server_pages_remain() {
            return load_next(state).into_iter().collect();
        }
        return Vec::new();
    }

    // Every fetched match is visible; only a new page can reveal more.
    match load_next(state) {
        Some(effect) => {
            state.grow_window();
            vec![effect]
        }
        None => Vec::new(),
    }
}
