use std::fmt::Write;

use directory_core::{DirectoryViewModel, FilterKind, LoadStatus, SortKey, UserRecord};

const NAME_WIDTH: usize = 24;
const EMAIL_WIDTH: usize = 32;

/// Renders one frame of the directory as plain text.
pub fn render(view: &DirectoryViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User Directory");
    let _ = writeln!(out, "Browse and search through our user database");
    let _ = writeln!(out, "{}", controls_line(view));

    if let Some(message) = &view.error_message {
        let _ = writeln!(out, "! {message}");
    }

    if view.show_spinner {
        let _ = writeln!(out, "Loading users...");
        return out;
    }

    if !view.visible_records.is_empty() {
        let _ = writeln!(
            out,
            "{:>4}  {:<NAME_WIDTH$}  {:<EMAIL_WIDTH$}  Avatar",
            "ID", "Name", "Email"
        );
        for record in &view.visible_records {
            let _ = writeln!(out, "{}", format_row(record));
        }
    }

    if view.show_no_results {
        let _ = writeln!(out, "No users found matching your criteria.");
    } else if view.total_matching > 0 {
        let _ = writeln!(
            out,
            "Showing {} of {} users",
            view.visible_records.len(),
            view.total_matching
        );
    }

    if view.status == LoadStatus::Loading {
        let _ = writeln!(out, "Loading...");
    } else if view.can_request_more {
        let _ = writeln!(out, "Type 'more' to load more");
    }
    out
}

fn controls_line(view: &DirectoryViewModel) -> String {
    let sort = match view.sort_key {
        SortKey::FirstName => "first name",
        SortKey::LastName => "last name",
        SortKey::Email => "email",
    };
    let filter = match view.filter_kind {
        FilterKind::All => "all users",
        FilterKind::GmailOnly => "gmail users",
        FilterKind::FirstLetterA => "names starting with A",
    };
    format!(
        "search: \"{}\" | sort: {} | filter: {} | pages: {}/{}",
        view.search_term, sort, filter, view.server_page, view.server_total_pages
    )
}

fn format_row(record: &UserRecord) -> String {
    format!(
        "{:>4}  {:<NAME_WIDTH$}  {:<EMAIL_WIDTH$}  {}",
        record.id,
        clip(&record.full_name(), NAME_WIDTH),
        clip(&record.email, EMAIL_WIDTH),
        record.avatar_url
    )
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}
