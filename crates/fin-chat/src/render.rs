//! Presentation helpers shared by the CLI and host apps.
//!
//! Everything here is a pure function of the conversation state, so hosts
//! can render the same way the terminal client does.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\(\s*([^)\s]+)\s*\)").expect("valid regex")
});
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s,;()<>\[\]"']+"#).expect("valid regex")
});

/// Example questions shown while the conversation is empty.
pub const EXAMPLE_QUESTIONS: [&str; 4] = [
    "How should I create a monthly budget?",
    "What are the best investment strategies?",
    "Should I buy a house or keep renting?",
    "How can I pay off my credit card debt?",
];

/// Trims a line of user input, returning `None` if nothing is left.
///
/// Empty input is rejected here, before anything is submitted.
#[inline]
pub fn validate_input(line: &str) -> Option<&str> {
    let line = line.trim();
    (!line.is_empty()).then_some(line)
}

/// Describes how long ago `created_at` was, relative to `now`.
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "just now".to_owned()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if elapsed.num_hours() < 24 {
        format!("{} h ago", elapsed.num_hours())
    } else {
        created_at.format("%Y-%m-%d").to_string()
    }
}

/// A link found in the sidebar text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    /// The text to show.
    pub title: String,
    /// The target address.
    pub url: String,
}

/// One line of the sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SidebarEntry {
    /// A recognized link.
    Link(Link),
    /// A line without any link, shown verbatim.
    Text(String),
}

/// Splits the sidebar text into displayable entries.
///
/// The service sends search results as a markdown list, so `[title](url)`
/// links are recognized first. Lines without markdown links fall back to
/// bare `http(s)://` addresses, and lines with neither are kept as text.
/// Blank lines are dropped.
pub fn sidebar_entries(sidebar_text: &str) -> Vec<SidebarEntry> {
    let mut entries = Vec::new();
    for line in sidebar_text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        let before = entries.len();
        for caps in MARKDOWN_LINK.captures_iter(line) {
            let url = caps[2].to_owned();
            let title = match caps[1].trim() {
                "" => url.clone(),
                title => title.to_owned(),
            };
            entries.push(SidebarEntry::Link(Link { title, url }));
        }
        if entries.len() == before {
            for m in BARE_URL.find_iter(line) {
                let url = m.as_str().trim_end_matches('.').to_owned();
                entries.push(SidebarEntry::Link(Link {
                    title: url.clone(),
                    url,
                }));
            }
        }
        if entries.len() == before {
            let text = line.trim_start_matches(['-', '*']).trim();
            entries.push(SidebarEntry::Text(text.to_owned()));
        }
    }
    entries
}
