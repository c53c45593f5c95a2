use regex::Regex;
use std::sync::LazyLock;

/// Length of a YouTube video id.
pub const YOUTUBE_ID_LEN: usize = 11;

// The leading `.*` is greedy, so the last marker in the URL wins.
static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("YouTube URL pattern is valid")
});

/// Pulls the video id out of a pasted share, embed, watch or parameterised
/// link. Returns `None` unless exactly eleven characters follow the marker.
pub fn extract_youtube_id(url: &str) -> Option<String> {
    let captures = YOUTUBE_URL.captures(url)?;
    let id = captures.get(2)?.as_str();
    (id.chars().count() == YOUTUBE_ID_LEN).then(|| id.to_string())
}

/// Accepts either a bare id or any URL `extract_youtube_id` understands.
pub fn parse_youtube_ref(input: &str) -> Option<String> {
    let input = input.trim();
    if is_bare_id(input) {
        return Some(input.to_string());
    }
    extract_youtube_id(input)
}

fn is_bare_id(input: &str) -> bool {
    input.len() == YOUTUBE_ID_LEN
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
