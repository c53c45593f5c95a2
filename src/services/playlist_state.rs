use std::sync::Arc;

/// Videos a fresh local feed starts with ("Learn Colors", "ABC Song").
pub const DEFAULT_VIDEOS: [&str; 2] = ["d6iQrh2TK98", "5npJ3YnL9nE"];

/// An ordered list of YouTube ids held by a single feed. Mutators return a
/// new snapshot and leave `self` untouched, so a snapshot handed out
/// earlier never changes under its reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistState {
    videos: Arc<[String]>,
}

impl PlaylistState {
    pub fn new<I, S>(videos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            videos: videos.into_iter().map(Into::into).collect(),
        }
    }

    pub fn videos(&self) -> &[String] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Appends the id; duplicates are allowed.
    pub fn with_added(&self, youtube_id: &str) -> Self {
        Self::new(
            self.videos
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(youtube_id)),
        )
    }

    /// Drops every occurrence of the id.
    pub fn without(&self, youtube_id: &str) -> Self {
        Self::new(self.videos.iter().filter(|id| id.as_str() != youtube_id).cloned())
    }
}

impl Default for PlaylistState {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEOS)
    }
}
