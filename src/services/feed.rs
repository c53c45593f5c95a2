//! The kid feed: a vertically paging list of full-screen YouTube players in
//! which at most one item plays, chosen by viewport visibility.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::FeedConfig;
use crate::db::models::Video;
use crate::error::AppError;
use crate::services::likes::{self, LikedVideos};
use crate::services::playlist_state::PlaylistState;
use crate::services::youtube::parse_youtube_ref;
use crate::services::Notice;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub key: String,
    pub youtube_id: String,
    pub video_id: Option<Uuid>,
    pub title: Option<String>,
}

impl FeedItem {
    fn stored(video: Video) -> Self {
        Self {
            key: video.id.to_string(),
            youtube_id: video.youtube_id,
            video_id: Some(video.id),
            title: video.title,
        }
    }

    fn local(youtube_id: &str) -> Self {
        Self {
            key: youtube_id.to_string(),
            youtube_id: youtube_id.to_string(),
            video_id: None,
            title: None,
        }
    }
}

/// One entry of a viewability notification.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewToken {
    pub key: String,
    pub index: usize,
    pub visible_percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    Retry,
    Back,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagingLayout {
    pub paging_enabled: bool,
    pub deceleration: &'static str,
    pub item_height: &'static str,
    pub shows_scroll_indicator: bool,
}

impl Default for PagingLayout {
    fn default() -> Self {
        Self {
            paging_enabled: true,
            deceleration: "fast",
            item_height: "viewport",
            shows_scroll_indicator: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub index: usize,
    pub key: String,
    pub youtube_id: String,
    pub title: Option<String>,
    pub play: bool,
    pub mounted: bool,
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedView {
    Empty { affordances: Vec<Affordance> },
    Paging {
        layout: PagingLayout,
        entries: Vec<FeedEntry>,
    },
}

impl FeedView {
    pub fn entries(&self) -> &[FeedEntry] {
        match self {
            FeedView::Empty { .. } => &[],
            FeedView::Paging { entries, .. } => entries,
        }
    }
}

/// Visibility-driven play state plus the window of mounted players.
#[derive(Debug, Clone)]
pub struct PlayState {
    items: Vec<FeedItem>,
    playing: Option<usize>,
    mounted: BTreeSet<usize>,
    policy: FeedConfig,
}

impl PlayState {
    pub fn new(items: Vec<FeedItem>, policy: FeedConfig) -> Self {
        let mut state = Self {
            items: Vec::new(),
            playing: None,
            mounted: BTreeSet::new(),
            policy,
        };
        state.reset(items);
        state
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Replaces the items and returns to the initial render.
    pub fn reset(&mut self, items: Vec<FeedItem>) {
        self.items = items;
        self.playing = None;
        self.mounted = (0..self.items.len().min(self.policy.initial_num_to_render)).collect();
    }

    /// Replaces the items, keeping the playing item if it is still listed.
    /// The old index wins when it still holds the same key, so a repeated
    /// key does not move playback to its first copy.
    pub fn replace_items(&mut self, items: Vec<FeedItem>) {
        let previous = self.playing.map(|i| (i, self.items[i].key.clone()));
        self.reset(items);
        if let Some((old_index, key)) = previous {
            let index = match self.items.get(old_index) {
                Some(item) if item.key == key => Some(old_index),
                _ => self.items.iter().position(|i| i.key == key),
            };
            if let Some(index) = index {
                self.playing = Some(index);
                self.mounted = BTreeSet::from([index]);
            }
        }
    }

    pub fn playing_key(&self) -> Option<&str> {
        self.playing.map(|i| self.items[i].key.as_str())
    }

    pub fn is_playing(&self, index: usize) -> bool {
        self.playing == Some(index)
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    /// Applies a viewability notification. The first token at or above the
    /// threshold becomes the playing item; with no such token the playing
    /// item is unchanged.
    pub fn on_viewable_items_changed(&mut self, tokens: &[ViewToken]) -> Option<&str> {
        let threshold = self.policy.visible_percent_threshold;
        let next = tokens
            .iter()
            .filter(|t| t.visible_percent >= threshold)
            .find_map(|t| self.locate(t));
        if next.is_some() {
            self.playing = next;
        }
        self.advance_window();
        self.playing_key()
    }

    fn locate(&self, token: &ViewToken) -> Option<usize> {
        match self.items.get(token.index) {
            Some(item) if item.key == token.key => Some(token.index),
            _ => self.items.iter().position(|i| i.key == token.key),
        }
    }

    fn advance_window(&mut self) {
        let Some(playing) = self.playing else {
            return;
        };
        let half = self.policy.window_size.saturating_sub(1) / 2;
        let window = playing.saturating_sub(half)..(playing + half + 1).min(self.items.len());

        self.mounted.retain(|i| window.contains(i));
        self.mounted.insert(playing);

        let mut pending: Vec<usize> = window.filter(|i| !self.mounted.contains(i)).collect();
        pending.sort_by_key(|i| (i.abs_diff(playing), *i));
        self.mounted
            .extend(pending.into_iter().take(self.policy.max_to_render_per_batch));
    }

    pub fn view(&self, liked: &LikedVideos) -> FeedView {
        if self.items.is_empty() {
            return FeedView::Empty {
                affordances: vec![Affordance::Retry, Affordance::Back],
            };
        }
        let entries = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| FeedEntry {
                index,
                key: item.key.clone(),
                youtube_id: item.youtube_id.clone(),
                title: item.title.clone(),
                play: self.is_playing(index),
                mounted: self.mounted.contains(&index),
                liked: item.video_id.is_some_and(|id| liked.contains(&id)),
            })
            .collect();
        FeedView::Paging {
            layout: PagingLayout::default(),
            entries,
        }
    }
}

/// Where a feed gets its videos from.
#[derive(Debug, Clone)]
pub enum FeedSource {
    Playlist(Uuid),
    Local(PlaylistState),
}

#[derive(Debug, Serialize)]
pub struct FeedSnapshot {
    pub id: Uuid,
    pub source: &'static str,
    pub playing: Option<String>,
    pub mounted_players: usize,
    pub view: FeedView,
}

/// A feed opened by one viewer. Locks are never held across a store call.
pub struct FeedSession {
    id: Uuid,
    source: Mutex<FeedSource>,
    state: Mutex<PlayState>,
    liked: Mutex<LikedVideos>,
}

impl FeedSession {
    /// Fetches the items and likes. A failed fetch yields an empty feed and
    /// a notice rather than an error.
    pub async fn open<S: Store + ?Sized>(
        store: &S,
        source: FeedSource,
        policy: FeedConfig,
    ) -> (Self, Option<Notice>) {
        let (items, liked, notice) = fetch(store, &source).await;
        let session = Self {
            id: Uuid::new_v4(),
            source: Mutex::new(source),
            state: Mutex::new(PlayState::new(items, policy)),
            liked: Mutex::new(liked),
        };
        (session, notice)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn refresh<S: Store + ?Sized>(&self, store: &S) -> Option<Notice> {
        let source = lock(&self.source).clone();
        let (items, liked, notice) = fetch(store, &source).await;
        lock(&self.state).reset(items);
        *lock(&self.liked) = liked;
        notice
    }

    pub fn on_viewable_items_changed(&self, tokens: &[ViewToken]) {
        let mut state = lock(&self.state);
        let playing = state.on_viewable_items_changed(tokens);
        log::debug!("Feed {} now playing {:?}", self.id, playing);
    }

    pub async fn toggle_like<S: Store + ?Sized>(
        &self,
        store: &S,
        key: &str,
    ) -> Result<bool, AppError> {
        let item = lock(&self.state)
            .items()
            .iter()
            .find(|i| i.key == key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No video {} in this feed", key)))?;
        let video_id = item.video_id.ok_or_else(|| {
            AppError::validation("Likes", "Only videos saved to a playlist can be liked.")
        })?;
        likes::toggle_like(store, &self.liked, video_id).await
    }

    /// Adds a video to a local feed from a URL or bare id.
    pub fn enqueue(&self, input: &str) -> Result<(), AppError> {
        let youtube_id = parse_youtube_ref(input)
            .ok_or_else(|| AppError::validation("Error", "Invalid YouTube URL"))?;
        self.update_local(|state| state.with_added(&youtube_id))
    }

    pub fn dequeue(&self, youtube_id: &str) -> Result<(), AppError> {
        self.update_local(|state| state.without(youtube_id))
    }

    fn update_local(
        &self,
        update: impl FnOnce(&PlaylistState) -> PlaylistState,
    ) -> Result<(), AppError> {
        let mut source = lock(&self.source);
        let FeedSource::Local(state) = &*source else {
            return Err(AppError::validation(
                "Error",
                "Playlist feeds are edited from parent mode.",
            ));
        };
        let next = update(state);
        let items = next.videos().iter().map(|id| FeedItem::local(id)).collect();
        *source = FeedSource::Local(next);
        lock(&self.state).replace_items(items);
        Ok(())
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let source = match &*lock(&self.source) {
            FeedSource::Playlist(_) => "playlist",
            FeedSource::Local(_) => "local",
        };
        let state = lock(&self.state);
        let liked = lock(&self.liked);
        FeedSnapshot {
            id: self.id,
            source,
            playing: state.playing_key().map(str::to_string),
            mounted_players: state.mounted_count(),
            view: state.view(&liked),
        }
    }
}

async fn fetch<S: Store + ?Sized>(
    store: &S,
    source: &FeedSource,
) -> (Vec<FeedItem>, LikedVideos, Option<Notice>) {
    match source {
        FeedSource::Local(state) => (
            state.videos().iter().map(|id| FeedItem::local(id)).collect(),
            LikedVideos::default(),
            None,
        ),
        FeedSource::Playlist(playlist_id) => {
            match futures::try_join!(store.list_videos(*playlist_id), store.liked_video_ids()) {
                Ok((videos, liked)) => (
                    videos.into_iter().map(FeedItem::stored).collect(),
                    liked.into_iter().collect(),
                    None,
                ),
                Err(e) => {
                    log::error!("Error fetching videos for feed: {}", e);
                    (
                        Vec::new(),
                        LikedVideos::default(),
                        Some(Notice::new("Error fetching videos", e.to_string())),
                    )
                }
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Open feed sessions, keyed by id. Sessions idle for longer than
/// `session_idle_secs` are dropped on the next open, and the oldest-seen
/// session is dropped when `max_open_sessions` is reached.
pub struct FeedRegistry {
    sessions: RwLock<HashMap<Uuid, OpenSession>>,
    policy: FeedConfig,
}

struct OpenSession {
    session: Arc<FeedSession>,
    last_seen: Instant,
}

impl FeedRegistry {
    pub fn new(policy: FeedConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> FeedConfig {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&self, session: FeedSession) -> Arc<FeedSession> {
        self.insert_at(session, Instant::now())
    }

    fn insert_at(&self, session: FeedSession, now: Instant) -> Arc<FeedSession> {
        let session = Arc::new(session);
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        self.evict(&mut sessions, now);
        sessions.insert(
            session.id(),
            OpenSession {
                session: session.clone(),
                last_seen: now,
            },
        );
        session
    }

    fn evict(&self, sessions: &mut HashMap<Uuid, OpenSession>, now: Instant) {
        let idle = Duration::from_secs(self.policy.session_idle_secs);
        let before = sessions.len();
        sessions.retain(|_, open| now.saturating_duration_since(open.last_seen) <= idle);

        while sessions.len() >= self.policy.max_open_sessions.max(1) {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, open)| open.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            log::info!("Evicted {} idle feed session(s)", evicted);
        }
    }

    /// Looks up an open feed and marks it as seen.
    pub fn get(&self, id: Uuid) -> Result<Arc<FeedSession>, AppError> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let open = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Feed {} is not open", id)))?;
        open.last_seen = Instant::now();
        Ok(open.session.clone())
    }

    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Feed {} is not open", id)))
    }
}
