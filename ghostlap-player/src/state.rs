//! Shared player state

use crate::cache::SurfaceCache;
use crate::clock::{Clock, SystemClock};
use crate::playback::{GhostOffset, PlaybackState};
use crate::session::{PlaybackFrame, PlaybackSession, SessionInfo};
use ghostlap_core::model::Track;
use ghostlap_core::{Config, ConfigError, TrackError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Track(#[from] TrackError),

    #[error("track build worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Shared application state
#[derive(Clone)]
pub struct PlayerState {
    pub config: Arc<Config>,

    /// Active session (None until a track loads)
    pub session: Arc<RwLock<Option<PlaybackSession>>>,

    /// Last built surface, reused when a track reloads unchanged
    pub cache: Arc<Mutex<SurfaceCache>>,

    /// Broadcast channel for playback frames
    /// Multiple consumers can subscribe to receive frames
    pub frame_tx: broadcast::Sender<PlaybackFrame>,

    clock: Arc<dyn Clock>,
}

impl PlayerState {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Validates `config` before anything is built from it
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config, clock))
    }

    fn from_valid(config: Config, clock: Arc<dyn Clock>) -> Self {
        // Create broadcast channel with capacity for 100 frames
        let (frame_tx, _) = broadcast::channel(100);

        Self {
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
            cache: Arc::new(Mutex::new(SurfaceCache::new())),
            frame_tx,
            clock,
        }
    }

    /// Build a session for `track` off the async threads and make it active
    ///
    /// On failure the previous session, if any, stays active.
    pub async fn load_track(&self, track: Option<Track>) -> Result<SessionInfo, PlayerError> {
        let track = track.ok_or(TrackError::MissingTrack)?;
        let name = track.name.clone();
        let config = self.config.clone();
        let clock = self.clock.clone();
        let mut cache = self.cache.clone().lock_owned().await;

        let built = tokio::task::spawn_blocking(move || {
            PlaybackSession::build(track, &config, &mut cache, clock)
        })
        .await?;

        match built {
            Ok(session) => {
                let info = session.info();
                *self.session.write().await = Some(session);
                Ok(info)
            }
            Err(e) => {
                warn!("Track {:?} unavailable: {}", name, e);
                Err(e.into())
            }
        }
    }

    pub async fn unload(&self) {
        if self.session.write().await.take().is_some() {
            info!("Session unloaded");
        }
    }

    /// Advance the active session by one tick
    pub async fn advance(&self) -> Option<PlaybackFrame> {
        let mut session = self.session.write().await;
        session.as_mut()?.tick()
    }

    pub async fn current_frame(&self) -> Option<PlaybackFrame> {
        self.session.read().await.as_ref()?.frame()
    }

    pub async fn info(&self) -> Option<SessionInfo> {
        self.session.read().await.as_ref().map(PlaybackSession::info)
    }

    pub async fn toggle(&self) -> Option<PlaybackState> {
        let mut session = self.session.write().await;
        Some(session.as_mut()?.toggle())
    }

    pub async fn set_ghost_offset(&self, offset: GhostOffset) {
        if let Some(session) = self.session.write().await.as_mut() {
            session.set_ghost_offset(offset);
        }
    }

    /// Subscribe to playback frames
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackFrame> {
        self.frame_tx.subscribe()
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        // stock config always validates
        Self::from_valid(Config::default(), Arc::new(SystemClock))
    }
}
