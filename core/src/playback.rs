//! Creature cry playback with a single owned sound handle.
//!
//! The audio engine belongs to the host and is reached through
//! `AudioBackend`. `CryPlayer` guarantees that at most one loaded sound
//! exists: the previous one is unloaded before a new one is loaded, and the
//! current one is unloaded when playback finishes, when play fails, and when
//! the player is dropped with its screen.

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The creature has no cry URL.
    #[error("no cry available")]
    Unavailable,

    #[error("audio backend failure: {0}")]
    Backend(String),
}

impl PlaybackError {
    pub fn user_message(&self) -> &'static str {
        match self {
            PlaybackError::Unavailable => "Sonido no disponible para este Pokémon",
            PlaybackError::Backend(_) => "Error al reproducir el sonido",
        }
    }
}

/// Host audio engine.
pub trait AudioBackend {
    type Sound;

    fn load(&mut self, url: &str) -> Result<Self::Sound, PlaybackError>;
    fn play(&mut self, sound: &mut Self::Sound) -> Result<(), PlaybackError>;
    fn unload(&mut self, sound: Self::Sound);
}

pub struct CryPlayer<B: AudioBackend> {
    backend: B,
    current: Option<B::Sound>,
    playing: bool,
}

impl<B: AudioBackend> CryPlayer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
            playing: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The play control should be disabled while this is true.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn has_sound(&self) -> bool {
        self.current.is_some()
    }

    pub fn play(&mut self, url: Option<&str>) -> Result<(), PlaybackError> {
        let url = url
            .filter(|u| !u.is_empty())
            .ok_or(PlaybackError::Unavailable)?;

        self.release();
        let mut sound = self.backend.load(url).inspect_err(|err| {
            warn!("cry load failed: {err}");
        })?;
        if let Err(err) = self.backend.play(&mut sound) {
            warn!("cry playback failed: {err}");
            self.backend.unload(sound);
            return Err(err);
        }
        debug!(%url, "cry playing");
        self.current = Some(sound);
        self.playing = true;
        Ok(())
    }

    /// Called by the host when the engine reports the end of the clip.
    pub fn finished(&mut self) {
        self.release();
    }

    pub fn release(&mut self) {
        if let Some(sound) = self.current.take() {
            debug!("unloading cry");
            self.backend.unload(sound);
        }
        self.playing = false;
    }
}

impl<B: AudioBackend> Drop for CryPlayer<B> {
    fn drop(&mut self) {
        self.release();
    }
}
