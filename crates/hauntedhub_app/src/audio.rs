// SPDX-License-Identifier: MIT OR Apache-2.0
//! Audio coordination for the door cinematic.
//!
//! This module provides:
//! - Named sound loading (failed loads leave the sound absent)
//! - Playback with optional 3D emitter position
//! - Linear fade-outs advanced by the frame loop
//! - A rodio backend (when the "audio" feature is enabled)
//!
//! When no audio engine is available, the coordinator is created disabled
//! and every operation is a no-op.

use crate::assets::{AssetSlot, AssetStatus, LoadTicket};
use crate::error::{HubError, Result};
use futures::future::join_all;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;

/// Door creak, played as the door starts to swing
pub const DOOR_CREAK: &str = "door_creak";
/// Played as the hand reaches out
pub const HAND_EMERGE: &str = "hand_emerge";
/// Played through the drag, faded out during the fade
pub const DRAG_WHOOSH: &str = "drag_whoosh";

/// Playback engine driven by the [`AudioCoordinator`]
pub trait AudioBackend {
    /// Whether the platform has a usable audio output
    fn is_available(&self) -> bool;

    /// Decode and keep a clip under `name`
    fn prepare(&mut self, name: &str, bytes: Vec<u8>) -> Result<()>;

    /// Start `name` from the beginning, restarting it if already playing
    fn play(&mut self, name: &str, volume: f32, position: Option<[f32; 3]>);

    /// Change the volume of a playing clip
    fn set_volume(&mut self, name: &str, volume: f32);

    /// Stop a clip
    fn stop(&mut self, name: &str);

    /// Drop a clip's decoded data
    fn release(&mut self, name: &str);

    /// Move the listener (typically the camera)
    fn set_listener(&mut self, _position: [f32; 3]) {}
}

/// Backend used when no audio engine exists
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn is_available(&self) -> bool {
        false
    }

    fn prepare(&mut self, _name: &str, _bytes: Vec<u8>) -> Result<()> {
        Ok(())
    }

    fn play(&mut self, _name: &str, _volume: f32, _position: Option<[f32; 3]>) {}

    fn set_volume(&mut self, _name: &str, _volume: f32) {}

    fn stop(&mut self, _name: &str) {}

    fn release(&mut self, _name: &str) {}
}

// ============================================================================
// Rodio Backend (with the "audio" feature)
// ============================================================================

#[cfg(feature = "audio")]
mod engine {
    use super::*;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, SpatialSink};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;

    /// Half the distance between the listener's ears
    const EAR_OFFSET: f32 = 0.1;

    enum ActiveSink {
        Flat(Sink),
        Spatial(SpatialSink),
    }

    impl ActiveSink {
        fn set_volume(&self, volume: f32) {
            match self {
                Self::Flat(sink) => sink.set_volume(volume),
                Self::Spatial(sink) => sink.set_volume(volume),
            }
        }

        fn stop(&self) {
            match self {
                Self::Flat(sink) => sink.stop(),
                Self::Spatial(sink) => sink.stop(),
            }
        }
    }

    /// Audio output through rodio
    pub struct RodioBackend {
        /// Output stream (must be kept alive)
        _stream: OutputStream,
        /// Stream handle for creating sinks
        stream_handle: OutputStreamHandle,
        clips: HashMap<String, Arc<[u8]>>,
        sinks: HashMap<String, ActiveSink>,
        listener: [f32; 3],
    }

    impl RodioBackend {
        /// Open the default output device, or `None` if there is none
        pub fn try_new() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, stream_handle)) => {
                    tracing::info!("Audio engine initialized successfully");
                    Some(Self {
                        _stream: stream,
                        stream_handle,
                        clips: HashMap::new(),
                        sinks: HashMap::new(),
                        listener: [0.0, 1.6, 6.0],
                    })
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize audio: {}. Audio will be disabled.", e);
                    None
                }
            }
        }

        fn ears(&self) -> ([f32; 3], [f32; 3]) {
            let [x, y, z] = self.listener;
            ([x - EAR_OFFSET, y, z], [x + EAR_OFFSET, y, z])
        }
    }

    impl AudioBackend for RodioBackend {
        fn is_available(&self) -> bool {
            true
        }

        fn prepare(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
            let data: Arc<[u8]> = bytes.into();
            Decoder::new(Cursor::new(Arc::clone(&data)))
                .map_err(|e| HubError::Audio(format!("failed to decode {name}: {e}")))?;
            self.clips.insert(name.to_string(), data);
            Ok(())
        }

        fn play(&mut self, name: &str, volume: f32, position: Option<[f32; 3]>) {
            self.stop(name);

            let Some(data) = self.clips.get(name) else {
                return;
            };
            let source = match Decoder::new(Cursor::new(Arc::clone(data))) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!("Failed to decode audio {}: {}", name, e);
                    return;
                }
            };

            let sink = match position {
                Some(emitter) => {
                    let (left, right) = self.ears();
                    SpatialSink::try_new(&self.stream_handle, emitter, left, right)
                        .map(ActiveSink::Spatial)
                }
                None => Sink::try_new(&self.stream_handle).map(ActiveSink::Flat),
            };
            let sink = match sink {
                Ok(sink) => sink,
                Err(e) => {
                    tracing::warn!("Failed to create audio sink: {}", e);
                    return;
                }
            };

            sink.set_volume(volume);
            match &sink {
                ActiveSink::Flat(s) => s.append(source),
                ActiveSink::Spatial(s) => s.append(source),
            }
            self.sinks.insert(name.to_string(), sink);
        }

        fn set_volume(&mut self, name: &str, volume: f32) {
            if let Some(sink) = self.sinks.get(name) {
                sink.set_volume(volume);
            }
        }

        fn stop(&mut self, name: &str) {
            if let Some(sink) = self.sinks.remove(name) {
                sink.stop();
            }
        }

        fn release(&mut self, name: &str) {
            self.stop(name);
            self.clips.remove(name);
        }

        fn set_listener(&mut self, position: [f32; 3]) {
            self.listener = position;
            let (left, right) = self.ears();
            for sink in self.sinks.values() {
                if let ActiveSink::Spatial(sink) = sink {
                    sink.set_left_ear_position(left);
                    sink.set_right_ear_position(right);
                }
            }
        }
    }
}

#[cfg(feature = "audio")]
pub use engine::RodioBackend;

/// The platform's audio backend: rodio when compiled in and a device
/// exists, otherwise [`NullBackend`]
pub fn default_backend() -> Box<dyn AudioBackend> {
    #[cfg(feature = "audio")]
    {
        if let Some(backend) = RodioBackend::try_new() {
            return Box::new(backend);
        }
    }
    #[cfg(not(feature = "audio"))]
    tracing::info!("Audio engine: stub implementation (audio feature not enabled)");

    Box::new(NullBackend)
}

/// In-flight volume ramp
#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    duration: f32,
    elapsed: f32,
}

#[derive(Debug, Clone, Copy)]
struct Sound {
    volume: f32,
    playing: bool,
    fade: Option<Fade>,
}

/// One file read from a batch
struct SoundRead {
    name: String,
    path: PathBuf,
    ticket: LoadTicket,
    bytes: std::io::Result<Vec<u8>>,
}

/// Result of reading a batch of sound files
pub struct LoadedSounds {
    reads: Vec<SoundRead>,
}

/// Loads, plays and fades the cinematic's sounds
pub struct AudioCoordinator {
    backend: Box<dyn AudioBackend>,
    /// Engine availability, checked once at construction
    enabled: bool,
    sounds: IndexMap<String, Sound>,
    /// Load generation and outcome per sound name
    slots: IndexMap<String, AssetSlot<()>>,
    warned_missing: HashSet<String>,
    disposed: bool,
}

impl AudioCoordinator {
    /// Wrap a backend
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        let enabled = backend.is_available();
        if !enabled {
            tracing::warn!("Audio playback not available; sound cues are disabled");
        }

        Self {
            backend,
            enabled,
            sounds: IndexMap::new(),
            slots: IndexMap::new(),
            warned_missing: HashSet::new(),
            disposed: false,
        }
    }

    /// Coordinator over [`default_backend`]
    pub fn with_default_backend() -> Self {
        Self::new(default_backend())
    }

    /// Whether sounds can be played
    pub fn is_available(&self) -> bool {
        self.enabled && !self.disposed
    }

    /// Start reading a batch of sounds.
    ///
    /// The returned future does not borrow the coordinator; pass its output
    /// to [`AudioCoordinator::install`]. Each sound carries its own load
    /// ticket: a later batch naming the same sound supersedes it, other
    /// batches in flight are unaffected, and `dispose` orphans them all.
    pub fn load_sounds(
        &mut self,
        assets: &IndexMap<String, PathBuf>,
    ) -> impl Future<Output = LoadedSounds> + 'static {
        let requests: Vec<(String, PathBuf, LoadTicket)> = assets
            .iter()
            .map(|(name, path)| {
                let ticket = self.slots.entry(name.clone()).or_default().begin();
                (name.clone(), path.clone(), ticket)
            })
            .collect();

        async move {
            let reads = join_all(requests.into_iter().map(|(name, path, ticket)| async move {
                let bytes = tokio::fs::read(&path).await;
                SoundRead {
                    name,
                    path,
                    ticket,
                    bytes,
                }
            }))
            .await;

            LoadedSounds { reads }
        }
    }

    /// Register the sounds from a finished batch. Returns how many loaded.
    pub fn install(&mut self, loaded: LoadedSounds) -> usize {
        let available = self.is_available();
        let mut count = 0;
        for read in loaded.reads {
            let SoundRead {
                name,
                path,
                ticket,
                bytes,
            } = read;

            let Some(slot) = self.slots.get_mut(&name) else {
                tracing::debug!("Ignoring load of {} after dispose", name);
                continue;
            };
            if !slot.is_current(ticket) {
                tracing::debug!("Ignoring superseded load of {}", name);
                continue;
            }
            if !available {
                slot.complete(ticket, AssetStatus::Failed("audio unavailable".into()));
                continue;
            }

            let outcome = bytes
                .map_err(|source| HubError::Io {
                    path: path.clone(),
                    source,
                })
                .and_then(|bytes| self.backend.prepare(&name, bytes));

            match outcome {
                Ok(()) => {
                    tracing::debug!("Loaded sound {} from {:?}", name, path);
                    self.sounds.insert(
                        name.clone(),
                        Sound {
                            volume: 1.0,
                            playing: false,
                            fade: None,
                        },
                    );
                    slot.complete(ticket, AssetStatus::Loaded(()));
                    count += 1;
                }
                Err(e) => {
                    tracing::warn!("Sound {} unavailable: {}", name, e);
                    slot.complete(ticket, AssetStatus::Failed(e.to_string()));
                }
            }
        }

        if count > 0 {
            tracing::info!("Audio initialized: {} sounds loaded", count);
        }
        count
    }

    /// Load a batch and install it
    pub async fn load_and_install(&mut self, assets: &IndexMap<String, PathBuf>) -> usize {
        let batch = self.load_sounds(assets).await;
        self.install(batch)
    }

    /// Load outcome for a sound name
    pub fn sound_status(&self, name: &str) -> Option<&AssetStatus<()>> {
        self.slots.get(name).map(AssetSlot::status)
    }

    /// Play a sound from the start at full volume
    pub fn play(&mut self, name: &str, position: Option<[f32; 3]>) {
        if !self.is_available() {
            return;
        }
        let Some(sound) = self.sounds.get_mut(name) else {
            self.report_missing(name);
            return;
        };

        sound.fade = None;
        sound.volume = 1.0;
        sound.playing = true;
        self.backend.play(name, 1.0, position);
        tracing::debug!("Playing sound {} at {:?}", name, position);
    }

    /// Ramp a sound to silence over `duration_ms`, then stop it.
    /// Replaces any fade already running on the same sound.
    pub fn fade_out(&mut self, name: &str, duration_ms: u64) {
        if !self.is_available() {
            return;
        }
        let Some(sound) = self.sounds.get_mut(name) else {
            self.report_missing(name);
            return;
        };
        if !sound.playing {
            return;
        }

        if duration_ms == 0 {
            sound.volume = 0.0;
            sound.playing = false;
            sound.fade = None;
            self.backend.set_volume(name, 0.0);
            self.backend.stop(name);
            return;
        }

        sound.fade = Some(Fade {
            from: sound.volume,
            duration: duration_ms as f32 / 1000.0,
            elapsed: 0.0,
        });
    }

    /// Advance running fades by `delta` seconds
    pub fn update(&mut self, delta: f32) {
        if !self.is_available() {
            return;
        }

        for (name, sound) in self.sounds.iter_mut() {
            let Some(fade) = sound.fade.as_mut() else {
                continue;
            };

            fade.elapsed += delta.max(0.0);
            let t = (fade.elapsed / fade.duration).min(1.0);
            sound.volume = fade.from * (1.0 - t);
            self.backend.set_volume(name, sound.volume);

            if t >= 1.0 {
                sound.volume = 0.0;
                sound.playing = false;
                sound.fade = None;
                self.backend.stop(name);
            }
        }
    }

    /// Stop one sound
    pub fn stop(&mut self, name: &str) {
        if !self.is_available() {
            return;
        }
        if let Some(sound) = self.sounds.get_mut(name) {
            sound.playing = false;
            sound.fade = None;
            self.backend.stop(name);
        }
    }

    /// Stop every sound
    pub fn stop_all(&mut self) {
        if !self.is_available() {
            return;
        }
        for (name, sound) in self.sounds.iter_mut() {
            if sound.playing {
                sound.playing = false;
                sound.fade = None;
                self.backend.stop(name);
            }
        }
    }

    /// Move the spatial audio listener
    pub fn set_listener_position(&mut self, position: [f32; 3]) {
        if self.is_available() {
            self.backend.set_listener(position);
        }
    }

    /// Current volume of a loaded sound
    pub fn volume(&self, name: &str) -> Option<f32> {
        self.sounds.get(name).map(|sound| sound.volume)
    }

    /// Whether a sound is playing
    pub fn is_playing(&self, name: &str) -> bool {
        self.sounds.get(name).is_some_and(|sound| sound.playing)
    }

    /// Stop and release all sounds. Further calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop_all();
        for name in self.sounds.keys() {
            self.backend.release(name);
        }
        self.sounds.clear();
        self.slots.clear();
        self.disposed = true;
        tracing::debug!("Audio coordinator disposed");
    }

    fn report_missing(&mut self, name: &str) {
        if self.warned_missing.insert(name.to_string()) {
            tracing::warn!("Sound not loaded: {}", name);
        } else {
            tracing::debug!("Sound not loaded: {}", name);
        }
    }
}

impl Drop for AudioCoordinator {
    fn drop(&mut self) {
        self.dispose();
    }
}
