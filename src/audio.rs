//! Audio routing
//!
//! The simulation never plays sound itself. Hosts drain `GameEvent`s, feed
//! them through an `AudioRouter`, and the router hands volume-scaled cues to
//! whatever backend implements `AudioSink`. Sound effects are procedural, so
//! each one is described as a handful of oscillator voices.

use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase};

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How a voice's frequency moves over its lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pitch {
    Constant(f32),
    /// Exponential ramp from the first frequency to the second
    Sweep(f32, f32),
    /// Hard jumps: (seconds after voice start, frequency)
    Steps(&'static [(f32, f32)]),
}

/// Gain shape of a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Exponential decay towards silence
    Decay,
    /// Full gain, then cut
    Gate,
}

/// One oscillator in a sound effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub pitch: Pitch,
    pub envelope: Envelope,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Seconds after the effect starts
    pub delay: f32,
    pub duration: f32,
}

const SHOOT: &[Voice] = &[Voice {
    waveform: Waveform::Sine,
    pitch: Pitch::Sweep(800.0, 200.0),
    envelope: Envelope::Decay,
    gain: 0.3,
    delay: 0.0,
    duration: 0.1,
}];

const HIT: &[Voice] = &[Voice {
    waveform: Waveform::Sawtooth,
    pitch: Pitch::Sweep(300.0, 50.0),
    envelope: Envelope::Decay,
    gain: 0.4,
    delay: 0.0,
    duration: 0.2,
}];

const OVERHEAT: &[Voice] = &[Voice {
    waveform: Waveform::Triangle,
    pitch: Pitch::Steps(&[(0.0, 400.0), (0.05, 600.0), (0.1, 400.0)]),
    envelope: Envelope::Gate,
    gain: 0.2,
    delay: 0.0,
    duration: 0.15,
}];

/// C-E-G arpeggio
const WIN: &[Voice] = &[
    Voice {
        waveform: Waveform::Sine,
        pitch: Pitch::Constant(523.25),
        envelope: Envelope::Decay,
        gain: 0.3,
        delay: 0.0,
        duration: 0.4,
    },
    Voice {
        waveform: Waveform::Sine,
        pitch: Pitch::Constant(659.25),
        envelope: Envelope::Decay,
        gain: 0.3,
        delay: 0.15,
        duration: 0.4,
    },
    Voice {
        waveform: Waveform::Sine,
        pitch: Pitch::Constant(783.99),
        envelope: Envelope::Decay,
        gain: 0.3,
        delay: 0.3,
        duration: 0.4,
    },
];

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Cannon fired
    Shoot,
    /// Projectile connected
    Hit,
    /// Cannon locked out
    Overheat,
    /// Round or match won
    Win,
}

impl SoundEffect {
    pub fn voices(self) -> &'static [Voice] {
        match self {
            SoundEffect::Shoot => SHOOT,
            SoundEffect::Hit => HIT,
            SoundEffect::Overheat => OVERHEAT,
            SoundEffect::Win => WIN,
        }
    }

    /// Seconds until the last voice falls silent
    pub fn length(self) -> f32 {
        self.voices()
            .iter()
            .map(|v| v.delay + v.duration)
            .fold(0.0, f32::max)
    }

    /// Cue for a simulation event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired { .. } => Some(SoundEffect::Shoot),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            GameEvent::Overheated { .. } => Some(SoundEffect::Overheat),
            GameEvent::RoundWon { .. } | GameEvent::MatchWon { .. } => Some(SoundEffect::Win),
            _ => None,
        }
    }
}

/// Looping background music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Menu,
    Gameplay,
}

impl MusicTrack {
    pub fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Menu => MusicTrack::Menu,
            _ => MusicTrack::Gameplay,
        }
    }

    /// Asset name the backend should stream
    pub fn file_name(self) -> &'static str {
        match self {
            MusicTrack::Menu => "menu.wav",
            MusicTrack::Gameplay => "XORG.wav",
        }
    }
}

/// Music fade-in when a track starts (seconds)
pub const MUSIC_FADE_IN: f32 = 1.0;
/// Music fade-out when a track stops (seconds)
pub const MUSIC_FADE_OUT: f32 = 0.5;

/// Audio backend. Implementations must never block the caller.
pub trait AudioSink {
    /// Play a one-shot effect at `volume` (0.0 - 1.0)
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);
    /// Start looping `track`, fading in to `volume` over `fade_in` seconds
    fn start_music(&mut self, track: MusicTrack, volume: f32, fade_in: f32);
    /// Fade out whatever is playing over `fade_out` seconds
    fn stop_music(&mut self, fade_out: f32);
    /// Volume changed while music is playing
    fn set_music_volume(&mut self, _volume: f32) {}
}

/// Backend for headless runs: every cue becomes a debug log line
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} at {:.2}", effect, volume);
    }

    fn start_music(&mut self, track: MusicTrack, volume: f32, fade_in: f32) {
        log::debug!(
            "music {} at {:.2}, fade in {:.1}s",
            track.file_name(),
            volume,
            fade_in
        );
    }

    fn stop_music(&mut self, fade_out: f32) {
        log::debug!("music stopped, fade out {:.1}s", fade_out);
    }
}

/// Audio manager for the game
pub struct AudioRouter {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_track: Option<MusicTrack>,
}

impl AudioRouter {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self::with_settings(sink, &Settings::default())
    }

    pub fn with_settings(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            current_track: None,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.push_music_volume();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.push_music_volume();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.push_music_volume();
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Get effective music volume
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play_effect(effect, vol);
    }

    /// Play the cues for a batch of drained events. Returns how many played.
    pub fn handle_events(&mut self, events: &[GameEvent]) -> usize {
        let mut played = 0;
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            if self.effective_volume() > 0.0 {
                played += 1;
            }
            self.play(effect);
        }
        played
    }

    /// Switch tracks if the phase calls for a different one
    pub fn sync_music(&mut self, phase: GamePhase) {
        let track = MusicTrack::for_phase(phase);
        if self.current_track == Some(track) {
            return;
        }
        if self.current_track.is_some() {
            self.sink.stop_music(MUSIC_FADE_OUT);
        }
        let volume = self.effective_music_volume();
        self.sink.start_music(track, volume, MUSIC_FADE_IN);
        self.current_track = Some(track);
    }

    pub fn stop_music(&mut self) {
        if self.current_track.take().is_some() {
            self.sink.stop_music(MUSIC_FADE_OUT);
        }
    }

    fn push_music_volume(&mut self) {
        if self.current_track.is_some() {
            let vol = self.effective_music_volume();
            self.sink.set_music_volume(vol);
        }
    }
}

impl std::fmt::Debug for AudioRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioRouter")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("music_volume", &self.music_volume)
            .field("muted", &self.muted)
            .field("current_track", &self.current_track)
            .finish_non_exhaustive()
    }
}
