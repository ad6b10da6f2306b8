//! Audio cues
//!
//! The game decides *what* should be heard; an `AudioSink` backend decides
//! how. Music follows the mode (menu theme vs. run theme), sound effects
//! follow gameplay events.

use crate::sim::{GameEvent, GameMode, ItemEffect};

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Menu,
    Run,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coins or a gem picked up
    Coin,
    /// Enemy slain
    Kill,
    /// Player lost health
    Hurt,
    /// Hazard bounced off the shield
    Block,
    /// Sprint, shield, score boost or heart picked up
    PowerUp,
    GameOver,
    HighScore,
}

/// Track for a mode. Pausing keeps whatever is playing.
pub fn music_for(mode: GameMode) -> Option<MusicTrack> {
    match mode {
        GameMode::Menu => Some(MusicTrack::Menu),
        GameMode::Playing => Some(MusicTrack::Run),
        GameMode::Paused | GameMode::GameOver => None,
    }
}

/// Sound cue for a gameplay event, if any
pub fn cue_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::CoinsCollected(_) => Some(SoundEffect::Coin),
        GameEvent::EnemyKilled(_) => Some(SoundEffect::Kill),
        GameEvent::PlayerHurt { .. } => Some(SoundEffect::Hurt),
        GameEvent::Blocked => Some(SoundEffect::Block),
        GameEvent::PowerUp(ItemEffect::Coins(_)) => Some(SoundEffect::Coin),
        GameEvent::PowerUp(_) => Some(SoundEffect::PowerUp),
        GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        GameEvent::ModeChanged { .. } | GameEvent::Dodged(_) | GameEvent::AbilityExpired(_) => {
            None
        }
    }
}

/// Playback backend
pub trait AudioSink {
    fn play_music(&mut self, track: MusicTrack, volume: f32);
    fn stop_music(&mut self);
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend for headless runs: every cue goes to the debug log
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("music {:?} at {:.2}", track, volume);
    }

    fn stop_music(&mut self) {
        log::debug!("music stopped");
    }

    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} at {:.2}", effect, volume);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
    current: Option<MusicTrack>,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            music_volume: 0.7,
            sfx_volume: 1.0,
            muted: false,
            current: None,
        }
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio. Unmuting restarts the current track.
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if muted {
            self.sink.stop_music();
        } else if let Some(track) = self.current {
            self.sink.play_music(track, self.music_volume);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current
    }

    /// Switch tracks. Asking for the playing track does nothing.
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.current == Some(track) {
            return;
        }
        self.current = Some(track);
        if !self.muted {
            self.sink.play_music(track, self.music_volume);
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted || self.sfx_volume <= 0.0 {
            return;
        }
        self.sink.play(effect, self.sfx_volume);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Played {
        Music(MusicTrack),
        Stop,
        Sfx(SoundEffect),
    }

    /// Sink that remembers what it was asked to play
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSink(pub Rc<RefCell<Vec<Played>>>);

    impl AudioSink for RecordingSink {
        fn play_music(&mut self, track: MusicTrack, _volume: f32) {
            self.0.borrow_mut().push(Played::Music(track));
        }

        fn stop_music(&mut self) {
            self.0.borrow_mut().push(Played::Stop);
        }

        fn play(&mut self, effect: SoundEffect, _volume: f32) {
            self.0.borrow_mut().push(Played::Sfx(effect));
        }
    }

    #[test]
    fn test_music_follows_mode() {
        assert_eq!(music_for(GameMode::Menu), Some(MusicTrack::Menu));
        assert_eq!(music_for(GameMode::Playing), Some(MusicTrack::Run));
        assert_eq!(music_for(GameMode::Paused), None);
    }

    #[test]
    fn test_cues() {
        assert_eq!(cue_for(&GameEvent::CoinsCollected(2)), Some(SoundEffect::Coin));
        assert_eq!(cue_for(&GameEvent::Blocked), Some(SoundEffect::Block));
        assert_eq!(
            cue_for(&GameEvent::PowerUp(ItemEffect::Shield)),
            Some(SoundEffect::PowerUp)
        );
        assert_eq!(
            cue_for(&GameEvent::AbilityExpired(crate::sim::Ability::Sprint)),
            None
        );
    }

    #[test]
    fn test_mute_silences_and_restores() {
        let sink = RecordingSink::default();
        let log = sink.0.clone();
        let mut audio = AudioManager::new(Box::new(sink));

        audio.play_music(MusicTrack::Menu);
        audio.play_music(MusicTrack::Menu);
        audio.set_muted(true);
        audio.play(SoundEffect::Coin);
        audio.play_music(MusicTrack::Run);
        audio.set_muted(false);
        audio.play(SoundEffect::Kill);

        assert_eq!(
            *log.borrow(),
            vec![
                Played::Music(MusicTrack::Menu),
                Played::Stop,
                Played::Music(MusicTrack::Run),
                Played::Sfx(SoundEffect::Kill),
            ]
        );
    }
}
