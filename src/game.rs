//! Game shell
//!
//! Wraps the pure session with its side effects: audio on mode changes and
//! gameplay events, and exactly one persisted record per finished run.

use std::path::PathBuf;

use crate::audio::{AudioManager, AudioSink, MusicTrack, SoundEffect, cue_for, music_for};
use crate::highscores::{Leaderboard, Record, RecordError, RecordStore};
use crate::input::Command;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameMode, GameState, TickInput, tick};
use crate::tuning::{ConfigError, Tuning};

/// What one frame produced
#[derive(Debug, Default)]
pub struct FrameOutcome {
    pub events: Vec<GameEvent>,
    /// Set when the finished run could not be saved. The session carries on.
    pub record_error: Option<RecordError>,
}

pub struct Game {
    pub state: GameState,
    pub settings: Settings,
    settings_path: Option<PathBuf>,
    store: Box<dyn RecordStore>,
    audio: AudioManager,
    quit: bool,
    last_record: Option<Record>,
}

impl Game {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        store: Box<dyn RecordStore>,
        sink: Box<dyn AudioSink>,
    ) -> Result<Self, ConfigError> {
        let state = GameState::new(seed, tuning)?;
        let mut audio = AudioManager::new(sink);
        audio.set_music_volume(settings.music_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio.play_music(MusicTrack::Menu);
        Ok(Self {
            state,
            settings,
            settings_path: None,
            store,
            audio,
            quit: false,
            last_record: None,
        })
    }

    /// Save settings here whenever the player changes them
    pub fn set_settings_path(&mut self, path: PathBuf) {
        self.settings_path = Some(path);
    }

    /// The player asked to leave from the menu
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Record written for the most recent game over
    pub fn last_record(&self) -> Option<&Record> {
        self.last_record.as_ref()
    }

    /// Top scores from the store
    pub fn leaderboard(&self) -> Result<Leaderboard, RecordError> {
        Leaderboard::load(self.store.as_ref())
    }

    pub fn clear_records(&mut self) -> Result<(), RecordError> {
        self.store.clear()
    }

    /// Handle the commands the session does not own. Returns the ones it does.
    fn filter_shell_commands(&mut self, commands: &[Command]) -> Vec<Command> {
        let mut sim = Vec::with_capacity(commands.len());
        for &command in commands {
            match command {
                Command::ToggleMute => {
                    let muted = self.settings.toggle_mute();
                    self.audio.set_muted(muted);
                    log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
                    if let Some(path) = &self.settings_path {
                        if let Err(e) = self.settings.save(path) {
                            log::warn!("Failed to save settings: {}", e);
                        }
                    }
                }
                Command::Quit if self.state.mode == GameMode::Menu => {
                    log::info!("Quit requested");
                    self.quit = true;
                }
                other => sim.push(other),
            }
        }
        sim
    }

    /// Run one frame: apply input, advance the session, then play out the
    /// frame's events. A failed record write is reported alongside the
    /// events; the session itself is already finalized.
    pub fn frame(&mut self, input: &TickInput) -> FrameOutcome {
        let commands = self.filter_shell_commands(&input.commands);
        tick(
            &mut self.state,
            &TickInput {
                commands,
                autopilot: input.autopilot,
            },
        );

        let events = self.state.drain_events();
        let mut record_error = None;
        for event in &events {
            if let GameEvent::ModeChanged { to, .. } = event {
                if let Some(track) = music_for(*to) {
                    self.audio.play_music(track);
                }
            }
            if let Some(cue) = cue_for(event) {
                self.audio.play(cue);
            }
            if let GameEvent::GameOver { score, kills, coins } = *event {
                record_error = self.record_run(score, kills, coins).err();
            }
        }
        FrameOutcome {
            events,
            record_error,
        }
    }

    /// Persist the finished run and flag a new high score
    fn record_run(&mut self, score: u64, kills: u64, coins: u64) -> Result<(), RecordError> {
        let beaten = match self.store.any_higher(score) {
            Ok(higher) => higher,
            Err(e) => {
                log::warn!("High score check failed, assuming none higher: {}", e);
                false
            }
        };
        self.state.new_high_score = !beaten;
        if self.state.new_high_score {
            log::info!("New high score: {}", score);
            self.audio.play(SoundEffect::HighScore);
        }

        let record = Record::now(score, kills, coins);
        let written = self.store.append(&record);
        self.last_record = Some(record);
        written.inspect_err(|e| log::error!("Failed to save record: {}", e))
    }
}
