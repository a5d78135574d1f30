//! Game session
//!
//! Owns the simulation state and its collaborators: the tick scheduler, the
//! input queue, settings, the key-value store and the HUD event stream.
//! Front ends call [`Game::frame`] once per animation frame and render the
//! state afterwards.

use crate::console::{self, Cheat, Command, ConsoleError};
use crate::highscores;
use crate::persistence::KeyValueStore;
use crate::platform::{Action, InputEvent, InputQueue};
use crate::scheduler::{FixedTickScheduler, FrameLimiter};
use crate::settings::Settings;
use crate::sim::{self, DeathCause, GameEvent, GamePhase, GameState, Viewport};

pub struct Game {
    pub state: GameState,
    scheduler: FixedTickScheduler,
    limiter: FrameLimiter,
    input: InputQueue,
    settings: Settings,
    store: Box<dyn KeyValueStore>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Build a session, reading settings and the best score from `store`
    pub fn new(seed: u64, viewport: Viewport, store: Box<dyn KeyValueStore>) -> Self {
        let settings = Settings::load(store.as_ref());
        let mut state = GameState::new(seed, viewport);
        state.quality = settings.quality();
        state.best_score = highscores::load_best(store.as_ref());
        sim::reset_world(&mut state);
        log::info!(
            "Session ready: preset {}, best {}",
            settings.quality_preset.as_str(),
            state.best_score
        );

        Self {
            state,
            scheduler: FixedTickScheduler::default(),
            limiter: FrameLimiter::new(settings.min_frame_time()),
            input: InputQueue::new(),
            settings,
            store,
            events: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings, persist them and apply them from the next tick
    pub fn apply_settings(&mut self, settings: Settings) {
        settings.save(self.store.as_mut());
        self.state.quality = settings.quality();
        self.limiter.set_min_frame_time(settings.min_frame_time());
        self.settings = settings;
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn is_pressed(&self, code: &str) -> bool {
        self.input.is_pressed(code)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    /// Reset the world and start running
    pub fn start_run(&mut self) {
        self.scheduler.reset();
        sim::start_run(&mut self.state);
        self.collect_events();
    }

    /// Handle one animation frame of `frame_dt` seconds. Returns the number
    /// of ticks run, or `None` when the frame limiter skipped the frame.
    pub fn frame(&mut self, frame_dt: f32) -> Option<u32> {
        let dt = self.limiter.admit(frame_dt)?;

        for action in self.input.drain() {
            match action {
                Action::Jump => match self.state.phase {
                    GamePhase::Running => {
                        sim::jump(&mut self.state);
                    }
                    GamePhase::Menu | GamePhase::GameOver => self.start_run(),
                    GamePhase::Dying { .. } => {}
                },
            }
        }

        let state = &mut self.state;
        let ticks = self.scheduler.advance(dt, || sim::tick(state));
        self.state
            .camera
            .update(&self.state.player, self.state.viewport, dt);
        self.collect_events();
        Some(ticks)
    }

    fn collect_events(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::NewBestScore(best) = event {
                highscores::save_best(self.store.as_mut(), best);
            }
            self.events.push(event);
        }
    }

    /// Take HUD events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Parse and apply a developer console line, returning a message for the
    /// user. Rejected input changes nothing.
    pub fn run_command(&mut self, line: &str) -> Result<String, ConsoleError> {
        let command = console::parse(line)?;
        let state = &mut self.state;
        let message = match command {
            Command::SetScore(score) => {
                state.score = score;
                state.events.push(GameEvent::ScoreChanged(score));
                format!("Score set to {score}")
            }
            Command::AddScore(points) => {
                state.score += points;
                state.events.push(GameEvent::ScoreChanged(state.score));
                format!("Score is now {}", state.score)
            }
            Command::ClearBestScore => {
                highscores::clear_best(self.store.as_mut());
                state.best_score = 0;
                "Best score cleared".to_string()
            }
            Command::SetInfiniteJump(on) => {
                state.cheats.infinite_jump = on;
                format!("infiniteJump = {on}")
            }
            Command::SetDeath(on) => {
                state.cheats.invincible = !on;
                format!("death = {on}")
            }
            Command::SpeedReset => {
                state.player.horiz_multiplier = 1.0;
                "Speed multiplier reset".to_string()
            }
            Command::SpeedSet(multiplier) => {
                state.player.horiz_multiplier = multiplier.max(0.0);
                format!("Speed multiplier = {}", state.player.horiz_multiplier)
            }
            Command::SpeedAdd(delta) => {
                state.player.horiz_multiplier = (state.player.horiz_multiplier + delta).max(0.0);
                format!("Speed multiplier = {}", state.player.horiz_multiplier)
            }
            Command::Die => {
                if sim::try_die(state, DeathCause::Console) {
                    "Player destroyed".to_string()
                } else {
                    "Nothing to destroy".to_string()
                }
            }
            Command::Toggle(cheat) => {
                let (name, flag) = match cheat {
                    Cheat::Float => ("float", &mut state.cheats.float),
                    Cheat::Invincible => ("invincible", &mut state.cheats.invincible),
                    Cheat::InfiniteJump => ("infiniteJump", &mut state.cheats.infinite_jump),
                    Cheat::GemEveryBlock => ("gemEveryBlock", &mut state.cheats.gem_every_block),
                };
                *flag = !*flag;
                format!("{name} = {flag}")
            }
        };
        log::info!("console: {message}");
        self.collect_events();
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::MemoryStore;

    fn game() -> Game {
        Game::new(42, Viewport::default(), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_jump_input_starts_then_jumps() {
        let mut game = game();
        assert_eq!(game.state.phase, GamePhase::Menu);
        game.push_input(InputEvent::PointerDown);
        game.frame(SIM_DT);
        assert_eq!(game.state.phase, GamePhase::Running);
        assert!(game.drain_events().contains(&GameEvent::RunStarted));

        game.push_input(InputEvent::KeyDown("Space".into()));
        game.frame(SIM_DT);
        assert!(game.state.player.jumps_left < crate::consts::MAX_JUMPS);
    }

    #[test]
    fn test_frame_runs_ticks() {
        let mut game = game();
        game.start_run();
        let ticks: u32 = (0..30).filter_map(|_| game.frame(SIM_DT)).sum();
        assert!(ticks >= 29);
        assert!(game.state.tick_count >= 29);
    }

    #[test]
    fn test_new_best_is_persisted() {
        let mut game = game();
        game.start_run();
        game.run_command("/score set 75").unwrap();
        game.run_command("/die").unwrap();
        assert_eq!(game.state.best_score, 75);
        assert_eq!(highscores::load_best(game.store.as_ref()), 75);
        assert!(game.drain_events().contains(&GameEvent::NewBestScore(75)));

        game.run_command("/clear bestScore").unwrap();
        assert_eq!(game.state.best_score, 0);
        assert_eq!(highscores::load_best(game.store.as_ref()), 0);
    }

    #[test]
    fn test_best_score_loaded_from_store() {
        let mut store = MemoryStore::new();
        highscores::save_best(&mut store, 900);
        let game = Game::new(1, Viewport::default(), Box::new(store));
        assert_eq!(game.state.best_score, 900);
    }

    #[test]
    fn test_console_rejection_changes_nothing() {
        let mut game = game();
        game.start_run();
        let score = game.state.score;
        assert!(game.run_command("/score add x").is_err());
        assert!(game.run_command("/gamerule speed").is_err());
        assert_eq!(game.state.score, score);
        assert_eq!(game.state.player.horiz_multiplier, 1.0);
    }

    #[test]
    fn test_console_cheats() {
        let mut game = game();
        game.run_command("/gamerule death false").unwrap();
        assert!(game.state.cheats.invincible);
        game.run_command("float").unwrap();
        assert!(game.state.cheats.float);
        game.run_command("gemeveryblock").unwrap();
        game.run_command("gemeveryblock").unwrap();
        assert!(!game.state.cheats.gem_every_block);
        game.run_command("/gamerule speed set 2").unwrap();
        game.run_command("/gamerule speed add -3").unwrap();
        assert_eq!(game.state.player.horiz_multiplier, 0.0);
    }

    #[test]
    fn test_extreme_speed_keeps_frames_bounded() {
        let mut game = game();
        game.start_run();
        assert!(game.run_command("/gamerule speed set inf").is_err());
        game.run_command("/gamerule speed set 1e10").unwrap();
        for _ in 0..30 {
            game.frame(SIM_DT);
        }
        assert!(game.state.platforms.len() < 2_000);
    }

    #[test]
    fn test_speed_multiplier_survives_restart() {
        let mut game = game();
        game.run_command("/gamerule speed set 1.5").unwrap();
        game.start_run();
        assert_eq!(game.state.player.horiz_multiplier, 1.5);
    }

    #[test]
    fn test_settings_apply_to_quality_and_store() {
        let mut game = game();
        let mut settings = game.settings().clone();
        settings.set_percent(crate::settings::Knob::JumpEffect, 50.0);
        game.apply_settings(settings);
        assert_eq!(game.state.quality.get(crate::settings::Knob::JumpEffect), 0.5);
        let reloaded = Settings::load(game.store.as_ref());
        assert_eq!(reloaded.percent(crate::settings::Knob::JumpEffect), 50.0);
    }
}
