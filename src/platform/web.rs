//! Browser bindings
//!
//! Exposes a `WebGame` handle to JavaScript. The page owns the canvas and the
//! `requestAnimationFrame` loop; it forwards key presses and swipes, calls
//! `frame` with the rAF timestamp and draws from the JSON snapshot.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::highscores::{LocalStorageStore, report_outcome};
use crate::input::{self, InputHandler};
use crate::settings::Settings;
use crate::sim::{Difficulty, GamePhase, Grid, TickResult};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Snake Duel starting...");
}

/// Game handle owned by the page
#[wasm_bindgen]
pub struct WebGame {
    game: Rc<RefCell<Game>>,
    input: InputHandler,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: i32, height: i32) -> WebGame {
        let seed = js_sys::Date::now() as u64 ^ (js_sys::Math::random() * u32::MAX as f64) as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, Grid::new(width, height))));
        install_auto_pause(game.clone());
        log::info!("Created game {}x{} with seed {}", width, height, seed);
        WebGame {
            game,
            input: InputHandler::new(),
            settings: Settings::load(),
        }
    }

    /// Start a round. Unknown difficulty names fall back to the saved one.
    pub fn start(&mut self, difficulty: &str) {
        let difficulty = Difficulty::parse(difficulty).unwrap_or(self.settings.difficulty);
        if difficulty != self.settings.difficulty {
            self.settings.difficulty = difficulty;
            self.settings.save();
        }
        self.game
            .borrow_mut()
            .start(difficulty.speed_ms(), difficulty);
    }

    pub fn restart(&mut self) {
        self.game.borrow_mut().restart();
    }

    /// Forward a `KeyboardEvent.key`; returns whether it was handled
    pub fn key(&mut self, key: &str, now_ms: f64) -> bool {
        match self.input.handle_key(key, now_ms as u64) {
            Some(intent) => {
                input::apply(&mut self.game.borrow_mut(), intent);
                true
            }
            None => false,
        }
    }

    pub fn swipe(&mut self, dx: f32, dy: f32, now_ms: f64) {
        if let Some(intent) = self.input.handle_swipe(dx, dy, now_ms as u64) {
            input::apply(&mut self.game.borrow_mut(), intent);
        }
    }

    pub fn dash(&mut self) -> bool {
        self.game.borrow_mut().request_dash()
    }

    pub fn toggle_pause(&mut self) {
        self.game.borrow_mut().toggle_pause();
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.game.borrow_mut().resize(width, height);
    }

    /// Advance with the rAF timestamp; true on the frame the round ends
    pub fn frame(&mut self, now_ms: f64) -> bool {
        matches!(
            self.game.borrow_mut().frame(now_ms.max(0.0) as u64),
            TickResult::Ended(_)
        )
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.game.borrow().snapshot()).unwrap_or_default()
    }

    pub fn events_json(&mut self) -> String {
        serde_json::to_string(&self.game.borrow_mut().drain_events()).unwrap_or_default()
    }

    pub fn set_username(&mut self, username: &str) {
        self.settings.username = username.trim().to_string();
        self.settings.save();
    }

    /// Report the finished round to the leaderboard, returning the standing as JSON
    pub fn report(&mut self) -> String {
        let game = self.game.borrow();
        let Some(outcome) = game.outcome() else {
            return "null".to_string();
        };
        let score = game.state().player.score;
        let standing = report_outcome(
            &mut LocalStorageStore,
            &self.settings.username,
            &outcome,
            score,
        );
        serde_json::to_string(&standing).unwrap_or_default()
    }
}

/// Pause a running round when the tab is hidden or the window loses focus
fn install_auto_pause(game: Rc<RefCell<Game>>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    if let Some(document) = window.document() {
        let game = game.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                pause_if_playing(&game, "tab hidden");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
        pause_if_playing(&game, "window blur");
    });
    let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn pause_if_playing(game: &Rc<RefCell<Game>>, reason: &str) {
    let Ok(mut g) = game.try_borrow_mut() else {
        return;
    };
    if g.state().phase == GamePhase::Playing {
        g.toggle_pause();
        log::info!("Auto-paused ({})", reason);
    }
}
