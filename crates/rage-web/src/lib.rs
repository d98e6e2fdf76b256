pub mod runner;
pub mod storage;

pub use runner::GameRunner;
pub use storage::LocalStorageStore;

use rage_engine::{MemoryStore, ScoreStore};

/// Seed for a live session, mixed from the host clock and `Math.random`.
pub fn session_seed() -> u64 {
    let clock = js_sys::Date::now() as u64;
    let salt = (js_sys::Math::random() * u32::MAX as f64) as u64;
    clock ^ (salt << 32)
}

/// Browser best-score store, or an in-memory one when storage is blocked.
pub fn browser_store() -> Box<dyn ScoreStore> {
    match LocalStorageStore::open() {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("{}; best scores will not persist", err);
            Box::new(MemoryStore::new())
        }
    }
}

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use rage_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// rage_web::export_game!(MyGame, "my-game");
/// ```
///
/// `$game_type` must implement `rage_engine::Game` and provide `new()`.
/// `$game_name` is used in log messages.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        /// Create the runner (first call) or start a fresh session (later calls).
        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let fresh = RUNNER.with(|cell| cell.borrow().is_none());
            if fresh {
                let runner = $crate::GameRunner::new(<$game_type>::new())
                    .with_store($crate::browser_store())
                    .with_rng(Box::new(SeededRng::new($crate::session_seed())));
                RUNNER.with(|cell| {
                    *cell.borrow_mut() = Some(runner);
                });
            }

            with_runner(|r| r.init());
            log::info!("{}: session started", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_teardown() {
            with_runner(|r| r.shutdown());
        }

        /// Returns false (and keeps the current tuning) when the JSON is rejected.
        #[wasm_bindgen]
        pub fn game_configure(json: &str) -> bool {
            match with_runner(|r| r.configure(json)) {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("{}: {}", $game_name, err);
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_set_audio_available(available: bool) {
            with_runner(|r| r.set_audio_available(available));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const u8 {
            with_runner(|r| r.sound_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_toasts_json() -> String {
            with_runner(|r| r.toasts_json())
        }

        #[wasm_bindgen]
        pub fn get_hud_json() -> String {
            with_runner(|r| r.hud_json())
        }

        #[wasm_bindgen]
        pub fn get_voice_commands_json() -> String {
            with_runner(|r| r.voice_commands_json())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }
    };
}
