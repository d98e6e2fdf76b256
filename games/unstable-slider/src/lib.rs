use wasm_bindgen::prelude::*;
use rage_engine::*;

mod chaos;
mod game;
mod taunts;

pub use chaos::ChaosMode;
pub use game::{SliderTuning, UnstableSlider};

rage_web::export_game!(UnstableSlider, "unstable-slider");
