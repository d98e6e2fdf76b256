use wasm_bindgen::prelude::*;
use rage_engine::*;

mod game;
mod jar;
mod taunts;

pub use game::{StarDrop, StarTuning};
pub use jar::JarLayout;

rage_web::export_game!(StarDrop, "star-drop");
