use wasm_bindgen::prelude::*;
use rage_engine::*;

mod game;
mod stacking;
mod taunts;

pub use game::{TowerTuning, ZenTower};

rage_web::export_game!(ZenTower, "zen-tower");
