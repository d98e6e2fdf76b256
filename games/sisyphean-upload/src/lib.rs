use wasm_bindgen::prelude::*;
use rage_engine::*;

mod game;
mod taunts;
mod transfer;

pub use game::{SisypheanUpload, UploadTuning};
pub use transfer::Status;

rage_web::export_game!(SisypheanUpload, "sisyphean-upload");
