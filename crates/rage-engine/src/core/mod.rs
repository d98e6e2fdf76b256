pub mod area;
#[cfg(feature = "physics")]
pub mod physics;
pub mod random;
pub mod scene;
pub mod storage;
pub mod time;
