pub mod audio;
pub mod render;
pub mod toast;
