pub mod entity;
pub mod visual;
