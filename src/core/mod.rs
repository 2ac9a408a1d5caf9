pub(crate) mod camera;
pub mod config;
pub(crate) mod state;
