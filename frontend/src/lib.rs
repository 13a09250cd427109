pub mod api;
pub mod state;

#[cfg(target_arch = "wasm32")]
mod app;
