//! market-pulse Web Dashboard
//!
//! Leptos-based WASM frontend. Queries go to the playground server, which
//! returns agent replies already segmented into news, table, and notes
//! regions; this crate only renders them.

mod api;
mod app;
mod components;
mod pages;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
