//! Client-side behaviors for the PyVisualizer documentation site.
//!
//! Each component is a plain struct built from the element handles it needs
//! and driven through its event handlers. The `web` module binds them to
//! the live page; everything else also builds natively for tests.

pub mod active_section;
pub mod config;
pub mod copy;
pub mod dom;
pub mod error;
pub mod lazy_iframe;
pub mod mobile_nav;
pub mod nav_scroll;
pub mod reveal;
pub mod smooth_scroll;
pub mod theme;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
pub mod web;
