//! Render engines module
//!
//! The bionic transform and styling engine, plus renderers that paint a
//! styled document for a terminal, a browser or a ratatui widget.

pub mod ansi;
pub mod bionic;
pub mod html;
pub mod markup;
pub mod styler;
pub mod tui;

pub use bionic::{apply_bionic_markup, bionic_segments};
pub use styler::{render, RenderCache, Segment, StyleEngine, StyledDocument};
