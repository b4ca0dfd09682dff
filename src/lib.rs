//! Readable - reading accessibility toolkit
//!
//! Restyles text for easier reading: font, size, spacing, paper and ink
//! colors, and a "bionic" mode that bolds the first half of every word.
//! Text comes from a library of files, a notebook, or a capture source.

pub mod capture;
pub mod color_space;
pub mod config;
pub mod documents;
pub mod error;
pub mod input;
pub mod notes;
pub mod palette;
pub mod preferences;
pub mod render_engines;
pub mod state;
pub mod style;
pub mod terminal_capabilities;
pub mod ui;
pub mod unicode_handler;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use documents::{DocumentEntry, DocumentStore, FileLibrary};
pub use error::{CaptureError, StoreError};
pub use notes::{Note, NoteBook};
pub use palette::Palette;
pub use preferences::{PreferenceStore, PrefValue};
pub use render_engines::{apply_bionic_markup, render, Segment, StyleEngine, StyledDocument};
pub use state::ReaderState;
pub use style::{FontChoice, StyleConfig};
