//! Rendering adapter: turns relay snapshots into something to look at.
//!
//! # Invariants
//! - Renderers only read snapshots; they never touch run state.
//! - Viewport fitting always yields a finite, positive scale.

mod ascii;
mod text;
mod viewport;

pub use ascii::AsciiRenderer;
pub use text::{TextRenderer, status_line};
pub use viewport::{DEFAULT_PADDING, FALLBACK_SCALE, Viewport};

use relay_kernel::Snapshot;

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of a run.
    fn render(&self, snapshot: &Snapshot) -> Self::Output;
}

pub fn crate_info() -> &'static str {
    "relay-render v0.1.0"
}
