#![warn(missing_docs)]
//! Pre-renders the client-side decorations of a static blog: the remote
//! announcement preview mounted into the home page, and the scroll-driven
//! header transforms its page variants apply on the way down.

pub mod controls;
pub mod markup;
pub mod preview;
pub mod runtime;
pub mod scroll;
pub mod snippet;

pub use controls::{Cli, PreviewControls, RecipeArg, DEFAULT_MOUNT_SELECTOR};
pub use markup::MarkupError;
pub use preview::{ExtractedTriple, MarkerSet, PreviewError, PREVIEW_CLASS};
pub use runtime::render_home;
pub use scroll::{
    HeaderTransform, ScrollConfig, ScrollController, ScrollSample, TransformRecipe,
};
pub use snippet::{clip_to_budget, COMPACT_SNIPPET_BUDGET, ELLIPSIS, HOME_SNIPPET_BUDGET};

#[cfg(feature = "debug_logs")]
#[macro_export]
// This allows use of the `eprintln!` macro via `debug_log!` macro.
macro_rules! debug_log {
        ($($arg:tt)*) => {
            eprintln!($($arg)*);
        };
    }
#[cfg(not(feature = "debug_logs"))]
#[macro_export]
// This effectively disables the `eprintln!` macro, effectively removing it from the code during
// compilation.
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}
