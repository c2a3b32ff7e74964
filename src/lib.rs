//! # LotPlanner
//!
//! Headless core of a 2D layout editor for planning carnival-lot equipment.
//! The host feeds pointer, wheel, and key events into a [`editor::LayoutEditor`]
//! and paints the display list it returns.
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! 1. **geometry / units** - points, sizes, bounds, length units
//! 2. **viewport** - screen, canvas, and real-world transforms; pan and zoom
//! 3. **spatial_index / hit_testing** - R-tree candidates, exact shape tests
//! 4. **input** - unified pointer events, gesture resolver, drag orchestrator
//! 5. **board** - equipment store with single selection
//! 6. **calibration / measure** - real-world scale and measurements
//! 7. **render** - dirty-flag driven display list
//! 8. **editor** - composition root, settings, snapshots

pub mod board;
pub mod calibration;
pub mod catalog;
pub mod constants;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod hit_testing;
pub mod input;
pub mod measure;
pub mod perf;
pub mod reference_image;
pub mod render;
pub mod settings;
pub mod settings_watcher;
pub mod snapshot;
pub mod spatial_index;
pub mod types;
pub mod units;
pub mod viewport;

pub use editor::LayoutEditor;
pub use error::{LayoutError, LayoutResult};

/// Initialize logging.
///
/// Honors `RUST_LOG`; defaults to `info`. Safe to call more than once, later
/// calls are ignored.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(true).with_level(true);

    // A host may already have installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
