//! # Layerkit
//!
//! An image-annotation layer engine: measurement renderers (linear and
//! angle dimensions, numbered markers), an ordered layer collection with
//! folder grouping, drag-and-drop reordering, and identity-preserving
//! layer-panel reconciliation.
//!
//! ## Architecture
//!
//! Layerkit is organized as a workspace with multiple crates:
//!
//! 1. **layerkit-core** - Geometry primitives, numeric helpers, error types
//! 2. **layerkit-editor** - Layer records, renderers, ordering/grouping,
//!    persistence
//! 3. **layerkit** - This crate: re-exports plus the layer set inspection
//!    binary

pub use layerkit_core as core;
pub use layerkit_editor as editor;

pub use layerkit_core::{clamp, clamp_opacity, degrees_to_radians, radians_to_degrees};
pub use layerkit_editor::{
    draw_layer, hit_test_layer, layer_bounds, AngleDimensionRenderer, DimensionRenderer,
    DragDropController, EditorSession, Layer, LayerKind, LayerListView, LayerSetFile, LayerStore,
    MarkerRenderer, RecordingSurface, RenderSurface,
};

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

/// Version string baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Build timestamp set by the build script.
pub const BUILD_DATE: &str = env!("BUILD_DATE");
