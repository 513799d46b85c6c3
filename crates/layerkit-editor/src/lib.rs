//! # Layerkit Editor
//!
//! This crate provides the annotation-editor core: layer records, the
//! measurement renderers, and the ordering/grouping machinery behind the
//! layer panel.
//!
//! ## Core Components
//!
//! ### Layer Records
//! - **Model**: the tagged layer record schema (dimension, angle dimension,
//!   marker, basic shapes, groups) with lenient decoding of legacy records
//! - **Persistence**: the JSON layer set envelope that round-trips through
//!   disk and undo history
//!
//! ### Rendering
//! - **Surface**: the abstract 2D paint target renderers draw against
//! - **Renderers**: per-kind drawing, bounds, and hit-test engines for the
//!   measurement annotations
//!
//! ### Ordering and Grouping
//! - **Store**: the ordered layer collection with group bookkeeping
//! - **Drag/Drop**: the gesture controller turning drags and key presses
//!   into reorders, re-parenting, and history snapshots
//! - **Layer List**: identity-preserving reconciliation of the panel rows
//!
//! ## Usage
//!
//! ```rust,ignore
//! use layerkit_editor::{model::Layer, render, surface::RecordingSurface};
//!
//! let layer = Layer::dimension(0.0, 0.0, 30.0, 40.0);
//! let mut surface = RecordingSurface::new();
//! render::draw_layer(&mut surface, &layer);
//! ```

pub mod drag_drop;
pub mod editor;
pub mod layer_list;
pub mod measure;
pub mod model;
pub mod persistence;
pub mod render;
pub mod store;
pub mod surface;

pub use drag_drop::{DragDropController, DropZone};
pub use editor::{CanvasManager, EditorHost, EditorSession, GroupManager, Notice, StateManager};
pub use layer_list::{display_name, HandleKey, LayerListView, ListItem};
pub use model::{Layer, LayerKind, BACKGROUND_ID};
pub use persistence::{LayerSetFile, LayerSetMetadata};
pub use render::{
    draw_layer, hit_test_layer, layer_bounds, AngleDimensionRenderer, DimensionRenderer,
    MarkerRenderer, ShadowPainter,
};
pub use store::LayerStore;
pub use surface::{RecordingSurface, RenderSurface, SurfaceError, SurfaceOp};
