//! Layer panel reconciliation.
//!
//! The view keeps a widget list synchronized with the ordered layer
//! collection the way a retained-mode UI toolkit would: widgets are keyed
//! by layer id and reused across renders, so unrelated items keep their
//! identity (and focus) when the collection reorders. Widget identity is
//! modeled with a serial number each created item keeps for life.

use serde_json::Value;
use tracing::trace;

use crate::model::{Layer, LayerKind};

/// Keyboard keys the grab handle reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKey {
    ArrowUp,
    ArrowDown,
    Other,
}

/// One rendered layer row.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub layer_id: String,
    /// Stable identity token, assigned at creation and never reused.
    pub widget_serial: u64,
    pub index: usize,
    pub selected: bool,
    pub visible_icon: bool,
    pub locked_icon: bool,
    pub name: String,
    /// The name field currently holds input focus; its text must not be
    /// clobbered by a re-render.
    pub name_editing: bool,
    /// Whether the grab handle has a keyboard handler attached at all.
    pub has_move_handler: bool,
}

/// Display name for a layer: the stored name, or a type-derived default.
pub fn display_name(layer: &Layer) -> String {
    if let Some(name) = &layer.name {
        if !name.is_empty() {
            return name.clone();
        }
    }
    match &layer.kind {
        LayerKind::Dimension(_) => "Dimension".to_string(),
        LayerKind::AngleDimension(_) => "Angle Dimension".to_string(),
        LayerKind::Marker(_) => "Marker".to_string(),
        LayerKind::Rectangle(_) => "Rectangle".to_string(),
        LayerKind::Circle(_) => "Circle".to_string(),
        LayerKind::Path(_) => "Path".to_string(),
        LayerKind::Blur(_) => "Blur".to_string(),
        LayerKind::Group(_) => "Group".to_string(),
        LayerKind::Text(text) => {
            let content = text.text.trim();
            if content.is_empty() {
                "Text: Empty".to_string()
            } else {
                let truncated: String = content.chars().take(20).collect();
                format!("Text: {}", truncated)
            }
        }
        LayerKind::Unknown => "Layer".to_string(),
    }
}

/// Whether a selection entry matches a layer id, tolerating numeric ids.
fn selection_matches(entry: &Value, id: &str) -> bool {
    match entry {
        Value::String(s) => s == id,
        Value::Number(n) => n.to_string() == id,
        _ => false,
    }
}

/// The reconciling layer panel.
pub struct LayerListView {
    items: Vec<ListItem>,
    next_serial: u64,
    /// Shown instead of items when the collection is empty.
    pub empty_state_visible: bool,
    on_move: Option<Box<dyn FnMut(&str, i32)>>,
}

impl Default for LayerListView {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LayerListView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerListView")
            .field("items", &self.items)
            .field("empty_state_visible", &self.empty_state_visible)
            .field("has_on_move", &self.on_move.is_some())
            .finish()
    }
}

impl LayerListView {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_serial: 1,
            empty_state_visible: false,
            on_move: None,
        }
    }

    /// Installs the keyboard-move callback. Items rendered afterwards get a
    /// live grab handle; without a callback the handle is absent entirely.
    pub fn set_on_move(&mut self, callback: Box<dyn FnMut(&str, i32)>) {
        self.on_move = Some(callback);
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Reconciles the widget list against the collection.
    ///
    /// Existing widgets are updated in place and reordered to match; new
    /// ids get fresh widgets; vanished ids are dropped. A name field that
    /// is mid-edit keeps its text.
    pub fn render(&mut self, layers: &[Layer], selection: &[Value]) {
        if layers.is_empty() {
            self.empty_state_visible = true;
            self.items.clear();
            return;
        }
        self.empty_state_visible = false;

        let has_handler = self.on_move.is_some();
        let mut next: Vec<ListItem> = Vec::with_capacity(layers.len());
        for (index, layer) in layers.iter().enumerate() {
            let selected = selection
                .iter()
                .any(|entry| selection_matches(entry, &layer.id));
            let existing = self
                .items
                .iter()
                .position(|item| item.layer_id == layer.id)
                .map(|at| self.items.remove(at));
            match existing {
                Some(mut item) => {
                    item.index = index;
                    item.selected = selected;
                    item.visible_icon = layer.visible;
                    item.locked_icon = layer.locked;
                    if !item.name_editing {
                        item.name = display_name(layer);
                    }
                    item.has_move_handler = has_handler;
                    next.push(item);
                }
                None => {
                    trace!(layer = %layer.id, "creating list item");
                    next.push(ListItem {
                        layer_id: layer.id.clone(),
                        widget_serial: self.next_serial,
                        index,
                        selected,
                        visible_icon: layer.visible,
                        locked_icon: layer.locked,
                        name: display_name(layer),
                        name_editing: false,
                        has_move_handler: has_handler,
                    });
                    self.next_serial += 1;
                }
            }
        }
        // Anything left over belongs to ids no longer in the collection.
        self.items = next;
    }

    /// Marks a row's name field as holding input focus.
    pub fn begin_name_edit(&mut self, id: &str) {
        if let Some(item) = self.items.iter_mut().find(|item| item.layer_id == id) {
            item.name_editing = true;
        }
    }

    pub fn end_name_edit(&mut self, id: &str) {
        if let Some(item) = self.items.iter_mut().find(|item| item.layer_id == id) {
            item.name_editing = false;
        }
    }

    /// Keyboard input on a row's grab handle. Arrow keys trigger the move
    /// callback; everything else is ignored. Without a callback the handle
    /// does not exist, so keys are ignored wholesale.
    pub fn key_on_handle(&mut self, id: &str, key: HandleKey) {
        let Some(on_move) = self.on_move.as_mut() else {
            return;
        };
        if !self.items.iter().any(|item| item.layer_id == id) {
            return;
        }
        match key {
            HandleKey::ArrowUp => on_move(id, -1),
            HandleKey::ArrowDown => on_move(id, 1),
            HandleKey::Other => {}
        }
    }
}
