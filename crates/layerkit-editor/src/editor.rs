//! Editor collaborator seams and a concrete in-process session.
//!
//! The drag-and-drop controller never touches storage directly; it talks to
//! the host through these traits. Every collaborator is optional, and the
//! controller degrades gracefully when one is absent, so hosts can wire up
//! only the pieces they have.

use tracing::debug;

use crate::model::Layer;
use crate::store::LayerStore;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Error,
}

/// Owner of the authoritative layer array and the undo history.
pub trait StateManager {
    fn layers(&self) -> Vec<Layer>;
    fn set_layers(&mut self, layers: Vec<Layer>);
    /// Records an undo snapshot labeled for the history UI.
    fn save_state(&mut self, label: &str);

    /// Host-specific fast path for a reorder. `Some(done)` means the host
    /// handled it (and whether anything changed); `None` asks the
    /// controller to splice the array itself.
    fn reorder_layer(&mut self, _dragged: &str, _target: &str, _insert_after: bool) -> Option<bool> {
        None
    }

    fn selected_ids(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Owner of the drawing surface.
pub trait CanvasManager {
    fn redraw(&mut self);
}

/// Owner of group (folder) membership bookkeeping.
pub trait GroupManager {
    /// Detaches a layer from its folder; `true` if membership changed.
    fn remove_from_folder(&mut self, id: &str) -> bool;
    /// Moves a layer into a folder; `true` on success.
    fn move_to_folder(&mut self, id: &str, group_id: &str) -> bool;
    /// Positioned insert into a folder, landing just before `anchor_id` in
    /// the child list. `None` means unsupported, in which case callers fall
    /// back to [`GroupManager::move_to_folder`].
    fn add_to_folder_at_position(
        &mut self,
        _id: &str,
        _group_id: &str,
        _anchor_id: &str,
    ) -> Option<bool> {
        None
    }
    fn send_to_back(&mut self, id: &str);
}

/// The editor as seen by interaction controllers.
///
/// Any accessor may return `None`; controllers must treat a missing
/// collaborator as "this capability is unavailable", never as a fault.
pub trait EditorHost {
    fn state_manager(&mut self) -> Option<&mut dyn StateManager>;
    fn canvas_manager(&mut self) -> Option<&mut dyn CanvasManager>;
    fn group_manager(&mut self) -> Option<&mut dyn GroupManager>;

    fn notify(&mut self, notice: Notice, message: &str);
    /// Asks the layer panel to rebuild from current state.
    fn refresh_layer_list(&mut self);
}

/// A labeled undo snapshot.
#[derive(Debug, Clone)]
struct Snapshot {
    label: String,
    layers: Vec<Layer>,
}

/// Self-contained editor session: store, history, and counters standing in
/// for a real canvas and panel. Implements every collaborator trait, which
/// also makes it the reference host for interaction tests.
#[derive(Debug, Default)]
pub struct EditorSession {
    store: LayerStore,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    selection: Vec<String>,
    pub redraw_count: usize,
    pub refresh_count: usize,
    pub notices: Vec<(Notice, String)>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layers(layers: Vec<Layer>) -> Self {
        Self {
            store: LayerStore::from_layers(layers),
            ..Self::default()
        }
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LayerStore {
        &mut self.store
    }

    pub fn select(&mut self, ids: Vec<String>) {
        self.selection = ids;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the most recent undoable action.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|s| s.label.as_str())
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        debug!(label = %snapshot.label, "undo");
        self.redo_stack.push(Snapshot {
            label: snapshot.label.clone(),
            layers: self.store.layers().to_vec(),
        });
        self.store.set_layers(snapshot.layers);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        debug!(label = %snapshot.label, "redo");
        self.undo_stack.push(Snapshot {
            label: snapshot.label.clone(),
            layers: self.store.layers().to_vec(),
        });
        self.store.set_layers(snapshot.layers);
        true
    }
}

impl StateManager for EditorSession {
    fn layers(&self) -> Vec<Layer> {
        self.store.layers().to_vec()
    }

    fn set_layers(&mut self, layers: Vec<Layer>) {
        self.store.set_layers(layers);
    }

    fn save_state(&mut self, label: &str) {
        self.undo_stack.push(Snapshot {
            label: label.to_string(),
            layers: self.store.layers().to_vec(),
        });
        self.redo_stack.clear();
    }

    fn selected_ids(&self) -> Vec<String> {
        self.selection.clone()
    }
}

impl CanvasManager for EditorSession {
    fn redraw(&mut self) {
        self.redraw_count += 1;
    }
}

impl GroupManager for EditorSession {
    fn remove_from_folder(&mut self, id: &str) -> bool {
        self.store.remove_from_group(id).unwrap_or(false)
    }

    fn move_to_folder(&mut self, id: &str, group_id: &str) -> bool {
        self.store.move_to_group(id, group_id).is_ok()
    }

    fn add_to_folder_at_position(&mut self, id: &str, group_id: &str, anchor_id: &str) -> Option<bool> {
        let position = self
            .store
            .get(group_id)
            .and_then(Layer::as_group)
            .and_then(|g| g.children.iter().position(|c| c == anchor_id))
            .unwrap_or(usize::MAX);
        Some(self.store.add_to_group_at(id, group_id, position).is_ok())
    }

    fn send_to_back(&mut self, id: &str) {
        if let Err(e) = self.store.send_to_back(id) {
            debug!(error = %e, "send_to_back ignored");
        }
    }
}

impl EditorHost for EditorSession {
    fn state_manager(&mut self) -> Option<&mut dyn StateManager> {
        Some(self)
    }

    fn canvas_manager(&mut self) -> Option<&mut dyn CanvasManager> {
        Some(self)
    }

    fn group_manager(&mut self) -> Option<&mut dyn GroupManager> {
        Some(self)
    }

    fn notify(&mut self, notice: Notice, message: &str) {
        self.notices.push((notice, message.to_string()));
    }

    fn refresh_layer_list(&mut self) {
        self.refresh_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str) -> Layer {
        let mut layer = Layer::marker(0.0, 0.0);
        layer.id = id.to_string();
        layer
    }

    #[test]
    fn save_state_then_undo_restores_and_redo_replays() {
        let mut session = EditorSession::with_layers(vec![named("a"), named("b")]);
        session.save_state("Reorder Layers");
        session.store_mut().reorder("a", "b", true).unwrap();
        assert_eq!(session.store().layers()[1].id, "a");
        assert_eq!(session.undo_label(), Some("Reorder Layers"));

        assert!(session.undo());
        assert_eq!(session.store().layers()[0].id, "a");
        assert!(session.redo());
        assert_eq!(session.store().layers()[1].id, "a");
    }

    #[test]
    fn new_action_clears_the_redo_stack() {
        let mut session = EditorSession::with_layers(vec![named("a"), named("b")]);
        session.save_state("first");
        session.store_mut().reorder("a", "b", true).unwrap();
        session.undo();
        assert!(session.can_redo());
        session.save_state("second");
        assert!(!session.can_redo());
    }

    #[test]
    fn undo_on_empty_history_is_a_no_op() {
        let mut session = EditorSession::new();
        assert!(!session.undo());
        assert!(!session.redo());
    }
}
