//! Drag-and-drop and keyboard reordering of the layer list.
//!
//! The controller translates pointer and keyboard gestures into ordered
//! collection mutations through the [`EditorHost`] collaborator seams. It
//! never owns the layer array itself; state is read fresh from the state
//! manager immediately before each mutation and written back through it.
//! Every entry point degrades to a no-op when a collaborator is missing.

use tracing::{debug, warn};

use crate::editor::{EditorHost, Notice};
use crate::model::{Layer, BACKGROUND_ID};

const REORDER_LABEL: &str = "Reorder Layers";
const FOLDER_EXIT_LABEL: &str = "Move Layer Out of Folder";

/// Highlight zone of a hovered list item during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// Insert before the hovered item.
    Above,
    /// Insert after the hovered item.
    Below,
    /// Re-parent into the hovered (expanded) group.
    Into,
}

impl DropZone {
    /// Zone from the pointer's vertical position inside the hovered item.
    ///
    /// Expanded groups expose all three zones, split 15% / 70% / 15%.
    /// Everything else (plain layers, collapsed groups) splits at the
    /// midpoint into above/below only.
    pub fn from_pointer(relative_y: f64, item_height: f64, expanded_group: bool) -> DropZone {
        if item_height <= 0.0 {
            return DropZone::Above;
        }
        let fraction = (relative_y / item_height).clamp(0.0, 1.0);
        if expanded_group {
            if fraction < 0.15 {
                DropZone::Above
            } else if fraction > 0.85 {
                DropZone::Below
            } else {
                DropZone::Into
            }
        } else if fraction < 0.5 {
            DropZone::Above
        } else {
            DropZone::Below
        }
    }
}

/// Folder bookkeeping a reorder implies, resolved before the splice.
enum FolderAction {
    None,
    /// Dragged layer leaves its current folder.
    Leave,
    /// Dragged layer joins `group`, anchored before `anchor`.
    Join { group: String, anchor: String },
}

/// Ordering and grouping gesture controller.
#[derive(Debug, Default)]
pub struct DragDropController {
    dragged_id: Option<String>,
    /// Currently highlighted (item id, zone) during a drag-over.
    active_zone: Option<(String, DropZone)>,
}

impl DragDropController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragged_id(&self) -> Option<&str> {
        self.dragged_id.as_deref()
    }

    pub fn active_zone(&self) -> Option<(&str, DropZone)> {
        self.active_zone
            .as_ref()
            .map(|(id, zone)| (id.as_str(), *zone))
    }

    /// Begins a drag gesture on the given layer.
    pub fn drag_start(&mut self, id: &str) {
        debug!(layer = id, "drag start");
        self.dragged_id = Some(id.to_string());
        self.active_zone = None;
    }

    /// Updates the highlight zone while hovering over a list item. Returns
    /// the zone so the view can paint the matching indicator.
    pub fn drag_over(
        &mut self,
        host: &mut dyn EditorHost,
        target_id: &str,
        relative_y: f64,
        item_height: f64,
    ) -> DropZone {
        let expanded_group = host
            .state_manager()
            .map(|sm| sm.layers())
            .unwrap_or_default()
            .iter()
            .find(|layer| layer.id == target_id)
            .and_then(Layer::as_group)
            .map(|group| !group.collapsed)
            .unwrap_or(false);
        let zone = DropZone::from_pointer(relative_y, item_height, expanded_group);
        self.active_zone = Some((target_id.to_string(), zone));
        zone
    }

    /// Clears the highlight when the pointer leaves an item.
    pub fn drag_leave(&mut self, target_id: &str) {
        if matches!(&self.active_zone, Some((id, _)) if id == target_id) {
            self.active_zone = None;
        }
    }

    /// Completes the gesture: dispatches on the active zone and resets.
    pub fn drop_on(&mut self, host: &mut dyn EditorHost, target_id: &str) {
        let Some(dragged) = self.dragged_id.take() else {
            return;
        };
        let zone = match self.active_zone.take() {
            Some((id, zone)) if id == target_id => zone,
            _ => DropZone::Above,
        };
        debug!(layer = %dragged, target = target_id, ?zone, "drop");

        if target_id == BACKGROUND_ID {
            self.drop_on_background(host, &dragged);
            return;
        }

        match zone {
            DropZone::Into => self.move_to_folder(host, &dragged, target_id),
            DropZone::Below => {
                // Dropping below a collapsed group must land after the
                // group's last child, keeping the block contiguous.
                let anchor = host
                    .state_manager()
                    .map(|sm| sm.layers())
                    .unwrap_or_default()
                    .iter()
                    .find(|layer| layer.id == target_id)
                    .and_then(Layer::as_group)
                    .filter(|group| group.collapsed)
                    .and_then(|group| group.children.last().cloned());
                match anchor {
                    Some(last_child) => self.reorder_layers(host, &dragged, &last_child, true),
                    None => self.reorder_layers(host, &dragged, target_id, true),
                }
            }
            DropZone::Above => self.reorder_layers(host, &dragged, target_id, false),
        }
    }

    /// Ends the gesture without a drop (cancelled or left the window).
    pub fn drag_end(&mut self) {
        self.dragged_id = None;
        self.active_zone = None;
    }

    fn drop_on_background(&mut self, host: &mut dyn EditorHost, dragged: &str) {
        let in_folder = match host
            .state_manager()
            .map(|sm| sm.layers())
            .unwrap_or_default()
            .iter()
            .find(|layer| layer.id == dragged)
        {
            Some(layer) => layer.parent_group.is_some(),
            None => {
                debug!(layer = dragged, "background drop ignored, unknown dragged id");
                return;
            }
        };
        if let Some(sm) = host.state_manager() {
            sm.save_state(REORDER_LABEL);
        }
        if let Some(gm) = host.group_manager() {
            if in_folder {
                gm.remove_from_folder(dragged);
            }
            gm.send_to_back(dragged);
        }
        if let Some(cm) = host.canvas_manager() {
            cm.redraw();
        }
        host.refresh_layer_list();
    }

    /// Moves `dragged` next to `target`, re-parenting across folder
    /// boundaries as needed. Unresolvable ids leave everything untouched,
    /// including the undo history.
    pub fn reorder_layers(
        &mut self,
        host: &mut dyn EditorHost,
        dragged: &str,
        target: &str,
        insert_after: bool,
    ) {
        if dragged == target {
            return;
        }
        let layers = match host.state_manager() {
            Some(sm) => sm.layers(),
            None => return,
        };
        let Some(dragged_layer) = layers.iter().find(|layer| layer.id == dragged) else {
            debug!(layer = dragged, "reorder ignored, unknown dragged id");
            return;
        };
        let Some(target_layer) = layers.iter().find(|layer| layer.id == target) else {
            debug!(layer = target, "reorder ignored, unknown target id");
            return;
        };

        let action = match (&dragged_layer.parent_group, &target_layer.parent_group) {
            (from, to) if from == to => FolderAction::None,
            (from, Some(group)) => {
                // Inserting after a group's last child lands past the block,
                // outside the folder, not inside it.
                let past_block_end = insert_after
                    && layers
                        .iter()
                        .find(|layer| layer.id == *group)
                        .and_then(Layer::as_group)
                        .and_then(|g| g.children.last())
                        .is_some_and(|last| last == target);
                if past_block_end {
                    if from.is_some() {
                        FolderAction::Leave
                    } else {
                        FolderAction::None
                    }
                } else {
                    // The positional insert lands before its anchor, so an
                    // after-the-target drop anchors on the next child. This
                    // keeps the child list agreeing with the array splice.
                    let anchor = if insert_after {
                        layers
                            .iter()
                            .find(|layer| layer.id == *group)
                            .and_then(Layer::as_group)
                            .and_then(|g| {
                                let at = g.children.iter().position(|child| child == target)?;
                                g.children.get(at + 1).cloned()
                            })
                    } else {
                        None
                    };
                    FolderAction::Join {
                        group: group.clone(),
                        anchor: anchor.unwrap_or_else(|| target.to_string()),
                    }
                }
            }
            (Some(_), None) => FolderAction::Leave,
            (None, None) => FolderAction::None,
        };
        // Folder bookkeeping and the splice are one gesture: snapshot before
        // the first mutation so undo restores membership too.
        let snapshot_taken = !matches!(action, FolderAction::None);
        if snapshot_taken {
            if let Some(sm) = host.state_manager() {
                sm.save_state(REORDER_LABEL);
            }
        }
        match action {
            FolderAction::None => {}
            FolderAction::Leave => {
                if let Some(gm) = host.group_manager() {
                    gm.remove_from_folder(dragged);
                }
            }
            FolderAction::Join { group, anchor } => {
                if let Some(gm) = host.group_manager() {
                    if gm
                        .add_to_folder_at_position(dragged, &group, &anchor)
                        .is_none()
                    {
                        gm.move_to_folder(dragged, &group);
                    }
                }
            }
        }

        // Hosts with their own reorder implementation get first refusal.
        let handled = host
            .state_manager()
            .and_then(|sm| sm.reorder_layer(dragged, target, insert_after));
        match handled {
            Some(true) => {
                if let Some(cm) = host.canvas_manager() {
                    cm.redraw();
                }
                host.refresh_layer_list();
            }
            Some(false) => {}
            None => {
                let Some(sm) = host.state_manager() else {
                    return;
                };
                if !snapshot_taken {
                    sm.save_state(REORDER_LABEL);
                }
                let mut layers = sm.layers();
                let Some(from) = layers.iter().position(|layer| layer.id == dragged) else {
                    return;
                };
                let moved = layers.remove(from);
                let Some(at) = layers.iter().position(|layer| layer.id == target) else {
                    return;
                };
                layers.insert(at + usize::from(insert_after), moved);
                sm.set_layers(layers);
                if let Some(cm) = host.canvas_manager() {
                    cm.redraw();
                }
                host.refresh_layer_list();
            }
        }
    }

    /// Keyboard move: swaps the layer with its neighbor in `direction`
    /// (-1 toward the front of the array, +1 toward the back). Boundary
    /// moves and unknown ids are silent no-ops.
    pub fn move_layer(
        &mut self,
        host: &mut dyn EditorHost,
        id: &str,
        direction: i32,
        mut focus: Option<&mut dyn FnMut(&str)>,
    ) {
        let layers = match host.state_manager() {
            Some(sm) => sm.layers(),
            None => return,
        };
        let Some(index) = layers.iter().position(|layer| layer.id == id) else {
            return;
        };
        let neighbor = index as i64 + direction as i64;
        if neighbor < 0 || neighbor as usize >= layers.len() {
            return;
        }
        let neighbor = neighbor as usize;

        // Swapping past the folder boundary carries the layer out of it.
        let exits_folder = layers[index].parent_group.is_some()
            && layers[neighbor].parent_group != layers[index].parent_group;
        let label = if exits_folder {
            FOLDER_EXIT_LABEL
        } else {
            REORDER_LABEL
        };
        if let Some(sm) = host.state_manager() {
            sm.save_state(label);
        }
        if exits_folder {
            if let Some(gm) = host.group_manager() {
                gm.remove_from_folder(id);
            }
        }
        let Some(sm) = host.state_manager() else {
            return;
        };
        let mut layers = sm.layers();
        if layers.get(index).map(|layer| layer.id.as_str()) == Some(id) {
            layers.swap(index, neighbor);
            sm.set_layers(layers);
        }
        if let Some(cm) = host.canvas_manager() {
            cm.redraw();
        }
        host.refresh_layer_list();
        if let Some(focus) = focus.take() {
            focus(id);
        }
    }

    /// Re-parents a layer into a folder, with user-visible success/failure
    /// notification. A missing group manager is a warning, never a crash.
    pub fn move_to_folder(&mut self, host: &mut dyn EditorHost, dragged: &str, folder_id: &str) {
        let moved = host
            .group_manager()
            .map(|gm| gm.move_to_folder(dragged, folder_id));
        match moved {
            None => {
                warn!("group manager unavailable, cannot move layer into folder");
                host.notify(Notice::Error, "Could not move layer into the folder");
            }
            Some(false) => {
                host.notify(Notice::Error, "Could not move layer into the folder");
            }
            Some(true) => {
                host.notify(Notice::Success, "Layer moved into folder");
                if let Some(cm) = host.canvas_manager() {
                    cm.redraw();
                }
                host.refresh_layer_list();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{CanvasManager, EditorSession, GroupManager, StateManager};

    fn named(id: &str) -> Layer {
        let mut layer = Layer::marker(0.0, 0.0);
        layer.id = id.to_string();
        layer
    }

    fn ids(session: &EditorSession) -> Vec<&str> {
        session.store().iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn reorder_moves_dragged_before_target() {
        let mut session =
            EditorSession::with_layers(vec![named("layer-1"), named("layer-2"), named("layer-3")]);
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut session, "layer-1", "layer-3", false);
        assert_eq!(ids(&session), ["layer-2", "layer-1", "layer-3"]);
        assert_eq!(session.redraw_count, 1);
        assert_eq!(session.refresh_count, 1);
        assert_eq!(session.undo_label(), Some(REORDER_LABEL));
    }

    #[test]
    fn reorder_to_unknown_id_is_a_complete_no_op() {
        let mut session = EditorSession::with_layers(vec![named("a"), named("b")]);
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut session, "a", "ghost", false);
        dnd.reorder_layers(&mut session, "ghost", "a", true);
        assert_eq!(ids(&session), ["a", "b"]);
        assert_eq!(session.redraw_count, 0);
        assert!(!session.can_undo(), "no history entry for a no-op");
    }

    #[test]
    fn reorder_undo_restores_previous_order() {
        let mut session = EditorSession::with_layers(vec![named("a"), named("b"), named("c")]);
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut session, "a", "c", true);
        assert_eq!(ids(&session), ["b", "c", "a"]);
        session.undo();
        assert_eq!(ids(&session), ["a", "b", "c"]);
    }

    /// Host that counts folder calls and handles reorders itself.
    #[derive(Default)]
    struct CountingHost {
        session: EditorSession,
        remove_calls: Vec<String>,
        handled: Option<bool>,
    }

    impl StateManager for CountingHost {
        fn layers(&self) -> Vec<Layer> {
            self.session.store().layers().to_vec()
        }
        fn set_layers(&mut self, layers: Vec<Layer>) {
            self.session.store_mut().set_layers(layers);
        }
        fn save_state(&mut self, label: &str) {
            StateManager::save_state(&mut self.session, label);
        }
        fn reorder_layer(&mut self, dragged: &str, target: &str, insert_after: bool) -> Option<bool> {
            let handled = self.handled;
            if handled == Some(true) {
                let _ = self.session.store_mut().reorder(dragged, target, insert_after);
            }
            handled
        }
    }
    impl GroupManager for CountingHost {
        fn remove_from_folder(&mut self, id: &str) -> bool {
            self.remove_calls.push(id.to_string());
            self.session.store_mut().remove_from_group(id).unwrap_or(false)
        }
        fn move_to_folder(&mut self, id: &str, group_id: &str) -> bool {
            self.session.store_mut().move_to_group(id, group_id).is_ok()
        }
        fn add_to_folder_at_position(&mut self, id: &str, group_id: &str, anchor_id: &str) -> Option<bool> {
            GroupManager::add_to_folder_at_position(&mut self.session, id, group_id, anchor_id)
        }
        fn send_to_back(&mut self, id: &str) {
            let _ = self.session.store_mut().send_to_back(id);
        }
    }
    impl EditorHost for CountingHost {
        fn state_manager(&mut self) -> Option<&mut dyn StateManager> {
            Some(self)
        }
        fn canvas_manager(&mut self) -> Option<&mut dyn CanvasManager> {
            Some(&mut self.session)
        }
        fn group_manager(&mut self) -> Option<&mut dyn GroupManager> {
            Some(self)
        }
        fn notify(&mut self, notice: Notice, message: &str) {
            self.session.notices.push((notice, message.to_string()));
        }
        fn refresh_layer_list(&mut self) {
            self.session.refresh_count += 1;
        }
    }

    fn grouped_host() -> CountingHost {
        let mut host = CountingHost::default();
        let mut group = Layer::group("Folder");
        group.id = "folder-1".to_string();
        host.session.store_mut().push(group);
        host.session.store_mut().push(named("in-a"));
        host.session.store_mut().push(named("in-b"));
        host.session.store_mut().push(named("outside"));
        host.session
            .store_mut()
            .move_to_group("in-a", "folder-1")
            .unwrap();
        host.session
            .store_mut()
            .move_to_group("in-b", "folder-1")
            .unwrap();
        host
    }

    #[test]
    fn dragging_out_of_a_folder_removes_membership_exactly_once() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut host, "in-a", "outside", true);
        assert_eq!(host.remove_calls, ["in-a".to_string()]);
        assert!(host
            .session
            .store()
            .get("in-a")
            .unwrap()
            .parent_group
            .is_none());
    }

    #[test]
    fn reordering_within_one_folder_never_touches_membership() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut host, "in-a", "in-b", true);
        assert!(host.remove_calls.is_empty());
        assert_eq!(
            host.session.store().get("in-a").unwrap().parent_group.as_deref(),
            Some("folder-1")
        );
    }

    #[test]
    fn dropping_between_another_folders_children_joins_that_folder() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut host, "outside", "in-b", false);
        assert_eq!(
            host.session.store().get("outside").unwrap().parent_group.as_deref(),
            Some("folder-1")
        );
        let children = &host.session.store().get("folder-1").unwrap().as_group().unwrap().children;
        assert_eq!(children, &["in-a", "outside", "in-b"]);
    }

    #[test]
    fn undoing_a_drag_out_of_a_folder_restores_membership() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut host, "in-a", "outside", true);
        assert!(host
            .session
            .store()
            .get("in-a")
            .unwrap()
            .parent_group
            .is_none());
        host.session.undo();
        assert_eq!(
            host.session.store().get("in-a").unwrap().parent_group.as_deref(),
            Some("folder-1"),
            "one gesture, one snapshot: undo restores folder membership"
        );
        host.session.store().validate().unwrap();
    }

    #[test]
    fn joining_after_a_middle_child_keeps_child_list_and_order_agreeing() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut host, "outside", "in-a", true);
        let children = &host.session.store().get("folder-1").unwrap().as_group().unwrap().children;
        assert_eq!(children, &["in-a", "outside", "in-b"]);
        let order: Vec<&str> = host.session.store().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, ["folder-1", "in-a", "outside", "in-b"]);
        host.session.store().validate().unwrap();
    }

    #[test]
    fn background_drop_of_an_unknown_id_is_a_complete_no_op() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.drag_start("ghost");
        dnd.drop_on(&mut host, BACKGROUND_ID);
        assert!(!host.session.can_undo(), "no history entry");
        assert_eq!(host.session.refresh_count, 0);
        assert_eq!(host.session.redraw_count, 0);
    }

    #[test]
    fn host_fast_path_true_skips_history_but_refreshes() {
        let mut host = CountingHost {
            handled: Some(true),
            ..CountingHost::default()
        };
        host.session.store_mut().push(named("a"));
        host.session.store_mut().push(named("b"));
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut host, "a", "b", true);
        assert_eq!(host.session.store().layers()[1].id, "a");
        assert_eq!(host.session.refresh_count, 1);
        assert!(!host.session.can_undo());
    }

    #[test]
    fn host_fast_path_false_does_nothing_further() {
        let mut host = CountingHost {
            handled: Some(false),
            ..CountingHost::default()
        };
        host.session.store_mut().push(named("a"));
        host.session.store_mut().push(named("b"));
        let mut dnd = DragDropController::new();
        dnd.reorder_layers(&mut host, "a", "b", true);
        assert_eq!(host.session.store().layers()[0].id, "a");
        assert_eq!(host.session.refresh_count, 0);
        assert_eq!(host.session.redraw_count, 0);
    }

    #[test]
    fn move_layer_swaps_neighbors_and_stops_at_boundaries() {
        let mut session = EditorSession::with_layers(vec![named("a"), named("b"), named("c")]);
        let mut dnd = DragDropController::new();
        dnd.move_layer(&mut session, "b", -1, None);
        assert_eq!(ids(&session), ["b", "a", "c"]);
        dnd.move_layer(&mut session, "b", -1, None);
        assert_eq!(ids(&session), ["b", "a", "c"], "top boundary no-op");
        dnd.move_layer(&mut session, "c", 1, None);
        assert_eq!(ids(&session), ["b", "a", "c"], "bottom boundary no-op");
    }

    #[test]
    fn move_layer_invokes_focus_callback() {
        let mut session = EditorSession::with_layers(vec![named("a"), named("b")]);
        let mut dnd = DragDropController::new();
        let mut focused = Vec::new();
        let mut callback = |id: &str| focused.push(id.to_string());
        dnd.move_layer(&mut session, "b", -1, Some(&mut callback));
        assert_eq!(focused, ["b".to_string()]);
    }

    #[test]
    fn move_layer_out_of_folder_gets_its_own_history_label() {
        let mut host = grouped_host();
        // Order: folder-1, in-a, in-b, outside. Moving in-b down swaps with
        // "outside", exiting the folder.
        let mut dnd = DragDropController::new();
        dnd.move_layer(&mut host, "in-b", 1, None);
        assert_eq!(host.remove_calls, ["in-b".to_string()]);
        assert_eq!(host.session.undo_label(), Some(FOLDER_EXIT_LABEL));
    }

    #[test]
    fn move_to_folder_notifies_on_both_paths() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.move_to_folder(&mut host, "outside", "folder-1");
        assert_eq!(host.session.notices.last().unwrap().0, Notice::Success);
        assert_eq!(host.session.redraw_count, 1);

        dnd.move_to_folder(&mut host, "outside", "not-a-folder");
        assert_eq!(host.session.notices.last().unwrap().0, Notice::Error);
        assert_eq!(host.session.redraw_count, 1, "failure path never redraws");
    }

    /// Host with no collaborators at all.
    struct EmptyHost {
        notices: Vec<(Notice, String)>,
    }
    impl EditorHost for EmptyHost {
        fn state_manager(&mut self) -> Option<&mut dyn StateManager> {
            None
        }
        fn canvas_manager(&mut self) -> Option<&mut dyn CanvasManager> {
            None
        }
        fn group_manager(&mut self) -> Option<&mut dyn GroupManager> {
            None
        }
        fn notify(&mut self, notice: Notice, message: &str) {
            self.notices.push((notice, message.to_string()));
        }
        fn refresh_layer_list(&mut self) {}
    }

    #[test]
    fn every_gesture_survives_missing_collaborators() {
        let mut host = EmptyHost { notices: Vec::new() };
        let mut dnd = DragDropController::new();
        dnd.drag_start("a");
        dnd.drag_over(&mut host, "b", 5.0, 10.0);
        dnd.drag_leave("b");
        dnd.drag_start("a");
        dnd.drop_on(&mut host, "b");
        dnd.reorder_layers(&mut host, "a", "b", false);
        dnd.move_layer(&mut host, "a", 1, None);
        dnd.move_to_folder(&mut host, "a", "g");
        assert_eq!(host.notices.last().unwrap().0, Notice::Error);
    }

    #[test]
    fn zone_thresholds() {
        assert_eq!(DropZone::from_pointer(1.0, 10.0, true), DropZone::Above);
        assert_eq!(DropZone::from_pointer(5.0, 10.0, true), DropZone::Into);
        assert_eq!(DropZone::from_pointer(9.5, 10.0, true), DropZone::Below);
        assert_eq!(DropZone::from_pointer(4.0, 10.0, false), DropZone::Above);
        assert_eq!(DropZone::from_pointer(6.0, 10.0, false), DropZone::Below);
    }

    #[test]
    fn drag_over_exposes_into_only_for_expanded_groups() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.drag_start("outside");
        assert_eq!(dnd.drag_over(&mut host, "folder-1", 5.0, 10.0), DropZone::Into);

        if let Some(group) = host.session.store_mut().get_mut("folder-1").and_then(Layer::as_group_mut) {
            group.collapsed = true;
        }
        assert_eq!(
            dnd.drag_over(&mut host, "folder-1", 5.0, 10.0),
            DropZone::Below,
            "collapsed groups split at the midpoint"
        );
    }

    #[test]
    fn drop_into_zone_moves_into_the_folder() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.drag_start("outside");
        dnd.drag_over(&mut host, "folder-1", 5.0, 10.0);
        dnd.drop_on(&mut host, "folder-1");
        assert_eq!(
            host.session.store().get("outside").unwrap().parent_group.as_deref(),
            Some("folder-1")
        );
        assert!(dnd.dragged_id().is_none(), "gesture state cleared");
    }

    #[test]
    fn drop_below_collapsed_group_lands_after_its_last_child() {
        let mut host = grouped_host();
        if let Some(group) = host.session.store_mut().get_mut("folder-1").and_then(Layer::as_group_mut) {
            group.collapsed = true;
        }
        let mut dnd = DragDropController::new();
        dnd.drag_start("outside");
        dnd.drag_over(&mut host, "folder-1", 9.0, 10.0);
        dnd.drop_on(&mut host, "folder-1");
        let order: Vec<&str> = host.session.store().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, ["folder-1", "in-a", "in-b", "outside"]);
        assert!(
            host.session.store().get("outside").unwrap().parent_group.is_none(),
            "landing after the block does not join the folder"
        );
    }

    #[test]
    fn drop_on_background_sends_to_back_and_leaves_folder() {
        let mut host = grouped_host();
        let mut dnd = DragDropController::new();
        dnd.drag_start("in-a");
        dnd.drop_on(&mut host, BACKGROUND_ID);
        assert_eq!(host.remove_calls, ["in-a".to_string()]);
        assert_eq!(host.session.store().layers()[0].id, "in-a");
        assert!(host.session.store().get("in-a").unwrap().parent_group.is_none());
    }
}
