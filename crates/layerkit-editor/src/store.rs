//! Ordered layer storage with group membership bookkeeping.
//!
//! The `Vec<Layer>` order is the z-order, bottom first. Group membership is
//! recorded twice (the member's `parent_group` and the group's `children`
//! list) and every mutation here keeps the two sides agreeing.

use layerkit_core::error::{LayerDataError, StoreError};

use crate::model::Layer;

/// The ordered collection of layers behind an editor session.
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn set_layers(&mut self, layers: Vec<Layer>) {
        self.layers = layers;
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    fn require(&self, id: &str) -> Result<usize, StoreError> {
        self.index_of(id).ok_or_else(|| StoreError::UnknownLayer {
            id: id.to_string(),
        })
    }

    fn require_group(&self, id: &str) -> Result<usize, StoreError> {
        match self.index_of(id) {
            Some(index) if self.layers[index].is_group() => Ok(index),
            _ => Err(StoreError::UnknownGroup { id: id.to_string() }),
        }
    }

    /// Detaches a layer from whatever group it is in.
    ///
    /// Returns `true` when the layer was actually a member of something.
    /// A stale `parent_group` pointing at a vanished group is still cleared.
    pub fn remove_from_group(&mut self, id: &str) -> Result<bool, StoreError> {
        let index = self.require(id)?;
        let Some(group_id) = self.layers[index].parent_group.take() else {
            return Ok(false);
        };
        if let Some(group) = self.get_mut(&group_id).and_then(Layer::as_group_mut) {
            group.children.retain(|child| child != id);
        }
        Ok(true)
    }

    /// Moves a layer into a group, appending it to the child list.
    pub fn move_to_group(&mut self, id: &str, group_id: &str) -> Result<(), StoreError> {
        self.add_to_group_at(id, group_id, usize::MAX)
    }

    /// Moves a layer into a group at a specific child position.
    ///
    /// `position` is clamped to the child list length. Membership in any
    /// previous group is dissolved first. A group can never be nested
    /// inside another group.
    pub fn add_to_group_at(
        &mut self,
        id: &str,
        group_id: &str,
        position: usize,
    ) -> Result<(), StoreError> {
        let index = self.require(id)?;
        self.require_group(group_id)?;
        if self.layers[index].is_group() || id == group_id {
            return Err(StoreError::UnknownLayer {
                id: id.to_string(),
            });
        }
        self.remove_from_group(id)?;
        if let Some(layer) = self.get_mut(id) {
            layer.parent_group = Some(group_id.to_string());
        }
        let mut child_index = 0;
        if let Some(group) = self.get_mut(group_id).and_then(Layer::as_group_mut) {
            child_index = position.min(group.children.len());
            group.children.insert(child_index, id.to_string());
        }
        // The group's block stays contiguous: members sit right after the
        // header, in child order.
        if let Some(from) = self.index_of(id) {
            let layer = self.layers.remove(from);
            let anchor = self
                .index_of(group_id)
                .map(|group_index| group_index + 1 + child_index)
                .unwrap_or(from);
            self.layers.insert(anchor.min(self.layers.len()), layer);
        }
        Ok(())
    }

    /// Moves a layer to the bottom of the stack.
    pub fn send_to_back(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self.require(id)?;
        let layer = self.layers.remove(index);
        self.layers.insert(0, layer);
        Ok(())
    }

    /// Splices `dragged` out and back in adjacent to `target`.
    ///
    /// The insertion index is computed *after* removal, so dropping a layer
    /// onto a later target lands it exactly at the target's slot (before)
    /// or just past it (after).
    pub fn reorder(
        &mut self,
        dragged: &str,
        target: &str,
        insert_after: bool,
    ) -> Result<(), StoreError> {
        let from = self.require(dragged)?;
        self.require(target)?;
        let layer = self.layers.remove(from);
        // Target index is re-resolved post-removal.
        let to = match self.index_of(target) {
            Some(index) => index + usize::from(insert_after),
            None => from.min(self.layers.len()),
        };
        self.layers.insert(to.min(self.layers.len()), layer);
        Ok(())
    }

    /// Checks structural invariants: unique ids, both sides of every group
    /// membership agreeing, and no group nested in a group.
    pub fn validate(&self) -> Result<(), LayerDataError> {
        for (i, layer) in self.layers.iter().enumerate() {
            if self.layers[..i].iter().any(|other| other.id == layer.id) {
                return Err(LayerDataError::DuplicateId {
                    id: layer.id.clone(),
                });
            }
            if let Some(group_id) = &layer.parent_group {
                let listed = self
                    .get(group_id)
                    .and_then(|g| g.as_group())
                    .is_some_and(|g| g.children.contains(&layer.id));
                if !listed {
                    return Err(LayerDataError::GroupMismatch {
                        group: group_id.clone(),
                        member: layer.id.clone(),
                    });
                }
                if layer.is_group() {
                    return Err(LayerDataError::Malformed {
                        reason: format!("group {} nested inside {}", layer.id, group_id),
                    });
                }
            }
            if let Some(group) = layer.as_group() {
                for child in &group.children {
                    let back_ref = self
                        .get(child)
                        .is_some_and(|c| c.parent_group.as_deref() == Some(layer.id.as_str()));
                    if !back_ref {
                        return Err(LayerDataError::GroupMismatch {
                            group: layer.id.clone(),
                            member: child.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
