//! The element tree: arena of UI elements with parent links, widget state,
//! and per-element accelerator collections.
//!
//! `ElementTree` is the single owner of all mutable state in the crate. It
//! strongly owns the elements, their accelerator collections, and the live
//! registry; everything else refers into it through generation-checked
//! slotmap keys. Callers thread `&mut ElementTree` through the resolution
//! entry points, which makes the single-threaded synchronous model explicit.

use slotmap::{SlotMap, new_key_type};

use crate::accelerator::{
    Accelerator, AcceleratorCollection, CollectionId, DefaultAction, ProcessAcceleratorsArgs,
    ProcessHandler,
};
use crate::error::{AccelError, Result};
use crate::registry::LiveRegistry;

new_key_type! {
    /// Handle to an element stored in an [`ElementTree`].
    pub struct ElementId;
}

/// Interactive state carried by widget elements.
///
/// Plain nodes (non-widgets) have no `WidgetState`; tree walks treat them as
/// transparent for visibility purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetState {
    /// Whether the widget is shown.
    pub visible: bool,
    /// Whether the widget accepts interaction.
    pub enabled: bool,
    /// Whether the widget is active (loaded into the live tree). Only active
    /// widgets have their accelerator collections registered for scanning.
    pub active: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
            active: true,
        }
    }
}

/// Per-element storage.
struct ElementData {
    name: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    /// `Some` for widgets, `None` for plain nodes.
    widget_state: Option<WidgetState>,
    /// The element's accelerator collection, when one is set.
    accelerators: Option<CollectionId>,
    default_action: Option<DefaultAction>,
    process_hook: Option<ProcessHandler>,
    process_event: Option<ProcessHandler>,
}

impl ElementData {
    fn new(name: impl Into<String>, widget_state: Option<WidgetState>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            widget_state,
            accelerators: None,
            default_action: None,
            process_hook: None,
            process_event: None,
        }
    }
}

/// The live UI element tree.
pub struct ElementTree {
    elements: SlotMap<ElementId, ElementData>,
    collections: SlotMap<CollectionId, AcceleratorCollection>,
    live: LiveRegistry,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            collections: SlotMap::with_key(),
            live: LiveRegistry::new(),
        }
    }

    // =========================================================================
    // Element lifecycle
    // =========================================================================

    /// Insert a widget element.
    ///
    /// A dangling `parent` id is treated as no parent; the widget becomes a
    /// root.
    pub fn insert_widget(&mut self, name: impl Into<String>, parent: Option<ElementId>) -> ElementId {
        self.insert(name, parent, Some(WidgetState::default()))
    }

    /// Insert a plain (non-widget) node. Plain nodes carry no widget state
    /// and are transparent to visibility walks.
    pub fn insert_node(&mut self, name: impl Into<String>, parent: Option<ElementId>) -> ElementId {
        self.insert(name, parent, None)
    }

    fn insert(
        &mut self,
        name: impl Into<String>,
        parent: Option<ElementId>,
        widget_state: Option<WidgetState>,
    ) -> ElementId {
        let data = ElementData::new(name, widget_state);
        let id = self.elements.insert(data);

        if let Some(parent_id) = parent {
            if self.elements.contains_key(parent_id) {
                self.elements[id].parent = Some(parent_id);
                self.elements[parent_id].children.push(id);
            }
        }

        tracing::trace!(
            target: "acceltree::tree",
            ?id,
            name = %self.elements[id].name,
            "inserted element"
        );
        id
    }

    /// Destroy an element and its entire subtree.
    ///
    /// Each destroyed element's accelerator collection is removed from the
    /// strong store. Live-registry entries are left in place; they become
    /// unresolvable and are pruned by the next registry scan.
    pub fn destroy(&mut self, id: ElementId) -> Result<()> {
        if !self.elements.contains_key(id) {
            return Err(AccelError::InvalidElementId);
        }

        // Detach from the parent first so the cascade never revisits us.
        if let Some(parent_id) = self.elements[id].parent {
            if let Some(parent) = self.elements.get_mut(parent_id) {
                parent.children.retain(|&child| child != id);
            }
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(data) = self.elements.remove(current) else {
                continue;
            };
            stack.extend(data.children);
            if let Some(cid) = data.accelerators {
                self.collections.remove(cid);
            }
            tracing::trace!(
                target: "acceltree::tree",
                id = ?current,
                name = %data.name,
                "destroyed element"
            );
        }
        Ok(())
    }

    /// Check if an element exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the tree has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get an element's name.
    pub fn name(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).map(|data| data.name.as_str())
    }

    // =========================================================================
    // Parent/child links
    // =========================================================================

    /// Get an element's parent.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|data| data.parent)
    }

    /// Get an element's children in insertion order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    /// Reparent an element.
    ///
    /// Rejects making an element its own ancestor, which would break the
    /// termination guarantee of every parent walk.
    pub fn set_parent(&mut self, id: ElementId, parent: Option<ElementId>) -> Result<()> {
        if !self.elements.contains_key(id) {
            return Err(AccelError::InvalidElementId);
        }
        if let Some(parent_id) = parent {
            if !self.elements.contains_key(parent_id) {
                return Err(AccelError::InvalidElementId);
            }
            if self.is_ancestor_or_self(id, parent_id) {
                return Err(AccelError::CircularParentage);
            }
        }

        if let Some(old_parent) = self.elements[id].parent {
            if let Some(old) = self.elements.get_mut(old_parent) {
                old.children.retain(|&child| child != id);
            }
        }
        self.elements[id].parent = parent;
        if let Some(parent_id) = parent {
            self.elements[parent_id].children.push(id);
        }
        Ok(())
    }

    /// Check whether `ancestor` is `id` itself or one of its ancestors.
    ///
    /// A dangling id anywhere in the chain terminates the walk; stale ids
    /// never match.
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.elements.get(cur).and_then(|data| data.parent);
        }
        false
    }

    // =========================================================================
    // Widget state
    // =========================================================================

    /// Check if an element is a widget.
    pub fn is_widget(&self, id: ElementId) -> bool {
        self.elements
            .get(id)
            .is_some_and(|data| data.widget_state.is_some())
    }

    /// Set a widget's visibility.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<()> {
        self.widget_state_mut(id)?.visible = visible;
        Ok(())
    }

    /// Set a widget's enabled state.
    pub fn set_enabled(&mut self, id: ElementId, enabled: bool) -> Result<()> {
        self.widget_state_mut(id)?.enabled = enabled;
        Ok(())
    }

    /// Set a widget's active state.
    ///
    /// Activation registers the widget's accelerator collection in the live
    /// registry; deactivation unregisters it. Both are no-ops when the state
    /// does not change.
    pub fn set_active(&mut self, id: ElementId, active: bool) -> Result<()> {
        let state = self.widget_state_mut(id)?;
        if state.active == active {
            return Ok(());
        }
        state.active = active;
        if let Some(cid) = self.elements[id].accelerators {
            if active {
                self.live.register(cid);
            } else {
                self.live.unregister(cid);
            }
        }
        Ok(())
    }

    fn widget_state_mut(&mut self, id: ElementId) -> Result<&mut WidgetState> {
        self.elements
            .get_mut(id)
            .ok_or(AccelError::InvalidElementId)?
            .widget_state
            .as_mut()
            .ok_or(AccelError::NotAWidget)
    }

    /// Check if an element is visible. Plain nodes are always considered
    /// visible; a dangling id counts as not visible.
    pub fn is_visible(&self, id: ElementId) -> bool {
        match self.elements.get(id) {
            Some(data) => data.widget_state.map(|state| state.visible).unwrap_or(true),
            None => false,
        }
    }

    /// Check if every ancestor of `id` (exclusive) is visible. Plain nodes
    /// in the chain count as visible.
    pub fn ancestors_visible(&self, id: ElementId) -> bool {
        let mut current = self.parent(id);
        while let Some(cur) = current {
            let Some(data) = self.elements.get(cur) else {
                break;
            };
            if let Some(state) = data.widget_state {
                if !state.visible {
                    return false;
                }
            }
            current = data.parent;
        }
        true
    }

    /// Check if an element is a widget in the disabled state. Plain nodes
    /// and dangling ids are not "disabled".
    pub fn is_widget_disabled(&self, id: ElementId) -> bool {
        self.elements
            .get(id)
            .and_then(|data| data.widget_state)
            .is_some_and(|state| !state.enabled)
    }

    /// Find the nearest active widget at or above `id`.
    pub fn active_ancestor_or_self(&self, id: ElementId) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(cur) = current {
            let data = self.elements.get(cur)?;
            if data.widget_state.is_some_and(|state| state.active) {
                return Some(cur);
            }
            current = data.parent;
        }
        None
    }

    // =========================================================================
    // Accelerator collections
    // =========================================================================

    /// Replace an element's accelerator collection.
    ///
    /// The previous collection, if any, is unregistered from the live
    /// registry and removed from the store. The new collection is registered
    /// when the element is an active widget.
    pub fn set_accelerators(
        &mut self,
        id: ElementId,
        accelerators: Vec<Accelerator>,
    ) -> Result<CollectionId> {
        if !self.elements.contains_key(id) {
            return Err(AccelError::InvalidElementId);
        }

        if let Some(old) = self.elements[id].accelerators.take() {
            self.live.unregister(old);
            self.collections.remove(old);
        }

        let mut collection = AcceleratorCollection::new(id);
        for accel in accelerators {
            collection.push(accel);
        }
        let cid = self.collections.insert(collection);
        self.elements[id].accelerators = Some(cid);

        let active = self.elements[id]
            .widget_state
            .is_some_and(|state| state.active);
        if active {
            self.live.register(cid);
        }
        tracing::trace!(
            target: "acceltree::tree",
            collection = ?cid,
            element = ?id,
            registered = active,
            "set accelerators"
        );
        Ok(cid)
    }

    /// Get an element's accelerator collection id.
    pub fn accelerators_of(&self, id: ElementId) -> Option<CollectionId> {
        self.elements.get(id).and_then(|data| data.accelerators)
    }

    /// Resolve a collection id.
    pub fn collection(&self, cid: CollectionId) -> Option<&AcceleratorCollection> {
        self.collections.get(cid)
    }

    /// Resolve a collection id mutably.
    pub fn collection_mut(&mut self, cid: CollectionId) -> Option<&mut AcceleratorCollection> {
        self.collections.get_mut(cid)
    }

    /// Check whether a collection id still resolves.
    pub fn collection_alive(&self, cid: CollectionId) -> bool {
        self.collections.contains_key(cid)
    }

    // =========================================================================
    // Live registry access
    // =========================================================================

    pub(crate) fn live_registry(&self) -> &LiveRegistry {
        &self.live
    }

    pub(crate) fn prune_live(&mut self, dead: &[CollectionId]) {
        self.live.prune(dead);
    }

    /// Number of live-registry entries, including any not yet pruned.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    // =========================================================================
    // Per-element callbacks
    // =========================================================================

    /// Set the fallback action run on this element when one of its
    /// accelerators fires unhandled.
    pub fn set_default_action<F>(&mut self, id: ElementId, action: F) -> Result<()>
    where
        F: FnMut() -> bool + 'static,
    {
        self.elements
            .get_mut(id)
            .ok_or(AccelError::InvalidElementId)?
            .default_action = Some(Box::new(action));
        Ok(())
    }

    /// Set the protected process-accelerators hook. The hook runs before the
    /// public event during orchestration.
    pub fn set_process_accelerators_hook<F>(&mut self, id: ElementId, hook: F) -> Result<()>
    where
        F: FnMut(&mut ProcessAcceleratorsArgs) + 'static,
    {
        self.elements
            .get_mut(id)
            .ok_or(AccelError::InvalidElementId)?
            .process_hook = Some(Box::new(hook));
        Ok(())
    }

    /// Set the public process-accelerators event callback. It runs after the
    /// hook and observes whatever flags the hook set.
    pub fn on_process_accelerators<F>(&mut self, id: ElementId, callback: F) -> Result<()>
    where
        F: FnMut(&mut ProcessAcceleratorsArgs) + 'static,
    {
        self.elements
            .get_mut(id)
            .ok_or(AccelError::InvalidElementId)?
            .process_event = Some(Box::new(callback));
        Ok(())
    }

    pub(crate) fn run_default_action(&mut self, id: ElementId) -> bool {
        match self
            .elements
            .get_mut(id)
            .and_then(|data| data.default_action.as_mut())
        {
            Some(action) => action(),
            None => false,
        }
    }

    pub(crate) fn run_process_hook(&mut self, id: ElementId, args: &mut ProcessAcceleratorsArgs) {
        if let Some(hook) = self
            .elements
            .get_mut(id)
            .and_then(|data| data.process_hook.as_mut())
        {
            hook(args);
        }
    }

    pub(crate) fn run_process_event(&mut self, id: ElementId, args: &mut ProcessAcceleratorsArgs) {
        if let Some(callback) = self
            .elements
            .get_mut(id)
            .and_then(|data| data.process_event.as_mut())
        {
            callback(args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Key;

    #[test]
    fn test_insert_and_parent_links() {
        let mut tree = ElementTree::new();
        let root = tree.insert_widget("root", None);
        let child = tree.insert_widget("child", Some(root));

        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.children(root), &[child]);
        assert!(tree.is_widget(child));
        assert_eq!(tree.name(child), Some("child"));
    }

    #[test]
    fn test_insert_with_dangling_parent_becomes_root() {
        let mut tree = ElementTree::new();
        let doomed = tree.insert_widget("doomed", None);
        tree.destroy(doomed).unwrap();

        let orphan = tree.insert_widget("orphan", Some(doomed));
        assert!(tree.contains(orphan));
        assert_eq!(tree.parent(orphan), None);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut tree = ElementTree::new();
        let a = tree.insert_widget("a", None);
        let b = tree.insert_widget("b", Some(a));
        let c = tree.insert_widget("c", Some(b));

        assert!(matches!(
            tree.set_parent(a, Some(c)),
            Err(AccelError::CircularParentage)
        ));
        assert!(matches!(
            tree.set_parent(a, Some(a)),
            Err(AccelError::CircularParentage)
        ));
        // Reparenting downward within the tree is fine.
        tree.set_parent(c, Some(a)).unwrap();
        assert_eq!(tree.parent(c), Some(a));
        assert_eq!(tree.children(b), &[] as &[ElementId]);
    }

    #[test]
    fn test_destroy_cascades_and_removes_collections() {
        let mut tree = ElementTree::new();
        let root = tree.insert_widget("root", None);
        let child = tree.insert_widget("child", Some(root));
        let grandchild = tree.insert_widget("grandchild", Some(child));

        let cid = tree
            .set_accelerators(grandchild, vec![Accelerator::ctrl(Key::S)])
            .unwrap();
        assert!(tree.collection_alive(cid));

        tree.destroy(child).unwrap();
        assert!(tree.contains(root));
        assert!(!tree.contains(child));
        assert!(!tree.contains(grandchild));
        assert!(!tree.collection_alive(cid));
        assert_eq!(tree.children(root), &[] as &[ElementId]);
        // The live entry is deliberately left behind for lazy pruning.
        assert_eq!(tree.live_count(), 1);
    }

    #[test]
    fn test_widget_state_errors() {
        let mut tree = ElementTree::new();
        let node = tree.insert_node("node", None);
        assert!(matches!(
            tree.set_visible(node, false),
            Err(AccelError::NotAWidget)
        ));

        let widget = tree.insert_widget("widget", None);
        tree.destroy(widget).unwrap();
        assert!(matches!(
            tree.set_enabled(widget, false),
            Err(AccelError::InvalidElementId)
        ));
    }

    #[test]
    fn test_visibility_walk_skips_plain_nodes() {
        let mut tree = ElementTree::new();
        let root = tree.insert_widget("root", None);
        let node = tree.insert_node("node", Some(root));
        let leaf = tree.insert_widget("leaf", Some(node));

        assert!(tree.is_visible(node));
        assert!(tree.ancestors_visible(leaf));

        tree.set_visible(root, false).unwrap();
        assert!(!tree.ancestors_visible(leaf));
        // The leaf's own visibility is unaffected by its ancestors.
        assert!(tree.is_visible(leaf));
    }

    #[test]
    fn test_active_ancestor_or_self() {
        let mut tree = ElementTree::new();
        let root = tree.insert_widget("root", None);
        let node = tree.insert_node("node", Some(root));
        let leaf = tree.insert_widget("leaf", Some(node));

        assert_eq!(tree.active_ancestor_or_self(leaf), Some(leaf));
        tree.set_active(leaf, false).unwrap();
        // Plain nodes are never active; the walk continues to the root.
        assert_eq!(tree.active_ancestor_or_self(leaf), Some(root));
        tree.set_active(root, false).unwrap();
        assert_eq!(tree.active_ancestor_or_self(leaf), None);
    }

    #[test]
    fn test_set_accelerators_registers_when_active() {
        let mut tree = ElementTree::new();
        let widget = tree.insert_widget("widget", None);
        let cid = tree
            .set_accelerators(widget, vec![Accelerator::ctrl(Key::S)])
            .unwrap();
        assert_eq!(tree.live_count(), 1);
        assert!(tree.live_registry().contains(cid));

        // Replacing swaps the registration to the new collection.
        let cid2 = tree
            .set_accelerators(widget, vec![Accelerator::ctrl(Key::O)])
            .unwrap();
        assert_ne!(cid, cid2);
        assert!(!tree.collection_alive(cid));
        assert_eq!(tree.live_count(), 1);
        assert!(tree.live_registry().contains(cid2));
    }

    #[test]
    fn test_set_accelerators_on_inactive_widget_defers_registration() {
        let mut tree = ElementTree::new();
        let widget = tree.insert_widget("widget", None);
        tree.set_active(widget, false).unwrap();

        let cid = tree
            .set_accelerators(widget, vec![Accelerator::ctrl(Key::S)])
            .unwrap();
        assert_eq!(tree.live_count(), 0);

        tree.set_active(widget, true).unwrap();
        assert_eq!(tree.live_count(), 1);
        assert!(tree.live_registry().contains(cid));

        tree.set_active(widget, false).unwrap();
        assert_eq!(tree.live_count(), 0);
    }

    #[test]
    fn test_set_active_is_transition_aware() {
        let mut tree = ElementTree::new();
        let widget = tree.insert_widget("widget", None);
        tree.set_accelerators(widget, vec![Accelerator::ctrl(Key::S)])
            .unwrap();
        assert_eq!(tree.live_count(), 1);

        // Re-activating an already-active widget must not bump the refcount.
        tree.set_active(widget, true).unwrap();
        assert_eq!(tree.live_count(), 1);
        tree.set_active(widget, false).unwrap();
        assert_eq!(tree.live_count(), 0);
    }
}
