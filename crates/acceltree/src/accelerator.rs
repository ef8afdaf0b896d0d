//! Accelerator definitions and notification argument types.
//!
//! An [`Accelerator`] binds a key/modifier combination to an optional invoked
//! sink. Accelerators live in an [`AcceleratorCollection`] attached to one
//! owning element; collections are stored strongly by the tree and referenced
//! elsewhere only through their generation-checked [`CollectionId`].

use slotmap::new_key_type;

use crate::error::Result;
use crate::keys::{Key, KeyboardModifiers};
use crate::tree::ElementId;

new_key_type! {
    /// Handle to an accelerator collection stored in the element tree.
    ///
    /// A `CollectionId` whose slot no longer resolves identifies a collection
    /// that has been destroyed; holders of stale ids observe the failure
    /// instead of keeping the collection alive.
    pub struct CollectionId;
}

/// Callback invoked when an accelerator fires.
///
/// A returned error is caught by the dispatcher and degrades the invocation
/// to "not handled".
pub type InvokedHandler = Box<dyn FnMut(&mut AcceleratorInvokedArgs) -> Result<()>>;

/// Callback for the process-accelerators hook and event on an element.
pub type ProcessHandler = Box<dyn FnMut(&mut ProcessAcceleratorsArgs)>;

/// Fallback action run on the owning element when an accelerator fires but
/// its invoked sink leaves the event unhandled. Returns whether it handled
/// the invocation.
pub type DefaultAction = Box<dyn FnMut() -> bool>;

// =============================================================================
// Accelerator
// =============================================================================

/// A single keyboard accelerator.
pub struct Accelerator {
    /// The key that triggers this accelerator.
    pub key: Key,
    /// The modifiers that must be held exactly.
    pub modifiers: KeyboardModifiers,
    /// Whether this accelerator currently participates in resolution.
    pub enabled: bool,
    /// Scope restriction: `Some(owner)` limits matching to key events whose
    /// focused element lies in `owner`'s subtree; `None` means global scope.
    pub scope_owner: Option<ElementId>,
    pub(crate) on_invoked: Option<InvokedHandler>,
}

impl Accelerator {
    /// Create an accelerator for a key with the given modifiers.
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            key,
            modifiers,
            enabled: true,
            scope_owner: None,
            on_invoked: None,
        }
    }

    /// Create a Ctrl+key accelerator.
    pub fn ctrl(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::CTRL)
    }

    /// Create an Alt+key accelerator.
    pub fn alt(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::ALT)
    }

    /// Create a Ctrl+Shift+key accelerator.
    pub fn ctrl_shift(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::CTRL_SHIFT)
    }

    /// Restrict this accelerator to key events focused inside `owner`'s
    /// subtree.
    pub fn with_scope_owner(mut self, owner: ElementId) -> Self {
        self.scope_owner = Some(owner);
        self
    }

    /// Create this accelerator in the disabled state.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the invoked sink.
    pub fn on_invoked<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut AcceleratorInvokedArgs) -> Result<()> + 'static,
    {
        self.on_invoked = Some(Box::new(handler));
        self
    }

    /// Check whether this accelerator matches the pressed key and the exact
    /// modifier state.
    pub fn matches(&self, key: Key, modifiers: KeyboardModifiers) -> bool {
        self.key == key && self.modifiers == modifiers
    }
}

impl std::fmt::Debug for Accelerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accelerator")
            .field("key", &self.key)
            .field("modifiers", &self.modifiers)
            .field("enabled", &self.enabled)
            .field("scope_owner", &self.scope_owner)
            .field("on_invoked", &self.on_invoked.as_ref().map(|_| "..."))
            .finish()
    }
}

// =============================================================================
// AcceleratorCollection
// =============================================================================

/// An ordered collection of accelerators attached to one element.
///
/// Declaration order is resolution order within the collection.
#[derive(Debug)]
pub struct AcceleratorCollection {
    owner: ElementId,
    accelerators: Vec<Accelerator>,
}

impl AcceleratorCollection {
    /// Create an empty collection owned by `owner`.
    pub fn new(owner: ElementId) -> Self {
        Self {
            owner,
            accelerators: Vec::new(),
        }
    }

    /// The element this collection is attached to.
    pub fn owner(&self) -> ElementId {
        self.owner
    }

    /// Append an accelerator to the end of the collection.
    pub fn push(&mut self, accelerator: Accelerator) {
        self.accelerators.push(accelerator);
    }

    /// Number of accelerators in the collection.
    pub fn len(&self) -> usize {
        self.accelerators.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.accelerators.is_empty()
    }

    /// Get the accelerator at `index`.
    pub fn get(&self, index: usize) -> Option<&Accelerator> {
        self.accelerators.get(index)
    }

    /// Get a mutable reference to the accelerator at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Accelerator> {
        self.accelerators.get_mut(index)
    }

    /// Iterate over the accelerators in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Accelerator> {
        self.accelerators.iter()
    }
}

// =============================================================================
// Notification argument types
// =============================================================================

/// Arguments passed to an accelerator's invoked sink.
#[derive(Debug, Clone, Copy)]
pub struct AcceleratorInvokedArgs {
    /// The element the invocation is attributed to, when one was resolved.
    pub element: Option<ElementId>,
    /// The pressed key.
    pub key: Key,
    /// The modifier state at the time of the press.
    pub modifiers: KeyboardModifiers,
    handled: bool,
}

impl AcceleratorInvokedArgs {
    pub(crate) fn new(element: Option<ElementId>, key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            element,
            key,
            modifiers,
            handled: false,
        }
    }

    /// Whether the sink marked the invocation as handled.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Mark the invocation as handled (or explicitly unhandled).
    pub fn set_handled(&mut self, handled: bool) {
        self.handled = handled;
    }
}

/// Arguments passed to an element's process-accelerators hook and event.
///
/// The hook runs first, then the event; the event observes and may override
/// whatever flags the hook set.
#[derive(Debug, Clone, Copy)]
pub struct ProcessAcceleratorsArgs {
    /// The pressed key.
    pub key: Key,
    /// The modifier state at the time of the press.
    pub modifiers: KeyboardModifiers,
    handled: bool,
    handled_should_not_impede_text_input: bool,
}

impl ProcessAcceleratorsArgs {
    pub(crate) fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            key,
            modifiers,
            handled: false,
            handled_should_not_impede_text_input: false,
        }
    }

    /// Whether a callback marked the key press as handled.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Mark the key press as handled (or explicitly unhandled).
    pub fn set_handled(&mut self, handled: bool) {
        self.handled = handled;
    }

    /// Whether a callback asked that handling not block text input.
    pub fn should_not_impede_text_input(&self) -> bool {
        self.handled_should_not_impede_text_input
    }

    /// Request that the handled state not block text input delivery.
    pub fn set_should_not_impede_text_input(&mut self, value: bool) {
        self.handled_should_not_impede_text_input = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let accel = Accelerator::ctrl(Key::S);
        assert_eq!(accel.key, Key::S);
        assert_eq!(accel.modifiers, KeyboardModifiers::CTRL);
        assert!(accel.enabled);
        assert!(accel.scope_owner.is_none());
        assert!(accel.on_invoked.is_none());

        let accel = Accelerator::alt(Key::F4).disabled();
        assert!(!accel.enabled);

        let accel = Accelerator::ctrl_shift(Key::Z);
        assert_eq!(accel.modifiers, KeyboardModifiers::CTRL_SHIFT);
    }

    #[test]
    fn test_matches_requires_exact_modifiers() {
        let accel = Accelerator::ctrl(Key::S);
        assert!(accel.matches(Key::S, KeyboardModifiers::CTRL));
        assert!(!accel.matches(Key::S, KeyboardModifiers::CTRL_SHIFT));
        assert!(!accel.matches(Key::S, KeyboardModifiers::NONE));
        assert!(!accel.matches(Key::A, KeyboardModifiers::CTRL));
    }

    #[test]
    fn test_matches_ignores_enabled_and_scope() {
        // `matches` is the pure predicate; enabled/scope are checked by the
        // resolution pipeline, not here.
        let accel = Accelerator::ctrl(Key::S).disabled();
        assert!(accel.matches(Key::S, KeyboardModifiers::CTRL));
    }

    #[test]
    fn test_debug_skips_handler_body() {
        let accel = Accelerator::ctrl(Key::S).on_invoked(|args| {
            args.set_handled(true);
            Ok(())
        });
        let repr = format!("{accel:?}");
        assert!(repr.contains("Accelerator"));
        assert!(repr.contains("on_invoked"));
    }

    #[test]
    fn test_process_args_flags_default_false() {
        let args = ProcessAcceleratorsArgs::new(Key::A, KeyboardModifiers::CTRL);
        assert!(!args.is_handled());
        assert!(!args.should_not_impede_text_input());
    }
}
