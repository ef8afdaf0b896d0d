//! Accelerator resolution pipeline.
//!
//! Resolution runs in phases over a `&mut ElementTree`:
//!
//! 1. **Local**: the event target element's own collection, declaration
//!    order.
//! 2. **Owned scan**: every live collection whose effective parent is the
//!    target element, registration order.
//! 3. **Hook, then event**: the target element's process-accelerators hook
//!    runs first, then the public event; the event observes the flags the
//!    hook set.
//!
//! The pipeline short-circuits after the first phase that handles the press.
//! Every failure mode degrades to "not handled"; nothing here panics or
//! surfaces an error to the key-event pipeline.

use smallvec::SmallVec;

use crate::accelerator::{
    Accelerator, AcceleratorInvokedArgs, CollectionId, ProcessAcceleratorsArgs,
};
use crate::keys::{Key, KeyboardModifiers};
use crate::registry::DEAD_SCRATCH_CAPACITY;
use crate::tree::{ElementId, ElementTree};

/// Which live collections a registry scan considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Consider only accelerators whose scope owner is the given element.
    OwnedBy(ElementId),
    /// Consider only accelerators with no scope owner.
    Global,
}

impl ScanPolicy {
    /// Check whether an accelerator's scope owner passes this policy.
    pub fn admits(self, scope_owner: Option<ElementId>) -> bool {
        match self {
            Self::OwnedBy(owner) => scope_owner == Some(owner),
            Self::Global => scope_owner.is_none(),
        }
    }
}

/// Result of a full resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceleratorOutcome {
    /// Whether any phase handled the key press.
    pub handled: bool,
    /// Whether a hook/event callback asked that handling not block text
    /// input delivery.
    pub handled_should_not_impede_text_input: bool,
}

/// Stateless dispatcher over an [`ElementTree`].
///
/// All functions are associated functions taking the tree explicitly, so the
/// borrow flow stays visible at every call site.
pub struct AcceleratorDispatcher;

impl AcceleratorDispatcher {
    // =========================================================================
    // Public entry points
    // =========================================================================

    /// Run the full resolution pipeline for a key press targeted at
    /// `element`.
    ///
    /// # Arguments
    ///
    /// * `element` - The event target (typically the focused widget or one
    ///   of its ancestors during bubbling).
    /// * `focused` - The currently focused element, used for scope checks
    ///   during explicit invocation.
    /// * `from_explicit_invoke` - Whether this pass was requested
    ///   programmatically rather than by a key event.
    pub fn process_accelerators(
        tree: &mut ElementTree,
        key: Key,
        modifiers: KeyboardModifiers,
        element: ElementId,
        focused: Option<ElementId>,
        from_explicit_invoke: bool,
    ) -> AcceleratorOutcome {
        let mut handled =
            Self::process_local(tree, key, modifiers, element, focused, from_explicit_invoke);

        if !handled {
            handled = Self::scan_live(
                tree,
                key,
                modifiers,
                ScanPolicy::OwnedBy(element),
                focused,
                from_explicit_invoke,
            );
        }

        if !handled && tree.is_widget(element) {
            let mut args = ProcessAcceleratorsArgs::new(key, modifiers);
            tree.run_process_hook(element, &mut args);
            tree.run_process_event(element, &mut args);
            return AcceleratorOutcome {
                handled: args.is_handled(),
                handled_should_not_impede_text_input: args.should_not_impede_text_input(),
            };
        }

        AcceleratorOutcome {
            handled,
            handled_should_not_impede_text_input: false,
        }
    }

    /// Resolve against the globally scoped live collections only.
    ///
    /// Used for key presses that reached the end of the focus chain without
    /// being handled.
    pub fn process_global_accelerators(
        tree: &mut ElementTree,
        key: Key,
        modifiers: KeyboardModifiers,
    ) -> bool {
        Self::scan_live(tree, key, modifiers, ScanPolicy::Global, None, false)
    }

    /// Programmatically invoke the pipeline for `element`, as if the key
    /// press had been delivered to it.
    ///
    /// Unlike the key-event path, accelerators scoped outside the focused
    /// element's subtree are skipped.
    pub fn try_invoke_for_element(
        tree: &mut ElementTree,
        key: Key,
        modifiers: KeyboardModifiers,
        element: ElementId,
        focused: Option<ElementId>,
    ) -> AcceleratorOutcome {
        Self::process_accelerators(tree, key, modifiers, element, focused, true)
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    /// Check whether an accelerator is restricted to a subtree that does not
    /// contain the focused element.
    ///
    /// Fail-open: no focused element, or no scope owner, means "not locally
    /// scoped". A stale scope-owner id never contains anything, so the
    /// accelerator degrades to locally scoped.
    pub(crate) fn is_locally_scoped(
        tree: &ElementTree,
        focused: Option<ElementId>,
        accel: &Accelerator,
    ) -> bool {
        let Some(focused) = focused else {
            return false;
        };
        let Some(owner) = accel.scope_owner else {
            return false;
        };
        if !tree.contains(owner) {
            tracing::trace!(
                target: "acceltree::resolve",
                scope_owner = ?owner,
                "accelerator scope owner no longer exists"
            );
            return true;
        }
        !tree.is_ancestor_or_self(owner, focused)
    }

    /// Check whether an accelerator should fire for this key press, given
    /// the effective parent element it would be attributed to.
    ///
    /// With no parent the visibility conditions pass (fail-open).
    pub(crate) fn should_raise(
        tree: &ElementTree,
        key: Key,
        modifiers: KeyboardModifiers,
        accel: &Accelerator,
        parent: Option<ElementId>,
    ) -> bool {
        if !accel.enabled || !accel.matches(key, modifiers) {
            return false;
        }
        match parent {
            Some(parent_id) => tree.is_visible(parent_id) && tree.ancestors_visible(parent_id),
            None => true,
        }
    }

    // =========================================================================
    // Resolution phases
    // =========================================================================

    /// Resolve against `element`'s own accelerator collection.
    pub(crate) fn process_local(
        tree: &mut ElementTree,
        key: Key,
        modifiers: KeyboardModifiers,
        element: ElementId,
        focused: Option<ElementId>,
        from_explicit_invoke: bool,
    ) -> bool {
        if tree.is_widget_disabled(element) {
            return false;
        }
        let Some(cid) = tree.accelerators_of(element) else {
            return false;
        };
        let count = tree.collection(cid).map(|c| c.len()).unwrap_or(0);

        for index in 0..count {
            let raise = {
                let Some(accel) = tree.collection(cid).and_then(|c| c.get(index)) else {
                    continue;
                };
                Self::should_raise(tree, key, modifiers, accel, Some(element))
                    && !(from_explicit_invoke && Self::is_locally_scoped(tree, focused, accel))
            };
            if raise {
                return Self::invoke(tree, cid, index, Some(element));
            }
        }
        false
    }

    /// Scan the live registry for the first matching accelerator admitted by
    /// `policy`.
    ///
    /// Registration order across collections, declaration order within one;
    /// the first match wins and ends the scan. Stale entries found along the
    /// way are collected into a scratch buffer and pruned after the pass,
    /// match or no match.
    pub(crate) fn scan_live(
        tree: &mut ElementTree,
        key: Key,
        modifiers: KeyboardModifiers,
        policy: ScanPolicy,
        focused: Option<ElementId>,
        from_explicit_invoke: bool,
    ) -> bool {
        let snapshot = tree.live_registry().snapshot();
        let mut dead: SmallVec<[CollectionId; DEAD_SCRATCH_CAPACITY]> = SmallVec::new();
        let mut handled = false;

        'collections: for &cid in &snapshot {
            let Some(collection) = tree.collection(cid) else {
                dead.push(cid);
                continue;
            };
            let owner = collection.owner();
            let count = collection.len();

            // The element the invocation is attributed to: the nearest
            // active widget at or above the collection's owner.
            let effective_parent = tree.active_ancestor_or_self(owner);

            for index in 0..count {
                let fire = {
                    let Some(accel) = tree.collection(cid).and_then(|c| c.get(index)) else {
                        continue;
                    };
                    policy.admits(accel.scope_owner)
                        && Self::should_raise(tree, key, modifiers, accel, effective_parent)
                        && !tree.is_widget_disabled(owner)
                        && !(from_explicit_invoke
                            && Self::is_locally_scoped(tree, focused, accel))
                };
                if fire {
                    handled = Self::invoke(tree, cid, index, effective_parent);
                    break 'collections;
                }
            }
        }

        if !dead.is_empty() {
            tree.prune_live(&dead);
        }
        handled
    }

    /// Fire the accelerator at `index` in `collection` and report whether
    /// the invocation was handled.
    ///
    /// An error from the invoked sink is swallowed and treated as unhandled.
    /// When the sink leaves the invocation unhandled, the parent element's
    /// default action runs as a fallback.
    pub(crate) fn invoke(
        tree: &mut ElementTree,
        collection: CollectionId,
        index: usize,
        parent: Option<ElementId>,
    ) -> bool {
        let Some((key, modifiers)) = tree
            .collection(collection)
            .and_then(|c| c.get(index))
            .map(|accel| (accel.key, accel.modifiers))
        else {
            return false;
        };

        let mut args = AcceleratorInvokedArgs::new(parent, key, modifiers);
        if let Some(handler) = tree
            .collection_mut(collection)
            .and_then(|c| c.get_mut(index))
            .and_then(|accel| accel.on_invoked.as_mut())
        {
            if let Err(err) = handler(&mut args) {
                tracing::debug!(
                    target: "acceltree::resolve",
                    error = %err,
                    "accelerator invoked handler failed"
                );
                args.set_handled(false);
            }
        }

        let mut handled = args.is_handled();
        if !handled {
            if let Some(parent_id) = parent {
                handled = tree.run_default_action(parent_id);
            }
        }
        handled
    }
}
