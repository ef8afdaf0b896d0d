//! Deterministic keyboard accelerator resolution over a live widget tree.
//!
//! `acceltree` maps key presses (key + modifier state) to accelerator
//! invocations on elements of a UI tree. It provides:
//!
//! - an [`ElementTree`] arena of widgets and plain nodes with parent links
//!   and visible/enabled/active state
//! - [`Accelerator`] collections attached to elements, with optional scope
//!   restrictions and invoked sinks
//! - a ref-counted live registry of collections eligible for global scanning,
//!   pruned lazily as collections die
//! - the [`AcceleratorDispatcher`] resolution pipeline: local collection,
//!   owned/global registry scan, then the element's process-accelerators
//!   hook and event
//!
//! Resolution is synchronous and single-threaded; all state lives in the
//! `ElementTree` that callers thread through the entry points. Every failure
//! mode (stale handles, failing sinks, hidden or disabled widgets) degrades
//! to "not handled".
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use acceltree::{Accelerator, AcceleratorDispatcher, ElementTree, Key, KeyboardModifiers};
//!
//! let mut tree = ElementTree::new();
//! let root = tree.insert_widget("window", None);
//! let editor = tree.insert_widget("editor", Some(root));
//!
//! let saved = Rc::new(Cell::new(false));
//! let sink = Rc::clone(&saved);
//! tree.set_accelerators(
//!     editor,
//!     vec![Accelerator::ctrl(Key::S).on_invoked(move |args| {
//!         sink.set(true);
//!         args.set_handled(true);
//!         Ok(())
//!     })],
//! )?;
//!
//! let outcome = AcceleratorDispatcher::process_accelerators(
//!     &mut tree,
//!     Key::S,
//!     KeyboardModifiers::CTRL,
//!     editor,
//!     Some(editor),
//!     false,
//! );
//! assert!(outcome.handled);
//! assert!(saved.get());
//! # Ok::<(), acceltree::AccelError>(())
//! ```

pub mod accelerator;
pub mod error;
pub mod keys;
mod registry;
pub mod resolve;
pub mod tree;

pub use accelerator::{
    Accelerator, AcceleratorCollection, AcceleratorInvokedArgs, CollectionId, DefaultAction,
    InvokedHandler, ProcessAcceleratorsArgs, ProcessHandler,
};
pub use error::{AccelError, Result};
pub use keys::{
    Key, KeyboardModifiers, is_accelerator_key, modifiers_from_raw, modifiers_to_raw,
    text_input_has_priority,
};
pub use resolve::{AcceleratorDispatcher, AcceleratorOutcome, ScanPolicy};
pub use tree::{ElementId, ElementTree, WidgetState};
