//! Namespace inspection at a single snapshot
//!
//! - [`Namespace::stat`]: type of one path
//! - [`Namespace::list_children`]: one page of a directory listing
//! - [`Namespace::children`]: lazy page sequence over a whole directory
//! - [`Namespace::walk`]: lazy pre-order enumeration of a subtree
//!
//! None of these compute differences; the diff engine uses them to
//! re-derive entry types and to expand created or deleted subtrees.

pub mod inspector;
pub mod walk;

pub use inspector::{ChildPage, ChildPages, Namespace, DEFAULT_PAGE_SIZE};
pub use walk::SubtreeWalk;
