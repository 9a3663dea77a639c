//! Directory enumeration.
//!
//! [`enumerate`] walks a directory (optionally recursively) through a
//! [`NativeFileSystem`](crate::native::NativeFileSystem), filters entries by
//! [`SearchPattern`] and [`EnumerationOptions`], and yields each accepted
//! [`EntryRecord`] through a [`Projection`]:
//!
//! - [`AsRecord`] yields the record itself
//! - [`AsPath`] yields the full path string
//! - [`AsNode`] yields a [`Node`] that can start further operations
//! - any `Fn(EntryRecord) -> T` closure yields `T`
//!
//! The walk is lazy and depth-first. Subdirectories are visited after the
//! directory that contains them is exhausted, in the order the native layer
//! reported them.

mod engine;
mod entry;
mod options;
mod pattern;
mod projection;

pub use engine::{enumerate, enumerate_with, Enumerator};
pub use entry::{filetime_to_utc, EntryRecord, FileAttributes, ReparseTag};
pub use options::EnumerationOptions;
pub use pattern::SearchPattern;
pub use projection::{AsNode, AsPath, AsRecord, Node, NodeKind, Projection};
