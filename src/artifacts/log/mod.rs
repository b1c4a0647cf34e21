//! Commit history traversal
//!
//! - `rev_list`: first-parent history for `log`, and the breadth-first
//!   ancestor walk the merge machinery is built on
//!
//! Traversals take a parent loader instead of a database so the graph
//! algorithms can run over an in-memory graph in tests.

pub mod rev_list;
