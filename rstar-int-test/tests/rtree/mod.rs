//! R*-tree integration test module.
//!
//! These tests drive the public API through the shared handle and verify
//! structural integrity after every test.

mod concurrency_test;
mod insert_test;
mod remove_test;
mod search_test;
