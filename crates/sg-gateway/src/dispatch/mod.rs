//! Execution dispatch
//!
//! Sequences the `connecting` → `output`/`error` → `complete` events for
//! one request and writes its audit record.

mod dispatcher;

pub use dispatcher::Dispatcher;
