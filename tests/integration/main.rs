//! Integration tests
//!
//! Everything except `smoke` runs against a private in-memory SQLite
//! database; `smoke` needs a running server and is ignored by default.

mod api;
