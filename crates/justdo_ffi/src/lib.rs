//! FFI crate wiring for the Flutter host app.

pub mod api;
