//! Loading dialog graphs from `.dialog.ron` files.

pub mod loader;
pub(crate) mod types;
