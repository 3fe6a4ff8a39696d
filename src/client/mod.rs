//! Client-side sync layer: the Rust counterpart of the browser frontend's
//! fetch-and-fallback code. Reads prefer the server and overwrite the local
//! cache wholesale; writes that cannot reach the server are kept locally
//! under a `local-` namespaced id and never assumed to exist server-side.

pub mod cache;
pub mod chat;
pub mod sync;
