//! Remote procedure transport for the acronym lookup service.
//!
//! # Responsibility
//! - Expose `wtf_is` and `list` as JSON-RPC 2.0 calls on `POST /RPC2`.
//! - Serve the static procedure catalog and a JSON record listing.
//!
//! # Invariants
//! - Lookup failures never surface as transport errors; only malformed
//!   calls (unknown method, bad params) produce JSON-RPC error objects.
//! - Storage work runs on tokio's blocking pool, never on a reactor thread.

pub mod routes;
pub mod rpc;
pub mod server;

pub use routes::build_router;
pub use rpc::{dispatch, RpcError, RpcErrorObject, RpcRequest, RpcResponse};
pub use server::{serve, serve_with_shutdown};
