pub mod handlers;
pub mod routes;
pub mod rpc;
pub mod state;
