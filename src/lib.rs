//! Throughput benchmark harness for a document-indexing gRPC service.
//!
//! The harness drives the `search.v1.Search` service with a stream of
//! synthetic document updates against a fixed logical index. A [`trial::Trial`]
//! owns the connection for one measurement run: starting it resets the remote
//! index, each call to [`trial::Trial::run_one_iteration`] submits exactly one
//! update and blocks for the response, and ending it clears the index again
//! before closing the transport.

pub mod field;
pub mod request;
pub mod sequence;
pub mod trial;

/// Generated protobuf types from the `search.v1` package.
pub mod pb {
    #![allow(unreachable_pub)]
    #![allow(missing_docs)]
    include!("generated/search.v1.rs");
}
