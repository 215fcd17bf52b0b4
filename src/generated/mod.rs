//! Vendored protobuf/gRPC bindings for the inference service.
//!
//! The contents of [`inference`] are the tonic-build output (clients only)
//! for `proto/inference_service.proto`, committed to the repository so that
//! building the crate does not require `protoc`. Regenerate and re-commit
//! whenever the proto file changes.

pub mod inference;
