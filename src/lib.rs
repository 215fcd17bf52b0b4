// Copyright 2025-2026, the inference-client authors. All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions
// are met:
//  * Redistributions of source code must retain the above copyright
//    notice, this list of conditions and the following disclaimer.
//  * Redistributions in binary form must reproduce the above copyright
//    notice, this list of conditions and the following disclaimer in the
//    documentation and/or other materials provided with the distribution.
//  * Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived
//    from this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS ``AS IS'' AND ANY
// EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR
// PURPOSE ARE DISCLAIMED.  IN NO EVENT SHALL THE COPYRIGHT OWNER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY
// OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
// (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Blocking Rust client library for tensor-based inference servers.
//!
//! This crate provides a type-safe, synchronous API for communicating with
//! an inference server over gRPC: health and readiness probes, model
//! lifecycle management (list, load, unload, metadata), and tensor
//! inference. Every call blocks until a reply arrives or its wall-clock
//! deadline expires, so the library slots into ordinary non-async
//! applications without any executor plumbing on the caller's side.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use inference_client::client::{GrpcClient, InferenceClient};
//! use inference_client::infer::InferRequest;
//!
//! # fn example() -> inference_client::error::Result<()> {
//! // Bind a client to the server endpoint. No traffic happens here;
//! // the first call below establishes the connection.
//! let client = GrpcClient::connect("http://localhost:8001")?;
//!
//! // Check server health.
//! assert!(client.is_server_live()?);
//! assert!(client.is_server_ready()?);
//!
//! // Build and run an inference request.
//! let request = InferRequest::new("my_model")
//!     .model_version("1")
//!     .typed_input("input0", vec![1, 16], &[0.0_f32; 16])?;
//!
//! let response = client.infer(request)?;
//! let output = response.output(0).unwrap();
//! println!("{}: {:?}", output.name(), output.to_vec::<f32>());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] -- The blocking [`GrpcClient`](client::GrpcClient), the
//!   [`InferenceClient`](client::InferenceClient) trait, and connection
//!   options.
//! - [`tensor`] -- [`Tensor`](tensor::Tensor) values and the
//!   [`DataType`](tensor::DataType) enumeration.
//! - [`infer`] -- Request/response envelopes and metadata snapshots.
//! - [`error`] -- Error types and the [`Result`](error::Result) alias.
//! - [`generated`] -- Raw protobuf/gRPC generated types for advanced usage.

pub mod client;
mod convert;
pub mod error;
pub mod generated;
pub mod infer;
pub mod tensor;

/// Re-export of the main client types for convenience.
pub use client::{create_client, GrpcClient, InferenceClient};
