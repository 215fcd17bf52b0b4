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

//! The blocking gRPC client implementation.
//!
//! [`GrpcClient`] wraps the vendored gRPC stub and exposes synchronous
//! methods for health checks, metadata queries, model lifecycle management,
//! and inference. Each call attaches a wall-clock deadline and blocks the
//! calling thread until completion, timeout, or transport failure.
//!
//! [`InferenceClient`] is the narrow trait describing the same operation
//! set, so tests and downstream code can substitute a double without a real
//! server.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn example() -> inference_client::error::Result<()> {
//! use inference_client::client::{GrpcClient, InferenceClient};
//! use inference_client::infer::InferRequest;
//!
//! let client = GrpcClient::connect("http://localhost:8001")?;
//!
//! let live = client.is_server_live()?;
//! assert!(live);
//!
//! let request = InferRequest::new("my_model")
//!     .typed_input("input0", vec![1, 16], &[0.0_f32; 16])?;
//! let response = client.infer(request)?;
//! for output in response.outputs() {
//!     println!("{}: {:?}", output.name(), output.shape());
//! }
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use tonic::transport::{Channel, Endpoint};
use tracing::{debug, warn};

use crate::convert;
use crate::error::{Error, Result};
use crate::generated::inference::{
    self as pb, grpc_inference_service_client::GrpcInferenceServiceClient,
};
use crate::infer::{InferRequest, InferResponse, ModelMetadata, ServerMetadata, TensorMetadata};

/// Default maximum gRPC message size (128 MiB).
const DEFAULT_MAX_MESSAGE_SIZE: usize = 128 * 1024 * 1024;

/// Default deadline for lifecycle and metadata queries.
const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Default deadline for inference calls when none is supplied.
const DEFAULT_INFER_TIMEOUT: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// ClientOptions
// ---------------------------------------------------------------------------

/// Options for configuring a [`GrpcClient`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use inference_client::client::ClientOptions;
///
/// let options = ClientOptions::default()
///     .connect_timeout(Duration::from_secs(10))
///     .rpc_timeout(Duration::from_secs(2))
///     .infer_timeout(Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    connect_timeout: Option<Duration>,
    rpc_timeout: Duration,
    infer_timeout: Duration,
    max_message_size: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(5)),
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            infer_timeout: DEFAULT_INFER_TIMEOUT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl ClientOptions {
    /// Sets the timeout for establishing the underlying connection.
    #[must_use]
    pub fn connect_timeout(self, timeout: Duration) -> Self {
        Self {
            connect_timeout: Some(timeout),
            ..self
        }
    }

    /// Sets the deadline applied to lifecycle and metadata queries.
    ///
    /// Default: 5 seconds.
    #[must_use]
    pub fn rpc_timeout(self, timeout: Duration) -> Self {
        Self {
            rpc_timeout: timeout,
            ..self
        }
    }

    /// Sets the deadline applied to [`infer`](InferenceClient::infer) when
    /// the caller does not supply one.
    ///
    /// Default: 1 second.
    #[must_use]
    pub fn infer_timeout(self, timeout: Duration) -> Self {
        Self {
            infer_timeout: timeout,
            ..self
        }
    }

    /// Sets the maximum gRPC message size in bytes.
    ///
    /// Default: 128 MiB.
    #[must_use]
    pub fn max_message_size(self, size: usize) -> Self {
        Self {
            max_message_size: size,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// InferenceClient trait
// ---------------------------------------------------------------------------

/// The operation set of an inference service client.
///
/// All operations are synchronous and blocking, and every call reflects the
/// service's state at call time; implementations hold no cache of model
/// state. [`GrpcClient`] is the production implementation; test doubles
/// implement this trait directly.
pub trait InferenceClient {
    /// Checks whether the server process is live.
    fn is_server_live(&self) -> Result<bool>;

    /// Checks whether the server is ready to accept inference requests.
    fn is_server_ready(&self) -> Result<bool>;

    /// Retrieves server name, version, and supported extensions.
    fn server_metadata(&self) -> Result<ServerMetadata>;

    /// Lists the models available on the server.
    fn model_list(&self) -> Result<Vec<String>>;

    /// Checks whether a specific model version is ready. Pass `""` as the
    /// version for the server's default.
    fn is_model_ready(&self, model_name: &str, model_version: &str) -> Result<bool>;

    /// Loads or reloads a model.
    fn model_load(&self, model_name: &str) -> Result<()>;

    /// Unloads a model, freeing its resources on the server.
    fn model_unload(&self, model_name: &str) -> Result<()>;

    /// Retrieves metadata for a specific model version. Pass `""` as the
    /// version for the server's default.
    fn model_metadata(&self, model_name: &str, model_version: &str) -> Result<ModelMetadata>;

    /// Performs one inference call with the configured default deadline.
    fn infer(&self, request: InferRequest) -> Result<InferResponse>;

    /// Performs one inference call with a caller-supplied deadline.
    fn infer_with_timeout(
        &self,
        request: InferRequest,
        timeout: Duration,
    ) -> Result<InferResponse>;
}

// ---------------------------------------------------------------------------
// GrpcClient
// ---------------------------------------------------------------------------

/// A blocking client for a tensor inference service over gRPC.
///
/// The client owns its transport channel and a private current-thread tokio
/// runtime that drives each call. Channel construction is lazy: no network
/// traffic happens until the first operation is invoked.
///
/// # Concurrency contract
///
/// The client adds no synchronization of its own. Calling operations on the
/// same instance from multiple threads concurrently is not supported;
/// callers needing parallel requests should serialize access or create one
/// client per thread.
#[derive(Debug)]
pub struct GrpcClient {
    stub: GrpcInferenceServiceClient<Channel>,
    runtime: tokio::runtime::Runtime,
    options: ClientOptions,
}

impl GrpcClient {
    /// Creates a client bound to the given endpoint URL (e.g.
    /// `"http://localhost:8001"`) with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the URL is invalid or the client
    /// runtime cannot be started. An unreachable server is not detected
    /// here; the first operation reports it instead.
    pub fn connect(url: &str) -> Result<Self> {
        Self::connect_with_options(url, ClientOptions::default())
    }

    /// Creates a client with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the URL is invalid or the client
    /// runtime cannot be started.
    pub fn connect_with_options(url: &str, options: ClientOptions) -> Result<Self> {
        let mut endpoint = Endpoint::from_shared(url.to_owned())
            .map_err(|e| Error::Connection(format!("invalid URL '{url}': {e}")))?;

        if let Some(timeout) = options.connect_timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Connection(format!("failed to start client runtime: {e}")))?;

        // Lazy channel: the actual connection attempt happens on first call.
        // Built inside the runtime context because tonic spawns the channel's
        // background task on the ambient executor.
        let channel = {
            let _guard = runtime.enter();
            endpoint.connect_lazy()
        };

        let stub = GrpcInferenceServiceClient::new(channel)
            .max_decoding_message_size(options.max_message_size)
            .max_encoding_message_size(options.max_message_size);

        debug!(url, "inference client created");
        Ok(Self {
            stub,
            runtime,
            options,
        })
    }
}

impl InferenceClient for GrpcClient {
    fn is_server_live(&self) -> Result<bool> {
        let mut stub = self.stub.clone();
        let response = dispatch(&self.runtime, "ServerLive", self.options.rpc_timeout, async move {
            stub.server_live(pb::ServerLiveRequest {}).await
        })?;
        Ok(response.live)
    }

    fn is_server_ready(&self) -> Result<bool> {
        let mut stub = self.stub.clone();
        let response = dispatch(&self.runtime, "ServerReady", self.options.rpc_timeout, async move {
            stub.server_ready(pb::ServerReadyRequest {}).await
        })?;
        Ok(response.ready)
    }

    fn server_metadata(&self) -> Result<ServerMetadata> {
        let mut stub = self.stub.clone();
        let response = dispatch(
            &self.runtime,
            "ServerMetadata",
            self.options.rpc_timeout,
            async move { stub.server_metadata(pb::ServerMetadataRequest {}).await },
        )?;
        Ok(server_metadata_from_wire(response))
    }

    fn model_list(&self) -> Result<Vec<String>> {
        let mut stub = self.stub.clone();
        let response = dispatch(&self.runtime, "ModelList", self.options.rpc_timeout, async move {
            stub.model_list(pb::ModelListRequest {}).await
        })?;
        Ok(response.models)
    }

    fn is_model_ready(&self, model_name: &str, model_version: &str) -> Result<bool> {
        let mut stub = self.stub.clone();
        let request = pb::ModelReadyRequest {
            name: model_name.to_owned(),
            version: model_version.to_owned(),
        };
        let response = dispatch(&self.runtime, "ModelReady", self.options.rpc_timeout, async move {
            stub.model_ready(request).await
        })?;
        Ok(response.ready)
    }

    fn model_load(&self, model_name: &str) -> Result<()> {
        let mut stub = self.stub.clone();
        let request = pb::ModelLoadRequest {
            name: model_name.to_owned(),
        };
        dispatch(&self.runtime, "ModelLoad", self.options.rpc_timeout, async move {
            stub.model_load(request).await
        })?;
        Ok(())
    }

    fn model_unload(&self, model_name: &str) -> Result<()> {
        let mut stub = self.stub.clone();
        let request = pb::ModelUnloadRequest {
            name: model_name.to_owned(),
        };
        dispatch(&self.runtime, "ModelUnload", self.options.rpc_timeout, async move {
            stub.model_unload(request).await
        })?;
        Ok(())
    }

    fn model_metadata(&self, model_name: &str, model_version: &str) -> Result<ModelMetadata> {
        let mut stub = self.stub.clone();
        let request = pb::ModelMetadataRequest {
            name: model_name.to_owned(),
            version: model_version.to_owned(),
        };
        let response = dispatch(
            &self.runtime,
            "ModelMetadata",
            self.options.rpc_timeout,
            async move { stub.model_metadata(request).await },
        )?;
        Ok(model_metadata_from_wire(response))
    }

    fn infer(&self, request: InferRequest) -> Result<InferResponse> {
        self.infer_with_timeout(request, self.options.infer_timeout)
    }

    fn infer_with_timeout(
        &self,
        request: InferRequest,
        timeout: Duration,
    ) -> Result<InferResponse> {
        let wire = convert::request_to_wire(request);
        let mut stub = self.stub.clone();
        let reply = dispatch(&self.runtime, "ModelInfer", timeout, async move {
            stub.model_infer(wire).await
        })?;
        Ok(convert::response_from_wire(reply))
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Binds an endpoint URL to a new client behind the [`InferenceClient`]
/// trait, for callers that want to inject test doubles elsewhere.
///
/// Each call produces one independent client; instances are never pooled or
/// deduplicated by address.
///
/// # Errors
///
/// Returns [`Error::Connection`] if the URL is invalid or the client
/// runtime cannot be started.
pub fn create_client(url: &str) -> Result<Box<dyn InferenceClient>> {
    create_client_with_options(url, ClientOptions::default())
}

/// [`create_client`] with custom options.
///
/// # Errors
///
/// Returns [`Error::Connection`] if the URL is invalid or the client
/// runtime cannot be started.
pub fn create_client_with_options(
    url: &str,
    options: ClientOptions,
) -> Result<Box<dyn InferenceClient>> {
    Ok(Box::new(GrpcClient::connect_with_options(url, options)?))
}

// ---------------------------------------------------------------------------
// Call dispatch and reply mapping
// ---------------------------------------------------------------------------

/// Drives one RPC future to completion on the client runtime with a
/// wall-clock deadline of `now + timeout`, then classifies the outcome:
/// OK status yields the reply, a DeadlineExceeded status or local timer
/// expiry yields [`Error::Timeout`], any other status yields
/// [`Error::Request`].
fn dispatch<T, F>(
    runtime: &tokio::runtime::Runtime,
    op: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T>
where
    F: Future<Output = std::result::Result<tonic::Response<T>, tonic::Status>>,
{
    debug!(op, timeout_ms = timeout.as_millis() as u64, "issuing rpc");
    let outcome = runtime.block_on(async { tokio::time::timeout(timeout, call).await });
    match outcome {
        Ok(Ok(response)) => Ok(response.into_inner()),
        Ok(Err(status)) => Err(Error::from(status)),
        Err(_elapsed) => {
            warn!(op, timeout_ms = timeout.as_millis() as u64, "rpc deadline expired");
            Err(Error::Timeout(format!(
                "{op}: no reply within {}ms",
                timeout.as_millis()
            )))
        }
    }
}

fn server_metadata_from_wire(md: pb::ServerMetadataResponse) -> ServerMetadata {
    ServerMetadata {
        name: md.name,
        version: md.version,
        extensions: md.extensions,
    }
}

fn model_metadata_from_wire(md: pb::ModelMetadataResponse) -> ModelMetadata {
    let tensor = |t: pb::model_metadata_response::TensorMetadata| TensorMetadata {
        name: t.name,
        datatype: t.datatype,
        shape: t.shape,
    };
    ModelMetadata {
        name: md.name,
        versions: md.versions,
        platform: md.platform,
        inputs: md.inputs.into_iter().map(tensor).collect(),
        outputs: md.outputs.into_iter().map(tensor).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn dispatch_returns_reply_on_ok_status() {
        let runtime = test_runtime();
        let result = dispatch(&runtime, "Test", Duration::from_secs(1), async {
            Ok(tonic::Response::new(42_u32))
        });
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn dispatch_maps_deadline_exceeded_status_to_timeout() {
        let runtime = test_runtime();
        let result: Result<u32> = dispatch(&runtime, "Test", Duration::from_secs(1), async {
            Err(tonic::Status::deadline_exceeded("server deadline"))
        });
        match result {
            Err(Error::Timeout(message)) => assert_eq!(message, "server deadline"),
            other => panic!("expected Timeout, got: {other:?}"),
        }
    }

    #[test]
    fn dispatch_maps_other_statuses_to_request_error() {
        let runtime = test_runtime();
        let result: Result<u32> = dispatch(&runtime, "Test", Duration::from_secs(1), async {
            Err(tonic::Status::unavailable("connection refused"))
        });
        match result {
            Err(Error::Request { code, message }) => {
                assert_eq!(code, tonic::Code::Unavailable);
                assert_eq!(message, "connection refused");
            }
            other => panic!("expected Request, got: {other:?}"),
        }
    }

    #[test]
    fn dispatch_enforces_local_deadline() {
        let runtime = test_runtime();
        let result: Result<u32> = dispatch(&runtime, "Test", Duration::from_millis(20), async {
            std::future::pending().await
        });
        match result {
            Err(Error::Timeout(message)) => assert!(message.contains("20ms")),
            other => panic!("expected Timeout, got: {other:?}"),
        }
    }

    #[test]
    fn connect_is_lazy() {
        // Nothing listens on this endpoint; construction must still succeed.
        let client = GrpcClient::connect("http://127.0.0.1:1").unwrap();
        // The first actual call is what reports the unreachable server.
        let result = client.is_server_live();
        assert!(result.is_err());
    }

    #[test]
    fn connect_rejects_invalid_url() {
        let result = GrpcClient::connect("not a url");
        assert!(matches!(result, Err(Error::Connection(_))));
    }

    #[test]
    fn options_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.rpc_timeout, Duration::from_secs(5));
        assert_eq!(options.infer_timeout, Duration::from_secs(1));
        assert_eq!(options.max_message_size, 128 * 1024 * 1024);
    }

    #[test]
    fn server_metadata_mapping() {
        let wire = pb::ServerMetadataResponse {
            name: "inference-server".into(),
            version: "2.41.0".into(),
            extensions: vec!["classification".into(), "binary_tensor_data".into()],
        };
        let md = server_metadata_from_wire(wire);
        assert_eq!(md.name, "inference-server");
        assert_eq!(md.version, "2.41.0");
        assert_eq!(md.extensions.len(), 2);
    }

    #[test]
    fn model_metadata_mapping() {
        let tensor = |name: &str, datatype: &str, shape: Vec<i64>| {
            pb::model_metadata_response::TensorMetadata {
                name: name.into(),
                datatype: datatype.into(),
                shape,
            }
        };
        let wire = pb::ModelMetadataResponse {
            name: "simple".into(),
            versions: vec!["1".into(), "2".into()],
            platform: "onnxruntime_onnx".into(),
            inputs: vec![
                tensor("INPUT0", "INT32", vec![1, 16]),
                tensor("INPUT1", "INT32", vec![1, 16]),
            ],
            outputs: vec![tensor("OUTPUT0", "INT32", vec![-1, 16])],
        };

        let md = model_metadata_from_wire(wire);
        assert_eq!(md.name, "simple");
        assert_eq!(md.versions, ["1", "2"]);
        assert_eq!(md.platform, "onnxruntime_onnx");
        assert_eq!(md.inputs.len(), 2);
        assert_eq!(md.outputs.len(), 1);
        assert_eq!(md.inputs[0].name, "INPUT0");
        assert_eq!(md.inputs[1].datatype, "INT32");
        assert_eq!(md.outputs[0].shape, [-1, 16]);
    }
}
