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

//! Request/response envelopes and read-only metadata snapshots.
//!
//! An [`InferRequest`] is built incrementally by appending input tensors,
//! either pre-constructed ([`InferRequest::input`]), from raw bytes plus an
//! explicit datatype ([`InferRequest::raw_input`]), or from a typed slice
//! with the datatype inferred at compile time
//! ([`InferRequest::typed_input`]). An [`InferResponse`] is produced only by
//! the wire converter and never mutated afterwards.
//!
//! # Example
//!
//! ```rust
//! use inference_client::infer::InferRequest;
//!
//! let request = InferRequest::new("simple_sum_diff")
//!     .model_version("1")
//!     .request_id("req-001")
//!     .typed_input("INPUT0", vec![1, 16], &[0_i32; 16])
//!     .unwrap()
//!     .typed_input("INPUT1", vec![1, 16], &[1_i32; 16])
//!     .unwrap();
//! assert_eq!(request.inputs().len(), 2);
//! ```

use crate::error::Result;
use crate::tensor::{DataType, Tensor, TensorElement};

// ---------------------------------------------------------------------------
// InferRequest
// ---------------------------------------------------------------------------

/// An inference request: target model, correlation id, and an ordered list
/// of input tensors.
#[derive(Debug, Clone, Default)]
pub struct InferRequest {
    model_name: String,
    model_version: String,
    id: String,
    inputs: Vec<Tensor>,
}

impl InferRequest {
    /// Creates a request targeting the given model.
    #[must_use]
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            ..Self::default()
        }
    }

    /// Sets the model version. If never set, the server picks its default
    /// version.
    #[must_use]
    pub fn model_version(self, version: impl Into<String>) -> Self {
        Self {
            model_version: version.into(),
            ..self
        }
    }

    /// Sets the correlation id. The server echoes it back verbatim in the
    /// response; the client never interprets it.
    #[must_use]
    pub fn request_id(self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self
        }
    }

    /// Appends a pre-constructed input tensor.
    #[must_use]
    pub fn input(mut self, tensor: Tensor) -> Self {
        self.inputs.push(tensor);
        self
    }

    /// Appends an input tensor built from raw bytes and an explicit
    /// datatype.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::error::Error::InvalidInput) if
    /// the byte length does not match the datatype width and shape.
    pub fn raw_input(
        self,
        name: impl Into<String>,
        shape: Vec<i64>,
        datatype: DataType,
        data: Vec<u8>,
    ) -> Result<Self> {
        Ok(self.input(Tensor::from_bytes(name, shape, datatype, data)?))
    }

    /// Appends an input tensor built from a typed slice; the datatype is
    /// derived from `T` at compile time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::error::Error::InvalidInput) if
    /// the value count does not match the shape.
    pub fn typed_input<T: TensorElement>(
        self,
        name: impl Into<String>,
        shape: Vec<i64>,
        values: &[T],
    ) -> Result<Self> {
        Ok(self.input(Tensor::from_slice(name, shape, values)?))
    }

    /// Returns the target model name.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the target model version (may be empty).
    #[must_use]
    pub fn model_version_str(&self) -> &str {
        &self.model_version
    }

    /// Returns the correlation id (may be empty).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the ordered input tensors.
    #[must_use]
    pub fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    /// Decomposes the request for the wire encoder.
    pub(crate) fn into_parts(self) -> (String, String, String, Vec<Tensor>) {
        (self.model_name, self.model_version, self.id, self.inputs)
    }
}

// ---------------------------------------------------------------------------
// InferResponse
// ---------------------------------------------------------------------------

/// An inference response: echoed model identity and correlation id plus the
/// ordered output tensors.
///
/// Instances are populated entirely by the wire converter from the RPC
/// reply. Output tensor `i` corresponds to wire output descriptor `i`; when
/// the reply carried fewer raw-content buffers than descriptors, the extra
/// descriptors have no tensor here (see the crate-level notes on the
/// degradation policy).
#[derive(Debug, Clone, Default)]
pub struct InferResponse {
    pub(crate) model_name: String,
    pub(crate) model_version: String,
    pub(crate) id: String,
    pub(crate) outputs: Vec<Tensor>,
}

impl InferResponse {
    /// Returns the model name that produced this response.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the model version that produced this response.
    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Returns the echoed correlation id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the ordered output tensors.
    #[must_use]
    pub fn outputs(&self) -> &[Tensor] {
        &self.outputs
    }

    /// Returns the output tensor at the given positional index.
    #[must_use]
    pub fn output(&self, index: usize) -> Option<&Tensor> {
        self.outputs.get(index)
    }

    /// Finds an output tensor by name.
    #[must_use]
    pub fn output_named(&self, name: &str) -> Option<&Tensor> {
        self.outputs.iter().find(|t| t.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Metadata snapshots
// ---------------------------------------------------------------------------

/// Metadata about the inference server. A read-only snapshot with no
/// lifecycle beyond the call that produced it.
#[derive(Debug, Clone)]
pub struct ServerMetadata {
    /// The server name.
    pub name: String,
    /// The server version.
    pub version: String,
    /// The protocol extensions supported by the server.
    pub extensions: Vec<String>,
}

/// Metadata about a specific model hosted on the server.
#[derive(Debug, Clone)]
pub struct ModelMetadata {
    /// The model name.
    pub name: String,
    /// The available model versions.
    pub versions: Vec<String>,
    /// The model platform (e.g. `"onnxruntime_onnx"`).
    pub platform: String,
    /// Input tensor descriptors, in model order.
    pub inputs: Vec<TensorMetadata>,
    /// Output tensor descriptors, in model order.
    pub outputs: Vec<TensorMetadata>,
}

/// Descriptor for a single model input or output.
#[derive(Debug, Clone)]
pub struct TensorMetadata {
    /// The tensor name.
    pub name: String,
    /// The datatype as a wire token (e.g. `"FP32"`); parse with
    /// [`DataType::parse`] as needed.
    pub datatype: String,
    /// The tensor shape. Variable-size dimensions are represented as `-1`.
    pub shape: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accumulates_inputs_in_order() {
        let request = InferRequest::new("model")
            .typed_input("a", vec![2], &[1_i32, 2])
            .unwrap()
            .typed_input("b", vec![1], &[3.5_f32])
            .unwrap()
            .raw_input("c", vec![2], DataType::Uint8, vec![7, 9])
            .unwrap();

        let names: Vec<_> = request.inputs().iter().map(Tensor::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(request.inputs()[0].datatype(), DataType::Int32);
        assert_eq!(request.inputs()[1].datatype(), DataType::Fp32);
        assert_eq!(request.inputs()[2].datatype(), DataType::Uint8);
    }

    #[test]
    fn request_identity_fields() {
        let request = InferRequest::new("m").model_version("2").request_id("xyz");
        assert_eq!(request.model_name(), "m");
        assert_eq!(request.model_version_str(), "2");
        assert_eq!(request.id(), "xyz");
    }

    #[test]
    fn response_lookup() {
        let response = InferResponse {
            model_name: "m".into(),
            model_version: "1".into(),
            id: "req".into(),
            outputs: vec![
                Tensor::from_slice("alpha", vec![1], &[1_i32]).unwrap(),
                Tensor::from_slice("beta", vec![1], &[2_i32]).unwrap(),
            ],
        };

        assert_eq!(response.output(0).unwrap().name(), "alpha");
        assert!(response.output(2).is_none());
        assert_eq!(response.output_named("beta").unwrap().to_vec::<i32>(), [2]);
        assert!(response.output_named("gamma").is_none());
    }
}
