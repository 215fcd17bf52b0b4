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

//! Lossless structural translation between the typed envelopes and the wire
//! message schema.
//!
//! The wire protocol correlates tensor descriptors and raw byte payloads
//! positionally: input descriptor `i` pairs with `raw_input_contents[i]`,
//! and likewise for outputs. Nothing in the messages is self-describing, so
//! order preservation here is load-bearing.

use tracing::warn;

use crate::generated::inference as pb;
use crate::infer::{InferRequest, InferResponse};
use crate::tensor::{DataType, Tensor};

/// Marshals an [`InferRequest`] into the wire request message.
///
/// For each input tensor, one descriptor (name, datatype token, shape) is
/// emitted and its raw bytes are appended at the same position in
/// `raw_input_contents`. Typed `contents` are never populated; raw bytes are
/// the only representation this client sends.
pub(crate) fn request_to_wire(request: InferRequest) -> pb::ModelInferRequest {
    let (model_name, model_version, id, inputs) = request.into_parts();

    let mut input_tensors = Vec::with_capacity(inputs.len());
    let mut raw_input_contents = Vec::with_capacity(inputs.len());

    for tensor in inputs {
        let (name, shape, datatype, data) = tensor.into_parts();
        input_tensors.push(pb::model_infer_request::InferInputTensor {
            name,
            datatype: datatype.as_str().to_owned(),
            shape,
            parameters: Default::default(),
            contents: None,
        });
        raw_input_contents.push(data);
    }

    pb::ModelInferRequest {
        model_name,
        model_version,
        id,
        parameters: Default::default(),
        inputs: input_tensors,
        outputs: Vec::new(),
        raw_input_contents,
    }
}

/// Unmarshals the wire response message into an [`InferResponse`], taking
/// ownership of the reply's raw buffers so the result outlives the
/// transport response.
///
/// Output descriptor `i` pairs with `raw_output_contents[i]`. Two degraded
/// shapes of reply are tolerated rather than rejected:
///
/// - a reply with no raw contents at all (a server answering with typed
///   `contents` instead) produces an empty output list;
/// - a reply with fewer raw buffers than descriptors produces tensors only
///   for the descriptors that have a buffer; the rest are dropped.
///
/// Both cases are logged at `warn` level. Descriptor order is preserved for
/// everything that is produced.
pub(crate) fn response_from_wire(response: pb::ModelInferResponse) -> InferResponse {
    let descriptor_count = response.outputs.len();
    let raw_count = response.raw_output_contents.len();

    if raw_count == 0 && descriptor_count > 0 {
        warn!(
            model_name = %response.model_name,
            descriptor_count,
            "reply carries no raw output contents (typed contents are unsupported); \
             returning an empty output list"
        );
    } else if raw_count < descriptor_count {
        warn!(
            model_name = %response.model_name,
            descriptor_count,
            raw_count,
            "reply carries fewer raw buffers than output descriptors; \
             trailing outputs will be dropped"
        );
    }

    let mut outputs = Vec::with_capacity(descriptor_count.min(raw_count));
    for (descriptor, raw) in response
        .outputs
        .into_iter()
        .zip(response.raw_output_contents)
    {
        outputs.push(Tensor::from_wire_parts(
            descriptor.name,
            descriptor.shape,
            DataType::parse(&descriptor.datatype),
            raw,
        ));
    }

    InferResponse {
        model_name: response.model_name,
        model_version: response.model_version,
        id: response.id,
        outputs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::InferRequest;

    fn wire_output(
        name: &str,
        datatype: &str,
        shape: Vec<i64>,
    ) -> pb::model_infer_response::InferOutputTensor {
        pb::model_infer_response::InferOutputTensor {
            name: name.into(),
            datatype: datatype.into(),
            shape,
            parameters: Default::default(),
            contents: None,
        }
    }

    #[test]
    fn encode_preserves_order_and_bytes() {
        let request = InferRequest::new("sum_diff")
            .model_version("1")
            .request_id("req-7")
            .typed_input("INPUT0", vec![1, 4], &[1_i32, 2, 3, 4])
            .unwrap()
            .typed_input("INPUT1", vec![1, 4], &[5.0_f32, 6.0, 7.0, 8.0])
            .unwrap();

        let wire = request_to_wire(request);

        assert_eq!(wire.model_name, "sum_diff");
        assert_eq!(wire.model_version, "1");
        assert_eq!(wire.id, "req-7");
        assert_eq!(wire.inputs.len(), 2);
        assert_eq!(wire.raw_input_contents.len(), 2);

        assert_eq!(wire.inputs[0].name, "INPUT0");
        assert_eq!(wire.inputs[0].datatype, "INT32");
        assert_eq!(wire.inputs[0].shape, [1, 4]);
        assert!(wire.inputs[0].contents.is_none());
        let expected: Vec<u8> = [1_i32, 2, 3, 4].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(wire.raw_input_contents[0], expected);

        assert_eq!(wire.inputs[1].datatype, "FP32");
        assert_eq!(wire.raw_input_contents[1].len(), 16);
    }

    #[test]
    fn encode_decode_round_trip_mixed_datatypes() {
        let request = InferRequest::new("echo")
            .typed_input("a", vec![3], &[9_i64, -9, 0])
            .unwrap()
            .typed_input("b", vec![2], &[true, false])
            .unwrap()
            .typed_input("c", vec![1, 2], &[0.5_f64, -0.5])
            .unwrap();
        let originals = request.inputs().to_vec();

        // Synthesize the reply a faithful echo server would produce.
        let wire = request_to_wire(request);
        let reply = pb::ModelInferResponse {
            model_name: wire.model_name.clone(),
            model_version: wire.model_version.clone(),
            id: wire.id.clone(),
            parameters: Default::default(),
            outputs: wire
                .inputs
                .iter()
                .map(|t| wire_output(&t.name, &t.datatype, t.shape.clone()))
                .collect(),
            raw_output_contents: wire.raw_input_contents.clone(),
        };

        let response = response_from_wire(reply);
        assert_eq!(response.outputs().len(), originals.len());
        for (original, decoded) in originals.iter().zip(response.outputs()) {
            assert_eq!(decoded.name(), original.name());
            assert_eq!(decoded.shape(), original.shape());
            assert_eq!(decoded.datatype(), original.datatype());
            assert_eq!(decoded.raw_data(), original.raw_data());
        }
    }

    #[test]
    fn decode_copies_identity_fields() {
        let reply = pb::ModelInferResponse {
            model_name: "m".into(),
            model_version: "3".into(),
            id: "corr-1".into(),
            parameters: Default::default(),
            outputs: vec![],
            raw_output_contents: vec![],
        };
        let response = response_from_wire(reply);
        assert_eq!(response.model_name(), "m");
        assert_eq!(response.model_version(), "3");
        assert_eq!(response.id(), "corr-1");
        assert!(response.outputs().is_empty());
    }

    #[test]
    fn decode_without_raw_contents_yields_empty_outputs() {
        let reply = pb::ModelInferResponse {
            model_name: "typed_only".into(),
            model_version: String::new(),
            id: String::new(),
            parameters: Default::default(),
            outputs: vec![wire_output("OUTPUT0", "FP32", vec![1, 4])],
            raw_output_contents: vec![],
        };
        let response = response_from_wire(reply);
        assert!(response.outputs().is_empty());
    }

    #[test]
    fn decode_truncates_at_shorter_raw_list() {
        let reply = pb::ModelInferResponse {
            model_name: "partial".into(),
            model_version: String::new(),
            id: String::new(),
            parameters: Default::default(),
            outputs: vec![
                wire_output("OUTPUT0", "INT32", vec![2]),
                wire_output("OUTPUT1", "INT32", vec![2]),
            ],
            raw_output_contents: vec![vec![1, 0, 0, 0, 2, 0, 0, 0]],
        };
        let response = response_from_wire(reply);
        assert_eq!(response.outputs().len(), 1);
        assert_eq!(response.outputs()[0].name(), "OUTPUT0");
        assert_eq!(response.outputs()[0].to_vec::<i32>(), [1, 2]);
    }

    #[test]
    fn decode_maps_unknown_datatype_token() {
        let reply = pb::ModelInferResponse {
            model_name: String::new(),
            model_version: String::new(),
            id: String::new(),
            parameters: Default::default(),
            outputs: vec![wire_output("exotic", "COMPLEX128", vec![1])],
            raw_output_contents: vec![vec![0; 16]],
        };
        let response = response_from_wire(reply);
        assert_eq!(response.outputs()[0].datatype(), DataType::Unknown);
        assert_eq!(response.outputs()[0].raw_data().len(), 16);
    }

    #[test]
    fn sum_diff_scenario() {
        // INPUT0 = [0..15], INPUT1 = [1; 16]; the model computes
        // OUTPUT0 = INPUT0 + INPUT1 and OUTPUT1 = INPUT0 - INPUT1.
        let input0: Vec<i32> = (0..16).collect();
        let input1 = vec![1_i32; 16];

        let request = InferRequest::new("simple")
            .typed_input("INPUT0", vec![1, 16], &input0)
            .unwrap()
            .typed_input("INPUT1", vec![1, 16], &input1)
            .unwrap();
        let wire = request_to_wire(request);

        // Emulate the model on the wire payloads.
        let a: Vec<i32> = wire.raw_input_contents[0]
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
            .collect();
        let b: Vec<i32> = wire.raw_input_contents[1]
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
            .collect();
        let sum: Vec<u8> = a
            .iter()
            .zip(&b)
            .flat_map(|(x, y)| (x + y).to_le_bytes())
            .collect();
        let diff: Vec<u8> = a
            .iter()
            .zip(&b)
            .flat_map(|(x, y)| (x - y).to_le_bytes())
            .collect();

        let reply = pb::ModelInferResponse {
            model_name: "simple".into(),
            model_version: "1".into(),
            id: String::new(),
            parameters: Default::default(),
            outputs: vec![
                wire_output("OUTPUT0", "INT32", vec![1, 16]),
                wire_output("OUTPUT1", "INT32", vec![1, 16]),
            ],
            raw_output_contents: vec![sum, diff],
        };

        let response = response_from_wire(reply);
        let output0 = response.output_named("OUTPUT0").unwrap().to_vec::<i32>();
        let output1 = response.output_named("OUTPUT1").unwrap().to_vec::<i32>();
        for i in 0..16 {
            assert_eq!(output0[i], input0[i] + input1[i]);
            assert_eq!(output1[i], input0[i] - input1[i]);
        }
    }
}
