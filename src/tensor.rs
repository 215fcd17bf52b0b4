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

//! The typed value layer: [`DataType`], [`TensorElement`], and [`Tensor`].
//!
//! A [`Tensor`] is a named, shaped, typed, owned byte buffer. Data always
//! travels as raw little-endian bytes; typed access happens either through
//! the zero-copy (and `unsafe`) [`Tensor::view`] or the always-safe copying
//! [`Tensor::to_vec`].

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// DataType
// ---------------------------------------------------------------------------

/// Tensor element data types, matching the wire protocol's string tokens
/// (e.g. `"FP32"`, `"INT64"`, `"BYTES"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean values.
    Bool,
    /// Unsigned 8-bit integers.
    Uint8,
    /// Unsigned 16-bit integers.
    Uint16,
    /// Unsigned 32-bit integers.
    Uint32,
    /// Unsigned 64-bit integers.
    Uint64,
    /// Signed 8-bit integers.
    Int8,
    /// Signed 16-bit integers.
    Int16,
    /// Signed 32-bit integers.
    Int32,
    /// Signed 64-bit integers.
    Int64,
    /// IEEE 754 half-precision (16-bit) floating point.
    Fp16,
    /// IEEE 754 single-precision (32-bit) floating point.
    Fp32,
    /// IEEE 754 double-precision (64-bit) floating point.
    Fp64,
    /// Variable-length byte sequences (wire token `"BYTES"`).
    String,
    /// Any token this client does not recognize.
    #[default]
    Unknown,
}

impl DataType {
    /// Returns the wire protocol string token for this data type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inference_client::tensor::DataType;
    /// assert_eq!(DataType::Fp32.as_str(), "FP32");
    /// assert_eq!(DataType::String.as_str(), "BYTES");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Uint8 => "UINT8",
            Self::Uint16 => "UINT16",
            Self::Uint32 => "UINT32",
            Self::Uint64 => "UINT64",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Fp16 => "FP16",
            Self::Fp32 => "FP32",
            Self::Fp64 => "FP64",
            Self::String => "BYTES",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parses a wire protocol token into a [`DataType`].
    ///
    /// This fails closed: an unrecognized token yields [`DataType::Unknown`],
    /// never an error, so metadata from newer servers can be carried around
    /// without breaking the caller.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inference_client::tensor::DataType;
    /// assert_eq!(DataType::parse("INT32"), DataType::Int32);
    /// assert_eq!(DataType::parse("garbage"), DataType::Unknown);
    /// ```
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "BOOL" => Self::Bool,
            "UINT8" => Self::Uint8,
            "UINT16" => Self::Uint16,
            "UINT32" => Self::Uint32,
            "UINT64" => Self::Uint64,
            "INT8" => Self::Int8,
            "INT16" => Self::Int16,
            "INT32" => Self::Int32,
            "INT64" => Self::Int64,
            "FP16" => Self::Fp16,
            "FP32" => Self::Fp32,
            "FP64" => Self::Fp64,
            "BYTES" => Self::String,
            _ => Self::Unknown,
        }
    }

    /// Returns the fixed byte width of one element, or `None` for
    /// [`DataType::String`] and [`DataType::Unknown`].
    #[must_use]
    pub const fn size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Uint8 | Self::Int8 => Some(1),
            Self::Uint16 | Self::Int16 | Self::Fp16 => Some(2),
            Self::Uint32 | Self::Int32 | Self::Fp32 => Some(4),
            Self::Uint64 | Self::Int64 | Self::Fp64 => Some(8),
            Self::String | Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DataType {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

// ---------------------------------------------------------------------------
// TensorElement
// ---------------------------------------------------------------------------

/// Native scalar types that map to a fixed-width [`DataType`].
///
/// This is the compile-time type-to-datatype association used by the typed
/// construction path ([`Tensor::from_slice`],
/// [`InferRequest::typed_input`](crate::infer::InferRequest::typed_input)),
/// so callers never have to name the enum variant themselves. All encoding
/// is little-endian, matching the wire contract.
pub trait TensorElement: Copy {
    /// The wire data type corresponding to this scalar.
    const DATA_TYPE: DataType;

    /// Appends the little-endian encoding of `self` to `buf`.
    fn write_le(self, buf: &mut Vec<u8>);

    /// Decodes one value from a `size_of::<Self>()`-byte little-endian chunk.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_tensor_element {
    ($($ty:ty => $dt:expr),* $(,)?) => {$(
        impl TensorElement for $ty {
            const DATA_TYPE: DataType = $dt;

            fn write_le(self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                Self::from_le_bytes(bytes.try_into().expect("chunk width"))
            }
        }
    )*};
}

impl_tensor_element! {
    u8 => DataType::Uint8,
    u16 => DataType::Uint16,
    u32 => DataType::Uint32,
    u64 => DataType::Uint64,
    i8 => DataType::Int8,
    i16 => DataType::Int16,
    i32 => DataType::Int32,
    i64 => DataType::Int64,
    f32 => DataType::Fp32,
    f64 => DataType::Fp64,
}

impl TensorElement for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    fn write_le(self, buf: &mut Vec<u8>) {
        buf.push(u8::from(self));
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

// ---------------------------------------------------------------------------
// Tensor
// ---------------------------------------------------------------------------

/// An immutable, named, shaped, typed tensor owning its raw byte buffer.
///
/// Every tensor owns its bytes exclusively; buffers are never shared between
/// requests and responses. The byte length of the buffer always equals
/// `datatype.size() * element_count()` for fixed-width datatypes -- both
/// constructors enforce this, which is what makes [`Tensor::view`] sound to
/// offer at all.
///
/// # Example
///
/// ```rust
/// use inference_client::tensor::{DataType, Tensor};
///
/// let t = Tensor::from_slice("input0", vec![2, 2], &[1.0_f32, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(t.datatype(), DataType::Fp32);
/// assert_eq!(t.element_count(), 4);
/// assert_eq!(t.to_vec::<f32>(), vec![1.0, 2.0, 3.0, 4.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    name: String,
    shape: Vec<i64>,
    datatype: DataType,
    data: Vec<u8>,
}

impl Tensor {
    /// Creates a tensor from raw bytes and an explicit data type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `datatype` has a fixed width and
    /// `data.len()` differs from `width * product(shape)`.
    pub fn from_bytes(
        name: impl Into<String>,
        shape: Vec<i64>,
        datatype: DataType,
        data: Vec<u8>,
    ) -> Result<Self> {
        let tensor = Self {
            name: name.into(),
            shape,
            datatype,
            data,
        };
        if let Some(width) = datatype.size() {
            let expected = width * tensor.element_count();
            if tensor.data.len() != expected {
                return Err(Error::InvalidInput(format!(
                    "tensor '{}': buffer holds {} bytes but {} datatype with shape {:?} requires {}",
                    tensor.name,
                    tensor.data.len(),
                    datatype,
                    tensor.shape,
                    expected
                )));
            }
        }
        Ok(tensor)
    }

    /// Creates a tensor from a typed slice, inferring the data type from `T`.
    ///
    /// The values are copied into a fresh little-endian byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `values.len()` differs from
    /// `product(shape)`.
    pub fn from_slice<T: TensorElement>(
        name: impl Into<String>,
        shape: Vec<i64>,
        values: &[T],
    ) -> Result<Self> {
        let mut data = Vec::with_capacity(values.len() * std::mem::size_of::<T>());
        for &value in values {
            value.write_le(&mut data);
        }
        Self::from_bytes(name, shape, T::DATA_TYPE, data)
    }

    /// Returns the tensor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tensor shape. Variable-size dimensions reported by model
    /// metadata use `-1`; tensors carrying actual data only have
    /// non-negative dimensions.
    #[must_use]
    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    /// Returns the element data type.
    #[must_use]
    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    /// Returns the raw little-endian bytes of the tensor.
    #[must_use]
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of elements, i.e. the product of the shape
    /// dimensions. An empty shape yields 1 (a scalar); any zero dimension
    /// yields 0.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.shape
            .iter()
            .map(|&dim| usize::try_from(dim).unwrap_or(0))
            .product()
    }

    /// Reinterprets the raw byte buffer as a slice of `T` without copying.
    ///
    /// The returned slice borrows from the tensor and is valid only while
    /// the tensor is alive. No runtime type check is performed; this is a
    /// deliberate zero-cost boundary mirroring the raw wire representation.
    /// Prefer [`Tensor::to_vec`] unless the copy matters.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that
    /// - `T` matches the tensor's [`datatype`](Self::datatype) (same width
    ///   and value encoding),
    /// - the buffer's address is suitably aligned for `T`. Buffers created
    ///   by this crate come straight from the global allocator and satisfy
    ///   this for every supported scalar width in practice, but it is not a
    ///   language-level guarantee for a `Vec<u8>`.
    #[must_use]
    pub unsafe fn view<T: TensorElement>(&self) -> &[T] {
        std::slice::from_raw_parts(self.data.as_ptr().cast::<T>(), self.element_count())
    }

    /// Copies the tensor contents into a fresh, owned `Vec<T>`, decoding
    /// little-endian chunks. Always safe and independent of the tensor's
    /// lifetime; the caller is still responsible for choosing `T` consistent
    /// with [`datatype`](Self::datatype).
    #[must_use]
    pub fn to_vec<T: TensorElement>(&self) -> Vec<T> {
        self.data
            .chunks_exact(std::mem::size_of::<T>())
            .map(T::read_le)
            .collect()
    }

    /// Decomposes the tensor into its parts, handing the byte buffer to the
    /// wire encoder without a copy.
    pub(crate) fn into_parts(self) -> (String, Vec<i64>, DataType, Vec<u8>) {
        (self.name, self.shape, self.datatype, self.data)
    }

    /// Assembles a tensor from decoded wire parts. The reply's descriptor is
    /// taken as-is, without re-validating the byte length against it; the
    /// typed accessors on a malformed reply then simply see fewer elements.
    pub(crate) fn from_wire_parts(
        name: String,
        shape: Vec<i64>,
        datatype: DataType,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name,
            shape,
            datatype,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_token_round_trip() {
        let all = [
            DataType::Bool,
            DataType::Uint8,
            DataType::Uint16,
            DataType::Uint32,
            DataType::Uint64,
            DataType::Int8,
            DataType::Int16,
            DataType::Int32,
            DataType::Int64,
            DataType::Fp16,
            DataType::Fp32,
            DataType::Fp64,
            DataType::String,
            DataType::Unknown,
        ];
        for dt in all {
            assert_eq!(DataType::parse(dt.as_str()), dt, "round-trip of {dt}");
        }
    }

    #[test]
    fn data_type_parse_fails_closed() {
        assert_eq!(DataType::parse("garbage"), DataType::Unknown);
        assert_eq!(DataType::parse(""), DataType::Unknown);
        assert_eq!(DataType::parse("fp32"), DataType::Unknown); // case-sensitive
    }

    #[test]
    fn data_type_widths() {
        assert_eq!(DataType::Bool.size(), Some(1));
        assert_eq!(DataType::Int16.size(), Some(2));
        assert_eq!(DataType::Fp32.size(), Some(4));
        assert_eq!(DataType::Uint64.size(), Some(8));
        assert_eq!(DataType::String.size(), None);
        assert_eq!(DataType::Unknown.size(), None);
    }

    #[test]
    fn element_count_rules() {
        let t = Tensor::from_bytes("scalar", vec![], DataType::Fp32, vec![0; 4]).unwrap();
        assert_eq!(t.element_count(), 1);

        let t = Tensor::from_bytes("empty", vec![4, 0], DataType::Int32, vec![]).unwrap();
        assert_eq!(t.element_count(), 0);
        assert!(t.raw_data().is_empty());
    }

    #[test]
    fn from_bytes_rejects_length_mismatch() {
        let result = Tensor::from_bytes("bad", vec![1, 3], DataType::Int32, vec![0; 7]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn from_slice_rejects_count_mismatch() {
        let result = Tensor::from_slice("bad", vec![2, 2], &[1.0_f32, 2.0, 3.0]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn typed_round_trip_i32() {
        let values: Vec<i32> = (0..16).collect();
        let t = Tensor::from_slice("input0", vec![1, 16], &values).unwrap();
        assert_eq!(t.datatype(), DataType::Int32);
        assert_eq!(t.raw_data().len(), 64);
        assert_eq!(t.to_vec::<i32>(), values);
        assert_eq!(unsafe { t.view::<i32>() }, values.as_slice());
    }

    #[test]
    fn typed_round_trip_f64() {
        let values = [1.5_f64, -2.25, 0.0, f64::MAX];
        let t = Tensor::from_slice("x", vec![4], &values).unwrap();
        assert_eq!(t.datatype(), DataType::Fp64);
        assert_eq!(t.to_vec::<f64>(), values);
    }

    #[test]
    fn typed_round_trip_bool() {
        let values = [true, false, true];
        let t = Tensor::from_slice("mask", vec![3], &values).unwrap();
        assert_eq!(t.datatype(), DataType::Bool);
        assert_eq!(t.raw_data(), &[1, 0, 1]);
        assert_eq!(t.to_vec::<bool>(), values);
    }

    #[test]
    fn typed_round_trip_unsigned() {
        let u16s = [0_u16, 1000, u16::MAX];
        let t = Tensor::from_slice("u", vec![3], &u16s).unwrap();
        assert_eq!(t.datatype(), DataType::Uint16);
        assert_eq!(t.to_vec::<u16>(), u16s);

        let u64s = [0_u64, u64::MAX];
        let t = Tensor::from_slice("u", vec![2], &u64s).unwrap();
        assert_eq!(t.datatype(), DataType::Uint64);
        assert_eq!(t.to_vec::<u64>(), u64s);
    }

    #[test]
    fn typed_round_trip_signed_narrow() {
        let i8s = [-128_i8, 0, 127];
        let t = Tensor::from_slice("q", vec![3], &i8s).unwrap();
        assert_eq!(t.datatype(), DataType::Int8);
        assert_eq!(t.to_vec::<i8>(), i8s);

        let i16s = [i16::MIN, -1, i16::MAX];
        let t = Tensor::from_slice("q", vec![3], &i16s).unwrap();
        assert_eq!(t.datatype(), DataType::Int16);
        assert_eq!(t.to_vec::<i16>(), i16s);
    }

    #[test]
    fn raw_fp16_passes_through() {
        // FP16 has no native Rust scalar; raw construction carries it.
        let raw = vec![0x00, 0x3C, 0x00, 0x40]; // 1.0, 2.0
        let t = Tensor::from_bytes("half", vec![2], DataType::Fp16, raw.clone()).unwrap();
        assert_eq!(t.raw_data(), raw.as_slice());
        assert_eq!(t.to_vec::<u16>(), vec![0x3C00, 0x4000]);
    }
}
