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

//! Error types for the inference client library.
//!
//! This module defines [`Error`] -- the unified error type returned by all
//! fallible operations -- along with the [`Result`] type alias used
//! throughout the crate. The taxonomy deliberately stays small: a call
//! either timed out ([`Error::Timeout`]) or was rejected for some other
//! reason ([`Error::Request`]), with the transport message passed through
//! verbatim. Callers pattern-match on the variant; the client performs no
//! local recovery, retry, or suppression.

/// Convenience alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that may occur when communicating with an inference server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The endpoint URL was invalid or the client runtime could not be
    /// started.
    #[error("connection error: {0}")]
    Connection(String),

    /// The gRPC transport layer returned an error.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The RPC deadline elapsed before the server replied.
    ///
    /// Recoverable by the caller; whether to retry or back off is the
    /// caller's decision, never the client's.
    #[error("rpc deadline exceeded: {0}")]
    Timeout(String),

    /// The server returned any other non-OK gRPC status.
    #[error("rpc failed (code={code}): {message}")]
    Request {
        /// The gRPC status code.
        code: tonic::Code,
        /// The error message from the server, verbatim.
        message: String,
    },

    /// A tensor or request was constructed with invalid parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::DeadlineExceeded => Self::Timeout(status.message().to_owned()),
            code => Self::Request {
                code,
                message: status.message().to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_exceeded_maps_to_timeout() {
        let status = tonic::Status::deadline_exceeded("took too long");
        match Error::from(status) {
            Error::Timeout(message) => assert_eq!(message, "took too long"),
            other => panic!("expected Timeout, got: {other}"),
        }
    }

    #[test]
    fn other_statuses_map_to_request() {
        let status = tonic::Status::not_found("model not found");
        match Error::from(status) {
            Error::Request { code, message } => {
                assert_eq!(code, tonic::Code::NotFound);
                assert_eq!(message, "model not found");
            }
            other => panic!("expected Request, got: {other}"),
        }
    }

    #[test]
    fn display_carries_transport_message() {
        let err = Error::Timeout("no reply within 250ms".into());
        assert!(format!("{err}").contains("no reply within 250ms"));

        let err = Error::Request {
            code: tonic::Code::Internal,
            message: "backend exploded".into(),
        };
        assert!(format!("{err}").contains("backend exploded"));
    }
}
