/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use std::io;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum CloudAppError {
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("Request network error")]
    Request(#[from] reqwest::Error),

    #[error("Deserialization error")]
    Deserialization(#[from] serde_json::Error),

    #[error("URL Parse error")]
    UrlParsing(#[from] url::ParseError),

    #[error("Authentication required. Credentials have not been set on this client")]
    AuthenticationRequired(),

    #[error("Authentication failed: {0}, msg: {1}")]
    Unauthorized(u16, String),

    #[error("Resource not found: {0}, msg: {1}")]
    NotFound(u16, String),

    #[error("API Response was error: {0}, msg: {1}")]
    ApiResponse(u16, String),

    #[error("Client not found")]
    ClientNotFound(),

    #[error("Expected response missing")]
    ResponseMissing(),

    #[error("Redirect response did not include a location")]
    RedirectLocationMissing(),

    #[error("No uploads remaining on this account")]
    UploadQuotaExhausted(),

    #[error("File is {0} bytes, the maximum upload size is {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Invalid id: {0:?}")]
    InvalidId(String),
}

impl CloudAppError {
    /// True when the credentials were missing or rejected by the service
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            CloudAppError::AuthenticationRequired() | CloudAppError::Unauthorized(..)
        )
    }

    /// True when the requested resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudAppError::NotFound(..))
    }

    /// Status code returned by the service, if the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudAppError::Unauthorized(code, _)
            | CloudAppError::NotFound(code, _)
            | CloudAppError::ApiResponse(code, _) => Some(*code),
            CloudAppError::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
