//! Error extension trait shared by every climux crate.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use crate::StatusCode;

/// Extension over [`std::error::Error`] that attaches a [`StatusCode`].
pub trait ErrorExt: StdError {
    /// Map this error to a status code.
    fn status_code(&self) -> StatusCode {
        StatusCode::Unknown
    }

    /// Returns the error as [Any] so that it can be downcast to a specific implementation.
    fn as_any(&self) -> &dyn Any;

    /// Whether retrying the failed operation could succeed.
    fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    /// Message safe to show to a user.
    ///
    /// Unknown and internal errors hide their details behind the numeric code.
    fn output_msg(&self) -> String
    where
        Self: Sized,
    {
        match self.status_code() {
            StatusCode::Unknown | StatusCode::Internal => {
                format!("Internal error: {}", self.status_code() as i32)
            }
            _ => self.to_string(),
        }
    }
}

/// An error with only a message and a status code.
#[derive(Debug)]
pub struct PlainError {
    msg: String,
    status_code: StatusCode,
}

impl PlainError {
    pub fn new(msg: impl Into<String>, status_code: StatusCode) -> Self {
        Self {
            msg: msg.into(),
            status_code,
        }
    }
}

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}

impl StdError for PlainError {}

impl ErrorExt for PlainError {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Wraps a foreign error and tags it with a status code.
#[derive(Debug)]
pub struct BoxedError {
    inner: Box<dyn StdError + Send + Sync>,
    status_code: StatusCode,
}

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl ErrorExt for BoxedError {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Box `err` into a [`BoxedError`] with the given status code.
pub fn boxed<E>(err: E, status_code: StatusCode) -> BoxedError
where
    E: StdError + Send + Sync + 'static,
{
    BoxedError {
        inner: Box::new(err),
        status_code,
    }
}

#[cfg(test)]
#[path = "ext.test.rs"]
mod tests;
