//! API error handling.
//!
//! We define our own error to use for all resolvers. Every failed resolver
//! surfaces as a GraphQL field error; nothing is ever returned as data. The
//! error carries a coarse "kind" in its extensions so that clients can tell
//! failures apart without parsing the message.

use juniper::{FieldError, IntoFieldError, ScalarValue, graphql_value};

use crate::{prelude::*, upstream::UpstreamError};


pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) msg: String,
    pub(crate) kind: ApiErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// A required argument is missing or empty.
    InvalidArgument,

    /// Upstream knows nothing matching the request.
    NotFound,

    /// The upstream REST API could not be used.
    UpstreamFailure(UpstreamCause),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpstreamCause {
    /// Network level failure, e.g. connection refused.
    Transport,

    /// Upstream replied with an unexpected HTTP status.
    Status,

    /// Upstream replied with data we could not decode.
    Malformed,
}

impl ApiErrorKind {
    fn kind_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::UpstreamFailure(_) => "UPSTREAM_FAILURE",
        }
    }

    fn message_prefix(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "Invalid argument",
            Self::NotFound => "Not found",
            Self::UpstreamFailure(_) => "Upstream failure",
        }
    }
}

impl UpstreamCause {
    fn cause_str(&self) -> &'static str {
        match self {
            Self::Transport => "TRANSPORT",
            Self::Status => "STATUS",
            Self::Malformed => "MALFORMED",
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(src: UpstreamError) -> Self {
        // This is the last place where we have the detailed error at hand, and
        // it is very likely sent back to the client right after.
        error!("Error communicating with the REST Countries API: {src}");

        let cause = match src {
            UpstreamError::Transport(_) => UpstreamCause::Transport,
            UpstreamError::Status(_) => UpstreamCause::Status,
            UpstreamError::Malformed(_) => UpstreamCause::Malformed,
        };

        Self {
            msg: format!("failed to fetch data from the REST Countries API: {src}"),
            kind: ApiErrorKind::UpstreamFailure(cause),
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for ApiError {
    fn into_field_error(self) -> FieldError<S> {
        let msg = format!("{}: {}", self.kind.message_prefix(), self.msg);
        let ext = match self.kind {
            ApiErrorKind::UpstreamFailure(cause) => graphql_value!({
                "kind": (self.kind.kind_str()),
                "cause": (cause.cause_str()),
            }),
            _ => graphql_value!({
                "kind": (self.kind.kind_str()),
            }),
        };

        FieldError::new(msg, ext)
    }
}


// ===== Helper macros to easily create errors ==================================================

/// Creates an `ApiError` with a `format!` like syntax.
macro_rules! api_err {
    ($kind:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::api::err::ApiError {
            msg: format!($fmt $(, $arg)*),
            kind: $crate::api::err::ApiErrorKind::$kind,
        }
    };
}

macro_rules! invalid_argument {
    ($($t:tt)+) => { $crate::api::err::api_err!(InvalidArgument, $($t)*) };
}

macro_rules! not_found {
    ($($t:tt)+) => { $crate::api::err::api_err!(NotFound, $($t)*) };
}

pub(crate) use api_err;
pub(crate) use invalid_argument;
pub(crate) use not_found;
