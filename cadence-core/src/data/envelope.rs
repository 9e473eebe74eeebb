use std::{fmt, sync::Arc};

use crate::error::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MessageCode {
    /// A required input was missing.
    InvalidParams,
    /// A collaborator returned nothing usable or failed.
    InvalidResponse,
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams => f.write_str("invalid params"),
            Self::InvalidResponse => f.write_str("invalid response"),
        }
    }
}

/// Outcome of an operation, as published to observers.  A failure may still carry the last
/// known payload so it can keep being displayed.
#[derive(Clone, Debug)]
pub enum Envelope<T> {
    Success(T),
    Failed {
        code: MessageCode,
        message: String,
        cause: Option<Arc<Error>>,
        data: Option<T>,
    },
}

#[derive(Eq, PartialEq, Debug)]
pub enum EnvelopeState {
    Success,
    Failed,
}

impl<T> Envelope<T> {
    pub fn failed(code: MessageCode, err: Error) -> Self {
        Self::Failed {
            code,
            message: err.to_string(),
            cause: Some(Arc::new(err)),
            data: None,
        }
    }

    pub fn state(&self) -> EnvelopeState {
        match self {
            Self::Success(_) => EnvelopeState::Success,
            Self::Failed { .. } => EnvelopeState::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn code(&self) -> Option<MessageCode> {
        match self {
            Self::Success(_) => None,
            Self::Failed { code, .. } => Some(*code),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failed { message, .. } => Some(message),
        }
    }

    /// Payload of either variant.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failed { data, .. } => data.as_ref(),
        }
    }

    /// Replaces the payload of a failure, keeping its code, message and cause.
    pub fn with_data(self, payload: Option<T>) -> Self {
        match self {
            Self::Success(data) => Self::Success(data),
            Self::Failed {
                code,
                message,
                cause,
                ..
            } => Self::Failed {
                code,
                message,
                cause,
                data: payload,
            },
        }
    }
}

/// Why the holder changed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    SetParams,
    Reload,
}

#[derive(Clone, Debug)]
pub struct Event<T> {
    pub envelope: Envelope<T>,
    pub action: Action,
}

impl<T> Event<T> {
    pub fn new(envelope: Envelope<T>, action: Action) -> Self {
        Self { envelope, action }
    }

    pub fn data(&self) -> Option<&T> {
        self.envelope.data()
    }
}
