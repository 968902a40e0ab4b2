//! Instrumentation through the `metrics` facade.
//!
//! | Name | Kind | Labels |
//! |---|---|---|
//! | `jenkins_users_operations_total` | counter | `operation`, `outcome` |
//! | `jenkins_users_request_seconds` | histogram | `method`, `outcome` |
//! | `jenkins_users_inflight` | gauge | |
//!
//! `outcome` is `ok`, the numeric status, or the error kind for failures
//! that never produced a status.

use crate::{Error, ErrorKind, UserOperation};
use http::{Method, StatusCode};
use metrics::SharedString;
use std::time::Instant;

fn outcome_label(outcome: Result<StatusCode, ErrorKind>) -> SharedString {
    match outcome {
        Ok(StatusCode::OK) => SharedString::const_str("ok"),
        Ok(status) => status.as_u16().to_string().into(),
        Err(ErrorKind::Transport) => SharedString::const_str("transport"),
        Err(ErrorKind::Decode) => SharedString::const_str("decode"),
        Err(ErrorKind::InvalidConfig) => SharedString::const_str("invalid_config"),
        Err(ErrorKind::User | ErrorKind::Api) => SharedString::const_str("http"),
    }
}

/// Times one HTTP exchange. The in-flight gauge is released on drop, so a
/// cancelled future still decrements it.
pub(crate) struct RequestTimer {
    method: SharedString,
    started: Instant,
}

impl RequestTimer {
    pub(crate) fn start(method: &Method) -> Self {
        metrics::gauge!("jenkins_users_inflight").increment(1.0);
        Self {
            method: method.as_str().to_owned().into(),
            started: Instant::now(),
        }
    }

    pub(crate) fn finish(self, outcome: Result<StatusCode, ErrorKind>) {
        metrics::histogram!(
            "jenkins_users_request_seconds",
            "method" => self.method.clone(),
            "outcome" => outcome_label(outcome)
        )
        .record(self.started.elapsed());
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        metrics::gauge!("jenkins_users_inflight").decrement(1.0);
    }
}

/// Count a create/delete/get call by how it ended.
pub(crate) fn record_user_operation<T>(operation: UserOperation, result: &Result<T, Error>) {
    let outcome = match result {
        Ok(_) => Ok(StatusCode::OK),
        Err(Error::User { error, .. }) => Ok(error.status),
        Err(err) => Err(err.kind()),
    };
    metrics::counter!(
        "jenkins_users_operations_total",
        "operation" => operation.as_str(),
        "outcome" => outcome_label(outcome)
    )
    .increment(1);
}
