//! Response body helpers.

use serde::Serialize;

/// Fixed message returned for every rejected write.
pub const VALIDATION_ERRORS: &str = "validation errors";

#[derive(Serialize, Debug)]
pub struct MessageBody {
    pub message: &'static str,
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize, Debug)]
pub struct ValidationErrorsBody {
    pub errors: Vec<&'static str>,
}

pub fn message(message: &'static str) -> MessageBody {
    MessageBody { message }
}

pub fn error_body(error: String) -> ErrorBody {
    ErrorBody { error }
}

pub fn validation_errors_body() -> ValidationErrorsBody {
    ValidationErrorsBody {
        errors: vec![VALIDATION_ERRORS],
    }
}
