//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{
    AccountValidationError, CredentialsValidationError, Error, RecordId, RecordValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    EmptyEmail,
    InvalidEmail,
    EmailTooLong,
    EmptyPassword,
    PasswordTooShort,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyEmail => "empty_email",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::EmailTooLong => "email_too_long",
            ErrorCode::EmptyPassword => "empty_password",
            ErrorCode::PasswordTooShort => "password_too_short",
        }
    }
}

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// Map a rejected record body to a `400` carrying `{field, code}` details.
pub(crate) fn record_validation_error(err: RecordValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

/// Map rejected registration or login input to a `400`.
pub(crate) fn credentials_validation_error(err: CredentialsValidationError) -> Error {
    let message = err.to_string();
    let (field, code) = match err {
        CredentialsValidationError::Email(AccountValidationError::EmptyEmail) => {
            ("email", ErrorCode::EmptyEmail)
        }
        CredentialsValidationError::Email(AccountValidationError::EmailTooLong { .. }) => {
            ("email", ErrorCode::EmailTooLong)
        }
        CredentialsValidationError::Email(_) => ("email", ErrorCode::InvalidEmail),
        CredentialsValidationError::EmptyPassword => ("password", ErrorCode::EmptyPassword),
        CredentialsValidationError::PasswordTooShort { .. } => {
            ("password", ErrorCode::PasswordTooShort)
        }
    };
    field_error(field, code.as_str(), message)
}

/// Parse a record id path segment. Anything that is not a positive integer
/// cannot name a record, so it is reported as missing.
pub(crate) fn parse_record_id(raw: &str, resource: &str) -> Result<RecordId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("{resource} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as ApiErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(RecordValidationError::Blank { field: "name" }, "name", "blank")]
    #[case(RecordValidationError::NotPositive { field: "pages" }, "pages", "not_positive")]
    #[case(
        RecordValidationError::OutOfOrder { field: "year_discontinued", earlier: "year_introduced" },
        "year_discontinued",
        "out_of_order"
    )]
    fn record_errors_carry_field_and_code(
        #[case] err: RecordValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = record_validation_error(err);
        assert_eq!(mapped.code(), ApiErrorCode::InvalidRequest);
        let details = mapped.details().expect("details present");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }

    #[rstest]
    #[case(
        CredentialsValidationError::Email(AccountValidationError::InvalidEmail),
        "email",
        "invalid_email"
    )]
    #[case(
        CredentialsValidationError::PasswordTooShort { min: 6 },
        "password",
        "password_too_short"
    )]
    #[case(CredentialsValidationError::EmptyPassword, "password", "empty_password")]
    fn credential_errors_carry_field_and_code(
        #[case] err: CredentialsValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = credentials_validation_error(err);
        let details = mapped.details().expect("details present");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("abc")]
    #[case("99999999999")]
    fn unusable_ids_are_not_found(#[case] raw: &str) {
        let err = parse_record_id(raw, "camera").expect_err("rejected");
        assert_eq!(err.code(), ApiErrorCode::NotFound);
        assert_eq!(err.message(), "camera not found");
    }

    #[rstest]
    fn positive_ids_parse() {
        assert_eq!(parse_record_id("42", "camera").map(RecordId::get), Ok(42));
    }
}
