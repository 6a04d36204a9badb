use super::*;
use pretty_assertions::assert_eq;
use strum::IntoEnumIterator;

#[test]
fn test_status_code_values() {
    assert_eq!(StatusCode::Success as i32, 00_000);
    assert_eq!(StatusCode::Unknown as i32, 01_000);
    assert_eq!(StatusCode::InvalidArguments as i32, 02_000);
    assert_eq!(StatusCode::IoError as i32, 03_000);
    assert_eq!(StatusCode::PermissionDenied as i32, 05_000);

    assert_eq!(StatusCode::InvalidConfig as i32, 10_000);
    assert_eq!(StatusCode::SessionNotFound as i32, 11_000);
    assert_eq!(StatusCode::MultiplexerSessionNotFound as i32, 13_000);
    assert_eq!(StatusCode::InvalidPattern as i32, 14_000);
}

#[test]
fn test_is_success() {
    assert!(StatusCode::is_success(0));
    assert!(!StatusCode::is_success(01_000));
}

#[test]
fn test_from_i32() {
    assert_eq!(StatusCode::from_i32(11_001), Some(StatusCode::SessionClosed));
    assert_eq!(StatusCode::from_i32(99_999), None);
}

#[test]
fn test_display_and_name() {
    assert_eq!(format!("{}", StatusCode::Success), "Success");
    assert_eq!(StatusCode::SessionClosed.name(), "SessionClosed");
    assert_eq!(
        StatusCode::MultiplexerCommandFailed.as_ref(),
        "MultiplexerCommandFailed"
    );
}

#[test]
fn test_metadata_consistency() {
    for code in StatusCode::iter() {
        let meta = code.meta();
        let value = code as i32;

        // Verify category matches code range (XX_YYY format)
        match meta.category {
            StatusCategory::Success => assert_eq!(value, 0),
            StatusCategory::Common => assert!((01_000..02_000).contains(&value)),
            StatusCategory::Input => assert!((02_000..03_000).contains(&value)),
            StatusCategory::IO => assert!((03_000..04_000).contains(&value)),
            StatusCategory::Auth => assert!((05_000..06_000).contains(&value)),
            StatusCategory::Config => assert!((10_000..11_000).contains(&value)),
            StatusCategory::Session => assert!((11_000..12_000).contains(&value)),
            StatusCategory::Multiplexer => assert!((13_000..14_000).contains(&value)),
            StatusCategory::Policy => assert!((14_000..15_000).contains(&value)),
        }
    }
}

#[test]
fn test_retryable_rules() {
    assert!(StatusCode::Internal.is_retryable());

    // A closed session stays closed
    assert!(!StatusCode::SessionClosed.is_retryable());
    assert!(!StatusCode::InvalidPattern.is_retryable());
    assert!(!StatusCode::MultiplexerCommandFailed.is_retryable());
}

#[test]
fn test_log_error_rules() {
    assert!(StatusCode::Unknown.should_log_error());
    assert!(StatusCode::MultiplexerCommandFailed.should_log_error());

    assert!(!StatusCode::InvalidArguments.should_log_error());
    assert!(!StatusCode::MultiplexerSessionNotFound.should_log_error());
}
