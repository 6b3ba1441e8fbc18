use depcov_util::errors::DepcovError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = DepcovError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_configuration_error_display() {
    let err = DepcovError::Configuration {
        message: "bad pattern".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad pattern");
}

#[test]
fn test_resolution_error_display() {
    let err = DepcovError::Resolution {
        message: "missing pom".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Could not retrieve dependency metadata for project: missing pom"
    );
}

#[test]
fn test_pom_error_display() {
    let err = DepcovError::Pom {
        message: "unexpected eof".to_string(),
    };
    assert_eq!(err.to_string(), "POM error: unexpected eof");
}

#[test]
fn test_network_error_display() {
    let err = DepcovError::Network {
        message: "timeout".to_string(),
    };
    assert_eq!(err.to_string(), "Network error: timeout");
}

#[test]
fn test_violation_error_display_is_verbatim() {
    let err = DepcovError::Violation {
        message: "Found 2 missing runtime dependencies".to_string(),
    };
    assert_eq!(err.to_string(), "Found 2 missing runtime dependencies");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: DepcovError = io_err.into();
    assert!(matches!(err, DepcovError::Io(_)));
}
