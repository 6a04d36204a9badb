use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_effective_level() {
    let settings = LoggingSettings::default();
    assert_eq!(effective_level(&settings, None), "info");
    assert_eq!(effective_level(&settings, Some("debug")), "debug");
}

#[test]
fn test_configured_dir_is_used() {
    let settings = LoggingSettings {
        dir: Some(PathBuf::from("/var/log/climux")),
        ..LoggingSettings::default()
    };
    assert_eq!(
        file_log_dir(&settings),
        Some(PathBuf::from("/var/log/climux"))
    );
}
