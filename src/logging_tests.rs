use super::*;

#[test]
fn test_log_config_default() {
    let config = LogConfig::default();
    assert_eq!(config.log_level, Level::INFO);
    assert!(!config.json_format);
    assert!(config.log_dir.ends_with(".vendor-ledger/logs"));
}

#[test]
fn test_log_file_joins_filename() {
    let config = LogConfig {
        log_dir: PathBuf::from("/var/log/ledger"),
        ..LogConfig::default()
    };
    assert_eq!(
        config.log_file(),
        PathBuf::from("/var/log/ledger/vendor-ledger.log")
    );
}

#[test]
fn test_parse_rotation_hourly() {
    // Rotation has no PartialEq; compare debug output.
    let debug = format!("{:?}", parse_rotation("HOURLY"));
    assert_eq!(debug, format!("{:?}", Rotation::HOURLY));
}

#[test]
fn test_parse_rotation_never() {
    let debug = format!("{:?}", parse_rotation("never"));
    assert_eq!(debug, format!("{:?}", Rotation::NEVER));
}

#[test]
fn test_parse_rotation_unknown_defaults_to_daily() {
    let debug = format!("{:?}", parse_rotation("weekly"));
    assert_eq!(debug, format!("{:?}", Rotation::DAILY));
}

#[test]
fn test_log_filename_constant() {
    assert_eq!(LOG_FILENAME, "vendor-ledger.log");
}

#[test]
fn test_console_ansi_only_on_terminal() {
    assert!(console_ansi(true, None));
    assert!(!console_ansi(false, None));
}

#[test]
fn test_console_ansi_respects_no_color() {
    assert!(!console_ansi(true, Some(std::ffi::OsStr::new("1"))));
    assert!(console_ansi(true, Some(std::ffi::OsStr::new(""))));
}

#[test]
fn test_log_file_path_first_set_wins() {
    set_log_file_path("/tmp/first/vendor-ledger.log".to_string());
    set_log_file_path("/tmp/second/vendor-ledger.log".to_string());
    assert_eq!(get_log_file_path(), "/tmp/first/vendor-ledger.log");
}
