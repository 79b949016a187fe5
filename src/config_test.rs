use super::*;

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: usize = env_parse("__SKETCHPAD_TEST_MISSING__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__SKETCHPAD_TEST_VALID__", "99") };
    let val: u64 = env_parse("__SKETCHPAD_TEST_VALID__", 0);
    assert_eq!(val, 99);
    unsafe { std::env::remove_var("__SKETCHPAD_TEST_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__SKETCHPAD_TEST_INVALID__", "lots") };
    let val: usize = env_parse("__SKETCHPAD_TEST_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__SKETCHPAD_TEST_INVALID__") };
}

// =============================================================================
// HistoryConfig
// =============================================================================

#[test]
fn defaults_match_constants() {
    let config = HistoryConfig::default();
    assert_eq!(config.max_size, DEFAULT_HISTORY_MAX_SIZE);
    assert_eq!(config.stroke_coalesce, Duration::from_millis(DEFAULT_STROKE_COALESCE_MS));
    assert_eq!(config.erase_coalesce, Duration::from_millis(DEFAULT_ERASE_COALESCE_MS));
    assert!(config.stroke_coalesce < config.erase_coalesce);
}

#[test]
fn from_env_reads_overrides_and_clamps_max_size() {
    unsafe {
        std::env::set_var("SKETCHPAD_HISTORY_MAX_SIZE", "0");
        std::env::set_var("SKETCHPAD_STROKE_COALESCE_MS", "5");
        std::env::set_var("SKETCHPAD_ERASE_COALESCE_MS", "120");
    }
    let config = HistoryConfig::from_env();
    unsafe {
        std::env::remove_var("SKETCHPAD_HISTORY_MAX_SIZE");
        std::env::remove_var("SKETCHPAD_STROKE_COALESCE_MS");
        std::env::remove_var("SKETCHPAD_ERASE_COALESCE_MS");
    }
    assert_eq!(config.max_size, 1);
    assert_eq!(config.stroke_coalesce, Duration::from_millis(5));
    assert_eq!(config.erase_coalesce, Duration::from_millis(120));
}

#[test]
fn with_max_size_clamps_to_one() {
    assert_eq!(HistoryConfig::default().with_max_size(0).max_size, 1);
    assert_eq!(HistoryConfig::default().with_max_size(3).max_size, 3);
}
