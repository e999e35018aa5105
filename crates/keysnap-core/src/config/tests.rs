use super::*;

#[test]
fn default_config_validates() {
    // Act
    let settings = Config::default().validate().unwrap();

    // Assert
    assert!(settings.snap.enabled);
    assert_eq!(settings.snap.gesture.key, 0xA0);
    assert_eq!(settings.snap.gesture.presses, 3);
    assert_eq!(settings.snap.gesture.interval, Duration::from_millis(1050));
    assert_eq!(settings.snap.width_pct, 76);
    assert_eq!(settings.explorer.mode, PollMode::OneShot);
    assert_eq!(settings.explorer.poll_interval, Duration::from_secs(4));
    assert_eq!(settings.explorer.window_match.class, "CabinetWClass");
    assert_eq!(settings.explorer.hotkey.len(), 1);
}

#[test]
fn partial_toml_uses_defaults_for_missing_sections() {
    // Arrange
    let toml_str = "[snap]\npresses = 2\n";

    // Act
    let config = parse(toml_str).unwrap();

    // Assert
    assert_eq!(config.snap.presses, 2);
    assert_eq!(config.snap.interval_ms, 1050);
    assert_eq!(config.explorer, ExplorerConfig::default());
}

#[test]
fn mode_uses_kebab_case() {
    // Arrange
    let toml_str = "[explorer]\nmode = \"repeated\"\n";

    // Act
    let config = parse(toml_str).unwrap();

    // Assert
    assert_eq!(config.explorer.mode, PollMode::Repeated);
    assert!(parse("[explorer]\nmode = \"one-shot\"\n").is_ok());
    assert!(parse("[explorer]\nmode = \"sometimes\"\n").is_err());
}

#[test]
fn single_press_is_rejected() {
    // Arrange
    let mut config = Config::default();
    config.snap.presses = 1;

    // Act
    let result = config.validate();

    // Assert
    assert_eq!(result, Err(ConfigError::TooFewPresses(1)));
}

#[test]
fn huge_press_count_is_rejected() {
    // Arrange
    let mut config = Config::default();
    config.snap.presses = u32::MAX;

    // Act
    let result = config.validate();

    // Assert
    assert_eq!(
        result,
        Err(ConfigError::TooManyPresses {
            value: u32::MAX,
            max: MAX_PRESSES
        })
    );
}

#[test]
fn longest_press_run_builds_a_detector() {
    // Arrange
    let mut config = Config::default();
    config.snap.presses = MAX_PRESSES;

    // Act
    let settings = config.validate().unwrap();
    let detector = crate::GestureDetector::new(settings.snap.gesture);

    // Assert
    assert_eq!(detector.config().presses, MAX_PRESSES as usize);
    assert_eq!(detector.pending(), 0);
}

#[test]
fn zero_intervals_are_rejected() {
    // Arrange
    let mut snap = Config::default();
    snap.snap.interval_ms = 0;
    let mut explorer = Config::default();
    explorer.explorer.poll_interval_ms = 0;

    // Act / Assert
    assert_eq!(
        snap.validate(),
        Err(ConfigError::NotPositive("snap.interval_ms"))
    );
    assert_eq!(
        explorer.validate(),
        Err(ConfigError::NotPositive("explorer.poll_interval_ms"))
    );
}

#[test]
fn debounce_must_be_shorter_than_interval() {
    // Arrange
    let mut config = Config::default();
    config.snap.interval_ms = 100;
    config.snap.debounce_ms = 100;

    // Act / Assert
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DebounceTooLong { .. })
    ));
}

#[test]
fn percentages_outside_range_are_rejected() {
    // Arrange
    let mut zero = Config::default();
    zero.snap.width_pct = 0;
    let mut huge = Config::default();
    huge.snap.height_pct = 300;

    // Act / Assert
    assert!(matches!(
        zero.validate(),
        Err(ConfigError::Percentage { field: "snap.width_pct", .. })
    ));
    assert!(matches!(
        huge.validate(),
        Err(ConfigError::Percentage { value: 300, .. })
    ));
}

#[test]
fn unknown_gesture_key_is_rejected() {
    // Arrange
    let mut config = Config::default();
    config.snap.key = "hyper".into();

    // Act / Assert
    assert_eq!(
        config.validate(),
        Err(ConfigError::UnknownKey("hyper".into()))
    );
}

#[test]
fn disabled_sections_are_still_validated() {
    // Arrange
    let mut config = Config::default();
    config.explorer.enabled = false;
    config.explorer.hotkey = "ctrl+".into();

    // Act / Assert
    assert!(config.validate().is_err());
}

#[test]
fn blank_title_filter_means_no_filter() {
    // Arrange
    let mut config = Config::default();
    config.explorer.match_title = Some("   ".into());

    // Act
    let settings = config.validate().unwrap();

    // Assert
    assert_eq!(settings.explorer.window_match.title, None);
}

#[test]
fn empty_match_class_is_rejected() {
    // Arrange
    let mut config = Config::default();
    config.explorer.match_class = " ".into();

    // Act / Assert
    assert_eq!(config.validate(), Err(ConfigError::EmptyMatch));
}

#[test]
fn request_carries_repeat_and_delay() {
    // Arrange
    let mut config = Config::default();
    config.explorer.repeat = 5;
    config.explorer.repeat_delay_ms = 100;
    let settings = config.validate().unwrap();

    // Act
    let request = settings.explorer.request();

    // Assert
    assert_eq!(request.repeat, 5);
    assert_eq!(request.delay, Duration::from_millis(100));
    assert!(request.restore_focus);
}

#[test]
fn config_roundtrips_through_toml() {
    // Arrange
    let mut config = Config::default();
    config.explorer.match_title = Some("Downloads".into());

    // Act
    let serialized = toml::to_string(&config).unwrap();
    let deserialized = parse(&serialized).unwrap();

    // Assert
    assert_eq!(deserialized, config);
}
