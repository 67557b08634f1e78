use super::*;

#[test]
fn test_defaults_when_sections_missing() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.butler.name, "Butler");
    assert_eq!(cfg.butler.timezone, "Europe/Moscow");
    assert_eq!(cfg.scheduler.poll_interval_secs, 60);
    assert!(cfg.scheduler.enabled);
    assert_eq!(cfg.weather.location, "56.313398,44.051441");
    assert_eq!(cfg.memory.db_path, "~/.butler/data/butler.db");
    assert!(cfg.channel.telegram.is_none());
}

#[test]
fn test_telegram_section_from_toml() {
    let toml_str = r#"
        [channel.telegram]
        bot_token = "123:abc"
        allowed_users = [42, 7]
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    let tg = cfg.channel.telegram.unwrap();
    assert!(tg.enabled, "enabled defaults to true");
    assert_eq!(tg.bot_token, "123:abc");
    assert_eq!(tg.allowed_users, vec![42, 7]);
}

#[test]
fn test_partial_weather_section_keeps_defaults() {
    let toml_str = r#"
        [weather]
        api_key = "k"
        lang = "ru"
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.weather.api_key, "k");
    assert_eq!(cfg.weather.lang, "ru");
    assert_eq!(
        cfg.weather.base_url,
        "https://api.weatherapi.com/v1/forecast.json"
    );
}

#[test]
fn test_env_overrides_fill_credentials() {
    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg, |key| match key {
        TELEGRAM_TOKEN_ENV => Some(" 999:token ".to_string()),
        WEATHER_TOKEN_ENV => Some("weather-key".to_string()),
        _ => None,
    });
    assert_eq!(cfg.channel.telegram.unwrap().bot_token, "999:token");
    assert_eq!(cfg.weather.api_key, "weather-key");
}

#[test]
fn test_empty_env_does_not_clobber_file_values() {
    let mut cfg: Config = toml::from_str(
        r#"
        [channel.telegram]
        bot_token = "from-file"
        [weather]
        api_key = "file-key"
    "#,
    )
    .unwrap();
    apply_env_overrides(&mut cfg, |_| Some("  ".to_string()));
    assert_eq!(cfg.channel.telegram.unwrap().bot_token, "from-file");
    assert_eq!(cfg.weather.api_key, "file-key");
}

#[test]
fn test_timezone_validation() {
    let mut cfg = ButlerConfig::default();
    assert!(cfg.tz().is_ok());
    cfg.timezone = "Mars/Olympus".to_string();
    assert!(matches!(cfg.tz(), Err(ButlerError::Config(_))));
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = parse_file(Path::new("/nonexistent/__butler_config__.toml")).unwrap();
    assert_eq!(cfg.butler.log_level, "info");
}

#[test]
fn test_shellexpand_leaves_plain_paths() {
    assert_eq!(shellexpand("/tmp/butler.db"), "/tmp/butler.db");
    assert_eq!(shellexpand(":memory:"), ":memory:");
}
