use envlay::{overlay, Overlay, OverlayError, OverlayTarget, OverlayWarning, WithEnvOverrides};

use crate::support::{
    env, GatewayConfig, RequiresOverrideAppConfig, ServiceConfig, TestAppConfig,
};
use std::net::{Ipv4Addr, SocketAddr};

#[test]
fn non_matching_env_vars_do_not_override_properties() {
    let config = TestAppConfig::default();
    let result = overlay(&config, "TEST", &env(&[("JUNK_STRING_VALUE", "b")]), true).unwrap();

    assert_eq!(result, TestAppConfig::default());
    assert_eq!(result.untouched_value, "untouched");
}

#[test]
fn property_overrides_for_every_supported_type() {
    let result = overlay(
        &TestAppConfig::default(),
        "TEST",
        &env(&[
            ("TEST_STRING_VALUE", "b"),
            ("TEST_INT_VALUE", "2"),
            ("TEST_LONG_VALUE", "2"),
            ("TEST_CHAR_VALUE", "b"),
            ("TEST_DOUBLE_VALUE", "2.0"),
            ("TEST_ENABLED", "true"),
        ]),
        true,
    )
    .unwrap();

    assert_eq!(result.string_value, "b");
    assert_eq!(result.int_value, 2);
    assert_eq!(result.long_value, 2);
    assert_eq!(result.char_value, 'b');
    assert_eq!(result.double_value, 2.0);
    assert!(result.enabled);
    assert_eq!(result.untouched_value, "untouched");
}

#[test]
fn extra_environment_values_do_not_cause_an_error() {
    let report = Overlay::new("TEST")
        .apply(&TestAppConfig::default(), &env(&[("TEST_UNKNOWN_VALUE", "a")]))
        .unwrap();

    assert_eq!(report.value, TestAppConfig::default());
    assert_eq!(
        report.warnings,
        vec![OverlayWarning::UnknownOverrideKey {
            key: "TEST_UNKNOWN_VALUE".to_string(),
            field: "unknownValue".to_string(),
        }]
    );
}

#[test]
fn not_overriding_required_fields_fails_with_full_list() {
    let err = overlay(
        &RequiresOverrideAppConfig::default(),
        "TEST",
        &env(&[("TEST_UNKNOWN_VALUE", "a")]),
        true,
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Missing required overridden properties: stringValue, intValue. If this is a dev \
         environment, you can disable validation with Overlay::require_all_marked(false)"
    );
}

#[test]
fn required_validation_is_disabled_by_parameter() {
    let result = overlay(
        &RequiresOverrideAppConfig::default(),
        "TEST",
        &env(&[("TEST_UNKNOWN_VALUE", "a")]),
        false,
    )
    .unwrap();

    assert_eq!(result, RequiresOverrideAppConfig::default());
}

#[test]
fn overriding_required_fields_succeeds() {
    let result = RequiresOverrideAppConfig::default()
        .with_env_overrides_from(
            "TEST",
            &env(&[("TEST_STRING_VALUE", "modified"), ("TEST_INT_VALUE", "2")]),
        )
        .unwrap();

    assert_eq!(result.string_value, "modified");
    assert_eq!(result.int_value, 2);
}

#[test]
fn retry_count_example() {
    let baseline = ServiceConfig::default();
    let result = Overlay::new("MYAPP")
        .require_all_marked(false)
        .apply(&baseline, &env(&[("MYAPP_RETRY_COUNT", "5")]))
        .unwrap()
        .into_value();

    assert_eq!(result.retry_count, 5);
    assert_eq!(result.host, "localhost");
    assert_eq!(baseline.retry_count, 3);
}

#[test]
fn unparsable_timeout_fails() {
    let err = overlay(
        &ServiceConfig::default(),
        "MYAPP",
        &env(&[("MYAPP_TIMEOUT", "notanumber")]),
        false,
    )
    .unwrap_err();

    match err {
        OverlayError::InvalidOverrideValue {
            field,
            value,
            expected,
            ..
        } => {
            assert_eq!(field, "timeout");
            assert_eq!(value, "notanumber");
            assert_eq!(expected, "u64");
        }
        other => panic!("Expected InvalidOverrideValue, got {:?}", other),
    }
}

#[test]
fn invalid_value_wins_over_missing_required() {
    let err = overlay(
        &ServiceConfig::default(),
        "MYAPP",
        &env(&[("MYAPP_TIMEOUT", "-5")]),
        true,
    )
    .unwrap_err();

    assert!(matches!(err, OverlayError::InvalidOverrideValue { .. }));
}

#[test]
fn missing_api_key_is_named() {
    let err = overlay(
        &ServiceConfig::default(),
        "MYAPP",
        &env(&[("MYAPP_HOST", "db.internal")]),
        true,
    )
    .unwrap_err();

    assert_eq!(
        err,
        OverlayError::MissingRequiredOverride {
            missing: vec!["apiKey".to_string()],
        }
    );
}

#[test]
fn empty_value_clears_optional_and_counts_as_override() {
    let baseline = ServiceConfig {
        api_key: Some("old".to_string()),
        ..ServiceConfig::default()
    };
    let result = overlay(&baseline, "MYAPP", &env(&[("MYAPP_API_KEY", "")]), true).unwrap();

    assert_eq!(result.api_key, None);
    assert_eq!(baseline.api_key.as_deref(), Some("old"));
}

#[test]
fn malformed_keys_are_skipped_with_warning() {
    let report = Overlay::new("MYAPP")
        .require_all_marked(false)
        .apply(
            &ServiceConfig::default(),
            &env(&[("MYAPP_", "x"), ("MYAPPX_HOST", "y"), ("MYAPP_HOST_", "z")]),
        )
        .unwrap();

    assert_eq!(report.value.host, "z");
    let malformed: Vec<&str> = report
        .warnings
        .iter()
        .filter(|w| matches!(w, OverlayWarning::MalformedKey { .. }))
        .map(|w| w.key())
        .collect();
    assert_eq!(malformed, vec!["MYAPPX_HOST", "MYAPP_"]);
}

#[test]
fn registry_lists_env_keys() {
    let keys: Vec<String> = ServiceConfig::registry()
        .env_keys("MYAPP")
        .into_iter()
        .map(|(_, key)| key)
        .collect();

    assert_eq!(
        keys,
        vec![
            "MYAPP_RETRY_COUNT",
            "MYAPP_HOST",
            "MYAPP_TIMEOUT",
            "MYAPP_API_KEY",
        ]
    );
}

#[test]
fn string_coercible_fields_from_other_crates_are_overridden() {
    let result = overlay(
        &GatewayConfig::default(),
        "GW",
        &env(&[("GW_LISTEN", "0.0.0.0:9443"), ("GW_UPSTREAM", "192.168.1.20")]),
        true,
    )
    .unwrap();

    assert_eq!(result.listen, SocketAddr::from(([0, 0, 0, 0], 9443)));
    assert_eq!(result.upstream, Ipv4Addr::new(192, 168, 1, 20));
    assert_eq!(result.name, "edge");
}

#[test]
fn unparsable_string_coercible_value_fails() {
    let err = overlay(
        &GatewayConfig::default(),
        "GW",
        &env(&[("GW_UPSTREAM", "10.0.0.300")]),
        true,
    )
    .unwrap_err();

    match err {
        OverlayError::InvalidOverrideValue {
            field,
            value,
            expected,
            ..
        } => {
            assert_eq!(field, "upstream");
            assert_eq!(value, "10.0.0.300");
            assert_eq!(expected, "Ipv4Addr");
        }
        other => panic!("Expected InvalidOverrideValue, got {:?}", other),
    }
}

#[test]
fn parsed_required_field_is_validated() {
    let err = overlay(
        &GatewayConfig::default(),
        "GW",
        &env(&[("GW_LISTEN", "0.0.0.0:9443")]),
        true,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        OverlayError::MissingRequiredOverride { ref missing } if missing == &["upstream"]
    ));
}
