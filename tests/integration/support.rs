use envlay::overlay_fields;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, PartialEq)]
pub struct TestAppConfig {
    pub untouched_value: String,
    pub string_value: String,
    pub int_value: i32,
    pub long_value: i64,
    pub char_value: char,
    pub double_value: f64,
    pub enabled: bool,
}

impl Default for TestAppConfig {
    fn default() -> Self {
        Self {
            untouched_value: "untouched".to_string(),
            string_value: "test".to_string(),
            int_value: 1,
            long_value: 1,
            char_value: 'a',
            double_value: 1.3,
            enabled: false,
        }
    }
}

overlay_fields!(TestAppConfig {
    untouched_value: String,
    string_value: String,
    int_value: i32,
    long_value: i64,
    char_value: char,
    double_value: f64,
    enabled: bool,
});

#[derive(Debug, Clone, PartialEq)]
pub struct RequiresOverrideAppConfig {
    pub untouched_value: String,
    pub string_value: String,
    pub int_value: i32,
}

impl Default for RequiresOverrideAppConfig {
    fn default() -> Self {
        Self {
            untouched_value: "untouched".to_string(),
            string_value: "test".to_string(),
            int_value: 1,
        }
    }
}

overlay_fields!(RequiresOverrideAppConfig {
    untouched_value: String,
    #[required]
    string_value: String,
    #[required]
    int_value: i32,
});

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub retry_count: u32,
    pub host: String,
    pub timeout: u64,
    pub api_key: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            retry_count: 3,
            host: "localhost".to_string(),
            timeout: 10,
            api_key: None,
        }
    }
}

overlay_fields!(ServiceConfig {
    retry_count: u32,
    host: String,
    timeout: u64,
    #[required]
    api_key: Option<String>,
});

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub name: String,
    pub listen: SocketAddr,
    pub upstream: Ipv4Addr,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            name: "edge".to_string(),
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            upstream: Ipv4Addr::new(10, 0, 0, 1),
        }
    }
}

overlay_fields!(GatewayConfig {
    name: String,
    #[parse]
    listen: SocketAddr,
    #[required]
    #[parse]
    upstream: Ipv4Addr,
});

pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
