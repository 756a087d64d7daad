//! Tests for command-line and environment configuration.

use clap::Parser;
use houseqi::Variant;
use houseqi_server::{Cli, ServerConfig};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

#[test]
fn test_cli_arguments_build_config() {
    let cli = Cli::try_parse_from([
        "houseqi",
        "--port",
        "5000",
        "--host",
        "127.0.0.1",
        "--variant",
        "single",
        "--subscriber-buffer",
        "8",
        "--keep-alive-secs",
        "30",
    ])
    .expect("arguments parse");
    let config = ServerConfig::try_from(cli).expect("valid config");

    assert_eq!(*config.port(), 5000);
    assert_eq!(*config.host(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(*config.variant(), Variant::Single);
    assert_eq!(*config.subscriber_buffer(), 8);
    assert_eq!(*config.keep_alive(), Duration::from_secs(30));
    assert_eq!(config.addr().to_string(), "127.0.0.1:5000");
    assert_eq!(config.actor_config().subscriber_buffer, 8);
}

#[test]
fn test_unknown_variant_is_rejected() {
    let result = Cli::try_parse_from(["houseqi", "--variant", "triple"]);
    assert!(result.is_err());
}

#[test]
fn test_zero_subscriber_buffer_is_rejected() {
    let cli = Cli::try_parse_from(["houseqi", "--subscriber-buffer", "0"]).expect("parses");
    let err = ServerConfig::try_from(cli).expect_err("zero buffer");
    assert!(err.message.contains("subscriber buffer"));
}

#[test]
fn test_zero_keep_alive_is_rejected() {
    let config = ServerConfig::new(
        IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        4000,
        Variant::Table,
        32,
        Duration::ZERO,
    );
    assert!(config.validate().is_err());
}

#[test]
fn test_default_config_listens_on_port_4000() {
    let config = ServerConfig::default().validate().expect("defaults are valid");
    assert_eq!(config.addr().port(), 4000);
    assert_eq!(*config.variant(), Variant::Table);
}
