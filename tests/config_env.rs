/// Environment-driven locator options
///
/// Environment variables are process-wide, so every test here runs serially.

use ferrous_locator::{LocatorOptions, ResolveError, DEFAULT_ENV_PREFIX};
use serial_test::serial;
use std::env;

const DEPTH_VAR: &str = "FERROUS_LOCATOR_MAX_RESOLUTION_DEPTH";
const CYCLES_VAR: &str = "FERROUS_LOCATOR_DETECT_CYCLES";

fn clear() {
    env::remove_var(DEPTH_VAR);
    env::remove_var(CYCLES_VAR);
    env::remove_var("MYAPP_MAX_RESOLUTION_DEPTH");
    env::remove_var("MYAPP_DETECT_CYCLES");
}

#[test]
#[serial]
fn test_defaults_when_unset() {
    clear();
    assert_eq!(DEFAULT_ENV_PREFIX, "FERROUS_LOCATOR");
    assert_eq!(LocatorOptions::from_env().unwrap(), LocatorOptions::default());
}

#[test]
#[serial]
fn test_reads_depth_and_cycles() {
    clear();
    env::set_var(DEPTH_VAR, " 32 ");
    env::set_var(CYCLES_VAR, "off");

    let options = LocatorOptions::from_env().unwrap();
    assert_eq!(options.max_resolution_depth, 32);
    assert!(!options.detect_cycles);
    clear();
}

#[test]
#[serial]
fn test_custom_prefix() {
    clear();
    env::set_var("MYAPP_MAX_RESOLUTION_DEPTH", "16");
    // The default-prefixed variable is ignored under a custom prefix
    env::set_var(DEPTH_VAR, "99");

    let options = LocatorOptions::from_env_with_prefix("myapp").unwrap();
    assert_eq!(options.max_resolution_depth, 16);
    assert!(options.detect_cycles);
    clear();
}

#[test]
#[serial]
fn test_invalid_depth_is_rejected() {
    clear();
    env::set_var(DEPTH_VAR, "deep");
    assert!(matches!(
        LocatorOptions::from_env(),
        Err(ResolveError::InvalidOptions(msg)) if msg.contains("MAX_RESOLUTION_DEPTH")
    ));

    env::set_var(DEPTH_VAR, "0");
    assert!(matches!(
        LocatorOptions::from_env(),
        Err(ResolveError::InvalidOptions(_))
    ));
    clear();
}

#[test]
#[serial]
fn test_invalid_bool_is_rejected() {
    clear();
    env::set_var(CYCLES_VAR, "sometimes");
    assert!(matches!(
        LocatorOptions::from_env(),
        Err(ResolveError::InvalidOptions(msg)) if msg.contains("DETECT_CYCLES")
    ));
    clear();
}
