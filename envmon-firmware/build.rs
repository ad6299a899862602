//! Build script for envmon-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates monitor.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const KNOWN_SECTIONS: &[&str] = &["bus", "i2c", "sensor", "display", "indicator", "console"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate monitor.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=monitor.toml");

    let config_path = Path::new("monitor.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail(
            "Failed to read monitor.toml",
            &[format!("{}", e), "Create monitor.toml in the envmon-firmware directory".into()],
        ),
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in monitor.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();

    if let Some(table) = config.as_table() {
        for name in table.keys() {
            if !KNOWN_SECTIONS.contains(&name.as_str()) {
                errors.push(format!("unknown section [{}]", name));
            }
        }
    }

    check_int(&config, "bus", "frequency_hz", 10_000, 1_000_000, &mut errors);
    check_int(&config, "bus", "write_attempts", 1, 10, &mut errors);
    check_int(&config, "bus", "retry_delay_us", 0, 100_000, &mut errors);
    check_int(&config, "sensor", "address", 0x08, 0x77, &mut errors);
    check_int(&config, "sensor", "sample_interval_ms", 100, 3_600_000, &mut errors);
    check_int(&config, "display", "address", 0x08, 0x77, &mut errors);
    check_int(&config, "display", "columns", 8, 40, &mut errors);
    check_int(&config, "display", "rows", 2, 4, &mut errors);
    check_int(&config, "indicator", "bar_leds", 0, 8, &mut errors);
    check_bool(&config, "sensor", "verify_crc", &mut errors);
    check_bool(&config, "display", "backlight", &mut errors);
    check_choice(&config, "indicator", "pattern", &["fill", "solid"], &mut errors);
    check_choice(&config, "console", "unit", &["celsius", "fahrenheit", "C", "F"], &mut errors);

    let sensor_addr = lookup(&config, "sensor", "address")
        .and_then(|v| v.as_integer())
        .unwrap_or(0x38);
    let display_addr = lookup(&config, "display", "address")
        .and_then(|v| v.as_integer())
        .unwrap_or(0x27);
    if sensor_addr == display_addr {
        errors.push(format!(
            "sensor and display share bus address {:#04x}",
            sensor_addr
        ));
    }

    if !errors.is_empty() {
        fail("Invalid configuration in monitor.toml", &errors);
    }

    println!("cargo:warning=monitor.toml validated successfully");
}

fn lookup<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section)?.get(key)
}

fn check_int(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match lookup(config, section, key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max))
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn check_bool(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(v) = lookup(config, section, key) {
        if !v.is_bool() {
            errors.push(format!("[{}] {} must be true or false", section, key));
        }
    }
}

fn check_choice(
    config: &toml::Value,
    section: &str,
    key: &str,
    choices: &[&str],
    errors: &mut Vec<String>,
) {
    match lookup(config, section, key) {
        None => {}
        Some(toml::Value::String(s)) if choices.contains(&s.as_str()) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be one of: {}",
            section,
            key,
            choices.join(", ")
        )),
    }
}

/// Abort the build with a boxed error report
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
