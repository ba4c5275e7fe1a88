use std::env;
use std::fs;
use std::path::Path;

/// Variables read by `AppConfig::from_env` through `option_env!`
const CONFIG_KEYS: &[&str] = &[
    "API_BASE_URL",
    "REQUEST_TIMEOUT_MS",
    "ENABLE_LOGGING",
    "LOGIN_PATH",
    "HOME_PATH",
    "CSRF_COOKIE_NAME",
    "CSRF_HEADER_NAME",
    "SESSION_STORAGE_KEY",
];

fn main() {
    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    // Load .env into rustc-env so option_env! sees it at compile time
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    // The real environment wins over .env
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
}
