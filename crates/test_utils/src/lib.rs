use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

pub(crate) static WORKSPACE_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let mut current = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    loop {
        if current.join("Cargo.toml").exists() {
            let cargo_toml = std::fs::read_to_string(current.join("Cargo.toml"))
                .expect("Failed to read Cargo.toml");
            if cargo_toml.contains("[workspace]") {
                return current;
            }
        }

        current = current
            .parent()
            .expect("Could not find workspace root")
            .to_path_buf();
    }
});

/// Extension of declaration tree fixtures
pub const FIXTURE_EXTENSION: &str = "json";

pub fn test_data_path() -> PathBuf {
    WORKSPACE_ROOT.join("test_data")
}

/// Get the path to a test fixture file relative to the test_data directory
///
/// ## Arguments
/// * `name` - The relative path to the fixture file (e.g., "nesting/packet.json")
pub fn fixture_path(name: &str) -> PathBuf {
    test_data_path().join(name)
}

/// Read the contents of a test fixture file
///
/// ## Arguments
/// * `name` - The relative path to the fixture file (e.g., "nesting/packet.json")
pub fn read_fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture '{}': {}", path.display(), e))
}

/// Discover all declaration tree fixtures in the test_data directory
///
/// ## Returns
/// A vector of tuples containing (relative_path, file_stem) for each fixture,
/// sorted by path
pub fn discover_all_fixtures() -> Vec<(String, String)> {
    let test_data = test_data_path();
    let mut fixtures = Vec::new();
    discover_fixtures_recursive(&test_data, &test_data, &mut fixtures);
    fixtures.sort();
    fixtures
}

fn discover_fixtures_recursive(
    base_path: &Path,
    current_path: &Path,
    fixtures: &mut Vec<(String, String)>,
) {
    if let Ok(entries) = std::fs::read_dir(current_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                discover_fixtures_recursive(base_path, &path, fixtures);
            } else if path.extension().and_then(|s| s.to_str()) == Some(FIXTURE_EXTENSION) {
                if let Ok(relative_path) = path.strip_prefix(base_path) {
                    let relative_str = relative_path.to_string_lossy().replace('\\', "/");
                    let file_stem = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("unknown")
                        .to_string();
                    fixtures.push((relative_str, file_stem));
                }
            }
        }
    }
}

/// Install a test-friendly tracing subscriber
///
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
