use std::path::Path;

/// Maximum allowed path length for security
const MAX_PATH_LENGTH: usize = 4096;

/// Check a user-supplied location path before it is registered.
///
/// The registry itself accepts any record; this is only applied where paths
/// come from user input.
pub fn validate_path(path: &str) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err("Path is empty".to_string());
    }

    if path.len() > MAX_PATH_LENGTH {
        return Err(format!("Path too long (max {MAX_PATH_LENGTH} bytes)"));
    }

    if path.bytes().any(|b| b == 0) {
        return Err("Path contains null bytes".to_string());
    }

    Ok(())
}

/// Validate that a path exists and is a directory
pub fn verify_directory(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Path does not exist: {}", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("Not a directory: {}", path.display()));
    }

    Ok(())
}

pub fn validate_location_path(path: &str) -> Result<(), String> {
    validate_path(path)?;
    verify_directory(Path::new(path))
}
