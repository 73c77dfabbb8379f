use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, trace};

use crate::{Project, ProjectManifest, MANIFEST_FILE_NAME};

/// Discovers a flatgen project from a given path
///
/// This function will:
/// 1. Search upward from the given path to find a flatgen.toml file
/// 2. Parse the manifest to get project configuration
/// 3. Return a Project struct with all necessary information
///
/// ## Arguments
/// * `start_path` - Path to start searching from (can be a file or directory)
///
/// ## Returns
/// * `Ok(Some(Project))` if a project is found
/// * `Ok(None)` if no project is found
/// * `Err` if there's an error during discovery
pub fn discover_project(start_path: &Path) -> Result<Option<Project>> {
    let manifest_path = find_project_manifest(start_path)?;

    match manifest_path {
        Some(manifest_path) => {
            debug!("Found project manifest at: {}", manifest_path.display());
            let project = load_project_from_manifest(&manifest_path)?;
            Ok(Some(project))
        }
        None => {
            trace!(
                "No project manifest found starting from: {}",
                start_path.display()
            );
            Ok(None)
        }
    }
}

/// Find the project manifest (flatgen.toml) starting from a given path
pub fn find_project_manifest(start_path: &Path) -> Result<Option<PathBuf>> {
    let start_dir = if start_path.is_file() {
        start_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Invalid file path: no parent directory"))?
    } else {
        start_path
    };

    let mut current = start_dir;

    loop {
        let manifest_path = current.join(MANIFEST_FILE_NAME);
        trace!("Looking for manifest at: {}", manifest_path.display());
        if manifest_path.is_file() {
            return Ok(Some(manifest_path));
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return Ok(None),
        }
    }
}

/// Load a project from its manifest file
pub fn load_project_from_manifest(manifest_path: &Path) -> Result<Project> {
    let manifest = ProjectManifest::from_path(manifest_path)
        .with_context(|| format!("Failed to parse manifest at {}", manifest_path.display()))?;

    let root_directory = manifest_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Manifest has no parent directory"))?
        .to_owned();

    Ok(Project {
        manifest_path: manifest_path.to_owned(),
        root_directory,
        name: manifest.name,
        input: manifest.input,
        output: manifest.output,
        emit: manifest.emit,
    })
}
