mod discovery;
mod manifest;
mod model;

pub use discovery::{discover_project, find_project_manifest, load_project_from_manifest};
pub use manifest::{EmitFormat, ProjectManifest, MANIFEST_FILE_NAME};
pub use model::Project;
