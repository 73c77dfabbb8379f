use std::path::PathBuf;

use crate::EmitFormat;

/// A flatgen project resolved from its manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Path to the project manifest (flatgen.toml)
    pub manifest_path: PathBuf,
    /// Root directory of the project
    pub root_directory: PathBuf,
    /// Name of the project
    pub name: String,
    /// Input declaration tree, relative to the root directory
    pub input: PathBuf,
    /// Output file, relative to the root directory
    pub output: Option<PathBuf>,
    pub emit: EmitFormat,
}

impl Project {
    /// Absolute path of the input declaration tree
    pub fn input_path(&self) -> PathBuf {
        self.root_directory.join(&self.input)
    }

    /// Absolute path of the output file, if the project writes one
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output
            .as_ref()
            .map(|output| self.root_directory.join(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(output: Option<&str>) -> Project {
        Project {
            manifest_path: PathBuf::from("/work/ffmpeg/flatgen.toml"),
            root_directory: PathBuf::from("/work/ffmpeg"),
            name: "ffmpeg".to_string(),
            input: PathBuf::from("decls/ffmpeg.json"),
            output: output.map(PathBuf::from),
            emit: EmitFormat::Listing,
        }
    }

    #[test]
    fn test_paths_resolve_against_root() {
        let project = project(Some("out/units.txt"));
        assert_eq!(
            project.input_path(),
            PathBuf::from("/work/ffmpeg/decls/ffmpeg.json")
        );
        assert_eq!(
            project.output_path(),
            Some(PathBuf::from("/work/ffmpeg/out/units.txt"))
        );
    }

    #[test]
    fn test_absolute_input_is_kept() {
        let mut project = project(None);
        project.input = PathBuf::from("/shared/decls.json");
        assert_eq!(project.input_path(), PathBuf::from("/shared/decls.json"));
        assert_eq!(project.output_path(), None);
    }
}
