//! Reading and writing scene files.
//!
//! The format is picked from the file extension: `.yaml`/`.yml` or `.json`.

use std::path::Path;

use farspace_kernel::UniverseError;

use crate::description::{SCENE_SCHEMA_VERSION, SceneDescription};

/// Errors from loading, saving or building a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported scene file extension: {0:?}")]
    UnsupportedFormat(String),
    #[error("duplicate body name: {0}")]
    DuplicateName(String),
    #[error("body {body} orbits unknown parent {parent}")]
    UnknownParent { body: String, parent: String },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error(transparent)]
    Universe(#[from] UniverseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Yaml,
    Json,
}

impl SceneFormat {
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(SceneError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl SceneDescription {
    pub fn from_yaml_str(s: &str) -> Result<Self, SceneError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn to_yaml(&self) -> Result<String, SceneError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a scene file. The schema version is checked here as well as in
    /// [`SceneDescription::build`], so a stale file fails before anything is
    /// spawned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let format = SceneFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        let scene = match format {
            SceneFormat::Yaml => Self::from_yaml_str(&text)?,
            SceneFormat::Json => Self::from_json_str(&text)?,
        };
        if scene.schema_version != SCENE_SCHEMA_VERSION {
            return Err(SceneError::SchemaMismatch {
                file_version: scene.schema_version,
                expected_version: SCENE_SCHEMA_VERSION,
            });
        }
        tracing::debug!(path = %path.display(), bodies = scene.bodies.len(), "scene loaded");
        Ok(scene)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let text = match SceneFormat::from_path(path)? {
            SceneFormat::Yaml => self.to_yaml()?,
            SceneFormat::Json => self.to_json()?,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, text)?;
        tracing::debug!(path = %path.display(), "scene saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(SceneFormat::from_path(Path::new("a.yaml")).unwrap(), SceneFormat::Yaml);
        assert_eq!(SceneFormat::from_path(Path::new("a.YML")).unwrap(), SceneFormat::Yaml);
        assert_eq!(SceneFormat::from_path(Path::new("dir/a.json")).unwrap(), SceneFormat::Json);
        assert!(matches!(
            SceneFormat::from_path(Path::new("a.toml")),
            Err(SceneError::UnsupportedFormat(_))
        ));
        assert!(SceneFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn save_and_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes").join("demo.yaml");
        let scene = SceneDescription::demo();
        scene.save(&path).unwrap();

        let loaded = SceneDescription::load(&path).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.json");
        let scene = SceneDescription::demo();
        scene.save(&path).unwrap();

        let loaded = SceneDescription::load(&path).unwrap();
        assert_eq!(loaded, scene);
        let universe = loaded.build().unwrap();
        assert!(universe.find_by_name("moon").is_some());
    }

    #[test]
    fn minimal_file_uses_defaults() {
        let scene = SceneDescription::from_yaml_str("bodies:\n  - name: lonely\n").unwrap();
        assert_eq!(scene.schema_version, SCENE_SCHEMA_VERSION);
        assert_eq!(scene.space.sector_size, 1.0e6);
        assert_eq!(scene.bodies[0].name, "lonely");
        assert!(scene.bodies[0].orbit.is_none());
    }

    #[test]
    fn load_rejects_future_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.json");
        std::fs::write(&path, r#"{ "schema_version": 2, "bodies": [] }"#).unwrap();
        assert!(matches!(
            SceneDescription::load(&path),
            Err(SceneError::SchemaMismatch { file_version: 2, .. })
        ));
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "bodies: [ {").unwrap();
        assert!(matches!(SceneDescription::load(&path), Err(SceneError::Yaml(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(matches!(SceneDescription::load(&path), Err(SceneError::Io(_))));
    }
}
