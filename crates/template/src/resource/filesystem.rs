//! Templates read from the configured template directory.
//!
//! Requested paths are relative and may only name entries below the
//! directory. Anything else, including symlinks leading out of it, is
//! reported as not found so callers never learn about files elsewhere.

use super::{ResourceProvider, SharedResourceData};
use crate::error::ResourceError;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    template_dir: PathBuf,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(template_dir: P) -> Self {
        Self {
            template_dir: template_dir.as_ref().to_path_buf(),
        }
    }

    /// Joins `path` onto the template directory, accepting only plain
    /// file name components (`.` is ignored).
    fn locate(&self, path: &str) -> Option<PathBuf> {
        let mut located = self.template_dir.clone();
        let mut depth = 0;
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => {
                    located.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        (depth > 0).then_some(located)
    }

    /// Symlinked entries must still resolve inside the template directory.
    fn stays_inside(&self, located: &Path) -> std::io::Result<bool> {
        let dir = self.template_dir.canonicalize()?;
        Ok(located.canonicalize()?.starts_with(dir))
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let not_found = || ResourceError::NotFound(path.to_string());
        let load_failed = |e: std::io::Error| ResourceError::LoadFailed {
            path: path.to_string(),
            message: e.to_string(),
        };

        let Some(located) = self.locate(path) else {
            log::warn!("Rejected template path '{}' outside the template directory", path);
            return Err(not_found());
        };

        match self.stays_inside(&located) {
            Ok(true) => {}
            Ok(false) => {
                log::warn!("Template '{}' links outside the template directory", path);
                return Err(not_found());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(load_failed(e)),
        }

        if !located.is_file() {
            return Err(not_found());
        }
        std::fs::read(&located).map(Arc::new).map_err(load_failed)
    }

    fn name(&self) -> &'static str {
        "template directory"
    }
}
