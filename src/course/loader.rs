//! Course directory loading.
//!
//! Loading is tolerant by policy: a partial course definition is a normal
//! state during authoring. A missing file becomes an empty section with a
//! warning; a file that fails to parse becomes an empty section whose
//! failure is recorded for the validator to report as an error. Only a
//! missing course directory or a non-NotFound read failure aborts the load.

use std::io;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, warn};

use crate::course::documents::{CourseDocuments, Section};
use crate::error::Result;

/// One-shot reader for the expected course file set.
#[derive(Debug, Clone)]
pub struct CourseDataLoader {
    dir: PathBuf,
}

impl CourseDataLoader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read every expected file in the course directory.
    pub fn load(&self) -> Result<CourseDocuments> {
        if !self.dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("course directory not found: {}", self.dir.display()),
            )
            .into());
        }

        let mut docs = CourseDocuments::new();
        for section in Section::ALL {
            let path = self.dir.join(section.file_name());
            match std::fs::read_to_string(&path) {
                Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                    Ok(value) if value.is_object() => {
                        debug!("loaded {}", path.display());
                        docs.set(section, value);
                    }
                    Ok(_) => {
                        warn!("{}: root is not a JSON object, using empty document", path.display());
                        docs.mark_parse_failed(section, "root is not a JSON object");
                    }
                    Err(err) => {
                        warn!("{}: parse failed ({err}), using empty document", path.display());
                        docs.mark_parse_failed(section, err.to_string());
                    }
                },
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    warn!("{} not found, treating section as empty", path.display());
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.log_unrecognized_files();
        Ok(docs)
    }

    /// Extra `*.json` files in the directory are not an error, but worth a
    /// trace for the author chasing a typoed file name.
    fn log_unrecognized_files(&self) {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(".json")
                && !Section::ALL.iter().any(|s| s.file_name() == name)
            {
                debug!("ignoring unrecognized file {name}");
            }
        }
    }
}
