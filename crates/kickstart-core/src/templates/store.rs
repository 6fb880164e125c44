//! Template loading from a local directory or a zip bundle
//!
//! Both sources are read fully into memory up front, so a render never
//! touches the template root while it is writing output.

use super::manifest::{TemplateManifest, TEMPLATE_MANIFEST_FILE};
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::product::ProductConfig;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Template source - either a directory tree or a zip bundle of one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl TemplateSource {
    /// Pick the source kind from the path: `.zip` files are archives
    pub fn detect(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_zip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if is_zip {
            Self::Archive(path)
        } else {
            Self::Directory(path)
        }
    }

    /// Resolve the source for a product: explicit path, then env var, then default
    pub fn from_config<C: ProductConfig>(config: &C, explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::detect(path);
        }
        match std::env::var(config.template_dir_env()) {
            Ok(path) if !path.trim().is_empty() => Self::detect(path),
            _ => Self::detect(config.default_template_dir()),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::Archive(path) => path,
        }
    }
}

/// In-memory template tree keyed by `/`-separated relative path
#[derive(Debug, Clone)]
pub struct TemplateStore {
    source: TemplateSource,
    manifest: TemplateManifest,
    files: HashMap<String, Arc<[u8]>>,
}

impl TemplateStore {
    /// Load every file of the template source
    pub fn open(source: &TemplateSource) -> ScaffoldResult<Self> {
        let mut files = match source {
            TemplateSource::Directory(dir) => Self::read_dir(dir)?,
            TemplateSource::Archive(path) => {
                let bytes = std::fs::read(path).map_err(|e| ScaffoldError::TemplateLoad {
                    path: path.clone(),
                    source: e,
                })?;
                Self::read_zip(&bytes)?
            }
        };

        let manifest_bytes = files.remove(TEMPLATE_MANIFEST_FILE).ok_or_else(|| {
            ScaffoldError::TemplateManifest(format!(
                "{} not found in {}",
                TEMPLATE_MANIFEST_FILE,
                source.path().display()
            ))
        })?;
        let manifest = TemplateManifest::parse(&String::from_utf8_lossy(&manifest_bytes))?;

        Ok(Self {
            source: source.clone(),
            manifest,
            files,
        })
    }

    /// Build a store from in-memory files (the manifest is given separately)
    pub fn from_files(
        manifest: TemplateManifest,
        files: impl IntoIterator<Item = (String, Vec<u8>)>,
    ) -> Self {
        Self {
            source: TemplateSource::Directory(PathBuf::new()),
            manifest,
            files: files
                .into_iter()
                .map(|(path, bytes)| (path, Arc::from(bytes)))
                .collect(),
        }
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Fetch a template file's bytes
    pub fn get(&self, path: &str) -> ScaffoldResult<Arc<[u8]>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ScaffoldError::TemplateMissing {
                path: path.to_string(),
            })
    }

    /// Fetch a template file as UTF-8 text
    pub fn get_text(&self, path: &str) -> ScaffoldResult<String> {
        let bytes = self.get(path)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ScaffoldError::InvalidTemplate {
            path: path.to_string(),
            reason: "file is not valid UTF-8".to_string(),
        })
    }

    /// Bundle a template directory into an in-memory zip
    pub fn build_zip(template_dir: &Path) -> ScaffoldResult<Vec<u8>> {
        let files = Self::read_dir(template_dir)?;
        if !files.contains_key(TEMPLATE_MANIFEST_FILE) {
            return Err(ScaffoldError::TemplateManifest(format!(
                "{} not found in {}",
                TEMPLATE_MANIFEST_FILE,
                template_dir.display()
            )));
        }

        // Stable entry order keeps the bundle reproducible
        let mut paths: Vec<&String> = files.keys().collect();
        paths.sort();

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            for path in paths {
                zip.start_file(path.as_str(), options)?;
                zip.write_all(&files[path])
                    .map_err(|e| ScaffoldError::Archive(e.into()))?;
            }

            zip.finish()?;
        }

        Ok(zip_buffer)
    }

    fn read_dir(dir: &Path) -> ScaffoldResult<HashMap<String, Arc<[u8]>>> {
        if !dir.is_dir() {
            return Err(ScaffoldError::TemplateLoad {
                path: dir.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "template directory not found",
                ),
            });
        }

        let mut files = HashMap::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(|e| ScaffoldError::TemplateLoad {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(dir)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let content = std::fs::read(entry.path()).map_err(|e| ScaffoldError::TemplateLoad {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            files.insert(relative, Arc::from(content));
        }

        Ok(files)
    }

    fn read_zip(zip_bytes: &[u8]) -> ScaffoldResult<HashMap<String, Arc<[u8]>>> {
        let mut archive = ZipArchive::new(Cursor::new(zip_bytes))?;
        let mut files = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let path = file.name().to_string();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .map_err(|e| ScaffoldError::Archive(e.into()))?;
            files.insert(path, Arc::from(contents));
        }

        Ok(files)
    }
}
