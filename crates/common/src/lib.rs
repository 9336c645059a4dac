pub mod utils;
pub mod logging;

use std::path::{Path, PathBuf};

/// File extensions which mark a templated field as a reference to a file on disk
/// rather than inline content.
pub const TEMPLATE_EXTENSIONS: [&str; 3] = [".yaml", ".yml", ".json"];

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("A required file was not found from any of locations: [{search_path:?}]")]
    RequiredFileMissing { search_path: Vec<PathBuf> },

    #[error("File not found: {file_name}")]
    FileNotFound { file_name: PathBuf },

    #[error("Could not read file - {file}: {source}")]
    FileNotReadable { file: PathBuf, source: std::io::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A path to an optional configuration file, e.g. the connections file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigFilePath {
    path: Option<PathBuf>,
}

impl From<&std::ffi::OsStr> for ConfigFilePath {
    fn from(s: &std::ffi::OsStr) -> Self {
        Self {
            // clap doesn't let us hook in to see the underlying `Option<&str>`, so we treat the
            // otherwise-invalid `""` as a sentinel for using the default instead.
            path: if s.is_empty() { None } else { Some(s.into()) },
        }
    }
}

impl From<&str> for ConfigFilePath {
    fn from(s: &str) -> Self {
        Self::from(std::ffi::OsStr::new(s))
    }
}

impl ConfigFilePath {
    /// Find the configuration file.
    ///
    /// A path given by the user must exist. Without one, the first existing path of
    /// `default_search_paths` is returned, or `None` if none of them exists.
    pub fn find(&self, default_search_paths: &[impl AsRef<Path>]) -> Result<Option<PathBuf>> {
        match self.path.as_deref() {
            Some(path) => resolve_path(Some(path), default_search_paths).map(|p| Some(p.to_path_buf())),
            None => match resolve_path(None, default_search_paths) {
                Ok(path) => Ok(Some(path.to_path_buf())),
                Err(Error::RequiredFileMissing { .. }) => Ok(None),
                Err(e) => Err(e),
            },
        }
    }
}

/// Check if the path can be found anywhere:
/// 1) User provides path `user_provided_path` to file -> 'Error' if not existing.
/// 2) User does not provide path to file -> search in `default_paths` and
///    take the first existing file.
/// 3) `Error` if nothing was found.
fn resolve_path<'a>(
    user_provided_path: Option<&'a Path>,
    default_paths: &'a [impl AsRef<Path> + 'a],
) -> Result<&'a Path> {
    if let Some(path) = user_provided_path {
        if path.exists() {
            return Ok(path);
        }
        return Err(Error::FileNotFound { file_name: path.to_path_buf() });
    }
    let search_paths: Vec<&Path> = default_paths.iter().map(|path| path.as_ref()).collect();
    for path in &search_paths {
        if path.exists() {
            return Ok(path);
        }
    }
    Err(Error::RequiredFileMissing {
        search_path: search_paths.into_iter().map(PathBuf::from).collect(),
    })
}

/// Returns true when a templated field names a file rather than holding content.
///
/// Multi-line values are always content, whatever their last line ends with.
pub fn is_template_file(value: &str) -> bool {
    !value.contains('\n') && TEMPLATE_EXTENSIONS.iter().any(|ext| value.ends_with(ext))
}

/// Loads the content of a templated field.
///
/// Values ending in one of [`TEMPLATE_EXTENSIONS`] are read from disk. Relative paths
/// are looked up in `search_path` first and then relative to the working directory.
/// Any other value is returned unchanged.
pub fn load_templated_source(value: &str, search_path: &[PathBuf]) -> Result<String> {
    if !is_template_file(value) {
        return Ok(value.to_string());
    }

    let file = Path::new(value);
    let candidates: Vec<PathBuf> = if file.is_absolute() {
        vec![file.to_path_buf()]
    } else {
        search_path
            .iter()
            .map(|dir| dir.join(file))
            .chain(std::iter::once(file.to_path_buf()))
            .collect()
    };
    let path = resolve_path(None, &candidates)?;
    tracing::debug!("loading templated source from file [{}]", path.display());
    std::fs::read_to_string(path).map_err(|source| Error::FileNotReadable {
        file: path.to_path_buf(),
        source,
    })
}
