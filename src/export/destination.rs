//! Destination directory selection.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use crate::errors::ExportError;

/// Where the exported model goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DestinationMode {
    /// The workflow's generated-files (reports) directory.
    #[default]
    GeneratedDirectory,
    /// A user-supplied directory.
    CustomPath,
}

impl DestinationMode {
    pub const GENERATED_LABEL: &'static str = "Generated Files Directory";
    pub const CUSTOM_LABEL: &'static str = "Custom Path";

    /// Accepts the host choice labels as well as short forms (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generated files directory" | "generated" | "generated-files" | "reports" => {
                Some(DestinationMode::GeneratedDirectory)
            }
            "custom path" | "custom" | "custom-path" => Some(DestinationMode::CustomPath),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DestinationMode::GeneratedDirectory => Self::GENERATED_LABEL,
            DestinationMode::CustomPath => Self::CUSTOM_LABEL,
        }
    }
}

impl fmt::Display for DestinationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DestinationMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid destination directory option: {s}"))
    }
}

/// Pick the destination directory for `mode`.
pub fn select_destination(
    mode: DestinationMode,
    custom_path: Option<&Path>,
    generated_dir: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    match mode {
        DestinationMode::GeneratedDirectory => generated_dir
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                ExportError::Configuration(
                    "Generated Files Directory was selected as the destination directory, but the workflow declares no output directory.".into(),
                )
            }),
        DestinationMode::CustomPath => {
            let custom = custom_path
                .filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty())
                .ok_or_else(|| {
                    ExportError::Configuration(
                        "Custom Path was selected as the destination directory, but no custom path was provided.".into(),
                    )
                })?;
            absolutize(custom)
        }
    }
}

/// Absolute, lexically normalized form of `path`: leading `~` expanded,
/// relative paths joined to the current directory, `.`/`..` collapsed.
/// Symlinks are not resolved and the path need not exist.
pub fn absolutize(path: &Path) -> Result<PathBuf, ExportError> {
    let expanded = expand_home(path);
    let absolute = std::path::absolute(&expanded).map_err(|e| ExportError::Io {
        op: "resolve custom path",
        path: path.to_path_buf(),
        message: crate::fs_ops::describe_io_error(&e),
    })?;
    Ok(dunce::simplified(&normalize_lexically(&absolute)).to_path_buf())
}

fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // Popping at the root is a no-op, as `/..` is `/`.
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_labels_and_short_forms() {
        assert_eq!(DestinationMode::parse("Generated Files Directory"), Some(DestinationMode::GeneratedDirectory));
        assert_eq!(DestinationMode::parse("custom"), Some(DestinationMode::CustomPath));
        assert_eq!(DestinationMode::parse("Custom Path"), Some(DestinationMode::CustomPath));
        assert_eq!(DestinationMode::parse("Reports Directory"), None);
        assert_eq!(DestinationMode::CustomPath.to_string(), "Custom Path");
    }

    #[test]
    fn custom_mode_without_path_is_configuration_error() {
        let err = select_destination(DestinationMode::CustomPath, None, Some(Path::new("/r"))).unwrap_err();
        assert!(matches!(err, ExportError::Configuration(_)));
        let err = select_destination(DestinationMode::CustomPath, Some(Path::new("  ")), None).unwrap_err();
        assert!(matches!(err, ExportError::Configuration(_)));
    }

    #[test]
    fn generated_mode_uses_generated_dir() {
        let got = select_destination(
            DestinationMode::GeneratedDirectory,
            Some(Path::new("/ignored")),
            Some(Path::new("/w/reports")),
        )
        .unwrap();
        assert_eq!(got, PathBuf::from("/w/reports"));
    }

    #[cfg(unix)]
    #[test]
    fn custom_path_is_normalized() {
        let got = absolutize(Path::new("/data/./exports/../archive/")).unwrap();
        assert_eq!(got, PathBuf::from("/data/archive"));
        assert_eq!(absolutize(Path::new("/..")).unwrap(), PathBuf::from("/"));
    }

    #[test]
    fn relative_custom_path_becomes_absolute() {
        let got = absolutize(Path::new("exports/run1")).unwrap();
        assert!(got.is_absolute());
        assert!(got.ends_with("exports/run1"));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            let got = absolutize(Path::new("~/models")).unwrap();
            assert_eq!(got, normalize_lexically(&home.join("models")));
        }
    }
}
