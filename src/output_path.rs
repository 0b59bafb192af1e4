//! Where a converted file is written.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::format::TargetFormat;
use crate::utils::filename::{compressed_file_name, insert_suffix_before_extension};

/// The caller's choice of destination for one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputTarget {
    /// `{input dir}/{stem}-compressed.{format}`
    #[default]
    Sibling,
    /// An explicit file. Relative paths are resolved against the input's directory
    /// and must stay inside it.
    File(PathBuf),
    /// `{dir}/{stem}-compressed.{format}`; the directory is a trusted destination root.
    Directory(PathBuf),
}

/// Computes the output path for `input`.
pub fn derive_output_path(
    input: &Path,
    target: &OutputTarget,
    format: TargetFormat,
) -> Result<PathBuf, ConvertError> {
    match target {
        OutputTarget::File(output) if output.is_absolute() => Ok(normalize_lexically(output)),
        OutputTarget::File(output) => {
            let input_dir = absolute(input)?
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("/"));
            let resolved = normalize_lexically(&input_dir.join(output));
            // component-wise, so `/path/to-other` does not pass as inside `/path/to`
            if resolved.starts_with(&input_dir) {
                Ok(resolved)
            } else {
                Err(ConvertError::PathTraversalRejected(output.clone()))
            }
        }
        OutputTarget::Directory(dir) => {
            let dir = normalize_lexically(&absolute(dir)?);
            Ok(dir.join(compressed_file_name(input, format.extension())))
        }
        OutputTarget::Sibling => {
            let dir = input.parent().unwrap_or_else(|| Path::new(""));
            Ok(dir.join(compressed_file_name(input, format.extension())))
        }
    }
}

/// Gives each of `count` inputs sharing one explicit output file a distinct name:
/// `out.webp` becomes `out-1.webp`, `out-2.webp`, ... (indexing starts at 1).
/// Other targets already produce one name per input and are returned unchanged.
pub fn per_file_targets(target: &OutputTarget, count: usize) -> Vec<OutputTarget> {
    match target {
        OutputTarget::File(path) if count > 1 => (1..=count)
            .map(|i| {
                let suffix = OsString::from(format!("-{i}"));
                OutputTarget::File(insert_suffix_before_extension(path, &suffix))
            })
            .collect(),
        other => vec![other.clone(); count],
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConvertError> {
    std::path::absolute(path).map_err(|e| ConvertError::filesystem(path, e))
}

/// Resolves `.` and `..` without touching the filesystem.
/// `..` at the root stays at the root, like `path.resolve` does.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(name) => normalized.push(name),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn derive(input: &str, target: OutputTarget, format: TargetFormat) -> PathBuf {
        derive_output_path(Path::new(input), &target, format).unwrap()
    }

    #[test]
    fn sibling_with_format_extension() {
        assert_eq!(
            derive("/a/b/c.jpg", OutputTarget::Sibling, TargetFormat::Png),
            PathBuf::from("/a/b/c-compressed.png")
        );
        assert_eq!(
            derive("/path/to/image.jpg", OutputTarget::Sibling, TargetFormat::WebP),
            PathBuf::from("/path/to/image-compressed.webp")
        );
        assert_eq!(
            derive("/path/to/image.png", OutputTarget::Sibling, TargetFormat::Jpg),
            PathBuf::from("/path/to/image-compressed.jpg")
        );
        assert_eq!(
            derive("/path/to/image.webp", OutputTarget::Sibling, TargetFormat::Avif),
            PathBuf::from("/path/to/image-compressed.avif")
        );
    }

    #[test]
    fn sibling_of_bare_file_name() {
        assert_eq!(
            derive("image.jpg", OutputTarget::Sibling, TargetFormat::WebP),
            PathBuf::from("image-compressed.webp")
        );
    }

    #[test]
    fn absolute_output_is_used_as_is() {
        let target = OutputTarget::File(PathBuf::from("/custom/output/file.webp"));
        assert_eq!(
            derive("/path/to/image.jpg", target, TargetFormat::WebP),
            PathBuf::from("/custom/output/file.webp")
        );
    }

    #[test]
    fn absolute_output_is_normalized() {
        let target = OutputTarget::File(PathBuf::from("/custom/./x/../output/file.webp"));
        assert_eq!(
            derive("/path/to/image.jpg", target, TargetFormat::WebP),
            PathBuf::from("/custom/output/file.webp")
        );
    }

    #[test]
    fn relative_output_resolves_against_input_dir() {
        let target = OutputTarget::File(PathBuf::from("out.webp"));
        assert_eq!(
            derive("/path/to/image.jpg", target, TargetFormat::WebP),
            PathBuf::from("/path/to/out.webp")
        );
        let target = OutputTarget::File(PathBuf::from("nested/../sub/out.webp"));
        assert_eq!(
            derive("/path/to/image.jpg", target, TargetFormat::WebP),
            PathBuf::from("/path/to/sub/out.webp")
        );
    }

    #[test]
    fn traversal_is_rejected() {
        for escape in ["../../../etc/passwd", "../sibling.webp", "sub/../../x.webp"] {
            let target = OutputTarget::File(PathBuf::from(escape));
            let err = derive_output_path(Path::new("/path/to/image.jpg"), &target, TargetFormat::WebP)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PathTraversalRejected, "{escape}");
        }
    }

    #[test]
    fn lookalike_prefix_is_rejected() {
        let target = OutputTarget::File(PathBuf::from("../to-other/x.webp"));
        let err = derive_output_path(Path::new("/path/to/image.jpg"), &target, TargetFormat::WebP)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathTraversalRejected);
    }

    #[test]
    fn directory_target() {
        let target = OutputTarget::Directory(PathBuf::from("/out/./dir/"));
        assert_eq!(
            derive("/path/to/image.jpg", target, TargetFormat::Avif),
            PathBuf::from("/out/dir/image-compressed.avif")
        );
        // the directory is trusted, so climbing out of it is fine
        let target = OutputTarget::Directory(PathBuf::from("/out/../elsewhere"));
        assert_eq!(
            derive("/path/to/image.jpg", target, TargetFormat::Png),
            PathBuf::from("/elsewhere/image-compressed.png")
        );
    }

    #[test]
    fn normalize() {
        let cases = [
            ("/a/b/../c", "/a/c"),
            ("/a/./b/", "/a/b"),
            ("/../a", "/a"),
            ("a/../../b", "../b"),
            ("./a", "a"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_lexically(Path::new(input)), PathBuf::from(expected));
        }
    }

    #[test]
    fn test_per_file_targets() {
        let target = OutputTarget::File(PathBuf::from("out.gif"));
        assert_eq!(
            per_file_targets(&target, 2),
            vec![
                OutputTarget::File(PathBuf::from("out-1.gif")),
                OutputTarget::File(PathBuf::from("out-2.gif")),
            ],
        );

        let target = OutputTarget::File(PathBuf::from("no-extension"));
        assert_eq!(
            per_file_targets(&target, 2),
            vec![
                OutputTarget::File(PathBuf::from("no-extension-1")),
                OutputTarget::File(PathBuf::from("no-extension-2")),
            ],
        );

        let target = OutputTarget::File(PathBuf::from("single.png"));
        assert_eq!(per_file_targets(&target, 1), vec![target.clone()]);

        assert_eq!(
            per_file_targets(&OutputTarget::Sibling, 3),
            vec![OutputTarget::Sibling; 3]
        );
    }
}
