use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

/// Inserts `suffix` between the file stem and the extension: `out.webp` becomes `out-1.webp`.
/// If no extension is present, appends to the end to make distinct file names.
pub fn insert_suffix_before_extension(path: &Path, suffix: &OsStr) -> PathBuf {
    let Some(file_name) = path.file_name() else {
        let mut result = path.as_os_str().to_owned();
        result.push(suffix);
        return PathBuf::from(result);
    };

    let file_name = Path::new(file_name);
    let mut new_name = OsString::new();
    match file_name.extension() {
        Some(extension) => {
            new_name.push(file_name.file_stem().unwrap_or_default());
            new_name.push(suffix);
            new_name.push(".");
            new_name.push(extension);
        }
        None => {
            new_name.push(file_name);
            new_name.push(suffix);
        }
    }
    path.with_file_name(new_name)
}

/// `photo.jpg` + `webp` gives `photo-compressed.webp`.
pub fn compressed_file_name(input: &Path, extension: &str) -> OsString {
    let mut name = input.file_stem().unwrap_or_default().to_owned();
    name.push("-compressed.");
    name.push(extension);
    name
}
