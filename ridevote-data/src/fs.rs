//! Capability-based file helpers built on `cap-std` and `camino`.
//!
//! Each helper opens the parent directory with ambient authority and then
//! works on the file name relative to that handle.

use std::io;
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open the parent directory of `path` and return it with the file name.
///
/// # Errors
/// Returns an error when `path` has no file name or the directory cannot be
/// opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Create the parent directories of `path` when they are missing.
///
/// # Errors
/// Returns an error when a directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_root(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?.create_dir_all(&relative)
}

/// Read `path` as UTF-8.
///
/// # Errors
/// Returns an error when the file is missing or unreadable.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.read_to_string(&name)
}

/// Read `path`, returning `None` when it does not exist.
///
/// # Errors
/// Returns an error for any failure other than a missing file.
pub fn read_optional(path: &Utf8Path) -> io::Result<Option<String>> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    match dir.read_to_string(&name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Replace the contents of `path`, creating parent directories as needed.
///
/// # Errors
/// Returns an error when the directories or the file cannot be written.
pub fn write(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    dir.write(&name, contents)
}

/// Delete `path`. Returns whether a file was removed.
///
/// # Errors
/// Returns an error for any failure other than a missing file.
pub fn remove_if_present(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.remove_file(&name) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Split `path` into an ambient base directory and the remainder below it.
///
/// `cap-std` refuses absolute paths relative to a directory handle, so the
/// root (or Windows prefix) becomes the base.
fn split_root(path: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let mut components = path.as_std_path().components();
    let base = match components.next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            if matches!(components.clone().next(), Some(Component::RootDir)) {
                components.next();
            }
            Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => return Ok((Utf8PathBuf::from("."), path.to_owned())),
    };
    let relative = Utf8PathBuf::from_path_buf(components.as_path().to_path_buf())
        .map_err(|_| io::Error::other("non-UTF-8 path"))?;
    Ok((base, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8 temp path")
    }

    #[rstest]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().expect("tempdir");
        assert_eq!(read_optional(&utf8(&dir, "absent.json")).expect("read"), None);
        assert_eq!(
            read_optional(&utf8(&dir, "no/such/dir/file.json")).expect("read"),
            None
        );
    }

    #[rstest]
    fn write_creates_parents_and_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let path = utf8(&dir, "nested/deeper/session.json");
        write(&path, "{}").expect("write");
        assert_eq!(read_optional(&path).expect("read").as_deref(), Some("{}"));
    }

    #[rstest]
    fn read_to_string_reports_missing_files() {
        let dir = TempDir::new().expect("tempdir");
        let err = read_to_string(&utf8(&dir, "absent.json")).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn remove_reports_whether_a_file_existed() {
        let dir = TempDir::new().expect("tempdir");
        let path = utf8(&dir, "marker");
        write(&path, "x").expect("write");
        assert!(remove_if_present(&path).expect("remove"));
        assert!(!remove_if_present(&path).expect("remove again"));
    }

    #[rstest]
    fn relative_paths_resolve_from_current_dir() {
        let (base, rest) = split_root(Utf8Path::new("relative/dir")).expect("split");
        assert_eq!(base, Utf8PathBuf::from("."));
        assert_eq!(rest, Utf8PathBuf::from("relative/dir"));
    }

    #[cfg(unix)]
    #[rstest]
    fn absolute_paths_resolve_from_root() {
        let (base, rest) = split_root(Utf8Path::new("/var/lib/ridevote")).expect("split");
        assert_eq!(base, Utf8PathBuf::from("/"));
        assert_eq!(rest, Utf8PathBuf::from("var/lib/ridevote"));
    }
}
