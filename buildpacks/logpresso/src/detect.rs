use std::fs;
use std::io;
use std::path::Path;

/// File name prefix of the Araqne Core package that starts a Logpresso application.
pub(crate) const CORE_PACKAGE_PREFIX: &str = "araqne-core";

/// Name of the directory Logpresso keeps its bundle cache in.
pub(crate) const CACHE_DIR_NAME: &str = "cache";

/// A Logpresso application layout found in an application directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct LogpressoApplication {
    /// File name of the matched core package, i.e. `araqne-core-3.0.jar`.
    pub(crate) core_package: String,
}

/// Looks for a Logpresso application layout in the top level of `app_dir`.
///
/// The layout requires an entry whose name starts with [`CORE_PACKAGE_PREFIX`] and a directory
/// named [`CACHE_DIR_NAME`]. Entries are inspected in file name order, so the first matching
/// core package is the same on every platform.
///
/// Entries whose names are not valid UTF-8 are skipped, since they cannot be rendered into the
/// launch command verbatim. A non-existent `app_dir` is treated as empty and results in
/// `Ok(None)`.
pub(crate) fn detect_logpresso_application(
    app_dir: &Path,
) -> Result<Option<LogpressoApplication>, io::Error> {
    let mut entries = match fs::read_dir(app_dir) {
        Ok(read_dir) => read_dir.collect::<Result<Vec<_>, _>>()?,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error),
    };

    entries.sort_by_key(fs::DirEntry::file_name);

    let mut core_package = None;
    let mut cache_found = false;

    for entry in entries {
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };

        if core_package.is_none() && file_name.starts_with(CORE_PACKAGE_PREFIX) {
            core_package = Some(file_name.clone());
        }

        // `Path::is_dir` follows symlinks, `DirEntry::file_type` does not.
        if !cache_found && file_name == CACHE_DIR_NAME && entry.path().is_dir() {
            cache_found = true;
        }

        if core_package.is_some() && cache_found {
            break;
        }
    }

    Ok(core_package
        .filter(|_| cache_found)
        .map(|core_package| LogpressoApplication { core_package }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn app_dir_with(files: &[&str], dirs: &[&str]) -> tempfile::TempDir {
        let app_dir = tempdir().unwrap();

        for file in files {
            fs::write(app_dir.path().join(file), "").unwrap();
        }

        for dir in dirs {
            fs::create_dir_all(app_dir.path().join(dir)).unwrap();
        }

        app_dir
    }

    #[test]
    fn detects_core_package_and_cache_dir() {
        let app_dir = app_dir_with(&["araqne-core-3.0.jar", "README.md"], &["cache", "log"]);

        assert_eq!(
            detect_logpresso_application(app_dir.path()).unwrap(),
            Some(LogpressoApplication {
                core_package: String::from("araqne-core-3.0.jar")
            })
        );
    }

    #[test]
    fn core_package_may_be_a_directory() {
        let app_dir = app_dir_with(&[], &["araqne-core", "cache"]);

        assert_eq!(
            detect_logpresso_application(app_dir.path()).unwrap(),
            Some(LogpressoApplication {
                core_package: String::from("araqne-core")
            })
        );
    }

    #[test]
    fn no_match_without_core_package() {
        let app_dir = app_dir_with(&["logpresso.jar", "core-araqne.jar"], &["cache"]);

        assert_eq!(detect_logpresso_application(app_dir.path()).unwrap(), None);
    }

    #[test]
    fn no_match_without_cache_dir() {
        let app_dir = app_dir_with(&["araqne-core-3.0.jar"], &["caches", "data"]);

        assert_eq!(detect_logpresso_application(app_dir.path()).unwrap(), None);
    }

    #[test]
    fn no_match_when_cache_is_a_file() {
        let app_dir = app_dir_with(&["araqne-core-3.0.jar", "cache"], &[]);

        assert_eq!(detect_logpresso_application(app_dir.path()).unwrap(), None);
    }

    #[test]
    fn no_match_when_cache_is_nested() {
        let app_dir = app_dir_with(&["araqne-core-3.0.jar"], &["data/cache"]);

        assert_eq!(detect_logpresso_application(app_dir.path()).unwrap(), None);
    }

    #[test]
    fn no_match_for_empty_app_dir() {
        let app_dir = tempdir().unwrap();

        assert_eq!(detect_logpresso_application(app_dir.path()).unwrap(), None);
    }

    #[test]
    fn no_match_for_non_existent_app_dir() {
        let app_dir = tempdir().unwrap();

        assert_eq!(
            detect_logpresso_application(&app_dir.path().join("does-not-exist")).unwrap(),
            None
        );
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn skips_core_package_with_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let app_dir = app_dir_with(&[], &["cache"]);
        fs::write(
            app_dir.path().join(OsStr::from_bytes(b"araqne-core-\xff.jar")),
            "",
        )
        .unwrap();

        assert_eq!(detect_logpresso_application(app_dir.path()).unwrap(), None);

        fs::write(app_dir.path().join("araqne-core-3.0.jar"), "").unwrap();
        fs::write(
            app_dir.path().join(OsStr::from_bytes(b"araqne-core-0\xff.jar")),
            "",
        )
        .unwrap();

        let application = detect_logpresso_application(app_dir.path())
            .unwrap()
            .unwrap();

        assert_eq!(application.core_package, "araqne-core-3.0.jar");
        assert!(app_dir.path().join(&application.core_package).exists());
    }

    #[test]
    fn first_core_package_in_file_name_order_wins() {
        let app_dir = app_dir_with(
            &[
                "araqne-core-3.1.jar",
                "araqne-core-2.9.jar",
                "araqne-core-3.0.jar",
            ],
            &["cache"],
        );

        assert_eq!(
            detect_logpresso_application(app_dir.path()).unwrap(),
            Some(LogpressoApplication {
                core_package: String::from("araqne-core-2.9.jar")
            })
        );
    }
}
