use std::path::Path;

/// Renders `path` relative to `root`, anchored at the shell's working directory (`$PWD`).
///
/// The launch process starts in the application directory, so qualifying paths against the
/// application root makes them resolvable regardless of where the image mounts the app.
/// `$PWD` is left for the shell to expand when the process starts.
///
/// For example, `/workspace/.java_buildpack/open_jdk_jre` qualified against `/workspace` becomes
/// `$PWD/.java_buildpack/open_jdk_jre`, and `/workspace` against itself becomes `$PWD/.`.
pub(crate) fn qualify_path(path: impl AsRef<Path>, root: impl AsRef<Path>) -> String {
    let path = path.as_ref();

    match pathdiff::diff_paths(path, root.as_ref()) {
        Some(relative_path) if relative_path.as_os_str().is_empty() => String::from("$PWD/."),
        Some(relative_path) => format!("$PWD/{}", relative_path.display()),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifies_nested_path() {
        assert_eq!(
            qualify_path("/app/.java_buildpack/open_jdk_jre", "/app"),
            "$PWD/.java_buildpack/open_jdk_jre"
        );
    }

    #[test]
    fn qualifies_root_itself() {
        assert_eq!(qualify_path("/app", "/app"), "$PWD/.");
    }

    #[test]
    fn qualifies_path_outside_of_root() {
        assert_eq!(
            qualify_path("/layers/heroku_jvm/openjdk", "/workspace"),
            "$PWD/../layers/heroku_jvm/openjdk"
        );
    }

    #[test]
    fn keeps_path_that_cannot_be_made_relative() {
        assert_eq!(qualify_path("jdk", "/app"), "jdk");
    }
}
