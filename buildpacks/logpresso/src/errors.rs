use crate::config::ConfigError;
use crate::detect::{CACHE_DIR_NAME, CORE_PACKAGE_PREFIX};
use libherokubuildpack::log::log_error;

#[derive(Debug)]
pub(crate) enum LogpressoBuildpackError {
    CannotReadApplicationDir(std::io::Error),
    CorePackageNotFound,
    InvalidConfiguration(ConfigError),
}

impl From<LogpressoBuildpackError> for libcnb::Error<LogpressoBuildpackError> {
    fn from(error: LogpressoBuildpackError) -> Self {
        Self::BuildpackError(error)
    }
}

pub(crate) fn on_error(error: libcnb::Error<LogpressoBuildpackError>) {
    libherokubuildpack::error::on_error(on_logpresso_buildpack_error, error);
}

fn on_logpresso_buildpack_error(error: LogpressoBuildpackError) {
    match error {
        LogpressoBuildpackError::CannotReadApplicationDir(io_error) => log_error(
            "Unable to read application directory",
            format!(
                "An unexpected I/O error occurred while looking for the Logpresso package layout.\n\nDetails: {io_error}"
            ),
        ),
        LogpressoBuildpackError::CorePackageNotFound => log_error(
            "Araqne Core package not found",
            format!(
                "The application directory must contain an entry starting with `{CORE_PACKAGE_PREFIX}`\n\
                 and a `{CACHE_DIR_NAME}` directory next to it. The launch command cannot be\n\
                 generated without the core package."
            ),
        ),
        LogpressoBuildpackError::InvalidConfiguration(config_error) => log_error(
            "Invalid Logpresso configuration",
            format!(
                "The buildpack configuration could not be read.\n\nDetails: {config_error}"
            ),
        ),
    }
}
