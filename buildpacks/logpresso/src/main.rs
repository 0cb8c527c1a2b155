mod config;
mod detect;
mod errors;
mod qualify_path;
mod release;

use crate::config::{LogpressoConfig, ENV_OVERRIDE_PREFIX};
use crate::detect::{detect_logpresso_application, LogpressoApplication};
use crate::errors::LogpressoBuildpackError;
use crate::release::release_command;
use libcnb::build::{BuildContext, BuildResult, BuildResultBuilder};
use libcnb::data::build_plan::BuildPlanBuilder;
use libcnb::data::launch::{LaunchBuilder, ProcessBuilder};
use libcnb::data::process_type;
use libcnb::detect::{DetectContext, DetectResult, DetectResultBuilder};
use libcnb::generic::GenericPlatform;
use libcnb::{buildpack_main, Buildpack, Env, Platform};
use libherokubuildpack::log::{log_header, log_info, log_warning};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// Suppress warnings due to the `unused_crate_dependencies` lint not handling integration tests well.
#[cfg(test)]
use libcnb_test as _;

pub(crate) struct LogpressoBuildpack;

impl Buildpack for LogpressoBuildpack {
    type Platform = GenericPlatform;
    type Metadata = LogpressoBuildpackMetadata;
    type Error = LogpressoBuildpackError;

    fn detect(&self, context: DetectContext<Self>) -> libcnb::Result<DetectResult, Self::Error> {
        let application = detect_logpresso_application(&context.app_dir)
            .map_err(LogpressoBuildpackError::CannotReadApplicationDir)?;

        if application.is_some() {
            DetectResultBuilder::pass()
                .build_plan(BuildPlanBuilder::new().requires("jdk").build())
                .build()
        } else {
            DetectResultBuilder::fail().build()
        }
    }

    fn build(&self, context: BuildContext<Self>) -> libcnb::Result<BuildResult, Self::Error> {
        let application = resolve_application(&context.app_dir)?;

        log_header("Logpresso");
        log_info(format!("Araqne-Core found: {}", application.core_package));

        let metadata = &context.buildpack_descriptor.metadata;

        let config = LogpressoConfig::from_fragments(&metadata.configuration)
            .map_err(LogpressoBuildpackError::InvalidConfiguration)?
            .with_env_overrides(context.platform.env());

        for key in config.missing_keys() {
            log_warning(
                "Missing Logpresso configuration",
                format!(
                    "No value is configured for `{key}`, it will be rendered empty in the launch command.\n\
                     Set the `{ENV_OVERRIDE_PREFIX}{key}` environment variable to provide one."
                ),
            );
        }

        let java_home = runtime_home(&Env::from_current(), &context.app_dir, metadata);

        let command = release_command(&application, &config, &java_home, &context.app_dir);
        log_info(format!("Launch command: {command}"));

        BuildResultBuilder::new()
            .launch(
                LaunchBuilder::new()
                    .process(
                        ProcessBuilder::new(
                            process_type!("web"),
                            ["bash", "-c", command.as_str()],
                        )
                        .default(true)
                        .build(),
                    )
                    .build(),
            )
            .build()
    }

    fn on_error(&self, error: libcnb::Error<Self::Error>) {
        errors::on_error(error);
    }
}

/// Detects the application again during build, since detect runs in a separate process.
fn resolve_application(app_dir: &Path) -> Result<LogpressoApplication, LogpressoBuildpackError> {
    detect_logpresso_application(app_dir)
        .map_err(LogpressoBuildpackError::CannotReadApplicationDir)?
        .ok_or(LogpressoBuildpackError::CorePackageNotFound)
}

/// The JDK is installed by a sibling buildpack, which exports `JAVA_HOME` to the build.
fn runtime_home(env: &Env, app_dir: &Path, metadata: &LogpressoBuildpackMetadata) -> PathBuf {
    env.get("JAVA_HOME")
        .map_or_else(|| app_dir.join(&metadata.java_home), PathBuf::from)
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub(crate) struct LogpressoBuildpackMetadata {
    /// Fallback runtime home, relative to the application directory.
    #[serde(default = "default_java_home")]
    pub(crate) java_home: PathBuf,
    #[serde(default)]
    pub(crate) configuration: Vec<toml::Table>,
}

fn default_java_home() -> PathBuf {
    PathBuf::from(".java_buildpack/open_jdk_jre")
}

buildpack_main!(LogpressoBuildpack);
