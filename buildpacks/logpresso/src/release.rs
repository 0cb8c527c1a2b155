use crate::config::{LogpressoConfig, DIRECTMEMORY_MAX, HEAP_MAX, INSTANCE_ID};
use crate::detect::LogpressoApplication;
use crate::qualify_path::qualify_path;
use std::path::Path;

/// System properties Araqne Core expects, rendered after `-DINSTANCE_ID`.
const SYSTEM_PROPERTIES: [&str; 5] = [
    "-Dipojo.proxy=disabled",
    "-Daraqne.ssh.timeout=0",
    "-Dlogpresso.sentry.disableFlowControl=true",
    "-Daraqne.logdb.cepengine=redis",
    "-Dlogpresso.httpd.port=$PORT",
];

const GC_OPTIONS: [&str; 9] = [
    "-XX:+UseG1GC",
    "-XX:MaxGCPauseMillis=100",
    "-XX:GCPauseIntervalMillis=1000",
    "-XX:StringTableSize=1000003",
    "-XX:+PrintGCDateStamps",
    "-Xloggc:log/gc.log",
    "-XX:+UseGCLogFileRotation",
    "-XX:NumberOfGCLogFiles=5",
    "-XX:GCLogFileSize=10240K",
];

/// Builds the shell command that starts a Logpresso application.
///
/// The order of the arguments is significant for Araqne Core and must not change. `$PORT`,
/// `$PWD` and `$JAVA_OPTS` are intentionally left unexpanded: they are resolved by the shell
/// when the process starts. Missing configuration values render as empty strings.
pub(crate) fn release_command(
    application: &LogpressoApplication,
    config: &LogpressoConfig,
    java_home: &Path,
    app_dir: &Path,
) -> String {
    let config_value = |key: &'static str| config.get(key).unwrap_or_default();

    let sections: [Vec<String>; 6] = [
        vec![String::from("exec")],
        vec![format!("{}/bin/java", qualify_path(java_home, app_dir))],
        std::iter::once(format!("-DINSTANCE_ID={}", config_value(INSTANCE_ID)))
            .chain(SYSTEM_PROPERTIES.map(String::from))
            .collect(),
        GC_OPTIONS
            .into_iter()
            .chain(["$JAVA_OPTS"])
            .map(String::from)
            .collect(),
        vec![
            format!("-Xmx{}", config_value(HEAP_MAX)),
            format!("-XX:MaxDirectMemorySize={}", config_value(DIRECTMEMORY_MAX)),
        ],
        vec![
            String::from("-jar"),
            format!(
                "{}/{}",
                qualify_path(app_dir, app_dir),
                application.core_package
            ),
        ],
    ];

    join_tokens(sections.into_iter().flatten())
}

fn join_tokens(tokens: impl IntoIterator<Item = String>) -> String {
    tokens
        .into_iter()
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
