use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Loads `configuration/base.yaml` (`configuration/test.yaml` when compiled for tests)
/// from the working directory.
pub fn config<Settings: DeserializeOwned>() -> anyhow::Result<Settings> {
    let base_path = std::env::current_dir().context("Failed to determine the current directory")?;
    let file = if cfg!(test) { "test.yaml" } else { "base.yaml" };
    config_from(&base_path.join("configuration"), file)
}

/// Values in `file` can be overridden with `APP_` prefixed environment variables,
/// e.g. `APP_EMAIL__AUTH_TOKEN` overrides `email.auth_token`.
pub fn config_from<Settings: DeserializeOwned>(
    configuration_directory: &Path,
    file: &str,
) -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join(file)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build configuration from {file}"))?;

    settings
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")
}
