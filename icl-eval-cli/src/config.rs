//! Layered configuration: built-in defaults, `config/default` and
//! `config/local` files, an optional explicit file, then `ICL_EVAL__*`
//! environment variables.

use anyhow::{Context as _, Result};
use config::{Config, Environment, File};
use icl_eval_workflow::WorkflowConfig;
use std::path::Path;

pub const ENV_PREFIX: &str = "ICL_EVAL";

pub fn load(explicit: Option<&Path>) -> Result<WorkflowConfig> {
    let mut builder = Config::builder()
        .add_source(
            Config::try_from(&WorkflowConfig::default())
                .context("Failed to encode built-in defaults")?,
        )
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name("config/local").required(false));

    if let Some(path) = explicit {
        builder = builder.add_source(File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("icl_models"),
        )
        .build()
        .context("Failed to load configuration")?;

    let config: WorkflowConfig = settings
        .try_deserialize()
        .context("Invalid configuration")?;

    config.validated().context("Configuration failed validation")
}
