//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_json, format_rule_list_text, RuleListEntry};
use crate::config::{SdkSettings, SettingsLoader};
use crate::debugger::builtin::{
    debugger_rule, profiler_rule, DEBUGGER_RULE_NAMES, PROFILER_RULE_NAMES,
};
use crate::debugger::{
    ParameterValue, ProfilerRule, Rule, RuleParameters, SagemakerProfilerRuleOptions,
    SagemakerRuleOptions,
};
use crate::error::RuleError;
use crate::jumpstart::{retrieve, ModelUriQuery, StaticArtifactResolver};
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime context for CLI execution: workspace root and loaded settings.
pub struct RunContext {
    workspace_root: PathBuf,
    settings: SdkSettings,
}

impl RunContext {
    /// Load settings from `config_path` when given, otherwise from the workspace layers.
    pub fn new(workspace_root: PathBuf, config_path: Option<&Path>) -> anyhow::Result<Self> {
        let settings = match config_path {
            Some(path) => SettingsLoader::load_from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => SettingsLoader::load(&workspace_root).context("Failed to load settings")?,
        };
        Ok(Self::with_settings(workspace_root, settings))
    }

    pub fn with_settings(workspace_root: PathBuf, settings: SdkSettings) -> Self {
        Self {
            workspace_root,
            settings,
        }
    }

    pub fn settings(&self) -> &SdkSettings {
        &self.settings
    }

    pub fn execute(&self, command: &Commands) -> anyhow::Result<String> {
        match command {
            Commands::Rules => self.handle_rules(),
            Commands::DebuggerRule {
                name,
                rule_name,
                s3_output_path,
                local_path,
                other_trials,
                params,
            } => {
                let base = debugger_rule(name)?;
                let options = SagemakerRuleOptions {
                    name: rule_name.clone(),
                    container_local_output_path: local_path
                        .clone()
                        .or_else(|| self.settings.debugger.container_local_output_path.clone()),
                    s3_output_path: s3_output_path
                        .clone()
                        .or_else(|| self.settings.debugger.s3_output_path.clone()),
                    other_trials_s3_input_paths: if other_trials.is_empty() {
                        None
                    } else {
                        Some(other_trials.clone())
                    },
                    rule_parameters: if params.is_empty() {
                        None
                    } else {
                        Some(parse_params(params)?)
                    },
                    collections_to_save: None,
                };
                let rule = Rule::sagemaker(&base, options)?;
                Ok(format_json(&rule.to_debugger_rule_config_dict())?)
            }
            Commands::ProfilerRule {
                name,
                rule_name,
                s3_output_path,
                local_path,
            } => {
                let base = profiler_rule(name)?;
                let options = SagemakerProfilerRuleOptions {
                    name: rule_name.clone(),
                    container_local_output_path: local_path
                        .clone()
                        .or_else(|| self.settings.debugger.container_local_output_path.clone()),
                    s3_output_path: s3_output_path
                        .clone()
                        .or_else(|| self.settings.debugger.s3_output_path.clone()),
                };
                let rule = ProfilerRule::sagemaker(&base, options);
                Ok(format_json(&rule.to_profiler_rule_config_dict())?)
            }
            Commands::ModelUri {
                catalog,
                model_id,
                model_version,
                scope,
                region,
                tolerate_vulnerable,
                tolerate_deprecated,
            } => {
                let catalog_path = self.catalog_path(catalog.as_deref())?;
                let resolver = StaticArtifactResolver::load(&catalog_path).with_context(|| {
                    format!("Failed to load catalog {}", catalog_path.display())
                })?;

                let mut query = ModelUriQuery::from_settings(&self.settings.jumpstart);
                query.model_id = Some(model_id.clone());
                query.model_version = Some(model_version.clone());
                query.model_scope = *scope;
                if let Some(region) = region {
                    query = query.with_region(region.clone());
                }
                query.tolerate_vulnerable_model |= *tolerate_vulnerable;
                query.tolerate_deprecated_model |= *tolerate_deprecated;

                let uri = retrieve(&resolver, &query)?;
                info!(model_id = %model_id, uri = %uri, "Resolved model URI");
                Ok(uri)
            }
            Commands::Settings => Ok(self.settings.to_toml_string()?),
        }
    }

    fn handle_rules(&self) -> anyhow::Result<String> {
        let mut entries = Vec::with_capacity(DEBUGGER_RULE_NAMES.len() + PROFILER_RULE_NAMES.len());
        for name in DEBUGGER_RULE_NAMES {
            entries.push(RuleListEntry {
                kind: "debugger",
                name: name.to_string(),
                parameters: debugger_rule(name)?.default_parameters().len(),
            });
        }
        for name in PROFILER_RULE_NAMES {
            entries.push(RuleListEntry {
                kind: "profiler",
                name: name.to_string(),
                parameters: profiler_rule(name)?.rule_parameters.len(),
            });
        }
        Ok(format_rule_list_text(&entries))
    }

    /// Explicit path first, then the configured one relative to the workspace.
    fn catalog_path(&self, explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        match &self.settings.jumpstart.catalog_path {
            Some(path) if path.is_absolute() => Ok(path.clone()),
            Some(path) => Ok(self.workspace_root.join(path)),
            None => bail!("No catalog given; pass --catalog or set jumpstart.catalog_path"),
        }
    }
}

/// Parse `KEY=VALUE` overrides; values are kept as text like the built-in defaults.
fn parse_params(params: &[String]) -> Result<RuleParameters, RuleError> {
    params
        .iter()
        .map(|param| {
            let (key, value) = param.split_once('=').ok_or_else(|| {
                RuleError::InvalidArgument(format!("Expected KEY=VALUE, got '{}'", param))
            })?;
            if key.is_empty() {
                return Err(RuleError::InvalidArgument(format!(
                    "Empty parameter name in '{}'",
                    param
                )));
            }
            Ok((key.to_string(), ParameterValue::from(value)))
        })
        .collect()
}
