use clap::{Args, Subcommand};

/// A/B experiment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExperimentCommands {
    /// List experiments.
    List,
    /// Create an experiment with weighted model variants.
    Create(ExperimentCreateArgs),
    /// Flip an experiment between active and inactive.
    Toggle(ExperimentIdArgs),
    /// Delete an experiment.
    Delete(ExperimentIdArgs),
    /// Per-variant statistics.
    Results(ExperimentIdArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ExperimentCreateArgs {
    pub name: String,
    /// Model family under test, e.g. classification.
    #[arg(long, default_value = "classification")]
    pub model_type: String,
    /// Variant as `version:weight`; the first one is the control (repeatable).
    #[arg(long = "variant", required = true)]
    pub variants: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ExperimentIdArgs {
    /// Experiment id.
    pub id: String,
}
