//! The `run` command: one status update for one triggering event

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;
use triage_core::{Config, Inputs, Outcome, Secrets, StatusUpdater, TriggerEvent};
use triage_github::GitHubClient;

use crate::output;

/// Inputs for a single run
///
/// Each flag falls back to the environment variable GitHub Actions sets for
/// the matching action input.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project board URL, e.g. https://github.com/orgs/acme/projects/7
    #[arg(long, env = "INPUT_PROJECT-URL")]
    pub project_url: Option<String>,

    /// GitHub token (falls back to GITHUB_TOKEN and the secrets file)
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Status to move eligible items to
    #[arg(long, env = "INPUT_NEW-STATUS")]
    pub new_status: Option<String>,

    /// Status an item must have to be eligible
    #[arg(long, env = "INPUT_OPEN-STATUS")]
    pub open_status: Option<String>,

    /// Webhook payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// File receiving step outputs (stdout when unset)
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_path: Option<PathBuf>,

    /// Resolve everything but do not change the board
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let inputs = self.inputs()?;

        let event_path = self.event_path.as_deref().context(
            "No event payload. Pass --event-path or run inside GitHub Actions (GITHUB_EVENT_PATH)",
        )?;
        let event = TriggerEvent::load_from_file(event_path)?;
        info!(
            number = event.number,
            kind = ?event.kind,
            owner = %event.repository_owner_login,
            "Processing #{}",
            event.number
        );

        let client = GitHubClient::new(inputs.github_token.clone(), &config.github)?;
        let outcome = StatusUpdater::new(client)
            .with_dry_run(self.dry_run)
            .run(&inputs, &event)
            .await?;

        self.publish(&outcome)
    }

    fn inputs(&self) -> anyhow::Result<Inputs> {
        let env_token = std::env::var("GITHUB_TOKEN").ok();

        // Only consult the secrets file when it can matter
        let secrets = if needs_secrets_file(self.github_token.as_deref(), env_token.as_deref()) {
            Secrets::load()?
        } else {
            Secrets::default()
        };

        Ok(Inputs::from_parts(
            self.project_url.clone(),
            self.github_token.clone(),
            self.new_status.clone(),
            self.open_status.clone(),
            &secrets,
        )?)
    }

    fn publish(&self, outcome: &Outcome) -> anyhow::Result<()> {
        let Some(field_name) = outcome.field_name() else {
            return Ok(());
        };
        publish_field_name(self.output_path.as_deref(), field_name)
    }
}

/// The secrets file is the last resort after the input and `GITHUB_TOKEN`
fn needs_secrets_file(input_token: Option<&str>, env_token: Option<&str>) -> bool {
    let present = |t: Option<&str>| t.is_some_and(|t| !t.trim().is_empty());
    !present(input_token) && !present(env_token)
}

fn publish_field_name(output_path: Option<&Path>, field_name: &str) -> anyhow::Result<()> {
    match output_path {
        Some(path) => output::append_output(path, "fieldName", field_name)
            .with_context(|| format!("Failed to write output to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            output::write_output(&mut stdout, "fieldName", field_name)?;
            Ok(())
        }
    }
}
