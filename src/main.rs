use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use release_bump::cli::{github_client, run_release_workflow, WorkflowArgs};
use release_bump::config;
use release_bump::context::TriggerContext;
use release_bump::git::{Git2Repository, GitCommand, Repository};
use release_bump::ui::{ActionOutput, Logger};

#[derive(clap::Parser)]
#[command(
    name = "release-bump",
    version,
    about = "Write the release version into package files and commit them through the GitHub API"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short,
        long,
        env = "GITHUB_WORKSPACE",
        default_value = ".",
        help = "Working tree holding the files to update"
    )]
    workspace: PathBuf,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "API token")]
    token: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", help = "Base URL of the REST API")]
    api_url: Option<String>,

    #[arg(long, help = "Query branch containment through libgit2 instead of git")]
    libgit2: bool,
}

impl From<Args> for WorkflowArgs {
    fn from(args: Args) -> Self {
        WorkflowArgs {
            config_path: args.config,
            workspace: args.workspace,
            token: args.token,
            api_url: args.api_url,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let logger = Logger::console();

    match run(&logger).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            logger.end_group();
            logger.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(logger: &Logger) -> Result<bool> {
    let args = Args::parse();
    let use_libgit2 = args.libgit2;
    let args = WorkflowArgs::from(args);

    let config = config::load_config(args.config_path.as_deref())
        .context("Error loading config")?
        .with_env_inputs();
    config.validate()?;

    let context = TriggerContext::from_env().context("Error reading trigger context")?;

    let repository: Box<dyn Repository> = if use_libgit2 {
        Box::new(Git2Repository::open(&args.workspace)?)
    } else {
        Box::new(GitCommand::new(&args.workspace))
    };
    let host = github_client(&args, &context);
    let output = ActionOutput::from_env();

    let result = run_release_workflow(
        &context,
        &config,
        &args.workspace,
        &host,
        repository.as_ref(),
        logger,
        &output,
    )
    .await?;

    Ok(result.committed)
}
