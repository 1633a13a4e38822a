use crate::prelude::*;
use clap::Parser;

mod jira;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Read Jira issues with ADF descriptions and comments rendered as text or HTML"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(
        long,
        env = "ISSUEVIEW_VERBOSE",
        global = true,
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Get detailed information about a Jira issue
    Get(jira::get::GetOptions),

    /// List comments on a Jira issue
    Comments(jira::comments::CommentsOptions),

    /// List attachments on a Jira issue
    Attachments(jira::attachments::AttachmentsOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Get(options) => jira::get::handler(options, app.global).await,
        SubCommands::Comments(options) => jira::comments::handler(options, app.global).await,
        SubCommands::Attachments(options) => jira::attachments::handler(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
