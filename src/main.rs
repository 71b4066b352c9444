use anyhow::Result;
use clap::Parser;

use scholar_citation_tracker::cli::{Cli, Commands};
use scholar_citation_tracker::commands::{
    run_add, run_annotate, run_init, run_list, run_mark_read, run_network, run_new_identity,
    run_relink, run_show, run_tagged, run_untagged,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => {
            run_init(args)?;
        }
        Commands::Add(args) => {
            run_add(args)?;
        }
        Commands::List(args) => {
            run_list(args)?;
        }
        Commands::Network(args) => {
            run_network(args)?;
        }
        Commands::Tagged(args) => {
            run_tagged(args)?;
        }
        Commands::Untagged(args) => {
            run_untagged(args)?;
        }
        Commands::Show(args) => {
            run_show(args)?;
        }
        Commands::Annotate(args) => {
            run_annotate(args)?;
        }
        Commands::MarkRead(args) => {
            run_mark_read(args)?;
        }
        Commands::Relink(args) => {
            run_relink(args)?;
        }
        Commands::NewIdentity(args) => {
            run_new_identity(args)?;
        }
    }

    Ok(())
}
