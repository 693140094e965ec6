#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod build_tree;
mod common;
mod proof;
mod verify;

#[derive(Parser, Debug)]
#[command(name = "merkle-drop")]
#[command(about = "Merkle airdrop allocation tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the tree from a CSV allocation list and write the dump
    BuildTree(build_tree::Cli),
    /// Print the proof for one allocation
    Proof(proof::Cli),
    /// Check one allocation's proof against the dump root
    Verify(verify::Cli),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildTree(args) => build_tree::run(args)?,
        Commands::Proof(args) => proof::run(&args)?,
        Commands::Verify(args) => verify::run(&args)?,
    }

    Ok(())
}
