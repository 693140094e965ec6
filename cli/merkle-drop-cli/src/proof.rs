use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use merkle_drop::dump::encode_hash;

use crate::common::load_dump;

#[derive(Args, Debug)]
pub struct Cli {
    /// Tree dump written by `build-tree`
    #[arg(short, long)]
    dump: PathBuf,

    /// Allocation index
    #[arg(short, long)]
    index: u64,
}

pub fn run(cli: &Cli) -> Result<()> {
    let (_, tree) = load_dump(&cli.dump)?;
    let (Some(entry), Some(proof)) = (tree.entry(cli.index), tree.proof(cli.index)) else {
        anyhow::bail!("No allocation with index {}", cli.index);
    };

    println!("Root: {}", tree.root_hex());
    println!("Recipient: {}", entry.recipient);
    println!("Index: {}", entry.index);
    println!("Amount: {}", entry.amount);
    println!("Proof:");
    for (i, node) in proof.iter().enumerate() {
        println!("  [{}] {}", i, encode_hash(node));
    }

    Ok(())
}
