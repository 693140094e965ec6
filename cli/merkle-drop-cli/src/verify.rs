use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use merkle_drop::merkle::verify_proof;

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
    let (dump, _) = load_dump(&cli.dump)?;
    let Some(dumped) = dump.find(cli.index) else {
        anyhow::bail!("No allocation with index {}", cli.index);
    };

    let entry = dumped.entry()?;
    let proof = dumped.proof()?;
    let root = dump.root()?;

    if !verify_proof(&proof, &root, &entry.leaf()) {
        anyhow::bail!("Proof for index {} does not reach root {}", cli.index, dump.root);
    }

    println!("Proof valid for {} (index {}, amount {})", entry.recipient, entry.index, entry.amount);
    Ok(())
}
