use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use merkle_drop::dump::AllocationDump;
use merkle_drop::merkle::MerkleTree;

use crate::common::{parse_allocation_csv, write_file_atomic};

#[derive(Args, Debug)]
pub struct Cli {
    /// CSV file with a header row and `recipient,index,amount` lines
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the tree dump (JSON)
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(cli: Cli) -> Result<()> {
    println!("Reading allocations from {:?}...", cli.input);
    let content = fs::read_to_string(&cli.input).context("Failed to read input file")?;
    let entries = parse_allocation_csv(&content)?;

    let total: u128 = entries.iter().map(|entry| u128::from(entry.amount)).sum();
    println!("Total allocations: {}", entries.len());
    println!("Total amount: {}", total);
    println!("Building Merkle tree...");

    let tree = MerkleTree::build(&entries).map_err(|e| anyhow::anyhow!("Failed to build tree: {}", e))?;
    println!("Merkle root: {}", tree.root_hex());
    println!("Proof length: {} nodes", tree.depth());

    let json = AllocationDump::from_tree(&tree)
        .to_json()
        .context("Failed to serialize dump")?;
    write_file_atomic(&cli.output, &json).context("Failed to write dump file")?;

    println!("Dump written to {:?}", cli.output);
    Ok(())
}
