use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use anyhow::{Context, Result};
use merkle_drop::dump::AllocationDump;
use merkle_drop::merkle::{Entry, MerkleTree};

/// Parses `recipient,index,amount` lines. The first line is a header;
/// blank lines are skipped.
pub fn parse_allocation_csv(content: &str) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for (line_num, line) in content.lines().enumerate().skip(1) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let [recipient, index, amount] = fields[..] else {
            anyhow::bail!(
                "line {}: expected 3 fields (recipient,index,amount), got {}",
                line_num + 1,
                fields.len()
            );
        };

        let recipient = Pubkey::from_str(recipient)
            .map_err(|e| anyhow::anyhow!("line {}: invalid recipient {:?}: {}", line_num + 1, recipient, e))?;
        let index = index
            .parse::<u64>()
            .with_context(|| format!("line {}: invalid index {:?}", line_num + 1, index))?;
        let amount = amount
            .parse::<u64>()
            .with_context(|| format!("line {}: invalid amount {:?}", line_num + 1, amount))?;

        entries.push(Entry::new(recipient, index, amount));
    }

    Ok(entries)
}

/// Loads a dump and replays the tree so a stale or edited file is caught
/// before any proof is handed out. Proofs should come from the returned
/// tree, not from the file.
pub fn load_dump(path: &Path) -> Result<(AllocationDump, MerkleTree)> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let dump = AllocationDump::from_json(&json).context("Failed to parse dump JSON")?;
    let tree = dump.rebuild().context("Dump does not match its entries")?;
    Ok((dump, tree))
}

pub fn write_file_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path).context("Failed to create temp file")?;
    file.write_all(contents.as_bytes())
        .context("Failed to write to temp file")?;
    file.flush().context("Failed to flush temp file")?;
    fs::rename(&temp_path, path).context("Failed to move temp file to output")?;
    Ok(())
}
