use anyhow::Result;
use clap::Parser;
use moveset_core::partition_by_shard;

/// Print the shard of each creature id
#[derive(Debug, Parser)]
pub struct Shard {
    #[arg(value_name = "ID", required = true)]
    ids: Vec<u32>,
}

impl Shard {
    pub fn execute(self) -> Result<()> {
        for (shard, ids) in partition_by_shard(self.ids) {
            let ids: Vec<String> = ids.iter().map(u32::to_string).collect();
            println!("shard_{}: {}", shard, ids.join(", "));
        }
        Ok(())
    }
}
