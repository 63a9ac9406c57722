use crate::pipeline::VERSION;
use anyhow::Result;

pub fn run() -> Result<()> {
    println!("curate {}", VERSION);
    Ok(())
}
