use anyhow::Result;
use clap::Parser;
use qbox::mac::{format_mac, generate_mac};

#[derive(Parser)]
#[command(about = "Derive a stable mac address from a string")]
pub struct GenerateMacCommand {
    #[arg(help = "A string to use as the basis for the mac address")]
    seed: String,
}

impl GenerateMacCommand {
    pub fn run(self) -> Result<()> {
        println!("{}", format_mac(&generate_mac(&self.seed)));
        Ok(())
    }
}
