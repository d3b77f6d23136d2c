use anyhow::Result;
use clap::{Parser, ValueEnum};
use qbox::registry::BoxRegistry;

use crate::format::{box_summary, box_table};

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum BoxListFormat {
    Simple,
    Table,
    Json,
    JsonPretty,
    Yaml,
}

#[derive(Parser)]
#[command(about = "List the boxes defined in the qemufile")]
pub struct ListCommand {
    #[arg(short, long, default_value = "simple", help = "Output format")]
    format: BoxListFormat,
}

impl ListCommand {
    pub fn run(self, registry: &BoxRegistry) -> Result<()> {
        let output = self.render(registry)?;
        if !output.is_empty() {
            println!("{}", output);
        }
        Ok(())
    }

    pub fn render(&self, registry: &BoxRegistry) -> Result<String> {
        Ok(match self.format {
            BoxListFormat::Simple => registry.names().collect::<Vec<_>>().join("\n"),

            BoxListFormat::Table => {
                if registry.is_empty() {
                    "no boxes are defined".to_string()
                } else {
                    box_table(registry.boxes()).to_string()
                }
            }

            BoxListFormat::Json | BoxListFormat::JsonPretty | BoxListFormat::Yaml => {
                let summaries = registry.boxes().iter().map(box_summary).collect::<Vec<_>>();
                let encoded = if self.format == BoxListFormat::JsonPretty {
                    serde_json::to_string_pretty(&summaries)?
                } else if self.format == BoxListFormat::Yaml {
                    serde_yaml::to_string(&summaries)?
                } else {
                    serde_json::to_string(&summaries)?
                };
                encoded.trim().to_string()
            }
        })
    }
}
