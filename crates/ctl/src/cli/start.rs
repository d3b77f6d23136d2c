use anyhow::Result;
use clap::Parser;
use log::error;
use qbox::{error::Error, registry::BoxRegistry, runner::CommandRunner};

#[derive(Parser)]
#[command(about = "Create the image for a box if needed, then launch it")]
pub struct StartCommand {
    #[arg(
        value_name = "BOX",
        default_value = "default",
        help = "The name of the box to start"
    )]
    name: String,
}

impl StartCommand {
    /// Returns the exit code for the process: 1 if the box is unknown or its
    /// image definition is invalid, otherwise the status of the failing
    /// `qemu-img` or of the emulator.
    pub async fn run(self, registry: &BoxRegistry, runner: &dyn CommandRunner) -> Result<i32> {
        let machine = match registry.find(&self.name) {
            Ok(machine) => machine,
            Err(error) => {
                error!("{}", error);
                return Ok(1);
            }
        };

        match machine.start(runner).await {
            Ok(code) => Ok(code),
            Err(Error::ToolFailed { program, code }) => {
                error!("{} exited with status {}, not starting {}", program, code, machine);
                Ok(code)
            }
            Err(error @ Error::InvalidImage { .. }) => {
                error!("{}", error);
                Ok(1)
            }
            Err(error) => Err(error.into()),
        }
    }
}
