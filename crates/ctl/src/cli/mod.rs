pub mod generate_mac;
pub mod list;
pub mod start;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use qbox::{
    registry::{BoxRegistry, DEFAULT_QEMUFILE},
    runner::{CommandRunner, SystemRunner},
};

use self::{generate_mac::GenerateMacCommand, list::ListCommand, start::StartCommand};

#[derive(Parser)]
#[command(version, about = "Create images for and launch the qemu boxes of a qemufile")]
pub struct ControlCommand {
    #[arg(
        short,
        long,
        default_value = DEFAULT_QEMUFILE,
        help = "The qemufile to read boxes from"
    )]
    qemufile: PathBuf,

    #[command(subcommand)]
    command: Option<ControlCommands>,
}

#[derive(Subcommand)]
pub enum ControlCommands {
    List(ListCommand),
    Start(StartCommand),
    GenerateMac(GenerateMacCommand),
}

impl ControlCommand {
    /// Runs the selected command and returns the process exit code.
    pub async fn run(self) -> Result<i32> {
        self.run_with(&SystemRunner).await
    }

    pub async fn run_with(self, runner: &dyn CommandRunner) -> Result<i32> {
        let Some(command) = self.command else {
            ControlCommand::command().print_help()?;
            return Ok(0);
        };

        let registry = BoxRegistry::load(&self.qemufile).await?;
        command.run(&registry, runner).await
    }
}

impl ControlCommands {
    pub async fn run(self, registry: &BoxRegistry, runner: &dyn CommandRunner) -> Result<i32> {
        match self {
            ControlCommands::List(list) => {
                list.run(registry)?;
                Ok(0)
            }

            ControlCommands::Start(start) => start.run(registry, runner).await,

            ControlCommands::GenerateMac(generate_mac) => {
                generate_mac.run()?;
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use qbox::runner::Invocation;

    use super::*;

    #[derive(Default)]
    struct RecordingRunner {
        invocations: Mutex<Vec<Invocation>>,
        code: i32,
    }

    #[async_trait::async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, invocation: &Invocation) -> qbox::error::Result<i32> {
            self.invocations.lock().unwrap().push(invocation.clone());
            Ok(self.code)
        }
    }

    fn qemufile(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Qemufile");
        std::fs::write(&path, content).unwrap();
        let path = path.display().to_string();
        (dir, path)
    }

    async fn run(args: &[&str], runner: &RecordingRunner) -> Result<i32> {
        let command = ControlCommand::try_parse_from(args.iter().copied()).unwrap();
        command.run_with(runner).await
    }

    #[tokio::test]
    async fn test_no_subcommand_prints_help() {
        let runner = RecordingRunner::default();
        assert_eq!(run(&["qbox"], &runner).await.unwrap(), 0);
        assert!(runner.invocations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_unknown_box_exits_one_without_spawning() {
        let (_dir, path) = qemufile("default:\n  args: -m 256\n");
        let runner = RecordingRunner::default();
        let code = run(
            &["qbox", "--qemufile", path.as_str(), "start", "nonexistent-name"],
            &runner,
        )
        .await
        .unwrap();
        assert_eq!(code, 1);
        assert!(runner.invocations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_defaults_to_default_box() {
        let (_dir, path) = qemufile("default:\n  args: -m 256\nother:\n  architecture: arm\n");
        let runner = RecordingRunner {
            code: 4,
            ..Default::default()
        };
        let code = run(&["qbox", "-q", path.as_str(), "start"], &runner).await.unwrap();
        assert_eq!(code, 4);
        assert_eq!(
            *runner.invocations.lock().unwrap(),
            vec![Invocation::new("qemu-system-x86_64").args(["-m", "256"])]
        );
    }

    #[tokio::test]
    async fn test_failed_image_creation_becomes_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("web.qcow2").display().to_string();
        let (_qemufile_dir, path) = qemufile(&format!("web:\n  image: '{}'\n", image));
        let runner = RecordingRunner {
            code: 1,
            ..Default::default()
        };
        let code = run(&["qbox", "-q", path.as_str(), "start", "web"], &runner)
            .await
            .unwrap();
        assert_eq!(code, 1);
        let invocations = runner.invocations.lock().unwrap();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].program, "qemu-img");
    }

    #[tokio::test]
    async fn test_invalid_image_only_fails_its_own_box() {
        let (_dir, path) = qemufile("good:\n  args: -m 64\nbad:\n  image: {file: b.raw}\n");
        let runner = RecordingRunner::default();

        assert_eq!(run(&["qbox", "-q", path.as_str(), "list"], &runner).await.unwrap(), 0);
        assert_eq!(
            run(&["qbox", "-q", path.as_str(), "start", "good"], &runner)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            *runner.invocations.lock().unwrap(),
            vec![Invocation::new("qemu-system-x86_64").args(["-m", "64"])]
        );

        assert_eq!(
            run(&["qbox", "-q", path.as_str(), "start", "bad"], &runner)
                .await
                .unwrap(),
            1
        );
        assert_eq!(runner.invocations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_qemufile_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Qemufile").display().to_string();
        let runner = RecordingRunner::default();
        assert_eq!(run(&["qbox", "-q", path.as_str(), "list"], &runner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_qemufile_is_an_error() {
        let (_dir, path) = qemufile("default: [unclosed\n");
        let runner = RecordingRunner::default();
        assert!(run(&["qbox", "-q", path.as_str(), "list"], &runner).await.is_err());
    }

    #[test]
    fn test_generate_mac_requires_a_seed() {
        assert!(ControlCommand::try_parse_from(["qbox", "generate-mac"]).is_err());
        assert!(ControlCommand::try_parse_from(["qbox", "generate-mac", "web"]).is_ok());
    }
}
