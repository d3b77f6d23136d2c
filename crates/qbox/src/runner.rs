use std::fmt::{self, Display, Formatter};
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{Error, Result};

/// A program and its arguments, ready to be handed to a [CommandRunner].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs an invocation to completion and reports its exit code.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<i32>;
}

/// Spawns the invocation as a child process sharing this process's stdio and
/// waits for it to exit.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

#[async_trait::async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<i32> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;
        status.code().ok_or_else(|| Error::ToolTerminated {
            program: invocation.program.clone(),
        })
    }
}
