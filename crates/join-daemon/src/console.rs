//! Operator console.
//!
//! Reads commands line by line and launches bootstrap and node processes:
//! - `bootstrap`: start the bootstrap (at most once)
//! - `node [addr]`: start a node, optionally on a specific listen address
//! - `quit`: stop reading commands
//!
//! Launched processes keep running after the console exits.

use crate::config::ConsoleConfig;
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::process::Command as Process;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bootstrap,
    Node { addr: Option<String> },
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut args = line.split_whitespace();
        let command = match args.next()? {
            "bootstrap" => Command::Bootstrap,
            "node" => Command::Node {
                addr: args.next().map(str::to_string),
            },
            "quit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}

pub struct Console {
    config: ConsoleConfig,
    bootstrap_running: bool,
    spawned: usize,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            bootstrap_running: false,
            spawned: 0,
        }
    }

    pub fn bootstrap_running(&self) -> bool {
        self.bootstrap_running
    }

    /// Number of processes launched so far.
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Execute commands from `input` until `quit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        info!("Waiting for commands");

        while let Some(line) = lines.next_line().await? {
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            match command {
                Command::Bootstrap => self.start_bootstrap(),
                Command::Node { addr } => self.start_node(addr.as_deref()),
                Command::Quit => {
                    info!("Quit requested");
                    break;
                }
                Command::Unknown(name) => warn!("Unknown command: {:?}", name),
            }
        }
        Ok(())
    }

    fn start_bootstrap(&mut self) {
        if self.bootstrap_running {
            info!("Bootstrap already running");
            return;
        }

        info!("Starting bootstrap");
        let args = ["--addr", self.config.bootstrap_addr.as_str()];
        match launch(&self.config.bootstrap_path, &args) {
            Ok(()) => {
                self.spawned += 1;
                self.bootstrap_running = true;
            }
            Err(e) => error!("Start bootstrap error: {}", e),
        }
    }

    fn start_node(&mut self, addr: Option<&str>) {
        let mut args = vec!["--bootstrap-addr", self.config.bootstrap_addr.as_str()];
        if let Some(addr) = addr {
            args.extend(["--addr", addr]);
        }

        info!("Starting node");
        match launch(&self.config.node_path, &args) {
            Ok(()) => self.spawned += 1,
            Err(e) => error!("Start node error: {}", e),
        }
    }
}

/// Spawn a detached child that shares our stderr.
fn launch(program: &str, args: &[&str]) -> io::Result<()> {
    let child = Process::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()?;
    info!("Launched {} (pid {:?})", program, child.id());
    Ok(())
}
