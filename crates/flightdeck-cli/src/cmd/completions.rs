//! `flightdeck completions`: shell completion scripts.

use std::io::{self, Write};

use clap::{Args, Command};
use clap_complete::{Shell, generate};

/// Binary name completions are registered under.
const BIN_NAME: &str = "flightdeck";

/// Arguments for `flightdeck completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

fn write_completions(shell: Shell, command: &mut Command, w: &mut dyn Write) {
    generate(shell, command, BIN_NAME, w);
}

/// Execute `flightdeck completions`.
pub fn run_completions(args: &CompletionsArgs, command: &mut Command) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_completions(args.shell, command, &mut out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_names_subcommands() {
        let mut command = Command::new(BIN_NAME).subcommand(Command::new("board"));
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut command, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("flightdeck"));
        assert!(script.contains("board"));
    }
}
