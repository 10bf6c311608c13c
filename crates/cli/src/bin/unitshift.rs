use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    unitshift_cli::main_entry()
}
