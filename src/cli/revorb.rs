use std::io::Write;

use anyhow::{Context, Result};
use indicatif::MultiProgress;
use wwbank::process::revorb::Revorb;

use super::command::{Cli, RevorbArgs};
use super::output::{replace_file, write_file};
use crate::input::InputReader;

pub fn cmd_revorb(args: &RevorbArgs, cli: &Cli, _multi: Option<&MultiProgress>) -> Result<()> {
    let mut input = InputReader::new(&args.input)?;
    let data = input.read_all()?;

    let mut revorb = Revorb::default();
    revorb.set_fail_level(cli.fail_level());
    if let Some(serial) = args.serial {
        revorb.set_serial(serial);
    }

    let repaired = revorb
        .repair(&data)
        .with_context(|| format!("Cannot repair {}", args.input.display()))?;

    log::info!(
        "{}: {} audio packets, {} samples per channel",
        args.input.display(),
        repaired.packets,
        repaired.granule
    );
    if repaired.soft_failed() {
        log::warn!(
            "{} pages or packets were dropped, output may have gaps",
            repaired.diagnostics.len()
        );
    }

    match &args.output_path {
        Some(path) => write_file(path, &repaired.data)?,
        None if input.is_pipe() => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&repaired.data)?;
            stdout.flush()?;
        }
        None => replace_file(&args.input, &repaired.data)?,
    }

    Ok(())
}
