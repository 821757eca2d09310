use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use wwbank::archive::{Media, read_media};
use wwbank::process::revorb::Revorb;

use super::command::{Cli, ExtractArgs};
use super::events::load_event_map;
use super::output::{create_path_with_extension, sanitize_component, write_file};
use crate::input::read_input;

#[derive(Debug, Default)]
struct ExtractStats {
    files: usize,
    named: usize,
    oggs: usize,
    repair_warnings: usize,
    repair_failures: usize,
    /// Files with nothing to write under `--ogg-only`.
    skipped: usize,
}

pub fn cmd_extract(args: &ExtractArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!("Extracting audio from {}", args.audio.display());

    let by_file: HashMap<u32, Vec<String>> = match (&args.names.events, &args.names.names) {
        (Some(events), Some(names)) => load_event_map(events, names, cli)?
            .by_file()
            .into_iter()
            .map(|(id, names)| (id, names.into_iter().map(sanitize_component).collect()))
            .collect(),
        (Some(_), None) => {
            log::warn!("--events given without --names, files will not be named");
            HashMap::new()
        }
        _ => HashMap::new(),
    };

    let container = read_input(&args.audio)?;
    let media = read_media(&container)
        .with_context(|| format!("Cannot read audio container {}", args.audio.display()))?;

    let ungrouped = args
        .audio
        .file_stem()
        .map(|stem| sanitize_component(&stem.to_string_lossy()))
        .unwrap_or_else(|| "audio".to_string());

    let pb = match multi {
        Some(multi) => {
            let pb = multi.add(ProgressBar::new(media.len() as u64));
            pb.set_style(ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} files ({percent}%)\n{msg} | elapsed: {elapsed_precise}",
            )?);
            Some(pb)
        }
        None => None,
    };

    let stats = extract_all(&media, &by_file, &ungrouped, args, cli, pb.as_ref())?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    log::info!(
        "Extracted {} files ({} named, {} Ogg streams) to {}",
        stats.files,
        stats.named,
        stats.oggs,
        args.output_path.display()
    );
    if stats.repair_warnings > 0 || stats.repair_failures > 0 {
        log::warn!(
            "{} Ogg streams repaired with warnings, {} could not be repaired",
            stats.repair_warnings,
            stats.repair_failures
        );
    }
    if stats.skipped > 0 {
        log::warn!(
            "{} of {} files are not Ogg streams, nothing was written for them (--ogg-only)",
            stats.skipped,
            stats.files
        );
    }

    Ok(())
}

fn extract_all(
    media: &[Media],
    by_file: &HashMap<u32, Vec<String>>,
    ungrouped: &str,
    args: &ExtractArgs,
    cli: &Cli,
    pb: Option<&ProgressBar>,
) -> Result<ExtractStats> {
    let mut stats = ExtractStats::default();
    for item in media {
        let dirs: Vec<PathBuf> = match item.id.and_then(|id| by_file.get(&id)) {
            Some(names) => {
                stats.named += 1;
                names.iter().map(|n| args.output_path.join(n)).collect()
            }
            None => vec![args.output_path.join(ungrouped)],
        };

        extract_one(item, &dirs, args, cli, &mut stats)?;
        stats.files += 1;

        if let Some(pb) = pb {
            pb.set_message(item.name.clone());
            pb.inc(1);
        }
    }

    Ok(stats)
}

fn extract_one(
    item: &Media,
    dirs: &[PathBuf],
    args: &ExtractArgs,
    cli: &Cli,
    stats: &mut ExtractStats,
) -> Result<()> {
    let file_name = Path::new(&item.name)
        .file_name()
        .map(|name| sanitize_component(&name.to_string_lossy()))
        .unwrap_or_else(|| "unnamed.wem".to_string());

    if !args.ogg_only {
        for dir in dirs {
            write_file(&dir.join(&file_name), item.data)?;
        }
    }

    if !item.is_ogg() {
        if args.ogg_only {
            log::debug!("{}: not an Ogg stream, skipped", item.name);
            stats.skipped += 1;
        }
        return Ok(());
    }
    if args.wem_only {
        return Ok(());
    }
    stats.oggs += 1;

    let mut revorb = Revorb::default();
    revorb.set_fail_level(cli.fail_level());
    let repaired = match revorb.repair(item.data) {
        Ok(repaired) => repaired,
        Err(e) if cli.strict => {
            return Err(e).with_context(|| format!("Cannot repair {}", item.name));
        }
        Err(e) => {
            log::warn!("{}: {e}, skipping the .ogg copy", item.name);
            stats.repair_failures += 1;
            return Ok(());
        }
    };
    if repaired.soft_failed() {
        stats.repair_warnings += 1;
    }

    let ogg_name = create_path_with_extension(Path::new(&file_name), "ogg");
    for dir in dirs {
        write_file(&dir.join(&ogg_name), &repaired.data)?;
    }

    Ok(())
}
