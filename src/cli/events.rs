use std::path::Path;

use anyhow::{Context, Result};
use indicatif::MultiProgress;
use serde::Serialize;
use wwbank::process::resolve::{EventMap, ResolvedFile, Resolver, load_names};
use wwbank::process::section::Decoder;

use super::command::{Cli, EventsArgs};
use super::output::write_file;
use crate::input::read_input;

/// Decodes the event bank and resolves every name of the name list.
pub fn load_event_map(events_path: &Path, names_path: &Path, cli: &Cli) -> Result<EventMap> {
    let bank = read_input(events_path)?;
    let mut decoder = Decoder::default();
    decoder.set_fail_level(cli.fail_level());
    let decoded = decoder
        .decode(&bank)
        .with_context(|| format!("Cannot decode event bank {}", events_path.display()))?;

    if decoded.diagnostics.soft_failed() {
        log::warn!(
            "{}: {} of {} objects could not be decoded",
            events_path.display(),
            decoded.diagnostics.len(),
            decoded.declared
        );
    }

    let text = String::from_utf8(read_input(names_path)?)
        .with_context(|| format!("{} is not UTF-8 text", names_path.display()))?;
    let names = load_names(&text);
    log::info!("Loaded {} event names from {}", names.len(), names_path.display());

    Ok(Resolver::new(&decoded.objects).resolve(&names))
}

#[derive(Debug, Serialize)]
struct EventEntry<'a> {
    name: &'a str,
    files: Vec<FileEntry>,
}

#[derive(Debug, Serialize)]
struct FileEntry {
    file_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<u32>,
}

impl From<&ResolvedFile> for FileEntry {
    fn from(file: &ResolvedFile) -> Self {
        Self {
            file_id: file.file_id,
            group_id: file.group_id,
        }
    }
}

fn to_yaml(map: &EventMap, include_empty: bool) -> Result<String> {
    let entries: Vec<EventEntry> = map
        .iter()
        .filter(|(_, files)| include_empty || !files.is_empty())
        .map(|(name, files)| EventEntry {
            name,
            files: files.iter().map(FileEntry::from).collect(),
        })
        .collect();

    Ok(serde_yaml_ng::to_string(&entries)?)
}

pub fn cmd_events(args: &EventsArgs, cli: &Cli, _multi: Option<&MultiProgress>) -> Result<()> {
    let map = load_event_map(&args.events, &args.names, cli)?;
    let resolved = map.iter().filter(|(_, files)| !files.is_empty()).count();
    log::info!("{resolved} of {} names play at least one file", map.len());

    let yaml = to_yaml(&map, args.include_empty)?;
    match &args.output_path {
        Some(path) => write_file(path, yaml.as_bytes())?,
        None => print!("{yaml}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wwbank::process::resolve::NameHash;
    use wwbank::structs::event::{ActionTarget, Event, EventAction};
    use wwbank::structs::hirc::HircObjects;
    use wwbank::structs::sound::Sound;

    #[test]
    fn yaml_lists_files_per_event() -> Result<()> {
        let objects = HircObjects {
            events: vec![Event {
                self_id: 1,
                action_ids: vec![2],
            }],
            event_actions: vec![EventAction {
                self_id: 2,
                scope: 3,
                kind: 4,
                target: ActionTarget::Object(3),
            }],
            sounds: vec![Sound {
                self_id: 3,
                streamed: true,
                file_id: 77,
                source_id: 77,
                owner_id: 0,
            }],
            ..Default::default()
        };
        let map = Resolver::new(&objects).resolve(&[
            NameHash::with_hash("Play_A", 1),
            NameHash::with_hash("Play_B", 9),
        ]);

        let yaml = to_yaml(&map, false)?;
        assert!(yaml.contains("name: Play_A"));
        assert!(yaml.contains("file_id: 77"));
        assert!(!yaml.contains("group_id"));
        assert!(!yaml.contains("Play_B"));

        assert!(to_yaml(&map, true)?.contains("name: Play_B"));
        Ok(())
    }
}
