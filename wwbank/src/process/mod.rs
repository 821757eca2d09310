/// Bank chunk walking and object section decoding.
///
/// Provides the [`Decoder`](section::Decoder) for turning the `HIRC` section
/// of a bank into [`HircObjects`](crate::structs::hirc::HircObjects).
pub mod section;

/// Event name resolution.
///
/// Provides the [`Resolver`](resolve::Resolver) for walking from event ids
/// down to the audio files they play.
pub mod resolve;

/// Ogg page reading with gap detection.
///
/// Provides the [`PageReader`](pages::PageReader) that the timing repair
/// reads its input through.
pub mod pages;

/// Ogg Vorbis granule repair.
///
/// Provides [`Revorb`](revorb::Revorb) for rewriting the timing metadata of
/// a Vorbis stream extracted from a bank.
pub mod revorb;

use crate::process::resolve::{EventMap, NameHash, Resolver};
use crate::process::revorb::{Repaired, Revorb};
use crate::process::section::{Decoded, Decoder};
use crate::structs::hirc::HircObjects;
use crate::utils::errors::{FormatError, RepairError};

/// Decodes the object section of `bank` with default settings.
pub fn decode(bank: &[u8]) -> Result<Decoded, FormatError> {
    Decoder::default().decode(bank)
}

/// Resolves every name in `names` against `objects`.
pub fn resolve(objects: &HircObjects, names: &[NameHash]) -> EventMap {
    Resolver::new(objects).resolve(names)
}

/// Repairs the granule positions of an Ogg Vorbis stream with default settings.
pub fn repair(bitstream: &[u8]) -> Result<Repaired, RepairError> {
    Revorb::default().repair(bitstream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::fixtures;
    use crate::structs::header::HircType;
    use crate::utils::hash::name_hash;

    #[test]
    fn bank_to_event_map() -> anyhow::Result<()> {
        let records = vec![
            fixtures::event(name_hash("Play_Theme"), &[2]).record(HircType::Event),
            fixtures::event_action(2, 4, 100).record(HircType::EventAction),
            fixtures::music_container(20, 100, &[30, 31]).record(HircType::MusicSegment),
            fixtures::music_track(30, 5002, 20).record(HircType::MusicTrack),
            fixtures::music_track(31, 5001, 20).record(HircType::MusicTrack),
        ];
        let bank = fixtures::bank(&fixtures::section(5, &records));

        let decoded = decode(&bank)?;
        let map = resolve(
            &decoded.objects,
            &[NameHash::new("Play_Theme"), NameHash::new("Play_Other")],
        );

        let files: Vec<_> = map
            .get("Play_Theme")
            .unwrap()
            .iter()
            .map(|f| (f.file_id, f.group_id))
            .collect();
        assert_eq!(files, [(5001, Some(20)), (5002, Some(20))]);
        assert!(map.get("Play_Other").unwrap().is_empty());
        Ok(())
    }
}
