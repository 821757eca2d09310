use std::collections::{BTreeMap, HashMap};

use log::{debug, trace};

use crate::structs::event::{Event, EventAction};
use crate::structs::hirc::HircObjects;
use crate::structs::music::{MusicContainer, MusicSegment, MusicTrack};
use crate::utils::hash::name_hash;

/// One audio file reached from an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedFile {
    pub file_id: u32,
    /// The segment or random container the file was reached through, `None`
    /// when a play action targets the sound directly.
    pub group_id: Option<u32>,
}

/// An event name and the id it is looked up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameHash {
    pub name: String,
    pub hash: u32,
}

impl NameHash {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = name_hash(&name);

        Self { name, hash }
    }

    pub fn with_hash(name: impl Into<String>, hash: u32) -> Self {
        Self {
            name: name.into(),
            hash,
        }
    }
}

/// Reads an event name list: one name per line, blank lines and lines
/// starting with `#` ignored.
pub fn load_names(text: &str) -> Vec<NameHash> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(NameHash::new)
        .collect()
}

/// Event name to the files it plays, each list sorted by file id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMap {
    entries: BTreeMap<String, Vec<ResolvedFile>>,
}

impl EventMap {
    pub fn get(&self, name: &str) -> Option<&[ResolvedFile]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ResolvedFile])> {
        self.entries
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of every event that plays `file_id`, in name order.
    pub fn names_for(&self, file_id: u32) -> Vec<&str> {
        self.iter()
            .filter(|(_, files)| files.iter().any(|f| f.file_id == file_id))
            .map(|(name, _)| name)
            .collect()
    }

    /// Inverts the map: file id to the names of the events playing it.
    pub fn by_file(&self) -> HashMap<u32, Vec<&str>> {
        let mut by_file: HashMap<u32, Vec<&str>> = HashMap::new();
        for (name, files) in self.iter() {
            for file in files {
                let names = by_file.entry(file.file_id).or_default();
                if names.last() != Some(&name) {
                    names.push(name);
                }
            }
        }

        by_file
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<ResolvedFile>> {
        self.entries
    }
}

/// Walks the object graph from events down to the files they play.
///
/// Lookups by id keep the first object seen when an id occurs more than once.
#[derive(Debug)]
pub struct Resolver<'a> {
    objects: &'a HircObjects,
    events: HashMap<u32, &'a Event>,
    actions: HashMap<u32, &'a EventAction>,
    segments: HashMap<u32, &'a MusicSegment>,
    tracks: HashMap<u32, &'a MusicTrack>,
}

fn index_first<T>(items: &[T], id: impl Fn(&T) -> u32) -> HashMap<u32, &T> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        index.entry(id(item)).or_insert(item);
    }

    index
}

impl<'a> Resolver<'a> {
    pub fn new(objects: &'a HircObjects) -> Self {
        Self {
            objects,
            events: index_first(&objects.events, |e| e.self_id),
            actions: index_first(&objects.event_actions, |a| a.self_id),
            segments: index_first(&objects.music_segments, |s| s.self_id),
            tracks: index_first(&objects.music_tracks, |t| t.self_id),
        }
    }

    /// Files played by the event with id `hash`, in discovery order.
    ///
    /// An id without a matching event resolves to nothing.
    pub fn resolve_hash(&self, hash: u32) -> Vec<ResolvedFile> {
        let mut files = Vec::new();
        let Some(event) = self.events.get(&hash) else {
            return files;
        };

        for action_id in &event.action_ids {
            let Some(action) = self.actions.get(action_id) else {
                trace!("Event {hash}: action {action_id} not found");
                continue;
            };
            if !action.is_play() {
                continue;
            }
            if let Some(target) = action.object_target() {
                self.resolve_target(target, &mut files);
            }
        }

        files
    }

    fn resolve_target(&self, target: u32, files: &mut Vec<ResolvedFile>) {
        files.extend(
            self.objects
                .sounds
                .iter()
                .filter(|s| s.self_id == target || s.owner_id == target)
                .map(|s| ResolvedFile {
                    file_id: s.file_id,
                    group_id: None,
                }),
        );

        for segment in self
            .objects
            .music_segments
            .iter()
            .filter(|s| s.owner_id == target)
        {
            self.segment_files(segment, files);
        }

        for playlist in self
            .objects
            .music_playlists
            .iter()
            .filter(|p| p.owner_id == target)
        {
            for segment_id in playlist.children() {
                if let Some(segment) = self.segments.get(segment_id) {
                    self.segment_files(segment, files);
                }
            }
        }

        for container in self
            .objects
            .random_containers
            .iter()
            .filter(|c| c.owner_id == target)
        {
            for &candidate in &container.sound_ids {
                files.extend(
                    self.objects
                        .sounds
                        .iter()
                        .filter(|s| s.self_id == candidate || s.owner_id == candidate)
                        .map(|s| ResolvedFile {
                            file_id: s.file_id,
                            group_id: Some(container.self_id),
                        }),
                );
            }
        }
    }

    fn segment_files(&self, segment: &MusicSegment, files: &mut Vec<ResolvedFile>) {
        files.extend(
            segment
                .children()
                .iter()
                .filter_map(|id| self.tracks.get(id))
                .map(|track| ResolvedFile {
                    file_id: track.file_id,
                    group_id: Some(segment.self_id),
                }),
        );
    }

    /// Resolves every name. Names given more than once share one entry.
    pub fn resolve(&self, names: &[NameHash]) -> EventMap {
        let mut entries: BTreeMap<String, Vec<ResolvedFile>> = BTreeMap::new();
        for name in names {
            let files = self.resolve_hash(name.hash);
            trace!("{} ({:#010X}): {} files", name.name, name.hash, files.len());
            entries.entry(name.name.clone()).or_default().extend(files);
        }

        for files in entries.values_mut() {
            files.sort_by_key(|f| f.file_id);
        }

        debug!(
            "Resolved {} names, {} with files",
            entries.len(),
            entries.values().filter(|f| !f.is_empty()).count()
        );

        EventMap { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::event::{ACTION_PLAY, ACTION_SET_SWITCH, ActionTarget};
    use crate::structs::music::MusicPlaylist;
    use crate::structs::random::RandomContainer;
    use crate::structs::sound::Sound;

    fn sound(self_id: u32, file_id: u32, owner_id: u32) -> Sound {
        Sound {
            self_id,
            streamed: false,
            file_id,
            source_id: file_id,
            owner_id,
        }
    }

    fn play(self_id: u32, target: u32) -> EventAction {
        EventAction {
            self_id,
            scope: 3,
            kind: ACTION_PLAY,
            target: ActionTarget::Object(target),
        }
    }

    fn event(name: &str, action_ids: &[u32]) -> Event {
        Event {
            self_id: name_hash(name),
            action_ids: action_ids.to_vec(),
        }
    }

    fn segment(self_id: u32, owner_id: u32, track_ids: &[u32]) -> MusicSegment {
        MusicSegment {
            self_id,
            switch_id: 0,
            owner_id,
            track_ids: track_ids.to_vec(),
        }
    }

    fn track(self_id: u32, file_id: u32) -> MusicTrack {
        MusicTrack {
            self_id,
            file_id,
            container_id: 0,
        }
    }

    fn music_objects() -> HircObjects {
        HircObjects {
            events: vec![event("Play_Music", &[10])],
            event_actions: vec![play(10, 500)],
            music_playlists: vec![MusicPlaylist {
                self_id: 501,
                switch_id: 0,
                owner_id: 500,
                segment_ids: vec![20, 21],
            }],
            music_segments: vec![segment(20, 501, &[30, 31]), segment(21, 501, &[31, 32])],
            music_tracks: vec![track(30, 9003), track(31, 9001), track(32, 9002)],
            ..Default::default()
        }
    }

    #[test]
    fn playlist_fans_out_to_every_track() {
        let objects = music_objects();
        let map = Resolver::new(&objects).resolve(&[NameHash::new("Play_Music")]);

        assert_eq!(
            map.get("Play_Music").unwrap(),
            &[
                ResolvedFile {
                    file_id: 9001,
                    group_id: Some(20)
                },
                ResolvedFile {
                    file_id: 9001,
                    group_id: Some(21)
                },
                ResolvedFile {
                    file_id: 9002,
                    group_id: Some(21)
                },
                ResolvedFile {
                    file_id: 9003,
                    group_id: Some(20)
                },
            ]
        );
    }

    #[test]
    fn unknown_hash_resolves_to_nothing() {
        let objects = music_objects();
        let map = Resolver::new(&objects).resolve(&[NameHash::new("Play_Nothing")]);

        assert_eq!(map.get("Play_Nothing"), Some(&[][..]));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn direct_sounds_match_self_or_owner() {
        let objects = HircObjects {
            events: vec![event("Play_Hit", &[10, 11, 12])],
            event_actions: vec![
                play(10, 100),
                EventAction {
                    self_id: 11,
                    scope: 3,
                    kind: ACTION_SET_SWITCH,
                    target: ActionTarget::SwitchGroup(100),
                },
                EventAction {
                    kind: 2,
                    ..play(12, 100)
                },
            ],
            sounds: vec![sound(100, 7002, 0), sound(101, 7001, 100), sound(102, 7003, 5)],
            ..Default::default()
        };
        let map = Resolver::new(&objects).resolve(&[NameHash::new("Play_Hit")]);

        assert_eq!(
            map.get("Play_Hit").unwrap(),
            &[
                ResolvedFile {
                    file_id: 7001,
                    group_id: None
                },
                ResolvedFile {
                    file_id: 7002,
                    group_id: None
                },
            ]
        );
    }

    #[test]
    fn random_container_candidates_resolve_to_sounds() {
        let objects = HircObjects {
            events: vec![event("Play_Voice", &[10])],
            event_actions: vec![play(10, 300)],
            random_containers: vec![RandomContainer {
                self_id: 301,
                owner_id: 300,
                sound_ids: vec![400, 401],
            }],
            sounds: vec![sound(400, 8002, 1), sound(402, 8001, 401), sound(403, 8003, 2)],
            ..Default::default()
        };
        let map = Resolver::new(&objects).resolve(&[NameHash::new("Play_Voice")]);
        let files: Vec<_> = map.get("Play_Voice").unwrap().to_vec();

        assert_eq!(
            files,
            vec![
                ResolvedFile {
                    file_id: 8001,
                    group_id: Some(301)
                },
                ResolvedFile {
                    file_id: 8002,
                    group_id: Some(301)
                },
            ]
        );
        assert_eq!(map.names_for(8001), vec!["Play_Voice"]);
        assert!(map.names_for(8003).is_empty());
    }

    #[test]
    fn duplicate_names_merge_and_resolution_is_deterministic() {
        let objects = music_objects();
        let names = [
            NameHash::new("Play_Music"),
            NameHash::with_hash("alias", name_hash("play_music")),
            NameHash::new("Play_Music"),
        ];
        let resolver = Resolver::new(&objects);
        let first = resolver.resolve(&names);

        assert_eq!(first.get("Play_Music").unwrap().len(), 8);
        assert_eq!(first.get("alias").unwrap().len(), 4);
        assert_eq!(first, resolver.resolve(&names));
        assert_eq!(first.by_file()[&9001], vec!["Play_Music", "alias"]);
    }

    #[test]
    fn name_list_skips_comments_and_blanks() {
        let names = load_names("# music\nPlay_Music\n\n  Play_Hit  \r\n#end\n");
        assert_eq!(
            names,
            vec![NameHash::new("Play_Music"), NameHash::new("Play_Hit")]
        );
        assert_eq!(names[0].hash, name_hash("play_music"));
    }
}
