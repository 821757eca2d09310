use crate::structs::event::{Event, EventAction};
use crate::structs::music::{MusicPlaylist, MusicSegment, MusicTrack};
use crate::structs::random::RandomContainer;
use crate::structs::sound::Sound;

/// Every object of interest decoded from one `HIRC` section, in section order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HircObjects {
    pub sounds: Vec<Sound>,
    pub event_actions: Vec<EventAction>,
    pub events: Vec<Event>,
    pub random_containers: Vec<RandomContainer>,
    pub music_segments: Vec<MusicSegment>,
    pub music_tracks: Vec<MusicTrack>,
    pub music_playlists: Vec<MusicPlaylist>,
}

impl HircObjects {
    /// Number of typed objects held, across all collections.
    pub fn len(&self) -> usize {
        self.sounds.len()
            + self.event_actions.len()
            + self.events.len()
            + self.random_containers.len()
            + self.music_segments.len()
            + self.music_tracks.len()
            + self.music_playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
