//! Interactive music hierarchy.
//!
//! A playlist references segments, a segment references tracks, and a track
//! names the file it plays. Segments and playlists share one on-disk layout
//! and differ only in what their child ids point at.

use crate::structs::header::{HircRecord, HircType, read_id_list};
use crate::structs::hirc::HircObjects;
use crate::utils::cursor::ByteCursor;
use crate::utils::errors::RecordFault;

/// A music object owning an ordered list of subordinate ids.
pub trait MusicContainer {
    fn self_id(&self) -> u32;
    fn owner_id(&self) -> u32;
    fn children(&self) -> &[u32];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusicTrack {
    pub self_id: u32,
    pub file_id: u32,
    pub container_id: u32,
}

impl HircRecord for MusicTrack {
    const TYPE: HircType = HircType::MusicTrack;

    fn read(reader: &mut ByteCursor) -> Result<Self, RecordFault> {
        let self_id = reader.read_u32()?;
        reader.skip(10)?;
        let file_id = reader.read_u32()?;
        reader.skip(64)?;
        let container_id = reader.read_u32()?;

        Ok(Self {
            self_id,
            file_id,
            container_id,
        })
    }

    fn store(self, objects: &mut HircObjects) {
        objects.music_tracks.push(self);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ContainerBody {
    self_id: u32,
    switch_id: u32,
    owner_id: u32,
    children: Vec<u32>,
}

impl ContainerBody {
    fn read(reader: &mut ByteCursor) -> Result<Self, RecordFault> {
        let self_id = reader.read_u32()?;
        reader.skip(4)?;
        let switch_id = reader.read_u32()?;
        let owner_id = reader.read_u32()?;
        reader.skip(1)?;

        let props = reader.read_u8()? as usize;
        reader.skip(5 * props)?;
        let ranged = reader.read_u8()? as usize;
        reader.skip(9 * ranged)?;
        let positioning = reader.read_u8()?;
        reader.skip(9 + usize::from(positioning > 1))?;

        // 2: a stinger table follows
        if reader.read_u8()? == 2 {
            reader.skip(16)?;
            let stingers = reader.read_u8()? as usize;
            reader.skip(8 * stingers)?;
            reader.skip(2)?;
        } else {
            reader.skip(1)?;
        }

        let children = read_id_list(reader)?;

        Ok(Self {
            self_id,
            switch_id,
            owner_id,
            children,
        })
    }
}

/// Children are `MusicTrack::self_id` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicSegment {
    pub self_id: u32,
    pub switch_id: u32,
    pub owner_id: u32,
    pub track_ids: Vec<u32>,
}

impl HircRecord for MusicSegment {
    const TYPE: HircType = HircType::MusicSegment;

    fn read(reader: &mut ByteCursor) -> Result<Self, RecordFault> {
        let body = ContainerBody::read(reader)?;

        Ok(Self {
            self_id: body.self_id,
            switch_id: body.switch_id,
            owner_id: body.owner_id,
            track_ids: body.children,
        })
    }

    fn store(self, objects: &mut HircObjects) {
        objects.music_segments.push(self);
    }
}

impl MusicContainer for MusicSegment {
    fn self_id(&self) -> u32 {
        self.self_id
    }

    fn owner_id(&self) -> u32 {
        self.owner_id
    }

    fn children(&self) -> &[u32] {
        &self.track_ids
    }
}

/// Children are `MusicSegment::self_id` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicPlaylist {
    pub self_id: u32,
    pub switch_id: u32,
    pub owner_id: u32,
    pub segment_ids: Vec<u32>,
}

impl HircRecord for MusicPlaylist {
    const TYPE: HircType = HircType::MusicPlaylist;

    fn read(reader: &mut ByteCursor) -> Result<Self, RecordFault> {
        let body = ContainerBody::read(reader)?;

        Ok(Self {
            self_id: body.self_id,
            switch_id: body.switch_id,
            owner_id: body.owner_id,
            segment_ids: body.children,
        })
    }

    fn store(self, objects: &mut HircObjects) {
        objects.music_playlists.push(self);
    }
}

impl MusicContainer for MusicPlaylist {
    fn self_id(&self) -> u32 {
        self.self_id
    }

    fn owner_id(&self) -> u32 {
        self.owner_id
    }

    fn children(&self) -> &[u32] {
        &self.segment_ids
    }
}
