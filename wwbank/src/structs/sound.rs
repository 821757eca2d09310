use crate::structs::header::{HircRecord, HircType};
use crate::structs::hirc::HircObjects;
use crate::utils::cursor::ByteCursor;
use crate::utils::errors::RecordFault;

/// A playable sound object. `file_id` names the emitted `.wem` asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sound {
    pub self_id: u32,
    pub streamed: bool,
    pub file_id: u32,
    pub source_id: u32,
    pub owner_id: u32,
}

impl HircRecord for Sound {
    const TYPE: HircType = HircType::Sound;

    fn read(reader: &mut ByteCursor) -> Result<Self, RecordFault> {
        let self_id = reader.read_u32()?;
        reader.skip(4)?;
        let streamed = reader.read_u8()? != 0;
        let file_id = reader.read_u32()?;
        let source_id = reader.read_u32()?;
        reader.skip(8)?;
        let owner_id = reader.read_u32()?;

        Ok(Self {
            self_id,
            streamed,
            file_id,
            source_id,
            owner_id,
        })
    }

    fn store(self, objects: &mut HircObjects) {
        objects.sounds.push(self);
    }
}
