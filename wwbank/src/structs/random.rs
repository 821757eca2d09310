use crate::structs::header::{HircRecord, HircType, read_id_list};
use crate::structs::hirc::HircObjects;
use crate::utils::cursor::ByteCursor;
use crate::utils::errors::RecordFault;

/// Picks one of its sounds at random on each play.
///
/// Most of the record is property and positioning blocks whose contents are
/// not needed; only their sizes are decoded so they can be skipped. A layout
/// discriminant above 1 has been seen in shipped banks without its meaning
/// being known, and such records are abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomContainer {
    pub self_id: u32,
    pub owner_id: u32,
    /// Candidates, matched against both `Sound::self_id` and `Sound::owner_id`.
    pub sound_ids: Vec<u32>,
}

impl HircRecord for RandomContainer {
    const TYPE: HircType = HircType::RandomContainer;

    fn read(reader: &mut ByteCursor) -> Result<Self, RecordFault> {
        let self_id = reader.read_u32()?;
        reader.skip(1)?;

        let effects = reader.read_u8()? as usize;
        reader.skip(5 + usize::from(effects != 0) + 7 * effects)?;

        let owner_id = reader.read_u32()?;
        reader.skip(1)?;

        let props = reader.read_u8()? as usize;
        reader.skip(5 * props)?;
        let ranged = reader.read_u8()? as usize;
        reader.skip(9 * ranged)?;
        let positioning = reader.read_u8()?;
        reader.skip(9 + usize::from(positioning > 1))?;

        let layout = reader.read_u8()?;
        let mut to_skip = 25;
        match layout {
            0 => {}
            1 => {
                reader.skip(13)?;
                let entries = reader.read_u8()? as usize;
                to_skip += 12 * entries;
            }
            value => {
                return Err(RecordFault::UnsupportedLayout {
                    field: "random container layout",
                    value,
                });
            }
        }
        reader.skip(to_skip)?;

        let sound_ids = read_id_list(reader)?;

        Ok(Self {
            self_id,
            owner_id,
            sound_ids,
        })
    }

    fn store(self, objects: &mut HircObjects) {
        objects.random_containers.push(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::fixtures;
    use crate::structs::header::MAX_CHILD_IDS;

    #[test]
    fn reads_owner_and_candidates() {
        let body = fixtures::random_container(50, 900, &[1, 2, 3]).0;
        let mut reader = ByteCursor::new(&body);
        let container = RandomContainer::read(&mut reader).unwrap();

        assert_eq!(container.self_id, 50);
        assert_eq!(container.owner_id, 900);
        assert_eq!(container.sound_ids, vec![1, 2, 3]);
        assert!(reader.is_at_end());
    }

    #[test]
    fn variable_blocks_are_skipped_by_their_counts() {
        // two effects, one property, positioning 2, layout 1 with one entry
        let body = fixtures::Body::default()
            .u32(50)
            .zeros(1)
            .u8(2)
            .zeros(5 + 1 + 14)
            .u32(900)
            .zeros(1)
            .u8(1)
            .zeros(5)
            .u8(0)
            .u8(2)
            .zeros(10)
            .u8(1)
            .zeros(13)
            .u8(1)
            .zeros(25 + 12)
            .id_list(&[8])
            .0;

        let container = RandomContainer::read(&mut ByteCursor::new(&body)).unwrap();
        assert_eq!(container.owner_id, 900);
        assert_eq!(container.sound_ids, vec![8]);
    }

    #[test]
    fn unknown_layout_is_abandoned() {
        let body = fixtures::random_container_prefix(50, 900)
            .u8(2)
            .zeros(64)
            .0;
        assert_eq!(
            RandomContainer::read(&mut ByteCursor::new(&body)),
            Err(RecordFault::UnsupportedLayout {
                field: "random container layout",
                value: 2
            })
        );
    }

    #[test]
    fn oversized_candidate_count_is_rejected() {
        let body = fixtures::random_container_prefix(50, 900)
            .u8(0)
            .zeros(25)
            .u32(101)
            .0;
        assert_eq!(
            RandomContainer::read(&mut ByteCursor::new(&body)),
            Err(RecordFault::TooManyIds {
                count: 101,
                max: MAX_CHILD_IDS
            })
        );
    }
}
