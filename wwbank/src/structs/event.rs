//! Events and the actions they trigger.

use crate::structs::header::{HircRecord, HircType};
use crate::structs::hirc::HircObjects;
use crate::utils::cursor::ByteCursor;
use crate::utils::errors::RecordFault;

pub const ACTION_PLAY: u8 = 4;
pub const ACTION_SET_SWITCH: u8 = 25;

/// What an action operates on. Set-switch actions carry a switch group in
/// place of an object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    Object(u32),
    SwitchGroup(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventAction {
    pub self_id: u32,
    pub scope: u8,
    pub kind: u8,
    pub target: ActionTarget,
}

impl EventAction {
    pub fn is_play(&self) -> bool {
        self.kind == ACTION_PLAY
    }

    pub fn object_target(&self) -> Option<u32> {
        match self.target {
            ActionTarget::Object(id) => Some(id),
            ActionTarget::SwitchGroup(_) => None,
        }
    }
}

impl HircRecord for EventAction {
    const TYPE: HircType = HircType::EventAction;

    fn read(reader: &mut ByteCursor) -> Result<Self, RecordFault> {
        let self_id = reader.read_u32()?;
        let scope = reader.read_u8()?;
        let kind = reader.read_u8()?;

        let target = if kind == ACTION_SET_SWITCH {
            reader.skip(7)?;
            ActionTarget::SwitchGroup(reader.read_u32()?)
        } else {
            ActionTarget::Object(reader.read_u32()?)
        };

        Ok(Self {
            self_id,
            scope,
            kind,
            target,
        })
    }

    fn store(self, objects: &mut HircObjects) {
        objects.event_actions.push(self);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub self_id: u32,
    pub action_ids: Vec<u32>,
}

impl HircRecord for Event {
    const TYPE: HircType = HircType::Event;

    fn read(reader: &mut ByteCursor) -> Result<Self, RecordFault> {
        let self_id = reader.read_u32()?;
        let count = reader.read_u8()?;
        let action_ids = reader.read_u32_vec(count as usize)?;

        Ok(Self {
            self_id,
            action_ids,
        })
    }

    fn store(self, objects: &mut HircObjects) {
        objects.events.push(self);
    }
}
