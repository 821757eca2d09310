//! Data structures representing soundbank and bitstream components.
//!
//! Contains the typed `HIRC` records (sounds, event actions, events, random
//! containers and the music hierarchy), the record header shared by all of
//! them, and the Vorbis header structures needed to time audio packets.

pub mod event;
pub mod header;
pub mod hirc;
pub mod music;
pub mod random;
pub mod sound;
pub mod vorbis;

#[cfg(test)]
pub(crate) mod fixtures;
