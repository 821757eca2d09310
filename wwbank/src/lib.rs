#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! Decoder for the object hierarchy of Wwise-style soundbanks and timing
//! repair for the Ogg Vorbis streams they carry.
//!
//! ### Bank Organization
//!
//! **Chunks**: a bank is a list of `tag | length | payload` chunks starting
//! with `BKHD`. `HIRC` holds the object hierarchy, `DIDX` and `DATA` hold
//! embedded media.
//! **Objects**: `HIRC` is a counted list of records, each a type tag, a
//! length and a body. Only the types needed to reach audio files from event
//! names are decoded; the rest are skipped by length.
//!
//! ### Object Graph
//!
//! - Event → event actions (play actions only)
//! - Action target → sounds, music segments, music playlists or random
//!   containers owned by it
//! - Playlist → segments → music tracks → file id
//! - Random container → sounds → file id
//!
//! ## Quick Start
//!
//! 1. Decode the object section of an event bank using [`process::section::Decoder`]
//! 2. Resolve event names to file ids using [`process::resolve::Resolver`]
//! 3. Pull the files out of an audio bank or `.wpk` using [`archive::read_media`]
//! 4. Fix up Ogg Vorbis payloads using [`process::revorb::Revorb`]
//!
//! ```rust,no_run
//! use wwbank::archive::read_media;
//! use wwbank::process::resolve::{NameHash, Resolver};
//! use wwbank::process::revorb::Revorb;
//! use wwbank::process::section::Decoder;
//!
//! let events_bank = std::fs::read("events.bnk")?;
//! let audio_bank = std::fs::read("audio.wpk")?;
//!
//! let decoded = Decoder::default().decode(&events_bank)?;
//! if decoded.diagnostics.soft_failed() {
//!     eprintln!("{} records could not be decoded", decoded.diagnostics.len());
//! }
//!
//! let names = [NameHash::new("Play_Music_Theme")];
//! let events = Resolver::new(&decoded.objects).resolve(&names);
//!
//! let by_file = events.by_file();
//! for media in read_media(&audio_bank)? {
//!     let names = media.id.and_then(|id| by_file.get(&id));
//!     if media.is_ogg() {
//!         let repaired = Revorb::default().repair(media.data)?;
//!         // write repaired.data
//!     }
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Malformed input never panics. Fatal problems are returned as errors;
//! recoverable ones (an undecodable record, a corrupt Ogg page) are logged,
//! skipped and collected in a [`utils::diagnostics::Diagnostics`] value that
//! comes back with the result. Setting a component's fail level to
//! [`log::Level::Warn`] turns those into errors as well.

pub mod archive;
pub mod process;
pub mod structs;
pub mod utils;
