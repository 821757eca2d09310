pub mod command;
pub mod events;
pub mod extract;
pub mod output;
pub mod revorb;
