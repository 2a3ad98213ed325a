// Per-tick rules that turn spatial overlap into state changes.

pub mod bombs;
pub mod items;
pub mod movement;
