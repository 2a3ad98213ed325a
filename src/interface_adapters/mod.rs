// Interface adapters: wire protocol, input decoding and frame publishing.

pub mod frames;
pub mod input;
pub mod protocol;
