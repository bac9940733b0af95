pub mod tone;
pub mod waveform;

pub use self::tone::*;
pub use self::waveform::*;
