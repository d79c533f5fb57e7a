//! Signal preparation stages
//!
//! Everything that happens between decoded PCM and the spectral analysis:
//! - Channel mixing (stereo to mono)
//! - Frame cutting (lazy fixed-size frames with hop)
//! - Windowing (Blackman-Harris families)

pub mod channel_mixer;
pub mod framecutter;
pub mod windowing;

pub use channel_mixer::mono_mixer;
pub use framecutter::Framecutter;
pub use windowing::{blackman_harris_62db, blackman_harris_92db, windowing, WindowKind};
