//! Host platform detection and normalization.
//!
//! The host reports a raw OS id and a raw machine id (see [`RawPlatform`]).
//! [`normalize`] maps that pair onto the naming convention used by the
//! artifact repository, producing a [`PlatformKey`].

mod detection;
mod normalize;

pub use detection::{HostDetector, PlatformDetector, RawPlatform};
pub use normalize::{PlatformKey, normalize};
