//! Host detection for platform backend selection.

use super::PlatformKind;

/// Return the preferred platform backend for the current host.
#[must_use]
pub fn default_platform() -> PlatformKind {
    #[cfg(windows)]
    {
        PlatformKind::Windows
    }

    #[cfg(unix)]
    {
        PlatformKind::Posix
    }

    #[cfg(not(any(windows, unix)))]
    {
        PlatformKind::Portable
    }
}
