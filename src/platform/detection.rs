/// Raw platform identifiers as reported by the host, before normalization.
///
/// The values follow the convention the artifact publisher expects from a
/// packaging front-end: `darwin`, `linux` or `win32` for the OS, and the
/// machine name as `uname -m` (or Windows' `PROCESSOR_ARCHITECTURE`) would
/// print it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPlatform {
    pub os: String,
    pub arch: String,
}

impl RawPlatform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the current platform
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: Self::detect_arch(),
        }
    }

    /// Replace the detected values with caller supplied ones, if any.
    pub fn with_overrides(self, os: Option<String>, arch: Option<String>) -> Self {
        Self {
            os: os.unwrap_or(self.os),
            arch: arch.unwrap_or(self.arch),
        }
    }

    fn detect_os() -> String {
        #[cfg(target_os = "macos")]
        {
            "darwin".to_string()
        }
        #[cfg(target_os = "linux")]
        {
            "linux".to_string()
        }
        #[cfg(target_os = "windows")]
        {
            "win32".to_string()
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            std::env::consts::OS.to_string()
        }
    }

    fn detect_arch() -> String {
        #[cfg(all(target_os = "windows", target_arch = "x86_64"))]
        {
            "AMD64".to_string()
        }
        #[cfg(all(target_os = "windows", target_arch = "x86"))]
        {
            "x86".to_string()
        }
        #[cfg(all(target_os = "windows", target_arch = "aarch64"))]
        {
            "ARM64".to_string()
        }
        #[cfg(all(not(target_os = "windows"), target_arch = "x86_64"))]
        {
            "x86_64".to_string()
        }
        #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
        {
            "arm64".to_string()
        }
        #[cfg(all(
            not(any(target_os = "windows", target_os = "macos")),
            target_arch = "aarch64"
        ))]
        {
            "aarch64".to_string()
        }
        #[cfg(all(not(target_os = "windows"), target_arch = "x86"))]
        {
            "i686".to_string()
        }
        #[cfg(all(not(target_os = "windows"), target_arch = "arm"))]
        {
            "armv7l".to_string()
        }
        #[cfg(not(any(
            target_arch = "x86_64",
            target_arch = "aarch64",
            target_arch = "x86",
            all(not(target_os = "windows"), target_arch = "arm")
        )))]
        {
            std::env::consts::ARCH.to_string()
        }
    }
}

/// Trait for platform detection (useful for testing)
pub trait PlatformDetector: Send + Sync {
    fn detect(&self) -> RawPlatform;
}

/// Detector for the machine this binary was compiled for, with optional
/// overrides for cross-packaging.
#[derive(Debug, Default, Clone)]
pub struct HostDetector {
    os: Option<String>,
    arch: Option<String>,
}

impl HostDetector {
    pub fn new(os: Option<String>, arch: Option<String>) -> Self {
        Self { os, arch }
    }
}

impl PlatformDetector for HostDetector {
    fn detect(&self) -> RawPlatform {
        RawPlatform::detect().with_overrides(self.os.clone(), self.arch.clone())
    }
}
