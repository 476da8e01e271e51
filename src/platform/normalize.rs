use std::fmt;

use super::RawPlatform;

/// Raw OS id -> OS family used in artifact names.
const OS_TABLE: &[(&str, &str)] = &[
    ("darwin", "darwin"),
    ("linux", "linux"),
    ("win32", "windows"),
    ("cygwin", "windows"),
];

/// (OS family, raw machine id) -> architecture used in artifact names.
///
/// Only consulted for OS ids found in [`OS_TABLE`].
const ARCH_TABLE: &[(&str, &str, &str)] = &[
    ("darwin", "x86_64", "amd64"),
    ("linux", "i386", "386"),
    ("linux", "i686", "386"),
    ("linux", "x86_64", "amd64"),
    ("linux", "armv6hf", "arm"),
    ("linux", "armv7l", "arm"),
    ("linux", "aarch64", "arm64"),
    ("windows", "x86", "386"),
    ("windows", "i386", "386"),
    ("windows", "AMD64", "amd64"),
    ("windows", "x86_64", "amd64"),
];

const WINDOWS: &str = "windows";

/// Normalized (OS, architecture) pair used to name and locate an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformKey {
    pub os: String,
    pub arch: String,
}

impl PlatformKey {
    /// Whether executables for this platform carry an `.exe` extension.
    pub fn is_windows(&self) -> bool {
        self.os == WINDOWS
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.os, self.arch)
    }
}

/// Map raw host identifiers onto the artifact repository's naming.
///
/// Total: unknown OS ids pass through with their machine id untouched, and
/// machine ids without a rule for the OS family pass through too.
pub fn normalize(raw: &RawPlatform) -> PlatformKey {
    let family = OS_TABLE
        .iter()
        .find(|(os, _)| *os == raw.os)
        .map(|(_, family)| *family);

    let Some(family) = family else {
        return PlatformKey {
            os: raw.os.clone(),
            arch: raw.arch.clone(),
        };
    };

    let arch = ARCH_TABLE
        .iter()
        .find(|(os, arch, _)| *os == family && *arch == raw.arch)
        .map(|(_, _, normalized)| normalized.to_string())
        .unwrap_or_else(|| raw.arch.clone());

    PlatformKey {
        os: family.to_string(),
        arch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(os: &str, arch: &str) -> PlatformKey {
        normalize(&RawPlatform::new(os, arch))
    }

    #[test]
    fn test_normalize_table() {
        let cases = [
            (("darwin", "x86_64"), ("darwin", "amd64")),
            (("darwin", "arm64"), ("darwin", "arm64")),
            (("linux", "i386"), ("linux", "386")),
            (("linux", "i686"), ("linux", "386")),
            (("linux", "x86_64"), ("linux", "amd64")),
            (("linux", "armv6hf"), ("linux", "arm")),
            (("linux", "armv7l"), ("linux", "arm")),
            (("linux", "aarch64"), ("linux", "arm64")),
            (("linux", "ppc64le"), ("linux", "ppc64le")),
            (("win32", "x86"), ("windows", "386")),
            (("win32", "i386"), ("windows", "386")),
            (("win32", "AMD64"), ("windows", "amd64")),
            (("win32", "x86_64"), ("windows", "amd64")),
            (("cygwin", "x86_64"), ("windows", "amd64")),
            (("cygwin", "ARM64"), ("windows", "ARM64")),
        ];

        for ((os, arch), (want_os, want_arch)) in cases {
            let got = key(os, arch);
            assert_eq!(
                (got.os.as_str(), got.arch.as_str()),
                (want_os, want_arch),
                "normalizing ({}, {})",
                os,
                arch
            );
        }
    }

    #[test]
    fn test_normalize_unknown_os_passes_through() {
        assert_eq!(key("freebsd", "riscv64"), PlatformKey {
            os: "freebsd".into(),
            arch: "riscv64".into(),
        });
        // No arch rules outside the known OS families
        assert_eq!(key("freebsd", "x86_64").arch, "x86_64");
        assert_eq!(key("windows", "AMD64").arch, "AMD64");
    }

    #[test]
    fn test_normalize_arch_rules_are_os_scoped() {
        // i686 is only a 386 alias on linux
        assert_eq!(key("linux", "i686").arch, "386");
        assert_eq!(key("win32", "i686").arch, "i686");
        // aarch64 is only an arm64 alias on linux
        assert_eq!(key("darwin", "aarch64").arch, "aarch64");
        // AMD64 is only recognized on windows
        assert_eq!(key("linux", "AMD64").arch, "AMD64");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = RawPlatform::new("win32", "AMD64");
        assert_eq!(normalize(&raw), normalize(&raw));
    }

    #[test]
    fn test_platform_key_windows_family() {
        assert!(key("win32", "AMD64").is_windows());
        assert!(key("cygwin", "x86").is_windows());
        assert!(!key("linux", "x86_64").is_windows());
        assert!(!key("darwin", "arm64").is_windows());
    }

    #[test]
    fn test_platform_key_display() {
        assert_eq!(key("linux", "x86_64").to_string(), "linux amd64");
    }
}
