//! Conda platform (subdir) identifiers.
//!
//! A channel is split into one sub-repository per platform. [`Platform`] names the
//! known subdirs and orders them the way the browser presents them: real platforms
//! alphabetically with `noarch` pinned last.

use crate::domain::error::BrowseError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A known conda subdir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    NoArch,
    Linux32,
    Linux64,
    LinuxAarch64,
    LinuxArmV6l,
    LinuxArmV7l,
    LinuxPpc64le,
    LinuxPpc64,
    LinuxS390X,
    LinuxRiscv64,
    Osx64,
    OsxArm64,
    Win32,
    Win64,
    WinArm64,
    EmscriptenWasm32,
    WasiWasm32,
    ZosZ,
    FreeBsd64,
}

impl Platform {
    /// Every platform the browser knows how to probe.
    pub const ALL: [Self; 19] = [
        Self::NoArch,
        Self::Linux32,
        Self::Linux64,
        Self::LinuxAarch64,
        Self::LinuxArmV6l,
        Self::LinuxArmV7l,
        Self::LinuxPpc64le,
        Self::LinuxPpc64,
        Self::LinuxS390X,
        Self::LinuxRiscv64,
        Self::Osx64,
        Self::OsxArm64,
        Self::Win32,
        Self::Win64,
        Self::WinArm64,
        Self::EmscriptenWasm32,
        Self::WasiWasm32,
        Self::ZosZ,
        Self::FreeBsd64,
    ];

    /// Returns the subdir name as used in channel URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoArch => "noarch",
            Self::Linux32 => "linux-32",
            Self::Linux64 => "linux-64",
            Self::LinuxAarch64 => "linux-aarch64",
            Self::LinuxArmV6l => "linux-armv6l",
            Self::LinuxArmV7l => "linux-armv7l",
            Self::LinuxPpc64le => "linux-ppc64le",
            Self::LinuxPpc64 => "linux-ppc64",
            Self::LinuxS390X => "linux-s390x",
            Self::LinuxRiscv64 => "linux-riscv64",
            Self::Osx64 => "osx-64",
            Self::OsxArm64 => "osx-arm64",
            Self::Win32 => "win-32",
            Self::Win64 => "win-64",
            Self::WinArm64 => "win-arm64",
            Self::EmscriptenWasm32 => "emscripten-wasm32",
            Self::WasiWasm32 => "wasi-wasm32",
            Self::ZosZ => "zos-z",
            Self::FreeBsd64 => "freebsd-64",
        }
    }

    /// Returns `true` for the architecture-independent subdir.
    #[must_use]
    pub const fn is_noarch(self) -> bool {
        matches!(self, Self::NoArch)
    }

    /// Returns the platform this binary was compiled for.
    ///
    /// Targets without a conda equivalent report `noarch`.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
            Self::Linux64
        } else if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
            Self::LinuxAarch64
        } else if cfg!(all(target_os = "linux", target_arch = "x86")) {
            Self::Linux32
        } else if cfg!(all(target_os = "linux", target_arch = "powerpc64")) {
            Self::LinuxPpc64le
        } else if cfg!(all(target_os = "linux", target_arch = "s390x")) {
            Self::LinuxS390X
        } else if cfg!(all(target_os = "linux", target_arch = "riscv64")) {
            Self::LinuxRiscv64
        } else if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
            Self::OsxArm64
        } else if cfg!(target_os = "macos") {
            Self::Osx64
        } else if cfg!(all(target_os = "windows", target_arch = "aarch64")) {
            Self::WinArm64
        } else if cfg!(all(target_os = "windows", target_arch = "x86")) {
            Self::Win32
        } else if cfg!(target_os = "windows") {
            Self::Win64
        } else if cfg!(target_os = "freebsd") {
            Self::FreeBsd64
        } else {
            Self::NoArch
        }
    }
}

impl Ord for Platform {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.is_noarch(), self.as_str()).cmp(&(other.is_noarch(), other.as_str()))
    }
}

impl PartialOrd for Platform {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = BrowseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == wanted)
            .ok_or_else(|| BrowseError::InvalidPlatform(s.to_string()))
    }
}

impl TryFrom<String> for Platform {
    type Error = BrowseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

/// Recommended platform selection for a set of available platforms.
///
/// Prefers `{current, noarch}` when both are available, then `{noarch}`, then the
/// first available platform. Returns an empty set only when nothing is available.
#[must_use]
pub fn recommended_platforms(available: &[Platform], current: Platform) -> BTreeSet<Platform> {
    let has = |platform: Platform| available.contains(&platform);

    if has(current) && has(Platform::NoArch) {
        return BTreeSet::from([current, Platform::NoArch]);
    }
    if has(Platform::NoArch) {
        return BTreeSet::from([Platform::NoArch]);
    }
    available.iter().min().copied().into_iter().collect()
}

/// Reconciles a requested platform selection against the discovered ones.
///
/// Keeps the requested platforms that are available; when none survive, falls back
/// to [`recommended_platforms`].
#[must_use]
pub fn reconcile_platforms(
    requested: &[Platform],
    available: &[Platform],
    current: Platform,
) -> BTreeSet<Platform> {
    let kept: BTreeSet<Platform> = requested
        .iter()
        .copied()
        .filter(|platform| available.contains(platform))
        .collect();

    if kept.is_empty() {
        recommended_platforms(available, current)
    } else {
        kept
    }
}

/// Short summary used by the platform indicator: one or two names joined with
/// `+`, otherwise the first name followed by the number of remaining platforms.
#[must_use]
pub fn summarize_platforms(platforms: &BTreeSet<Platform>) -> String {
    let names: Vec<&str> = platforms.iter().map(|p| p.as_str()).collect();
    match names.len() {
        0 => String::new(),
        1 | 2 => names.join("+"),
        n => format!("{}+{}", names[0], n - 1),
    }
}
