use crate::privileged::{PkexecWriter, PrivilegedWriter};
use crate::telemetry::POWER_SUPPLY_ROOT;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use wattson_core::{Result, WattsonError};

/// Vendor conventions for the maximum-charge control file, relative to the
/// power-supply class directory, in priority order.
///
/// The order is a public contract: the first pattern whose expansion yields
/// a readable file decides which path is reported (and written). On a
/// machine exposing several of these, reordering the list changes which
/// battery gets controlled.
pub const CANDIDATE_PATTERNS: &[&str] = &[
    // Kernel-standard name (ThinkPad, LG, Samsung, recent ASUS).
    "BAT*/charge_control_end_threshold",
    // Older ASUS / Huawei trees.
    "BAT*/charge_stop_threshold",
    // Vendor-named supplies (BATT, CMB0, ...).
    "*/charge_control_end_threshold",
];

/// Allowed charge-limit range. The floor is a deliberate safety margin:
/// limits below 20% are rejected regardless of what the hardware accepts.
pub const LIMIT_MIN: i64 = 20;
pub const LIMIT_MAX: i64 = 100;

/// Outcome of one probe across the candidate patterns. Recomputed on every
/// query and never cached, so battery hot-plug is picked up for free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeLimitSupport {
    pub supported: bool,
    /// The winning control file, when supported.
    pub control_path: Option<PathBuf>,
    /// Limit currently programmed into the hardware, when supported.
    pub current_limit: Option<u8>,
}

impl ChargeLimitSupport {
    fn unsupported() -> Self {
        Self {
            supported: false,
            control_path: None,
            current_limit: None,
        }
    }
}

/// Discovers and drives the vendor-specific charge-threshold control file.
///
/// Stateless per call: every operation re-probes the filesystem. Writes go
/// directly to sysfs first and fall back to the [`PrivilegedWriter`] when
/// the kernel refuses with a permission error.
pub struct ThresholdControl {
    root: PathBuf,
    writer: Box<dyn PrivilegedWriter>,
}

impl ThresholdControl {
    pub fn new() -> Self {
        Self::with(POWER_SUPPLY_ROOT, Box::new(PkexecWriter))
    }

    pub fn with(root: impl Into<PathBuf>, writer: Box<dyn PrivilegedWriter>) -> Self {
        Self {
            root: root.into(),
            writer,
        }
    }

    /// Walk the candidate patterns and report the first control file that
    /// reads as an integer. Unreadable or garbled candidates are skipped,
    /// not fatal.
    pub fn probe(&self) -> ChargeLimitSupport {
        for pattern in CANDIDATE_PATTERNS {
            for path in expand_pattern(&self.root, pattern) {
                let Ok(raw) = std::fs::read_to_string(&path) else {
                    continue;
                };
                let Ok(limit) = raw.trim().parse::<u8>() else {
                    tracing::debug!("unparsable threshold file {}: {raw:?}", path.display());
                    continue;
                };
                return ChargeLimitSupport {
                    supported: true,
                    control_path: Some(path),
                    current_limit: Some(limit),
                };
            }
        }
        ChargeLimitSupport::unsupported()
    }

    /// The limit currently programmed into the hardware, if any.
    pub fn current_limit(&self) -> Option<u8> {
        self.probe().current_limit
    }

    /// Program a new maximum-charge limit.
    ///
    /// This alters real charging behavior of the machine and there is no
    /// rollback — the previous limit is simply overwritten.
    pub fn set_limit(&self, requested: i64) -> Result<()> {
        // Range first: an out-of-range request is rejected the same way on
        // every machine, with or without hardware support.
        if !(LIMIT_MIN..=LIMIT_MAX).contains(&requested) {
            return Err(WattsonError::InvalidRange(requested));
        }
        let value = requested as u8;

        let support = self.probe();
        let Some(path) = support.control_path else {
            return Err(WattsonError::Unsupported);
        };

        match std::fs::write(&path, value.to_string()) {
            Ok(()) => {
                tracing::info!("charge limit set to {value}% via {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                tracing::info!(
                    "direct write to {} refused; retrying via privileged helper",
                    path.display()
                );
                self.writer.write(&path, value)?;
                tracing::info!("charge limit set to {value}% via privileged helper");
                Ok(())
            }
            Err(e) => Err(WattsonError::WriteFailed(format!(
                "{}: {e}",
                path.display()
            ))),
        }
    }
}

impl Default for ThresholdControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand one `dir-pattern/file` candidate against the supply directory.
/// Matches are sorted so multi-battery systems resolve deterministically.
fn expand_pattern(root: &Path, pattern: &str) -> Vec<PathBuf> {
    let Some((dir_pat, file)) = pattern.split_once('/') else {
        return Vec::new();
    };

    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .filter(|e| name_matches(dir_pat, &e.file_name().to_string_lossy()))
        .map(|e| e.path().join(file))
        .collect();
    paths.sort();
    paths
}

/// Glob-lite: literal match, or a single `*` matching any run of characters.
fn name_matches(pattern: &str, name: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
        None => pattern == name,
    }
}
