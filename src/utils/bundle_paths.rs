//! Locating the external tools
//!
//! yt-dlp is looked up in this order:
//! 1. next to the executable (or in `Resources/bin` when running from a macOS .app bundle)
//! 2. the system PATH
//! 3. common installation paths (Homebrew, pip user installs, ...)
//!
//! ffmpeg is only ever reported when it is bundled next to the executable or
//! sits in the working directory. A system-wide ffmpeg is found by yt-dlp itself.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[cfg(windows)]
const YTDLP_BIN: &str = "yt-dlp.exe";
#[cfg(not(windows))]
const YTDLP_BIN: &str = "yt-dlp";

#[cfg(windows)]
const FFMPEG_BIN: &str = "ffmpeg.exe";
#[cfg(not(windows))]
const FFMPEG_BIN: &str = "ffmpeg";

/// Find the yt-dlp binary
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Some(bundled) = find_bundled(YTDLP_BIN) {
        info!("Using bundled yt-dlp: {:?}", bundled);
        return Some(bundled);
    }

    if let Ok(system) = which::which("yt-dlp") {
        info!("Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("yt-dlp not found anywhere");
    None
}

/// Directory holding a bundled ffmpeg, if there is one
pub fn find_bundled_ffmpeg_dir() -> Option<PathBuf> {
    if let Some(dir) = exe_dir() {
        if is_executable(&dir.join(FFMPEG_BIN)) {
            return Some(dir);
        }
    }

    let cwd = std::env::current_dir().ok()?;
    if is_executable(&cwd.join(FFMPEG_BIN)) {
        debug!("Using ffmpeg from working directory {:?}", cwd);
        return Some(cwd);
    }

    None
}

fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

fn find_bundled(bin: &str) -> Option<PathBuf> {
    let dir = exe_dir()?;
    debug!("Looking for bundled {} in {:?}", bin, dir);

    // Rustgrab.app/Contents/MacOS/rustgrab -> Contents/Resources/bin/<bin>
    if dir.ends_with("MacOS") {
        if let Some(contents) = dir.parent() {
            let candidate = contents.join("Resources").join("bin").join(bin);
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }

    let candidate = dir.join(bin);
    if is_executable(&candidate) {
        return Some(candidate);
    }

    None
}

fn find_in_common_paths() -> Option<PathBuf> {
    let common_paths = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        "/Library/Frameworks/Python.framework/Versions/Current/bin/yt-dlp",
        "~/.local/bin/yt-dlp",
    ];

    common_paths
        .iter()
        .map(|p| expand_home(p))
        .find(|p| is_executable(p))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Check if a file exists and is executable
pub(crate) fn is_executable(path: &Path) -> bool {
    path.is_file() && has_exec_bit(path)
}

#[cfg(unix)]
fn has_exec_bit(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn has_exec_bit(_path: &Path) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ytdlp() {
        // yt-dlp might not be installed in CI
        let result = find_ytdlp();
        if let Some(path) = result {
            assert!(is_executable(&path));
        }
    }

    #[test]
    fn test_expand_home() {
        let expanded = expand_home("~/.local/bin/yt-dlp");
        if dirs::home_dir().is_some() {
            assert!(expanded.is_absolute());
            assert!(expanded.ends_with(".local/bin/yt-dlp"));
        }
        assert_eq!(expand_home("/usr/bin/yt-dlp"), PathBuf::from("/usr/bin/yt-dlp"));
    }

    #[test]
    fn test_directory_is_not_executable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_executable(dir.path()));
        assert!(!is_executable(&dir.path().join("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_executable_checks_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tool");
        std::fs::write(&file, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&file));

        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&file));
    }
}
