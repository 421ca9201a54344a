//! Filesystem locations used by the browser.
//!
//! The data directory only holds the log file. Downloads go to the working
//! directory unless configured otherwise.

use std::path::PathBuf;

/// Returns the data directory, `<local data dir>/conda-browse`.
///
/// Falls back to the system temp directory on platforms without a local data
/// directory.
///
/// # Examples
///
/// ```
/// use conda_browse::infrastructure::get_data_dir;
///
/// assert!(get_data_dir().ends_with("conda-browse"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("conda-browse")
}

/// Returns the default download directory: the current working directory, or
/// `.` if it cannot be determined.
#[must_use]
pub fn default_download_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_dir_is_absolute_when_cwd_is_known() {
        let dir = default_download_dir();
        assert!(dir.is_absolute() || dir == PathBuf::from("."));
    }
}
