//! Process heap usage, where the platform exposes it.

use tracing::debug;

/// Reads current heap usage in bytes. `None` means this reading failed.
pub type HeapProbe = fn() -> Option<u64>;

pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Resolve the heap capability once. `None` when the platform has none.
pub fn detect() -> Option<HeapProbe> {
    let probe = platform_probe()?;
    if probe().is_none() {
        debug!("Heap usage probe present but unreadable, disabling");
        return None;
    }
    Some(probe)
}

/// Bytes to whole megabytes, rounded to nearest.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_MB).round() as u64
}

#[cfg(target_os = "linux")]
fn platform_probe() -> Option<HeapProbe> {
    Some(linux_rss_anon)
}

#[cfg(windows)]
fn platform_probe() -> Option<HeapProbe> {
    Some(windows_private_working_set)
}

#[cfg(not(any(target_os = "linux", windows)))]
fn platform_probe() -> Option<HeapProbe> {
    None
}

#[cfg(target_os = "linux")]
fn linux_rss_anon() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_rss_anon(&status)
}

/// Resident anonymous memory from a `/proc/<pid>/status` dump, in bytes.
///
/// Only pages that were actually touched count; reserved address space does not.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_rss_anon(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("RssAnon:"))?;
    let mut fields = line["RssAnon:".len()..].split_whitespace();
    let kb: u64 = fields.next()?.parse().ok()?;
    match fields.next() {
        Some("kB") | None => Some(kb * 1024),
        Some(_) => None,
    }
}

/// Private working set: committed pages that are resident, not merely committed.
#[cfg(windows)]
fn windows_private_working_set() -> Option<u64> {
    use windows::Win32::System::ProcessStatus::{
        GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS, PROCESS_MEMORY_COUNTERS_EX2,
    };
    use windows::Win32::System::Threading::GetCurrentProcess;

    let mut counters = PROCESS_MEMORY_COUNTERS_EX2::default();
    let size = std::mem::size_of::<PROCESS_MEMORY_COUNTERS_EX2>() as u32;
    unsafe {
        GetProcessMemoryInfo(
            GetCurrentProcess(),
            &mut counters as *mut PROCESS_MEMORY_COUNTERS_EX2 as *mut PROCESS_MEMORY_COUNTERS,
            size,
        )
    }
    .ok()?;
    Some(counters.PrivateWorkingSetSize as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "Name:\tonesketch\nVmPeak:\t  812340 kB\nVmData:\t  204800 kB\n\
                          RssAnon:\t   18432 kB\nRssFile:\t   40960 kB\n";

    #[test]
    fn test_parse_rss_anon() {
        assert_eq!(parse_rss_anon(STATUS), Some(18_432 * 1024));
    }

    #[test]
    fn test_parse_rss_anon_missing() {
        assert_eq!(parse_rss_anon("Name:\tonesketch\nVmData:\t 204800 kB\n"), None);
        assert_eq!(parse_rss_anon("RssAnon:\t garbage kB\n"), None);
        assert_eq!(parse_rss_anon("RssAnon:\t 12 MB\n"), None);
    }

    #[test]
    fn test_bytes_to_mb_rounds() {
        assert_eq!(bytes_to_mb(0), 0);
        assert_eq!(bytes_to_mb(1_048_576), 1);
        assert_eq!(bytes_to_mb(1_048_576 + 524_288), 2);
        assert_eq!(bytes_to_mb(1_048_576 + 524_287), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_detect_on_linux() {
        let probe = detect().expect("procfs should be readable");
        assert!(probe().is_some());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_untouched_reservation_does_not_count() {
        let probe = detect().expect("procfs should be readable");
        let before = probe().unwrap_or(0);

        let reserved: Vec<u8> = Vec::with_capacity(512 * 1_048_576);
        let after = probe().unwrap_or(0);
        drop(reserved);

        // Other test threads may allocate meanwhile, but nowhere near 512 MB.
        assert!(
            bytes_to_mb(after.saturating_sub(before)) < 64,
            "reading grew from {before} to {after} bytes"
        );
    }
}
