use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

lazy_static! {
    static ref HOST_PATTERN: Regex = Regex::new(r"host=([^,]+)").expect("valid host pattern");
    static ref PID_PATTERN: Regex = Regex::new(r"pid: (\d+)").expect("valid pid pattern");
}

/// One server process as reported by the cluster status command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPid {
    pub host: String,
    pub pid: u32,
}

/// Host/pid associations recovered from status text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostPids {
    pub pairs: Vec<HostPid>,
    pub hosts_found: usize,
    pub pids_found: usize,
}

impl HostPids {
    /// Host and pid counts disagree, so positional pairing may be wrong
    pub fn is_mismatched(&self) -> bool {
        self.hosts_found != self.pids_found
    }
}

/// Extracts every `host=<value>` and `pid: <digits>` occurrence and pairs
/// them by position.
///
/// The two lists are extracted independently. When their lengths differ
/// only the first `min(hosts, pids)` pairs are formed and the result reports
/// the mismatch. A pid that does not fit in `u32` drops only its own pair.
pub fn parse_host_pids(status: &str) -> HostPids {
    let hosts: Vec<&str> = HOST_PATTERN
        .captures_iter(status)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .collect();
    let pids: Vec<&str> = PID_PATTERN
        .captures_iter(status)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();

    let pairs = hosts
        .iter()
        .zip(pids.iter())
        .filter_map(|(host, pid)| match pid.parse::<u32>() {
            Ok(pid) => Some(HostPid {
                host: host.to_string(),
                pid,
            }),
            Err(_) => {
                warn!("Skipping {}: pid {} is out of range", host, pid);
                None
            }
        })
        .collect();

    HostPids {
        pairs,
        hosts_found: hosts.len(),
        pids_found: pids.len(),
    }
}
