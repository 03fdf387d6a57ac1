/// Reads `connected_clients` from a redis-protocol `INFO` reply.
///
/// Returns `None` when the field is absent or not a number.
pub fn parse_connected_clients(info: &str) -> Option<u32> {
    info.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("connected_clients:"))
        .and_then(|value| value.trim().parse().ok())
}
