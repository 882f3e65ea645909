//! Display formatting for elapsed time

const MILLIS_PER_HOUR: u64 = 3_600_000;

/// Render elapsed running time as `MM:SS.t`, or `HH:MM:SS.t` from one hour on.
///
/// `t` is tenths of a second. Hours are not capped at 99.
pub fn formatted_time(elapsed_millis: u64) -> String {
    let tenths = (elapsed_millis % 1000) / 100;
    let total_seconds = elapsed_millis / 1000;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    if elapsed_millis >= MILLIS_PER_HOUR {
        format!("{:02}:{:02}:{:02}.{}", hours, minutes, seconds, tenths)
    } else {
        format!("{:02}:{:02}.{}", minutes, seconds, tenths)
    }
}
