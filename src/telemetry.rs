//! CPU load and temperature readings from procfs/sysfs
//!
//! Both CPU figures are deltas between consecutive calls, so the first call
//! after construction only primes the counters and reports them unavailable.

use crate::host::TelemetrySample;

/// `(active, total)` jiffies from the aggregate `cpu` line of `/proc/stat`
pub fn parse_proc_stat(contents: &str) -> Option<(u64, u64)> {
    let line = contents.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if fields.len() < 7 {
        return None;
    }
    let (user, nice, system, idle, iowait, irq, softirq) = (
        fields[0], fields[1], fields[2], fields[3], fields[4], fields[5], fields[6],
    );
    let active = user + nice + system + irq + softirq;
    Some((active, active + idle + iowait))
}

/// utime + stime + cutime + cstime (fields 14-17) from `/proc/<pid>/stat`.
///
/// The command name in field 2 may contain spaces, so fields are counted from
/// the closing parenthesis.
pub fn parse_process_ticks(contents: &str) -> Option<u64> {
    let rest = &contents[contents.rfind(')')? + 1..];
    // First field after the name is field 3 (state)
    let fields: Vec<&str> = rest.split_whitespace().collect();
    fields
        .get(11..15)?
        .iter()
        .map(|f| f.parse::<i64>().ok())
        .sum::<Option<i64>>()
        .and_then(|t| u64::try_from(t).ok())
}

/// Degrees Celsius from a sysfs thermal reading in millidegrees
pub fn parse_millidegrees(contents: &str) -> Option<f32> {
    let milli: i64 = contents.trim().parse().ok()?;
    Some(milli as f32 / 1000.0)
}

/// Percentage of `delta_active` over `delta_total`, `None` with no elapsed time
pub fn usage_percent(delta_active: u64, delta_total: u64) -> Option<f32> {
    (delta_total > 0).then(|| delta_active as f32 / delta_total as f32 * 100.0)
}

#[cfg(target_os = "linux")]
mod imp {
    use super::*;
    use log::debug;
    use std::fs;
    use std::time::Instant;

    const THERMAL_ZONES: usize = 6;

    pub struct ProcTelemetry {
        cores: Option<usize>,
        clock_ticks: Option<f64>,
        last_system: Option<(u64, u64)>,
        last_process: Option<(u64, Instant)>,
    }

    impl ProcTelemetry {
        pub fn new() -> Self {
            // SAFETY: sysconf has no memory-safety preconditions
            let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
            let cores = std::thread::available_parallelism().ok().map(|n| n.get());
            debug!("telemetry: {:?} cores, {} ticks/s", cores, ticks);
            Self {
                cores,
                clock_ticks: (ticks > 0).then_some(ticks as f64),
                last_system: None,
                last_process: None,
            }
        }

        fn cpu_multi(&mut self) -> Option<f32> {
            let now = parse_proc_stat(&fs::read_to_string("/proc/stat").ok()?)?;
            let prev = self.last_system.replace(now)?;
            usage_percent(now.0.saturating_sub(prev.0), now.1.saturating_sub(prev.1))
        }

        fn cpu_single(&mut self) -> Option<f32> {
            let ticks = parse_process_ticks(&fs::read_to_string("/proc/self/stat").ok()?)?;
            let now = Instant::now();
            let (prev_ticks, prev_time) = self.last_process.replace((ticks, now))?;
            let wall = now.duration_since(prev_time).as_secs_f64();
            if wall <= 0.0 {
                return None;
            }
            let cpu = ticks.saturating_sub(prev_ticks) as f64 / self.clock_ticks?;
            Some((cpu / wall * 100.0) as f32)
        }

        fn temperature(&self) -> Option<f32> {
            (0..THERMAL_ZONES).find_map(|zone| {
                let path = format!("/sys/class/thermal/thermal_zone{}/temp", zone);
                parse_millidegrees(&fs::read_to_string(path).ok()?)
            })
        }

        pub fn sample(&mut self) -> TelemetrySample {
            TelemetrySample {
                cores: self.cores,
                cpu_multi: self.cpu_multi(),
                cpu_single: self.cpu_single(),
                temperature: self.temperature(),
            }
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod imp {
    use super::*;

    pub struct ProcTelemetry {
        cores: Option<usize>,
    }

    impl ProcTelemetry {
        pub fn new() -> Self {
            Self {
                cores: std::thread::available_parallelism().ok().map(|n| n.get()),
            }
        }

        pub fn sample(&mut self) -> TelemetrySample {
            TelemetrySample {
                cores: self.cores,
                ..TelemetrySample::default()
            }
        }
    }
}

pub use imp::ProcTelemetry;

impl Default for ProcTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_STAT: &str = "\
cpu  4705 356 584 3699 23 23 0 0 0 0
cpu0 1393 280 290 1000 10 5 0 0 0 0
intr 114930548 113199788 3 0 5 263 0 4 [... lots more numbers ...]
ctxt 1990473";

    #[test]
    fn test_parse_proc_stat() {
        let (active, total) = parse_proc_stat(PROC_STAT).unwrap();
        assert_eq!(active, 4705 + 356 + 584 + 23);
        assert_eq!(total, active + 3699 + 23);
    }

    #[test]
    fn test_parse_proc_stat_rejects_garbage() {
        assert_eq!(parse_proc_stat("cpu0 1 2 3"), None);
        assert_eq!(parse_proc_stat("cpu  1 2 x 4 5 6 7"), None);
        assert_eq!(parse_proc_stat("cpu  1 2 3"), None);
    }

    #[test]
    fn test_parse_process_ticks() {
        let stat = "1234 (pi bench) R 1 1234 1234 0 -1 4194560 500 0 0 0 \
                    120 30 4 6 20 0 1 0 100 0 0";
        assert_eq!(parse_process_ticks(stat), Some(120 + 30 + 4 + 6));
        assert_eq!(parse_process_ticks("1234 (x) R 1"), None);
        assert_eq!(parse_process_ticks("no parens"), None);
    }

    #[test]
    fn test_parse_millidegrees() {
        assert_eq!(parse_millidegrees("48312\n"), Some(48.312));
        assert_eq!(parse_millidegrees(""), None);
    }

    #[test]
    fn test_usage_percent() {
        assert_eq!(usage_percent(25, 100), Some(25.0));
        assert_eq!(usage_percent(0, 0), None);
    }

    #[test]
    fn test_first_sample_primes_counters() {
        let mut telemetry = ProcTelemetry::new();
        let first = telemetry.sample();
        assert_eq!(first.cpu_multi, None);
        assert_eq!(first.cpu_single, None);
        assert!(first.cores.is_some());
    }
}
