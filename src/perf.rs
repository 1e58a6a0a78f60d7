use std::collections::BTreeMap;
use std::fmt;

use plotters::style::{RGBColor, BLUE, RED};

/// The transfer mechanisms being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Attachment,
    Proto,
    Streaming,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Attachment, Method::Proto, Method::Streaming];

    pub fn name(self) -> &'static str {
        match self {
            Method::Attachment => "attachment",
            Method::Proto => "proto",
            Method::Streaming => "streaming",
        }
    }

    /// Streaming shares proto's red.
    pub fn color(self) -> RGBColor {
        match self {
            Method::Attachment => BLUE,
            Method::Proto => RED,
            Method::Streaming => RED,
        }
    }

    /// Attachment and proto must always be present; streaming is optional.
    pub fn is_required(self) -> bool {
        self != Method::Streaming
    }

    /// Maps the benchmark client's target names onto a method.
    pub fn from_target(target: &str) -> Option<Method> {
        match target {
            "attachment" => Some(Method::Attachment),
            "proto" => Some(Method::Proto),
            "streaming" | "sstreaming" | "cstreaming" => Some(Method::Streaming),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    /// 99th percentile latency in milliseconds.
    Latency,
    /// Sent megabytes per second.
    Throughput,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Latency, Metric::Throughput];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Latency => f.write_str("latency"),
            Metric::Throughput => f.write_str("throughput"),
        }
    }
}

/// Payload size label to series, one table per method and metric.
pub type SeriesTable = BTreeMap<String, Vec<f64>>;

/// Benchmark results for every method, metric and payload size, all sharing
/// one parallelism axis.
#[derive(Debug, Clone, Default)]
pub struct PerfTables {
    parallelisms: Vec<u32>,
    tables: BTreeMap<(Method, Metric), SeriesTable>,
}

impl PerfTables {
    pub fn new(parallelisms: Vec<u32>) -> Self {
        Self {
            parallelisms,
            tables: BTreeMap::new(),
        }
    }

    pub fn parallelisms(&self) -> &[u32] {
        &self.parallelisms
    }

    /// Adds both metrics for one method and payload size.
    pub fn insert(&mut self, method: Method, payload: &str, latency: Vec<f64>, throughput: Vec<f64>) {
        self.insert_series(method, Metric::Latency, payload, latency);
        self.insert_series(method, Metric::Throughput, payload, throughput);
    }

    pub fn insert_series(&mut self, method: Method, metric: Metric, payload: &str, values: Vec<f64>) {
        self.tables
            .entry((method, metric))
            .or_default()
            .insert(payload.to_string(), values);
    }

    pub fn series(&self, method: Method, metric: Metric, payload: &str) -> Option<&[f64]> {
        self.tables
            .get(&(method, metric))
            .and_then(|table| table.get(payload))
            .map(Vec::as_slice)
    }

    /// Methods with at least one series for `payload`.
    pub fn methods_for(&self, payload: &str) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|&method| {
                Metric::ALL
                    .iter()
                    .any(|&metric| self.series(method, metric, payload).is_some())
            })
            .collect()
    }

    /// Every payload label in the tables, smallest payload first. Labels that
    /// don't parse as a size sort last, alphabetically.
    pub fn payload_sizes(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .tables
            .values()
            .flat_map(|table| table.keys().cloned())
            .collect();
        keys.sort_by(|a, b| {
            let size = |k: &str| payload_size_bytes(k).unwrap_or(u64::MAX);
            size(a).cmp(&size(b)).then_with(|| a.cmp(b))
        });
        keys.dedup();
        keys
    }
}

/// Parses a payload label such as `10k` or `1m` into bytes (binary multiples).
pub fn payload_size_bytes(label: &str) -> Option<u64> {
    let label = label.trim().to_ascii_lowercase();
    let (digits, multiplier) = match label.chars().last()? {
        'k' => (&label[..label.len() - 1], 1u64 << 10),
        'm' => (&label[..label.len() - 1], 1u64 << 20),
        'g' => (&label[..label.len() - 1], 1u64 << 30),
        _ => (label.as_str(), 1),
    };
    digits.parse::<u64>().ok()?.checked_mul(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_size_bytes() {
        assert_eq!(payload_size_bytes("10k"), Some(10_240));
        assert_eq!(payload_size_bytes("100k"), Some(102_400));
        assert_eq!(payload_size_bytes("1m"), Some(1_048_576));
        assert_eq!(payload_size_bytes("10M"), Some(10_485_760));
        assert_eq!(payload_size_bytes("256"), Some(256));
        assert_eq!(payload_size_bytes("1g"), Some(1 << 30));
        assert_eq!(payload_size_bytes(""), None);
        assert_eq!(payload_size_bytes("k"), None);
        assert_eq!(payload_size_bytes("big"), None);
    }

    #[test]
    fn test_missing_series_is_none() {
        let mut tables = PerfTables::new(vec![1, 2]);
        tables.insert(Method::Proto, "10k", vec![1.0, 2.0], vec![3.0, 4.0]);

        assert_eq!(tables.series(Method::Proto, Metric::Latency, "10k"), Some(&[1.0, 2.0][..]));
        assert_eq!(tables.series(Method::Proto, Metric::Throughput, "10k"), Some(&[3.0, 4.0][..]));
        assert_eq!(tables.series(Method::Streaming, Metric::Latency, "10k"), None);
        assert_eq!(tables.series(Method::Proto, Metric::Latency, "1m"), None);
        assert_eq!(tables.methods_for("10k"), vec![Method::Proto]);
        assert!(tables.methods_for("1m").is_empty());
    }

    #[test]
    fn test_payload_sizes_sorted_by_bytes() {
        let mut tables = PerfTables::new(vec![1]);
        for key in ["1m", "10k", "odd", "10m", "100k"] {
            tables.insert(Method::Attachment, key, vec![1.0], vec![1.0]);
        }
        tables.insert(Method::Proto, "10k", vec![1.0], vec![1.0]);

        assert_eq!(tables.payload_sizes(), vec!["10k", "100k", "1m", "10m", "odd"]);
    }

    #[test]
    fn test_method_targets_and_colors() {
        assert_eq!(Method::from_target("attachment"), Some(Method::Attachment));
        assert_eq!(Method::from_target("proto"), Some(Method::Proto));
        assert_eq!(Method::from_target("sstreaming"), Some(Method::Streaming));
        assert_eq!(Method::from_target("cstreaming"), Some(Method::Streaming));
        assert_eq!(Method::from_target("grpc"), None);

        assert_eq!(Method::Attachment.color(), BLUE);
        assert_eq!(Method::Proto.color(), RED);
        assert_eq!(Method::Streaming.color(), Method::Proto.color());
        assert!(!Method::Streaming.is_required());
    }
}
