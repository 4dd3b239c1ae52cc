//! Synthetic `station;temperature` measurement files.

use std::io::{self, Write};

use rand::Rng;
use tracing::debug;

/// Coldest and hottest generated temperature, in tenths of a degree.
const TENTHS_RANGE: std::ops::RangeInclusive<i32> = -999..=999;

/// Rows are formatted into a buffer this many at a time before being written.
pub const BATCH_ROWS: usize = 100_000;

/// Names drawn from the station list up front; rows sample from those.
pub const MAX_STATIONS: usize = 10_000;

/// Average length of a formatted temperature over the generated range.
const AVG_TEMP_BYTES: f64 = 4.400_200_100_050_025;

const DEFAULT_STATIONS: &[&str] = &[
    "Abha", "Abidjan", "Accra", "Addis Ababa", "Adelaide", "Aden", "Almaty", "Amsterdam",
    "Anchorage", "Athens", "Bangkok", "Barcelona", "Beijing", "Belgrade", "Bergen", "Bogotá",
    "Bridgetown", "Bulawayo", "Cairo", "Cape Town", "Chihuahua", "Cracow", "Dakar", "Dallas",
    "Damascus", "Dhaka", "Dodoma", "Dublin", "Edinburgh", "Fresno", "Hamburg", "Hanoi",
    "Helsinki", "Honolulu", "Istanbul", "Jakarta", "Kampala", "Kathmandu", "Kyiv", "Lagos",
    "Lhasa", "Lima", "Ljubljana", "Luanda", "Lyon", "Madrid", "Mexico City", "Milan",
    "Montreal", "Nairobi", "Napier", "Nouakchott", "Oslo", "Palembang", "Palmerston North",
    "Panama City", "Perth", "Reykjavík", "Riga", "Saint-Denis", "San Juan", "Santiago",
    "Seoul", "St. John's", "Suva", "Tbilisi", "Tokyo", "Toronto", "Ulaanbaatar", "Vienna",
    "Wellington", "Yakutsk", "Zagreb", "Zürich",
];

/// The built-in station list.
pub fn default_station_names() -> Vec<String> {
    DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect()
}

/// Parses a stations file: one `name[;anything]` per line. Lines containing `#` and
/// blank lines are ignored, names are de-duplicated keeping first-seen order.
pub fn parse_station_names(text: &str) -> Vec<String> {
    let mut seen = hashbrown::HashSet::new();
    text.lines()
        .filter(|line| !line.contains('#'))
        .filter_map(|line| line.split(';').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// Rough size of a file of `rows` rows drawn from `names`.
pub fn estimate_file_size(names: &[String], rows: u64) -> u64 {
    if names.is_empty() {
        return 0;
    }
    let avg_name = names.iter().map(String::len).sum::<usize>() as f64 / names.len() as f64;
    // + 2 for the delimiter and newline
    (rows as f64 * (avg_name + AVG_TEMP_BYTES + 2.0)) as u64
}

/// `1536` -> `"1.5 KiB"`
pub fn human_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["bytes", "KiB", "MiB", "GiB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TiB")
}

/// Writes `rows` rows of `station;temperature\n` to `out`. [MAX_STATIONS] names are first
/// drawn from `names` with replacement; each row picks one of those uniformly and a temperature
/// uniformly from -99.9..=99.9 with one fractional digit.
pub fn generate<R: Rng>(
    names: &[String],
    rows: u64,
    rng: &mut R,
    out: &mut impl Write,
) -> io::Result<()> {
    if names.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no station names to sample from",
        ));
    }
    let sample: Vec<&str> = (0..MAX_STATIONS)
        .map(|_| names[rng.random_range(0..names.len())].as_str())
        .collect();

    let mut batch = Vec::with_capacity(BATCH_ROWS * 24);
    let mut remaining = rows;
    while remaining > 0 {
        let n = remaining.min(BATCH_ROWS as u64);
        batch.clear();
        for _ in 0..n {
            let station = sample[rng.random_range(0..sample.len())];
            batch.extend_from_slice(station.as_bytes());
            batch.push(b';');
            push_tenths(&mut batch, rng.random_range(TENTHS_RANGE));
            batch.push(b'\n');
        }
        out.write_all(&batch)?;
        remaining -= n;
        debug!(written = rows - remaining, rows, "batch written");
    }
    Ok(())
}

/// Appends `tenths / 10` formatted with exactly one fractional digit.
fn push_tenths(buf: &mut Vec<u8>, tenths: i32) {
    if tenths < 0 {
        buf.push(b'-');
    }
    let abs = tenths.unsigned_abs();
    // writing into a Vec can't fail
    let _ = write!(buf, "{}.{}", abs / 10, abs % 10);
}
