/// precip_analyzer: station precipitation CSV loading and summary statistics.
///
/// # Module structure
///
/// ```text
/// precip_analyzer
/// ├── model       — Stat, sentinel normalization, error types
/// ├── ordered     — insertion-ordered keyed storage with a capacity limit
/// ├── day         — one date's readings for a station
/// ├── station     — a station's days, keyed by date
/// ├── region      — all stations in a file; CSV loading + LoadReport
/// ├── ingest
/// │   └── csv     — field splitting and record parsing
/// ├── analysis
/// │   └── precip  — totals and per-day averages for a station
/// ├── config      — TOML / environment configuration
/// └── logging     — levelled, component-tagged logging
/// ```

pub mod analysis;
pub mod config;
pub mod day;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod ordered;
pub mod region;
pub mod station;
