/// Aggregation over loaded station data.
///
/// Analysis is read-only: it walks a finished Region/Station tree and
/// never changes it.
///
/// Submodules:
/// - `precip` — per-station precipitation totals and daily averages.

pub mod precip;
