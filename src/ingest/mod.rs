/// Input parsing for the precipitation analyzer.
///
/// Submodules:
/// - `csv` — field splitting and per-line record parsing for station exports.

pub mod csv;
