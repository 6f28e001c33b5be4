/// Batch re-scoring and pick audits.
pub mod audit_service;
/// Random season generator for local runs.
pub mod demo_season;
/// Schedule file import.
pub mod import_service;
/// Pick submission with kickoff locking.
pub mod pick_service;
/// Weekly pick window and current week.
pub mod pick_window;
/// Season report for the batch binary.
pub mod report_service;
/// Game result updates.
pub mod result_service;
/// Scoring engine.
pub mod scoring;
/// Weekly and cumulative ranking.
pub mod standings;
/// Store-backed summaries and standings.
pub mod summary_service;
/// Team records and division tables.
pub mod team_records;

#[cfg(test)]
pub(crate) mod test_support;
