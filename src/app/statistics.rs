//! Refresh statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{InfoType, RefreshStats, WarningType};

/// Logs every non-zero warning and info counter.
pub fn print_refresh_statistics(stats: &RefreshStats) {
    let total_warnings = stats.total_warnings();
    let total_info = stats.total_info();

    if total_warnings > 0 {
        info!("Warning Counts ({} total):", total_warnings);
        for warning_type in WarningType::iter() {
            let count = stats.get_warning_count(warning_type);
            if count > 0 {
                info!("   {}: {}", warning_type.as_str(), count);
            }
        }
    }

    if total_info > 0 {
        info!("Info Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_refresh_statistics_empty() {
        let stats = RefreshStats::new();
        // Should not panic when nothing was counted
        print_refresh_statistics(&stats);
    }

    #[test]
    fn test_print_refresh_statistics_all_types() {
        let stats = RefreshStats::new();
        stats.increment_warning(WarningType::UploadFetchFailed);
        stats.increment_info(InfoType::CandidateFallback);
        stats.add_info(InfoType::ModelsTruncated, 4);
        print_refresh_statistics(&stats);
        assert_eq!(stats.total_info(), 5);
    }
}
