//! Sequential batch driver with progress callbacks.

use serde::Serialize;
use tracing::info;

use crate::TicketError;
use crate::compose::generate_ticket;
use crate::config::TicketConfig;

/// A request to generate one ticket per number in `[start, end]`.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub prefix: String,
    pub start: u64,
    pub end: u64,
}

impl BatchRequest {
    /// Reject requests before any file or log row is produced.
    pub fn validate(&self) -> Result<(), TicketError> {
        if self.prefix.trim().is_empty() {
            return Err(TicketError::InvalidRequest(
                "prefix cannot be empty".to_string(),
            ));
        }
        if self.start > self.end {
            return Err(TicketError::InvalidRequest(format!(
                "start number {} must be <= end number {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn total(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Progress for one completed ticket.
#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    /// 1-based position within the batch.
    pub index: u64,
    pub total: u64,
    pub ticket_id: String,
}

/// Summary of a completed batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub count: u64,
    pub first_id: String,
    pub last_id: String,
}

/// Generate every ticket in the requested range, in order.
///
/// `on_progress` is invoked after each ticket has been persisted and
/// logged. The first error halts the batch; tickets already written stay
/// on disk with their log rows.
pub fn run_batch(
    config: &TicketConfig,
    request: &BatchRequest,
    mut on_progress: impl FnMut(&Progress),
) -> Result<BatchSummary, TicketError> {
    request.validate()?;

    std::fs::create_dir_all(&config.output_dir)?;

    // Surrounding whitespace never reaches identifiers or filenames.
    let prefix = request.prefix.trim();
    let total = request.total();
    info!(
        prefix,
        start = request.start,
        end = request.end,
        total,
        "Starting ticket batch"
    );

    for (i, number) in (request.start..=request.end).enumerate() {
        let record = generate_ticket(config, prefix, number)?;
        on_progress(&Progress {
            index: i as u64 + 1,
            total,
            ticket_id: record.ticket_id,
        });
    }

    let summary = BatchSummary {
        count: total,
        first_id: format!("{prefix}{}", request.start),
        last_id: format!("{prefix}{}", request.end),
    };
    info!(
        first = %summary.first_id,
        last = %summary.last_id,
        count = summary.count,
        "Batch complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::host_has_font;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn test_config(name: &str) -> (TicketConfig, PathBuf) {
        let dir = std::env::temp_dir().join("ticket_batch_tests").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let template = RgbaImage::from_pixel(1400, 600, Rgba([200, 40, 40, 255]));
        let template_path = dir.join("template.png");
        template.save(&template_path).unwrap();

        let config = TicketConfig {
            template_path,
            font_path: dir.join("missing.ttf"),
            output_dir: dir.join("tickets"),
            log_path: dir.join("tickets_log.csv"),
            ..TicketConfig::default()
        };
        (config, dir)
    }

    fn request(prefix: &str, start: u64, end: u64) -> BatchRequest {
        BatchRequest {
            prefix: prefix.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn batch_produces_one_ticket_per_number() {
        if !host_has_font() {
            return;
        }
        let (config, _dir) = test_config("range");
        let mut events = Vec::new();
        let summary = run_batch(&config, &request("SOV-", 1, 3), |p| {
            events.push((p.index, p.total, p.ticket_id.clone()));
        })
        .unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(summary.first_id, "SOV-1");
        assert_eq!(summary.last_id, "SOV-3");

        for n in 1..=3 {
            assert!(config.output_dir.join(format!("ticket_SOV-{n}.png")).exists());
        }
        assert_eq!(
            events,
            vec![
                (1, 3, "SOV-1".to_string()),
                (2, 3, "SOV-2".to_string()),
                (3, 3, "SOV-3".to_string()),
            ]
        );

        let log = std::fs::read_to_string(&config.log_path).unwrap();
        assert_eq!(log.lines().count(), 4); // header + 3 rows
    }

    #[test]
    fn single_number_range_produces_one_ticket() {
        if !host_has_font() {
            return;
        }
        let (config, _dir) = test_config("single");
        let summary = run_batch(&config, &request("A-", 5, 5), |_| {}).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.first_id, "A-5");
        assert_eq!(summary.last_id, "A-5");
        assert!(config.output_dir.join("ticket_A-5.png").exists());
    }

    #[test]
    fn reversed_range_is_rejected_before_side_effects() {
        let (config, _dir) = test_config("reversed");
        let err = run_batch(&config, &request("A-", 5, 1), |_| {}).unwrap_err();
        assert!(matches!(err, TicketError::InvalidRequest(_)));
        assert!(!config.output_dir.exists());
        assert!(!config.log_path.exists());
    }

    #[test]
    fn empty_prefix_is_rejected_before_side_effects() {
        let (config, _dir) = test_config("empty_prefix");
        for prefix in ["", "   "] {
            let err = run_batch(&config, &request(prefix, 1, 5), |_| {}).unwrap_err();
            assert!(matches!(err, TicketError::InvalidRequest(_)));
        }
        assert!(!config.output_dir.exists());
        assert!(!config.log_path.exists());
    }

    #[test]
    fn missing_template_halts_batch_with_no_output() {
        let (mut config, dir) = test_config("no_template");
        config.template_path = dir.join("nope.png");
        let err = run_batch(&config, &request("A-", 1, 3), |_| {}).unwrap_err();
        assert!(matches!(err, TicketError::Template { .. }));
        assert_eq!(
            std::fs::read_dir(&config.output_dir).unwrap().count(),
            0,
            "no partial output expected"
        );
        assert!(!config.log_path.exists());
    }

    #[test]
    fn prefix_whitespace_is_stripped_before_generation() {
        if !host_has_font() {
            return;
        }
        let (config, _dir) = test_config("trimmed");
        let summary = run_batch(&config, &request(" SOV- ", 1, 1), |_| {}).unwrap();
        assert_eq!(summary.first_id, "SOV-1");
        assert!(config.output_dir.join("ticket_SOV-1.png").exists());

        let log = std::fs::read_to_string(&config.log_path).unwrap();
        assert!(log.lines().nth(1).unwrap().starts_with("SOV-1,SOV-,1,"));
    }

    #[test]
    fn regeneration_overwrites_image_and_appends_rows() {
        if !host_has_font() {
            return;
        }
        let (config, _dir) = test_config("regen");
        run_batch(&config, &request("A-", 1, 2), |_| {}).unwrap();
        run_batch(&config, &request("A-", 1, 2), |_| {}).unwrap();

        assert_eq!(std::fs::read_dir(&config.output_dir).unwrap().count(), 2);
        let log = std::fs::read_to_string(&config.log_path).unwrap();
        assert_eq!(log.lines().count(), 5); // header + 2x2 rows
    }
}
