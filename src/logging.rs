//! Logging setup and human-readable log cards.

use crate::utils::{truncate_str, wrap_text};
use crate::ContentSummary;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt as subscriber_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

#[derive(Debug)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub log_level: String,
    pub console_output: bool,
    pub file_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".into(),
            log_level: "info".into(),
            console_output: true,
            file_output: true,
        }
    }
}

fn create_separator(width: usize, ch: char) -> String {
    std::iter::repeat_n(ch, width).collect()
}

/// Logs a completed enrichment as a framed card. Purely cosmetic; the
/// structured fields on the surrounding events carry the same data.
pub fn log_enrichment_card(url: &str, summary: &ContentSummary) {
    const CARD_WIDTH: usize = 80;
    const CONTENT_WIDTH: usize = CARD_WIDTH - 2;

    let url_wrapped = wrap_text(url, CONTENT_WIDTH - 5);
    let summary_wrapped = wrap_text(&summary.summary, CONTENT_WIDTH - 9);

    let mut key_points = String::new();
    for point in &summary.key_points {
        key_points.push_str("\n  - ");
        key_points.push_str(&truncate_str(point, CONTENT_WIDTH - 4));
    }
    if key_points.is_empty() {
        key_points.push_str("\n  (none)");
    }

    let horizontal_line = "═".repeat(CARD_WIDTH - 2);

    info!(
        "\n╔{}╗\n\
         URL: {}\n\
         Summary: {}\n\
         Key points:{}\n\
         ╚{}╝",
        horizontal_line, url_wrapped, summary_wrapped, key_points, horizontal_line,
    );
}

pub fn log_error_card<E: Display + std::error::Error>(url: &str, error: &E) {
    const CARD_WIDTH: usize = 70;
    const CONTENT_WIDTH: usize = CARD_WIDTH - 8;

    let top_bottom = create_separator(CARD_WIDTH - 2, '═');
    let middle = create_separator(CARD_WIDTH - 2, '─');

    let mut error_details = error.to_string();
    if let Some(source) = error.source() {
        error_details = format!("{error_details} (caused by: {source})");
    }

    error!(
        "\n╔═{}═╗\n\
         ║ URL: {:<width$} ║\n\
         ║{}║\n\
         ║ Error: {:<width$} ║\n\
         ╚═{}═╝",
        top_bottom,
        truncate_str(url, CONTENT_WIDTH),
        middle,
        truncate_str(&error_details, CONTENT_WIDTH),
        top_bottom,
        width = CONTENT_WIDTH
    );
}

pub fn setup_logging(config: LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let mut layers = Vec::new();

    if config.console_output {
        let console_layer = subscriber_fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .pretty();
        layers.push(console_layer.boxed());
    }

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir).expect("Failed to create log directory");

        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "url-enrich.log");

        let file_layer = subscriber_fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_writer(file_appender);

        layers.push(file_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .expect("Failed to set global default subscriber");

    debug!("Logging system initialized with config: {:?}", config);
}
