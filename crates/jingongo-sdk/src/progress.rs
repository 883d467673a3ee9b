//! Progress bars for artifact transfers

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for a download whose size is known
pub fn create_download_progress(size: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Create a byte counter for a download whose size is unknown
pub fn create_byte_counter(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_download_progress() {
        let pb = create_download_progress(1024, "model.fmu");
        assert_eq!(pb.length(), Some(1024));
        assert_eq!(pb.message(), "model.fmu");
    }

    #[test]
    fn test_create_byte_counter() {
        let pb = create_byte_counter("model.fmu");
        pb.inc(10);
        assert_eq!(pb.position(), 10);
        pb.finish();
    }
}
