use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Failed to create progress style")
    );
    pb.set_message(message.to_string());
    pb
}

pub fn create_countdown_bar(total_secs: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_secs);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.yellow} [{bar:40.yellow/blue}] {pos}/{len}s {msg}")
            .expect("Failed to create progress style")
            .progress_chars("#>-")
    );
    pb
}

/// Block for `secs` seconds, showing a countdown. Used between provider calls.
pub async fn slow_down(secs: u64) {
    if secs == 0 {
        return;
    }
    let pb = create_countdown_bar(secs);
    pb.set_message("waiting for rate limit");
    for _ in 0..secs {
        tokio::time::sleep(Duration::from_secs(1)).await;
        pb.inc(1);
    }
    pb.finish_and_clear();
}
