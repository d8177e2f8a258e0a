//! Tests for sequential run progress display

#[cfg(test)]
mod tests {
    use dermalens::io::progress::ProgressManager;

    // Tests the full lifecycle runs without panicking in a headless terminal
    // Verified by calling complete_item before start_item
    #[test]
    fn test_progress_lifecycle() {
        let progress = ProgressManager::new("Images", 3);

        for index in 0..3 {
            progress.start_item(&format!("image_{index}.png"));
            progress.note("working");
            progress.complete_item(Some("done"));
        }

        progress.finish("Converted 3 images");
    }

    // Tests a zero-length run can still finish cleanly
    #[test]
    fn test_progress_empty_run() {
        let progress = ProgressManager::new("Queries", 0);
        progress.finish("Nothing to do");
    }
}
