//! Tests for StateManager

use super::*;
use tempfile::tempdir;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/ec2kit-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(manager.path().to_str().unwrap(), "/tmp/ec2kit-state.json");
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

// ============================================================================
// Token Tests
// ============================================================================

#[tokio::test]
async fn test_get_set_token() {
    let manager = StateManager::in_memory();
    assert!(manager.get_token("DescribeVolumes").await.is_none());

    manager
        .set_token("DescribeVolumes", Some("T1".to_string()))
        .await
        .unwrap();
    assert_eq!(
        manager.get_token("DescribeVolumes").await,
        Some("T1".to_string())
    );

    manager.set_token("DescribeVolumes", None).await.unwrap();
    assert!(manager.get_token("DescribeVolumes").await.is_none());
}

#[tokio::test]
async fn test_tokens_are_per_operation() {
    let manager = StateManager::in_memory();
    manager
        .set_token("DescribeVolumes", Some("V".to_string()))
        .await
        .unwrap();
    manager
        .set_token("DescribeInstances", Some("I".to_string()))
        .await
        .unwrap();

    assert_eq!(manager.get_token("DescribeVolumes").await.as_deref(), Some("V"));
    assert_eq!(manager.get_token("DescribeInstances").await.as_deref(), Some("I"));

    manager.clear_operation("DescribeVolumes").await.unwrap();
    assert!(manager.get_token("DescribeVolumes").await.is_none());
    assert_eq!(manager.state().await.operations.len(), 1);
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_auto_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::new(&path);
    manager
        .set_token("DescribeVolumes", Some("T9".to_string()))
        .await
        .unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_token("DescribeVolumes").await,
        Some("T9".to_string())
    );
}

#[tokio::test]
async fn test_save_creates_parent_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let manager = StateManager::new(&path);
    manager
        .set_token("DescribeInstances", Some("A".to_string()))
        .await
        .unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_load_picks_up_external_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::from_file(&path).unwrap();
    assert!(manager.get_token("DescribeVolumes").await.is_none());

    std::fs::write(
        &path,
        r#"{"operations": {"DescribeVolumes": {"next_token": "ext"}}}"#,
    )
    .unwrap();
    manager.load().await.unwrap();

    assert_eq!(manager.get_token("DescribeVolumes").await.as_deref(), Some("ext"));
}

#[tokio::test]
async fn test_save_in_memory_noop() {
    let manager = StateManager::in_memory();
    manager
        .set_token("DescribeVolumes", Some("T".to_string()))
        .await
        .unwrap();
    manager.save().await.unwrap();
    assert!(manager.to_json_pretty().await.unwrap().contains("DescribeVolumes"));
}

#[tokio::test]
async fn test_clone_shares_state() {
    let manager = StateManager::in_memory();
    let clone = manager.clone();

    clone
        .set_token("DescribeVolumes", Some("shared".to_string()))
        .await
        .unwrap();
    assert_eq!(
        manager.get_token("DescribeVolumes").await.as_deref(),
        Some("shared")
    );
}

#[test]
fn test_load_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "not json").unwrap();

    let err = StateManager::from_file(&path).unwrap_err();
    assert!(matches!(err, crate::error::Error::State { .. }));
}
