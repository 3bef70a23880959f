#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[test]
fn test_split_checksum() {
    let digest = "a".repeat(64);
    let href = format!("https://example.com/v.yaml@{digest}");
    assert_eq!(
        split_checksum(&href),
        ("https://example.com/v.yaml", Some(digest.as_str()))
    );
    assert_eq!(
        split_checksum("https://user@example.com/v.yaml"),
        ("https://user@example.com/v.yaml", None)
    );
    assert_eq!(split_checksum("v.yaml"), ("v.yaml", None));
}

#[test]
fn test_location_resolves_relative_paths() {
    let base = Path::new("/docs");
    assert_eq!(
        Location::parse("validations/a.yaml", Some(base)).unwrap(),
        Location::Local(PathBuf::from("/docs/validations/a.yaml"))
    );
    assert_eq!(
        Location::parse("file://a.yaml", Some(base)).unwrap(),
        Location::Local(PathBuf::from("/docs/a.yaml"))
    );
    assert_eq!(
        Location::parse("file:///abs/a.yaml", Some(base)).unwrap(),
        Location::Local(PathBuf::from("/abs/a.yaml"))
    );
}

#[test]
fn test_location_remote_and_invalid() {
    assert_eq!(
        Location::parse("https://example.com/a.yaml", None).unwrap(),
        Location::Remote("https://example.com/a.yaml".to_string())
    );
    assert!(matches!(
        Location::parse("ftp://example.com/a.yaml", None),
        Err(FetchError::UnsupportedScheme(_))
    ));
    assert!(matches!(
        Location::parse("http://", None),
        Err(FetchError::InvalidUrl { .. })
    ));
}

#[test]
fn test_base_dir_of_local_location() {
    let location = Location::parse("/docs/sub/a.yaml", None).unwrap();
    assert_eq!(location.base_dir(), Some(PathBuf::from("/docs/sub")));
    let remote = Location::parse("https://example.com/a.yaml", None).unwrap();
    assert_eq!(remote.base_dir(), None);
}

#[tokio::test]
async fn test_fetch_local_relative_to_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("v.yaml"), "hello").unwrap();

    let bytes = NetworkFetcher::new()
        .fetch("v.yaml", Some(dir.path()))
        .await
        .unwrap();
    assert_eq!(bytes, b"hello");
}

#[tokio::test]
async fn test_fetch_verifies_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v.yaml");
    std::fs::write(&path, "content").unwrap();
    let fetcher = NetworkFetcher::new();

    let good = format!("file://{}@{}", path.display(), sha256_hex(b"content"));
    assert_eq!(fetcher.fetch(&good, None).await.unwrap(), b"content");

    let bad = format!("file://{}@{}", path.display(), sha256_hex(b"other"));
    let err = fetcher.fetch(&bad, None).await.unwrap_err();
    assert!(matches!(err, FetchError::Checksum { .. }));
}

#[tokio::test]
async fn test_fetch_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = NetworkFetcher::new()
        .fetch("missing.yaml", Some(dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Io { .. }));
    assert!(err.to_string().contains("missing.yaml"));
}
