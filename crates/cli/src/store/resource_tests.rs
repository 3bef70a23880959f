#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::test_support::{validation_yaml, RecordingFetcher};
use proptest::prelude::*;

const MULTI: &str = "file://multi.yaml";
const SINGLE: &str = "file://single.yaml";
const IDS: [&str; 3] = [
    "11111111-1111-4111-8111-111111111111",
    "22222222-2222-4222-8222-222222222222",
    "33333333-3333-4333-8333-333333333333",
];

fn fetcher() -> Arc<RecordingFetcher> {
    let fetcher = RecordingFetcher::new();
    let multi: Vec<String> = IDS
        .iter()
        .enumerate()
        .map(|(i, id)| validation_yaml(id, &format!("v{i}"), 1, 0))
        .collect();
    fetcher.insert(MULTI, multi.join("---\n"));
    fetcher.insert(SINGLE, validation_yaml(IDS[0], "only", 1, 0));
    Arc::new(fetcher)
}

fn link(href: &str, fragment: Option<&str>) -> Link {
    Link {
        href: href.to_string(),
        rel: Some("lula".to_string()),
        resource_fragment: fragment.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_wildcard_then_specific_fetches_once() {
    let fetcher = fetcher();
    let mut store = ResourceStore::new(fetcher.clone());

    let all = store
        .add_from_link(&link(MULTI, Some("*")), None)
        .await
        .unwrap();
    assert_eq!(all, IDS.to_vec());

    let one = store
        .add_from_link(&link(MULTI, Some(IDS[1])), None)
        .await
        .unwrap();
    assert_eq!(one, vec![IDS[1].to_string()]);
    assert_eq!(fetcher.fetch_count(MULTI), 1);
    assert_eq!(store.all_fetched().len(), 3);
}

#[tokio::test]
async fn test_absent_fragment_selects_all() {
    let mut store = ResourceStore::new(fetcher());
    let ids = store.add_from_link(&link(MULTI, None), None).await.unwrap();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_single_artifact_document_ignores_fragment() {
    let mut store = ResourceStore::new(fetcher());
    let ids = store
        .add_from_link(&link(SINGLE, Some("some-other-id")), None)
        .await
        .unwrap();
    assert_eq!(ids, vec![IDS[0].to_string()]);
}

#[tokio::test]
async fn test_non_matching_fragment_in_multi_document() {
    let fetcher = fetcher();
    let mut store = ResourceStore::new(fetcher.clone());

    let err = store
        .add_from_link(&link(MULTI, Some("nope")), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::NoMatchingArtifact { .. }));

    // The fetch itself succeeded, so the document is memoized.
    store.add_from_link(&link(MULTI, None), None).await.unwrap();
    assert_eq!(fetcher.fetch_count(MULTI), 1);
}

#[tokio::test]
async fn test_existing_id_short_circuits() {
    let fetcher = fetcher();
    let existing = Resource {
        uuid: IDS[2].to_string(),
        description: Some("inline".to_string()),
        ..Default::default()
    };
    let mut store = ResourceStore::from_back_matter(&[existing], fetcher.clone());

    let ids = store
        .add_from_link(&link(&format!("#{}", IDS[2]), None), None)
        .await
        .unwrap();
    assert_eq!(ids, vec![IDS[2].to_string()]);

    let ids = store
        .add_from_link(&link(MULTI, Some(IDS[2])), None)
        .await
        .unwrap();
    assert_eq!(ids, vec![IDS[2].to_string()]);
    assert_eq!(fetcher.total_fetches(), 0);
}

#[tokio::test]
async fn test_existing_ids_are_not_duplicated_into_fetched() {
    let existing = Resource {
        uuid: IDS[0].to_string(),
        ..Default::default()
    };
    let mut store = ResourceStore::from_back_matter(&[existing], fetcher());

    store.add_from_link(&link(MULTI, None), None).await.unwrap();

    let fetched: Vec<&str> = store.all_fetched().iter().map(|r| r.uuid.as_str()).collect();
    assert_eq!(fetched, vec![IDS[1], IDS[2]]);
    assert_eq!(store.get(IDS[0]).unwrap().description, None);
}

#[tokio::test]
async fn test_missing_local_reference() {
    let fetcher = fetcher();
    let mut store = ResourceStore::new(fetcher.clone());

    let err = store
        .add_from_link(&link("#not-here", None), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::UnresolvedLocal(id) if id == "not-here"));
    assert_eq!(fetcher.total_fetches(), 0);
}

#[tokio::test]
async fn test_failed_fetch_is_not_memoized() {
    let fetcher = fetcher();
    let mut store = ResourceStore::new(fetcher.clone());
    let href = "https://example.com/late.yaml";

    let err = store.add_from_link(&link(href, None), None).await.unwrap_err();
    assert!(matches!(err, ResourceError::Fetch { .. }));
    assert!(store.href_ids(href).is_none());

    fetcher.insert(href, validation_yaml(IDS[1], "late", 1, 0));
    let ids = store.add_from_link(&link(href, None), None).await.unwrap();
    assert_eq!(ids, vec![IDS[1].to_string()]);
    assert_eq!(fetcher.fetch_count(href), 2);
}

#[tokio::test]
async fn test_unparseable_document() {
    let fetcher = fetcher();
    fetcher.insert("file://broken.yaml", "domain: [unclosed");
    let mut store = ResourceStore::new(fetcher.clone());

    let err = store
        .add_from_link(&link("file://broken.yaml", None), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::Parse { .. }));
    assert!(store.href_ids("file://broken.yaml").is_none());
}

fn fragment_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("*".to_string())),
        (0usize..3).prop_map(|i| Some(IDS[i].to_string())),
        "[a-z]{4}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn prop_at_most_one_fetch_per_href(
        calls in prop::collection::vec(
            (prop_oneof![Just(MULTI), Just(SINGLE)], fragment_strategy()),
            1..12,
        )
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let fetcher = fetcher();
        let mut store = ResourceStore::new(fetcher.clone());

        runtime.block_on(async {
            for (href, fragment) in &calls {
                if let Ok(ids) = store.add_from_link(&link(href, fragment.as_deref()), None).await {
                    for id in ids {
                        prop_assert!(IDS.contains(&id.as_str()));
                    }
                }
            }
            Ok(())
        })?;

        prop_assert!(fetcher.fetch_count(MULTI) <= 1);
        prop_assert!(fetcher.fetch_count(SINGLE) <= 1);
    }
}
