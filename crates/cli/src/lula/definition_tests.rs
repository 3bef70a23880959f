#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

const UUID_A: &str = "61ec8808-f0f4-4b35-9a5b-4d7516053534";
const UUID_B: &str = "7f4c3b2a-9d8e-4f6a-8b1c-2d3e4f5a6b7c";

fn doc(uuid: &str, name: &str) -> String {
    format!(
        "metadata:\n  name: {name}\n  uuid: {uuid}\ndomain:\n  type: file\n  file-spec:\n    filepaths:\n      - name: config\n        path: config.yaml\nprovider:\n  type: opa\n  opa-spec:\n    rego: package validate\n"
    )
}

#[test]
fn test_read_multi_document_stream() {
    let stream = format!("{}---\n{}---\n", doc(UUID_A, "first"), doc(UUID_B, "second"));

    let validations = read_validations(stream.as_bytes()).unwrap();

    assert_eq!(validations.len(), 2);
    assert_eq!(validations[0].name(), "first");
    assert_eq!(validations[1].name(), "second");
}

#[test]
fn test_tagged_domain_and_provider() {
    let validation = Validation::from_yaml(&doc(UUID_A, "v")).unwrap();

    let domain = validation.domain.as_ref().unwrap();
    assert_eq!(domain.kind(), DomainKind::File);
    assert_eq!(domain.body()["filepaths"][0]["name"], "config");
    let provider = validation.provider.as_ref().unwrap();
    assert_eq!(provider.kind(), ProviderKind::Opa);
    assert_eq!(provider.body()["rego"], "package validate");
}

#[test]
fn test_unknown_domain_type_is_rejected() {
    let yaml = "domain:\n  type: carrier-pigeon\n";
    assert!(Validation::from_yaml(yaml).is_err());
}

#[test]
fn test_to_resource_keeps_valid_uuid() {
    let mut validation = Validation::from_yaml(&doc(UUID_A, "named")).unwrap();

    let resource = validation.to_resource().unwrap();

    assert_eq!(resource.uuid, UUID_A);
    assert_eq!(resource.title.as_deref(), Some("named"));
    let embedded = Validation::from_yaml(resource.description.as_deref().unwrap()).unwrap();
    assert_eq!(embedded, validation);
}

#[test]
fn test_to_resource_replaces_malformed_uuid() {
    let mut validation = Validation::from_yaml(&doc("not-a-uuid", "named")).unwrap();

    let resource = validation.to_resource().unwrap();

    assert_ne!(resource.uuid, "not-a-uuid");
    assert!(uuid::Uuid::parse_str(&resource.uuid).is_ok());
    assert_eq!(
        validation.metadata.unwrap().uuid.as_deref(),
        Some(resource.uuid.as_str())
    );
}

#[test]
fn test_unnamed_validation_uses_default_title() {
    let mut validation = Validation::default();
    let resource = validation.to_resource().unwrap();
    assert_eq!(resource.title.as_deref(), Some(DEFAULT_VALIDATION_TITLE));
}
