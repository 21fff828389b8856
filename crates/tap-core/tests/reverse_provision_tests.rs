//! Reverse provisioning flow end to end

use pretty_assertions::assert_eq;
use serde_json::json;
use tap_core::{
    ProvisionConfiguration, ReverseProvisioningRequest, ReverseProvisioningStatus,
    ResponseStatus, ValidationConfiguration,
};
use tap_model::{CATALOG_KIND_PATH, PLATFORM_TEAM_SOLUTION};
use tap_test_utils::*;

fn request() -> ReverseProvisioningRequest {
    ReverseProvisioningRequest::new(STORAGE_TEMPLATE, "development")
        .with_params(json!({"bucket": "legacy-sales"}))
        .with_catalog_info(catalog_info())
}

#[test]
fn imports_through_the_storage_provisioner() {
    let provisioner = RecordingProvisioner::new();
    let service = service(ValidationConfiguration::new(), shared_provision(&provisioner));

    let status = service.reverse_provision(&request()).unwrap();
    let view = ReverseProvisioningStatus::from(status);

    assert_eq!(view.status, ResponseStatus::Completed);
    assert_eq!(view.updates, json!({"spec.mesh.specific.bucket": "legacy-sales"}));
    assert_eq!(provisioner.handled(), vec![format!("reverse_provision {STORAGE_TEMPLATE}")]);
}

#[test]
fn catalog_info_and_params_may_arrive_as_text() {
    let provisioner = RecordingProvisioner::new();
    let service = service(ValidationConfiguration::new(), shared_provision(&provisioner));

    let request = ReverseProvisioningRequest::new(STORAGE_TEMPLATE, "development")
        .with_params(json!("bucket: legacy-sales\nprefix: 2023/"))
        .with_catalog_info(json!(CATALOG_INFO));
    service.reverse_provision(&request).unwrap();
    assert_eq!(provisioner.handled().len(), 1);
}

#[test]
fn missing_catalog_info_fails_first() {
    let service = service(ValidationConfiguration::new(), ProvisionConfiguration::new());
    let request = ReverseProvisioningRequest::new("urn:unknown", "development");

    let failed = service.reverse_provision(&request).unwrap_err();
    assert!(failed.message().contains("empty catalog info"));
}

#[test]
fn unregistered_template_has_no_params_schema() {
    let service = service(ValidationConfiguration::new(), ProvisionConfiguration::new());
    let request = ReverseProvisioningRequest::new(WORKLOAD_TEMPLATE, "development")
        .with_params(json!({}))
        .with_catalog_info(catalog_info());

    let failed = service.reverse_provision(&request).unwrap_err();
    assert_eq!(
        failed.problems()[0].description(),
        format!("No Specific class provided for reverse provisioning for useCaseTemplateId '{WORKLOAD_TEMPLATE}'")
    );
}

#[test]
fn missing_params_name_the_field() {
    let service = service(ValidationConfiguration::new(), ProvisionConfiguration::new());
    let request = ReverseProvisioningRequest::new(STORAGE_TEMPLATE, "development")
        .with_catalog_info(catalog_info());

    let failed = service.reverse_provision(&request).unwrap_err();
    assert_eq!(failed.input_error_field(), Some("params"));
    assert!(failed.input().is_some_and(|input| input.contains(STORAGE_TEMPLATE)));
    assert_eq!(failed.problems().len(), 1);
    assert!(failed.problems()[0].solutions().contains(PLATFORM_TEAM_SOLUTION));
}

#[test]
fn malformed_params_fail_decoding() {
    let service = service(ValidationConfiguration::new(), ProvisionConfiguration::new());
    let request = ReverseProvisioningRequest::new(STORAGE_TEMPLATE, "development")
        .with_params(json!({"prefix": "no bucket"}))
        .with_catalog_info(catalog_info());

    let failed = service.reverse_provision(&request).unwrap_err();
    assert!(failed.problems()[0].cause().is_some());
}

#[test]
fn catalog_info_without_kind_names_the_path() {
    let service = service(ValidationConfiguration::new(), ProvisionConfiguration::new());
    let request = ReverseProvisioningRequest::new(STORAGE_TEMPLATE, "development")
        .with_params(json!({"bucket": "legacy-sales"}))
        .with_catalog_info(json!({"spec": {"mesh": {"name": "Raw Files"}}}));

    let failed = service.reverse_provision(&request).unwrap_err();
    assert_eq!(failed.input_error_field(), Some(CATALOG_KIND_PATH));
}
