//! Agent API structures that carry polymorphic fields.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::DecoderRegistry;
use crate::string_or_array::StringOrStringArray;
use crate::views::{GenericJsonValue, ServiceEndpointValue};

/// A service entry of a DID document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Fragment when creating/updating a DID; full id when resolving.
    pub id: String,
    #[serde(rename = "type")]
    pub type_: StringOrStringArray,
    pub service_endpoint: ServiceEndpointValue,
}

/// Patch for an existing service. `type` and `serviceEndpoint` cannot both be
/// empty; the agent enforces that, not this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManagedDidServiceAction {
    pub id: String,
    #[serde(
        rename = "type",
        default,
        with = "crate::string_or_array::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_endpoint: Option<ServiceEndpointValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueCredentialRecordRequest {
    /// Must match the schema named by `schema_id` or the credential definition.
    /// Absent decodes as null.
    #[serde(default)]
    pub claims: GenericJsonValue,
    #[serde(rename = "issuingDID")]
    pub issuing_did: String,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_period: Option<f64>,
    #[serde(
        default,
        with = "crate::string_or_array::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub schema_id: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_definition_id: Option<Uuid>,
    /// `JWT` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic_issuance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_kid: Option<String>,
    /// Absent for connectionless (invitation based) issuance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

/// Minimal schema reference, the usual `as_object` target for claim payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSchemaRef {
    pub name: String,
    pub version: String,
}

pub fn default_registry() -> DecoderRegistry {
    let mut registry = DecoderRegistry::new();
    registry
        .register::<Service>("service")
        .register::<UpdateManagedDidServiceAction>("update-service-action")
        .register::<CreateIssueCredentialRecordRequest>("create-issue-credential-record")
        .register::<CredentialSchemaRef>("credential-schema-ref");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_normalizes_type_and_keeps_endpoint() {
        let src = r#"{"id":"did:prism:abc#linked","type":["LinkedDomains"],"serviceEndpoint":["https://a.example","https://b.example"]}"#;
        let service: Service = serde_json::from_str(src).unwrap();
        assert_eq!(&*service.type_, ["LinkedDomains"]);
        assert_eq!(service.service_endpoint.as_array().unwrap().len(), 2);
        assert_eq!(
            serde_json::to_string(&service).unwrap(),
            r#"{"id":"did:prism:abc#linked","type":"LinkedDomains","serviceEndpoint":["https://a.example","https://b.example"]}"#
        );
    }

    #[test]
    fn service_rejects_numeric_type() {
        let err = serde_json::from_str::<Service>(r#"{"id":"x","type":7,"serviceEndpoint":"https://a"}"#).unwrap_err();
        assert!(err.to_string().contains("unexpected type"), "{err}");
    }

    #[test]
    fn update_action_omits_absent_fields() {
        let action: UpdateManagedDidServiceAction = serde_json::from_str(r#"{"id":"svc-1"}"#).unwrap();
        assert_eq!(action.type_, None);
        assert_eq!(action.service_endpoint, None);
        assert_eq!(serde_json::to_string(&action).unwrap(), r#"{"id":"svc-1"}"#);

        let action: UpdateManagedDidServiceAction =
            serde_json::from_str(r#"{"id":"svc-1","type":"DIDCommMessaging","serviceEndpoint":{"uri":"https://m.example"}}"#).unwrap();
        assert_eq!(action.type_.as_deref(), Some(&["DIDCommMessaging".to_string()][..]));
        assert!(action.service_endpoint.unwrap().as_string().is_err());
    }

    #[test]
    fn issue_request_round_trips_wire_names() {
        let src = r#"{"claims":{"emailAddress":"alice@example.com","age":30},"issuingDID":"did:prism:issuer","schemaId":"https://schemas.example/email/1.0.0","connectionId":"0b2c4d53-8a7b-4c3c-9f4e-1f0f6a7e2b10","automaticIssuance":true}"#;
        let req: CreateIssueCredentialRecordRequest = serde_json::from_str(src).unwrap();
        assert_eq!(req.schema_id.as_deref().map(<[String]>::len), Some(1));
        assert_eq!(req.claims.as_mapping().unwrap()["age"].as_number().unwrap().as_u64(), Some(30));
        assert!(req.connection_id.is_some());
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"claims":{"emailAddress":"alice@example.com","age":30},"issuingDID":"did:prism:issuer","schemaId":"https://schemas.example/email/1.0.0","automaticIssuance":true,"connectionId":"0b2c4d53-8a7b-4c3c-9f4e-1f0f6a7e2b10"}"#
        );
    }

    #[test]
    fn missing_claims_decode_as_null() {
        let req: CreateIssueCredentialRecordRequest = serde_json::from_str(r#"{"issuingDID":"did:x"}"#).unwrap();
        assert!(req.claims.is_null());
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"claims":null,"issuingDID":"did:x"}"#);
    }

    #[test]
    fn claims_narrow_into_schema_ref() {
        let req: CreateIssueCredentialRecordRequest =
            serde_json::from_str(r#"{"claims":{"name":"email","version":"1.0"},"issuingDID":"did:x"}"#).unwrap();
        let schema: CredentialSchemaRef = req.claims.as_object().unwrap();
        assert_eq!(schema, CredentialSchemaRef { name: "email".into(), version: "1.0".into() });
    }

    #[test]
    fn default_registry_lists_models() {
        let ids: Vec<_> = default_registry().type_ids().map(str::to_string).collect();
        assert_eq!(ids, ["service", "update-service-action", "create-issue-credential-record", "credential-schema-ref"]);
    }
}
