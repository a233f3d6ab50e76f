//! Tests for the contact extraction pipeline with mocked collaborators.

mod mocks;

use mocks::fixtures::{blank_png, fenced_reply, qr_png, vcard_without_phone, COMPLETE_VCARD};
use mocks::{MockMistralClient, MockQrDetector};
use qr_contact_server::error::{ExtractionError, MistralApiError, VcardError};
use qr_contact_server::services::llm_parser::CONTACT_MODEL;
use qr_contact_server::services::{
    ContactExtractionService, ContactExtractionServiceImpl, ExtractionSource, FallbackReason,
    LlmContactParser,
};
use qr_contact_server::{ContactRecord, Metrics, RqrrDetector};
use std::sync::Arc;

fn service(
    detector: impl qr_contact_server::QrDetector + 'static,
    client: &MockMistralClient,
    metrics: &Metrics,
) -> ContactExtractionServiceImpl {
    ContactExtractionServiceImpl::new(
        Arc::new(detector),
        LlmContactParser::new(Arc::new(client.clone())),
        metrics.clone(),
    )
}

fn payloads(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_complete_vcard_skips_llm() {
    let client = MockMistralClient::new().with_chat_reply("should not be used");
    let metrics = Metrics::new();
    let svc = service(MockQrDetector::default(), &client, &metrics);

    let extraction = svc
        .extract_from_payloads(&payloads(&[COMPLETE_VCARD]))
        .await
        .unwrap();

    assert_eq!(extraction.source, ExtractionSource::Vcard);
    assert_eq!(extraction.fallback_reason, None);
    assert_eq!(
        extraction.record,
        ContactRecord {
            full_name: "Jane Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            phone: "+15551234567".to_string(),
            address: "42 Harbor Rd, Portland, OR, 97201, USA".to_string(),
        }
    );
    assert_eq!(client.get_call_count("chat_complete"), 0);
    assert_eq!(metrics.vcard_parsed_total(), 1);
    assert_eq!(metrics.llm_fallbacks_total(), 0);
}

#[tokio::test]
async fn test_incomplete_vcard_falls_back_to_llm() {
    let reply = fenced_reply(
        r#"{"fullName": "Jane Doe", "email": "jane.doe@example.com", "phone": "", "address": "42 Harbor Rd, Portland"}"#,
    );
    let client = MockMistralClient::new().with_chat_reply(&reply);
    let metrics = Metrics::new();
    let svc = service(MockQrDetector::default(), &client, &metrics);
    let card = vcard_without_phone();

    let extraction = svc
        .extract_from_payloads(&payloads(&[&card]))
        .await
        .unwrap();

    assert_eq!(extraction.source, ExtractionSource::LlmFallback);
    assert_eq!(
        extraction.fallback_reason,
        Some(FallbackReason::Vcard(VcardError::MissingField("phone")))
    );
    assert_eq!(extraction.record.full_name, "Jane Doe");
    assert_eq!(extraction.record.phone, "");
    assert_eq!(client.get_call_count("chat_complete"), 1);
    assert_eq!(client.last_model().as_deref(), Some(CONTACT_MODEL));
    assert!(client.last_prompt().unwrap().contains(&card));
    assert_eq!(metrics.llm_fallbacks_total(), 1);
}

#[tokio::test]
async fn test_non_vcard_payload_falls_back_to_llm() {
    let client = MockMistralClient::new().with_chat_reply(&fenced_reply(r#"{"fullName": "X"}"#));
    let svc = service(MockQrDetector::default(), &client, &Metrics::new());

    let extraction = svc
        .extract_from_payloads(&payloads(&["MECARD:N:X;;"]))
        .await
        .unwrap();

    assert_eq!(
        extraction.fallback_reason,
        Some(FallbackReason::Vcard(VcardError::MissingBegin))
    );
    assert_eq!(extraction.record.full_name, "X");
}

#[tokio::test]
async fn test_multiple_payloads_go_to_llm_together() {
    let client = MockMistralClient::new().with_chat_reply(&fenced_reply(r#"{"fullName": "Jane Doe"}"#));
    let svc = service(MockQrDetector::default(), &client, &Metrics::new());

    let extraction = svc
        .extract_from_payloads(&payloads(&[COMPLETE_VCARD, "https://example.com"]))
        .await
        .unwrap();

    assert_eq!(
        extraction.fallback_reason,
        Some(FallbackReason::MultiplePayloads(2))
    );
    let prompt = client.last_prompt().unwrap();
    assert!(prompt.contains("FN:Jane Doe"));
    assert!(prompt.contains("https://example.com"));
}

#[tokio::test]
async fn test_no_payloads_is_no_qr_code() {
    let client = MockMistralClient::new().with_chat_reply("{}");
    let metrics = Metrics::new();
    let svc = service(MockQrDetector::default(), &client, &metrics);

    let err = svc.extract_from_payloads(&[]).await.unwrap_err();

    assert!(matches!(err, ExtractionError::NoQrCode));
    assert_eq!(client.get_call_count("chat_complete"), 0);
    assert_eq!(metrics.extraction_failures_total(), 1);
}

#[tokio::test]
async fn test_unparseable_llm_reply_is_malformed_response() {
    let client = MockMistralClient::new().with_chat_reply("Sorry, I can't help with that.");
    let svc = service(MockQrDetector::default(), &client, &Metrics::new());

    let err = svc
        .extract_from_payloads(&payloads(&["garbage"]))
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractionError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unfenced_llm_reply_is_still_parsed() {
    // Prose before the object and no fence at all.
    let client = MockMistralClient::new()
        .with_chat_reply(r#"Here you go: {"fullName": "Jane", "email": "JANE@X.IO"}"#);
    let svc = service(MockQrDetector::default(), &client, &Metrics::new());

    let extraction = svc
        .extract_from_payloads(&payloads(&["garbage"]))
        .await
        .unwrap();

    assert_eq!(extraction.record.full_name, "Jane");
    assert_eq!(extraction.record.email, "jane@x.io");
}

#[tokio::test]
async fn test_llm_failure_is_typed() {
    let client = MockMistralClient::new();
    let svc = service(MockQrDetector::default(), &client, &Metrics::new());

    let err = svc
        .extract_from_payloads(&payloads(&["garbage"]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExtractionError::Llm(MistralApiError::ApiError { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_image_with_payload() {
    let detector = MockQrDetector::new(&[COMPLETE_VCARD]);
    let client = MockMistralClient::new();
    let metrics = Metrics::new();
    let svc = service(detector.clone(), &client, &metrics);

    let extraction = svc.extract_from_image(blank_png()).await.unwrap();

    assert_eq!(extraction.source, ExtractionSource::Vcard);
    assert_eq!(detector.call_count(), 1);
    assert_eq!(metrics.qr_payloads_decoded_total(), 1);
}

#[tokio::test]
async fn test_undecodable_upload_is_image_decode_error() {
    let detector = MockQrDetector::new(&[COMPLETE_VCARD]);
    let svc = service(detector.clone(), &MockMistralClient::new(), &Metrics::new());

    let err = svc
        .extract_from_image(b"not an image".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractionError::ImageDecode(_)));
    assert_eq!(detector.call_count(), 0);
}

#[tokio::test]
async fn test_blank_image_with_real_detector_has_no_qr_code() {
    let client = MockMistralClient::new();
    let svc = service(RqrrDetector::new(), &client, &Metrics::new());

    let err = svc.extract_from_image(blank_png()).await.unwrap_err();

    assert!(matches!(err, ExtractionError::NoQrCode));
    assert_eq!(client.get_call_count("chat_complete"), 0);
}

#[tokio::test]
async fn test_real_qr_code_parses_as_vcard() {
    let client = MockMistralClient::new();
    let metrics = Metrics::new();
    let svc = service(RqrrDetector::new(), &client, &metrics);

    let extraction = svc.extract_from_image(qr_png(COMPLETE_VCARD)).await.unwrap();

    assert_eq!(extraction.source, ExtractionSource::Vcard);
    assert_eq!(extraction.record.full_name, "Jane Doe");
    assert_eq!(extraction.record.phone, "+15551234567");
    assert_eq!(metrics.qr_payloads_decoded_total(), 1);
    assert_eq!(client.get_call_count("chat_complete"), 0);
}
