//! # Brutal Security Tests for Access Control (pv-01)
//!
//! These tests attempt to break the signed-URL and ownership invariants.
//!
//! ## Test Categories
//!
//! 1. **Window Attacks** - widening, shifting, replay after expiry
//! 2. **Signature Attacks** - bit flips, truncation, key confusion
//! 3. **URL Attacks** - path swaps, query injection, parameter smuggling
//! 4. **Ownership Attacks** - near-miss subjects, existence probing

use proptest::prelude::*;
use pv_01_access_control::{
    authorize, AccessConfig, AccessControlApi, AccessControlService, AuthorizationDecision,
    InMemoryOwnerResolver, InvalidReason, ManualTimeSource, OwnershipOutcome, SigningKey,
    UrlSigner, UrlVerification, SIGNATURE_PARAM, VALID_FROM_PARAM, VALID_TO_PARAM,
};
use shared_types::{PhotoId, Subject};
use std::sync::Arc;
use url::Url;

// =============================================================================
// TEST HELPERS
// =============================================================================

const T0: u64 = 1_700_000_000;
const PHOTO_URL: &str = "https://host/api/photos/R1/signed-content";

fn make_signer() -> UrlSigner {
    UrlSigner::new(&SigningKey::new(*b"brutal-test-signing-key-32-bytes")).unwrap()
}

fn query_value(signed: &str, name: &str) -> String {
    Url::parse(signed)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
        .unwrap()
}

fn with_param(signed: &str, name: &str, value: &str) -> String {
    let mut url = Url::parse(signed).unwrap();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .map(|(k, v)| if k == name { (k, value.to_string()) } else { (k, v) })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

const HEX: &[u8] = b"0123456789abcdef";

// =============================================================================
// 1. WINDOW ATTACKS
// =============================================================================

#[test]
fn brutal_widen_valid_to_without_resigning() {
    let signer = make_signer();
    let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let forged = with_param(&signed, VALID_TO_PARAM, &(T0 + 3600).to_string());
    assert_eq!(
        signer.verify(&forged, T0 + 301),
        UrlVerification::Invalid(InvalidReason::Tampered)
    );
}

#[test]
fn brutal_backdate_valid_from_without_resigning() {
    let signer = make_signer();
    let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let forged = with_param(&signed, VALID_FROM_PARAM, &(T0 - 3600).to_string());
    assert_eq!(
        signer.verify(&forged, T0 - 10),
        UrlVerification::Invalid(InvalidReason::Tampered)
    );
}

#[test]
fn brutal_replay_after_expiry_is_refused_forever() {
    let signer = make_signer();
    let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    for later in [T0 + 301, T0 + 86_400, u64::MAX] {
        assert_eq!(
            signer.verify(&signed, later),
            UrlVerification::Invalid(InvalidReason::Expired)
        );
    }
}

// =============================================================================
// 2. SIGNATURE ATTACKS
// =============================================================================

#[test]
fn brutal_truncated_signature() {
    let signer = make_signer();
    let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let sig = query_value(&signed, SIGNATURE_PARAM);
    for len in [0, 1, 32, 63] {
        let forged = with_param(&signed, SIGNATURE_PARAM, &sig[..len]);
        assert_eq!(
            signer.verify(&forged, T0),
            UrlVerification::Invalid(InvalidReason::Tampered),
            "prefix of length {len}"
        );
    }
    let extended = with_param(&signed, SIGNATURE_PARAM, &format!("{sig}0"));
    assert_eq!(
        signer.verify(&extended, T0),
        UrlVerification::Invalid(InvalidReason::Tampered)
    );
}

#[test]
fn brutal_signature_from_other_url_is_useless() {
    let signer = make_signer();
    let a = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let b = signer
        .sign("https://host/api/photos/R2/signed-content", T0, T0 + 300)
        .unwrap();
    let transplanted = with_param(&b, SIGNATURE_PARAM, &query_value(&a, SIGNATURE_PARAM));
    assert_eq!(
        signer.verify(&transplanted, T0),
        UrlVerification::Invalid(InvalidReason::Tampered)
    );
}

#[test]
fn brutal_key_confusion() {
    let signed = make_signer().sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let other = UrlSigner::new(&SigningKey::new(*b"another-signing-key-of-32-bytes!")).unwrap();
    assert_eq!(
        other.verify(&signed, T0),
        UrlVerification::Invalid(InvalidReason::Tampered)
    );
}

// =============================================================================
// 3. URL ATTACKS
// =============================================================================

#[test]
fn brutal_host_swap() {
    let signer = make_signer();
    let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let moved = signed.replacen("https://host/", "https://evil/", 1);
    assert_eq!(
        signer.verify(&moved, T0),
        UrlVerification::Invalid(InvalidReason::Tampered)
    );
}

#[test]
fn brutal_scheme_downgrade() {
    let signer = make_signer();
    let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let downgraded = signed.replacen("https://", "http://", 1);
    assert_eq!(
        signer.verify(&downgraded, T0),
        UrlVerification::Invalid(InvalidReason::Tampered)
    );
}

#[test]
fn brutal_path_traversal_suffix() {
    let signer = make_signer();
    let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let traversed = signed.replacen("/signed-content", "/signed-content/../content", 1);
    assert_eq!(
        signer.verify(&traversed, T0),
        UrlVerification::Invalid(InvalidReason::Tampered)
    );
}

#[test]
fn brutal_smuggled_second_window() {
    let signer = make_signer();
    let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let smuggled = format!("{signed}&validTo={}", T0 + 99_999);
    assert_eq!(
        signer.verify(&smuggled, T0 + 1000),
        UrlVerification::Invalid(InvalidReason::Malformed)
    );
}

#[test]
fn brutal_smuggled_second_signature() {
    let signer = make_signer();
    let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
    let smuggled = format!("{signed}&signature={}", "0".repeat(64));
    assert_eq!(
        signer.verify(&smuggled, T0),
        UrlVerification::Invalid(InvalidReason::Malformed)
    );
}

#[test]
fn brutal_non_utf8_escape_swap() {
    let signer = make_signer();
    let signed = signer
        .sign("https://host/api/photos?tag=%FF", T0, T0 + 300)
        .unwrap();
    assert!(signed.contains("tag=%FF"));
    assert_eq!(signer.verify(&signed, T0), UrlVerification::Valid);

    for replacement in ["tag=%FE", "tag=%C3", "tag=%EF%BF%BD"] {
        let forged = signed.replace("tag=%FF", replacement);
        assert_eq!(
            signer.verify(&forged, T0),
            UrlVerification::Invalid(InvalidReason::Tampered),
            "{replacement} must not verify"
        );
    }
}

// =============================================================================
// 4. OWNERSHIP ATTACKS
// =============================================================================

#[tokio::test]
async fn brutal_existence_probing_sees_not_found_first() {
    let owners = Arc::new(InMemoryOwnerResolver::new());
    let r1 = PhotoId::new_v4();
    owners.insert(r1, Subject::new("alice"));
    let config = AccessConfig::new("https://host", SigningKey::new([3u8; 32])).unwrap();
    let service =
        AccessControlService::new(config, owners, Arc::new(ManualTimeSource::new(T0))).unwrap();

    let mallory = Subject::new("mallory");
    assert_eq!(
        service.authorize_resource(&mallory, &r1).await.unwrap(),
        OwnershipOutcome::Deny
    );
    assert_eq!(
        service
            .authorize_resource(&mallory, &PhotoId::new_v4())
            .await
            .unwrap(),
        OwnershipOutcome::NotFound
    );
}

#[test]
fn brutal_unicode_lookalike_subject() {
    // Cyrillic 'а' (U+0430) in place of Latin 'a'.
    assert_eq!(
        authorize(&Subject::new("\u{0430}lice"), &Subject::new("alice")),
        AuthorizationDecision::Deny
    );
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_valid_inside_window_expired_outside(
        not_before in 0u64..4_000_000_000,
        span in 0u64..100_000,
        offset in 0u64..100_000,
        overshoot in 1u64..100_000,
    ) {
        let signer = make_signer();
        let not_after = not_before + span;
        let signed = signer.sign(PHOTO_URL, not_before, not_after).unwrap();

        let inside = not_before + offset.min(span);
        prop_assert_eq!(signer.verify(&signed, inside), UrlVerification::Valid);

        prop_assert_eq!(
            signer.verify(&signed, not_after + overshoot),
            UrlVerification::Invalid(InvalidReason::Expired)
        );
        if not_before >= overshoot {
            prop_assert_eq!(
                signer.verify(&signed, not_before - overshoot),
                UrlVerification::Invalid(InvalidReason::Expired)
            );
        }
    }

    #[test]
    fn prop_any_single_signature_char_flip_is_tampering(
        index in 0usize..64,
        replacement in 0usize..16,
    ) {
        let signer = make_signer();
        let signed = signer.sign(PHOTO_URL, T0, T0 + 300).unwrap();
        let sig = query_value(&signed, SIGNATURE_PARAM);

        let mut bytes = sig.into_bytes();
        let mut new_char = HEX[replacement];
        if new_char == bytes[index] {
            new_char = HEX[(replacement + 1) % HEX.len()];
        }
        bytes[index] = new_char;
        let flipped = String::from_utf8(bytes).unwrap();

        let forged = with_param(&signed, SIGNATURE_PARAM, &flipped);
        prop_assert_eq!(
            signer.verify(&forged, T0),
            UrlVerification::Invalid(InvalidReason::Tampered)
        );
    }

    #[test]
    fn prop_modified_query_param_is_tampering(
        key in "[a-z]{1,8}",
        value in "[a-zA-Z0-9]{0,12}",
        new_value in "[a-zA-Z0-9]{0,12}",
    ) {
        prop_assume!(value != new_value);
        prop_assume!(!["validfrom", "validto", "signature"].contains(&key.as_str()));

        let signer = make_signer();
        let url = format!("https://host/api/photos?{key}={value}");
        let signed = signer.sign(&url, T0, T0 + 300).unwrap();
        prop_assert_eq!(signer.verify(&signed, T0), UrlVerification::Valid);

        let forged = with_param(&signed, &key, &new_value);
        prop_assert_eq!(
            signer.verify(&forged, T0),
            UrlVerification::Invalid(InvalidReason::Tampered)
        );
    }

    #[test]
    fn prop_swapped_raw_byte_escape_is_tampering(original in 0x80u8..=0xFF, forged in 0x80u8..=0xFF) {
        prop_assume!(original != forged);
        let signer = make_signer();
        let url = format!("https://host/api/photos?tag=%{original:02X}");
        let signed = signer.sign(&url, T0, T0 + 300).unwrap();
        let tampered = signed.replace(
            &format!("tag=%{original:02X}"),
            &format!("tag=%{forged:02X}"),
        );
        prop_assert_eq!(
            signer.verify(&tampered, T0),
            UrlVerification::Invalid(InvalidReason::Tampered)
        );
    }

    #[test]
    fn prop_modified_path_is_tampering(segment in "[a-z0-9]{1,16}", other in "[a-z0-9]{1,16}") {
        prop_assume!(segment != other);
        let signer = make_signer();
        let signed = signer
            .sign(&format!("https://host/api/photos/{segment}/signed-content"), T0, T0 + 300)
            .unwrap();
        let forged = signed.replacen(
            &format!("/api/photos/{segment}/"),
            &format!("/api/photos/{other}/"),
            1,
        );
        prop_assert_eq!(
            signer.verify(&forged, T0),
            UrlVerification::Invalid(InvalidReason::Tampered)
        );
    }

    #[test]
    fn prop_signing_is_idempotent(not_before in 0u64..1_000_000, span in 0u64..1_000) {
        let signer = make_signer();
        let a = signer.sign(PHOTO_URL, not_before, not_before + span).unwrap();
        let b = signer.sign(PHOTO_URL, not_before, not_before + span).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_authorize_iff_identical(caller in ".{0,16}", owner in ".{0,16}") {
        let decision = authorize(&Subject::new(caller.clone()), &Subject::new(owner.clone()));
        prop_assert_eq!(decision.is_allowed(), caller == owner);
    }

    #[test]
    fn prop_one_char_difference_is_denied(owner in "[a-z]{1,16}", index in 0usize..16) {
        let index = index % owner.len();
        let mut caller: Vec<u8> = owner.clone().into_bytes();
        caller[index] = if caller[index] == b'z' { b'a' } else { caller[index] + 1 };
        let caller = String::from_utf8(caller).unwrap();
        prop_assert_eq!(
            authorize(&Subject::new(caller), &Subject::new(owner)),
            AuthorizationDecision::Deny
        );
    }
}
