use super::*;
use std::str::FromStr;

#[test]
fn test_new_ids_are_unique() {
    let a = TenantId::new();
    let b = TenantId::new();
    assert_ne!(a, b);
}

#[test]
fn test_v7_ids_are_time_ordered() {
    let a = JournalLineId::new();
    let b = JournalLineId::new();
    assert!(a <= b, "UUID v7 ids should sort by creation time");
}

#[test]
fn test_display_and_parse_round_trip() {
    let id = InvoiceId::new();
    let parsed = InvoiceId::from_str(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn test_from_uuid_preserves_inner() {
    let raw = uuid::Uuid::new_v4();
    let id = EntityId::from_uuid(raw);
    assert_eq!(id.into_inner(), raw);
}

#[test]
fn test_parse_invalid() {
    assert!(PaymentId::from_str("not-a-uuid").is_err());
}

#[test]
fn test_serde_transparent() {
    let id = GlAccountId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
    let back: GlAccountId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
