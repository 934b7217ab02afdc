//! Request table invariants: dedup, matching, expiry.
use super::*;
use embedded_can::StandardId;

fn reply_id() -> Id {
    Id::Standard(StandardId::new(0x7E8).unwrap())
}

fn other_id() -> Id {
    Id::Standard(StandardId::new(0x7E9).unwrap())
}

fn unit_decode(_payload: &[u8]) -> f32 {
    1.0
}

fn request(bus: u8, key: u8) -> DiagnosticRequest {
    DiagnosticRequest::new(bus, reply_id(), key, unit_decode, "")
}

fn reply(key: u8) -> CanMessage {
    CanMessage::new(reply_id(), &[0x03, 0x41, key, 0x20]).unwrap()
}

#[test]
fn test_match_removes_request() {
    let mut table: RequestTable<4> = RequestTable::new();
    table.insert(request(0, 0x0C)).unwrap();

    let taken = table.take_match(0, &reply(0x0C)).unwrap();
    assert_eq!(taken.key, 0x0C);
    assert!(table.is_empty());

    // A second identical reply finds nothing to match.
    assert!(table.take_match(0, &reply(0x0C)).is_none());
}

#[test]
fn test_no_match_on_wrong_bus_id_or_key() {
    let mut table: RequestTable<4> = RequestTable::new();
    table.insert(request(0, 0x0C)).unwrap();

    assert!(table.take_match(1, &reply(0x0C)).is_none());
    assert!(table.take_match(0, &reply(0x0D)).is_none());
    let wrong_id = CanMessage::new(other_id(), &[0x03, 0x41, 0x0C, 0x20]).unwrap();
    assert!(table.take_match(0, &wrong_id).is_none());
    assert_eq!(table.len(), 1);
}

#[test]
fn test_short_reply_cannot_match() {
    let mut table: RequestTable<4> = RequestTable::new();
    table.insert(request(0, 0x0C)).unwrap();
    // Two bytes: no correlation byte present at all.
    let short = CanMessage::new(reply_id(), &[0x01, 0x41]).unwrap();
    assert!(table.take_match(0, &short).is_none());
}

#[test]
fn test_duplicate_key_replaces_prior() {
    let mut table: RequestTable<4> = RequestTable::new();
    table
        .insert(request(0, 0x0C).with_timeout(100))
        .unwrap();
    let replaced = table
        .insert(request(0, 0x0C).with_timeout(900))
        .unwrap();

    assert_eq!(replaced.unwrap().timeout_ms, 100);
    assert_eq!(table.len(), 1);

    // A single reply satisfies exactly one request.
    assert!(table.take_match(0, &reply(0x0C)).is_some());
    assert!(table.take_match(0, &reply(0x0C)).is_none());
}

#[test]
fn test_same_key_on_other_bus_is_independent() {
    let mut table: RequestTable<4> = RequestTable::new();
    table.insert(request(0, 0x0C)).unwrap();
    table.insert(request(1, 0x0C)).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.contains(0, 0x0C));
    assert!(table.contains(1, 0x0C));
}

#[test]
fn test_insert_full_table() {
    let mut table: RequestTable<2> = RequestTable::new();
    table.insert(request(0, 0x05)).unwrap();
    table.insert(request(0, 0x0C)).unwrap();
    assert!(matches!(
        table.insert(request(0, 0x0D)),
        Err(crate::error::DiagnosticError::TableFull)
    ));
}

#[test]
fn test_expiry_removes_and_reports() {
    let mut table: RequestTable<4> = RequestTable::new();
    let mut req = request(0, 0x0C).with_timeout(500);
    req.issued_at_ms = 1_000;
    table.insert(req).unwrap();

    let mut expired_keys = std::vec::Vec::new();
    table.expire(1_499, |r| expired_keys.push(r.key));
    assert!(expired_keys.is_empty());

    table.expire(1_500, |r| expired_keys.push(r.key));
    assert_eq!(expired_keys, [0x0C]);

    // A late reply after expiry never matches.
    assert!(table.take_match(0, &reply(0x0C)).is_none());
}

#[test]
fn test_expiry_survives_clock_wraparound() {
    let mut table: RequestTable<4> = RequestTable::new();
    let mut req = request(0, 0x05).with_timeout(100);
    req.issued_at_ms = u32::MAX - 20;
    table.insert(req).unwrap();

    let mut expired = 0;
    // 21 ms after issue, counter has wrapped to 0.
    table.expire(0, |_| expired += 1);
    assert_eq!(expired, 0);

    // 100 ms after issue.
    table.expire(79, |_| expired += 1);
    assert_eq!(expired, 1);
}
