//! Checks the round-trip law over realistic zonefiles.
//!
//! For anything that loads without an error, saving must reproduce the
//! input byte for byte, however creative its formatting.

use rstest::rstest;
use zonefile::Zonefile;

#[rstest]
#[case::origin(&include_bytes!("../test-data/zonefiles/origin.zone")[..])]
#[case::reverse(&include_bytes!("../test-data/zonefiles/reverse.zone")[..])]
#[case::ip6(&include_bytes!("../test-data/zonefiles/ip6.zone")[..])]
#[case::example(&include_bytes!("../test-data/zonefiles/example.zone")[..])]
#[case::soa(&include_bytes!("../test-data/zonefiles/soa.zone")[..])]
#[case::crlf(&include_bytes!("../test-data/zonefiles/crlf.zone")[..])]
fn load_then_save_is_identity(#[case] data: &[u8]) {
    let zone = Zonefile::load(data).unwrap();
    assert_eq!(zone.save().as_ref(), data);
    // Saving twice must give the same bytes both times.
    assert_eq!(zone.save().as_ref(), data);
}

#[test]
fn origin_fixture_structure() {
    let zone =
        Zonefile::load(include_bytes!("../test-data/zonefiles/origin.zone"))
            .unwrap();
    let entries = zone.entries();
    assert_eq!(entries.len(), 19);

    assert!(entries[0].is_control());
    assert_eq!(entries[0].command().unwrap().as_ref(), b"$ORIGIN");
    assert_eq!(
        entries[0].values(),
        [bytes::Bytes::from_static(b"MYDOMAIN.COM.")]
    );
    assert_eq!(entries[1].command().unwrap().as_ref(), b"$TTL");

    // The parenthesized SOA spans six physical lines but is one entry.
    let soa = &entries[2];
    assert_eq!(soa.rtype().unwrap().as_ref(), b"SOA");
    assert_eq!(soa.domain().unwrap().as_ref(), b"@");
    let values = soa.values();
    assert_eq!(values.len(), 7);
    assert_eq!(values[2].as_ref(), b"1406291485");

    // An indented record has no domain of its own.
    assert_eq!(entries[7].domain(), None);
    assert_eq!(entries[7].rtype().unwrap().as_ref(), b"A");

    // Escaped semicolons inside a quoted TXT value decode cleanly.
    let txt = &entries[18];
    assert_eq!(txt.rtype().unwrap().as_ref(), b"TXT");
    assert_eq!(
        txt.values()[0].as_ref(),
        b"v=DKIM1; k=rsa; p=MIGf..."
    );
}

#[test]
fn reverse_fixture_keeps_origin_directives_in_order() {
    let zone = Zonefile::load(include_bytes!(
        "../test-data/zonefiles/reverse.zone"
    ))
    .unwrap();
    let origins: Vec<_> = zone
        .entries()
        .iter()
        .filter(|e| e.command().as_deref() == Some(&b"$ORIGIN"[..]))
        .map(|e| e.values()[0].clone())
        .collect();
    assert_eq!(
        origins,
        [
            bytes::Bytes::from_static(b"0.168.192.IN-ADDR.ARPA."),
            bytes::Bytes::from_static(b"30.168.192.in-addr.arpa."),
            bytes::Bytes::from_static(b"168.192.in-addr.arpa."),
        ]
    );
}
