use bgp_rs::{
    decode, decode_ext, ASPath, DecodeOutcome, DecoderOptions, Error, Identifier, MessageBody,
    Segment,
};
use std::net::Ipv4Addr;

fn header(length: u16, record_type: u8) -> Vec<u8> {
    let mut data = vec![0xff; 16];
    data.extend_from_slice(&length.to_be_bytes());
    data.push(record_type);
    data
}

#[test]
fn decodes_keepalive() {
    let data = header(19, 4);
    let opts = DecoderOptions::default();
    let (msg, consumed) = decode(&opts, &data).expect("decode KEEPALIVE");
    assert_eq!(consumed, 19);
    assert!(matches!(msg.body, MessageBody::KeepAlive));
}

#[test]
fn rejects_keepalive_with_body() {
    let mut data = header(20, 4);
    data.push(0);
    let opts = DecoderOptions::default();
    assert!(matches!(decode(&opts, &data), Err(Error::InvalidMsg(_))));
}

#[test]
fn decodes_notification_cease() {
    let mut data = header(21, 3);
    data.extend_from_slice(&[6, 3]);
    let opts = DecoderOptions::default();
    let (msg, consumed) = decode(&opts, &data).expect("decode NOTIFICATION");
    assert_eq!(consumed, 21);
    match msg.body {
        MessageBody::Notification(n) => {
            assert_eq!(n.major_err_code, 6);
            assert_eq!(n.minor_err_code, 3);
            assert_eq!(n.major(), "Cease");
        }
        other => panic!("expected Notification, got {:?}", other),
    }
}

#[test]
fn decodes_minimal_update() {
    let mut data = header(23, 2);
    data.extend_from_slice(&[0, 0]); // withdrawn_len = 0
    data.extend_from_slice(&[0, 0]); // attrs_len = 0
    let opts = DecoderOptions::default();
    let (msg, consumed) = decode(&opts, &data).expect("decode minimal UPDATE");
    assert_eq!(consumed, 23);
    match msg.body {
        MessageBody::Update(update) => {
            assert!(update.withdrawn_routes.is_empty());
            assert!(update.announced_routes.is_empty());
            assert!(update.attributes.is_empty());
            assert!(!update.is_announcement());
            assert!(!update.is_withdrawal());
        }
        other => panic!("expected Update, got {:?}", other),
    }
}

#[test]
fn decodes_update_with_origin_only() {
    let mut data = header(27, 2);
    data.extend_from_slice(&[0, 0]); // withdrawn_len = 0
    data.extend_from_slice(&[0, 4]); // attrs_len = 4
    data.extend_from_slice(&[0x40, 1, 1, 0]); // ORIGIN = IGP
    let opts = DecoderOptions::default();
    let (msg, _) = decode(&opts, &data).expect("decode UPDATE with ORIGIN");
    match msg.body {
        MessageBody::Update(update) => {
            assert_eq!(update.attributes.len(), 1);
            match update.get(Identifier::ORIGIN) {
                Some(bgp_rs::PathAttribute::ORIGIN(bgp_rs::Origin::IGP)) => (),
                other => panic!("expected ORIGIN::IGP, got {:?}", other),
            }
        }
        other => panic!("expected Update, got {:?}", other),
    }
}

fn update_with_origin_and_prefix_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[0, 0]); // withdrawn_len = 0
    body.extend_from_slice(&[0, 4]); // attrs_len = 4
    body.extend_from_slice(&[0x40, 1, 1, 0]); // ORIGIN = IGP
    body.extend_from_slice(&[24, 10, 0, 0]); // 10.0.0.0/24
    body
}

#[test]
fn truncated_update_without_allow_truncation_is_partial() {
    let body = update_with_origin_and_prefix_body();
    let mut data = header(19 + body.len() as u16, 2);
    data.extend_from_slice(&body[..body.len() - 2]); // drop the last 2 bytes of the prefix
    let opts = DecoderOptions::default();
    assert!(matches!(decode(&opts, &data), Err(Error::Partial)));
    assert!(matches!(
        decode_ext(&opts, &data, false),
        Err(Error::Partial)
    ));
}

#[test]
fn truncated_update_with_allow_truncation_recovers_partial_tree() {
    let body = update_with_origin_and_prefix_body();
    let declared = 19 + body.len();
    let mut data = header(declared as u16, 2);
    data.extend_from_slice(&body[..body.len() - 2]);
    let opts = DecoderOptions::default();

    match decode_ext(&opts, &data, true).expect("best-effort decode") {
        DecodeOutcome::Truncated {
            message,
            consumed,
            declared: declared_len,
        } => {
            assert_eq!(consumed, data.len());
            assert_eq!(declared_len, declared);
            match message.body {
                MessageBody::Update(update) => {
                    assert!(update.withdrawn_routes.is_empty());
                    assert_eq!(update.attributes.len(), 1);
                    // The trailing prefix was cut short and is silently dropped.
                    assert!(update.announced_routes.is_empty());
                }
                other => panic!("expected Update, got {:?}", other),
            }
        }
        other => panic!("expected Truncated outcome, got {:?}", other),
    }
}

#[test]
fn complete_update_with_prefix_is_not_truncated() {
    let body = update_with_origin_and_prefix_body();
    let mut data = header(19 + body.len() as u16, 2);
    data.extend_from_slice(&body);
    let opts = DecoderOptions::default();

    match decode_ext(&opts, &data, true).expect("decode") {
        DecodeOutcome::Complete { message, consumed } => {
            assert_eq!(consumed, data.len());
            match message.body {
                MessageBody::Update(update) => {
                    assert_eq!(update.announced_routes.len(), 1);
                    assert!(update.is_announcement());
                }
                other => panic!("expected Update, got {:?}", other),
            }
        }
        other => panic!("expected Complete outcome, got {:?}", other),
    }
}

#[test]
fn communities_with_odd_length_is_invalid() {
    let mut data = header(26, 2);
    data.extend_from_slice(&[0, 0]); // withdrawn_len = 0
    data.extend_from_slice(&[0, 3]); // attrs_len = 3
    data.extend_from_slice(&[0xC0, 8, 1, 2, 3]); // COMMUNITIES, length=3, 3 garbage bytes
    let opts = DecoderOptions::default();
    assert!(matches!(decode(&opts, &data), Err(Error::InvalidMsg(_))));
}

#[test]
fn duplicate_attribute_type_is_invalid() {
    let mut data = header(31, 2);
    data.extend_from_slice(&[0, 0]); // withdrawn_len = 0
    data.extend_from_slice(&[0, 8]); // attrs_len = 8
    data.extend_from_slice(&[0x40, 1, 1, 0]); // ORIGIN = IGP
    data.extend_from_slice(&[0x40, 1, 1, 1]); // ORIGIN = EGP (duplicate)
    let opts = DecoderOptions::default();
    assert!(matches!(decode(&opts, &data), Err(Error::InvalidMsg(_))));
}

#[test]
fn as_path_asns_cnt_counts_a_set_as_one() {
    // AS_SET{10,20,30} + AS_SEQUENCE{40,50} -> 1 (the whole set) + 2 (the
    // sequence, one per member) = 3.
    let as_path = ASPath {
        segments: vec![
            Segment::AS_SET(vec![10, 20, 30]),
            Segment::AS_SEQUENCE(vec![40, 50]),
        ],
    };
    assert_eq!(as_path.asns_cnt(), 3);
}

#[test]
fn decodes_route_refresh() {
    let mut data = header(23, 5);
    data.extend_from_slice(&[0, 2, 0, 1]); // AFI=IPv6, subtype=0, SAFI=Unicast
    let opts = DecoderOptions::default();
    let (msg, _) = decode(&opts, &data).expect("decode ROUTE-REFRESH");
    match msg.body {
        MessageBody::RouteRefresh(rr) => {
            assert_eq!(rr.afi, bgp_rs::AFI::IPV6);
            assert_eq!(rr.safi, bgp_rs::SAFI::Unicast);
        }
        other => panic!("expected RouteRefresh, got {:?}", other),
    }
}

#[test]
fn decodes_open_with_capabilities() {
    #[rustfmt::skip]
    let params: Vec<u8> = vec![
        0x02, 0x06, 0x01, 0x04, 0x00, 0x02, 0x00, 0x01, // MultiProtocol: IPv6/Unicast
        0x02, 0x06, 0x41, 0x04, 0x00, 0x00, 0xfd, 0xe8, // FourByteASN: 65000
        0x02, 0x02, 0x02, 0x00, // RouteRefresh
        0x02, 0x04, 0xf0, 0x00, 0x00, 0x00, // Unknown capability 0xf0
    ];
    let mut body = vec![4]; // version
    body.extend_from_slice(&[0xfd, 0xe8]); // peer_asn = 65000
    body.extend_from_slice(&[0, 0x3c]); // hold_timer = 60
    body.extend_from_slice(&[1, 1, 1, 1]); // identifier
    body.push(params.len() as u8);
    body.extend_from_slice(&params);

    let mut data = header(19 + body.len() as u16, 1);
    data.extend_from_slice(&body);
    let opts = DecoderOptions::default();
    let (msg, _) = decode(&opts, &data).expect("decode OPEN");

    match msg.body {
        MessageBody::Open(open) => {
            assert_eq!(open.version, 4);
            assert_eq!(open.peer_asn, 65000);
            assert_eq!(Ipv4Addr::from(open.identifier), Ipv4Addr::new(1, 1, 1, 1));

            let capabilities = bgp_rs::Capabilities::from_parameters(&open.parameters);
            assert!(capabilities
                .MP_BGP_SUPPORT
                .contains(&(bgp_rs::AFI::IPV6, bgp_rs::SAFI::Unicast)));
            assert_eq!(capabilities.FOUR_OCTET_ASN_SUPPORT, Some(65000));
            assert!(capabilities.ROUTE_REFRESH_SUPPORT);
        }
        other => panic!("expected Open, got {:?}", other),
    }
}

#[test]
fn marker_omitted_option_skips_marker() {
    // The declared length field is always the full protocol length (>= 19)
    // regardless of marker_omitted; the marker's 16 bytes are simply not
    // physically present in the buffer, so only 3 bytes (length + type) are
    // actually consumed here.
    let mut data = vec![];
    data.extend_from_slice(&19u16.to_be_bytes());
    data.push(4);
    let mut opts = DecoderOptions::default();
    opts.marker_omitted = true;
    let (msg, consumed) = decode(&opts, &data).expect("decode with marker omitted");
    assert_eq!(consumed, 3);
    assert!(msg.header.marker.is_none());
}

#[test]
fn marker_omitted_rejects_length_below_protocol_minimum() {
    let mut data = vec![];
    data.extend_from_slice(&10u16.to_be_bytes());
    data.push(4);
    let mut opts = DecoderOptions::default();
    opts.marker_omitted = true;
    assert!(matches!(
        decode(&opts, &data),
        Err(Error::MalformedMsg(10))
    ));
}

#[test]
fn rejects_length_below_minimum() {
    let data = header(10, 4);
    let opts = DecoderOptions::default();
    assert!(matches!(decode(&opts, &data), Err(Error::MalformedMsg(10))));
}
