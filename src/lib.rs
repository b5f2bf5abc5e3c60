#![deny(missing_docs)]

//! `bgp-rs` decodes BGP-4 messages ([RFC 4271]) and their path attributes,
//! including multiprotocol reachability ([RFC 4760]), route reflection
//! ([RFC 4456]), confederations ([RFC 5065]), 4-byte ASNs ([RFC 6793]),
//! communities ([RFC 1997]), extended/IPv6-extended communities
//! ([RFC 4360], [RFC 5701]), enhanced route refresh ([RFC 7313]), and large
//! communities ([RFC 8092]).
//!
//! The crate is a pure codec: it performs no I/O and tracks no session
//! state. Callers (an MRT reader, a BMP monitoring station, a raw TCP BGP
//! speaker) hand it a byte buffer; it hands back a fully typed
//! [`BgpMessage`] or a well-defined [`Error`]. Re-encoding, deep semantic
//! validation (e.g. AS_PATH loop detection), and session/RIB state are all
//! left to the caller.
//!
//! ```
//! use bgp_rs::{decode, DecoderOptions, MessageBody};
//!
//! let mut data = vec![0xff; 16];
//! data.extend_from_slice(&[0, 19, 4]); // length=19, type=KEEPALIVE
//! let opts = DecoderOptions::default();
//! let (msg, consumed) = decode(&opts, &data).unwrap();
//! assert_eq!(consumed, 19);
//! assert!(matches!(msg.body, MessageBody::KeepAlive));
//! ```

mod cursor;
mod error;
mod options;

/// Path attributes carried in UPDATE messages.
pub mod attributes;
/// NOTIFICATION message decoding.
pub mod notification;
/// OPEN message parameters and capability discovery.
pub mod open;

pub use crate::attributes::*;
pub use crate::cursor::ParseCursor;
pub use crate::error::Error;
pub use crate::notification::Notification;
pub use crate::open::{Capabilities, Open, OpenCapability, OpenParameter};
pub use crate::options::DecoderOptions;

use std::convert::TryFrom;
use std::fmt::{self, Debug, Display, Formatter};
use std::net::IpAddr;

/// Address Family Identifier (RFC 4760).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum AFI {
    /// Internet Protocol version 4 (32 bits).
    IPV4 = 1,
    /// Internet Protocol version 6 (128 bits).
    IPV6 = 2,
}

impl TryFrom<u16> for AFI {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AFI::IPV4),
            2 => Ok(AFI::IPV6),
            _ => Err(Error::not_implemented(format!(
                "address family {} is not supported",
                value
            ))),
        }
    }
}

/// Subsequent Address Family Identifier (RFC 4760 and friends).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SAFI {
    /// Unicast forwarding.
    Unicast = 1,
    /// Multicast forwarding.
    Multicast = 2,
    /// MPLS-labeled unicast (RFC 8277).
    Labeled = 4,
    /// MPLS-labeled VPN unicast (RFC 4364).
    MplsVpn = 128,
}

impl TryFrom<u8> for SAFI {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SAFI::Unicast),
            2 => Ok(SAFI::Multicast),
            4 => Ok(SAFI::Labeled),
            128 => Ok(SAFI::MplsVpn),
            _ => Err(Error::not_implemented(format!(
                "subsequent address family {} is not supported",
                value
            ))),
        }
    }
}

/// The 19-byte header common to every BGP message.
#[derive(Debug, Clone)]
pub struct Header {
    /// Marker field. All-ones on the wire; `None` when
    /// [`DecoderOptions::marker_omitted`] was set, or when it was present on
    /// the wire but not retained because `marker_copy` was unset.
    pub marker: Option<[u8; 16]>,

    /// Declared total message length, including this header, in `[19, 4096]`.
    pub length: u16,

    /// Message type code (1=OPEN, 2=UPDATE, 3=NOTIFICATION, 4=KEEPALIVE,
    /// 5=ROUTE-REFRESH).
    pub record_type: u8,
}

/// A single decoded BGP message: its header plus the type-specific body.
#[derive(Debug, Clone)]
pub struct BgpMessage {
    /// The common header that preceded `body` on the wire.
    pub header: Header,
    /// The type-specific payload.
    pub body: MessageBody,
}

/// The type-specific payload of a [`BgpMessage`].
#[derive(Debug, Clone)]
pub enum MessageBody {
    /// A BGP OPEN message.
    Open(Open),
    /// A BGP UPDATE message.
    Update(Update),
    /// A BGP NOTIFICATION message.
    Notification(Notification),
    /// A BGP KEEPALIVE message. Carries no body.
    KeepAlive,
    /// A BGP ROUTE-REFRESH message (RFC 2918, RFC 7313).
    RouteRefresh(RouteRefresh),
}

/// A BGP ROUTE-REFRESH message.
#[derive(Debug, Clone)]
pub struct RouteRefresh {
    /// Address family being refreshed.
    pub afi: AFI,
    /// Refresh subtype. `0` for a plain request; RFC 7313 defines 1
    /// (Begin-of-RIB marker) and 2 (End-of-RIB marker) for enhanced refresh.
    pub subtype: u8,
    /// Subsequent address family being refreshed.
    pub safi: SAFI,
}

impl RouteRefresh {
    fn parse(cur: &mut ParseCursor) -> Result<RouteRefresh, Error> {
        let afi = AFI::try_from(cur.read_u16()?)?;
        let subtype = cur.read_u8()?;
        let safi = SAFI::try_from(cur.read_u8()?)?;
        Ok(RouteRefresh { afi, subtype, safi })
    }
}

/// A route distinguisher (RFC 4364): an 8-byte tag prepended to VPN
/// prefixes so overlapping customer address space can coexist.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RouteDistinguisher(
    /// The raw 8-byte value.
    pub [u8; 8],
);

impl Debug for RouteDistinguisher {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "RD({:02x?})", self.0)
    }
}

/// An MPLS label stack entry: a 20-bit label, 3 reserved bits, and the
/// bottom-of-stack flag, as packed into 3 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    /// The 20-bit MPLS label value.
    pub label: u32,
    /// Whether this is the last label in the stack.
    pub bottom_of_stack: bool,
}

impl Label {
    fn parse(cur: &mut ParseCursor) -> Result<Label, Error> {
        let bytes = cur.read_bytes(3)?;
        let raw = u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2]);
        Ok(Label {
            label: raw >> 4,
            bottom_of_stack: raw & 1 != 0,
        })
    }
}

/// A generic IP prefix, as carried in NLRI fields.
#[derive(Clone)]
pub struct Prefix {
    /// Address family this prefix belongs to.
    pub protocol: AFI,
    /// Prefix length in bits.
    pub length: u8,
    /// The minimal-length address bytes: exactly `ceil(length / 8)` bytes.
    /// Trailing bits past `length` in the final byte are left as read, not
    /// masked to zero -- callers needing canonical form normalize them.
    pub prefix: Vec<u8>,
}

impl From<&Prefix> for IpAddr {
    fn from(prefix: &Prefix) -> Self {
        match prefix.protocol {
            AFI::IPV4 => {
                let mut buffer = [0u8; 4];
                buffer[..prefix.prefix.len()].clone_from_slice(&prefix.prefix);
                IpAddr::from(buffer)
            }
            AFI::IPV6 => {
                let mut buffer = [0u8; 16];
                buffer[..prefix.prefix.len()].clone_from_slice(&prefix.prefix);
                IpAddr::from(buffer)
            }
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}/{}", IpAddr::from(self), self.length)
    }
}

impl Debug for Prefix {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}/{}", IpAddr::from(self), self.length)
    }
}

fn max_bits(afi: AFI) -> u8 {
    match afi {
        AFI::IPV4 => 32,
        AFI::IPV6 => 128,
    }
}

impl Prefix {
    /// Decode a bit-length-prefixed address for plain `Unicast`/`Multicast` SAFI.
    fn parse(cur: &mut ParseCursor, afi: AFI) -> Result<Prefix, Error> {
        let length = cur.read_u8()?;
        if length > max_bits(afi) {
            return Err(Error::invalid(format!(
                "prefix length {} exceeds the {}-bit maximum for this address family",
                length,
                max_bits(afi)
            )));
        }
        let nbytes = usize::from((length + 7) / 8);
        let prefix = cur.read_bytes(nbytes)?.to_vec();
        Ok(Prefix {
            protocol: afi,
            length,
            prefix,
        })
    }

    /// Decode a labeled prefix (SAFI 4): a label stack followed by the
    /// address, with the wire length covering the labels as well as the address.
    fn parse_labeled(cur: &mut ParseCursor, afi: AFI) -> Result<(Vec<Label>, Prefix), Error> {
        let length = cur.read_u8()?;
        let mut remaining_bits = i32::from(length);
        let mut labels = Vec::with_capacity(1);
        loop {
            if remaining_bits < 24 {
                return Err(Error::invalid(
                    "labeled prefix length too short to hold a label stack",
                ));
            }
            let label = Label::parse(cur)?;
            remaining_bits -= 24;
            let last = label.bottom_of_stack;
            labels.push(label);
            if last {
                break;
            }
        }
        if remaining_bits < 0 || remaining_bits as u16 > u16::from(max_bits(afi)) {
            return Err(Error::invalid(format!(
                "labeled prefix address length {} exceeds the {}-bit maximum",
                remaining_bits,
                max_bits(afi)
            )));
        }
        let nbytes = usize::from((remaining_bits as u16 + 7) / 8);
        let prefix = cur.read_bytes(nbytes)?.to_vec();
        Ok((
            labels,
            Prefix {
                protocol: afi,
                length: remaining_bits as u8,
                prefix,
            },
        ))
    }

    /// Decode an MPLS-VPN prefix (SAFI 128): a label stack, an 8-byte route
    /// distinguisher, then the address, all counted in the wire length.
    fn parse_vpn(
        cur: &mut ParseCursor,
        afi: AFI,
    ) -> Result<(Vec<Label>, RouteDistinguisher, Prefix), Error> {
        let length = cur.read_u8()?;
        let mut remaining_bits = i32::from(length);
        let mut labels = Vec::with_capacity(1);
        loop {
            if remaining_bits < 24 {
                return Err(Error::invalid(
                    "VPN prefix length too short to hold a label stack",
                ));
            }
            let label = Label::parse(cur)?;
            remaining_bits -= 24;
            let last = label.bottom_of_stack;
            labels.push(label);
            if last {
                break;
            }
        }
        if remaining_bits < 64 {
            return Err(Error::invalid(
                "VPN prefix length too short to hold a route distinguisher",
            ));
        }
        let mut rd = [0u8; 8];
        rd.copy_from_slice(cur.read_bytes(8)?);
        remaining_bits -= 64;
        if remaining_bits < 0 || remaining_bits as u16 > u16::from(max_bits(afi)) {
            return Err(Error::invalid(format!(
                "VPN prefix address length {} exceeds the {}-bit maximum",
                remaining_bits,
                max_bits(afi)
            )));
        }
        let nbytes = usize::from((remaining_bits as u16 + 7) / 8);
        let prefix = cur.read_bytes(nbytes)?.to_vec();
        Ok((
            labels,
            RouteDistinguisher(rd),
            Prefix {
                protocol: afi,
                length: remaining_bits as u8,
                prefix,
            },
        ))
    }
}

/// A single NLRI entry, tagged by which encoding produced it.
#[derive(Debug, Clone)]
#[allow(non_camel_case_types)]
pub enum NLRIEncoding {
    /// A plain IP prefix (IPv4 or IPv6 unicast/multicast).
    IP(Prefix),
    /// An MPLS-labeled prefix (RFC 8277): the label stack plus the prefix.
    IP_MPLS((Vec<Label>, Prefix)),
    /// An MPLS-VPN prefix (RFC 4364): the label stack, route distinguisher,
    /// and prefix.
    IP_VPN_MPLS((Vec<Label>, RouteDistinguisher, Prefix)),
}

fn parse_nlri_entry(cur: &mut ParseCursor, afi: AFI, safi: SAFI) -> Result<NLRIEncoding, Error> {
    Ok(match safi {
        SAFI::Unicast | SAFI::Multicast => NLRIEncoding::IP(Prefix::parse(cur, afi)?),
        SAFI::Labeled => {
            let (labels, prefix) = Prefix::parse_labeled(cur, afi)?;
            NLRIEncoding::IP_MPLS((labels, prefix))
        }
        SAFI::MplsVpn => {
            let (labels, rd, prefix) = Prefix::parse_vpn(cur, afi)?;
            NLRIEncoding::IP_VPN_MPLS((labels, rd, prefix))
        }
    })
}

pub(crate) fn parse_nlri_list(
    mut cur: ParseCursor,
    afi: AFI,
    safi: SAFI,
) -> Result<Vec<NLRIEncoding>, Error> {
    let mut out = Vec::with_capacity(4);
    while !cur.is_empty() {
        out.push(parse_nlri_entry(&mut cur, afi, safi).map_err(error::remap_framed)?);
    }
    Ok(out)
}

/// Decode as many whole NLRI entries as `cur` holds, silently stopping at
/// the first one that would read past the end rather than erroring. Used
/// only for the truncation-tolerant UPDATE path.
fn parse_nlri_list_tolerant(mut cur: ParseCursor, afi: AFI, safi: SAFI) -> Vec<NLRIEncoding> {
    let mut out = Vec::with_capacity(4);
    while !cur.is_empty() {
        let attempt = cur;
        match parse_nlri_entry(&mut cur, afi, safi) {
            Ok(entry) => out.push(entry),
            Err(_) => {
                cur = attempt;
                break;
            }
        }
    }
    out
}

/// A BGP UPDATE message: withdrawn routes, path attributes, and announced routes.
#[derive(Debug, Clone, Default)]
pub struct Update {
    /// Routes withdrawn by this UPDATE (IPv4 unicast only -- other address
    /// families are withdrawn via `MP_UNREACH_NLRI`).
    pub withdrawn_routes: Vec<NLRIEncoding>,
    /// Path attributes describing `announced_routes`.
    pub attributes: PathAttributes,
    /// Routes announced by this UPDATE (IPv4 unicast only -- other address
    /// families are announced via `MP_REACH_NLRI`).
    pub announced_routes: Vec<NLRIEncoding>,
}

impl Update {
    /// Parse an UPDATE body. `declared_len` is the length the outer BGP
    /// header claims the body occupies; `cur` may hold fewer bytes than
    /// that when `tolerant` is set, in which case the announced-NLRI tail
    /// is decoded from whatever is actually present. Withdrawn routes and
    /// attributes are always parsed strictly, since a short read there
    /// leaves no well-defined boundary for the fields that follow.
    fn parse_inner(
        mut cur: ParseCursor,
        opts: &DecoderOptions,
        declared_len: usize,
        tolerant: bool,
    ) -> Result<Update, Error> {
        let withdrawn_len = usize::from(cur.read_u16()?);
        let withdrawn_cur = cur.take(withdrawn_len)?;
        let withdrawn_routes = parse_nlri_list(withdrawn_cur, AFI::IPV4, SAFI::Unicast)?;

        let attrs_len = usize::from(cur.read_u16()?);
        let attrs_cur = cur.take(attrs_len)?;
        let attributes = PathAttributes::parse(attrs_cur, opts)?;

        let consumed_so_far = 2 + withdrawn_len + 2 + attrs_len;
        if consumed_so_far > declared_len {
            return Err(Error::invalid(
                "withdrawn + attribute lengths exceed the UPDATE body length",
            ));
        }
        let declared_announced_len = declared_len - consumed_so_far;

        let announced_routes = if tolerant {
            let available = declared_announced_len.min(cur.remaining());
            let announced_cur = cur.take(available)?;
            parse_nlri_list_tolerant(announced_cur, AFI::IPV4, SAFI::Unicast)
        } else {
            let announced_cur = cur.take(declared_announced_len)?;
            parse_nlri_list(announced_cur, AFI::IPV4, SAFI::Unicast)?
        };

        Ok(Update {
            withdrawn_routes,
            attributes,
            announced_routes,
        })
    }

    fn parse(cur: ParseCursor, opts: &DecoderOptions, body_len: usize) -> Result<Update, Error> {
        Update::parse_inner(cur, opts, body_len, false)
    }

    /// Retrieves the first path attribute with the given identifier, if present.
    pub fn get(&self, identifier: Identifier) -> Option<&PathAttribute> {
        self.attributes.get(identifier)
    }

    /// True if this UPDATE carries any announced routes, directly or via
    /// `MP_REACH_NLRI`.
    pub fn is_announcement(&self) -> bool {
        !self.announced_routes.is_empty() || self.get(Identifier::MP_REACH_NLRI).is_some()
    }

    /// True if this UPDATE carries any withdrawn routes, directly or via
    /// `MP_UNREACH_NLRI`.
    pub fn is_withdrawal(&self) -> bool {
        !self.withdrawn_routes.is_empty() || self.get(Identifier::MP_UNREACH_NLRI).is_some()
    }
}

fn parse_header(cur: &mut ParseCursor, opts: &DecoderOptions) -> Result<Header, Error> {
    let marker = if opts.marker_omitted {
        None
    } else if opts.marker_copy {
        let mut m = [0u8; 16];
        m.copy_from_slice(cur.read_bytes(16)?);
        Some(m)
    } else {
        cur.skip(16)?;
        None
    };
    let length = cur.read_u16()?;
    let record_type = cur.read_u8()?;
    Ok(Header {
        marker,
        length,
        record_type,
    })
}

fn header_len(opts: &DecoderOptions) -> usize {
    (if opts.marker_omitted { 0 } else { 16 }) + 2 + 1
}

/// The outcome of [`decode_ext`]: either a fully decoded message, or (when
/// `allow_truncation` was set) a best-effort partial message recovered from
/// an UPDATE whose announced-NLRI tail was cut short.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// Every declared byte of the message was present and parsed.
    Complete {
        /// The decoded message.
        message: BgpMessage,
        /// Bytes consumed, equal to the header's declared length.
        consumed: usize,
    },
    /// The message declared more bytes than `buf` held, but the bytes that
    /// were present parsed cleanly.
    Truncated {
        /// The best-effort message recovered from the bytes present.
        message: BgpMessage,
        /// Bytes consumed (i.e. `buf.len()`).
        consumed: usize,
        /// Bytes the header declared the message would occupy.
        declared: usize,
    },
}

/// Decode a single BGP message from the start of `buf`.
///
/// On success, returns the decoded message and the number of bytes consumed
/// from `buf` (equal to the header's declared length, less the marker's 16
/// bytes when [`DecoderOptions::marker_omitted`] is set). On
/// [`Error::Partial`], `buf` is left entirely unread by the caller's
/// accounting. Equivalent to `decode_ext(opts, buf, false)`, unwrapped to
/// the non-truncating case.
pub fn decode(opts: &DecoderOptions, buf: &[u8]) -> Result<(BgpMessage, usize), Error> {
    match decode_ext(opts, buf, false)? {
        DecodeOutcome::Complete { message, consumed } => Ok((message, consumed)),
        DecodeOutcome::Truncated { .. } => {
            unreachable!("decode_ext cannot produce Truncated when allow_truncation is false")
        }
    }
}

/// Decode a single BGP message from the start of `buf`, optionally
/// tolerating a truncated announced-NLRI section.
///
/// When `allow_truncation` is `true` and the message declares more bytes
/// than `buf` holds, a best-effort parse is attempted against an UPDATE
/// message: if everything up to the missing bytes parses cleanly, this
/// returns `Ok(DecodeOutcome::Truncated { .. })` with the partial tree
/// intact. Any other message type, or an UPDATE whose present bytes do not
/// themselves parse, falls back to [`Error::Partial`].
pub fn decode_ext(
    opts: &DecoderOptions,
    buf: &[u8],
    allow_truncation: bool,
) -> Result<DecodeOutcome, Error> {
    let hlen = header_len(opts);
    if buf.len() < hlen {
        return Err(Error::Partial);
    }
    let mut cur = ParseCursor::new(buf);
    let header = parse_header(&mut cur, opts)?;

    if header.length < 19 || header.length > 4096 {
        return Err(Error::MalformedMsg(header.length));
    }

    // `declared` is the protocol-level length field, which always counts a
    // full 19-byte header regardless of `marker_omitted` -- the marker's 16
    // bytes are simply not physically present in `buf` in that mode, so the
    // bytes this message actually occupies in `buf` are `physical_total`,
    // not `declared`.
    let declared = usize::from(header.length);
    let body_len = declared - 19;
    let physical_total = hlen + body_len;

    if buf.len() < physical_total {
        if allow_truncation && header.record_type == 2 {
            let body_cur = ParseCursor::new(&buf[hlen..]);
            let update = Update::parse_inner(body_cur, opts, body_len, true)?;
            log::trace!(
                "truncated UPDATE: declared {} bytes, {} available",
                physical_total,
                buf.len()
            );
            return Ok(DecodeOutcome::Truncated {
                message: BgpMessage {
                    header,
                    body: MessageBody::Update(update),
                },
                consumed: buf.len(),
                declared: physical_total,
            });
        }
        return Err(Error::Partial);
    }

    let body_buf = &buf[hlen..physical_total];
    let body_cur = ParseCursor::new(body_buf);

    let body = match header.record_type {
        1 => MessageBody::Open(Open::parse(body_cur)?),
        2 => MessageBody::Update(Update::parse(body_cur, opts, body_len)?),
        3 => MessageBody::Notification(Notification::parse(body_cur, body_len)?),
        4 => {
            if body_len != 0 {
                return Err(Error::invalid("KEEPALIVE must carry no body"));
            }
            MessageBody::KeepAlive
        }
        5 => {
            let mut c = body_cur;
            MessageBody::RouteRefresh(RouteRefresh::parse(&mut c)?)
        }
        t => return Err(Error::invalid(format!("unknown BGP message type {}", t))),
    };

    log::trace!("decoded BGP message type {}", header.record_type);

    Ok(DecodeOutcome::Complete {
        message: BgpMessage { header, body },
        consumed: physical_total,
    })
}
