//! Path attributes carried in UPDATE messages ([RFC 4271] §5 and friends).
//!
//! [RFC 4271]: http://www.iana.org/go/rfc4271

use crate::{parse_nlri_list, DecoderOptions, Error, NLRIEncoding, ParseCursor, AFI, SAFI};
use std::convert::TryFrom;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const FLAG_EXTENDED_LENGTH: u8 = 1 << 4;

/// Path attribute type codes this crate decodes structurally.
///
/// Codes outside this set are not unrepresentable -- they simply surface as
/// [`PathAttribute::Unknown`] rather than a dedicated variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
#[repr(u8)]
pub enum Identifier {
    /// Indicates how an UPDATE message was generated.
    ORIGIN = 1,
    /// The path an UPDATE message traveled, as a sequence of AS segments.
    AS_PATH = 2,
    /// The next-hop IP address for routes announced in this UPDATE.
    NEXT_HOP = 3,
    /// Discriminates among multiple exit/entry points (MED).
    MULTI_EXIT_DISC = 4,
    /// Degree of preference for internal routes.
    LOCAL_PREF = 5,
    /// Flags that a route is the result of aggregation with possible loss of
    /// specific information.
    ATOMIC_AGGREGATE = 6,
    /// The AS and router that performed route aggregation.
    AGGREGATOR = 7,
    /// Arbitrary tags carried with a route ([RFC 1997]).
    ///
    /// [RFC 1997]: http://www.iana.org/go/rfc1997
    COMMUNITIES = 8,
    /// BGP Identifier of the route reflector that reflected this route
    /// ([RFC 4456]).
    ///
    /// [RFC 4456]: http://www.iana.org/go/rfc4456
    ORIGINATOR_ID = 9,
    /// The reflection path a route has taken ([RFC 4456]).
    ///
    /// [RFC 4456]: http://www.iana.org/go/rfc4456
    CLUSTER_LIST = 10,
    /// Multiprotocol reachability ([RFC 4760]).
    ///
    /// [RFC 4760]: http://www.iana.org/go/rfc4760
    MP_REACH_NLRI = 14,
    /// Multiprotocol unreachability ([RFC 4760]).
    ///
    /// [RFC 4760]: http://www.iana.org/go/rfc4760
    MP_UNREACH_NLRI = 15,
    /// Extended communities ([RFC 4360]).
    ///
    /// [RFC 4360]: http://www.iana.org/go/rfc4360
    EXTENDED_COMMUNITIES = 16,
    /// AS_PATH carried with 4-byte ASNs ([RFC 6793]).
    ///
    /// [RFC 6793]: http://www.iana.org/go/rfc6793
    AS4_PATH = 17,
    /// AGGREGATOR carried with a 4-byte ASN ([RFC 6793]).
    ///
    /// [RFC 6793]: http://www.iana.org/go/rfc6793
    AS4_AGGREGATOR = 18,
    /// AS path limit, from the expired `draft-ietf-idr-as-pathlimit`.
    /// **(deprecated)**
    AS_PATHLIMIT = 21,
    /// IPv6-specific extended communities ([RFC 5701]).
    ///
    /// [RFC 5701]: http://www.iana.org/go/rfc5701
    IPV6_EXTENDED_COMMUNITIES = 25,
    /// BGP-LS link-state information ([RFC 7752]), carried opaquely.
    ///
    /// [RFC 7752]: http://www.iana.org/go/rfc7752
    BGP_LS = 29,
    /// Large communities ([RFC 8092]).
    ///
    /// [RFC 8092]: http://www.iana.org/go/rfc8092
    LARGE_COMMUNITIES = 32,
}

/// A single decoded path attribute.
#[derive(Debug, Clone)]
#[allow(non_camel_case_types)]
pub enum PathAttribute {
    /// See [`Identifier::ORIGIN`].
    ORIGIN(Origin),
    /// See [`Identifier::AS_PATH`].
    AS_PATH(ASPath),
    /// See [`Identifier::NEXT_HOP`].
    NEXT_HOP(IpAddr),
    /// See [`Identifier::MULTI_EXIT_DISC`].
    MULTI_EXIT_DISC(u32),
    /// See [`Identifier::LOCAL_PREF`].
    LOCAL_PREF(u32),
    /// See [`Identifier::ATOMIC_AGGREGATE`]. Carries no data.
    ATOMIC_AGGREGATE,
    /// See [`Identifier::AGGREGATOR`]. `(asn, speaker)`.
    AGGREGATOR((u32, Ipv4Addr)),
    /// See [`Identifier::COMMUNITIES`].
    COMMUNITIES(Vec<u32>),
    /// See [`Identifier::ORIGINATOR_ID`].
    ORIGINATOR_ID(u32),
    /// See [`Identifier::CLUSTER_LIST`].
    CLUSTER_LIST(Vec<u32>),
    /// See [`Identifier::MP_REACH_NLRI`].
    MP_REACH_NLRI(MPReachNLRI),
    /// See [`Identifier::MP_UNREACH_NLRI`].
    MP_UNREACH_NLRI(MPUnreachNLRI),
    /// See [`Identifier::EXTENDED_COMMUNITIES`].
    EXTENDED_COMMUNITIES(Vec<ExtendedCommunity>),
    /// See [`Identifier::AS4_PATH`].
    AS4_PATH(ASPath),
    /// See [`Identifier::AS4_AGGREGATOR`]. `(asn, speaker)`.
    AS4_AGGREGATOR((u32, Ipv4Addr)),
    /// See [`Identifier::AS_PATHLIMIT`]. `(limit, asn)`.
    AS_PATHLIMIT((u8, u32)),
    /// See [`Identifier::IPV6_EXTENDED_COMMUNITIES`].
    IPV6_EXTENDED_COMMUNITIES(Vec<Ipv6ExtendedCommunity>),
    /// See [`Identifier::BGP_LS`]. Kept opaque -- this crate does not model
    /// the link-state TLV grammar.
    BGP_LS(Vec<u8>),
    /// See [`Identifier::LARGE_COMMUNITIES`].
    LARGE_COMMUNITIES(Vec<LargeCommunity>),
    /// An attribute type this crate does not assign a dedicated variant,
    /// kept as its raw value. Produced only when
    /// [`DecoderOptions::ignore_not_implemented`] is set; otherwise such an
    /// attribute type causes [`Error::NotImplemented`].
    Unknown {
        /// The attribute type code as it appeared on the wire.
        code: u8,
        /// The raw attribute value, unparsed.
        raw: Vec<u8>,
    },
    /// A sentinel standing in for an attribute that was structurally
    /// invalid (a duplicate type code, or a value that failed its
    /// per-attribute decode). Produced only when
    /// [`DecoderOptions::ignore_invalid`] is set; otherwise such an
    /// attribute causes [`Error::InvalidMsg`].
    Malformed {
        /// The attribute type code as it appeared on the wire.
        code: u8,
        /// The raw attribute value, unparsed.
        raw: Vec<u8>,
    },
}

impl PathAttribute {
    /// The [`Identifier`] for this attribute, if it has a dedicated one.
    /// `Unknown` and `Malformed` attributes have no `Identifier` and return
    /// `None`.
    pub fn id(&self) -> Option<Identifier> {
        Some(match self {
            PathAttribute::ORIGIN(_) => Identifier::ORIGIN,
            PathAttribute::AS_PATH(_) => Identifier::AS_PATH,
            PathAttribute::NEXT_HOP(_) => Identifier::NEXT_HOP,
            PathAttribute::MULTI_EXIT_DISC(_) => Identifier::MULTI_EXIT_DISC,
            PathAttribute::LOCAL_PREF(_) => Identifier::LOCAL_PREF,
            PathAttribute::ATOMIC_AGGREGATE => Identifier::ATOMIC_AGGREGATE,
            PathAttribute::AGGREGATOR(_) => Identifier::AGGREGATOR,
            PathAttribute::COMMUNITIES(_) => Identifier::COMMUNITIES,
            PathAttribute::ORIGINATOR_ID(_) => Identifier::ORIGINATOR_ID,
            PathAttribute::CLUSTER_LIST(_) => Identifier::CLUSTER_LIST,
            PathAttribute::MP_REACH_NLRI(_) => Identifier::MP_REACH_NLRI,
            PathAttribute::MP_UNREACH_NLRI(_) => Identifier::MP_UNREACH_NLRI,
            PathAttribute::EXTENDED_COMMUNITIES(_) => Identifier::EXTENDED_COMMUNITIES,
            PathAttribute::AS4_PATH(_) => Identifier::AS4_PATH,
            PathAttribute::AS4_AGGREGATOR(_) => Identifier::AS4_AGGREGATOR,
            PathAttribute::AS_PATHLIMIT(_) => Identifier::AS_PATHLIMIT,
            PathAttribute::IPV6_EXTENDED_COMMUNITIES(_) => Identifier::IPV6_EXTENDED_COMMUNITIES,
            PathAttribute::BGP_LS(_) => Identifier::BGP_LS,
            PathAttribute::LARGE_COMMUNITIES(_) => Identifier::LARGE_COMMUNITIES,
            PathAttribute::Unknown { .. } => return None,
            PathAttribute::Malformed { .. } => return None,
        })
    }
}

fn decode_value(
    code: u8,
    mut cur: ParseCursor,
    opts: &DecoderOptions,
) -> Result<PathAttribute, Error> {
    match code {
        1 => Ok(PathAttribute::ORIGIN(Origin::parse(&mut cur)?)),
        2 => Ok(PathAttribute::AS_PATH(ASPath::parse(cur, opts.asn_4_byte)?)),
        3 => {
            if cur.remaining() != 4 {
                return Err(Error::invalid(format!(
                    "NEXT_HOP has invalid length {}",
                    cur.remaining()
                )));
            }
            Ok(PathAttribute::NEXT_HOP(IpAddr::V4(Ipv4Addr::from(
                cur.read_u32()?,
            ))))
        }
        4 => Ok(PathAttribute::MULTI_EXIT_DISC(cur.read_u32()?)),
        5 => Ok(PathAttribute::LOCAL_PREF(cur.read_u32()?)),
        6 => {
            if !cur.is_empty() {
                return Err(Error::invalid("ATOMIC_AGGREGATE must carry no data"));
            }
            Ok(PathAttribute::ATOMIC_AGGREGATE)
        }
        7 => {
            let asn = match cur.remaining() {
                6 => u32::from(cur.read_u16()?),
                8 => cur.read_u32()?,
                n => return Err(Error::invalid(format!("AGGREGATOR has invalid length {}", n))),
            };
            let speaker = Ipv4Addr::from(cur.read_u32()?);
            Ok(PathAttribute::AGGREGATOR((asn, speaker)))
        }
        8 => Ok(PathAttribute::COMMUNITIES(read_u32_list(
            &mut cur,
            "COMMUNITIES",
        )?)),
        9 => Ok(PathAttribute::ORIGINATOR_ID(cur.read_u32()?)),
        10 => Ok(PathAttribute::CLUSTER_LIST(read_u32_list(
            &mut cur,
            "CLUSTER_LIST",
        )?)),
        14 => Ok(PathAttribute::MP_REACH_NLRI(MPReachNLRI::parse(cur)?)),
        15 => Ok(PathAttribute::MP_UNREACH_NLRI(MPUnreachNLRI::parse(cur)?)),
        16 => {
            if cur.remaining() % 8 != 0 {
                return Err(Error::invalid(
                    "EXTENDED_COMMUNITIES length is not a multiple of 8",
                ));
            }
            let mut communities = Vec::with_capacity(cur.remaining() / 8);
            while !cur.is_empty() {
                communities.push(ExtendedCommunity::parse(&mut cur)?);
            }
            Ok(PathAttribute::EXTENDED_COMMUNITIES(communities))
        }
        17 => Ok(PathAttribute::AS4_PATH(ASPath::parse(cur, true)?)),
        18 => {
            if cur.remaining() != 8 {
                return Err(Error::invalid("AS4_AGGREGATOR must be 8 bytes"));
            }
            let asn = cur.read_u32()?;
            let speaker = Ipv4Addr::from(cur.read_u32()?);
            Ok(PathAttribute::AS4_AGGREGATOR((asn, speaker)))
        }
        21 => {
            if cur.remaining() != 5 {
                return Err(Error::invalid("AS_PATHLIMIT must be 5 bytes"));
            }
            let limit = cur.read_u8()?;
            let asn = cur.read_u32()?;
            Ok(PathAttribute::AS_PATHLIMIT((limit, asn)))
        }
        25 => {
            if cur.remaining() % 20 != 0 {
                return Err(Error::invalid(
                    "IPV6_EXTENDED_COMMUNITIES length is not a multiple of 20",
                ));
            }
            let mut communities = Vec::with_capacity(cur.remaining() / 20);
            while !cur.is_empty() {
                communities.push(Ipv6ExtendedCommunity::parse(&mut cur)?);
            }
            Ok(PathAttribute::IPV6_EXTENDED_COMMUNITIES(communities))
        }
        29 => Ok(PathAttribute::BGP_LS(cur.rest().to_vec())),
        32 => {
            if cur.remaining() % 12 != 0 {
                return Err(Error::invalid(
                    "LARGE_COMMUNITIES length is not a multiple of 12",
                ));
            }
            let mut communities = Vec::with_capacity(cur.remaining() / 12);
            while !cur.is_empty() {
                communities.push(LargeCommunity {
                    global_admin: cur.read_u32()?,
                    local_data_1: cur.read_u32()?,
                    local_data_2: cur.read_u32()?,
                });
            }
            Ok(PathAttribute::LARGE_COMMUNITIES(communities))
        }
        c => Err(Error::not_implemented(format!(
            "path attribute type {} is not supported",
            c
        ))),
    }
}

fn read_u32_list(cur: &mut ParseCursor, name: &str) -> Result<Vec<u32>, Error> {
    if cur.remaining() % 4 != 0 {
        return Err(Error::invalid(format!(
            "{} length is not a multiple of 4",
            name
        )));
    }
    let mut values = Vec::with_capacity(cur.remaining() / 4);
    while !cur.is_empty() {
        values.push(cur.read_u32()?);
    }
    Ok(values)
}

/// Indicates how a route was generated, per the ORIGIN attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Generated by an Interior Gateway Protocol.
    IGP,
    /// Generated by an Exterior Gateway Protocol.
    EGP,
    /// The origin is unknown.
    INCOMPLETE,
}

impl Origin {
    fn parse(cur: &mut ParseCursor) -> Result<Origin, Error> {
        match cur.read_u8()? {
            0 => Ok(Origin::IGP),
            1 => Ok(Origin::EGP),
            2 => Ok(Origin::INCOMPLETE),
            v => Err(Error::invalid(format!("unknown ORIGIN value {}", v))),
        }
    }
}

/// The path a route has traveled, as a sequence of AS segments.
#[derive(Debug, Clone, Default)]
pub struct ASPath {
    /// The segments that together make up the path.
    pub segments: Vec<Segment>,
}

impl ASPath {
    fn parse(mut cur: ParseCursor, four_byte: bool) -> Result<ASPath, Error> {
        let mut segments = Vec::with_capacity(1);
        while !cur.is_empty() {
            let segment_type = cur.read_u8()?;
            let segment_length = cur.read_u8()?;
            let mut asns = Vec::with_capacity(usize::from(segment_length));
            for _ in 0..segment_length {
                asns.push(if four_byte {
                    cur.read_u32()?
                } else {
                    u32::from(cur.read_u16()?)
                });
            }
            segments.push(match segment_type {
                1 => Segment::AS_SET(asns),
                2 => Segment::AS_SEQUENCE(asns),
                3 => Segment::AS_CONFED_SEQUENCE(asns),
                4 => Segment::AS_CONFED_SET(asns),
                t => {
                    return Err(Error::invalid(format!(
                        "unknown AS_PATH segment type {}",
                        t
                    )))
                }
            });
        }
        Ok(ASPath { segments })
    }

    /// The AS that originated the route: the last ASN of the final
    /// AS_SEQUENCE segment. `None` if the path is empty or ends in a set.
    pub fn origin(&self) -> Option<u32> {
        match self.segments.last()? {
            Segment::AS_SEQUENCE(asns) | Segment::AS_CONFED_SEQUENCE(asns) => {
                asns.last().copied()
            }
            Segment::AS_SET(_) | Segment::AS_CONFED_SET(_) => None,
        }
    }

    /// The path flattened into a single ASN sequence. `None` if any segment
    /// is a set, since sets have no defined order.
    pub fn sequence(&self) -> Option<Vec<u32>> {
        let mut out = Vec::with_capacity(8);
        for segment in &self.segments {
            match segment {
                Segment::AS_SEQUENCE(asns) | Segment::AS_CONFED_SEQUENCE(asns) => {
                    out.extend(asns)
                }
                Segment::AS_SET(_) | Segment::AS_CONFED_SET(_) => return None,
            }
        }
        Some(out)
    }

    /// The count RFC4271 §9.1.2.2 and RFC5065 §5.3 assign an AS_PATH for
    /// path-length comparison: each AS_SEQUENCE/AS_CONFED_SEQUENCE
    /// contributes its length, each AS_SET/AS_CONFED_SET contributes one
    /// (regardless of its member count), and confederation segments
    /// contribute nothing at all.
    pub fn asns_cnt(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::AS_SEQUENCE(asns) => asns.len(),
                Segment::AS_SET(_) => 1,
                Segment::AS_CONFED_SEQUENCE(_) | Segment::AS_CONFED_SET(_) => 0,
            })
            .sum()
    }
}

/// A single segment of an AS_PATH/AS4_PATH attribute.
#[derive(Debug, Clone)]
#[allow(non_camel_case_types)]
pub enum Segment {
    /// An ordered sequence of ASNs the route traversed.
    AS_SEQUENCE(Vec<u32>),
    /// An unordered set of ASNs, produced by route aggregation.
    AS_SET(Vec<u32>),
    /// An ordered sequence of member-AS numbers within a confederation
    /// ([RFC 5065]).
    ///
    /// [RFC 5065]: http://www.iana.org/go/rfc5065
    AS_CONFED_SEQUENCE(Vec<u32>),
    /// An unordered set of member-AS numbers within a confederation
    /// ([RFC 5065]).
    ///
    /// [RFC 5065]: http://www.iana.org/go/rfc5065
    AS_CONFED_SET(Vec<u32>),
}

/// Multiprotocol reachability information ([RFC 4760]): the next hop and
/// routes being announced for an address family other than plain IPv4
/// unicast.
///
/// [RFC 4760]: http://www.iana.org/go/rfc4760
#[derive(Debug, Clone)]
pub struct MPReachNLRI {
    /// Address family of the announced routes.
    pub afi: AFI,
    /// Subsequent address family of the announced routes.
    pub safi: SAFI,
    /// Next-hop address, in whatever encoding the AFI/SAFI pair specifies
    /// (may be a single address or, for IPv6 with a link-local next hop, two
    /// addresses back to back).
    pub next_hop: Vec<u8>,
    /// The routes being announced.
    pub announced_routes: Vec<NLRIEncoding>,
}

impl MPReachNLRI {
    fn parse(mut cur: ParseCursor) -> Result<MPReachNLRI, Error> {
        let afi = AFI::try_from(cur.read_u16()?)?;
        let safi = SAFI::try_from(cur.read_u8()?)?;
        let next_hop_len = usize::from(cur.read_u8()?);
        let next_hop = cur.read_bytes(next_hop_len)?.to_vec();
        let _reserved = cur.read_u8()?;
        let announced_routes = parse_nlri_list(cur, afi, safi)?;
        Ok(MPReachNLRI {
            afi,
            safi,
            next_hop,
            announced_routes,
        })
    }
}

/// Multiprotocol unreachability information ([RFC 4760]): routes withdrawn
/// for an address family other than plain IPv4 unicast.
///
/// [RFC 4760]: http://www.iana.org/go/rfc4760
#[derive(Debug, Clone)]
pub struct MPUnreachNLRI {
    /// Address family of the withdrawn routes.
    pub afi: AFI,
    /// Subsequent address family of the withdrawn routes.
    pub safi: SAFI,
    /// The routes being withdrawn.
    pub withdrawn_routes: Vec<NLRIEncoding>,
}

impl MPUnreachNLRI {
    fn parse(mut cur: ParseCursor) -> Result<MPUnreachNLRI, Error> {
        let afi = AFI::try_from(cur.read_u16()?)?;
        let safi = SAFI::try_from(cur.read_u8()?)?;
        let withdrawn_routes = parse_nlri_list(cur, afi, safi)?;
        Ok(MPUnreachNLRI {
            afi,
            safi,
            withdrawn_routes,
        })
    }
}

/// A single extended community ([RFC 4360]), an 8-byte tagged value.
///
/// [RFC 4360]: http://www.iana.org/go/rfc4360
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedCommunity {
    /// Type 0x00/0x40: a 2-byte ASN and a 4-byte local value.
    TwoOctetAs {
        /// Whether the transitive bit was set.
        transitive: bool,
        /// Sub-type byte.
        subtype: u8,
        /// The global administrator ASN.
        global_admin: u16,
        /// The locally assigned value.
        local_admin: u32,
    },
    /// Type 0x01/0x41: an IPv4 address and a 2-byte local value.
    Ipv4 {
        /// Whether the transitive bit was set.
        transitive: bool,
        /// Sub-type byte.
        subtype: u8,
        /// The global administrator address.
        global_admin: Ipv4Addr,
        /// The locally assigned value.
        local_admin: u16,
    },
    /// Type 0x02/0x42: a 4-byte ASN and a 2-byte local value.
    FourOctetAs {
        /// Whether the transitive bit was set.
        transitive: bool,
        /// Sub-type byte.
        subtype: u8,
        /// The global administrator ASN.
        global_admin: u32,
        /// The locally assigned value.
        local_admin: u16,
    },
    /// Type 0x03/0x43: a 6-byte opaque value with no administrator split.
    Opaque {
        /// Whether the transitive bit was set.
        transitive: bool,
        /// Sub-type byte.
        subtype: u8,
        /// The raw 6-byte value.
        value: [u8; 6],
    },
    /// Any other type byte: kept as the raw sub-type and 6-byte value.
    Unknown {
        /// The raw type byte, including the transitive bit.
        type_byte: u8,
        /// Sub-type byte.
        subtype: u8,
        /// The raw 6-byte value.
        value: [u8; 6],
    },
}

impl ExtendedCommunity {
    fn parse(cur: &mut ParseCursor) -> Result<ExtendedCommunity, Error> {
        let type_byte = cur.read_u8()?;
        let subtype = cur.read_u8()?;
        let transitive = type_byte & 0x40 == 0;
        match type_byte & !0x40 {
            0x00 => Ok(ExtendedCommunity::TwoOctetAs {
                transitive,
                subtype,
                global_admin: cur.read_u16()?,
                local_admin: cur.read_u32()?,
            }),
            0x01 => Ok(ExtendedCommunity::Ipv4 {
                transitive,
                subtype,
                global_admin: Ipv4Addr::from(cur.read_u32()?),
                local_admin: cur.read_u16()?,
            }),
            0x02 => Ok(ExtendedCommunity::FourOctetAs {
                transitive,
                subtype,
                global_admin: cur.read_u32()?,
                local_admin: cur.read_u16()?,
            }),
            0x03 => {
                let mut value = [0u8; 6];
                value.copy_from_slice(cur.read_bytes(6)?);
                Ok(ExtendedCommunity::Opaque {
                    transitive,
                    subtype,
                    value,
                })
            }
            _ => {
                let mut value = [0u8; 6];
                value.copy_from_slice(cur.read_bytes(6)?);
                Ok(ExtendedCommunity::Unknown {
                    type_byte,
                    subtype,
                    value,
                })
            }
        }
    }
}

/// An IPv6-specific extended community ([RFC 5701]): a 20-byte tagged value
/// whose global administrator is an IPv6 address.
///
/// [RFC 5701]: http://www.iana.org/go/rfc5701
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6ExtendedCommunity {
    /// Whether the transitive bit was set.
    pub transitive: bool,
    /// Sub-type byte.
    pub subtype: u8,
    /// The global administrator address.
    pub global_admin: Ipv6Addr,
    /// The locally assigned value.
    pub local_admin: u16,
}

impl Ipv6ExtendedCommunity {
    fn parse(cur: &mut ParseCursor) -> Result<Ipv6ExtendedCommunity, Error> {
        let type_byte = cur.read_u8()?;
        let subtype = cur.read_u8()?;
        let transitive = type_byte & 0x40 == 0;
        let global_admin = Ipv6Addr::from(cur.read_u128()?);
        let local_admin = cur.read_u16()?;
        Ok(Ipv6ExtendedCommunity {
            transitive,
            subtype,
            global_admin,
            local_admin,
        })
    }
}

/// A single large community ([RFC 8092]): three 4-byte values.
///
/// [RFC 8092]: http://www.iana.org/go/rfc8092
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LargeCommunity {
    /// The administrator ASN.
    pub global_admin: u32,
    /// First locally assigned value.
    pub local_data_1: u32,
    /// Second locally assigned value.
    pub local_data_2: u32,
}

/// The set of path attributes carried by an UPDATE message.
///
/// Backed by a 256-entry sparse table indexed directly by attribute type
/// code, alongside the ordered list of codes actually present, so lookup by
/// [`Identifier`] is O(1) and iteration in wire order is O(k) in the number
/// of attributes rather than O(256).
#[derive(Debug, Clone)]
pub struct PathAttributes {
    slots: Vec<Option<PathAttribute>>,
    raw: Vec<Option<Vec<u8>>>,
    order: Vec<u8>,
}

impl Default for PathAttributes {
    fn default() -> Self {
        PathAttributes {
            slots: vec![None; 256],
            raw: vec![None; 256],
            order: Vec::new(),
        }
    }
}

impl PathAttributes {
    pub(crate) fn parse(
        mut cur: ParseCursor,
        opts: &DecoderOptions,
    ) -> Result<PathAttributes, Error> {
        let mut attrs = PathAttributes::default();

        while !cur.is_empty() {
            let flags = cur.read_u8().map_err(crate::error::remap_framed)?;
            let code = cur.read_u8().map_err(crate::error::remap_framed)?;
            let length = if flags & FLAG_EXTENDED_LENGTH == 0 {
                usize::from(cur.read_u8().map_err(crate::error::remap_framed)?)
            } else {
                usize::from(cur.read_u16().map_err(crate::error::remap_framed)?)
            };
            let value_cur = cur.take(length).map_err(crate::error::remap_framed)?;

            if !opts.attr_allowed(code) {
                continue;
            }

            if attrs.slots[usize::from(code)].is_some() {
                if opts.ignore_invalid {
                    log::warn!(
                        "duplicate path attribute type {} suppressed by ignore_invalid",
                        code
                    );
                    attrs.slots[usize::from(code)] = Some(PathAttribute::Malformed {
                        code,
                        raw: value_cur.rest().to_vec(),
                    });
                    continue;
                }
                return Err(Error::invalid(format!(
                    "duplicate path attribute type {}",
                    code
                )));
            }

            let raw_bytes = value_cur.rest();
            let parsed = match decode_value(code, value_cur, opts).map_err(crate::error::remap_framed) {
                Ok(value) => value,
                Err(Error::NotImplemented(_)) if opts.ignore_not_implemented => {
                    PathAttribute::Unknown {
                        code,
                        raw: raw_bytes.to_vec(),
                    }
                }
                Err(Error::InvalidMsg(_)) if opts.ignore_invalid => {
                    log::warn!(
                        "path attribute type {} failed to decode, suppressed by ignore_invalid",
                        code
                    );
                    PathAttribute::Malformed {
                        code,
                        raw: raw_bytes.to_vec(),
                    }
                }
                Err(e) => return Err(e),
            };

            if opts.path_attr_raw_enabled {
                attrs.raw[usize::from(code)] = Some(raw_bytes.to_vec());
            }
            attrs.slots[usize::from(code)] = Some(parsed);
            attrs.order.push(code);
        }

        Ok(attrs)
    }

    /// Retrieves the attribute with the given identifier, if present.
    pub fn get(&self, identifier: Identifier) -> Option<&PathAttribute> {
        self.slots[identifier as usize].as_ref()
    }

    /// Retrieves the attribute with the given raw type code, known or not.
    pub fn get_code(&self, code: u8) -> Option<&PathAttribute> {
        self.slots[usize::from(code)].as_ref()
    }

    /// The raw, unparsed value for `identifier`, if
    /// [`DecoderOptions::path_attr_raw_enabled`] was set and the attribute
    /// was present.
    pub fn raw(&self, identifier: Identifier) -> Option<&[u8]> {
        self.raw[identifier as usize].as_deref()
    }

    /// Iterates over the attributes present, in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &PathAttribute> {
        self.order
            .iter()
            .map(move |&code| self.slots[usize::from(code)].as_ref().unwrap())
    }

    /// The number of attributes present.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if no attributes are present.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
