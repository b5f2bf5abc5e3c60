//! BGP OPEN messages: protocol negotiation parameters and capabilities.

use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;

use crate::{Error, ParseCursor, AFI, SAFI};

/// A BGP OPEN message.
#[derive(Clone, Debug)]
pub struct Open {
    /// BGP protocol version. Always 4 on the modern Internet.
    pub version: u8,
    /// The sender's AS number, truncated to 16 bits (use the
    /// [`OpenCapability::FourByteASN`] capability for the real value when
    /// the sender speaks 4-byte ASNs).
    pub peer_asn: u16,
    /// Proposed Hold Timer value, in seconds.
    pub hold_timer: u16,
    /// The sender's BGP Identifier.
    pub identifier: u32,
    /// Optional parameters, most commonly a single
    /// [`OpenParameter::Capabilities`].
    pub parameters: Vec<OpenParameter>,
}

impl Open {
    pub(crate) fn parse(mut cur: ParseCursor) -> Result<Open, Error> {
        let version = cur.read_u8()?;
        let peer_asn = cur.read_u16()?;
        let hold_timer = cur.read_u16()?;
        let identifier = cur.read_u32()?;
        let params_len = usize::from(cur.read_u8()?);
        let mut params_cur = cur.take(params_len).map_err(crate::error::remap_framed)?;

        let mut parameters = Vec::with_capacity(2);
        while !params_cur.is_empty() {
            parameters.push(OpenParameter::parse(&mut params_cur)?);
        }

        Ok(Open {
            version,
            peer_asn,
            hold_timer,
            identifier,
            parameters,
        })
    }
}

/// The direction an ADD-PATH capability grants extra paths in.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum AddPathDirection {
    /// The peer can receive additional paths.
    ReceivePaths = 1,
    /// The peer can send additional paths.
    SendPaths = 2,
    /// The peer can both send and receive additional paths.
    SendReceivePaths = 3,
}

impl TryFrom<u8> for AddPathDirection {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AddPathDirection::ReceivePaths),
            2 => Ok(AddPathDirection::SendPaths),
            3 => Ok(AddPathDirection::SendReceivePaths),
            v => Err(Error::invalid(format!(
                "{} is not a valid ADD-PATH direction",
                v
            ))),
        }
    }
}

/// A single capability advertised inside an [`OpenParameter::Capabilities`].
#[derive(Clone, Debug)]
pub enum OpenCapability {
    /// Code 1: multiprotocol support for an AFI/SAFI pair ([RFC 2858]).
    ///
    /// [RFC 2858]: http://www.iana.org/go/rfc2858
    MultiProtocol((AFI, SAFI)),
    /// Code 2: route refresh support ([RFC 2918]).
    ///
    /// [RFC 2918]: http://www.iana.org/go/rfc2918
    RouteRefresh,
    /// Code 65: 4-byte ASN support, carrying the sender's real ASN
    /// ([RFC 6793]).
    ///
    /// [RFC 6793]: http://www.iana.org/go/rfc6793
    FourByteASN(u32),
    /// Code 69: ADD-PATH support, per AFI/SAFI/direction ([RFC 7911]).
    ///
    /// [RFC 7911]: http://www.iana.org/go/rfc7911
    AddPath(Vec<(AFI, SAFI, AddPathDirection)>),
    /// Any other capability code, kept as its raw value.
    Unknown {
        /// The capability code.
        code: u8,
        /// The raw capability value.
        value: Vec<u8>,
    },
}

impl OpenCapability {
    fn parse(cur: &mut ParseCursor) -> Result<(usize, OpenCapability), Error> {
        let code = cur.read_u8()?;
        let length = usize::from(cur.read_u8()?);
        let mut value_cur = cur.take(length).map_err(crate::error::remap_framed)?;

        let capability = match code {
            1 => {
                if length != 4 {
                    return Err(Error::invalid(
                        "MultiProtocol capability must be 4 bytes",
                    ));
                }
                let afi = AFI::try_from(value_cur.read_u16()?)?;
                let _reserved = value_cur.read_u8()?;
                let safi = SAFI::try_from(value_cur.read_u8()?)?;
                OpenCapability::MultiProtocol((afi, safi))
            }
            2 => {
                if length != 0 {
                    return Err(Error::invalid("RouteRefresh capability must be 0 bytes"));
                }
                OpenCapability::RouteRefresh
            }
            65 => {
                if length != 4 {
                    return Err(Error::invalid("FourByteASN capability must be 4 bytes"));
                }
                OpenCapability::FourByteASN(value_cur.read_u32()?)
            }
            69 => {
                if length % 4 != 0 {
                    return Err(Error::invalid(
                        "AddPath capability length must be a multiple of 4",
                    ));
                }
                let mut paths = Vec::with_capacity(length / 4);
                while !value_cur.is_empty() {
                    let afi = AFI::try_from(value_cur.read_u16()?)?;
                    let safi = SAFI::try_from(value_cur.read_u8()?)?;
                    let direction = AddPathDirection::try_from(value_cur.read_u8()?)?;
                    paths.push((afi, safi, direction));
                }
                OpenCapability::AddPath(paths)
            }
            c => OpenCapability::Unknown {
                code: c,
                value: value_cur.rest().to_vec(),
            },
        };

        Ok((2 + length, capability))
    }
}

/// A single optional parameter in an OPEN message.
#[derive(Clone, Debug)]
pub enum OpenParameter {
    /// Parameter type 2: a list of negotiated capabilities.
    Capabilities(Vec<OpenCapability>),
    /// Any other parameter type, kept as its raw value.
    Unknown {
        /// The parameter type.
        param_type: u8,
        /// The raw parameter value.
        value: Vec<u8>,
    },
}

impl OpenParameter {
    fn parse(cur: &mut ParseCursor) -> Result<OpenParameter, Error> {
        let param_type = cur.read_u8()?;
        let param_length = usize::from(cur.read_u8()?);
        let mut value_cur = cur.take(param_length).map_err(crate::error::remap_framed)?;

        if param_type == 2 {
            let mut capabilities = Vec::with_capacity(param_length / 2);
            let mut consumed = 0;
            while !value_cur.is_empty() {
                let (cap_len, capability) = OpenCapability::parse(&mut value_cur)?;
                capabilities.push(capability);
                consumed += cap_len;
            }
            if consumed != param_length {
                return Err(Error::invalid(
                    "capability lengths do not sum to the parameter length",
                ));
            }
            Ok(OpenParameter::Capabilities(capabilities))
        } else {
            Ok(OpenParameter::Unknown {
                param_type,
                value: value_cur.rest().to_vec(),
            })
        }
    }
}

/// The capability set a peer advertised in its OPEN message, collapsed from
/// the parameter list into a convenient lookup structure.
///
/// This is purely a summary of one OPEN message -- it performs no
/// negotiation against a peer's own capabilities, since this crate tracks no
/// session state.
#[allow(non_snake_case)]
#[derive(Clone, Debug, Default)]
pub struct Capabilities {
    /// AFI/SAFI pairs advertised via [`OpenCapability::MultiProtocol`].
    pub MP_BGP_SUPPORT: HashSet<(AFI, SAFI)>,
    /// Whether [`OpenCapability::RouteRefresh`] was advertised.
    pub ROUTE_REFRESH_SUPPORT: bool,
    /// Whether [`OpenCapability::FourByteASN`] was advertised, and the ASN
    /// it carried.
    pub FOUR_OCTET_ASN_SUPPORT: Option<u32>,
    /// ADD-PATH direction advertised per AFI/SAFI pair.
    pub ADD_PATH_SUPPORT: HashMap<(AFI, SAFI), AddPathDirection>,
}

impl Capabilities {
    /// Collapses an OPEN message's parameter list into a `Capabilities`
    /// summary. Parameters other than `Capabilities` are ignored.
    pub fn from_parameters(parameters: &[OpenParameter]) -> Self {
        let mut capabilities = Capabilities::default();

        for parameter in parameters {
            if let OpenParameter::Capabilities(caps) = parameter {
                for capability in caps {
                    match capability {
                        OpenCapability::MultiProtocol(family) => {
                            capabilities.MP_BGP_SUPPORT.insert(*family);
                        }
                        OpenCapability::RouteRefresh => {
                            capabilities.ROUTE_REFRESH_SUPPORT = true;
                        }
                        OpenCapability::FourByteASN(asn) => {
                            capabilities.FOUR_OCTET_ASN_SUPPORT = Some(*asn);
                        }
                        OpenCapability::AddPath(paths) => {
                            for (afi, safi, direction) in paths {
                                capabilities.ADD_PATH_SUPPORT.insert((*afi, *safi), *direction);
                            }
                        }
                        OpenCapability::Unknown { .. } => (),
                    }
                }
            }
        }

        capabilities
    }
}
