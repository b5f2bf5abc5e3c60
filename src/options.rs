//! Decoder-wide configuration, immutable for the duration of a single call.

/// Controls how `decode`/`decode_ext` interpret a BGP message.
///
/// A `DecoderOptions` is read-only for the duration of a call and may be
/// shared freely across concurrent calls on different threads -- there is no
/// per-option runtime registration, just a plain configuration record.
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// If set, the 16-byte marker at the start of the BGP header is skipped
    /// rather than read. Used when the transport already guarantees framing
    /// (e.g. some BMP encapsulations never send a marker).
    pub marker_omitted: bool,

    /// If set, the marker (when present) is copied into
    /// [`crate::Header::marker`]. Otherwise it is skipped without being
    /// stored.
    pub marker_copy: bool,

    /// Default ASN width used for AS_PATH when no narrower context is
    /// available. `AS4_PATH` is always decoded with 4-byte ASNs regardless
    /// of this setting.
    pub asn_4_byte: bool,

    /// Retain the raw attribute body alongside its parsed form for every
    /// recognized path attribute.
    pub path_attr_raw_enabled: bool,

    /// If set, only the attribute types marked `true` in `filter` are
    /// parsed; the rest are skipped (their bytes consumed but discarded).
    pub path_attr_filter_enabled: bool,

    /// Attribute-type allow-list consulted when `path_attr_filter_enabled`
    /// is set. Indexed by attribute type code.
    pub filter: [bool; 256],

    /// Unknown or unimplemented attribute types and address families
    /// produce `Ok` with a raw/opaque payload instead of
    /// [`crate::Error::NotImplemented`].
    pub ignore_not_implemented: bool,

    /// Convert a structural [`crate::Error::InvalidMsg`] into a best-effort
    /// `Ok` with the offending element replaced by a sentinel, instead of
    /// aborting the whole decode. Intended for scanning large corpora of
    /// wire captures where a handful of malformed messages should not stop
    /// the run.
    pub ignore_invalid: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            marker_omitted: false,
            marker_copy: false,
            asn_4_byte: true,
            path_attr_raw_enabled: false,
            path_attr_filter_enabled: false,
            filter: [false; 256],
            ignore_not_implemented: false,
            ignore_invalid: false,
        }
    }
}

impl DecoderOptions {
    /// Returns whether the given path-attribute type code should be parsed,
    /// per `path_attr_filter_enabled`/`filter`.
    pub(crate) fn attr_allowed(&self, code: u8) -> bool {
        !self.path_attr_filter_enabled || self.filter[code as usize]
    }
}
