/// Default limit for the nesting of constructed elements.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings of a `BerDecoder`.
///
/// #### Example
/// ```rust
/// # use asnber_transcoder::ber::DecoderOptions;
/// let options = DecoderOptions::der().collect_bytes(true).max_depth(16);
/// assert!(options.strict_der);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Copy every consumed byte into a buffer returned alongside the tree.
    pub collect_bytes: bool,
    /// Replace a context-specific `[0]` wrapper by the element it wraps
    /// when no type mapper has been registered.
    pub unwrap_context_zero: bool,
    /// Read INTEGER contents as unsigned magnitudes instead of two's complement.
    pub unsigned_integers: bool,
    /// Reject encodings that are valid BER but not DER: indefinite and
    /// non-minimal lengths, non-minimal integers, BOOLEAN contents other
    /// than 0x00/0xFF, constructed strings, nonzero BIT STRING padding,
    /// unsorted SET members and EXPLICIT wrappers around a different tag.
    pub strict_der: bool,
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            collect_bytes: false,
            unwrap_context_zero: false,
            unsigned_integers: false,
            strict_der: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderOptions {
    pub fn der() -> Self {
        DecoderOptions {
            strict_der: true,
            ..Default::default()
        }
    }

    pub fn collect_bytes(mut self, collect_bytes: bool) -> Self {
        self.collect_bytes = collect_bytes;
        self
    }

    pub fn unwrap_context_zero(mut self, unwrap_context_zero: bool) -> Self {
        self.unwrap_context_zero = unwrap_context_zero;
        self
    }

    pub fn unsigned_integers(mut self, unsigned_integers: bool) -> Self {
        self.unsigned_integers = unsigned_integers;
        self
    }

    pub fn strict_der(mut self, strict_der: bool) -> Self {
        self.strict_der = strict_der;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
