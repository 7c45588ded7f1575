/// Session-wide settings, owned by the [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftOptions {
    /// Escape `~` and `/` inside keys when building patch paths.
    ///
    /// Off by default: keys are concatenated verbatim, so callers must not
    /// use keys containing `/` or `~` unless this is on.
    pub escape_segments: bool,
    /// Prefix of minted reference ids (`"{prefix}:{n}"`).
    pub id_prefix: String,
}

impl Default for DraftOptions {
    fn default() -> Self {
        Self {
            escape_segments: false,
            id_prefix: "ref".to_string(),
        }
    }
}
