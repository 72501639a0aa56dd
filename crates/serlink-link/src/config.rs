/// Controls link-layer behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkConfig {
    /// When true, receivers accept datagrams without checksum verification.
    ///
    /// The wire format carries no checksum field and no verification is
    /// implemented anywhere in the codec; the flag is declared for
    /// compatibility with peers that expect it and is not consulted on the
    /// encode or decode path.
    pub ignore_checksum: bool,
}
