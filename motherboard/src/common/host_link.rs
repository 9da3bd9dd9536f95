/// Host communication channel.
///
/// The core only configures the link during board reset; framing and
/// protocol belong to the host-communication layer above it.
pub trait HostLink {
    fn enable(&mut self, enabled: bool);

    /// Drop any in-flight link state.
    fn reset(&mut self);

    /// Discard pending inbound bytes.
    fn reset_rx(&mut self);

    /// Discard pending outbound bytes.
    fn reset_tx(&mut self);
}
