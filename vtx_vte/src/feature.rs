use bitflags::bitflags;

bitflags! {
    /// Optional behaviors negotiated between the host application and the
    /// terminal, gating parts of escape payload encode/decode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Feature: u8 {
        const SYNCHRONIZED_OUTPUT  = 1 << 0;
        const CLIPBOARD            = 1 << 1;
        const UNDERCURL            = 1 << 2;
        const TEXT_SIZING_WIDTH    = 1 << 3;
        const TEXT_SIZING_FULL     = 1 << 4;
    }
}
