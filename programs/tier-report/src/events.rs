use anchor_lang::prelude::*;

/// Emitted by `set_tier`, including when the tier is unchanged.
#[event]
pub struct TierChange {
    pub sender: Pubkey,
    pub account: Pubkey,
    pub start_tier: u8,
    pub end_tier: u8,
    pub data: Vec<u8>,
}

#[event]
pub struct ReportClosed {
    pub account: Pubkey,
}
