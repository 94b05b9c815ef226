use anchor_lang::prelude::*;

#[error_code]
pub enum TierReportError {
    #[msg("Tier is out of range: the maximum tier is 8")]
    TierOutOfRange,

    #[msg("Clock timestamp does not fit a 32-bit tier field")]
    TimestampOutOfRange,
}
