use anchor_lang::prelude::*;

use crate::errors::TierReportError;
use crate::report::{TierReport, NEVER};

/// PDA that stores an account's tier history.
/// Seeds: [b"tier_report", owner_pubkey]
#[account]
#[derive(InitSpace)]
pub struct TierRecord {
    /// The wallet whose tiers this record tracks
    pub owner: Pubkey,

    /// Packed "first reached at" timestamps for tiers 1-8
    pub report: TierReport,

    /// Unix timestamp of the last tier change
    pub updated_at: i64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl TierRecord {
    /// Claim a freshly allocated record. Zeroed account bytes would decode
    /// as every tier held since 0, so the report starts from `NEVER`.
    pub fn init_if_fresh(&mut self, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.owner = owner;
            self.report = TierReport::NEVER;
            self.bump = bump;
        }
    }

    /// Move the record to `end_tier` as of `now`, returning the tier held
    /// before the change.
    pub fn set_tier(&mut self, end_tier: u8, now: i64) -> Result<u8> {
        let timestamp = u32::try_from(now).map_err(|_| TierReportError::TimestampOutOfRange)?;
        require!(timestamp != NEVER, TierReportError::TimestampOutOfRange);

        let start_tier = self.report.tier_at_time(u64::from(timestamp));
        self.report = self
            .report
            .update_report_with_tier_at_time(start_tier, end_tier, timestamp)?;
        self.updated_at = now;
        Ok(start_tier)
    }
}
