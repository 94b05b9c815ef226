use anchor_lang::prelude::*;

use crate::report::TierReport;
use crate::state::TierRecord;

/// Discriminator a program advertises through `supports_interface` when it
/// answers `report` and `report_time_for_tier` with packed tier reports.
pub const TIER_V2_INTERFACE_ID: [u8; 8] = *b"tier:v2\0";

/// Source of per-account tier reports.
///
/// `context` is caller-supplied auxiliary data whose meaning is up to the
/// provider; providers that don't need it ignore it.
pub trait TierProvider {
    fn report(&self, account: &Pubkey, context: &[[u8; 32]]) -> TierReport;

    fn report_time_for_tier(&self, account: &Pubkey, tier: u8, context: &[[u8; 32]]) -> Result<u32> {
        self.report(account, context).report_time_for_tier(tier)
    }

    fn tier_at_time(&self, account: &Pubkey, timestamp: u64, context: &[[u8; 32]]) -> u8 {
        self.report(account, context).tier_at_time(timestamp)
    }
}

/// Provider backed by the record passed with the instruction, if any.
pub struct RecordedTiers<'a> {
    record: Option<&'a TierRecord>,
}

impl<'a> RecordedTiers<'a> {
    pub fn new(record: Option<&'a TierRecord>) -> Self {
        Self { record }
    }
}

impl TierProvider for RecordedTiers<'_> {
    fn report(&self, account: &Pubkey, _context: &[[u8; 32]]) -> TierReport {
        match self.record {
            Some(record) if record.owner == *account => record.report,
            _ => TierReport::NEVER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{NEVER, TIER_ONE, TIER_TWO, TIER_ZERO};

    fn record(owner: Pubkey) -> TierRecord {
        TierRecord {
            owner,
            report: TierReport::NEVER
                .update_report_with_tier_at_time(TIER_ZERO, TIER_TWO, 50)
                .unwrap(),
            updated_at: 50,
            bump: 255,
        }
    }

    #[test]
    fn missing_record_reports_never() {
        let provider = RecordedTiers::new(None);
        let account = Pubkey::new_unique();
        assert_eq!(provider.report(&account, &[]), TierReport::NEVER);
        assert_eq!(provider.tier_at_time(&account, 1_000, &[]), TIER_ZERO);
        assert_eq!(provider.report_time_for_tier(&account, TIER_ZERO, &[]).unwrap(), 0);
    }

    #[test]
    fn record_answers_for_its_owner_only() {
        let owner = Pubkey::new_unique();
        let record = record(owner);
        let provider = RecordedTiers::new(Some(&record));

        assert_eq!(provider.report(&owner, &[[7; 32]]), record.report);
        assert_eq!(provider.tier_at_time(&owner, 50, &[]), TIER_TWO);
        assert_eq!(provider.report_time_for_tier(&owner, TIER_ONE, &[]).unwrap(), 50);

        let stranger = Pubkey::new_unique();
        assert_eq!(provider.report(&stranger, &[]), TierReport::NEVER);
        assert_eq!(provider.report_time_for_tier(&stranger, TIER_ONE, &[]).unwrap(), NEVER);
    }

    #[test]
    fn tier_argument_is_checked() {
        let owner = Pubkey::new_unique();
        let record = record(owner);
        let provider = RecordedTiers::new(Some(&record));
        assert!(provider.report_time_for_tier(&owner, 9, &[]).is_err());
    }
}
