use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod provider;
pub mod report;
pub mod state;

use events::{ReportClosed, TierChange};
use provider::{RecordedTiers, TierProvider, TIER_V2_INTERFACE_ID};
use state::TierRecord;

pub use report::{TierReport, MAX_TIER, NEVER};

declare_id!("GRVLNmjn8ZspSHVD3VwZRtZgLxsUxModSEUr5PFK6VJv");

/// PDA seed prefix for per-account tier records
pub const TIER_REPORT_SEED: &[u8] = b"tier_report";

#[program]
pub mod tier_report {
    use super::*;

    /// Set the signer's tier, stamping newly reached tiers with the current
    /// clock and erasing history above a lower tier.
    ///
    /// `data` is passed through to the `TierChange` event untouched.
    pub fn set_tier(ctx: Context<SetTier>, end_tier: u8, data: Vec<u8>) -> Result<()> {
        let user = ctx.accounts.user.key();
        let now = Clock::get()?.unix_timestamp;

        let record = &mut ctx.accounts.tier_record;
        record.init_if_fresh(user, ctx.bumps.tier_record);
        let start_tier = record.set_tier(end_tier, now)?;

        msg!(
            "Tier report: {} moved from tier {} to tier {}",
            user,
            start_tier,
            end_tier
        );

        emit!(TierChange {
            sender: user,
            account: user,
            start_tier,
            end_tier,
            data,
        });

        Ok(())
    }

    /// Packed report for `account` as a big-endian 256-bit word. Accounts
    /// without a record report every tier as never reached.
    pub fn report(
        ctx: Context<ReadReport>,
        account: Pubkey,
        context: Vec<[u8; 32]>,
    ) -> Result<[u8; 32]> {
        let tiers = RecordedTiers::new(ctx.accounts.tier_record.as_deref());
        Ok(tiers.report(&account, &context).to_word())
    }

    /// Time `account` first reached `tier`, or `NEVER`.
    pub fn report_time_for_tier(
        ctx: Context<ReadReport>,
        account: Pubkey,
        tier: u8,
        context: Vec<[u8; 32]>,
    ) -> Result<u32> {
        let tiers = RecordedTiers::new(ctx.accounts.tier_record.as_deref());
        tiers.report_time_for_tier(&account, tier, &context)
    }

    pub fn supports_interface(
        _ctx: Context<SupportsInterface>,
        interface_id: [u8; 8],
    ) -> Result<bool> {
        Ok(interface_id == TIER_V2_INTERFACE_ID)
    }

    /// Close the signer's tier record, reclaiming the rent.
    pub fn close_report(ctx: Context<CloseReport>) -> Result<()> {
        let account = ctx.accounts.tier_record.owner;

        msg!("Tier report: record closed for {}", account);

        emit!(ReportClosed { account });

        Ok(())
    }
}

#[derive(Accounts)]
pub struct SetTier<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + TierRecord::INIT_SPACE,
        seeds = [TIER_REPORT_SEED, user.key().as_ref()],
        bump,
    )]
    pub tier_record: Account<'info, TierRecord>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(account: Pubkey)]
pub struct ReadReport<'info> {
    #[account(
        seeds = [TIER_REPORT_SEED, account.as_ref()],
        bump,
    )]
    pub tier_record: Option<Account<'info, TierRecord>>,
}

#[derive(Accounts)]
pub struct SupportsInterface {}

#[derive(Accounts)]
pub struct CloseReport<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        close = user,
        seeds = [TIER_REPORT_SEED, user.key().as_ref()],
        bump = tier_record.bump,
        constraint = tier_record.owner == user.key(),
    )]
    pub tier_record: Account<'info, TierRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_space_fits_report() {
        assert_eq!(TierRecord::INIT_SPACE, 32 + 32 + 8 + 1);
    }
}
