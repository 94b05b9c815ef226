use anchor_lang::prelude::*;

use crate::errors::TierReportError;

pub const TIER_ZERO: u8 = 0;
pub const TIER_ONE: u8 = 1;
pub const TIER_TWO: u8 = 2;
pub const TIER_THREE: u8 = 3;
pub const TIER_FOUR: u8 = 4;
pub const TIER_FIVE: u8 = 5;
pub const TIER_SIX: u8 = 6;
pub const TIER_SEVEN: u8 = 7;
pub const TIER_EIGHT: u8 = 8;

/// Highest tier a report can encode.
pub const MAX_TIER: u8 = TIER_EIGHT;

/// Field value for a tier that has never been reached.
pub const NEVER: u32 = u32::MAX;

const FIELD_BITS: u32 = 32;
const FIELD_MASK: u64 = NEVER as u64;
const LIMB_BITS: u32 = 64;
const LIMBS: usize = 4;

/// Bit offset of the field holding the time `tier` was first reached.
/// Tier 0 is held from time 0 and owns no bits.
const fn tier_field_offset(tier: u8) -> Option<u32> {
    match tier {
        TIER_ZERO => None,
        _ => Some((tier as u32 - 1) * FIELD_BITS),
    }
}

/// Checked form of [`tier_field_offset`]; the only place a tier argument
/// is rejected.
pub(crate) fn field_offset_for_tier(tier: u8) -> Result<Option<u32>> {
    require!(tier <= MAX_TIER, TierReportError::TierOutOfRange);
    Ok(tier_field_offset(tier))
}

/// Eight 32-bit "first reached at" timestamps packed into one 256-bit word.
///
/// Field `i` occupies bits `[32 * i, 32 * i + 32)` and records tier `i + 1`.
/// The word is held as little-endian `u64` limbs, so limb 0 carries the
/// fields for tiers 1 and 2.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TierReport {
    limbs: [u64; 4],
}

impl Default for TierReport {
    fn default() -> Self {
        Self::NEVER
    }
}

impl From<[u8; 32]> for TierReport {
    fn from(word: [u8; 32]) -> Self {
        Self::from_word(word)
    }
}

impl From<TierReport> for [u8; 32] {
    fn from(report: TierReport) -> Self {
        report.to_word()
    }
}

impl TierReport {
    /// Every tier unreached: the state of an account with no history.
    pub const NEVER: Self = Self {
        limbs: [u64::MAX; LIMBS],
    };

    pub const fn from_limbs(limbs: [u64; LIMBS]) -> Self {
        Self { limbs }
    }

    pub const fn limbs(&self) -> [u64; LIMBS] {
        self.limbs
    }

    /// Decode a big-endian 256-bit word.
    pub fn from_word(word: [u8; 32]) -> Self {
        let mut limbs = [0u64; LIMBS];
        for (i, chunk) in word.chunks_exact(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            limbs[LIMBS - 1 - i] = u64::from_be_bytes(bytes);
        }
        Self { limbs }
    }

    /// Encode as a big-endian 256-bit word.
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        for (i, chunk) in word.chunks_exact_mut(8).enumerate() {
            chunk.copy_from_slice(&self.limbs[LIMBS - 1 - i].to_be_bytes());
        }
        word
    }

    /// Stored timestamps for tiers 1 through 8, in order.
    pub fn fields(&self) -> [u32; MAX_TIER as usize] {
        let mut fields = [NEVER; MAX_TIER as usize];
        for (i, field) in fields.iter_mut().enumerate() {
            *field = self.read(i as u32 * FIELD_BITS);
        }
        fields
    }

    fn read(&self, offset: u32) -> u32 {
        let limb = self.limbs[(offset / LIMB_BITS) as usize];
        ((limb >> (offset % LIMB_BITS)) & FIELD_MASK) as u32
    }

    fn write(&mut self, offset: u32, timestamp: u32) {
        let shift = offset % LIMB_BITS;
        let limb = &mut self.limbs[(offset / LIMB_BITS) as usize];
        *limb = (*limb & !(FIELD_MASK << shift)) | (u64::from(timestamp) << shift);
    }

    /// Highest tier held continuously from `timestamp` up to the time the
    /// report was produced.
    ///
    /// Scanning stops at the first tier reached after `timestamp`. A
    /// [`NEVER`] field always stops the scan, even for query times past
    /// the 32-bit range.
    pub fn tier_at_time(&self, timestamp: u64) -> u8 {
        for tier in TIER_ONE..=MAX_TIER {
            if let Some(offset) = tier_field_offset(tier) {
                let reached = self.read(offset);
                if reached == NEVER || u64::from(reached) > timestamp {
                    return tier - 1;
                }
            }
        }
        MAX_TIER
    }

    /// Time `tier` was first reached, or [`NEVER`]. Tier 0 is always 0.
    pub fn report_time_for_tier(&self, tier: u8) -> Result<u32> {
        Ok(match field_offset_for_tier(tier)? {
            Some(offset) => self.read(offset),
            None => 0,
        })
    }

    /// Alias of [`Self::report_time_for_tier`].
    pub fn tier_timestamp(&self, tier: u8) -> Result<u32> {
        self.report_time_for_tier(tier)
    }

    /// Reset every tier above `tier` to [`NEVER`].
    pub fn truncate_tiers_above(mut self, tier: u8) -> Result<Self> {
        field_offset_for_tier(tier)?;
        for above in tier + 1..=MAX_TIER {
            if let Some(offset) = tier_field_offset(above) {
                self.write(offset, NEVER);
            }
        }
        Ok(self)
    }

    /// Record `timestamp` as the time the account moved from `tier` to
    /// `tier + 1`. Tier 8 has nothing above it and leaves the report as is.
    pub fn update_time_at_tier(mut self, tier: u8, timestamp: u32) -> Result<Self> {
        field_offset_for_tier(tier)?;
        if tier < MAX_TIER {
            if let Some(offset) = field_offset_for_tier(tier + 1)? {
                self.write(offset, timestamp);
            }
        }
        Ok(self)
    }

    /// Stamp every transition in `[start_tier, end_tier)` with `timestamp`.
    pub fn update_times_for_tier_range(
        mut self,
        start_tier: u8,
        end_tier: u8,
        timestamp: u32,
    ) -> Result<Self> {
        field_offset_for_tier(end_tier)?;
        for tier in start_tier..end_tier {
            self = self.update_time_at_tier(tier, timestamp)?;
        }
        Ok(self)
    }

    /// Move the account from `start_tier` to `end_tier` at `timestamp`.
    ///
    /// `start_tier` must be the tier the report currently holds, i.e.
    /// `tier_at_time` at the caller's notion of now. It is not checked.
    pub fn update_report_with_tier_at_time(
        self,
        start_tier: u8,
        end_tier: u8,
        timestamp: u32,
    ) -> Result<Self> {
        if end_tier < start_tier {
            self.truncate_tiers_above(end_tier)
        } else {
            self.update_times_for_tier_range(start_tier, end_tier, timestamp)
        }
    }
}
