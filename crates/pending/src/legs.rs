//! Extracts `SwapLeg`s out of a parsed transaction message by matching
//! configured swap-instruction shapes. The queue never decodes arbitrary
//! instruction data beyond what's needed to identify a pool touch.

use arb_decode::tx::{parse_legacy_message, LegacyMessage};
use arb_decode::DecodeResult;
use arb_types::{Pubkey, SwapLeg};

/// Describes where a venue's swap instruction keeps the fields the queue
/// cares about. One entry per program the engine watches.
#[derive(Debug, Clone)]
pub struct SwapProgramConfig {
    pub program_id: Pubkey,
    pub discriminator: u8,
    pub pool_account_index: usize,
    pub amount_in_offset: usize,
    pub minimum_amount_out_offset: usize,
    pub direction_flag_offset: Option<usize>,
}

fn read_u64_le(data: &[u8], offset: usize) -> Option<u64> {
    data.get(offset..offset + 8).map(|s| u64::from_le_bytes(s.try_into().unwrap()))
}

/// Scans every instruction in `message`, matching program id and leading
/// discriminator byte against `configs`. Instructions that don't match any
/// config are silently skipped; partially malformed matches are skipped
/// rather than erroring, since a pending-tx queue must tolerate garbage
/// from the mempool without losing the rest of the transaction's legs.
pub fn extract_swap_legs(message: &LegacyMessage, configs: &[SwapProgramConfig]) -> Vec<SwapLeg> {
    let mut legs = Vec::new();

    for ix in &message.instructions {
        let Some(program_id) = message.account_keys.get(ix.program_id_index as usize) else {
            continue;
        };
        let Some(config) = configs.iter().find(|c| &c.program_id == program_id) else {
            continue;
        };
        if ix.data.first() != Some(&config.discriminator) {
            continue;
        }
        let Some(&pool_account_idx) = ix.accounts.get(config.pool_account_index) else {
            continue;
        };
        let Some(pool_id) = message.account_keys.get(pool_account_idx as usize) else {
            continue;
        };
        let (Some(amount_in), Some(minimum_amount_out)) = (
            read_u64_le(&ix.data, config.amount_in_offset),
            read_u64_le(&ix.data, config.minimum_amount_out_offset),
        ) else {
            continue;
        };
        let direction_a_to_b = config
            .direction_flag_offset
            .and_then(|offset| ix.data.get(offset))
            .map(|byte| *byte != 0)
            .unwrap_or(true);

        legs.push(SwapLeg { pool_id: *pool_id, direction_a_to_b, amount_in, minimum_amount_out });
    }

    legs
}

/// Parses a raw transaction message and extracts its swap legs in one step.
pub fn decode_swap_legs(raw_message: &[u8], configs: &[SwapProgramConfig]) -> DecodeResult<Vec<SwapLeg>> {
    let message = parse_legacy_message(raw_message)?;
    Ok(extract_swap_legs(&message, configs))
}
