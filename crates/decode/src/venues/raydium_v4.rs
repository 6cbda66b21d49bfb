//! Legacy Raydium V4 `AmmInfo` layout: no account discriminator, dispatched
//! purely by `(owner program, data length == 752)`. Offsets below are taken
//! from the widely-published `state.rs` layout; re-validate against a live
//! account before depending on them in production.

use crate::error::DecodeResult;
use crate::reader::ByteReader;
use arb_types::Pubkey;

pub const EXPECTED_LEN: usize = 752;

pub struct RaydiumV4Fields {
    pub status: u64,
    pub swap_fee_numerator: u64,
    pub swap_fee_denominator: u64,
    pub need_take_pnl_coin: u64,
    pub need_take_pnl_pc: u64,
    pub coin_vault: Pubkey,
    pub pc_vault: Pubkey,
}

pub fn decode_amm_info(data: &[u8]) -> DecodeResult<RaydiumV4Fields> {
    let reader = ByteReader::new(data, "raydium_v4_amm_info");
    reader.require_len(EXPECTED_LEN)?;

    Ok(RaydiumV4Fields {
        status: reader.u64(0)?,
        swap_fee_numerator: reader.u64(176)?,
        swap_fee_denominator: reader.u64(184)?,
        need_take_pnl_coin: reader.u64(192)?,
        need_take_pnl_pc: reader.u64(200)?,
        coin_vault: reader.pubkey(336)?,
        pc_vault: reader.pubkey(368)?,
    })
}
