//! The builder never produces real signed bytes; signing, ALT resolution,
//! and wire-level transaction construction live behind this boundary.

use arb_types::Pubkey;

#[derive(Debug, Clone, Copy)]
pub struct SwapLegInstruction {
    pub pool_id: Pubkey,
    pub direction_a_to_b: bool,
    pub input_amount: u64,
    pub minimum_output: u64,
}

pub trait TransactionSigner {
    /// Produces the raw, signed wire bytes for one of our own legs (never
    /// the victim's, which is carried verbatim).
    fn sign_leg(
        &self,
        leg: &SwapLegInstruction,
        compute_unit_limit: u32,
        compute_unit_price: u64,
        tip_lamports: u64,
    ) -> Result<Vec<u8>, String>;
}

/// Deterministic stand-in used by tests and dry runs: serializes the leg's
/// fields into a flat byte buffer rather than a real signed transaction.
pub struct NullSigner;

impl TransactionSigner for NullSigner {
    fn sign_leg(
        &self,
        leg: &SwapLegInstruction,
        compute_unit_limit: u32,
        compute_unit_price: u64,
        tip_lamports: u64,
    ) -> Result<Vec<u8>, String> {
        let mut bytes = Vec::with_capacity(64);
        bytes.extend_from_slice(leg.pool_id.as_bytes());
        bytes.push(leg.direction_a_to_b as u8);
        bytes.extend_from_slice(&leg.input_amount.to_le_bytes());
        bytes.extend_from_slice(&leg.minimum_output.to_le_bytes());
        bytes.extend_from_slice(&compute_unit_limit.to_le_bytes());
        bytes.extend_from_slice(&compute_unit_price.to_le_bytes());
        bytes.extend_from_slice(&tip_lamports.to_le_bytes());
        Ok(bytes)
    }
}
