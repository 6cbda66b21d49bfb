pub mod meteora_dlmm;
pub mod pumpswap;
pub mod raydium_clmm;
pub mod raydium_v4;
