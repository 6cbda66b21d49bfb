use crate::error::{DecodeError, DecodeResult};
use crate::reader::ByteReader;
use arb_types::{AddressLookupTable, Pubkey};

const HEADER_LEN: usize = 56;
const ENTRY_LEN: usize = 32;
const INITIALIZED_DISCRIMINATOR: u32 = 1;

/// First 4 bytes are a u32 LE discriminator (1 = initialized). Address
/// entries start at offset 56, 32 bytes each.
pub fn decode_address_lookup_table(pubkey: Pubkey, data: &[u8], slot: u64) -> DecodeResult<AddressLookupTable> {
    let reader = ByteReader::new(data, "address_lookup_table");
    reader.require_len(HEADER_LEN)?;

    let discriminator = reader.u32(0)?;
    if discriminator != INITIALIZED_DISCRIMINATOR {
        return Err(DecodeError::WrongDiscriminator { account_type: "address_lookup_table" });
    }

    let remaining = data.len() - HEADER_LEN;
    let count = remaining / ENTRY_LEN;
    let mut addresses = Vec::with_capacity(count);
    for i in 0..count {
        addresses.push(reader.pubkey(HEADER_LEN + i * ENTRY_LEN)?);
    }

    Ok(AddressLookupTable { pubkey, addresses, slot })
}
