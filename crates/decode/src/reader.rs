//! Little-endian fixed-offset readers. Every decoder goes through these so
//! a bounds violation always becomes a typed error, never a panic.

use crate::error::DecodeError;
use arb_types::Pubkey;

pub struct ByteReader<'a> {
    data: &'a [u8],
    account_type: &'static str,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], account_type: &'static str) -> Self {
        Self { data, account_type }
    }

    pub fn require_len(&self, minimum: usize) -> Result<(), DecodeError> {
        if self.data.len() < minimum {
            return Err(DecodeError::TooShort {
                account_type: self.account_type,
                actual: self.data.len(),
                minimum,
            });
        }
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        self.data.get(offset..offset + len).ok_or(DecodeError::TooShort {
            account_type: self.account_type,
            actual: self.data.len(),
            minimum: offset + len,
        })
    }

    pub fn u8(&self, offset: usize) -> Result<u8, DecodeError> {
        Ok(self.slice(offset, 1)?[0])
    }

    pub fn bool(&self, offset: usize) -> Result<bool, DecodeError> {
        Ok(self.u8(offset)? != 0)
    }

    pub fn u16(&self, offset: usize) -> Result<u16, DecodeError> {
        let s = self.slice(offset, 2)?;
        Ok(u16::from_le_bytes(s.try_into().unwrap()))
    }

    pub fn u32(&self, offset: usize) -> Result<u32, DecodeError> {
        let s = self.slice(offset, 4)?;
        Ok(u32::from_le_bytes(s.try_into().unwrap()))
    }

    pub fn i32(&self, offset: usize) -> Result<i32, DecodeError> {
        let s = self.slice(offset, 4)?;
        Ok(i32::from_le_bytes(s.try_into().unwrap()))
    }

    pub fn i64(&self, offset: usize) -> Result<i64, DecodeError> {
        let s = self.slice(offset, 8)?;
        Ok(i64::from_le_bytes(s.try_into().unwrap()))
    }

    pub fn u64(&self, offset: usize) -> Result<u64, DecodeError> {
        let s = self.slice(offset, 8)?;
        Ok(u64::from_le_bytes(s.try_into().unwrap()))
    }

    pub fn u128(&self, offset: usize) -> Result<u128, DecodeError> {
        let s = self.slice(offset, 16)?;
        Ok(u128::from_le_bytes(s.try_into().unwrap()))
    }

    pub fn i128(&self, offset: usize) -> Result<i128, DecodeError> {
        let s = self.slice(offset, 16)?;
        Ok(i128::from_le_bytes(s.try_into().unwrap()))
    }

    pub fn pubkey(&self, offset: usize) -> Result<Pubkey, DecodeError> {
        let s = self.slice(offset, 32)?;
        Ok(Pubkey::from_slice(s).expect("slice length checked above"))
    }

    pub fn discriminator8(&self) -> Result<[u8; 8], DecodeError> {
        let s = self.slice(0, 8)?;
        Ok(s.try_into().unwrap())
    }
}
