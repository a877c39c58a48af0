//! External address forms and display helpers.
//!
//! Internal addresses (`addr_std`) are `tonlib_core::TonAddress` and go
//! through `CellParser::load_address` / `CellBuilder::store_address`. The
//! codec has no type for `MsgAddressExt`, which only appears as the source
//! of an external-in message or the destination of an external-out one.

use crate::error::CellError;
use std::fmt;
use tonlib_core::TonAddress;
use tonlib_core::cell::{CellBuilder, CellParser};

/// `MsgAddressExt`: `addr_none$00` or `addr_extern$01 len:(## 9) bits`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExternalAddress {
    #[default]
    None,
    Extern { bit_len: usize, data: Vec<u8> },
}

impl ExternalAddress {
    pub fn load(parser: &mut CellParser<'_>) -> Result<Self, CellError> {
        match parser.load_u8(2)? {
            0b00 => Ok(Self::None),
            0b01 => {
                let bit_len = parser.load_u32(9)? as usize;
                let data = parser.load_bits(bit_len)?;
                Ok(Self::Extern { bit_len, data })
            }
            _ => Err(CellError::InvalidLayout(
                "expected an external address, found an internal one".into(),
            )),
        }
    }

    pub fn store(&self, builder: &mut CellBuilder) -> Result<(), CellError> {
        match self {
            Self::None => {
                builder.store_u8(2, 0b00)?;
            }
            Self::Extern { bit_len, data } => {
                builder
                    .store_u8(2, 0b01)?
                    .store_u32(9, *bit_len as u32)?
                    .store_bits(*bit_len, data)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ExternalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("addr_none"),
            Self::Extern { bit_len, data } => write!(f, "extern:{bit_len}:{}", hex::encode(data)),
        }
    }
}

/// Raw `wc:hex` form of an internal address; `addr_none` for the null one.
pub fn display_internal(address: &TonAddress) -> String {
    if *address == TonAddress::NULL {
        return "addr_none".to_string();
    }
    format!(
        "{}:{}",
        address.workchain,
        hex::encode(address.hash_part.as_slice())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extern_address_survives_a_cell() {
        let address = ExternalAddress::Extern {
            bit_len: 12,
            data: vec![0xab, 0xc0],
        };
        let mut builder = CellBuilder::new();
        address.store(&mut builder).expect("store");
        let cell = builder.build().expect("cell");
        assert_eq!(cell.bit_len(), 2 + 9 + 12);

        let mut parser = cell.parser();
        assert_eq!(ExternalAddress::load(&mut parser).expect("load"), address);
        assert_eq!(address.to_string(), "extern:12:abc0");
    }

    #[test]
    fn internal_tag_is_not_an_external_address() {
        let dest: TonAddress = format!("0:{}", "11".repeat(32)).parse().expect("address");
        let mut builder = CellBuilder::new();
        builder.store_address(&dest).expect("store");
        let cell = builder.build().expect("cell");
        assert!(matches!(
            ExternalAddress::load(&mut cell.parser()),
            Err(CellError::InvalidLayout(_))
        ));
    }

    #[test]
    fn internal_addresses_display_as_raw_form() {
        let dest: TonAddress = format!("-1:{}", "2a".repeat(32)).parse().expect("address");
        assert_eq!(display_internal(&dest), format!("-1:{}", "2a".repeat(32)));
        assert_eq!(display_internal(&TonAddress::NULL), "addr_none");
    }
}
