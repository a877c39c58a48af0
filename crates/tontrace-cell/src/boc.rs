//! Thin wrappers over `tonlib_core::cell::BagOfCells`.

use crate::error::CellError;
use std::fmt;
use std::sync::Arc;
use tonlib_core::cell::{ArcCell, BagOfCells, Cell};

/// A cell representation hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHash(pub [u8; 32]);

impl fmt::Debug for CellHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellHash({})", hex::encode(self.0))
    }
}

/// Representation hash of an ordinary cell.
pub fn cell_hash(cell: &Cell) -> CellHash {
    let hash = cell.cell_hash();
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_slice());
    CellHash(out)
}

/// Parse a bag of cells that must carry exactly one root.
pub fn parse_single_root(bytes: &[u8]) -> Result<ArcCell, CellError> {
    let boc = BagOfCells::parse(bytes)?;
    Ok(boc.single_root()?.clone())
}

/// Serialize `root` as a bag of cells with a CRC32-C trailer.
pub fn serialize(root: &ArcCell) -> Result<Vec<u8>, CellError> {
    let bytes = BagOfCells::from_root(Cell::clone(root)).serialize(true)?;
    Ok(bytes)
}

/// Wrap a freshly built cell for use as a reference.
pub(crate) fn into_ref(cell: Cell) -> ArcCell {
    Arc::new(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonlib_core::cell::CellBuilder;

    #[test]
    fn empty_cell_hash_is_the_well_known_constant() {
        let empty = CellBuilder::new().build().expect("empty cell");
        assert_eq!(
            hex::encode(cell_hash(&empty).0),
            "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
        );
    }

    #[test]
    fn serialized_root_parses_back_to_the_same_hash() {
        let mut child = CellBuilder::new();
        child.store_u32(32, 0xdead_beef).expect("child bits");
        let child = into_ref(child.build().expect("child"));
        let mut root = CellBuilder::new();
        root.store_u8(4, 0b1010)
            .expect("root bits")
            .store_reference(&child)
            .expect("root ref");
        let root = into_ref(root.build().expect("root"));

        let bytes = serialize(&root).expect("serialize");
        assert_eq!(&bytes[..4], &[0xb5, 0xee, 0x9c, 0x72]);
        let parsed = parse_single_root(&bytes).expect("parse");
        assert_eq!(cell_hash(&parsed), cell_hash(&root));
    }

    #[test]
    fn garbage_is_a_codec_error() {
        assert!(matches!(
            parse_single_root(&[0xde, 0xad, 0xbe, 0xef]),
            Err(CellError::Codec(_))
        ));
    }
}
