//! # tontrace-cell
//!
//! The `Message X` TL-B layout on top of the `tonlib-core` cell codec. Bag
//! of cells parsing, cell building and representation hashes come from
//! `tonlib-core`; this crate only knows where the message fields live.
//!
//! ## Architecture
//!
//! ```text
//! boc::parse_single_root  ← BagOfCells::parse + single_root
//!     │
//! Message::from_cell      ← CellParser walks CommonMsgInfo, init, body
//!     │
//! Message::to_cell        ← CellBuilder, optionally forcing ^init / ^body
//!     │
//! boc::cell_hash          ← Cell::cell_hash as a plain 32-byte value
//! ```

pub mod address;
pub mod boc;
pub mod error;
pub mod message;

pub use address::{ExternalAddress, display_internal};
pub use boc::{CellHash, cell_hash, parse_single_root, serialize};
pub use error::CellError;
pub use message::{
    CommonMsgInfo, CurrencyCollection, ExternalInMsgInfo, ExternalOutMsgInfo, InternalMsgInfo,
    Layout, Message, MessageKind, StateInit, StoreLayout, TickTock,
};
pub use tonlib_core::TonAddress;
pub use tonlib_core::cell::{ArcCell, Cell, CellBuilder};
