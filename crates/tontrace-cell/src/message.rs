//! `Message X` TL-B layout.
//!
//! ```text
//! message$_ {X:Type} info:CommonMsgInfo
//!   init:(Maybe (Either StateInit ^StateInit))
//!   body:(Either X ^X) = Message X;
//! ```

use crate::address::ExternalAddress;
use crate::boc::{cell_hash, into_ref};
use crate::error::CellError;
use num_bigint::BigUint;
use std::fmt;
use tonlib_core::TonAddress;
use tonlib_core::cell::{ArcCell, Cell, CellBuilder, CellParser};

/// Discriminant of [`CommonMsgInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Internal,
    ExternalIn,
    ExternalOut,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::ExternalIn => "external-in",
            Self::ExternalOut => "external-out",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `currencies$_ grams:Grams other:ExtraCurrencyCollection`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurrencyCollection {
    pub grams: BigUint,
    /// Root of the extra-currency dictionary, if any.
    pub other: Option<ArcCell>,
}

impl CurrencyCollection {
    fn load(parser: &mut CellParser<'_>) -> Result<Self, CellError> {
        let grams = parser.load_coins()?;
        let other = load_maybe_ref(parser)?;
        Ok(Self { grams, other })
    }

    fn store(&self, builder: &mut CellBuilder) -> Result<(), CellError> {
        builder.store_coins(&self.grams)?;
        store_maybe_ref(&self.other, builder)
    }
}

/// `int_msg_info$0`
#[derive(Debug, Clone, PartialEq)]
pub struct InternalMsgInfo {
    pub ihr_disabled: bool,
    pub bounce: bool,
    pub bounced: bool,
    pub src: TonAddress,
    pub dest: TonAddress,
    pub value: CurrencyCollection,
    pub ihr_fee: BigUint,
    pub fwd_fee: BigUint,
    pub created_lt: u64,
    pub created_at: u32,
}

/// `ext_in_msg_info$10 src:MsgAddressExt dest:MsgAddressInt import_fee:Grams`
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalInMsgInfo {
    pub src: ExternalAddress,
    pub dest: TonAddress,
    pub import_fee: BigUint,
}

/// `ext_out_msg_info$11 src:MsgAddressInt dest:MsgAddressExt created_lt:uint64 created_at:uint32`
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalOutMsgInfo {
    pub src: TonAddress,
    pub dest: ExternalAddress,
    pub created_lt: u64,
    pub created_at: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommonMsgInfo {
    Internal(InternalMsgInfo),
    ExternalIn(ExternalInMsgInfo),
    ExternalOut(ExternalOutMsgInfo),
}

impl CommonMsgInfo {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Internal(_) => MessageKind::Internal,
            Self::ExternalIn(_) => MessageKind::ExternalIn,
            Self::ExternalOut(_) => MessageKind::ExternalOut,
        }
    }

    /// Source address in display form.
    pub fn src(&self) -> String {
        match self {
            Self::Internal(info) => crate::display_internal(&info.src),
            Self::ExternalIn(info) => info.src.to_string(),
            Self::ExternalOut(info) => crate::display_internal(&info.src),
        }
    }

    /// Destination address in display form.
    pub fn dest(&self) -> String {
        match self {
            Self::Internal(info) => crate::display_internal(&info.dest),
            Self::ExternalIn(info) => crate::display_internal(&info.dest),
            Self::ExternalOut(info) => info.dest.to_string(),
        }
    }

    pub fn load(parser: &mut CellParser<'_>) -> Result<Self, CellError> {
        if !parser.load_bit()? {
            let ihr_disabled = parser.load_bit()?;
            let bounce = parser.load_bit()?;
            let bounced = parser.load_bit()?;
            let src = parser.load_address()?;
            let dest = parser.load_address()?;
            let value = CurrencyCollection::load(parser)?;
            let ihr_fee = parser.load_coins()?;
            let fwd_fee = parser.load_coins()?;
            let created_lt = parser.load_u64(64)?;
            let created_at = parser.load_u32(32)?;
            return Ok(Self::Internal(InternalMsgInfo {
                ihr_disabled,
                bounce,
                bounced,
                src,
                dest,
                value,
                ihr_fee,
                fwd_fee,
                created_lt,
                created_at,
            }));
        }

        if !parser.load_bit()? {
            let src = ExternalAddress::load(parser)?;
            let dest = parser.load_address()?;
            let import_fee = parser.load_coins()?;
            return Ok(Self::ExternalIn(ExternalInMsgInfo {
                src,
                dest,
                import_fee,
            }));
        }

        let src = parser.load_address()?;
        let dest = ExternalAddress::load(parser)?;
        let created_lt = parser.load_u64(64)?;
        let created_at = parser.load_u32(32)?;
        Ok(Self::ExternalOut(ExternalOutMsgInfo {
            src,
            dest,
            created_lt,
            created_at,
        }))
    }

    pub fn store(&self, builder: &mut CellBuilder) -> Result<(), CellError> {
        match self {
            Self::Internal(info) => {
                builder
                    .store_bit(false)?
                    .store_bit(info.ihr_disabled)?
                    .store_bit(info.bounce)?
                    .store_bit(info.bounced)?
                    .store_address(&info.src)?
                    .store_address(&info.dest)?;
                info.value.store(builder)?;
                builder
                    .store_coins(&info.ihr_fee)?
                    .store_coins(&info.fwd_fee)?
                    .store_u64(64, info.created_lt)?
                    .store_u32(32, info.created_at)?;
            }
            Self::ExternalIn(info) => {
                builder.store_u8(2, 0b10)?;
                info.src.store(builder)?;
                builder
                    .store_address(&info.dest)?
                    .store_coins(&info.import_fee)?;
            }
            Self::ExternalOut(info) => {
                builder.store_u8(2, 0b11)?.store_address(&info.src)?;
                info.dest.store(builder)?;
                builder
                    .store_u64(64, info.created_lt)?
                    .store_u32(32, info.created_at)?;
            }
        }
        Ok(())
    }
}

/// `tick_tock$_ tick:Bool tock:Bool`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTock {
    pub tick: bool,
    pub tock: bool,
}

/// `_ split_depth:(Maybe (## 5)) special:(Maybe TickTock) code:(Maybe ^Cell)
///   data:(Maybe ^Cell) library:(Maybe ^Cell) = StateInit;`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateInit {
    pub split_depth: Option<u8>,
    pub special: Option<TickTock>,
    pub code: Option<ArcCell>,
    pub data: Option<ArcCell>,
    pub library: Option<ArcCell>,
}

impl StateInit {
    pub fn load(parser: &mut CellParser<'_>) -> Result<Self, CellError> {
        let split_depth = if parser.load_bit()? {
            Some(parser.load_u8(5)?)
        } else {
            None
        };
        let special = if parser.load_bit()? {
            Some(TickTock {
                tick: parser.load_bit()?,
                tock: parser.load_bit()?,
            })
        } else {
            None
        };
        Ok(Self {
            split_depth,
            special,
            code: load_maybe_ref(parser)?,
            data: load_maybe_ref(parser)?,
            library: load_maybe_ref(parser)?,
        })
    }

    pub fn store(&self, builder: &mut CellBuilder) -> Result<(), CellError> {
        match self.split_depth {
            Some(depth) => {
                builder.store_bit(true)?.store_u8(5, depth)?;
            }
            None => {
                builder.store_bit(false)?;
            }
        }
        match self.special {
            Some(special) => {
                builder
                    .store_bit(true)?
                    .store_bit(special.tick)?
                    .store_bit(special.tock)?;
            }
            None => {
                builder.store_bit(false)?;
            }
        }
        store_maybe_ref(&self.code, builder)?;
        store_maybe_ref(&self.data, builder)?;
        store_maybe_ref(&self.library, builder)
    }

    pub fn to_cell(&self) -> Result<Cell, CellError> {
        let mut builder = CellBuilder::new();
        self.store(&mut builder)?;
        Ok(builder.build()?)
    }
}

fn load_maybe_ref(parser: &mut CellParser<'_>) -> Result<Option<ArcCell>, CellError> {
    if parser.load_bit()? {
        Ok(Some(parser.next_reference()?))
    } else {
        Ok(None)
    }
}

fn store_maybe_ref(cell: &Option<ArcCell>, builder: &mut CellBuilder) -> Result<(), CellError> {
    match cell {
        Some(cell) => {
            builder.store_bit(true)?.store_reference(cell)?;
        }
        None => {
            builder.store_bit(false)?;
        }
    }
    Ok(())
}

/// Move whatever the parser has not consumed into a cell of its own.
fn split_remainder(parser: &mut CellParser<'_>) -> Result<Cell, CellError> {
    let bit_len = parser.remaining_bits();
    let data = parser.load_bits(bit_len)?;
    let mut builder = CellBuilder::new();
    builder.store_bits(bit_len, &data)?;
    while let Ok(reference) = parser.next_reference() {
        builder.store_reference(&reference)?;
    }
    Ok(builder.build()?)
}

/// Append the bits and references of `cell` to `builder`.
fn store_inline(cell: &Cell, builder: &mut CellBuilder) -> Result<(), CellError> {
    builder.store_bits(cell.bit_len(), cell.data())?;
    for reference in cell.references() {
        builder.store_reference(reference)?;
    }
    Ok(())
}

/// Where an `Either X ^X` field lives relative to the message cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Inline,
    Reference,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Reference => "reference",
        }
    }
}

/// How [`Message::store`] places `init` and `body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLayout {
    /// Reproduce the layout the message was decoded with.
    AsParsed,
    /// Put `init` and `body` behind references (the TEP-467 layout).
    ForceReference,
}

/// A decoded message. `body` is always materialized as its own cell; the
/// `*_layout` fields remember where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub info: CommonMsgInfo,
    pub init: Option<StateInit>,
    pub init_layout: Layout,
    pub body: ArcCell,
    pub body_layout: Layout,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        self.info.kind()
    }

    /// Decode a message whose layout starts at the parser cursor. An inline
    /// body takes every bit and reference the parser has left.
    pub fn load(parser: &mut CellParser<'_>) -> Result<Self, CellError> {
        let info = CommonMsgInfo::load(parser)?;

        let (init, init_layout) = if parser.load_bit()? {
            if parser.load_bit()? {
                let init_cell = parser.next_reference()?;
                let init = StateInit::load(&mut init_cell.parser())?;
                (Some(init), Layout::Reference)
            } else {
                (Some(StateInit::load(parser)?), Layout::Inline)
            }
        } else {
            (None, Layout::Inline)
        };

        let (body, body_layout) = if parser.load_bit()? {
            (parser.next_reference()?, Layout::Reference)
        } else {
            (into_ref(split_remainder(parser)?), Layout::Inline)
        };

        Ok(Self {
            info,
            init,
            init_layout,
            body,
            body_layout,
        })
    }

    /// Decode a message from its root cell.
    pub fn from_cell(cell: &Cell) -> Result<Self, CellError> {
        let mut parser = cell.parser();
        Self::load(&mut parser)
    }

    pub fn store(&self, builder: &mut CellBuilder, layout: StoreLayout) -> Result<(), CellError> {
        let force = layout == StoreLayout::ForceReference;
        self.info.store(builder)?;

        match &self.init {
            None => {
                builder.store_bit(false)?;
            }
            Some(init) if force || self.init_layout == Layout::Reference => {
                builder
                    .store_bit(true)?
                    .store_bit(true)?
                    .store_reference(&into_ref(init.to_cell()?))?;
            }
            Some(init) => {
                builder.store_bit(true)?.store_bit(false)?;
                init.store(builder)?;
            }
        }

        if force || self.body_layout == Layout::Reference {
            builder.store_bit(true)?.store_reference(&self.body)?;
        } else {
            builder.store_bit(false)?;
            store_inline(&self.body, builder)?;
        }
        Ok(())
    }

    pub fn to_cell(&self, layout: StoreLayout) -> Result<Cell, CellError> {
        let mut builder = CellBuilder::new();
        self.store(&mut builder, layout)?;
        Ok(builder.build()?)
    }
}
