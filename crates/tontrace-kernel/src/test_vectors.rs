//! Fixed wallet transfer messages with independently computed hashes.
//!
//! Both BOCs carry the same wallet v4 transfer to
//! `0:71b857e73f9515148796062649f544ad1061155bf0ea220113537e864a4ae15a`:
//! a 624-bit signed body with one internal-message reference.
//!
//! - `WALLET_TRANSFER_BOC` is what a wallet broadcasts: `src` is `addr_none`,
//!   `import_fee` is zero and the body is stored inline.
//! - `RELAYED_TRANSFER_BOC` is the same message after a relay rewrote it:
//!   `src` is `extern:16:beef`, `import_fee` is 1000000 and the body sits
//!   behind a reference.

pub const WALLET_TRANSFER_BOC: &str = "te6cckEBAgEAtgAB4YgA43Cvzn8qKikPLAxMk+qJWiDCKrfh1EQCJqb9DJSVwrQEXGS6ZxtGkB8/UhZ7v/czwY6gS819oGV4OYl38z5MFVr5DPZXkSFB3XyGL/jEGZBmKTvQjrJ6eV69VAL/zqz9kU1NGLsqn5rAAAAAOAAcAQCAYgBN7z6JSUlJm5GywlCTzusJDaBobTldZtaUCwy8to17z6AvrwgAAAAAAAAAAAAAAAAAAAAAAAB0b250cmFjZdeX9Ks=";

pub const RELAYED_TRANSFER_BOC: &str = "te6cckEBAwEAvwABUZCF93wAcbhX5z+VFRSHlgYmSfVErRBhFVvw6iIBE1N+hkpK4Vow9CQGAQGci4yXTONo0gPn6kLPd/7meDHUCXmvtAyvBzEu/mfJgqtfIZ7K8iQoO6+Qxf8YgzIMxSd6EdZPTyvXqoBf+dWfsimpoxdlU/NYAAAABwADAgCAYgBN7z6JSUlJm5GywlCTzusJDaBobTldZtaUCwy8to17z6AvrwgAAAAAAAAAAAAAAAAAAAAAAAB0b250cmFjZeCk0Jg=";

/// Root cell hash of `WALLET_TRANSFER_BOC`, hex.
pub const WALLET_TRANSFER_RAW_HASH: &str =
    "70042893ddfd6a78bed65ba99a6cf14b5642f6a77fcef47cdb5bb0413307ce21";

/// Root cell hash of `RELAYED_TRANSFER_BOC`, hex.
pub const RELAYED_TRANSFER_RAW_HASH: &str =
    "0fc0b9996caa296db20c83bfaec8e8f8472f97c8de087c5b735f4757eefa25c0";

/// Normalized hash shared by both messages, base64.
pub const TRANSFER_NORMALIZED_HASH: &str = "i1AlCVE0bmV/d9Qd6oemd+XJz0VaPHhNXZMI0SOT5Ks=";
