// Descriptor wallet library extending bitcoin & miniscript functionality
// by LNP/BP Association (https://lnp-bp.org)
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

//! Descriptor grammar model:
//! ```text
//! OutputDescriptor -> { ShInner -> WshInner, WshInner, Multi } -> PubKeyProvider
//! ```

mod grammar;
mod output;
mod pubkey;

pub use grammar::{
    Context, GrammarError, MAX_BARE_MULTI_KEYS, MAX_PUBKEYS_PER_MULTISIG, MAX_SH_MULTI_KEYS,
    MAX_WSH_MULTI_KEYS, MIN_MULTI_KEYS,
};
pub use output::{DescrTag, Multi, OutputDescriptor, ShInner, WshInner};
pub use pubkey::{DeriveType, DoubleOrigin, HdKey, KeyOrigin, OriginKey, PubKeyProvider, XpubCore};
