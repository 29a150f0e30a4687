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

//! Grammar of bitcoin output descriptors together with structure-aware
//! generators producing random, grammar-valid descriptors for property-based
//! testing of descriptor parsers and serializers.
//!
//! General workflow:
//! ```text
//! GeneratorParams -> Strategy<OutputDescriptor> -> TestRunner -> OutputDescriptor
//! ```
//!
//! The grammar is encoded in the types themselves wherever possible: a
//! script-hash wrapper may only hold [`ShInner`] and a witness-script-hash
//! wrapper only [`WshInner`], while a key origin can only wrap an
//! [`OriginKey`]. Size limits of multisig groups depend on the nesting
//! [`Context`] and are verified with [`OutputDescriptor::check`].

// Coding conventions
#![recursion_limit = "256"]
#![deny(dead_code, missing_docs, warnings)]

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate log;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

pub mod arbitrary;
mod descriptor;

pub use arbitrary::{
    generate_output_descriptor, generate_pubkey_provider, BoundsError, GeneratorParams,
    MultisigBounds, Retry, RetryValueTree,
};
pub use descriptor::{
    Context, DescrTag, DeriveType, DoubleOrigin, GrammarError, HdKey, KeyOrigin, Multi,
    OriginKey, OutputDescriptor, PubKeyProvider, ShInner, WshInner, XpubCore,
    MAX_BARE_MULTI_KEYS, MAX_PUBKEYS_PER_MULTISIG, MAX_SH_MULTI_KEYS, MAX_WSH_MULTI_KEYS,
    MIN_MULTI_KEYS,
};
