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

//! Nesting rules and size limits of the descriptor grammar.

use std::convert::TryFrom;

use super::{DescrTag, Multi, OutputDescriptor, ShInner, WshInner};

/// Minimal number of keys (and minimal threshold) of a multisig group
pub const MIN_MULTI_KEYS: usize = 2;

/// Maximal number of keys in a bare (top-level) multisig
pub const MAX_BARE_MULTI_KEYS: usize = 3;

/// Maximal number of keys in a multisig placed directly into `sh`
pub const MAX_SH_MULTI_KEYS: usize = 15;

/// Maximal number of keys in a multisig placed into `wsh`
pub const MAX_WSH_MULTI_KEYS: usize = 20;

/// Consensus limit on the number of public keys in `OP_CHECKMULTISIG`
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// Grammar violations detected in a descriptor structure
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum GrammarError {
    /// raw descriptor must contain non-empty script
    EmptyScript,

    /// multisig must have at least 2 keys, while only {0} are present
    TooFewKeys(usize),

    /// multisig with {0} keys exceeds the limit of keys for the {1} context
    TooManyKeys(usize, Context),

    /// multisig threshold {0} is out of range for {1} keys
    ThresholdOutOfRange(usize, usize),

    /// {0} descriptor can't be nested inside sh
    IllegalShInner(DescrTag),

    /// {0} descriptor can't be nested inside wsh
    IllegalWshInner(DescrTag),
}

/// Position of a multisig group inside the descriptor, defining the maximal
/// number of keys it may contain.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display)]
pub enum Context {
    /// Bare script at the top level of the descriptor
    #[display("top-level")]
    Top,

    /// Redeem script directly under `sh`
    #[display("sh")]
    Sh,

    /// Witness script under `wsh`, including `sh(wsh(..))`
    #[display("wsh")]
    Wsh,
}

impl Context {
    /// Maximal number of keys a multisig may have in this context
    pub const fn max_multi_keys(self) -> usize {
        match self {
            Context::Top => MAX_BARE_MULTI_KEYS,
            Context::Sh => MAX_SH_MULTI_KEYS,
            Context::Wsh => MAX_WSH_MULTI_KEYS,
        }
    }
}

impl Multi {
    /// Checks multisig bounds for the given context
    pub fn check(&self, context: Context) -> Result<(), GrammarError> {
        let keys = self.keys.len();
        if keys < MIN_MULTI_KEYS {
            return Err(GrammarError::TooFewKeys(keys));
        }
        if keys > context.max_multi_keys() {
            return Err(GrammarError::TooManyKeys(keys, context));
        }
        if self.threshold < MIN_MULTI_KEYS || self.threshold > keys {
            return Err(GrammarError::ThresholdOutOfRange(self.threshold, keys));
        }
        Ok(())
    }
}

impl WshInner {
    /// Checks the witness script content
    pub fn check(&self) -> Result<(), GrammarError> {
        match self {
            WshInner::Pk(_) | WshInner::Pkh(_) => Ok(()),
            WshInner::Multi(multi) => multi.check(Context::Wsh),
        }
    }
}

impl ShInner {
    /// Checks the redeem script content
    pub fn check(&self) -> Result<(), GrammarError> {
        match self {
            ShInner::Wpkh(_) | ShInner::Pk(_) | ShInner::Pkh(_) => Ok(()),
            ShInner::Multi(multi) => multi.check(Context::Sh),
            ShInner::Wsh(inner) => inner.check(),
        }
    }
}

impl OutputDescriptor {
    /// Verifies that the descriptor follows the grammar rules which are not
    /// enforced by its type: non-empty raw scripts and multisig bounds for
    /// each nesting context.
    pub fn check(&self) -> Result<(), GrammarError> {
        match self {
            OutputDescriptor::Raw(script) if script.is_empty() => Err(GrammarError::EmptyScript),
            OutputDescriptor::Addr(_)
            | OutputDescriptor::Raw(_)
            | OutputDescriptor::Pk(_)
            | OutputDescriptor::Pkh(_)
            | OutputDescriptor::Wpkh(_)
            | OutputDescriptor::Combo(_) => Ok(()),
            OutputDescriptor::Multi(multi) => multi.check(Context::Top),
            OutputDescriptor::Sh(inner) => inner.check(),
            OutputDescriptor::Wsh(inner) => inner.check(),
        }
    }
}

impl TryFrom<OutputDescriptor> for WshInner {
    type Error = GrammarError;

    fn try_from(descriptor: OutputDescriptor) -> Result<Self, Self::Error> {
        match descriptor {
            OutputDescriptor::Pk(key) => Ok(WshInner::Pk(key)),
            OutputDescriptor::Pkh(key) => Ok(WshInner::Pkh(key)),
            OutputDescriptor::Multi(multi) => Ok(WshInner::Multi(multi)),
            OutputDescriptor::Addr(_)
            | OutputDescriptor::Raw(_)
            | OutputDescriptor::Wpkh(_)
            | OutputDescriptor::Combo(_)
            | OutputDescriptor::Sh(_)
            | OutputDescriptor::Wsh(_) => Err(GrammarError::IllegalWshInner(descriptor.tag())),
        }
    }
}

impl TryFrom<OutputDescriptor> for ShInner {
    type Error = GrammarError;

    fn try_from(descriptor: OutputDescriptor) -> Result<Self, Self::Error> {
        match descriptor {
            OutputDescriptor::Wpkh(key) => Ok(ShInner::Wpkh(key)),
            OutputDescriptor::Pk(key) => Ok(ShInner::Pk(key)),
            OutputDescriptor::Pkh(key) => Ok(ShInner::Pkh(key)),
            OutputDescriptor::Multi(multi) => Ok(ShInner::Multi(multi)),
            OutputDescriptor::Wsh(inner) => Ok(ShInner::Wsh(inner)),
            OutputDescriptor::Addr(_)
            | OutputDescriptor::Raw(_)
            | OutputDescriptor::Combo(_)
            | OutputDescriptor::Sh(_) => Err(GrammarError::IllegalShInner(descriptor.tag())),
        }
    }
}
