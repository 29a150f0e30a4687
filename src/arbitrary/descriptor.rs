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

use bitcoin::{Network, Script};
use proptest::prelude::*;

use super::primitives::{address, script};
use super::pubkey::pubkey_provider;
use super::{BoundsError, GeneratorParams, MultisigBounds, Retry};
use crate::{Context, Multi, OutputDescriptor, ShInner, WshInner, MIN_MULTI_KEYS};

/// Multisig group with up to `max_keys` keys.
///
/// Fails if `max_keys` is below 2 or above the limit of the widest (`wsh`)
/// context.
pub fn multi(
    max_keys: usize,
    network: Option<Network>,
) -> Result<impl Strategy<Value = Multi>, BoundsError> {
    let max_keys = MultisigBounds::validate(Context::Wsh, max_keys)?;
    Ok(multi_within(max_keys, network))
}

// `max_keys` must be already validated.
fn multi_within(max_keys: usize, network: Option<Network>) -> impl Strategy<Value = Multi> {
    (MIN_MULTI_KEYS..=max_keys)
        .prop_flat_map(move |n| {
            (
                MIN_MULTI_KEYS..=n,
                prop::collection::vec(pubkey_provider(network), n),
                any::<bool>(),
            )
        })
        .prop_map(|(threshold, keys, sorted)| Multi {
            threshold,
            keys,
            sorted,
        })
}

/// Content of `wsh`: `pk`, `pkh` or multisig with up to `max_keys` keys.
///
/// Fails if `max_keys` is out of the bounds of the `wsh` context.
pub fn wsh_inner(
    max_keys: usize,
    network: Option<Network>,
) -> Result<impl Strategy<Value = WshInner>, BoundsError> {
    let max_keys = MultisigBounds::validate(Context::Wsh, max_keys)?;
    Ok(wsh_inner_within(max_keys, network))
}

fn wsh_inner_within(max_keys: usize, network: Option<Network>) -> impl Strategy<Value = WshInner> {
    prop_oneof![
        pubkey_provider(network).prop_map(WshInner::Pk),
        pubkey_provider(network).prop_map(WshInner::Pkh),
        multi_within(max_keys, network).prop_map(WshInner::Multi),
    ]
}

/// Content of `sh`: `wpkh`, `pk`, `pkh`, multisig or `wsh`
pub fn sh_inner(bounds: MultisigBounds, network: Option<Network>) -> impl Strategy<Value = ShInner> {
    prop_oneof![
        pubkey_provider(network).prop_map(ShInner::Wpkh),
        pubkey_provider(network).prop_map(ShInner::Pk),
        pubkey_provider(network).prop_map(ShInner::Pkh),
        multi_within(bounds.max_keys(Context::Sh), network).prop_map(ShInner::Multi),
        wsh_inner_within(bounds.max_keys(Context::Wsh), network).prop_map(ShInner::Wsh),
    ]
}

/// Non-empty script for `raw` descriptors
pub fn raw_script(max_attempts: u32) -> impl Strategy<Value = Script> {
    non_empty_script(script::script(), max_attempts)
}

fn non_empty_script<S>(source: S, max_attempts: u32) -> impl Strategy<Value = Script>
where
    S: Strategy<Value = Script>,
{
    Retry::new(source, "raw descriptor script is empty", max_attempts, |script: &Script| {
        !script.is_empty()
    })
}

/// Any output descriptor; each of the nine shapes is equally likely
pub fn output_descriptor(params: GeneratorParams) -> BoxedStrategy<OutputDescriptor> {
    let network = params.network();
    let bounds = params.bounds();
    prop_oneof![
        address::address(network).prop_map(OutputDescriptor::Addr),
        raw_script(params.max_script_attempts()).prop_map(OutputDescriptor::Raw),
        pubkey_provider(network).prop_map(OutputDescriptor::Pk),
        pubkey_provider(network).prop_map(OutputDescriptor::Pkh),
        pubkey_provider(network).prop_map(OutputDescriptor::Wpkh),
        pubkey_provider(network).prop_map(OutputDescriptor::Combo),
        multi_within(bounds.max_keys(Context::Top), network).prop_map(OutputDescriptor::Multi),
        sh_inner(bounds, network).prop_map(OutputDescriptor::Sh),
        wsh_inner_within(bounds.max_keys(Context::Wsh), network).prop_map(OutputDescriptor::Wsh),
    ]
    .boxed()
}

impl Arbitrary for OutputDescriptor {
    type Parameters = GeneratorParams;

    fn arbitrary_with(params: GeneratorParams) -> Self::Strategy { output_descriptor(params) }

    type Strategy = BoxedStrategy<Self>;
}
