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

//! Structure-aware random generation of descriptors for property tests.
//!
//! Each grammar rule is a separate strategy, so the nesting restrictions hold
//! by construction rather than by rejecting invalid samples:
//! ```text
//! output_descriptor -> addr | raw | pk | pkh | wpkh | combo | multi(3)
//!                    | sh(sh_inner) | wsh(wsh_inner)
//! sh_inner          -> wpkh | pk | pkh | multi(15) | wsh(wsh_inner)
//! wsh_inner         -> pk | pkh | multi(20)
//! ```
//!
//! [`OutputDescriptor`] and [`PubKeyProvider`] implement proptest
//! [`Arbitrary`](proptest::arbitrary::Arbitrary), so they can be used with
//! `any::<OutputDescriptor>()` or `any_with::<OutputDescriptor>(params)`.

mod descriptor;
mod params;
pub mod primitives;
mod pubkey;
mod retry;

use bitcoin::Network;
use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::{Reason, TestRunner};

pub use descriptor::{multi, output_descriptor, raw_script, sh_inner, wsh_inner};
pub use params::{BoundsError, GeneratorParams, MultisigBounds, DEFAULT_SCRIPT_ATTEMPTS};
pub use pubkey::{const_key, derive_type, hd_key, origin_key, origin_provider, pubkey_provider};
pub use retry::{Retry, RetryValueTree};

use crate::{OutputDescriptor, PubKeyProvider};

/// Draws a single output descriptor from the runner's random source.
///
/// Fails only if a `raw` descriptor was chosen and no non-empty script was
/// drawn within the configured number of attempts.
pub fn generate_output_descriptor(
    runner: &mut TestRunner,
    network: Option<Network>,
) -> Result<OutputDescriptor, Reason> {
    let params = GeneratorParams::default().with_network(network);
    let descriptor = output_descriptor(params).new_tree(runner)?.current();
    trace!("generated {} descriptor: {:?}", descriptor.tag(), descriptor);
    Ok(descriptor)
}

/// Draws a single key provider from the runner's random source.
pub fn generate_pubkey_provider(
    runner: &mut TestRunner,
    network: Option<Network>,
) -> Result<PubKeyProvider, Reason> {
    let provider = pubkey_provider(network).new_tree(runner)?.current();
    trace!("generated key provider: {:?}", provider);
    Ok(provider)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entry_points() {
        let mut runner = TestRunner::deterministic();
        for _ in 0..500 {
            let descriptor = generate_output_descriptor(&mut runner, Some(Network::Signet)).unwrap();
            assert_eq!(descriptor.check(), Ok(()));
            if let OutputDescriptor::Addr(addr) = descriptor {
                assert_eq!(addr.network, Network::Signet);
            }

            let provider = generate_pubkey_provider(&mut runner, Some(Network::Signet)).unwrap();
            assert!(provider.network().map(|n| n == Network::Signet).unwrap_or(true));
        }
    }

    #[test]
    fn same_seed_same_descriptors() {
        let mut first = TestRunner::deterministic();
        let mut second = TestRunner::deterministic();
        for _ in 0..50 {
            assert_eq!(
                generate_output_descriptor(&mut first, None).unwrap(),
                generate_output_descriptor(&mut second, None).unwrap()
            );
        }
    }
}
