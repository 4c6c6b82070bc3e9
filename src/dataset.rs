//! Reproducible random routing tables and lookup workloads.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use log::debug;
use rand::prelude::*;

/// A set of distinct prefixes and a list of addresses to look up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    /// Distinct prefixes with their host bits cleared, in generation order.
    pub prefixes: Vec<Ipv4Net>,
    /// Addresses to look up.
    pub lookups: Vec<Ipv4Addr>,
}

impl Dataset {
    /// Pair every prefix with a next-hop derived from it, `NH_<prefix>`.
    pub fn routes(&self) -> impl Iterator<Item = (Ipv4Net, String)> + '_ {
        self.prefixes.iter().map(|p| (*p, format!("NH_{p}")))
    }
}

/// Draw an address whose first octet is unicast (`1..=223`) and whose other octets are uniform.
fn random_addr(rng: &mut StdRng) -> Ipv4Addr {
    Ipv4Addr::new(rng.gen_range(1..=223), rng.gen(), rng.gen(), rng.gen())
}

/// Generate `num_prefixes` distinct prefixes of length 8 to 30 and `num_lookups` addresses. The
/// same `seed` always yields the same dataset.
///
/// ```
/// # use ip_lookup::dataset::generate;
/// let a = generate(42, 100, 10);
/// assert_eq!(a.prefixes.len(), 100);
/// assert_eq!(a.lookups.len(), 10);
/// assert_eq!(a, generate(42, 100, 10));
/// ```
pub fn generate(seed: u64, num_prefixes: usize, num_lookups: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(num_prefixes);
    let mut prefixes = Vec::with_capacity(num_prefixes);
    while prefixes.len() < num_prefixes {
        let len = rng.gen_range(8..=30);
        let Ok(prefix) = Ipv4Net::new(random_addr(&mut rng), len) else {
            continue;
        };
        let prefix = prefix.trunc();
        if seen.insert(prefix) {
            prefixes.push(prefix);
        }
    }
    let lookups = (0..num_lookups).map(|_| random_addr(&mut rng)).collect();
    debug!("generated {num_prefixes} prefixes and {num_lookups} lookups from seed {seed}");
    Dataset { prefixes, lookups }
}
