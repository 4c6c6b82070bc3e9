//! Module for testing using fuzzing (quickcheck)
#![allow(clippy::type_complexity)]

use std::fmt::Debug;
use std::net::Ipv4Addr;

use crate::*;
use ipnet::Ipv4Net;
use quickcheck::{Arbitrary, Gen};

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 2000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = Gen::new(gen_size);

    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        if !f(input.clone()) {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        if !f(i.clone()) {
            shrink_failure(f, i)
        }
    }
    // all shrunken inputs pass, so `input` is minimal
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

mod basic;

/// First octets the generated keys are drawn from, so that prefixes nest and overlap.
const FIRST_OCTETS: [u8; 4] = [0, 10, 128, 192];

fn arbitrary_repr(g: &mut Gen) -> u32 {
    let first = *g.choose(&FIRST_OCTETS).unwrap_or(&10);
    (u32::from(first) << 24) | (u32::arbitrary(g) & 0x00ff_ffff)
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
struct TestPrefix(Ipv4Net);

impl TestPrefix {
    fn new(repr: u32, len: u8) -> Self {
        Self(Ipv4Net::new(Ipv4Addr::from(repr), len).unwrap().trunc())
    }

    /// The same prefix, shortened to a multiple of `stride` bits.
    fn aligned(self, stride: u8) -> Self {
        let len = self.0.prefix_len() / stride * stride;
        Self::new(self.0.network().into(), len)
    }
}

impl Debug for TestPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Arbitrary for TestPrefix {
    fn arbitrary(g: &mut Gen) -> Self {
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0,
                1, 2, 3, 4, 5, 6, 7,
                8, 8, 8, 8,
                9, 9, 10, 10, 11, 12, 13, 14, 15,
                16, 16, 16,
                17, 18, 19, 20, 21, 22, 23,
                24, 24, 24,
                25, 26, 27, 28, 29, 30, 31,
                32, 32,
            ])
            .unwrap_or(&8);
        Self::new(arbitrary_repr(g), len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self.0.prefix_len() {
            0 => quickcheck::empty_shrinker(),
            len => quickcheck::single_shrinker(Self::new(self.0.network().into(), len - 1)),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy)]
struct TestAddr(Ipv4Addr);

impl Debug for TestAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Arbitrary for TestAddr {
    fn arbitrary(g: &mut Gen) -> Self {
        if *g.choose(&[true, true, true, false]).unwrap_or(&true) {
            Self(arbitrary_repr(g).into())
        } else {
            Self(u32::arbitrary(g).into())
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(u32::from(self.0).shrink().map(|x| Self(x.into())))
    }
}

/// The addresses to probe for a set of routes: the given ones, plus the first and last address
/// of every prefix.
fn probes(routes: &[(TestPrefix, u8)], addrs: &[TestAddr]) -> Vec<Ipv4Addr> {
    addrs
        .iter()
        .map(|a| a.0)
        .chain(
            routes
                .iter()
                .flat_map(|(p, _)| [p.0.network(), p.0.broadcast()]),
        )
        .collect()
}

/// Check that `engine` returns the same next-hop as the linear search for every probe.
fn agrees_with_linear<L: IpLookup<u8>>(
    engine: &L,
    routes: &[(TestPrefix, u8)],
    addrs: &[TestAddr],
) -> bool {
    let oracle: LinearSearchLookup<u8> = routes.iter().map(|(p, t)| (p.0, *t)).collect();
    probes(routes, addrs)
        .into_iter()
        .all(|a| engine.lookup_addr(a) == oracle.lookup_addr(a))
}
