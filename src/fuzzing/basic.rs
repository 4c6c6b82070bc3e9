use std::collections::HashMap;

use super::*;
use crate::fmt::Line;
use crate::multibit::DEFAULT_STRIDE;
use itertools::Itertools;

type Input = (Vec<(TestPrefix, u8)>, Vec<TestAddr>);

fn routes(list: &[(TestPrefix, u8)]) -> impl DoubleEndedIterator<Item = (Ipv4Net, u8)> + '_ {
    list.iter().map(|(p, t)| (p.0, *t))
}

qc!(binary, _binary);
fn _binary((list, addrs): Input) -> bool {
    let trie: BinaryTrie<u8> = routes(&list).collect();
    agrees_with_linear(&trie, &list, &addrs)
}

qc!(path_compressed, _path_compressed);
fn _path_compressed((list, addrs): Input) -> bool {
    let trie: PathCompressedTrie<u8> = routes(&list).collect();
    agrees_with_linear(&trie, &list, &addrs)
}

qc!(multibit_stride_one, _multibit_stride_one);
fn _multibit_stride_one((list, addrs): Input) -> bool {
    let mut trie = MultibitTrie::with_stride(1).unwrap();
    trie.extend(routes(&list));
    agrees_with_linear(&trie, &list, &addrs)
}

qc!(multibit_aligned, _multibit_aligned);
fn _multibit_aligned((list, addrs): Input) -> bool {
    let list = list
        .into_iter()
        .map(|(p, t)| (p.aligned(4), t))
        .collect::<Vec<_>>();
    let mut trie = MultibitTrie::with_stride(4).unwrap();
    trie.extend(routes(&list));
    agrees_with_linear(&trie, &list, &addrs)
}

/// Shorten every prefix to a multiple of `stride` bits, so that a multibit trie of that stride
/// gives each prefix a node of its own.
fn aligned(list: Vec<(TestPrefix, u8)>, stride: u8) -> Vec<(TestPrefix, u8)> {
    list.into_iter().map(|(p, t)| (p.aligned(stride), t)).collect()
}

qc!(len_counts_distinct, _len_counts_distinct);
fn _len_counts_distinct((list, _): Input) -> bool {
    let distinct = list.iter().map(|(p, _)| p).unique().count();
    let binary: BinaryTrie<u8> = routes(&list).collect();
    let compressed: PathCompressedTrie<u8> = routes(&list).collect();
    let linear: LinearSearchLookup<u8> = routes(&list).collect();

    let list = aligned(list, DEFAULT_STRIDE);
    let aligned_distinct = list.iter().map(|(p, _)| p).unique().count();
    let multibit: MultibitTrie<u8> = routes(&list).collect();

    binary.len() == distinct
        && compressed.len() == distinct
        && linear.len() == list.len()
        && multibit.len() == aligned_distinct
}

fn sorted_routes(iter: Iter<'_, u8>) -> Vec<(Ipv4Net, u8)> {
    iter.map(|(p, t)| (*p, *t)).sorted().collect()
}

fn last_inserts(list: &[(TestPrefix, u8)]) -> Vec<(Ipv4Net, u8)> {
    let hmap: HashMap<Ipv4Net, u8> = routes(list).collect();
    hmap.into_iter().sorted().collect()
}

qc!(iter_yields_last_insert, _iter_yields_last_insert);
fn _iter_yields_last_insert((list, _): Input) -> bool {
    let binary: BinaryTrie<u8> = routes(&list).collect();
    let binary_ok = sorted_routes(binary.iter()) == last_inserts(&list);

    let list = aligned(list, DEFAULT_STRIDE);
    let multibit: MultibitTrie<u8> = routes(&list).collect();
    binary_ok && sorted_routes(multibit.iter()) == last_inserts(&list)
}

qc!(insertion_order, _insertion_order);
fn _insertion_order((list, addrs): Input) -> bool {
    let list = list
        .into_iter()
        .unique_by(|(p, _)| *p)
        .collect::<Vec<_>>();
    let forward: BinaryTrie<u8> = routes(&list).collect();
    let backward: BinaryTrie<u8> = routes(&list).rev().collect();
    let compressed: PathCompressedTrie<u8> = routes(&list).rev().collect();
    let binary_ok = probes(&list, &addrs).into_iter().all(|a| {
        forward.lookup_addr(a) == backward.lookup_addr(a)
            && compressed.lookup_addr(a) == forward.lookup_addr(a)
    });

    let list = aligned(list, DEFAULT_STRIDE)
        .into_iter()
        .unique_by(|(p, _)| *p)
        .collect::<Vec<_>>();
    let forward: MultibitTrie<u8> = routes(&list).collect();
    let backward: MultibitTrie<u8> = routes(&list).rev().collect();
    let multibit_ok = probes(&list, &addrs)
        .into_iter()
        .all(|a| forward.lookup_addr(a) == backward.lookup_addr(a));

    binary_ok && multibit_ok && agrees_with_linear(&backward, &list, &addrs)
}

qc!(compress_keeps_routes, _compress_keeps_routes);
fn _compress_keeps_routes((list, _): Input) -> bool {
    let mut trie: PathCompressedTrie<u8> = routes(&list).collect();
    let before = trie.iter().map(|(p, t)| (*p, *t)).sorted().collect::<Vec<_>>();
    let fused = trie.compress();
    let after = trie.iter().map(|(p, t)| (*p, *t)).sorted().collect::<Vec<_>>();
    // a second pass finds nothing left to fuse
    before == after && trie.len() == before.len() && (fused == 0 || trie.compress() == 0)
}

qc!(reinsert_after_compress, _reinsert_after_compress);
fn _reinsert_after_compress((list, addrs): Input) -> bool {
    let mut trie: PathCompressedTrie<u8> = routes(&list).collect();
    trie.compress();
    trie.extend(routes(&list));
    let unfolded = trie
        .lines()
        .all(|l| !matches!(l, Line::Node { skip: Some(s), .. } if s > 0));
    unfolded && agrees_with_linear(&trie, &list, &addrs)
}
