use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ip_lookup::dataset::{generate, Dataset};
use ip_lookup::*;

const SEED: u64 = 42;
const NUM_PREFIXES: usize = 1_000;
const NUM_LOOKUPS: usize = 10_000;

struct Report {
    name: &'static str,
    total_secs: f64,
    unmatched: usize,
    disagreements: usize,
}

fn measure<L: IpLookup<String>>(
    name: &'static str,
    engine: &L,
    oracle: &LinearSearchLookup<String>,
    data: &Dataset,
) -> Report {
    let start = Instant::now();
    let results: Vec<Option<&String>> = data
        .lookups
        .iter()
        .map(|addr| engine.lookup_addr(*addr))
        .collect();
    let total_secs = start.elapsed().as_secs_f64();

    let unmatched = results.iter().filter(|r| r.is_none()).count();
    let disagreements = data
        .lookups
        .iter()
        .zip(&results)
        .filter(|(addr, result)| oracle.lookup_addr(**addr) != **result)
        .count();
    Report {
        name,
        total_secs,
        unmatched,
        disagreements,
    }
}

fn write_dump<S: TrieStructure<String>>(
    trie: &S,
    dir: &Path,
    file: &str,
) -> std::io::Result<()> {
    let path = dir.join(file);
    std::fs::write(&path, trie.dump().to_string())?;
    println!("wrote {}", path.display());
    Ok(())
}

fn main() -> std::io::Result<()> {
    let dump_dir = std::env::args().nth(1).map(PathBuf::from);

    let data = generate(SEED, NUM_PREFIXES, NUM_LOOKUPS);

    let linear: LinearSearchLookup<String> = data.routes().collect();
    let binary: BinaryTrie<String> = data.routes().collect();
    let multibit: MultibitTrie<String> = data.routes().collect();
    let mut compressed: PathCompressedTrie<String> = data.routes().collect();
    let fused = compressed.compress();

    let reports = [
        measure("Linear Search", &linear, &linear, &data),
        measure(BinaryTrie::<String>::NAME, &binary, &linear, &data),
        measure(MultibitTrie::<String>::NAME, &multibit, &linear, &data),
        measure(PathCompressedTrie::<String>::NAME, &compressed, &linear, &data),
    ];

    println!(
        "Benchmark Results ({} prefixes, {} lookups, {fused} nodes fused):",
        data.prefixes.len(),
        data.lookups.len()
    );
    for report in &reports {
        println!("{}:", report.name);
        println!("  Total Time: {:.4} seconds", report.total_secs);
        println!(
            "  Average Lookup Time: {:.9} seconds",
            report.total_secs / data.lookups.len().max(1) as f64
        );
        println!("  Unmatched Lookups: {}", report.unmatched);
        println!("  Disagreements with Linear Search: {}", report.disagreements);
    }

    // spot check on a fixed address
    let probe = Ipv4Addr::new(10, 0, 0, 1);
    println!(
        "{probe} -> {}",
        binary.lookup_addr(probe).map_or("no route", String::as_str)
    );

    if let Some(dir) = dump_dir {
        std::fs::create_dir_all(&dir)?;
        write_dump(&binary, &dir, "binary_trie_visualization.txt")?;
        write_dump(&multibit, &dir, "multibit_trie_visualization.txt")?;
        write_dump(&compressed, &dir, "path_compressed_trie_visualization.txt")?;
    }
    Ok(())
}
