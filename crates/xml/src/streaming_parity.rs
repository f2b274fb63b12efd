//! Parity between one-shot parses and parses fed through arbitrary read
//! boundaries, including boundaries inside multi-byte characters.
//!
//! Set `XML_STREAMING_PARITY_SEEDS` to raise the number of random plans per
//! case.

use crate::test_harness::{
    ChunkPlan, default_chunk_plans, deterministic_chunk_plans, run_chunked, run_full,
};
use crate::tree_snapshot::{TreeSnapshotOptions, compare_trees};

const DEFAULT_SEEDS: usize = 32;
const SEED_MIX: u64 = 0x9e3779b97f4a7c15;

const CASES: &[&str] = &[
    "<item key=\"1\" />",
    "<root>\n<child a=\"x\" b=\"y\" />\n</root>\n",
    "<größe wert=\"naïve ☃\">\r\n\t<kind name=\"😀\" />\r\n</größe>\r\n",
    "// lead\n<cfg> /* note\n spanning */\n<p k=\"a/b\" />\n</cfg>",
    "<a>\n<b>\n<c d=\"é\" />\n</b>\n</a>\n trailing text after root",
    "<note>\nit's skipped\n<v text=\"one\r\ntwo\nthree\" />\n</note>\n",
];

#[test]
fn default_plans_match_full_parse() {
    for (case_idx, input) in CASES.iter().enumerate() {
        for plan in default_chunk_plans() {
            assert_parity(case_idx, input, plan);
        }
    }
}

#[test]
fn deterministic_plans_match_full_parse() {
    for (case_idx, input) in CASES.iter().enumerate() {
        for plan in deterministic_chunk_plans(input) {
            assert_parity(case_idx, input, &plan);
        }
    }
}

#[test]
fn random_plans_match_full_parse() {
    let seeds = seed_count();
    for (case_idx, input) in CASES.iter().enumerate() {
        let base_seed = 0x786d6c5f70617273 ^ case_idx as u64;
        for i in 0..seeds {
            let mut rng = LcgRng::new(base_seed ^ SEED_MIX.wrapping_mul(i as u64 + 1));
            let plan = ChunkPlan::boundaries(random_boundaries(&mut rng, input.len()));
            assert_parity(case_idx, input, &plan);
        }
    }
}

#[test]
fn errors_match_under_chunking() {
    let input = "<a>\n<b></c></a>";
    let full = run_full(input).unwrap_err().to_string();
    for plan in default_chunk_plans() {
        let chunked = run_chunked(input, plan).unwrap_err().to_string();
        assert_eq!(full, chunked, "plan: {plan}");
    }
}

fn assert_parity(case_idx: usize, input: &str, plan: &ChunkPlan) {
    let full = run_full(input).unwrap_or_else(|err| panic!("case {case_idx} full parse: {err}"));
    let chunked = run_chunked(input, plan)
        .unwrap_or_else(|err| panic!("case {case_idx} chunked parse ({plan}): {err}"));
    if let Err(mismatch) = compare_trees(&full, &chunked, TreeSnapshotOptions::default()) {
        panic!("case {case_idx} plan {plan}\n{mismatch}");
    }
}

fn seed_count() -> usize {
    std::env::var("XML_STREAMING_PARITY_SEEDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SEEDS)
}

fn random_boundaries(rng: &mut LcgRng, len: usize) -> Vec<usize> {
    if len < 2 {
        return Vec::new();
    }
    let count = rng.gen_range(len.min(12)) + 1;
    (0..count).map(|_| rng.gen_range(len - 1) + 1).collect()
}

struct LcgRng(u64);

impl LcgRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range(&mut self, upper: usize) -> usize {
        (self.next_u64() >> 33) as usize % upper
    }
}
