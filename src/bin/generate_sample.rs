use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic CORD-19 style `metadata.csv` for trying the explorer.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file
    #[arg(short, long, default_value = "metadata.csv")]
    output: PathBuf,

    /// Number of papers to generate
    #[arg(short, long, default_value_t = 25_000)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const HEADER: [&str; 9] = [
    "cord_uid",
    "sha",
    "source_x",
    "title",
    "doi",
    "abstract",
    "publish_time",
    "authors",
    "journal",
];

const SOURCES: &[&str] = &["PMC", "Medline", "WHO", "Elsevier", "MedRxiv", "BioRxiv", "ArXiv"];

const JOURNALS: &[&str] = &[
    "PLoS One",
    "Nature",
    "The Lancet",
    "BMJ",
    "Viruses",
    "Journal of Virology",
    "Emerging Infectious Diseases",
    "Sci Rep",
    "Cell",
    "Science",
    "J Med Virol",
    "Clinical Infectious Diseases",
    "Eurosurveillance",
];

const TOPICS: &[&str] = &[
    "SARS-CoV-2",
    "COVID-19",
    "coronavirus",
    "MERS-CoV",
    "influenza",
    "ACE2 receptor",
    "spike protein",
    "vaccine candidates",
    "antiviral therapy",
    "viral transmission",
    "public health response",
];

const PATTERNS: &[&str] = &[
    "Clinical characteristics of {} patients",
    "Epidemiology of {} in Wuhan",
    "Structural analysis of {}",
    "A review of {} and emerging threats",
    "Modelling {} outbreak dynamics",
    "Immune response to {} infection",
    "Genomic surveillance of {}",
];

const SURNAMES: &[&str] = &[
    "Wang", "Smith", "Zhang", "Garcia", "Müller", "Rossi", "Kim", "Nguyen", "Patel", "Silva",
];

const ABSTRACT_WORDS: &[&str] = &[
    "we", "report", "cases", "patients", "infection", "respiratory", "virus", "study", "results",
    "analysis", "clinical", "data", "transmission", "outbreak", "cohort", "samples", "model",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next_u64() % 100 < percent
    }

    /// Skewed pick: earlier entries come up more often.
    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        let a = self.below(items.len());
        let b = self.below(items.len());
        items[a.min(b)]
    }
}

fn publish_time(rng: &mut SimpleRng) -> String {
    if rng.chance(3) {
        return String::new();
    }
    let year = match rng.below(10) {
        0 => 2015 + rng.below(4),
        1 | 2 => 2019,
        3..=6 => 2020,
        _ => 2021,
    };
    match rng.below(10) {
        // Some releases only carry the year.
        0 => year.to_string(),
        1 => "Spring".to_string(),
        _ => format!("{year}-{:02}-{:02}", 1 + rng.below(12), 1 + rng.below(28)),
    }
}

fn paper_row(rng: &mut SimpleRng, i: usize) -> Vec<String> {
    let title = if rng.chance(2) {
        String::new()
    } else {
        PATTERNS[rng.below(PATTERNS.len())].replace("{}", rng.pick(TOPICS))
    };
    let abstract_text = if rng.chance(20) {
        String::new()
    } else {
        (0..20 + rng.below(200))
            .map(|_| ABSTRACT_WORDS[rng.below(ABSTRACT_WORDS.len())])
            .collect::<Vec<_>>()
            .join(" ")
    };
    let authors = (0..1 + rng.below(5))
        .map(|_| {
            let surname = SURNAMES[rng.below(SURNAMES.len())];
            let initial = (b'A' + rng.below(26) as u8) as char;
            format!("{surname}, {initial}.")
        })
        .collect::<Vec<_>>()
        .join("; ");
    let journal = if rng.chance(15) {
        String::new()
    } else {
        rng.pick(JOURNALS).to_string()
    };

    vec![
        format!("{:08x}", rng.next_u64() as u32),
        String::new(),
        rng.pick(SOURCES).to_string(),
        title,
        format!("10.1000/cord.{i}"),
        abstract_text,
        publish_time(rng),
        authors,
        journal,
    ]
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record(HEADER).context("writing header")?;
    for i in 0..args.rows {
        writer
            .write_record(paper_row(&mut rng, i))
            .with_context(|| format!("writing row {i}"))?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {} papers to {}", args.rows, args.output.display());
    Ok(())
}
