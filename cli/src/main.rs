//! Author(s):
//! - Christofer Nolander (cnol@kth.se)
//!
//!
//! Command line tool for sizing and checking packer configurations.
//!
//! - `inspect` prints the bit budget of every field in a JSON schema.
//! - `stress` writes a long run of random bit widths and reads them back.
//! - `roundtrip` packs random samples through every field of a schema and reports the error.

#[macro_use]
extern crate anyhow;

mod check;
mod options;
mod schema;

use bits::{BitReader, BitWriter, ReadBits, WriteBits, MAX_BITS_PER_CALL};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::Path;
use structopt::StructOpt;

use options::{Command, Options};
use schema::Schema;

type Result<T> = anyhow::Result<T>;

fn main() -> Result<()> {
    let options = Options::from_args();

    setup_logger(&options);

    match options.command {
        Command::Inspect { schema } => inspect(&schema),
        Command::Stress { seed, count } => stress(seed, count),
        Command::Roundtrip {
            schema,
            seed,
            samples,
        } => roundtrip(&schema, seed, samples),
    }
}

/// Setup logging facilities.
fn setup_logger(options: &Options) {
    env_logger::Builder::new()
        .filter_level(options.log_level)
        .init();
}

fn inspect(path: &Path) -> Result<()> {
    let fields = Schema::load(path)?.build()?;

    let width = fields
        .iter()
        .map(|field| field.name.len())
        .max()
        .unwrap_or(0)
        .max("field".len());

    println!("{:<width$}  {:<14}  {:>8}", "field", "kind", "max bits", width = width);

    let mut total = 0;
    for field in &fields {
        let bits = field.packer.max_bit_count();
        let marker = if field.packer.is_variable() { "*" } else { "" };
        println!(
            "{:<width$}  {:<14}  {:>8}{}",
            field.name,
            field.packer.kind(),
            bits,
            marker,
            width = width
        );
        total += bits as usize;
    }

    println!();
    println!("total: {} bits ({} bytes)", total, (total + 7) / 8);
    if fields.iter().any(|field| field.packer.is_variable()) {
        println!("* size depends on the value, the largest case is shown");
    }

    log::info!("inspected {} fields in [{}]", fields.len(), path.display());

    Ok(())
}

fn stress(seed: u64, count: usize) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);

    let values: Vec<(u32, u32)> = (0..count)
        .map(|_| {
            let width = rng.gen_range(1, MAX_BITS_PER_CALL + 1);
            let value = rng.gen::<u32>() & (u32::max_value() >> (32 - width));
            (value, width)
        })
        .collect();

    let bit_len: usize = values.iter().map(|&(_, width)| width as usize).sum();

    let mut writer = BitWriter::with_capacity((bit_len + 7) / 8);
    for &(value, width) in &values {
        writer.write(value, width)?;
    }
    let bytes = writer.finish()?;

    log::info!("wrote {} values in {} bits ({} bytes)", count, bit_len, bytes.len());

    let mut reader = BitReader::with_bit_len(&bytes, bit_len)?;
    for (i, &(expected, width)) in values.iter().enumerate() {
        let actual = reader.read(width)?;
        if actual != expected {
            return Err(anyhow!(
                "value {} of width {} was read back as {:#x}, expected {:#x}",
                i,
                width,
                actual,
                expected
            ));
        }
    }

    if reader.remaining_bits() != 0 {
        return Err(anyhow!("{} bits left after reading", reader.remaining_bits()));
    }

    println!("ok: {} values, {} bits", count, bit_len);
    Ok(())
}

fn roundtrip(path: &Path, seed: u64, samples: usize) -> Result<()> {
    let fields = Schema::load(path)?.build()?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut failed = Vec::new();
    for field in &fields {
        let report = check::check_field(&field.packer, &mut rng, samples)?;

        println!(
            "{}: worst error {}, {}/{} within precision",
            field.name,
            report.worst_error,
            report.samples - report.failures,
            report.samples
        );

        if report.failures > 0 {
            log::warn!("field `{}` failed {} samples", field.name, report.failures);
            failed.push(field.name.as_str());
        }
    }

    if !failed.is_empty() {
        return Err(anyhow!("fields outside of precision: {}", failed.join(", ")));
    }

    log::info!("all {} fields are within precision", fields.len());
    Ok(())
}
