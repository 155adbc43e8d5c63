use bits::{BitReader, BitWriter, Error, ReadBits, WriteBits};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_fields(seed: u64, count: usize) -> Vec<(u32, u32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let width = rng.gen_range(1, 33);
            let value = rng.gen::<u32>() & (u32::max_value() >> (32 - width));
            (value, width)
        })
        .collect()
}

#[test]
fn interleaved_widths_are_recovered_exactly() {
    for seed in 0..8 {
        let fields = random_fields(seed, 2000);
        let total: usize = fields.iter().map(|&(_, width)| width as usize).sum();

        let mut writer = BitWriter::with_capacity((total + 7) / 8);
        for &(value, width) in &fields {
            writer.write(value, width).unwrap();
        }
        assert_eq!(writer.bit_len(), total);

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), (total + 7) / 8);

        let mut reader = BitReader::with_bit_len(&bytes, total).unwrap();
        for (i, &(value, width)) in fields.iter().enumerate() {
            assert_eq!(
                reader.read(width).unwrap(),
                value,
                "field {} ({} bits) differs with seed {}",
                i,
                width,
                seed
            );
        }
        assert_eq!(reader.remaining_bits(), 0);
    }
}

#[test]
fn reset_writer_can_be_reused() {
    let mut writer = BitWriter::with_capacity(512);

    for seed in 0..4 {
        let fields = random_fields(seed, 100);

        writer.reset().unwrap();
        for &(value, width) in &fields {
            writer.write(value, width).unwrap();
        }

        let bytes = writer.to_vec().unwrap();
        let mut reader = BitReader::new(&bytes);
        for &(value, width) in &fields {
            assert_eq!(reader.read(width).unwrap(), value);
        }
    }
}

#[test]
fn writer_never_grows() {
    let mut writer = BitWriter::with_capacity(4);
    let mut written = 0;

    let error = loop {
        match writer.write(0x5, 3) {
            Ok(()) => written += 3,
            Err(error) => break error,
        }
    };

    assert_eq!(written, 63);
    assert_eq!(
        error,
        Error::Overflow {
            requested: 3,
            remaining: 1
        }
    );
    assert_eq!(writer.capacity_bits(), 64);
}
