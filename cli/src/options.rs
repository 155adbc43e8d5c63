//! Author(s):
//! - Christofer Nolander (cnol@kth.se)

use std::path::PathBuf;
use structopt::StructOpt;

// Define some options that can be configured with command line arguments.
#[derive(StructOpt)]
pub struct Options {
    /// The verbosity of the logging.
    #[structopt(long, default_value = "info", global = true)]
    pub log_level: log::LevelFilter,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// Print how many bits every field of a schema occupies.
    Inspect {
        /// Path to the JSON schema.
        #[structopt(parse(from_os_str))]
        schema: PathBuf,
    },

    /// Write random values of random widths and check that all of them are read back.
    Stress {
        /// Seed for the random number generator.
        #[structopt(long, default_value = "0")]
        seed: u64,

        /// The number of values to write.
        #[structopt(long, default_value = "100000")]
        count: usize,
    },

    /// Pack random samples through every field of a schema and report the largest error.
    Roundtrip {
        /// Path to the JSON schema.
        #[structopt(parse(from_os_str))]
        schema: PathBuf,

        /// Seed for the random number generator.
        #[structopt(long, default_value = "0")]
        seed: u64,

        /// The number of samples per field, in addition to zero.
        #[structopt(long, default_value = "1000")]
        samples: usize,
    },
}
