//! Change one Nanosyncs setting by field index and label.
//!
//! Usage: `cargo run --example set_field -- <field-index> <label>`, for
//! example `cargo run --example set_field -- 4 "25 fps"`.

use anyhow::{Context, Result, bail};
use nanosync_midi::{ApplyOutcome, NanoSync, catalog};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(index), Some(label)) = (args.next(), args.next()) else {
        bail!("usage: set_field <field-index> <label>");
    };
    let index: usize = index.parse().context("field index must be an integer")?;
    let def = catalog::field_def(index)?;

    let mut device = NanoSync::connect()?;
    match device.set_field_by_label(index, &label)? {
        ApplyOutcome::Applied => println!("set {} to {label}", def.name),
        ApplyOutcome::NoChangeNeeded => println!("{} was already {label}", def.name),
        ApplyOutcome::Uncertain => {
            println!("no observed change in {} after retries; the device may already have held the value", def.name);
        }
    }

    device.close();
    Ok(())
}
