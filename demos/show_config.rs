//! Connect to a Nanosyncs and print its identity and current configuration.

use anyhow::Result;
use nanosync_midi::{Error, NanoSync, transport};

fn main() -> Result<()> {
    env_logger::init();

    let mut device = match NanoSync::connect() {
        Ok(device) => device,
        Err(Error::PortNotFound(fragment)) => {
            eprintln!("no MIDI port matching {fragment:?} found; ports visible to this host:");
            let ports = transport::list_ports()?;
            for name in &ports.inputs {
                eprintln!("  in:  {name}");
            }
            for name in &ports.outputs {
                eprintln!("  out: {name}");
            }
            std::process::exit(1);
        }
        Err(other) => return Err(other.into()),
    };

    println!("serial number: {}", device.identity().serial_number);
    println!("firmware version: {}", device.identity().firmware_version);
    println!();
    for (name, value) in device.describe_current()? {
        println!("{name}: {value}");
    }
    println!();
    println!("refresh rate: {}", device.refresh_rate()?);

    device.close();
    Ok(())
}
