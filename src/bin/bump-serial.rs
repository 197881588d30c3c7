//! Increments the SOA serial of a zonefile in place.
//!
//! Only the serial token is rewritten; every other byte of the file is
//! written back exactly as it was read. Each failure cause has its own
//! exit code so scripts can tell them apart.

use std::process::exit;
use std::{env, fs, str};
use zonefile::Zonefile;

fn main() {
    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "bump-serial".into());
    let path = match (args.next(), args.next()) {
        (Some(path), None) => path,
        _ => {
            eprintln!("Usage: {} <path to zonefile>", prog);
            exit(1);
        }
    };

    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            exit(2);
        }
    };

    let mut zone = match Zonefile::load(&data) {
        Ok(zone) => zone,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            exit(3);
        }
    };

    let mut found = false;
    for entry in zone.entries_mut() {
        if entry.rtype().as_deref() != Some(&b"SOA"[..]) {
            continue;
        }
        let values = entry.values();
        if values.len() != 7 {
            eprintln!("wrong number of values on SOA line");
            exit(4);
        }
        let serial: u64 = match str::from_utf8(&values[2])
            .ok()
            .and_then(|s| s.parse().ok())
        {
            Some(serial) => serial,
            None => {
                eprintln!("could not parse serial");
                exit(5);
            }
        };
        let serial = (serial + 1).to_string();
        if let Err(err) = entry.set_value(2, serial.as_bytes()) {
            eprintln!("could not update serial: {}", err);
            exit(5);
        }
        found = true;
        break;
    }
    if !found {
        eprintln!("could not find SOA entry");
        exit(6);
    }

    if let Err(err) = fs::write(&path, zone.save()) {
        eprintln!("{}: {}", path, err);
        exit(7);
    }
}
