//! Common test utilities for integration tests.
//!
//! This module provides fixture builders for testing the cfgtree library.

use cfgtree::{ConfigTree, Registration};

/// Creates a temporary directory for testing.
///
/// The directory will be automatically cleaned up when the returned
/// `TempDir` is dropped.
#[allow(dead_code)]
pub fn create_temp_dir() -> std::io::Result<tempfile::TempDir> {
    tempfile::tempdir()
}

/// A small instrument configuration with namespace-wide readout defaults and
/// two boards, one of which overrides the address.
#[allow(dead_code)]
pub fn instrument_fixture() -> ConfigTree {
    let cfg = ConfigTree::new();
    cfg.register_with("instrument.name", "MEC", Registration::new().comment("instrument"))
        .unwrap();
    cfg.register_with("roaches.ip", "10.0.0.1", Registration::new().comment("board address"))
        .unwrap();
    cfg.register("roaches.port", 50000).unwrap();
    cfg.register("roaches.r114.ip", "10.0.0.114").unwrap();
    cfg.register_with("roaches.r115.lo", 4.5e9, Registration::new().comment("synth LO"))
        .unwrap();
    cfg.register("paths.data", "/data/mec").unwrap();
    cfg
}

/// Legacy file contents in the shape of a readout control file.
#[allow(dead_code)]
pub const TEMPLAR_CFG: &str = "\
[DEFAULT]
ip = 10.0.0.1
port = 50000
fpgapath = '/opt/fpga/templar.fpg'

[Roach_114]
ip = 10.0.0.114

[Roach_115]
ddssynthlo = 4.5e9

[sweep1]
start = 3.5
stop = 4.0
";
