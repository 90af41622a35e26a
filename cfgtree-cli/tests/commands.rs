//! Integration tests for the cfgtree subcommands.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// ============================================================================
// register / get
// ============================================================================

#[test]
fn test_register_creates_file_and_get_reads_it() {
    let env = TestEnv::new();
    env.register_commented("roaches.ip", "10.0.0.1", "board address");
    env.register("roaches.port", "50000");

    assert!(env.config.exists());
    assert!(env.config_text().contains("ip: 10.0.0.1  # board address"));

    env.command()
        .args(["get", "roaches.port"])
        .assert()
        .success()
        .stdout("50000\n");
}

#[test]
fn test_get_inherits_by_default() {
    let env = TestEnv::new();
    env.register("roaches.ip", "10.0.0.1");

    env.command()
        .args(["get", "roaches.r114.ip"])
        .assert()
        .success()
        .stdout("10.0.0.1\n");

    env.command()
        .args(["get", "roaches.r114.ip", "--no-inherit"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_get_default_and_all() {
    let env = TestEnv::new();
    env.register_commented("mode", "fast", "readout mode");

    env.command()
        .args(["get", "gain", "--default", "3"])
        .assert()
        .success()
        .stdout("3\n");

    env.command()
        .args(["get", "mode", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"comment\": \"readout mode\""))
        .stdout(predicate::str::contains("\"value\": \"fast\""));
}

#[test]
fn test_get_namespace_prints_yaml() {
    let env = TestEnv::new();
    env.register("roaches.r114.ip", "10.0.0.114");

    env.command()
        .args(["get", "roaches"])
        .assert()
        .success()
        .stdout("r114:\n  ip: 10.0.0.114\n");
}

#[test]
fn test_register_existing_without_update_keeps_value() {
    let env = TestEnv::new();
    env.register("port", "1");

    env.command()
        .args(["register", "port", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("already registered"));
    env.command().args(["get", "port"]).assert().stdout("1\n");

    env.command()
        .args(["register", "port", "2", "--update"])
        .assert()
        .success();
    env.command().args(["get", "port"]).assert().stdout("2\n");
}

#[test]
fn test_register_quoted_number_stays_string() {
    let env = TestEnv::new();
    env.register("serial", "'0042'");
    assert!(env.config_text().contains("serial: '0042'"));
}

#[test]
fn test_register_reserved_key_is_rejected() {
    let env = TestEnv::new();
    env.command()
        .args(["register", "mode._c", "x"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid key"));
}

#[test]
fn test_register_through_leaf_conflicts() {
    let env = TestEnv::new();
    env.register("a", "1");
    env.command()
        .args(["register", "a.b", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("structural conflict"));
}

// ============================================================================
// set / unregister / comment
// ============================================================================

#[test]
fn test_set_creates_local_override() {
    let env = TestEnv::new();
    env.register_commented("roaches.ip", "10.0.0.1", "board address");

    env.command()
        .args(["set", "roaches.r114.ip", "10.0.0.2"])
        .assert()
        .success();

    env.command()
        .args(["get", "roaches.ip"])
        .assert()
        .stdout("10.0.0.1\n");
    env.command()
        .args(["get", "roaches.r114.ip", "--no-inherit"])
        .assert()
        .stdout("10.0.0.2\n");
    env.command()
        .args(["comment", "roaches.r114.ip"])
        .assert()
        .stdout("board address\n");
}

#[test]
fn test_set_unknown_path_fails() {
    let env = TestEnv::new();
    env.register("a", "1");
    env.command()
        .args(["set", "nothing.here", "1"])
        .assert()
        .code(1);
}

#[test]
fn test_unregister_removes_comment() {
    let env = TestEnv::new();
    env.register_commented("k", "1", "c");
    env.register("other", "2");

    env.command().args(["unregister", "k"]).assert().success();
    assert!(!env.config_text().contains("k:"));

    env.command().args(["comment", "k"]).assert().code(1);

    // removing a missing key is not an error
    env.command().args(["unregister", "k"]).assert().success();
}

#[test]
fn test_comment_without_comment_prints_nothing() {
    let env = TestEnv::new();
    env.register("k", "1");
    env.command()
        .args(["comment", "k"])
        .assert()
        .success()
        .stdout("");
}

// ============================================================================
// keys / dump
// ============================================================================

#[test]
fn test_keys_lists_visible_keys() {
    let env = TestEnv::new();
    env.register_commented("b.x", "1", "hidden sidecar");
    env.register("a", "2");

    env.command()
        .arg("keys")
        .assert()
        .success()
        .stdout("b\na\n");
    env.command()
        .args(["keys", "b"])
        .assert()
        .success()
        .stdout("x\n");
    env.command().args(["keys", "a"]).assert().code(4);
}

#[test]
fn test_dump_formats() {
    let env = TestEnv::new();
    env.register_commented("a.b", "1", "note");

    env.command()
        .arg("dump")
        .assert()
        .success()
        .stdout("a:\n  b: 1  # note\n");

    env.command()
        .args(["dump", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"b\": 1"))
        .stdout(predicate::str::contains("note").not());
}

#[test]
fn test_missing_file_is_an_io_error_for_readers() {
    let env = TestEnv::new();
    env.command().arg("dump").assert().code(3);
}

#[test]
fn test_invalid_yaml_is_a_parse_error() {
    let env = TestEnv::new();
    std::fs::write(&env.config, "a: [1, 2\n").unwrap();
    env.command().args(["get", "a"]).assert().code(3);
}

// ============================================================================
// import
// ============================================================================

const TEMPLAR: &str = "\
[DEFAULT]
ip = 10.0.0.1

[Roach_114]
ip = 10.0.0.114

[sweep1]
start = 3.5
";

#[test]
fn test_import_uses_file_stem_and_consolidates() {
    let env = TestEnv::new();
    env.register("instrument.name", "MEC");
    let legacy = env.write_file("templar.cfg", TEMPLAR);

    env.command()
        .arg("import")
        .arg(&legacy)
        .assert()
        .success();

    env.command()
        .args(["get", "templar.roaches.r114.ip"])
        .assert()
        .stdout("10.0.0.114\n");
    env.command()
        .args(["get", "templar.roaches.r114.roachnum"])
        .assert()
        .stdout("114\n");
    env.command()
        .args(["get", "instrument.name"])
        .assert()
        .stdout("MEC\n");
}

#[test]
fn test_import_with_namespace() {
    let env = TestEnv::new();
    let legacy = env.write_file("readout.txt", "port = 50000\n");

    env.command()
        .arg("import")
        .arg(&legacy)
        .args(["--namespace", "readout"])
        .assert()
        .success();

    env.command()
        .args(["get", "readout.port"])
        .assert()
        .stdout("50000\n");
}

#[test]
fn test_import_malformed_file() {
    let env = TestEnv::new();
    let legacy = env.write_file("bad.cfg", "no separator here\n");
    env.command()
        .arg("import")
        .arg(&legacy)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("bad.cfg:1"));
}
