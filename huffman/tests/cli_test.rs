use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::process::Command;

type StdResult = Result<(), Box<dyn std::error::Error>>;

fn round_trip(data: &[u8]) -> StdResult {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("input.bin");
    let compressed = temp_dir.path().join("input.hfm");
    let restored = temp_dir.path().join("restored.bin");
    fs::write(&input, data)?;

    Command::cargo_bin("huffman")?
        .arg("-c")
        .arg(&input)
        .arg(&compressed)
        .assert()
        .success();

    Command::cargo_bin("huffman")?
        .arg("-dc")
        .arg(&compressed)
        .arg(&restored)
        .assert()
        .success();

    assert_eq!(fs::read(&restored)?, data);
    Ok(())
}

#[test]
fn round_trips_small_english_text() -> StdResult {
    round_trip(b"the quick brown fox jumps over the lazy dog, again and again.")
}

#[test]
fn round_trips_empty_file() -> StdResult {
    round_trip(b"")
}

#[test]
fn round_trips_single_repeated_byte() -> StdResult {
    round_trip(&[0x42u8; 10_000])
}

#[test]
fn round_trips_all_256_byte_values() -> StdResult {
    let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    round_trip(&data)
}

#[test]
fn verbose_compress_prints_statistics_report() -> StdResult {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("input.txt");
    let compressed = temp_dir.path().join("input.hfm");
    fs::write(&input, "aaaaaaaaaabbbbbbbbbbcccccccccc")?;

    Command::cargo_bin("huffman")?
        .arg("-c")
        .arg("--verbose")
        .arg(&input)
        .arg(&compressed)
        .assert()
        .success()
        .stdout(predicate::str::contains("Compression Statistics"))
        .stdout(predicate::str::contains("Compression Ratio"));
    Ok(())
}

#[test]
fn rejects_missing_input_file() -> StdResult {
    let temp_dir = tempfile::tempdir()?;
    let missing = temp_dir.path().join("does_not_exist.txt");

    Command::cargo_bin("huffman")?
        .arg("-c")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("[FAIL] :"));
    Ok(())
}

#[test]
fn rejects_conflicting_compress_and_decompress_flags() -> StdResult {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("input.txt");
    fs::write(&input, "hello")?;

    Command::cargo_bin("huffman")?
        .arg("-c")
        .arg("-d")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("[FAIL] :"));
    Ok(())
}

#[test]
fn detects_corrupted_block_frame() -> StdResult {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("input.txt");
    let compressed = temp_dir.path().join("input.hfm");
    let restored = temp_dir.path().join("restored.txt");
    fs::write(&input, "corruption should be detected by the crc check")?;

    Command::cargo_bin("huffman")?
        .arg("-c")
        .arg(&input)
        .arg(&compressed)
        .assert()
        .success();

    let mut bytes = fs::read(&compressed)?;
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    let mut file = File::create(&compressed)?;
    file.write_all(&bytes)?;
    drop(file);

    Command::cargo_bin("huffman")?
        .arg("-dc")
        .arg(&compressed)
        .arg(&restored)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("[FAIL] :"));
    Ok(())
}
