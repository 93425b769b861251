use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;

const REFERENCE: &str = "2024-06-15T09:00:00";

fn recognize(args: &[&str]) -> Value {
    let output = cargo_bin_cmd!("recognize")
        .arg("--reference")
        .arg(REFERENCE)
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_text_argument() {
    let json = recognize(&["I'll be back tomorrow at 5pm"]);
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["text"], "tomorrow at 5pm");
    assert_eq!(results[0]["typeName"], "datetimeV2.datetime");
    assert_eq!(results[0]["resolution"][0]["value"], "2024-06-16 17:00:00");
}

#[test]
fn test_words_are_joined() {
    let json = recognize(&["revenue", "for", "Q1", "2023"]);
    assert_eq!(json[0]["text"], "Q1 2023");
    assert_eq!(json[0]["resolution"][0]["start"], "2023-01-01");
    assert_eq!(json[0]["resolution"][0]["end"], "2023-04-01");
}

#[test]
fn test_reads_stdin() {
    cargo_bin_cmd!("recognize")
        .args(["--reference", REFERENCE])
        .write_stdin("the meeting moved to next week")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"text\":\"next week\""))
        .stdout(predicate::str::contains("2024-W25"));
}

#[test]
fn test_no_entities_prints_empty_array() {
    cargo_bin_cmd!("recognize")
        .args(["--reference", REFERENCE, "nothing to see here"])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_no_merge_keeps_points_apart() {
    let json = recognize(&["--no-merge", "May 1 to May 7"]);
    let texts: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["May 1", "May 7"]);
}

#[test]
fn test_pretty_output() {
    cargo_bin_cmd!("recognize")
        .args(["--reference", REFERENCE, "--pretty", "tomorrow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  {\n"));
}

#[test]
fn test_invalid_reference() {
    cargo_bin_cmd!("recognize")
        .args(["--reference", "yesterday-ish", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --reference"));
}

#[test]
fn test_invalid_timezone() {
    cargo_bin_cmd!("recognize")
        .args(["--timezone", "Mars/Olympus_Mons", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --timezone"));
}

#[test]
fn test_timezone_sets_now() {
    cargo_bin_cmd!("recognize")
        .args(["--timezone", "America/New_York", "tomorrow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("datetimeV2.date"));
}

#[test]
fn test_unsupported_culture() {
    cargo_bin_cmd!("recognize")
        .args(["--reference", REFERENCE, "--culture", "fr-fr", "demain"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported culture: fr-fr"));
}

#[test]
fn test_unsupported_culture_with_fallback() {
    let json = recognize(&["--culture", "fr-fr", "--fallback", "tomorrow"]);
    assert_eq!(json[0]["resolution"][0]["value"], "2024-06-16");
}
