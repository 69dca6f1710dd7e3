use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mana_core_cli").unwrap();
    cmd.env("MANA_CORE_CLI_SCRIPT", "1")
        .env("MANA_CORE_HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_logs_transaction_and_reports_progress() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("# warm up\n\nadd 25 food lunch\nstatus\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("25.00 in Food (lunch)."))
        .stdout(predicate::str::contains("Level 1 · 15/100 xp · streak 1"))
        .stdout(predicate::str::contains("Achievement unlocked: First Transaction!"))
        .stdout(predicate::str::contains("Remaining  49975.00"));
}

#[test]
fn unknown_category_warns_and_falls_back() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add 4 pets kibble\nspending\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown category `pets`, using `food`."))
        .stdout(predicate::str::contains("Food"));
}

#[test]
fn budget_and_reset_commands() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("budget 200\nadd 50 bills power\nreset\nstatus\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly budget set to 200.00. Remaining 200.00."))
        .stdout(predicate::str::contains("All progress reset."))
        .stdout(predicate::str::contains("Logged     0"));
}

#[test]
fn typos_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("stauts\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command `stauts`"))
        .stdout(predicate::str::contains("Suggestion: `status`?"));
}

#[test]
fn invalid_amount_is_reported_without_aborting() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add -5 food refund\nadd 5 food tea\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("amount must be a positive number"))
        .stdout(predicate::str::contains("5.00 in Food (tea)."));
}

#[test]
fn stored_config_budget_is_used() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.json"),
        r#"{ "monthly_budget": 300.0 }"#,
    )
    .unwrap();
    cli(&home)
        .write_stdin("add 100 food groceries\nstatus\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Remaining  200.00"));
}

#[test]
fn invalid_config_fails_startup() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.json"),
        r#"{ "monthly_budget": -1.0 }"#,
    )
    .unwrap();
    cli(&home)
        .write_stdin("status\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("monthly_budget must be a positive number"));
}

#[test]
fn config_set_persists_for_the_next_session() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("config set monthly_budget 800\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved monthly_budget = 800"));
    assert!(home.path().join("config.json").exists());

    cli(&home)
        .write_stdin("status\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget     800.00"));
}

#[test]
fn config_set_rejects_invalid_values() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("config set xp_per_level 0\nconfig set colour blue\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "rewards.xp_per_level must be greater than zero",
        ))
        .stdout(predicate::str::contains("unknown key `colour`"));
    assert!(!home.path().join("config.json").exists());
}
