use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const PRICES: &str = "\
№;Наименование;Масса нетто;Цена за штуку;Штук в коробке
1;Оливки без косточки;300 г;100;10
2;Каперсы;100 г;250;12
";

fn copurchase(prices: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_copurchase"))
        .arg("--prices-dir")
        .arg(prices)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run copurchase")
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("prices")).unwrap();
    fs::write(dir.path().join("prices").join("supplier.csv"), PRICES).unwrap();
    dir
}

#[test]
fn catalog_lists_entries() {
    let dir = setup();
    let output = copurchase(&dir.path().join("prices"), &["catalog"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("supplier.csv: 2 rows"));
    assert!(stdout.contains("Оливки без косточки  300 г  100,00 руб.  норма 10 шт."));
}

#[test]
fn resolve_ranks_substring_hits() {
    let dir = setup();
    let output = copurchase(&dir.path().join("prices"), &["resolve", "капер"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with(" 1. Каперсы"));
}

#[test]
fn reconcile_prints_summaries() {
    let dir = setup();
    let orders = dir.path().join("orders.txt");
    fs::write(
        &orders,
        "Маша\nОливки без косточки 300 г 100 - 4шт\n\nОля\nКаперсы 100 г 250 - 12шт\n",
    )
    .unwrap();

    let output = copurchase(
        &dir.path().join("prices"),
        &["reconcile", orders.to_str().unwrap(), "--markup"],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("СВОДКА ЗАКАЗОВ"));
    assert!(stdout.contains("[наценка +13% включена]"));
    assert!(stdout.contains("Незакрытых рядов: 1"));
}

#[test]
fn missing_input_file_fails() {
    let dir = setup();
    let output = copurchase(&dir.path().join("prices"), &["parse", "does-not-exist.txt"]);
    assert!(!output.status.success());
}
