use std::env::temp_dir;
use std::fs;

use rand::distr::{Alphanumeric, SampleString};
use tempfile::TempDir;
use typed_csv_rs::{
    Configuration, CsvReader, CsvWriter, EmbeddedAssets, Page, Separator, WriteBatch, csv_record,
};

csv_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        name: String,
        balance: i64,
        active: bool,
    }
}

fn accounts() -> Vec<Account> {
    vec![
        Account {
            name: "main".into(),
            balance: 250,
            active: true,
        },
        Account {
            name: "savings".into(),
            balance: -40,
            active: false,
        },
    ]
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn written_records_should_be_read_back() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test");
    let batch = WriteBatch::new(["name", "balance", "active"], accounts());

    CsvWriter::rooted(dir.path()).write(&config, &batch).unwrap();

    let loaded: Vec<Account> = CsvReader::rooted(dir.path()).read(&config).unwrap();
    assert_eq!(loaded, accounts());
}

#[test]
fn single_record_should_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test");
    let row = Account {
        name: "a".into(),
        balance: 1,
        active: true,
    };
    let batch = WriteBatch::new(["name", "balance", "active"], vec![row.clone()]);

    CsvWriter::rooted(dir.path()).write(&config, &batch).unwrap();

    let loaded: Vec<Account> = CsvReader::rooted(dir.path()).read(&config).unwrap();
    assert_eq!(loaded, vec![row]);
}

#[test]
fn semicolon_separator_should_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test").separator(Separator::Semicolon);
    let batch = WriteBatch::new(["name", "balance", "active"], accounts());

    CsvWriter::rooted(dir.path()).write(&config, &batch).unwrap();

    let content = fs::read_to_string(dir.path().join("test.csv")).unwrap();
    assert!(content.starts_with("name;balance;active"));

    let loaded: Vec<Account> = CsvReader::rooted(dir.path()).read(&config).unwrap();
    assert_eq!(loaded, accounts());
}

#[test]
fn append_should_keep_existing_rows_and_omit_the_header() {
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test");
    let header = ["name", "balance", "active"];
    let writer = CsvWriter::rooted(dir.path());

    writer
        .write(&config, &WriteBatch::new(header, accounts()))
        .unwrap();
    let more = vec![Account {
        name: "joint".into(),
        balance: 7,
        active: true,
    }];
    writer
        .write(&config, &WriteBatch::new(header, more).append())
        .unwrap();

    let loaded: Vec<Account> = CsvReader::rooted(dir.path()).read(&config).unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[2].name, "joint");
    let content = fs::read_to_string(dir.path().join("test.csv")).unwrap();
    assert_eq!(content.matches("name,balance,active").count(), 1);
}

#[test]
fn creating_the_folder_should_force_overwrite_mode() {
    // The first write into a fresh folder has nothing to append to: the
    // requested append mode is silently upgraded and the header is written.
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test").folder("fresh");
    let batch = WriteBatch::new(["name", "balance", "active"], accounts()).append();

    CsvWriter::rooted(dir.path()).write(&config, &batch).unwrap();

    let content = fs::read_to_string(dir.path().join("fresh/test.csv")).unwrap();
    assert!(content.starts_with("name,balance,active"));
}

#[test]
fn writing_twice_should_create_the_folder_once() {
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test").folder("reports");
    let writer = CsvWriter::rooted(dir.path());
    let header = ["name", "balance", "active"];

    writer
        .write(&config, &WriteBatch::new(header, accounts()))
        .unwrap();
    writer
        .write(&config, &WriteBatch::new(header, accounts()))
        .unwrap();

    assert!(dir.path().join("reports").is_dir());
    let loaded: Vec<Account> = CsvReader::rooted(dir.path()).read(&config).unwrap();
    assert_eq!(loaded, accounts());
}

#[test]
fn empty_batch_should_produce_a_header_only_file() {
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test");
    let batch: WriteBatch<Account> = WriteBatch::new(["name", "balance", "active"], vec![]);

    CsvWriter::rooted(dir.path()).write(&config, &batch).unwrap();

    let content = fs::read_to_string(dir.path().join("test.csv")).unwrap();
    assert_eq!(content, "name,balance,active\n");
}

#[test]
fn embedded_assets_should_be_read_before_the_filesystem() {
    static ASSETS: EmbeddedAssets = EmbeddedAssets::new(&[(
        "packaged/accounts.csv",
        b"name,balance,active\npackaged,1,true\n",
    )]);
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("accounts").folder("packaged");
    let reader = CsvReader::rooted(dir.path()).with_assets(ASSETS);

    let loaded: Vec<Account> = reader.read(&config).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "packaged");
}

#[test]
fn untyped_read_should_expose_records() {
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test");
    let batch = WriteBatch::new(["name", "balance", "active"], accounts());
    CsvWriter::rooted(dir.path()).write(&config, &batch).unwrap();

    let records = CsvReader::rooted(dir.path()).read_records(&config).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("name"), Some(Some("main")));
    assert_eq!(records[1].get("balance"), Some(Some("-40")));
}

#[test]
fn pagination_should_select_one_chunk() {
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test");
    let rows: Vec<Account> = (0..5)
        .map(|index| Account {
            name: format!("account-{index}"),
            balance: index,
            active: true,
        })
        .collect();
    let batch = WriteBatch::new(["name", "balance", "active"], rows);
    CsvWriter::rooted(dir.path()).write(&config, &batch).unwrap();
    let reader = CsvReader::rooted(dir.path());

    let page: Vec<Account> = reader.read_page(&config, Page::new(2, 2)).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].name, "account-2");

    let ignored: Vec<Account> = reader.read_page(&config, Page::new(0, 1)).unwrap();
    assert_eq!(ignored.len(), 5);

    let past_the_end: Vec<Account> = reader.read_page(&config, Page::new(9, 2)).unwrap();
    assert!(past_the_end.is_empty());
}

#[test]
fn blank_lines_should_be_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("test.csv"),
        "name,balance,active\nmain,250,true\n\nsavings,-40,false\n",
    )
    .unwrap();
    let config = Configuration::new("test");

    let loaded: Vec<Account> = CsvReader::rooted(dir.path()).read(&config).unwrap();
    assert_eq!(loaded, accounts());
}

#[tokio::test]
async fn async_write_then_read_should_round_trip() {
    init_logger();
    let file = Alphanumeric.sample_string(&mut rand::rng(), 16);
    let config = Configuration::new(&file);
    let batch = WriteBatch::new(["name", "balance", "active"], accounts());

    CsvWriter::rooted(temp_dir())
        .write_async(config.clone(), batch)
        .await
        .unwrap()
        .unwrap();

    let loaded: Vec<Account> = CsvReader::rooted(temp_dir())
        .read_async(config)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded, accounts());

    fs::remove_file(temp_dir().join(format!("{file}.csv"))).unwrap();
}

#[tokio::test]
async fn async_strict_read_should_report_the_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("nowhere");

    let result: Result<Vec<Account>, _> = CsvReader::rooted(dir.path())
        .read_strict_async(config)
        .await
        .unwrap();
    assert!(matches!(
        result,
        Err(typed_csv_rs::CsvError::FileNotFound(path)) if path == "nowhere.csv"
    ));
}

#[tokio::test]
async fn aborted_write_should_be_distinguishable_from_a_completed_one() {
    let dir = TempDir::new().unwrap();
    let config = Configuration::new("test");
    let batch = WriteBatch::new(["name", "balance", "active"], accounts());
    let writer = CsvWriter::rooted(dir.path());

    let handle = writer.write_async(config.clone(), batch);
    handle.abort();
    match handle.await {
        // Aborted before the blocking stage started: nothing was written.
        Err(error) => assert!(error.is_cancelled()),
        // The pipeline won the race: the write completed fully.
        Ok(result) => {
            result.unwrap();
            let loaded: Vec<Account> = CsvReader::rooted(dir.path()).read(&config).unwrap();
            assert_eq!(loaded, accounts());
        }
    }
}
