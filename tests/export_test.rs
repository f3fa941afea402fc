use std::collections::HashMap;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use sheetsql::prelude::*;

/// In-memory source keyed by table name. Missing tables fail like a 404.
#[derive(Default)]
struct MemorySource {
    tables: HashMap<String, SheetTable>,
    fetched: Mutex<Vec<String>>,
}

impl MemorySource {
    fn with(mut self, table: &str, sheet: SheetTable) -> Self {
        self.tables.insert(table.to_string(), sheet);
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl SheetSource for &MemorySource {
    async fn fetch(&self, range: &RangeSpec) -> SheetResult<SheetTable> {
        self.fetched.lock().unwrap().push(range.table.clone());
        self.tables
            .get(&range.table)
            .cloned()
            .ok_or_else(|| SheetSqlError::fetch(range.range(), "404 Not Found"))
    }
}

fn specs(ranges: &[&str]) -> Vec<RangeSpec> {
    ranges.iter().map(|r| RangeSpec::parse(r).unwrap()).collect()
}

fn shop() -> SheetTable {
    SheetTable::from_rows([vec!["会社名#id", "会社名#name"], vec!["1", "Acme"]])
}

fn product() -> SheetTable {
    SheetTable::from_rows([
        vec!["商品名#name", "価格#price"],
        vec!["Widget", "1200"],
        vec!["Gadget", ""],
    ])
}

#[tokio::test]
async fn test_export_writes_one_file_per_range() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemorySource::default()
        .with("t_shop", shop())
        .with("t_shop_product", product());

    let report = Exporter::new(&source, dir.path())
        .run(&specs(&["企業情報#t_shop!A1:D", "商品情報#t_shop_product!A1:D"]))
        .await
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(
        report.written,
        vec![dir.path().join("t_shop.sql"), dir.path().join("t_shop_product.sql")]
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("t_shop.sql")).unwrap(),
        "INSERT INTO `t_shop` (`id`,`name`) VALUES ('1','Acme');\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("t_shop_product.sql")).unwrap(),
        "INSERT INTO `t_shop_product` (`name`,`price`) VALUES ('Widget','1200'),('Gadget',null);\n"
    );
}

#[tokio::test]
async fn test_export_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t_shop.sql");
    std::fs::write(&path, "-- stale content that is much longer than the new statement\n".repeat(10))
        .unwrap();

    let source = MemorySource::default().with("t_shop", shop());
    Exporter::new(&source, dir.path())
        .run(&specs(&["企業情報#t_shop!A1:D"]))
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "INSERT INTO `t_shop` (`id`,`name`) VALUES ('1','Acme');\n"
    );
}

#[tokio::test]
async fn test_fetch_failure_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemorySource::default()
        .with("t_shop", shop())
        .with("t_shop_product", product());

    let err = Exporter::new(&source, dir.path())
        .run(&specs(&[
            "企業情報#t_shop!A1:D",
            "欠落#t_missing!A1:D",
            "商品情報#t_shop_product!A1:D",
        ]))
        .await
        .unwrap_err();

    assert!(matches!(err, SheetSqlError::Fetch { .. }));
    assert_eq!(source.fetched(), vec!["t_shop", "t_missing"]);
    assert!(dir.path().join("t_shop.sql").exists());
    assert!(!dir.path().join("t_shop_product.sql").exists());
}

#[tokio::test]
async fn test_write_failure_does_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    // A directory squatting on the file name makes the write fail
    std::fs::create_dir(dir.path().join("t_shop.sql")).unwrap();

    let source = MemorySource::default()
        .with("t_shop", shop())
        .with("t_shop_product", product());

    let report = Exporter::new(&source, dir.path())
        .run(&specs(&["企業情報#t_shop!A1:D", "商品情報#t_shop_product!A1:D"]))
        .await
        .unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "t_shop");
    assert_eq!(report.written, vec![dir.path().join("t_shop_product.sql")]);
}

#[tokio::test]
async fn test_header_only_range_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemorySource::default()
        .with("t_empty", SheetTable::from_rows([vec!["空#id"]]))
        .with("t_shop", shop());

    let report = Exporter::new(&source, dir.path())
        .run(&specs(&["空#t_empty!A1:D", "企業情報#t_shop!A1:D"]))
        .await
        .unwrap();

    assert_eq!(report.skipped, vec!["t_empty"]);
    assert!(!dir.path().join("t_empty.sql").exists());
    assert!(dir.path().join("t_shop.sql").exists());
}

#[tokio::test]
async fn test_malformed_header_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemorySource::default().with(
        "t_bad",
        SheetTable::from_rows([vec!["id", "name"], vec!["1", "x"]]),
    );

    let err = Exporter::new(&source, dir.path())
        .run(&specs(&["壊れ#t_bad!A1:B"]))
        .await
        .unwrap_err();
    assert!(matches!(err, SheetSqlError::MalformedHeader { index: 0, .. }));
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemorySource::default().with("t_shop", shop());

    let report = Exporter::new(&source, dir.path())
        .dry_run(true)
        .run(&specs(&["企業情報#t_shop!A1:D"]))
        .await
        .unwrap();

    assert!(report.written.is_empty());
    assert_eq!(
        report.statements,
        vec![(
            "t_shop".to_string(),
            "INSERT INTO `t_shop` (`id`,`name`) VALUES ('1','Acme');".to_string()
        )]
    );
    assert!(!dir.path().join("t_shop.sql").exists());
}
