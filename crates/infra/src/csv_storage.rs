//! Delimited text file storage for inventory snapshots.
//!
//! ## Format
//!
//! ```text
//! ID, Name, Quantity, Price, Supplier
//! A1,Dog Chew,5,9.99,X
//! ```
//!
//! One header line, then one comma-joined record per item. Fields are not
//! quoted or escaped, so text containing `,` or a line break is refused on save
//! rather than written in a form that would load back differently.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use ims_inventory::{InventoryFileStorage, Item, StorageError};

use crate::config::StorageConfig;

pub const HEADER: &str = "ID, Name, Quantity, Price, Supplier";
const FIELD_COUNT: usize = 5;

/// CSV-backed [`InventoryFileStorage`].
#[derive(Debug, Clone)]
pub struct CsvInventoryStorage {
    config: StorageConfig,
}

impl CsvInventoryStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Check the extension and resolve `file_name` against the data directory.
    ///
    /// Absolute paths are used unchanged.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        let file_name = file_name.trim();
        let suffix = format!(".{}", self.config.file_extension);
        if !file_name.ends_with(&suffix) || file_name.len() == suffix.len() {
            return Err(StorageError::InvalidExtension {
                file_name: file_name.to_string(),
                expected: self.config.file_extension.clone(),
            });
        }
        let path = Path::new(file_name);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.config.data_dir.join(path))
        }
    }
}

impl InventoryFileStorage for CsvInventoryStorage {
    fn load_all(&self, file_name: &str) -> Result<Vec<Item>, StorageError> {
        let path = self.resolve(file_name)?;
        let file = fs::File::open(&path).map_err(|e| StorageError::io(&path, e))?;
        let items = read_items(BufReader::new(file)).map_err(|e| match e {
            ReadError::Io(source) => StorageError::io(&path, source),
            ReadError::Storage(err) => err,
        })?;
        info!(path = %path.display(), count = items.len(), "loaded inventory file");
        Ok(items)
    }

    fn save_all(&self, items: &[Item], file_name: &str) -> Result<(), StorageError> {
        let path = self.resolve(file_name)?;
        for item in items {
            check_encodable(item)?;
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        // Write next to the target, then rename, so a failed write never
        // truncates an existing file.
        let tmp = path.with_extension(format!("{}.tmp", self.config.file_extension));
        write_items(&tmp, items).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StorageError::io(&tmp, e)
        })?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::io(&path, e))?;

        info!(path = %path.display(), count = items.len(), "saved inventory file");
        Ok(())
    }
}

enum ReadError {
    Io(std::io::Error),
    Storage(StorageError),
}

fn read_items<R: BufRead>(reader: R) -> Result<Vec<Item>, ReadError> {
    let mut items = Vec::new();
    // Line 1 is the header.
    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line.map_err(ReadError::Io)?;
        let line_no = idx + 1;
        let record = line.trim_end_matches('\r');
        if record.trim().is_empty() {
            continue;
        }
        let item = parse_record(record, line_no).map_err(ReadError::Storage)?;
        items.push(item);
    }
    debug!(count = items.len(), "parsed inventory records");
    Ok(items)
}

fn parse_record(record: &str, line: usize) -> Result<Item, StorageError> {
    let fields: Vec<&str> = record.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(StorageError::malformed(
            line,
            format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        ));
    }

    let quantity: i32 = fields[2].trim().parse().map_err(|_| {
        StorageError::malformed(line, format!("quantity {:?} is not an integer", fields[2]))
    })?;
    let price: f64 = fields[3].trim().parse().map_err(|_| {
        StorageError::malformed(line, format!("price {:?} is not a number", fields[3]))
    })?;

    Item::new(fields[0], fields[1], quantity, price, fields[4])
        .map_err(|e| StorageError::malformed(line, e.message()))
}

fn check_encodable(item: &Item) -> Result<(), StorageError> {
    let fields = [
        ("id", item.id_typed().as_str()),
        ("name", item.name()),
        ("supplier", item.supplier()),
    ];
    for (field, value) in fields {
        if value.contains([',', '\n', '\r']) {
            return Err(StorageError::UnencodableField {
                id: item.id_typed().to_string(),
                field,
            });
        }
    }
    Ok(())
}

fn write_items(path: &Path, items: &[Item]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    writeln!(writer, "{HEADER}")?;
    for item in items {
        writeln!(
            writer,
            "{},{},{},{},{}",
            item.id_typed(),
            item.name(),
            item.quantity(),
            item.price(),
            item.supplier()
        )?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> CsvInventoryStorage {
        CsvInventoryStorage::new(StorageConfig {
            data_dir: dir.to_path_buf(),
            file_extension: "csv".to_string(),
        })
    }

    fn item(id: &str, name: &str, qty: i32, price: f64) -> Item {
        Item::new(id, name, qty, price, "Acme Pets").unwrap()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(dir.path());
        let items = vec![
            item("A1", "Dog Chew", 5, 9.99),
            item("A2", "Cat Toy", 15, 10.0),
            item("A3", "Fish Food", 0, 0.0),
        ];

        store.save_all(&items, "stock.csv").unwrap();
        let loaded = store.load_all("stock.csv").unwrap();

        assert_eq!(loaded.len(), 3);
        for (want, got) in items.iter().zip(&loaded) {
            assert_eq!(want.id_typed(), got.id_typed());
            assert_eq!(want.name(), got.name());
            assert_eq!(want.quantity(), got.quantity());
            assert_eq!(want.price(), got.price());
            assert_eq!(want.supplier(), got.supplier());
        }
    }

    #[test]
    fn save_writes_header_and_plain_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(dir.path());
        store
            .save_all(&[item("A1", "Dog Chew", 5, 9.99)], "out.csv")
            .unwrap();

        let text = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(text, format!("{HEADER}\nA1,Dog Chew,5,9.99,Acme Pets\n"));
        assert!(!dir.path().join("out.csv.tmp").exists());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(&dir.path().join("nested/deeper"));
        store.save_all(&[], "empty.csv").unwrap();
        assert!(store.load_all("empty.csv").unwrap().is_empty());
    }

    #[test]
    fn wrong_extension_is_rejected_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(dir.path());

        let err = store.save_all(&[], "stock.txt").unwrap_err();
        assert!(matches!(err, StorageError::InvalidExtension { .. }));
        assert!(matches!(
            store.load_all(".csv"),
            Err(StorageError::InvalidExtension { .. })
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn absolute_paths_bypass_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(Path::new("/definitely/not/used"));
        let target = dir.path().join("abs.csv");
        let name = target.to_str().unwrap();

        store.save_all(&[item("A1", "Dog Chew", 5, 9.99)], name).unwrap();
        assert_eq!(store.load_all(name).unwrap().len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = storage(dir.path()).load_all("nope.csv").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn malformed_row_fails_the_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bad.csv"),
            format!("{HEADER}\nA1,Dog Chew,5,9.99,X\nA2,Cat Toy,lots,1.0,X\n"),
        )
        .unwrap();

        let err = storage(dir.path()).load_all("bad.csv").unwrap_err();
        match err {
            StorageError::Malformed { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("quantity"), "{reason}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn wrong_field_count_and_invalid_values_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(dir.path());
        for (name, body) in [
            ("short.csv", "A1,Dog Chew,5,9.99"),
            ("long.csv", "A1,Dog,Chew,5,9.99,X"),
            ("negative.csv", "A1,Dog Chew,-1,9.99,X"),
            ("blank.csv", "A1, ,5,9.99,X"),
        ] {
            fs::write(dir.path().join(name), format!("{HEADER}\n{body}\n")).unwrap();
            assert!(
                matches!(store.load_all(name), Err(StorageError::Malformed { line: 2, .. })),
                "{name}"
            );
        }
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("win.csv"),
            format!("{HEADER}\r\nA1,Dog Chew,5,9.99,X\r\n\r\nA2,Cat Toy,1,2,Y\r\n"),
        )
        .unwrap();

        let items = storage(dir.path()).load_all("win.csv").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].supplier(), "X");
        assert_eq!(items[1].price(), 2.0);
    }

    #[test]
    fn delimiter_in_field_is_refused_and_existing_file_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(dir.path());
        store.save_all(&[item("A1", "Dog Chew", 5, 9.99)], "keep.csv").unwrap();

        let err = store
            .save_all(&[item("A2", "Chew, large", 1, 1.0)], "keep.csv")
            .unwrap_err();
        assert!(matches!(err, StorageError::UnencodableField { field: "name", .. }));
        assert_eq!(store.load_all("keep.csv").unwrap()[0].id_typed().as_str(), "A1");
    }
}
