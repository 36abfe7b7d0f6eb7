//! Interactive text menu. Each entry maps onto one service operation.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};

use ims_infra::CsvInventoryStorage;
use ims_inventory::{
    InMemoryInventoryRepository, InventoryService, Item, MovementType, SortKey, StockMovement,
    ThresholdPolicy,
};

pub type AppService =
    InventoryService<InMemoryInventoryRepository, CsvInventoryStorage, ThresholdPolicy>;

const MENU: &str = "\
==== Inventory Menu ====
1. Add Item
2. List All Items
3. Search Item by ID
4. Search Items by Name
5. Adjust Stock
6. Delete Item
7. Replace All Items
8. Load Inventory
9. Save Inventory
0. Exit";

enum Flow {
    Continue,
    Exit,
}

pub struct Menu<'a, R, W> {
    service: &'a AppService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a AppService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Loop until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                writeln!(self.output, "\nGoodbye!")?;
                return Ok(());
            };

            let flow = match choice.trim() {
                "1" => self.add_item()?,
                "2" => self.list_all()?,
                "3" => self.search_by_id()?,
                "4" => self.search_by_name()?,
                "5" => self.adjust_stock()?,
                "6" => self.delete_item()?,
                "7" => self.replace_all()?,
                "8" => self.load()?,
                "9" => self.save()?,
                "0" => {
                    writeln!(self.output, "Goodbye!")?;
                    Flow::Exit
                }
                _ => {
                    writeln!(self.output, "Invalid option - try again.")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                return Ok(());
            }
        }
    }

    fn add_item(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n-- Add Item --")?;
        let Some(item) = self.read_item()? else {
            return Ok(Flow::Exit);
        };
        match self.service.add_item(item) {
            Ok(_) => writeln!(self.output, "Item saved!")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn list_all(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n-- All Items --")?;
        let items = self.service.list_sorted(SortKey::Id);
        if items.is_empty() {
            writeln!(self.output, "No items in inventory.")?;
        }
        for item in &items {
            writeln!(self.output, "{item}")?;
        }

        writeln!(self.output, "\n-- Low Stock --")?;
        let low = self.service.low_stock();
        if low.is_empty() {
            writeln!(self.output, "None")?;
        }
        for item in &low {
            writeln!(self.output, "{item}")?;
        }
        Ok(Flow::Continue)
    }

    fn search_by_id(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n-- Search Item --")?;
        let Some(id) = self.prompt("Enter ID: ")? else {
            return Ok(Flow::Exit);
        };
        match self.service.get_by_id(&id) {
            Some(item) => writeln!(self.output, "Item Found:\n{item}")?,
            None => writeln!(self.output, "Item with ID '{id}' not found.")?,
        }
        Ok(Flow::Continue)
    }

    fn search_by_name(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n-- Search by Name --")?;
        let Some(query) = self.prompt("Enter name (or part of it): ")? else {
            return Ok(Flow::Exit);
        };
        let hits = self.service.search_by_name(&query);
        if hits.is_empty() {
            writeln!(self.output, "No matching items.")?;
        }
        for item in &hits {
            writeln!(self.output, "{item}")?;
        }
        Ok(Flow::Continue)
    }

    fn adjust_stock(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n-- Adjust Stock --")?;
        let Some(id) = self.prompt("Enter ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(delta) = self.prompt_number::<i32>(
            "Enter change (non-zero; + to add, - to remove): ",
            "Change must be an integer value. Please try again.",
        )?
        else {
            return Ok(Flow::Exit);
        };

        let applied = StockMovement::new(id, delta, MovementType::Adjustment)
            .map(|m| m.with_reference("MENU"))
            .and_then(|m| self.service.apply_movement(&m));
        match applied {
            Ok(item) => writeln!(self.output, "Stock updated: {item}")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn delete_item(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n-- Delete Item --")?;
        let Some(id) = self.prompt("Enter ID to delete: ")? else {
            return Ok(Flow::Exit);
        };
        match self.service.delete_by_id(&id) {
            Ok(()) => writeln!(self.output, "Item deleted!")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn replace_all(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n-- Replace All Items --")?;
        let Some(count) = self.prompt_number::<usize>(
            "How many items do you want to add? ",
            "Item count must be a non-negative integer. Please try again.",
        )?
        else {
            return Ok(Flow::Exit);
        };

        let mut items = Vec::new();
        for n in 1..=count {
            writeln!(self.output, "\nItem #{n}")?;
            let Some(item) = self.read_item()? else {
                return Ok(Flow::Exit);
            };
            items.push(item);
        }

        let stored = self.service.replace_all(items);
        writeln!(self.output, "Inventory replaced successfully! ({stored} items)")?;
        Ok(Flow::Continue)
    }

    fn load(&mut self) -> Result<Flow> {
        let Some(file_name) = self.prompt("Enter the name of the file to load: ")? else {
            return Ok(Flow::Exit);
        };
        match self.service.load_all(&file_name) {
            Ok(n) => writeln!(self.output, "Loaded {n} items from {}", file_name.trim())?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn save(&mut self) -> Result<Flow> {
        let Some(file_name) = self.prompt("Enter the name of the file to save to: ")? else {
            return Ok(Flow::Exit);
        };
        match self.service.save_all(&file_name) {
            Ok(n) => writeln!(self.output, "Saved {n} items to {}", file_name.trim())?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    /// Prompt for every field until they form a valid item. `None` on end of input.
    fn read_item(&mut self) -> Result<Option<Item>> {
        loop {
            let Some(id) = self.prompt("Enter ID: ")? else {
                return Ok(None);
            };
            let Some(name) = self.prompt("Enter Name: ")? else {
                return Ok(None);
            };
            let Some(quantity) = self.prompt_number::<i32>(
                "Enter Quantity: ",
                "Quantity must be an integer value. Please try again.",
            )?
            else {
                return Ok(None);
            };
            let Some(price) = self.prompt_number::<f64>(
                "Enter Price: ",
                "Price must be a decimal value. Please try again.",
            )?
            else {
                return Ok(None);
            };
            let Some(supplier) = self.prompt("Enter Supplier: ")? else {
                return Ok(None);
            };

            match Item::new(id, name, quantity, price, supplier) {
                Ok(item) => return Ok(Some(item)),
                Err(e) => writeln!(self.output, "Error: {e}. Please re-enter the item.")?,
            }
        }
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn prompt_number<T: FromStr>(&mut self, label: &str, retry: &str) -> Result<Option<T>> {
        loop {
            let Some(raw) = self.prompt(label)? else {
                return Ok(None);
            };
            match raw.trim().parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "{retry}")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use ims_infra::StorageConfig;

    use super::*;

    fn service(dir: &Path) -> AppService {
        InventoryService::new(
            InMemoryInventoryRepository::new(),
            CsvInventoryStorage::new(StorageConfig {
                data_dir: dir.to_path_buf(),
                ..StorageConfig::default()
            }),
            ThresholdPolicy::new(10).unwrap(),
        )
    }

    fn run(service: &AppService, script: &str) -> String {
        let mut out = Vec::new();
        Menu::new(service, script.as_bytes(), &mut out).run().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_then_list_shows_item_and_low_stock() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let out = run(
            &svc,
            "1\nA1\nDog Chew\n5\n9.99\nX\n1\nA2\nCat Toy\n15\n4.5\nY\n2\n0\n",
        );

        assert!(out.contains("Item saved!"));
        assert!(out.contains("A1 | Dog Chew | qty 5 | 9.99 | X"));
        let low = out.split("-- Low Stock --").nth(1).unwrap();
        assert!(low.contains("A1"));
        assert!(!low.contains("A2"));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn invalid_numbers_are_reprompted() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let out = run(&svc, "1\nA1\nDog Chew\nfive\n5\nfree\n1.25\nX\n0\n");

        assert!(out.contains("Quantity must be an integer value"));
        assert!(out.contains("Price must be a decimal value"));
        assert_eq!(svc.get_by_id("A1").unwrap().price(), 1.25);
    }

    #[test]
    fn invalid_item_is_reentered() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let out = run(&svc, "1\nA1\n \n5\n1\nX\nA1\nDog Chew\n5\n1\nX\n0\n");

        assert!(out.contains("Please re-enter the item."));
        assert_eq!(svc.get_by_id("A1").unwrap().name(), "Dog Chew");
    }

    #[test]
    fn duplicate_add_reports_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let out = run(&svc, "1\nA1\nDog\n1\n1\nX\n1\nA1\nCat\n1\n1\nX\n0\n");
        assert!(out.contains("Error: conflict: Item id already exists: A1"));
    }

    #[test]
    fn adjust_search_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let out = run(
            &svc,
            "1\nA1\nDog Chew\n5\n1\nX\n5\nA1\n-2\n5\nA1\n-9\n4\nchew\n3\nA1\n6\nA1\n3\nA1\n0\n",
        );

        assert!(out.contains("Stock updated: A1 | Dog Chew | qty 3"));
        assert!(out.contains("Adjustment would produce negative quantity"));
        assert!(out.contains("Item Found:"));
        assert!(out.contains("Item deleted!"));
        assert!(out.contains("Item with ID 'A1' not found."));
    }

    #[test]
    fn zero_adjustment_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let out = run(&svc, "1\nA1\nDog Chew\n5\n1\nX\n5\nA1\n0\n0\n");

        assert!(out.contains("Enter change (non-zero;"));
        assert!(out.contains("quantity change must not be zero"));
        assert!(!out.contains("Stock updated"));
        assert_eq!(svc.get_by_id("A1").unwrap().quantity(), 5);
    }

    #[test]
    fn huge_replace_count_then_end_of_input_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        svc.add_item(Item::new("KEEP", "Keeper", 1, 1.0, "X").unwrap()).unwrap();

        let out = run(&svc, "7\n18446744073709551615\n0\n");

        assert!(out.contains("Item #1"));
        assert!(!out.contains("Inventory replaced successfully"));
        assert_eq!(svc.list_all().len(), 1);
    }

    #[test]
    fn replace_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let out = run(
            &svc,
            "7\n2\nB1\nBone\n3\n2.5\nX\nB2\nBall\n30\n1\nY\n9\nstock.csv\n7\n0\n8\nstock.csv\n0\n",
        );

        assert!(out.contains("Inventory replaced successfully! (2 items)"));
        assert!(out.contains("Saved 2 items to stock.csv"));
        assert!(out.contains("Inventory replaced successfully! (0 items)"));
        assert!(out.contains("Loaded 2 items from stock.csv"));
        assert_eq!(svc.list_all().len(), 2);
        assert!(dir.path().join("stock.csv").exists());
    }

    #[test]
    fn wrong_file_type_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let out = run(&svc, "9\nstock.txt\n0\n");
        assert!(out.contains("Error: storage failed: invalid file type"));
    }

    #[test]
    fn unknown_option_and_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let out = run(&svc, "42\n");
        assert!(out.contains("Invalid option - try again."));
        assert!(out.trim_end().ends_with("Goodbye!"));

        // End of input in the middle of a prompt exits quietly.
        run(&svc, "1\nA1\nDog");
        assert!(svc.list_all().is_empty());
    }
}
