//! List operation module
//!
//! Read-only views of the overlay ledger.

use crate::cli::ListMode;
use crate::config::Settings;
use crate::error::{ModlayerError, Result};
use crate::overlay::Ledger;
use crate::ui::display;

pub struct ListOperation<'a> {
    settings: &'a Settings,
}

impl<'a> ListOperation<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Print the requested view; `verify` fails when violations are found
    pub fn execute(&self, mode: ListMode) -> Result<()> {
        let ledger = Ledger::load(&self.settings.ledger_path)?;
        match mode {
            ListMode::Packages => {
                let packages: Vec<(&str, usize)> = ledger
                    .list_packages()
                    .into_iter()
                    .map(|name| (name, ledger.bindings_of(name).len()))
                    .collect();
                display::display_packages(&packages);
            }
            ListMode::Conflicts => display::display_conflicts(&ledger.list_conflicts()),
            ListMode::Verify => {
                let violations = ledger.verify(&self.settings.data_dir);
                display::display_violations(&violations);
                if !violations.is_empty() {
                    return Err(ModlayerError::VerifyFailed {
                        count: violations.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Binding;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_verify_fails_on_dangling_ledger() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            data_dir: temp.path().to_path_buf(),
            overlay_dir: None,
            ledger_path: temp.path().join("ledger.xml"),
        };
        let mut ledger = Ledger::default();
        ledger.record_install(
            "A",
            vec![Binding {
                real_file: PathBuf::from("/nonexistent/A/a.esp"),
                virtual_path: "a.esp".into(),
            }],
        );
        ledger.save(&settings.ledger_path).unwrap();

        let operation = ListOperation::new(&settings);

        assert!(operation.execute(ListMode::Packages).is_ok());
        assert!(operation.execute(ListMode::Conflicts).is_ok());
        assert!(matches!(
            operation.execute(ListMode::Verify),
            Err(ModlayerError::VerifyFailed { count: 2 })
        ));
    }

    #[test]
    fn test_empty_ledger_lists_nothing() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            data_dir: temp.path().to_path_buf(),
            overlay_dir: None,
            ledger_path: temp.path().join("absent.xml"),
        };
        assert!(ListOperation::new(&settings).execute(ListMode::Verify).is_ok());
    }
}
