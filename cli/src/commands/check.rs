use std::path::Path;

use anyhow::Result;
use imagerie_core::guidelines::GuidelineStore;

use super::ui;

pub fn handle_check(path: &Path) -> Result<()> {
    let store = match GuidelineStore::load(path) {
        Ok(store) => store,
        Err(e) => {
            ui::print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    ui::print_header(&format!("Guidelines : {}", path.display()));
    ui::print_key_value(
        "Version",
        &store
            .version()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    ui::print_key_value("Entrées", &store.len().to_string());
    for (motif, count) in store.motif_counts() {
        let motif = if motif.is_empty() { "(sans motif)" } else { motif.as_str() };
        println!("  {:<30} {}", motif, count);
    }
    ui::print_success("fichier valide");
    Ok(())
}
