//! Registers a contract from the test fixtures and prints a few messages.
//!
//! Run with `cargo run -p lingo-i18n --example greetings_demo [locale]`.

use lingo_common::logging::init_dev_logging;
use lingo_i18n::{args, Contract, DirectoryHost, FormatPreset, LanguageManager, SlotDescriptor};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    init_dev_logging().map_err(|e| anyhow::anyhow!(e))?;

    let locale = std::env::args().nth(1).unwrap_or_else(|| "en_US".to_string());

    let contract = Contract::builder("greetings")
        .folder("greetings")
        .languages(["en", "es"])
        .message("player", 1, SlotDescriptor::text("greetings.player"))
        .message(
            "farewell",
            1,
            SlotDescriptor::text("greetings.farewell").preset(FormatPreset::Plain),
        )
        .message("help", 0, SlotDescriptor::list("help"))
        .build()?;

    let data_dir = std::env::temp_dir().join("lingo-demo");
    let resources = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let host = DirectoryHost::new(&data_dir, resources);

    let manager = LanguageManager::default();
    manager.register_bundled(&host, contract)?;

    let provider = manager.provider_for("greetings", &locale)?;
    println!("{}", provider.text("player", &args!["Chris"]));
    println!("{}", provider.text("farewell", &args!["Chris"]));
    for line in provider.list("help", &[]) {
        println!("{line}");
    }
    println!("{}", provider.possessive("Chris"));

    Ok(())
}
