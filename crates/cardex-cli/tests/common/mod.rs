#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;

pub const CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// A `cardex` command isolated to `data_dir`, with config loaded from
/// `data_dir/config.toml` (absent means defaults).
pub fn cardex_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cardex"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("CARDEX_DATA_DIR", data_dir);
    cmd.env("CARDEX_CONFIG", data_dir.join("config.toml"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write a config file pointing the crawler at `catalog_url`, with no pack delay.
#[allow(dead_code)]
pub fn write_config(data_dir: &Path, catalog_url: &str) {
    let content = format!("catalog_url = \"{catalog_url}\"\n\n[fetch]\npack_delay_ms = 0\n");
    std::fs::write(data_dir.join("config.toml"), content).unwrap();
}

/// Seed the card cache with a small catalog.
#[allow(dead_code)]
pub fn seed_cache(data_dir: &Path) {
    let cards = serde_json::json!([
        {
            "name": "Dark Magician",
            "attribute": "DARK",
            "level": "7",
            "type": "Spellcaster / Normal",
            "atk": "2500",
            "def": "2100",
            "description": "The ultimate wizard in terms of attack and defense.",
            "rarity": "Ultra Rare"
        },
        {
            "name": "Dark Magician Girl",
            "attribute": "DARK",
            "level": "6",
            "card_type": "Spellcaster / Effect",
            "atk": "2000",
            "defense": "1700",
            "description": "Gains 300 ATK for every Dark Magician in either GY.",
            "rarity": "Secret Rare"
        },
        {
            "name": "Mystical Elf",
            "attribute": "LIGHT",
            "level": "4",
            "type": "Spellcaster / Normal",
            "atk": "800",
            "def": "2000",
            "description": "A delicate elf that lacks offense, but has a terrific defense.",
            "rarity": "Common"
        }
    ]);
    std::fs::write(
        data_dir.join("card_cache.json"),
        serde_json::to_string_pretty(&cards).unwrap(),
    )
    .unwrap();
}
