//! Configuration files feeding the service

use crate::assert_ok;
use crate::common::{Harness, SummonerFactory};
use rarity_play::{Config, PlayError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_chunk_size_from_file_drives_runs() {
    let file = write_config(
        r#"
batch:
  chunk_size: 40
contracts:
  helper: "0x0000000000000000000000000000000000000099"
daycare:
  max_days: 10
"#,
    );
    let config = assert_ok!(Config::from_file(file.path()).await);

    let h = Harness::with_config(SummonerFactory::many(150), config.play.clone())
        .loaded()
        .await;
    let report = assert_ok!(h.service.register_daycare_all(10).await);
    assert_eq!(report.total_chunks, 4);
    assert_eq!(report.summary(), "4 of 4 chunks completed");

    let too_long = h.service.register_daycare_all(11).await;
    assert!(matches!(too_long, Err(PlayError::Validation(_))));
}

#[tokio::test]
async fn test_helper_cannot_be_burn_address() {
    let file = write_config(
        r#"
contracts:
  helper: "0x000000000000000000000000000000000000dEaD"
"#,
    );
    let result = Config::from_file(file.path()).await;
    assert!(matches!(result, Err(PlayError::Config(msg)) if msg.contains("differ")));
}

#[tokio::test]
async fn test_fee_quote_uses_configured_rate() {
    let file = write_config(
        r#"
contracts:
  helper: "0x0000000000000000000000000000000000000099"
daycare:
  fee_per_day_wei: "250000000000000000"
"#,
    );
    let config = assert_ok!(Config::from_file(file.path()).await);
    let h = Harness::with_config(SummonerFactory::many(1), config.play);
    assert_eq!(h.service.daycare_quote(4, 2), 2_000_000_000_000_000_000);
}
