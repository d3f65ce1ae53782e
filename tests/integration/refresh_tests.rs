//! Roster refresh driven by wallet context changes

use crate::common::{Harness, SummonerFactory, account, address};
use rarity_play::core::chain::CHAIN_ID;
use rarity_play::core::models::WalletContext;
use rarity_play::core::notify::NotificationKind;
use rarity_play::{PlayError, SummonerId};
use std::time::Duration;
use tokio::sync::watch;

async fn settle() {
    tokio::time::sleep(Duration::from_millis(30)).await;
}

#[tokio::test]
async fn test_refresh_task_follows_account_switches() {
    let h = Harness::new(SummonerFactory::many(2));
    h.chain
        .mint(address(0xb2), [SummonerFactory::create(10), SummonerFactory::create(11)]);

    let (tx, rx) = watch::channel(WalletContext::new(account(), CHAIN_ID));
    let task = h.service.spawn_refresh(rx);
    settle().await;
    assert_eq!(
        h.service.selection().roster().ids(),
        vec![SummonerId::from(1), SummonerId::from(2)]
    );

    tx.send_replace(WalletContext::new(address(0xb2), CHAIN_ID));
    settle().await;
    let selection = h.service.selection();
    assert_eq!(selection.roster().ids(), vec![SummonerId::from(10), SummonerId::from(11)]);
    assert_eq!(selection.selected_id(), Some(&SummonerId::from(10)));

    drop(tx);
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("refresh task should stop when the context sender is dropped")
        .unwrap();
}

#[tokio::test]
async fn test_hidden_window_keeps_last_roster() {
    let h = Harness::new(SummonerFactory::many(3));
    let (tx, rx) = watch::channel(WalletContext::new(account(), CHAIN_ID));
    let _task = h.service.spawn_refresh(rx);
    settle().await;
    let generation = h.service.snapshot().generation;

    tx.send_modify(|ctx| ctx.visible = false);
    settle().await;
    assert_eq!(h.service.snapshot().generation, generation);
    assert_eq!(h.service.snapshot().roster.len(), 3);
}

#[tokio::test]
async fn test_source_outage_keeps_last_good_roster() {
    let h = Harness::new(SummonerFactory::many(3)).loaded().await;
    h.chain.set_source_down(true);

    let err = h.service.refresh().await.unwrap_err();
    assert!(matches!(err, PlayError::Fetch(_)));
    assert_eq!(h.service.snapshot().roster.len(), 3);

    h.chain.set_source_down(false);
    h.chain.mint(account(), [SummonerFactory::create(4)]);
    h.service.refresh().await.unwrap();
    assert_eq!(h.service.snapshot().roster.len(), 4);
    assert!(h.service.snapshot().fetched_at.is_some());
}

#[tokio::test]
async fn test_background_refresh_failure_is_notified() {
    let h = Harness::new(SummonerFactory::many(2));
    h.chain.set_source_down(true);

    let (tx, rx) = watch::channel(WalletContext::new(account(), CHAIN_ID));
    let task = h.service.spawn_refresh(rx);
    settle().await;
    drop(tx);
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("refresh task should stop when the context sender is dropped")
        .unwrap();

    let events = h.sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, NotificationKind::Error);
    assert_eq!(events[0].message, "Failed to load summoners");
    assert!(h.service.snapshot().roster.is_empty());
}
