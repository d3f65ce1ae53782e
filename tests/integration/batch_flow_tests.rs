//! Bulk action runs from the player's side

use crate::common::fixtures::helper;
use crate::common::{Harness, SummonerFactory, account};
use crate::{assert_err, assert_ok};
use rarity_play::config::PlayConfig;
use rarity_play::core::batch::{chunk, partition};
use rarity_play::core::chain::ChainCall;
use rarity_play::core::notify::NotificationKind;
use rarity_play::{Activity, PlayError, RunState, SummonerId};

fn ids(range: std::ops::RangeInclusive<u64>) -> Vec<SummonerId> {
    range.map(SummonerId::from).collect()
}

#[tokio::test]
async fn test_cellar_150_unapproved_in_two_ordered_chunks() {
    let h = Harness::new((1..=150).map(SummonerFactory::cellar_ready).collect())
        .loaded()
        .await;

    let report = assert_ok!(h.service.send_cellar().await);
    assert_eq!(report.total_chunks, 2);
    assert_eq!(report.confirmed_ids(), ids(1..=150));

    // Oracle, submission and confirmation strictly alternate per chunk
    let shape: Vec<&str> = h
        .chain
        .calls()
        .iter()
        .map(|call| match call {
            ChainCall::IsApproved { .. } => "check",
            ChainCall::Submitted { .. } => "send",
            ChainCall::Confirmed { .. } => "confirm",
            ChainCall::Rejected { .. } => "reject",
        })
        .collect();
    assert_eq!(shape, vec!["check", "send", "confirm", "check", "send", "confirm"]);

    let submissions = h.chain.submissions();
    assert_eq!(submissions[0], ("cellar", ids(1..=100), ids(1..=100)));
    assert_eq!(submissions[1], ("cellar", ids(101..=150), ids(101..=150)));

    let loading: Vec<String> = h
        .sink
        .events()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::Loading)
        .map(|n| n.message)
        .collect();
    assert_eq!(loading, vec!["Sending chunk: 1 of 2", "Sending chunk: 2 of 2"]);
}

#[test]
fn test_chunk_shape_for_250_ids() {
    let all = ids(1..=250);
    let chunks = assert_ok!(chunk(&all, 100));
    let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    assert_eq!(chunks.concat(), all);
}

#[tokio::test]
async fn test_partition_against_partial_approvals() {
    let h = Harness::new(SummonerFactory::many(6));
    h.chain
        .approve_for_helper(&[SummonerId::from(2), SummonerId::from(5)]);

    let chunk_ids = ids(1..=6);
    let split = assert_ok!(partition(&*h.chain, &chunk_ids).await);
    assert_eq!(split.eligible, vec![SummonerId::from(2), SummonerId::from(5)]);
    assert_eq!(split.needs_action, [1, 3, 4, 6].map(SummonerId::from).to_vec());
    assert_eq!(split.len(), chunk_ids.len());
}

#[tokio::test]
async fn test_oracle_outage_aborts_before_sending() {
    let h = Harness::new((1..=3).map(SummonerFactory::cellar_ready).collect())
        .loaded()
        .await;
    h.chain.set_oracle_down(true);

    let err = assert_err!(h.service.send_cellar().await);
    assert!(matches!(err, PlayError::EligibilityCheck(_)));
    assert!(h.chain.submissions().is_empty());
    assert_eq!(h.kinds(), vec![NotificationKind::Error]);
}

#[tokio::test]
async fn test_daycare_abort_on_second_of_three_chunks() {
    let mut config = PlayConfig::default();
    config.contracts.helper = helper();
    config.batch.chunk_size = 2;
    let h = Harness::with_config(SummonerFactory::many(6), config)
        .loaded()
        .await;
    h.chain.reject_submission(2);

    let err = assert_err!(h.service.register_daycare_all(5).await);
    match err {
        PlayError::Submission {
            chunk,
            total,
            completed,
            ..
        } => assert_eq!((chunk, total, completed), (2, 3, 1)),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        h.service.run_state(),
        RunState::Failed {
            chunk: 2,
            total: 3,
            completed: 1
        }
    );

    // The first chunk stays registered, nothing after the failure was sent
    assert_eq!(h.chain.summoner(&SummonerId::from(2)).unwrap().daycare_days, 5);
    assert_eq!(h.chain.summoner(&SummonerId::from(3)).unwrap().daycare_days, 0);
    assert_eq!(h.chain.submissions().len(), 2);

    let outcomes: Vec<NotificationKind> = h.sink.outcomes().iter().map(|n| n.kind).collect();
    assert_eq!(outcomes, vec![NotificationKind::Success, NotificationKind::Error]);
}

#[tokio::test]
async fn test_adventure_then_level_up() {
    let mut summoners = SummonerFactory::many(3);
    summoners.push(SummonerFactory::resting(4));
    summoners[0].xp = 750 * rarity_play::core::models::WEI_PER_UNIT;
    let h = Harness::new(summoners).loaded().await;

    assert_ok!(h.service.approve_helper().await);
    assert_eq!(h.service.candidates(Activity::Adventure), ids(1..=3));
    assert!(h.service.candidates(Activity::LevelUp).is_empty());

    let report = assert_ok!(h.service.send_adventure().await);
    assert_eq!(report.confirmed_ids(), ids(1..=3));

    // 750 + 250 xp reaches the level 1 threshold
    assert_eq!(h.service.candidates(Activity::LevelUp), ids(1..=1));
    let report = assert_ok!(h.service.send_level_up().await);
    assert!(report.is_complete());
    assert_eq!(h.chain.summoner(&SummonerId::from(1)).unwrap().level, 2);
    assert_eq!(h.chain.owner_of(&SummonerId::from(1)), Some(account()));
}

#[tokio::test]
async fn test_nothing_to_send() {
    let h = Harness::new(vec![SummonerFactory::resting(1)]).loaded().await;
    assert_ok!(h.service.approve_helper().await);
    h.sink.clear();

    let err = assert_err!(h.service.send_adventure().await);
    assert_eq!(err.to_string(), "Validation error: No summoners available");
    assert_eq!(h.kinds(), vec![NotificationKind::Error]);
    assert_eq!(h.service.run_state(), RunState::Idle);
}
