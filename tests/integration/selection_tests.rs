//! Selection and modal state through the service

use crate::assert_ok;
use crate::common::{Harness, SummonerFactory};
use rarity_play::core::notify::NotificationKind;
use rarity_play::core::{Modal, View};
use rarity_play::{PlayError, SummonerId};

#[tokio::test]
async fn test_walks_the_roster_in_k_minus_one_steps() {
    let h = Harness::new(SummonerFactory::many(5)).loaded().await;
    assert_eq!(h.service.selection().selected_index(), Some(0));

    for _ in 0..4 {
        h.service.select_next();
    }
    assert_eq!(h.service.selection().selected_id(), Some(&SummonerId::from(5)));

    h.service.select_next();
    assert_eq!(h.service.selection().selected_index(), Some(4));

    for _ in 0..10 {
        h.service.select_previous();
    }
    assert_eq!(h.service.selection().selected_index(), Some(0));
}

#[tokio::test]
async fn test_selection_survives_reload_when_still_owned() {
    let h = Harness::new(SummonerFactory::many(3)).loaded().await;
    assert_ok!(h.service.select(&SummonerId::from(3)));
    h.service.set_view(View::Skills);

    // Transferring summoner 3 away moves the selection to the new first entry
    assert_ok!(
        h.service
            .transfer_selected("0x00000000000000000000000000000000000000c3")
            .await
    );
    let selection = h.service.selection();
    assert_eq!(selection.roster().ids(), vec![SummonerId::from(1), SummonerId::from(2)]);
    assert_eq!(selection.selected_id(), Some(&SummonerId::from(1)));
    assert_eq!(selection.view(), View::Skills);

    // A reload that still contains the selection keeps it
    assert_ok!(h.service.select(&SummonerId::from(2)));
    h.chain.mint(crate::common::account(), [SummonerFactory::create(7)]);
    assert_ok!(h.service.refresh().await);
    assert_eq!(h.service.selection().selected_id(), Some(&SummonerId::from(2)));
}

#[tokio::test]
async fn test_only_one_modal_open() {
    let h = Harness::new(SummonerFactory::many(1)).loaded().await;

    h.service.toggle_modal(Modal::Daycare);
    h.service.toggle_modal(Modal::Delete);
    assert_eq!(h.service.selection().modal(), Modal::Delete);

    h.service.toggle_modal(Modal::Delete);
    assert!(!h.service.selection().modal().is_open());
}

#[tokio::test]
async fn test_unknown_selection_is_reported_once() {
    let h = Harness::new(SummonerFactory::many(2)).loaded().await;

    let result = h.service.select(&SummonerId::from(99));
    assert!(matches!(result, Err(PlayError::NotFound(_))));
    assert_eq!(h.kinds(), vec![NotificationKind::Error]);
    assert_eq!(h.service.selection().selected_index(), Some(0));
}
