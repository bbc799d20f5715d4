use ifra_core::{decide, Continuation, PageObservation, StopReason};

fn page(page: u32, rows: usize) -> PageObservation {
    PageObservation {
        page,
        fetch_ok: true,
        rows,
        new_rows: rows,
        next_page: None,
        single_shot: false,
    }
}

#[test]
fn continues_while_rows_arrive() {
    assert_eq!(decide(&page(1, 25), 200), Continuation::Continue);
}

#[test]
fn fetch_failure_has_highest_priority() {
    let obs = PageObservation {
        fetch_ok: false,
        rows: 0,
        next_page: Some(false),
        ..page(1, 0)
    };
    assert_eq!(decide(&obs, 200), Continuation::Stop(StopReason::TransportFailure));
}

#[test]
fn empty_page_beats_missing_next_link() {
    let obs = PageObservation {
        next_page: Some(false),
        ..page(4, 0)
    };
    assert_eq!(decide(&obs, 200), Continuation::Stop(StopReason::NoRows));
}

#[test]
fn page_of_repeats_stops_the_walk() {
    let obs = PageObservation {
        new_rows: 0,
        next_page: Some(true),
        ..page(3, 25)
    };
    assert_eq!(decide(&obs, 200), Continuation::Stop(StopReason::NoNewRows));

    let obs = PageObservation {
        new_rows: 1,
        ..page(3, 25)
    };
    assert_eq!(decide(&obs, 200), Continuation::Continue);
}

#[test]
fn missing_next_link_stops_when_declared() {
    let obs = PageObservation {
        next_page: Some(false),
        ..page(2, 10)
    };
    assert_eq!(decide(&obs, 200), Continuation::Stop(StopReason::NoNextPage));

    let obs = PageObservation {
        next_page: Some(true),
        ..page(2, 10)
    };
    assert_eq!(decide(&obs, 200), Continuation::Continue);
}

#[test]
fn single_shot_sources_stop_after_one_page() {
    let obs = PageObservation {
        single_shot: true,
        ..page(1, 10)
    };
    assert_eq!(decide(&obs, 200), Continuation::Stop(StopReason::SinglePage));
}

#[test]
fn ceiling_bounds_the_walk() {
    assert_eq!(decide(&page(199, 1), 200), Continuation::Continue);
    assert_eq!(decide(&page(200, 1), 200), Continuation::Stop(StopReason::PageCeiling));
    assert_eq!(decide(&page(1, 1), 0), Continuation::Stop(StopReason::PageCeiling));
}
