use super::*;
use crate::{
    codec::encode,
    error::{ErrorInfo, ErrorKind},
    query::FilterPair,
};

type State = CollectionState<&'static str>;
type Action = CollectionAction<&'static str>;

fn page(items: Vec<&'static str>, count: u64) -> CollectionPage<&'static str> {
    CollectionPage::from_parts(items, 20, 0, count)
}

fn issued(transition: Transition) -> FetchTicket {
    match transition {
        Transition::Issue(ticket) => ticket,
        other => panic!("expected a request, got {other:?}"),
    }
}

#[test]
fn initial_state_is_idle_and_empty() {
    let state = State::default();
    assert_eq!(state.request_seq(), 0);
    assert!(!state.is_loading());
    assert!(state.error().is_none());
    assert!(state.items().is_empty());
    assert_eq!(state.data().count, 0);
    assert_eq!(state.query(), &QueryModel::default());
}

#[test]
fn request_bumps_sequence_and_keeps_previous_data_visible() {
    let mut state = State::default();
    let first = issued(reduce(&mut state, Action::Refresh));
    reduce(
        &mut state,
        Action::Success {
            seq: first.seq,
            payload: page(vec!["a"], 1),
        },
    );

    let second = issued(reduce(&mut state, Action::search("b")));
    assert_eq!(second.seq, first.seq + 1);
    assert!(state.is_loading());
    assert_eq!(state.items(), &["a"]);
    assert_eq!(state.query().search, "b");
}

#[test]
fn late_response_for_superseded_request_is_discarded() {
    let mut state = State::default();
    let first = issued(reduce(&mut state, Action::search("al")));
    let second = issued(reduce(&mut state, Action::search("alice")));

    assert_eq!(
        reduce(
            &mut state,
            Action::Success {
                seq: second.seq,
                payload: page(vec!["alice"], 1),
            },
        ),
        Transition::Updated
    );
    assert_eq!(
        reduce(
            &mut state,
            Action::Success {
                seq: first.seq,
                payload: page(vec!["al", "alice", "alfred"], 3),
            },
        ),
        Transition::Discarded { seq: first.seq }
    );

    assert_eq!(state.items(), &["alice"]);
    assert_eq!(state.data().count, 1);
    assert!(!state.is_loading());
}

#[test]
fn stale_error_does_not_touch_current_request() {
    let mut state = State::default();
    let first = issued(reduce(&mut state, Action::Refresh));
    let _second = issued(reduce(&mut state, Action::toggle_sort("name")));

    let transition = reduce(
        &mut state,
        Action::Error {
            seq: first.seq,
            error: ErrorInfo::new(ErrorKind::Network, "connection reset"),
        },
    );
    assert_eq!(transition, Transition::Discarded { seq: first.seq });
    assert!(state.is_loading());
    assert!(state.error().is_none());
}

#[test]
fn error_keeps_previous_page_under_the_banner() {
    let mut state = State::default();
    let first = issued(reduce(&mut state, Action::Refresh));
    reduce(
        &mut state,
        Action::Success {
            seq: first.seq,
            payload: page(vec!["a", "b"], 2),
        },
    );
    let second = issued(reduce(&mut state, Action::SetPage(20)));
    reduce(
        &mut state,
        Action::Error {
            seq: second.seq,
            error: ErrorInfo::new(ErrorKind::Http(500), "Internal: boom"),
        },
    );

    assert!(!state.is_loading());
    assert_eq!(state.error().and_then(ErrorInfo::status), Some(500));
    assert_eq!(state.items(), &["a", "b"]);
}

#[test]
fn second_terminal_for_settled_request_is_discarded() {
    let mut state = State::default();
    let ticket = issued(reduce(&mut state, Action::Refresh));
    reduce(
        &mut state,
        Action::Success {
            seq: ticket.seq,
            payload: page(vec!["a"], 1),
        },
    );
    let transition = reduce(
        &mut state,
        Action::Error {
            seq: ticket.seq,
            error: ErrorInfo::new(ErrorKind::Decode, "late"),
        },
    );
    assert_eq!(transition, Transition::Discarded { seq: ticket.seq });
    assert!(state.error().is_none());
}

#[test]
fn filter_then_sort_scenario_resets_offset_and_flips_direction() {
    let mut state = State::default();
    reduce(&mut state, Action::SetPage(40));
    assert_eq!(state.query().pagination.offset, 40);

    let ticket = issued(reduce(&mut state, Action::add_filter("team", "payments")));
    assert_eq!(
        encode(&ticket.query).to_query_string(),
        "limit=20&offset=0&team=payments"
    );

    reduce(&mut state, Action::toggle_sort("name"));
    assert_eq!(
        state.query().sort,
        Some(Sort {
            field: "name".into(),
            direction: SortDirection::Asc,
        })
    );
    assert_eq!(state.query().pagination.offset, 0);
    assert_eq!(state.query().filters, vec![FilterPair::new("team", "payments")]);

    reduce(&mut state, Action::SetPage(20));
    reduce(&mut state, Action::toggle_sort("name"));
    assert_eq!(
        state.query().sort.as_ref().map(|sort| sort.direction),
        Some(SortDirection::Desc)
    );
    assert_eq!(state.query().pagination.offset, 0);
}

#[test]
fn toggling_a_different_field_starts_ascending() {
    let mut state = State::default();
    reduce(&mut state, Action::toggle_sort("name"));
    reduce(&mut state, Action::toggle_sort("name"));
    reduce(&mut state, Action::toggle_sort("created_at"));
    assert_eq!(
        state.query().sort,
        Some(Sort {
            field: "created_at".into(),
            direction: SortDirection::Asc,
        })
    );
}

#[test]
fn add_filter_twice_matches_adding_once() {
    let mut state = State::default();
    issued(reduce(&mut state, Action::add_filter("team", "payments")));
    let before = state.request_seq();
    assert_eq!(
        reduce(&mut state, Action::add_filter("team", "payments")),
        Transition::Unchanged
    );
    assert_eq!(state.request_seq(), before);
    assert_eq!(state.query().filters, vec![FilterPair::new("team", "payments")]);
}

#[test]
fn repeated_keys_keep_every_value() {
    let mut state = State::default();
    reduce(&mut state, Action::add_filter("team", "payments"));
    reduce(&mut state, Action::add_filter("team", "infra"));
    assert_eq!(
        state.query().filter_values("team").collect::<Vec<_>>(),
        vec!["payments", "infra"]
    );

    reduce(&mut state, Action::remove_filter("team", "payments"));
    assert_eq!(state.query().filters, vec![FilterPair::new("team", "infra")]);
}

#[test]
fn removing_an_absent_filter_is_a_no_op() {
    let mut state = State::default();
    reduce(&mut state, Action::add_filter("team", "payments"));
    let snapshot = state.clone();
    assert_eq!(
        reduce(&mut state, Action::remove_filter("team", "infra")),
        Transition::Unchanged
    );
    assert_eq!(state, snapshot);
}

#[test]
fn reserved_and_unknown_filter_keys_are_rejected() {
    let mut state = State::new(QueryModel::default(), FilterKeys::only(["team"]));
    for (key, value) in [("limit", "5"), ("search", "x"), ("", "x"), ("region", "eu")] {
        assert_eq!(
            reduce(&mut state, Action::add_filter(key, value)),
            Transition::Unchanged,
            "{key}={value}"
        );
    }
    assert!(state.query().filters.is_empty());
    assert_eq!(state.request_seq(), 0);
}

#[test]
fn clear_filters_only_requests_when_something_was_active() {
    let mut state = State::default();
    assert_eq!(reduce(&mut state, Action::ClearFilters), Transition::Unchanged);
    reduce(&mut state, Action::add_filter("team", "payments"));
    reduce(&mut state, Action::SetPage(60));
    let ticket = issued(reduce(&mut state, Action::ClearFilters));
    assert!(ticket.query.filters.is_empty());
    assert_eq!(ticket.query.pagination.offset, 0);
}

#[test]
fn clear_search_requests_only_after_a_non_empty_search() {
    let mut state = State::default();
    assert_eq!(reduce(&mut state, Action::ClearSearch), Transition::Unchanged);

    issued(reduce(&mut state, Action::search("alice")));
    let ticket = issued(reduce(&mut state, Action::ClearSearch));
    assert_eq!(ticket.query.search, "");
    assert_eq!(reduce(&mut state, Action::ClearSearch), Transition::Unchanged);
}

#[test]
fn filter_panel_visibility_never_requests() {
    let mut state = State::default();
    assert_eq!(reduce(&mut state, Action::ShowFilters), Transition::Updated);
    assert!(state.query().filters_visible);
    assert_eq!(reduce(&mut state, Action::ShowFilters), Transition::Unchanged);
    assert_eq!(reduce(&mut state, Action::HideFilters), Transition::Updated);
    assert_eq!(state.request_seq(), 0);
    assert!(!state.is_loading());
}

#[test]
fn panel_visibility_survives_predicate_changes() {
    let mut state = State::default();
    reduce(&mut state, Action::ShowFilters);
    reduce(&mut state, Action::add_filter("team", "payments"));
    assert!(state.query().filters_visible);
}

#[test]
fn set_page_clamps_negative_offsets() {
    let mut state = State::default();
    let ticket = issued(reduce(&mut state, Action::SetPage(-40)));
    assert_eq!(ticket.query.pagination.offset, 0);
}

#[test]
fn go_to_page_is_one_based() {
    let mut state = State::new(QueryModel::with_limit(25), FilterKeys::Any);
    assert_eq!(issued(reduce(&mut state, Action::GoToPage(3))).query.pagination.offset, 50);
    assert_eq!(issued(reduce(&mut state, Action::GoToPage(0))).query.pagination.offset, 0);
}

#[test]
fn set_limit_returns_to_first_page() {
    let mut state = State::default();
    reduce(&mut state, Action::SetPage(80));
    let ticket = issued(reduce(&mut state, Action::SetLimit(50)));
    assert_eq!(ticket.query.pagination.limit, 50);
    assert_eq!(ticket.query.pagination.offset, 0);
}

#[test]
fn poll_is_skipped_while_a_request_is_in_flight() {
    let mut state = State::default();
    let ticket = issued(reduce(&mut state, Action::Poll));
    assert_eq!(reduce(&mut state, Action::Poll), Transition::Unchanged);
    reduce(
        &mut state,
        Action::Success {
            seq: ticket.seq,
            payload: page(vec![], 0),
        },
    );
    assert_eq!(issued(reduce(&mut state, Action::Poll)).seq, ticket.seq + 1);
}

#[test]
fn restore_sanitizes_filters_and_keeps_panel_state() {
    let mut state = State::new(QueryModel::default(), FilterKeys::only(["team"]));
    reduce(&mut state, Action::ShowFilters);
    let restored = QueryModel {
        filters: vec![
            FilterPair::new("team", "infra"),
            FilterPair::new("team", "infra"),
            FilterPair::new("region", "eu"),
        ],
        search: "db".into(),
        ..QueryModel::with_limit(10)
    };
    let ticket = issued(reduce(&mut state, Action::Restore(restored)));
    assert_eq!(ticket.query.filters, vec![FilterPair::new("team", "infra")]);
    assert_eq!(ticket.query.pagination.limit, 10);
    assert!(ticket.query.filters_visible);
}

#[test]
fn explicit_request_admits_only_schema_filters_once() {
    let filter_keys = FilterKeys::only(["team"]);
    let mut state = State::new(QueryModel::default(), filter_keys.clone());
    let query = QueryModel {
        sort: Some(Sort {
            field: String::new(),
            direction: SortDirection::Desc,
        }),
        filters: vec![
            FilterPair::new("team", "a"),
            FilterPair::new("team", "a"),
            FilterPair::new("limit", "5"),
        ],
        ..QueryModel::default()
    };
    let ticket = issued(reduce(&mut state, Action::Request(query)));
    assert_eq!(ticket.query.filters, vec![FilterPair::new("team", "a")]);
    assert_eq!(ticket.query.sort, None);
    assert_eq!(state.query(), &ticket.query);
    assert_eq!(
        crate::codec::decode(&encode(state.query()), &filter_keys),
        Ok(state.query().without_ui_state())
    );
}
