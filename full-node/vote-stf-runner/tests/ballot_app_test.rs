use std::io::Write;
use std::sync::Arc;

use vote_ballot::{BallotConfig, BallotError, CallMessage};
use vote_modules_api::Address;
use vote_stf_runner::config::{from_toml_path, GenesisConfig};
use vote_stf_runner::BallotApp;

fn admin() -> Address {
    Address::from([1; 32])
}

fn new_app() -> BallotApp {
    BallotApp::new(BallotConfig { admin: admin() }).unwrap()
}

fn register_voter(app: &BallotApp, voter: &Address) {
    app.apply_call(admin(), CallMessage::RegisterVoter(voter.clone()))
        .unwrap();
}

fn register_candidate(app: &BallotApp, name: &str, address: &Address) {
    app.apply_call(
        admin(),
        CallMessage::RegisterCandidate {
            name: name.to_owned(),
            address: address.clone(),
        },
    )
    .unwrap();
}

#[test]
fn test_full_ballot_scenario() {
    let app = new_app();

    let candidate_1 = Address::from([101; 32]);
    let candidate_2 = Address::from([102; 32]);
    register_candidate(&app, "candidate_1", &candidate_1);
    register_candidate(&app, "candidate_2", &candidate_2);

    let voter_1 = Address::from([11; 32]);
    let voter_2 = Address::from([12; 32]);
    let voter_3 = Address::from([13; 32]);
    for voter in [&voter_1, &voter_2, &voter_3] {
        register_voter(&app, voter);
        assert!(app.is_registered(voter));
        assert!(!app.has_voted(voter));
    }

    let events = app
        .apply_call(voter_1.clone(), CallMessage::Vote(candidate_1.clone()))
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].key(), "vote");

    app.apply_call(voter_2, CallMessage::Vote(candidate_2.clone()))
        .unwrap();
    app.apply_call(voter_3, CallMessage::Vote(candidate_2.clone()))
        .unwrap();

    assert!(app.has_voted(&voter_1));
    assert_eq!(app.candidate_vote_count(&candidate_1).unwrap(), 1);
    assert_eq!(app.candidate_vote_count(&candidate_2).unwrap(), 2);
    assert_eq!(app.total_vote_count(), 3);

    let winner = app.winning_candidate().unwrap();
    assert_eq!(winner.address, candidate_2.to_string());
    assert_eq!(winner.name, "candidate_2");
    assert_eq!(winner.count, 2);
}

/// Snapshot of every observable query output, for before/after comparisons.
fn observe(app: &BallotApp, voters: &[Address], candidates: &[Address]) -> String {
    let mut out = String::new();
    for voter in voters {
        out.push_str(&format!(
            "{voter}: registered={} voted={}\n",
            app.is_registered(voter),
            app.has_voted(voter),
        ));
    }
    for candidate in candidates {
        out.push_str(&format!(
            "{candidate}: {:?}\n",
            app.candidate(candidate).ok(),
        ));
    }
    out.push_str(&format!("total={}\n", app.total_vote_count()));
    out.push_str(&format!("winner={:?}\n", app.winning_candidate().ok()));
    out
}

#[test]
fn test_failed_calls_leave_no_trace() {
    let app = new_app();

    let candidate = Address::from([101; 32]);
    register_candidate(&app, "candidate_1", &candidate);
    let voter = Address::from([11; 32]);
    register_voter(&app, &voter);
    app.apply_call(voter.clone(), CallMessage::Vote(candidate.clone()))
        .unwrap();

    let outsider = Address::from([42; 32]);
    let ghost = Address::from([66; 32]);
    let voters = [voter.clone(), outsider.clone()];
    let candidates = [candidate.clone(), ghost.clone()];

    let before = observe(&app, &voters, &candidates);

    // A second vote, a vote from an unregistered caller, a vote for an
    // unknown candidate, and a registration by a non-admin: all rejected.
    assert!(app
        .apply_call(voter.clone(), CallMessage::Vote(candidate.clone()))
        .is_err());
    assert!(app
        .apply_call(outsider.clone(), CallMessage::Vote(candidate.clone()))
        .is_err());
    assert!(app
        .apply_call(voter.clone(), CallMessage::Vote(ghost.clone()))
        .is_err());
    assert!(app
        .apply_call(outsider.clone(), CallMessage::RegisterVoter(ghost.clone()))
        .is_err());

    let after = observe(&app, &voters, &candidates);
    assert_eq!(before, after);
}

#[test]
fn test_winner_without_candidates_fails() {
    let app = new_app();
    assert_eq!(app.winning_candidate().unwrap_err(), BallotError::NoCandidates);
}

#[test]
fn test_concurrent_voters_each_count_once() {
    let app = Arc::new(new_app());

    let candidate = Address::from([101; 32]);
    register_candidate(&app, "candidate_1", &candidate);

    let voters: Vec<Address> = (0..8).map(|i| Address::from([10 + i as u8; 32])).collect();
    for voter in &voters {
        register_voter(&app, voter);
    }

    std::thread::scope(|scope| {
        for voter in &voters {
            let app = Arc::clone(&app);
            let candidate = &candidate;
            scope.spawn(move || {
                // Each voter tries twice; exactly one attempt may land.
                let first = app.apply_call(voter.clone(), CallMessage::Vote(candidate.clone()));
                let second = app.apply_call(voter.clone(), CallMessage::Vote(candidate.clone()));
                assert!(first.is_ok());
                assert!(second.is_err());
            });
        }
    });

    assert_eq!(app.total_vote_count(), voters.len() as u64);
    assert_eq!(
        app.candidate_vote_count(&candidate).unwrap(),
        voters.len() as u64
    );
}

#[test]
fn test_genesis_config_from_toml() {
    let admin = admin();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "admin = \"{admin}\"").unwrap();

    let config: GenesisConfig = from_toml_path(file.path()).unwrap();
    assert_eq!(config.admin, admin);

    let app = BallotApp::new(config.into()).unwrap();
    let voter = Address::from([11; 32]);
    register_voter(&app, &voter);
    assert!(app.is_registered(&voter));
}
