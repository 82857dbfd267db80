//! Behaviour-driven step definitions driving the voting CLI scenarios.

use super::helpers::{Group, StubOptimiserBuilder, catalog_order, favouring, run_cli};
use super::*;
use ridevote_core::test_support::StubOptimiser;
use ridevote_core::{RankingError, SessionError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// State shared by the voting steps: one group and the last command's outcome.
#[derive(Debug)]
struct VotingWorld {
    group: Group,
    builder: StubOptimiserBuilder,
    result: RefCell<Option<Result<(), CliError>>>,
    stdout: RefCell<String>,
}

impl VotingWorld {
    fn new() -> Self {
        Self {
            group: Group::new(),
            builder: StubOptimiserBuilder::new(StubOptimiser::reversing()),
            result: RefCell::new(None),
            stdout: RefCell::new(String::new()),
        }
    }

    fn run(&self, argv: Vec<String>) {
        let (outcome, stdout) = run_cli(argv, &self.builder);
        self.result.replace(Some(outcome));
        self.stdout.replace(stdout);
    }

    /// Run a setup command that must succeed.
    fn run_ok(&self, argv: Vec<String>) {
        self.run(argv);
        self.assert_success();
    }

    fn assert_success(&self) {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
    }

    fn with_error<F: FnOnce(&CliError)>(&self, check: F) {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        check(error);
    }

    fn submit(&self, ids: &[String]) {
        let path = self.group.ranking_file("ranking.json", ids);
        self.run(self.group.argv_with_roster(&["submit", path.as_str()]));
    }

    fn lines(&self) -> Vec<String> {
        self.stdout.borrow().lines().map(str::to_owned).collect()
    }

    fn first_entry(&self) -> String {
        self.lines()
            .into_iter()
            .find(|line| line.starts_with("1. "))
            .expect("ranking should have a first line")
    }
}

#[fixture]
fn world() -> VotingWorld {
    VotingWorld::new()
}

// --- Given steps ---

#[given("a group with a roster")]
fn group_exists(#[from(world)] world: &VotingWorld) {
    assert!(world.group.roster().exists(), "roster file should exist");
}

#[given("{name:word} is logged in")]
fn logged_in(#[from(world)] world: &VotingWorld, name: String) {
    world.run_ok(world.group.argv_with_roster(&["login", &name]));
}

#[given("{name:word} has ranked {id:word} first")]
fn has_ranked(#[from(world)] world: &VotingWorld, name: String, id: String) {
    world.run_ok(world.group.argv_with_roster(&["login", &name]));
    world.submit(&favouring(&id));
    world.assert_success();
}

// --- When steps ---

#[when("a ranking with {id:word} first is submitted")]
fn submit_favouring(#[from(world)] world: &VotingWorld, id: String) {
    world.submit(&favouring(&id));
}

#[when("a ranking missing one attraction is submitted")]
fn submit_incomplete(#[from(world)] world: &VotingWorld) {
    let mut ids = catalog_order();
    ids.pop();
    world.submit(&ids);
}

#[when("I show the results")]
fn show_results(#[from(world)] world: &VotingWorld) {
    world.run(world.group.argv_with_roster(&["results"]));
}

#[when("I reset the rankings")]
fn reset_unconfirmed(#[from(world)] world: &VotingWorld) {
    world.run(world.group.argv_with_roster(&["reset"]));
}

#[when("I reset the rankings with confirmation")]
fn reset_confirmed(#[from(world)] world: &VotingWorld) {
    world.run(world.group.argv_with_roster(&["reset", "--yes"]));
}

#[when("I ask who is logged in")]
fn who_am_i(#[from(world)] world: &VotingWorld) {
    world.run(world.group.argv_with_roster(&["whoami"]));
}

#[then("I am shown as {name:word} with the {role:word} role")]
fn shown_as(#[from(world)] world: &VotingWorld, name: String, role: String) {
    assert_eq!(world.lines(), [format!("{name} ({role})")]);
}

#[when("I log out")]
fn log_out(#[from(world)] world: &VotingWorld) {
    world.run(world.group.argv(&["logout"]));
}

// --- Then steps ---

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &VotingWorld) {
    world.assert_success();
}

#[then("Big Thunder Mountain leads the group ranking")]
fn thunder_leads(#[from(world)] world: &VotingWorld) {
    let first = world.first_entry();
    assert!(
        first.starts_with("1. Big Thunder Mountain (Frontierland) - 1 pts, top pick of Leo, your rank #1"),
        "unexpected first entry {first:?}"
    );
}

#[then("the first entry carries my rank")]
fn first_entry_has_my_rank(#[from(world)] world: &VotingWorld) {
    let first = world.first_entry();
    assert!(first.ends_with("your rank #1"), "unexpected line {first:?}");
}

#[then("the turnout lists {name:word} as waiting")]
fn turnout_waiting(#[from(world)] world: &VotingWorld, name: String) {
    let lines = world.lines();
    let waiting = lines
        .iter()
        .find(|line| line.starts_with("Waiting for"))
        .expect("turnout should be printed");
    assert!(waiting.contains(&name), "unexpected turnout {waiting:?}");
}

#[then("the output reports two removed rankings")]
fn reports_removed(#[from(world)] world: &VotingWorld) {
    assert_eq!(world.lines(), ["Removed 2 ranking(s)."]);
}

#[then("the session is gone")]
fn session_gone(#[from(world)] world: &VotingWorld) {
    assert_eq!(world.lines(), ["Logged out."]);
    world.run(world.group.argv_with_roster(&["whoami"]));
    world.with_error(|error| assert!(matches!(error, CliError::NotLoggedIn)));
}

#[then("the command fails because the ranking is incomplete")]
fn fails_incomplete(#[from(world)] world: &VotingWorld) {
    world.with_error(|error| match error {
        CliError::InvalidRanking(RankingError::Incomplete { ranked, expected }) => {
            assert_eq!(*ranked + 1, *expected);
        }
        other => panic!("expected incomplete ranking, found {other:?}"),
    });
}

#[then("the command fails because nobody is logged in")]
fn fails_not_logged_in(#[from(world)] world: &VotingWorld) {
    world.with_error(|error| match error {
        CliError::NotLoggedIn => {}
        other => panic!("expected NotLoggedIn, found {other:?}"),
    });
}

#[then("the command fails because admin rights are needed")]
fn fails_not_admin(#[from(world)] world: &VotingWorld) {
    world.with_error(|error| match error {
        CliError::Session(SessionError::NotAdmin { .. }) => {}
        other => panic!("expected NotAdmin, found {other:?}"),
    });
}

#[then("the command fails because confirmation is missing")]
fn fails_unconfirmed(#[from(world)] world: &VotingWorld) {
    world.with_error(|error| match error {
        CliError::ConfirmationRequired { action } => assert_eq!(*action, "reset"),
        other => panic!("expected ConfirmationRequired, found {other:?}"),
    });
}

// --- Scenario registrations ---

macro_rules! register_voting_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/voting.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: VotingWorld) {
            let _ = world;
        }
    };
}

register_voting_scenario!(submit_and_view, "submitting a ranking and viewing the group result");
register_voting_scenario!(incomplete_ranking, "rejecting an incomplete ranking");
register_voting_scenario!(submit_needs_login, "submitting requires a session");
register_voting_scenario!(roster_role, "the roster decides the role");
register_voting_scenario!(member_cannot_reset, "ordinary members cannot reset");
register_voting_scenario!(reset_needs_confirmation, "resetting needs confirmation");
register_voting_scenario!(admin_reset, "an admin resets after confirming");
register_voting_scenario!(logging_out, "logging out ends the session");
