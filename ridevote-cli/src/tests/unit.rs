//! Focused unit tests covering CLI configuration and workspace helpers.

use super::helpers::{Group, ROSTER_JSON, write_utf8};
use super::*;
use crate::itinerary::ItineraryConfig;
use crate::results::ResultsConfig;
use crate::vote::{LoginConfig, SubmitConfig, load_ranking_ids};
use crate::workspace::{DEFAULT_DATA_DIR, Workspace, load_roster, resolve_session};
use camino::Utf8PathBuf;
use ortho_config::{MergeComposer, OrthoConfig};
use ridevote_core::{AbsencePolicy, Role, Roster};
use rstest::rstest;
use serde_json::json;

#[rstest]
fn login_without_name_errors() {
    let err = LoginConfig::try_from(LoginArgs::default()).expect_err("missing name should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_NAME);
            assert_eq!(env, ENV_LOGIN_NAME);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn login_with_blank_name_errors() {
    let args = LoginArgs {
        name: Some("   ".to_owned()),
        ..LoginArgs::default()
    };
    let err = LoginConfig::try_from(args).expect_err("blank name should error");
    assert!(matches!(err, CliError::MissingArgument { field: ARG_NAME, .. }));
}

#[rstest]
fn submit_without_ranking_path_errors() {
    let err =
        SubmitConfig::try_from(SubmitArgs::default()).expect_err("missing path should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_RANKING);
            assert_eq!(env, ENV_SUBMIT_RANKING);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn data_dir_defaults_to_hidden_directory() {
    let config = SubmitConfig::try_from(SubmitArgs {
        ranking_path: Some(Utf8PathBuf::from("mine.json")),
        ..SubmitArgs::default()
    })
    .expect("config should build");
    assert_eq!(config.workspace, Workspace::new(None));
    assert_eq!(
        config.workspace.database_path(),
        Utf8PathBuf::from(DEFAULT_DATA_DIR).join("rankings.db")
    );
}

#[rstest]
#[case(None, AbsencePolicy::Neutral)]
#[case(Some("neutral"), AbsencePolicy::Neutral)]
#[case(Some("Penalised"), AbsencePolicy::Penalised)]
#[case(Some("penalized"), AbsencePolicy::Penalised)]
fn results_policy_parses(#[case] raw: Option<&str>, #[case] expected: AbsencePolicy) {
    let config = ResultsConfig::try_from(ResultsArgs {
        policy: raw.map(str::to_owned),
        ..ResultsArgs::default()
    })
    .expect("policy should parse");
    assert_eq!(config.policy, expected);
}

#[rstest]
fn results_rejects_unknown_policy() {
    let err = ResultsConfig::try_from(ResultsArgs {
        policy: Some("lenient".to_owned()),
        ..ResultsArgs::default()
    })
    .expect_err("unknown policy should error");
    match err {
        CliError::InvalidArgument { field, message } => {
            assert_eq!(field, ARG_POLICY);
            assert!(message.contains("lenient"));
        }
        other => panic!("expected InvalidArgument, found {other:?}"),
    }
}

#[rstest]
fn itinerary_requires_api_key() {
    let err = ItineraryConfig::try_from(ItineraryArgs::default())
        .expect_err("missing key should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_API_KEY);
            assert_eq!(env, ENV_ITINERARY_API_KEY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case::zero_top(Some(0), None, None, ARG_TOP)]
#[case::zero_timeout(None, Some(0), None, ARG_TIMEOUT_SECS)]
#[case::bad_direction(None, None, Some("sideways"), ARG_DIRECTION)]
fn itinerary_rejects_invalid_values(
    #[case] top: Option<usize>,
    #[case] timeout_secs: Option<u64>,
    #[case] direction: Option<&str>,
    #[case] expected_field: &'static str,
) {
    let args = ItineraryArgs {
        api_key: Some("key".to_owned()),
        top,
        timeout_secs,
        direction: direction.map(str::to_owned),
        ..ItineraryArgs::default()
    };
    let err = ItineraryConfig::try_from(args).expect_err("invalid value should error");
    match err {
        CliError::InvalidArgument { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected InvalidArgument, found {other:?}"),
    }
}

#[rstest]
fn itinerary_applies_overrides() {
    let args = ItineraryArgs {
        api_key: Some("key".to_owned()),
        base_url: Some("http://localhost:9000".to_owned()),
        model: Some("small-model".to_owned()),
        timeout_secs: Some(3),
        top: Some(5),
        direction: Some("clockwise".to_owned()),
        ..ItineraryArgs::default()
    };
    let config = ItineraryConfig::try_from(args).expect("config should build");
    assert_eq!(config.optimiser.base_url, "http://localhost:9000");
    assert_eq!(config.optimiser.model, "small-model");
    assert_eq!(config.optimiser.timeout, std::time::Duration::from_secs(3));
    assert_eq!(config.top_k, 5);
    assert_eq!(
        config.constraints.direction,
        ridevote_core::Direction::Clockwise
    );
    assert!(config.constraints.group_by_land);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "ranking_path": 42 }));

    let err = SubmitArgs::merge_from_layers(composer.layers())
        .map_err(CliError::from)
        .expect_err("invalid layer should fail");
    assert!(matches!(err, CliError::Configuration(_)));
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "api_key": "from-file",
            "model": "file-model",
            "top": 8,
        }),
        None,
    );
    composer.push_environment(json!({
        "api_key": "from-env",
        "direction": "clockwise",
    }));
    composer.push_cli(json!({ "top": 3 }));

    let merged =
        ItineraryArgs::merge_from_layers(composer.layers()).expect("layers should merge");
    let config = ItineraryConfig::try_from(merged).expect("config should build");
    assert_eq!(config.optimiser.api_key, "from-env");
    assert_eq!(config.optimiser.model, "file-model");
    assert_eq!(config.top_k, 3);
    assert_eq!(
        config.constraints.direction,
        ridevote_core::Direction::Clockwise
    );
}

#[rstest]
fn roster_is_optional() {
    assert_eq!(load_roster(None).expect("no roster is fine"), None);
}

#[rstest]
fn roster_loads_roles() {
    let group = Group::new();
    let roster = load_roster(Some(group.roster()))
        .expect("roster should load")
        .expect("roster present");
    assert_eq!(roster, Roster::from_json(ROSTER_JSON).expect("valid roster"));
    let session = resolve_session("Izza", Some(&roster)).expect("Izza is listed");
    assert_eq!(session.role(), Role::Admin);
}

#[rstest]
fn roster_errors_name_the_file() {
    let group = Group::new();
    let broken = group.data_dir().with_file_name("broken.json");
    write_utf8(&broken, br#"{"members": [{"name": "Leo"}, {"name": "Leo"}]}"#);

    let err = load_roster(Some(&broken)).expect_err("duplicate members should fail");
    match err {
        CliError::InvalidRoster { path, .. } => assert_eq!(path, broken),
        other => panic!("expected InvalidRoster, found {other:?}"),
    }
}

#[rstest]
fn missing_roster_file_is_reported() {
    let group = Group::new();
    let missing = group.data_dir().with_file_name("absent.json");
    let err = load_roster(Some(&missing)).expect_err("missing roster should fail");
    assert!(matches!(err, CliError::ReadRoster { .. }));
}

#[rstest]
fn without_roster_everyone_is_a_member() {
    let session = resolve_session("  Leo ", None).expect("any name is accepted");
    assert_eq!(session.name().as_str(), "Leo");
    assert_eq!(session.role(), Role::Member);
}

#[rstest]
fn unknown_member_is_rejected_with_roster() {
    let roster = Roster::from_json(ROSTER_JSON).expect("valid roster");
    let err = resolve_session("Mallory", Some(&roster)).expect_err("unknown member");
    assert!(matches!(err, CliError::Session(_)));
}

#[rstest]
fn ranking_file_must_be_an_id_array() {
    let group = Group::new();
    let path = group.data_dir().with_file_name("ranking.json");
    write_utf8(&path, br#"{"ids": ["dlp_1"]}"#);
    let err = load_ranking_ids(&path).expect_err("object should not parse");
    assert!(matches!(err, CliError::ParseRanking { .. }));
}
