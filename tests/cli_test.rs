//! CLI Command Tests
//!
//! Argument parsing, the data-shaping halves of each command, and exit codes
//! for commands run against local feed files.

use jobtok::models::VideoPost;

fn post(id: &str, user: &str) -> VideoPost {
    let mut p = VideoPost::new(id, user, format!("https://cdn.example.com/{}.mp4", id));
    p.likes = 10;
    p.views = 100;
    p
}

fn submission(id: &str, user: &str, original: &str) -> VideoPost {
    let mut p = post(id, user);
    p.original_video_id = Some(original.to_string());
    p
}

/// Two job posts by `alice`, one by `carol`, three submissions and a hidden post
fn fixture() -> Vec<VideoPost> {
    let mut hidden = post("v9", "alice");
    hidden.is_active = false;
    let mut v1 = post("v1", "alice");
    v1.submissions = 3;
    vec![
        v1,
        submission("s1", "bob", "v1"),
        post("v2", "carol"),
        submission("s2", "dave", "v1"),
        hidden,
        submission("s3", "erin", "v1"),
        post("v3", "alice"),
    ]
}

fn ids(posts: &[VideoPost]) -> Vec<&str> {
    posts.iter().map(|p| p.id.as_str()).collect()
}

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use jobtok::cli::{Cli, Command};

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from::<_, &str>([]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_feed_defaults() {
        let cli = Cli::parse_from(["jobtok", "feed"]);
        assert!(cli.is_cli_mode());
        match cli.command {
            Some(Command::Feed(cmd)) => {
                assert!(!cmd.all);
                assert!(cmd.limit.is_none());
            }
            _ => panic!("Expected Feed command"),
        }
    }

    #[test]
    fn test_submissions_with_start() {
        let cli = Cli::parse_from(["jobtok", "subs", "v1", "--start", "s2"]);
        match cli.command {
            Some(Command::Submissions(cmd)) => {
                assert_eq!(cmd.video_id, "v1");
                assert_eq!(cmd.start.as_deref(), Some("s2"));
            }
            _ => panic!("Expected Submissions command"),
        }
    }

    #[test]
    fn test_profile_alias() {
        let cli = Cli::parse_from(["jobtok", "p", "alice"]);
        match cli.command {
            Some(Command::Profile(cmd)) => assert_eq!(cmd.user_id, "alice"),
            _ => panic!("Expected Profile command"),
        }
    }

    #[test]
    fn test_select_requires_fractions() {
        assert!(Cli::try_parse_from(["jobtok", "select"]).is_err());
    }

    #[test]
    fn test_select_rejects_non_numeric_fraction() {
        assert!(Cli::try_parse_from(["jobtok", "select", "half"]).is_err());
    }

    #[test]
    fn test_open_rejects_unknown_player() {
        assert!(Cli::try_parse_from(["jobtok", "open", "v1", "--player", "totem"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["jobtok", "feed", "--json", "-s", "/tmp/videos.json"]);
        assert!(cli.json);
        assert!(cli.should_json());
        assert_eq!(cli.source.as_deref(), Some("/tmp/videos.json"));
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::parse_from(["jobtok", "--config", "/etc/jobtok.toml"]);
        assert!(!cli.is_cli_mode());
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/etc/jobtok.toml"))
        );
    }
}

// =============================================================================
// Feed and Submissions
// =============================================================================

mod feed_queries {
    use super::*;
    use jobtok::cli::{FeedCmd, SubmissionsCmd};
    use jobtok::commands::{feed_posts, submission_posts};

    #[test]
    fn test_main_feed_excludes_submissions_and_hidden() {
        let cmd = FeedCmd {
            all: false,
            limit: None,
        };
        assert_eq!(ids(&feed_posts(&fixture(), &cmd)), vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn test_feed_all_with_limit() {
        let cmd = FeedCmd {
            all: true,
            limit: Some(4),
        };
        assert_eq!(ids(&feed_posts(&fixture(), &cmd)), vec!["v1", "s1", "v2", "s2"]);
    }

    #[test]
    fn test_submissions_in_source_order() {
        let cmd = SubmissionsCmd {
            video_id: "v1".into(),
            start: None,
        };
        let subs = submission_posts(&fixture(), &cmd).unwrap();
        assert_eq!(ids(&subs), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn test_submissions_rotated_to_start() {
        let cmd = SubmissionsCmd {
            video_id: "v1".into(),
            start: Some("s3".into()),
        };
        let subs = submission_posts(&fixture(), &cmd).unwrap();
        assert_eq!(ids(&subs), vec!["s3", "s1", "s2"]);
    }

    #[test]
    fn test_submissions_of_post_without_any() {
        let cmd = SubmissionsCmd {
            video_id: "v2".into(),
            start: None,
        };
        assert!(submission_posts(&fixture(), &cmd).unwrap().is_empty());
    }

    #[test]
    fn test_submissions_unknown_post() {
        let cmd = SubmissionsCmd {
            video_id: "missing".into(),
            start: None,
        };
        let err = submission_posts(&fixture(), &cmd).unwrap_err();
        assert!(err.contains("missing"));
    }

    #[test]
    fn test_submissions_unknown_start() {
        // v2 exists, but not as a submission of v1
        let cmd = SubmissionsCmd {
            video_id: "v1".into(),
            start: Some("v2".into()),
        };
        assert!(submission_posts(&fixture(), &cmd).is_err());
    }
}

// =============================================================================
// Profile
// =============================================================================

mod profile {
    use super::*;
    use jobtok::commands::profile_of;

    #[test]
    fn test_profile_totals() {
        let profile = profile_of(&fixture(), "alice").unwrap();
        assert_eq!(profile.user_id, "alice");
        // Hidden posts still belong to the owner
        assert_eq!(ids(&profile.videos), vec!["v1", "v9", "v3"]);
        assert_eq!(profile.stats.videos, 3);
        assert_eq!(profile.stats.likes, 30);
        assert_eq!(profile.stats.views, 300);
        assert_eq!(profile.stats.submissions_received, 3);
    }

    #[test]
    fn test_profile_unknown_user() {
        assert!(profile_of(&fixture(), "zed").is_none());
    }

    #[test]
    fn test_profile_json_shape() {
        let profile = profile_of(&fixture(), "carol").unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["user_id"], "carol");
        assert_eq!(json["stats"]["videos"], 1);
        assert_eq!(json["videos"][0]["videoId"], "v2");
    }
}

// =============================================================================
// Select
// =============================================================================

mod select {
    use jobtok::cli::SelectCmd;
    use jobtok::commands::select_active;

    fn cmd(fractions: &[f32], first_index: usize, current: Option<usize>) -> SelectCmd {
        SelectCmd {
            fractions: fractions.to_vec(),
            threshold: None,
            first_index,
            current,
        }
    }

    #[test]
    fn test_most_visible_wins() {
        let result = select_active(&cmd(&[0.3, 0.8, 0.4], 0, None), 0.5).unwrap();
        assert_eq!(result.active_index, Some(1));
        assert!(result.changed);
    }

    #[test]
    fn test_tie_prefers_smaller_index() {
        let result = select_active(&cmd(&[0.6, 0.6], 2, None), 0.5).unwrap();
        assert_eq!(result.active_index, Some(2));
    }

    #[test]
    fn test_below_threshold_keeps_current() {
        let result = select_active(&cmd(&[0.4, 0.45], 0, Some(5)), 0.5).unwrap();
        assert_eq!(result.active_index, Some(5));
        assert!(!result.changed);
    }

    #[test]
    fn test_same_item_is_not_a_change() {
        let result = select_active(&cmd(&[0.1, 0.9], 0, Some(1)), 0.5).unwrap();
        assert_eq!(result.active_index, Some(1));
        assert!(!result.changed);
    }

    #[test]
    fn test_nothing_qualifies_without_current() {
        let result = select_active(&cmd(&[0.2], 0, None), 0.5).unwrap();
        assert_eq!(result.active_index, None);
        assert!(!result.changed);
    }

    #[test]
    fn test_out_of_range_inputs() {
        assert!(select_active(&cmd(&[1.5], 0, None), 0.5).is_err());
        assert!(select_active(&cmd(&[-0.1], 0, None), 0.5).is_err());
        assert!(select_active(&cmd(&[0.5], 0, None), 2.0).is_err());
    }

    #[test]
    fn test_huge_indices_are_rejected() {
        let err = select_active(&cmd(&[0.6, 0.6], usize::MAX, None), 0.5).unwrap_err();
        assert!(err.contains("too large"), "{}", err);
        assert!(select_active(&cmd(&[0.6], 0, Some(usize::MAX)), 0.5).is_err());

        // The last addressable index still works
        let result = select_active(&cmd(&[0.6], usize::MAX - 1, None), 0.5).unwrap();
        assert_eq!(result.active_index, Some(usize::MAX - 1));
    }
}

// =============================================================================
// Open
// =============================================================================

mod open {
    use jobtok::cli::{OpenCmd, PlayerChoice};
    use jobtok::commands::resolve_player;
    use jobtok::config::Config;
    use jobtok::player::{PlayerError, PlayerType};

    fn cmd(player: Option<PlayerChoice>) -> OpenCmd {
        OpenCmd {
            video_id: "v1".into(),
            player,
            no_loop: false,
        }
    }

    #[test]
    fn test_flag_beats_config() {
        let config = Config {
            player: Some("vlc".into()),
            ..Default::default()
        };
        let player = resolve_player(&cmd(Some(PlayerChoice::Mpv)), &config).unwrap();
        assert_eq!(player, PlayerType::Mpv);
    }

    #[test]
    fn test_config_player() {
        let config = Config {
            player: Some("MPV".into()),
            ..Default::default()
        };
        assert_eq!(resolve_player(&cmd(None), &config).unwrap(), PlayerType::Mpv);
    }

    #[test]
    fn test_default_player() {
        let player = resolve_player(&cmd(None), &Config::default()).unwrap();
        assert_eq!(player, PlayerType::Vlc);
    }

    #[test]
    fn test_unsupported_config_player() {
        let config = Config {
            player: Some("totem".into()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_player(&cmd(None), &config),
            Err(PlayerError::Unsupported(_))
        ));
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

mod exit_codes {
    use std::io::Write;

    use jobtok::cli::{ExitCode, FeedCmd, Output, ProfileCmd, SelectCmd, SubmissionsCmd};
    use jobtok::commands;
    use jobtok::config::Config;

    fn quiet() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    fn feed_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let posts = super::fixture();
        file.write_all(serde_json::to_string(&posts).unwrap().as_bytes())
            .unwrap();
        file
    }

    #[tokio::test]
    async fn test_feed_success() {
        let file = feed_file();
        let source = file.path().to_str().unwrap();
        let cmd = FeedCmd {
            all: false,
            limit: Some(1),
        };
        assert_eq!(commands::feed_cmd(cmd, source, &quiet()).await, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_missing_source_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("absent.json");
        let cmd = FeedCmd {
            all: false,
            limit: None,
        };
        let code = commands::feed_cmd(cmd, source.to_str().unwrap(), &quiet()).await;
        assert_eq!(code, ExitCode::SourceError);
    }

    #[tokio::test]
    async fn test_unknown_post_is_not_found() {
        let file = feed_file();
        let cmd = SubmissionsCmd {
            video_id: "nope".into(),
            start: None,
        };
        let code = commands::submissions_cmd(cmd, file.path().to_str().unwrap(), &quiet()).await;
        assert_eq!(code, ExitCode::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let file = feed_file();
        let cmd = ProfileCmd {
            user_id: "nobody".into(),
        };
        let code = commands::profile_cmd(cmd, file.path().to_str().unwrap(), &quiet()).await;
        assert_eq!(code, ExitCode::NotFound);
    }

    #[test]
    fn test_select_threshold_from_config() {
        let config = Config {
            visibility_threshold: Some(0.9),
            ..Default::default()
        };
        let cmd = SelectCmd {
            fractions: vec![0.8],
            threshold: None,
            first_index: 0,
            current: None,
        };
        assert_eq!(commands::select_cmd(cmd, &config, &quiet()), ExitCode::Success);
    }

    #[test]
    fn test_select_bad_threshold_is_invalid_args() {
        let cmd = SelectCmd {
            fractions: vec![0.8],
            threshold: Some(1.5),
            first_index: 0,
            current: None,
        };
        assert_eq!(
            commands::select_cmd(cmd, &Config::default(), &quiet()),
            ExitCode::InvalidArgs
        );
    }

    #[test]
    fn test_select_overflowing_index_is_invalid_args() {
        let cmd = SelectCmd {
            fractions: vec![0.6, 0.6],
            threshold: None,
            first_index: usize::MAX,
            current: None,
        };
        assert_eq!(
            commands::select_cmd(cmd, &Config::default(), &quiet()),
            ExitCode::InvalidArgs
        );
    }
}
