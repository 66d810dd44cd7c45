use clap::Parser;

use super::*;

#[test]
fn parses_roast_with_defaults() {
    let cli = Cli::try_parse_from(["roast-cli", "roast", "https://www.linkedin.com/in/a"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Roast {
            identifiers,
            no_video,
            callback_url,
        } => {
            assert_eq!(identifiers, vec!["https://www.linkedin.com/in/a".to_string()]);
            assert!(!no_video);
            assert!(callback_url.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_roast_flags() {
    let cli = Cli::try_parse_from([
        "roast-cli",
        "roast",
        "a",
        "b",
        "--no-video",
        "--callback-url",
        "https://hooks.example/done",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Roast {
            ref identifiers,
            no_video: true,
            callback_url: Some(_),
        } if identifiers.len() == 2
    ));
}

#[test]
fn roast_requires_identifiers() {
    assert!(Cli::try_parse_from(["roast-cli", "roast"]).is_err());
}

#[test]
fn parses_classify_and_status() {
    let cli = Cli::try_parse_from(["roast-cli", "classify", "profile.json"]).expect("classify");
    assert!(matches!(cli.command, Commands::Classify { .. }));

    let cli = Cli::try_parse_from(["roast-cli", "status", "tlk_1"]).expect("status");
    assert!(matches!(cli.command, Commands::Status { ref talk_id } if talk_id == "tlk_1"));
}

#[test]
fn parses_video_with_image() {
    let cli = Cli::try_parse_from([
        "roast-cli",
        "video",
        "roast.mp3",
        "--image-url",
        "https://img.example/me.png",
    ])
    .expect("video");
    assert!(matches!(
        cli.command,
        Commands::Video { image_url: Some(_), .. }
    ));
}

#[test]
fn classify_runs_without_service_keys() {
    let path = std::env::temp_dir().join(format!("roast-cli-classify-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"identifier": "pat", "followers": 2500}"#).expect("write profile");

    let result = commands::run_classify(&path);
    std::fs::remove_file(&path).ok();
    assert!(result.is_ok(), "classify failed: {result:?}");
}
