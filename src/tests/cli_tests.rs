use super::*;
use std::fs;
use tempfile::TempDir;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn run_plan(files: &[(&str, &str)], family: Option<Family>) -> Result<PlanStatus> {
    let dir = TempDir::new().unwrap();
    for (path, contents) in files {
        let target = dir.path().join(path);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(target, contents).unwrap();
    }
    let options = PlanOptions {
        path: dir.path().to_path_buf(),
        family,
        name: Some("fixture".to_string()),
    };
    with_source(dir.path(), |tree, loader| {
        plan(
            LayoutConfig::default(),
            tree,
            loader,
            &options,
            OutputFormat::Text,
        )
    })
}

#[test]
fn test_rejected_plan_reports_status_instead_of_exiting() {
    let status = run_plan(&[("Look.preset", "not a preset")], Some(Family::Preset)).unwrap();
    assert_eq!(status, PlanStatus::Rejected);
}

#[test]
fn test_accepted_plan() {
    let status = run_plan(
        &[
            ("info.json", r#"{ "name": "Fixture" }"#),
            ("archives/a.archive", "x"),
        ],
        None,
    )
    .unwrap();
    assert_eq!(status, PlanStatus::Accepted);
}

#[test]
fn test_plan_without_any_layout_is_an_error() {
    let err = run_plan(&[("readme.txt", "hi")], None).unwrap_err();
    assert!(err.to_string().contains("No supported layout"));
}

#[test]
fn test_parse_global_options_and_plan() {
    let (global, tokens) = parse_global_options(&args(&[
        "-vv",
        "--format=json",
        "plan",
        "mod.zip",
        "--family",
        "preset",
        "--name=Look",
    ]))
    .unwrap();
    assert!(global.format == OutputFormat::Json);
    assert_eq!(global.verbosity, 2);

    match parse_command(&tokens).unwrap() {
        CliCommand::Plan(options) => {
            assert_eq!(options.path, PathBuf::from("mod.zip"));
            assert_eq!(options.family, Some(Family::Preset));
            assert_eq!(options.name.as_deref(), Some("Look"));
        }
        _ => panic!("expected plan command"),
    }
}

#[test]
fn test_parse_rejects_unknown_values() {
    assert!(parse_global_options(&args(&["--format", "yaml"])).is_err());
    assert!(parse_command(&args(&["plan", "--family", "skins", "x"])).is_err());
    assert!(parse_command(&args(&["plan"])).is_err());
    assert!(parse_command(&args(&["frobnicate"])).is_err());
}
