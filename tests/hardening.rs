mod support;

use stackup::config::SearxngConfig;
use stackup::hardening::{ACTIVE, DISABLED, InitState, Toggle, apply, detect, toggle};
use support::{RecordingRunner, failure};

fn manifest(directive: &str) -> String {
    format!(
        "services:\n  searxng:\n    image: searxng/searxng\n    {directive}\n    cap_add:\n      - CHOWN\n"
    )
}

fn has_active(content: &str) -> bool {
    content.lines().any(|l| l.trim() == ACTIVE)
}

fn has_disabled(content: &str) -> bool {
    content.lines().any(|l| l.trim() == DISABLED)
}

#[test]
fn first_run_comments_out_the_directive() {
    let (out, result) = toggle(&manifest(ACTIVE), InitState::FirstRun);

    assert_eq!(result, Toggle::Disabled);
    assert_eq!(out, manifest(DISABLED));
}

#[test]
fn initialized_restores_the_directive() {
    let (out, result) = toggle(&manifest(DISABLED), InitState::Initialized);

    assert_eq!(result, Toggle::Restored);
    assert_eq!(out, manifest(ACTIVE));
}

#[test]
fn toggling_is_idempotent() {
    for state in [InitState::FirstRun, InitState::Initialized] {
        for start in [ACTIVE, DISABLED] {
            let (once, _) = toggle(&manifest(start), state);
            let (twice, second) = toggle(&once, state);

            assert_eq!(once, twice);
            assert_eq!(second, Toggle::Unchanged);
        }
    }
}

#[test]
fn both_forms_never_coexist_after_toggle() {
    let mixed = format!("{}  other:\n    {DISABLED}\n", manifest(ACTIVE));

    for state in [InitState::FirstRun, InitState::Initialized] {
        let (out, _) = toggle(&mixed, state);
        assert!(!(has_active(&out) && has_disabled(&out)), "{state:?}:\n{out}");
    }
}

#[test]
fn first_run_keeps_a_trailing_comment() {
    let content = "services:\n  searxng:\n    cap_drop: - ALL  # hardening\n";

    let (out, result) = toggle(content, InitState::FirstRun);

    assert_eq!(result, Toggle::Disabled);
    assert_eq!(out, format!("services:\n  searxng:\n    {DISABLED}  # hardening\n"));
}

#[test]
fn initialized_restores_a_directive_with_a_trailing_comment() {
    let content = format!("services:\n  searxng:\n    {DISABLED} # note\n");

    let (out, result) = toggle(&content, InitState::Initialized);

    assert_eq!(result, Toggle::Restored);
    assert_eq!(out, "services:\n  searxng:\n    cap_drop: - ALL # note\n");
}

#[test]
fn trailing_comment_survives_a_full_cycle() {
    let original = "services:\n  searxng:\n    cap_drop: - ALL  # hardening\n";

    let (disabled, _) = toggle(original, InitState::FirstRun);
    let (again, second) = toggle(&disabled, InitState::FirstRun);
    let (restored, _) = toggle(&again, InitState::Initialized);

    assert_eq!(second, Toggle::Unchanged);
    assert_eq!(restored, original);
}

#[test]
fn directive_mentioned_only_in_a_comment_is_left_alone() {
    let content = "services:\n  searxng:\n    # drop with cap_drop: - ALL once ready\n";

    assert_eq!(
        toggle(content, InitState::FirstRun),
        (content.to_string(), Toggle::Unchanged)
    );
}

#[test]
fn manifest_without_directive_is_untouched() {
    let content = "services:\n  n8n:\n    image: n8nio/n8n\n";

    for state in [InitState::FirstRun, InitState::Initialized] {
        assert_eq!(toggle(content, state), (content.to_string(), Toggle::Unchanged));
    }
}

#[test]
fn no_running_container_means_first_run() {
    let runner = RecordingRunner::new();

    assert_eq!(detect(&runner, &SearxngConfig::default()), InitState::FirstRun);
    assert_eq!(
        runner.commands(),
        vec!["docker ps --filter name=searxng --format {{.Names}}"]
    );
}

#[test]
fn marker_inside_container_means_initialized() {
    let runner = RecordingRunner::responding(|inv| match inv.arg_strs().first() {
        Some(&"ps") => Ok("localai-searxng-1\n".to_string()),
        _ => Ok("found".to_string()),
    });

    assert_eq!(detect(&runner, &SearxngConfig::default()), InitState::Initialized);

    let calls = runner.calls();
    assert_eq!(
        calls[1].arg_strs(),
        vec![
            "exec",
            "localai-searxng-1",
            "sh",
            "-c",
            "[ -f /etc/searxng/uwsgi.ini ] && echo 'found' || echo 'not_found'",
        ]
    );
}

#[test]
fn not_found_answer_means_first_run() {
    let runner = RecordingRunner::responding(|inv| match inv.arg_strs().first() {
        Some(&"ps") => Ok("localai-searxng-1".to_string()),
        _ => Ok("not_found".to_string()),
    });

    assert_eq!(detect(&runner, &SearxngConfig::default()), InitState::FirstRun);
}

#[test]
fn docker_errors_fail_open() {
    let ps_fails = RecordingRunner::responding(|inv| Err(failure(inv)));
    assert_eq!(detect(&ps_fails, &SearxngConfig::default()), InitState::FirstRun);

    let exec_fails = RecordingRunner::responding(|inv| match inv.arg_strs().first() {
        Some(&"ps") => Ok("searxng".to_string()),
        _ => Err(failure(inv)),
    });
    assert_eq!(detect(&exec_fails, &SearxngConfig::default()), InitState::FirstRun);
}

#[test]
fn apply_rewrites_the_manifest_on_disk() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("docker-compose.yml");
    std::fs::write(&path, manifest(ACTIVE)).unwrap();

    assert_eq!(apply(&path, InitState::FirstRun), Toggle::Disabled);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), manifest(DISABLED));

    assert_eq!(apply(&path, InitState::Initialized), Toggle::Restored);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), manifest(ACTIVE));
}

#[test]
fn apply_without_manifest_is_reported_not_raised() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("docker-compose.yml");

    assert_eq!(apply(&path, InitState::FirstRun), Toggle::Unchanged);
    assert!(!path.exists());
}
