use super::*;
use pretty_assertions::assert_eq;

fn sample() -> ExecutionOptions {
    ExecutionOptions {
        model: Some("opus".to_string()),
        output_format: Some("text".to_string()),
        max_tokens: Some(4096),
        temperature: Some(0.7),
        additional_flags: Some(vec!["--foo".to_string()]),
        environment_variables: Some(BTreeMap::from([("A".to_string(), "1".to_string())])),
        execution_mode: Some(ExecutionMode::Direct),
        ..Default::default()
    }
}

#[test]
fn test_merge_overlay_wins_per_field() {
    let base = sample();
    let overlay = ExecutionOptions {
        model: Some("haiku".to_string()),
        verbose: Some(false),
        ..Default::default()
    };

    let merged = base.merge(&overlay);
    assert_eq!(merged.model.as_deref(), Some("haiku"));
    assert_eq!(merged.verbose, Some(false));
    // Untouched fields fall through from base
    assert_eq!(merged.output_format.as_deref(), Some("text"));
    assert_eq!(merged.max_tokens, Some(4096));
    assert_eq!(merged.temperature, Some(0.7));
}

#[test]
fn test_merge_empty_string_is_a_value() {
    let base = sample();
    let overlay = ExecutionOptions {
        output_format: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(base.merge(&overlay).output_format, Some(String::new()));
}

#[test]
fn test_merge_replaces_collections_whole() {
    let base = sample();
    let overlay = ExecutionOptions {
        additional_flags: Some(vec!["--bar".to_string()]),
        environment_variables: Some(BTreeMap::from([("B".to_string(), "2".to_string())])),
        ..Default::default()
    };

    let merged = base.merge(&overlay);
    assert_eq!(merged.additional_flags, Some(vec!["--bar".to_string()]));
    assert_eq!(
        merged.environment_variables,
        Some(BTreeMap::from([("B".to_string(), "2".to_string())]))
    );
}

#[test]
fn test_merge_with_unset_overlay_is_identity() {
    let base = sample();
    assert_eq!(base.merge(&ExecutionOptions::default()), base);
    assert_eq!(ExecutionOptions::default().merge(&base), base);
}

#[test]
fn test_merge_is_idempotent() {
    let base = sample();
    assert_eq!(base.merge(&base), base);

    let empty = ExecutionOptions::default();
    assert_eq!(empty.merge(&empty), empty);
}

#[test]
fn test_mode_defaults_to_direct() {
    assert_eq!(ExecutionOptions::default().mode(), ExecutionMode::Direct);
    let opts = ExecutionOptions {
        execution_mode: Some(ExecutionMode::Multiplexed),
        ..Default::default()
    };
    assert_eq!(opts.mode(), ExecutionMode::Multiplexed);
}

#[test]
fn test_serde_skips_unset_fields() {
    let opts = ExecutionOptions {
        model: Some("opus".to_string()),
        execution_mode: Some(ExecutionMode::Multiplexed),
        ..Default::default()
    };
    let json = serde_json::to_value(&opts).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"model": "opus", "execution_mode": "multiplexed"})
    );

    let parsed: ExecutionOptions = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, opts);
}
